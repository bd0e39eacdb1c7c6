/*!
 * Quantum Timer
 * One-shot process alarm; the only timeout in the scheduler
 */

use nix::unistd::alarm;
use std::time::Duration;
use tracing::trace;

/// Arm the alarm for one quantum, replacing any pending one
pub fn arm(quantum: Duration) {
    let secs = quantum.as_secs().clamp(1, u64::from(u32::MAX)) as u32;
    let previous = alarm::set(secs);
    trace!(secs, ?previous, "Quantum timer armed");
}

/// Cancel a pending alarm
pub fn disarm() {
    alarm::cancel();
}
