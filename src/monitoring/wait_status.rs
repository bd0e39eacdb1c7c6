/*!
 * Wait-Status Reporter
 * Diagnostic logging for every reaped child state change
 */

use nix::sys::wait::WaitStatus;
use tracing::{debug, info, warn};

/// Log a child state change; never influences control flow
pub fn explain_wait_status(status: &WaitStatus) {
    match *status {
        WaitStatus::Exited(pid, 0) => {
            info!(%pid, "Child terminated normally, exit status = 0");
        }
        WaitStatus::Exited(pid, code) => {
            warn!(%pid, code, "Child terminated with non-zero exit status");
        }
        WaitStatus::Signaled(pid, signal, core_dumped) => {
            warn!(%pid, ?signal, core_dumped, "Child was terminated by a signal");
        }
        WaitStatus::Stopped(pid, signal) => {
            debug!(%pid, ?signal, "Child has been stopped");
        }
        WaitStatus::Continued(pid) => {
            debug!(%pid, "Child has been continued");
        }
        other => {
            debug!(status = ?other, "Unexpected wait status");
        }
    }
}
