/*!
 * Signals Module
 * Masking, delivery and the quantum timer
 */

pub mod mask;
pub mod source;
pub mod timer;

pub use mask::{block_scheduler_signals, ignore_sigpipe, scheduler_signals};
pub use source::{PendingSignals, SignalSource};
