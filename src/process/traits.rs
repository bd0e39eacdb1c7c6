/*!
 * Process Traits
 * The seam between scheduling decisions and OS-level process control
 */

use crate::core::errors::SchedulerResult;
use crate::core::types::Pid;
use std::ffi::OsStr;

/// OS-level effects the scheduler needs
///
/// Signal sends are fire-and-forget: an implementation logs failures but
/// never reports them, since a vanished target is an ordinary race with the
/// reaping path.
pub trait ProcessControl {
    /// Launch an executable and return once the child is parked and ready
    fn launch(&self, executable: &OsStr) -> SchedulerResult<Pid>;

    /// Continue a stopped task
    fn resume(&self, pid: Pid);

    /// Stop a running task
    fn pause(&self, pid: Pid);

    /// Terminate a task
    fn kill(&self, pid: Pid);

    /// Start (or restart) the quantum timer
    fn arm_quantum(&self);
}
