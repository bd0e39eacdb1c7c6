/*!
 * Child Events
 * Scheduling-relevant child state changes and the non-blocking reaper
 */

use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::Pid;
use crate::monitoring::explain_wait_status;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildEvent {
    Exited { pid: Pid, code: i32 },
    Killed { pid: Pid, signal: Signal },
    Stopped { pid: Pid, signal: Signal },
}

impl ChildEvent {
    /// Translate a wait status; states the scheduler ignores map to `None`
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(pid, code) => Some(ChildEvent::Exited { pid, code }),
            WaitStatus::Signaled(pid, signal, _) => Some(ChildEvent::Killed { pid, signal }),
            WaitStatus::Stopped(pid, signal) => Some(ChildEvent::Stopped { pid, signal }),
            _ => None,
        }
    }

    pub fn pid(&self) -> Pid {
        match *self {
            ChildEvent::Exited { pid, .. }
            | ChildEvent::Killed { pid, .. }
            | ChildEvent::Stopped { pid, .. } => pid,
        }
    }

    pub fn is_termination(&self) -> bool {
        !matches!(self, ChildEvent::Stopped { .. })
    }
}

/// Collect every pending child state change without blocking
pub fn reap_pending() -> SchedulerResult<Vec<ChildEvent>> {
    let mut events = Vec::new();

    loop {
        let status = match waitpid(None, Some(WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => break,
            Ok(status) => status,
            Err(e) => return Err(SchedulerError::Wait(e)),
        };

        explain_wait_status(&status);
        events.extend(ChildEvent::from_wait_status(status));
    }

    Ok(events)
}
