/*!
 * Readiness Barrier
 * Waits for freshly forked children to park themselves before exec
 */

use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::Pid;
use crate::monitoring::explain_wait_status;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use tracing::{debug, info};

/// Block until `count` children have stopped themselves
pub fn wait_for_ready_children(count: usize) -> SchedulerResult<()> {
    let mut ready = 0;
    while ready < count {
        let status = waitpid(None, Some(WaitPidFlag::WUNTRACED)).map_err(SchedulerError::Wait)?;
        explain_wait_status(&status);

        match status {
            WaitStatus::Stopped(pid, _) => {
                ready += 1;
                debug!(%pid, ready, count, "Child parked");
            }
            other => return Err(not_ready(other)),
        }
    }

    info!(count, "All children ready");
    Ok(())
}

/// Block until one specific child has stopped itself
pub fn wait_until_ready(pid: Pid) -> SchedulerResult<()> {
    let status = waitpid(pid, Some(WaitPidFlag::WUNTRACED)).map_err(SchedulerError::Wait)?;
    explain_wait_status(&status);

    match status {
        WaitStatus::Stopped(_, _) => Ok(()),
        other => Err(not_ready(other)),
    }
}

fn not_ready(status: WaitStatus) -> SchedulerError {
    let pid = status.pid().unwrap_or_else(|| Pid::from_raw(-1));
    SchedulerError::ChildNotReady {
        pid,
        status: format!("{:?}", status),
    }
}
