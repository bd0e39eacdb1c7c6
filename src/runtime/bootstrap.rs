/*!
 * Bootstrap
 *
 * Creates the shell and the workload as parked children, waits until every
 * one of them is ready, then starts the clock and resumes the first task.
 */

use super::event_loop::EventLoop;
use crate::core::config::SchedulerConfig;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::limits::SHELL_SERIAL_ID;
use crate::core::types::SerialId;
use crate::ipc::channel::ControlChannel;
use crate::ipc::handler::RequestHandler;
use crate::process::lifecycle::{spawn, spawn_shell, OsProcessControl};
use crate::process::readiness::wait_for_ready_children;
use crate::process::traits::ProcessControl;
use crate::scheduler::state::SchedulerState;
use crate::signals::{block_scheduler_signals, ignore_sigpipe, SignalSource};
use std::ffi::{OsStr, OsString};
use std::io::Stdout;
use tracing::{error, info};

pub type Scheduler = EventLoop<OsProcessControl, Stdout>;

/// Launch the shell and workload and return a loop ready to run
pub fn bootstrap(config: &SchedulerConfig, workload: &[OsString]) -> SchedulerResult<Scheduler> {
    if workload.is_empty() {
        return Err(SchedulerError::NoWorkload);
    }

    // Signal setup precedes the first fork; a failure leaves no children.
    let signals = install_signal_handling()?;

    let control = OsProcessControl::new(config.quantum);
    let mut state = SchedulerState::new();

    let channel = match populate(&mut state, config, workload) {
        Ok(channel) => channel,
        Err(e) => {
            abandon_children(&state, &control);
            return Err(e);
        }
    };

    let handler = RequestHandler::new(config.listing_format, std::io::stdout());

    control.arm_quantum();
    if let Some(first) = state.start() {
        control.resume(first);
    }

    info!(
        tasks = state.registry().running_count(),
        quantum = ?config.quantum,
        "Scheduler started"
    );
    Ok(EventLoop::new(state, control, signals, Some(channel), handler))
}

/// Block the scheduler signals, ignore SIGPIPE and open the signal source
///
/// Blocking must precede the first fork so no child-state notification is
/// lost.
fn install_signal_handling() -> SchedulerResult<SignalSource> {
    block_scheduler_signals()?;
    ignore_sigpipe()?;
    SignalSource::open()
}

fn populate(
    state: &mut SchedulerState,
    config: &SchedulerConfig,
    workload: &[OsString],
) -> SchedulerResult<ControlChannel> {
    let (shell_pid, channel) = spawn_shell(OsStr::new(&config.shell_executable))?;
    state
        .registry_mut()
        .add(SHELL_SERIAL_ID, shell_pid, &config.shell_executable);

    for (index, executable) in workload.iter().enumerate() {
        let pid = spawn(executable, &[])?;
        state
            .registry_mut()
            .add(index as SerialId + 1, pid, &executable.to_string_lossy());
    }

    wait_for_ready_children(workload.len() + 1)?;
    Ok(channel)
}

/// Don't leave parked children behind when startup fails
fn abandon_children(state: &SchedulerState, control: &OsProcessControl) {
    for task in state.registry().iter() {
        error!(serial_id = task.serial_id, pid = %task.pid, "Killing task after failed startup");
        control.kill(task.pid);
    }
}
