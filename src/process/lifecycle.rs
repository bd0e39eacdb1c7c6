/*!
 * Process Lifecycle Controller
 *
 * Forks children that park themselves with SIGSTOP before exec, and drives
 * the schedule with SIGCONT/SIGSTOP/SIGKILL.
 */

use super::readiness::wait_until_ready;
use super::traits::ProcessControl;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::limits::SHELL_FD_ARG_WIDTH;
use crate::core::types::Pid;
use crate::ipc::channel::{channel_pair, ControlChannel};
use crate::signals::{mask, timer};
use nix::errno::Errno;
use nix::sys::signal::{kill, raise, Signal};
use nix::unistd::{execve, fork, ForkResult};
use std::ffi::{CStr, CString, OsStr};
use std::os::fd::RawFd;
use std::os::unix::ffi::OsStrExt;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Real OS process control
#[derive(Debug, Clone)]
pub struct OsProcessControl {
    quantum: Duration,
}

impl OsProcessControl {
    pub fn new(quantum: Duration) -> Self {
        Self { quantum }
    }
}

impl ProcessControl for OsProcessControl {
    fn launch(&self, executable: &OsStr) -> SchedulerResult<Pid> {
        let pid = spawn(executable, &[])?;
        wait_until_ready(pid)?;
        info!(%pid, executable = %executable.to_string_lossy(), "Launched task");
        Ok(pid)
    }

    fn resume(&self, pid: Pid) {
        send(pid, Signal::SIGCONT);
    }

    fn pause(&self, pid: Pid) {
        send(pid, Signal::SIGSTOP);
    }

    fn kill(&self, pid: Pid) {
        send(pid, Signal::SIGKILL);
    }

    fn arm_quantum(&self) {
        timer::arm(self.quantum);
    }
}

/// Fork a parked child that will exec `executable` with `argv_tail` after
/// the program name
pub fn spawn(executable: &OsStr, argv_tail: &[&OsStr]) -> SchedulerResult<Pid> {
    let argv = argv_for(executable, argv_tail)?;
    fork_parked(executable, &argv, || Ok(()))
}

/// Fork the parked shell, wired to a fresh control channel
///
/// The shell receives the request-write and reply-read descriptor numbers as
/// its first two arguments.
pub fn spawn_shell(executable: &OsStr) -> SchedulerResult<(Pid, ControlChannel)> {
    let (channel, endpoint) = channel_pair()?;
    let (request_fd, reply_fd) = endpoint.raw_fds();

    let (request_arg, reply_arg) = (fd_arg(request_fd), fd_arg(reply_fd));
    let argv = argv_for(executable, &[OsStr::new(&request_arg), OsStr::new(&reply_arg)])?;
    let pid = fork_parked(executable, &argv, || endpoint.make_inheritable())?;

    // Our copies of the shell's ends close here.
    drop(endpoint);

    info!(
        %pid,
        executable = %executable.to_string_lossy(),
        request_fd,
        reply_fd,
        "Shell created"
    );
    Ok((pid, channel))
}

/// Fork a child that runs `prepare`, parks itself, then execs `argv`
///
/// A failing `prepare` ends the child with status 1 before it parks, which
/// the parent observes as an ordinary exit.
fn fork_parked<F>(executable: &OsStr, argv: &[CString], prepare: F) -> SchedulerResult<Pid>
where
    F: FnOnce() -> nix::Result<()>,
{
    // SAFETY: the scheduler is single-threaded, and the child runs only
    // fd/signal syscalls before exec.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            debug!(pid = %child, executable = %executable.to_string_lossy(), "Forked child");
            Ok(child)
        }
        Ok(ForkResult::Child) => {
            if let Err(e) = prepare() {
                eprintln!("{}: launch setup failed: {}", executable.to_string_lossy(), e);
                // SAFETY: terminate the child without running the parent's exit hooks.
                unsafe { nix::libc::_exit(1) }
            }
            exec_parked(argv)
        }
        Err(source) => Err(SchedulerError::ForkFailed {
            executable: executable.to_string_lossy().into_owned(),
            source,
        }),
    }
}

/// Child side: stop until the scheduler resumes us, then exec
fn exec_parked(argv: &[CString]) -> ! {
    mask::reset_for_exec();
    let _ = raise(Signal::SIGSTOP);

    let path: &CStr = &argv[0];
    let env: &[&CStr] = &[];
    let Err(e) = execve(path, argv, env);
    eprintln!("{}: exec failed: {}", path.to_string_lossy(), e);

    // SAFETY: terminate the child without running the parent's exit hooks.
    unsafe { nix::libc::_exit(1) }
}

/// Fire-and-forget signal delivery
fn send(pid: Pid, signal: Signal) {
    match kill(pid, signal) {
        Ok(()) => trace!(%pid, ?signal, "Signal sent"),
        Err(Errno::ESRCH) => debug!(%pid, ?signal, "Signal target already gone"),
        Err(e) => warn!(%pid, ?signal, error = %e, "Failed to signal task"),
    }
}

/// Raw argument bytes; nothing is re-encoded on the way to exec
fn argv_for(executable: &OsStr, argv_tail: &[&OsStr]) -> SchedulerResult<Vec<CString>> {
    std::iter::once(executable)
        .chain(argv_tail.iter().copied())
        .map(|arg| {
            CString::new(arg.as_bytes()).map_err(|_| {
                SchedulerError::InvalidExecutable(arg.to_string_lossy().into_owned())
            })
        })
        .collect()
}

fn fd_arg(fd: RawFd) -> String {
    format!("{:0width$}", fd, width = SHELL_FD_ARG_WIDTH)
}
