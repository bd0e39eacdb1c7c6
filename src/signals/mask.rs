/*!
 * Signal Mask
 *
 * The quantum (SIGALRM) and child-state (SIGCHLD) notifications stay blocked
 * for the lifetime of the scheduler and are consumed synchronously through
 * a signal descriptor. Children undo this before exec.
 */

use crate::core::errors::{SchedulerError, SchedulerResult};
use nix::sys::signal::{signal, sigprocmask, SigHandler, SigSet, SigmaskHow, Signal};

/// The two signals that drive scheduling transitions
pub fn scheduler_signals() -> SigSet {
    let mut set = SigSet::empty();
    set.add(Signal::SIGALRM);
    set.add(Signal::SIGCHLD);
    set
}

/// Defer delivery of the scheduler signals
pub fn block_scheduler_signals() -> SchedulerResult<()> {
    sigprocmask(SigmaskHow::SIG_BLOCK, Some(&scheduler_signals()), None).map_err(|source| {
        SchedulerError::SignalSetup {
            context: "blocking SIGALRM/SIGCHLD",
            source,
        }
    })
}

/// Writes to a departed shell must fail with EPIPE instead of killing us
pub fn ignore_sigpipe() -> SchedulerResult<()> {
    // SAFETY: installing SIG_IGN runs no user code.
    unsafe { signal(Signal::SIGPIPE, SigHandler::SigIgn) }
        .map(drop)
        .map_err(|source| SchedulerError::SignalSetup {
            context: "ignoring SIGPIPE",
            source,
        })
}

/// Restore default signal state in a freshly forked child
///
/// Only async-signal-safe calls; errors are ignored because the child has
/// nowhere to report them.
pub(crate) fn reset_for_exec() {
    let _ = sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&scheduler_signals()), None);
    // SAFETY: restoring SIG_DFL runs no user code.
    let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };
}
