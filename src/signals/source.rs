/*!
 * Signal Source
 * Readable descriptor carrying the blocked scheduler signals
 */

use super::mask::scheduler_signals;
use crate::core::errors::{SchedulerError, SchedulerResult};
use nix::sys::signal::Signal;
use nix::sys::signalfd::{SfdFlags, SignalFd};
use std::os::fd::{AsFd, BorrowedFd};
use tracing::{debug, trace};

/// Which notifications arrived since the last drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingSignals {
    pub quantum_expired: bool,
    pub child_changed: bool,
}

impl PendingSignals {
    pub fn is_empty(&self) -> bool {
        !self.quantum_expired && !self.child_changed
    }
}

pub struct SignalSource {
    fd: SignalFd,
}

impl SignalSource {
    /// Open the descriptor; the signals must already be blocked
    pub fn open() -> SchedulerResult<Self> {
        let fd = SignalFd::with_flags(
            &scheduler_signals(),
            SfdFlags::SFD_NONBLOCK | SfdFlags::SFD_CLOEXEC,
        )
        .map_err(|source| SchedulerError::SignalSetup {
            context: "opening signalfd",
            source,
        })?;

        debug!("Signal source opened for SIGALRM and SIGCHLD");
        Ok(Self { fd })
    }

    /// Consume every queued notification without blocking
    pub fn drain(&mut self) -> SchedulerResult<PendingSignals> {
        let mut pending = PendingSignals::default();

        while let Some(info) = self.fd.read_signal().map_err(|source| {
            SchedulerError::SignalSetup {
                context: "reading signalfd",
                source,
            }
        })? {
            match Signal::try_from(info.ssi_signo as i32) {
                Ok(Signal::SIGALRM) => pending.quantum_expired = true,
                Ok(Signal::SIGCHLD) => pending.child_changed = true,
                other => trace!(signal = ?other, "Ignoring unexpected signal"),
            }
        }

        Ok(pending)
    }
}

impl AsFd for SignalSource {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}
