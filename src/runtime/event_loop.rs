/*!
 * Control Loop
 *
 * Single flow of control for the whole scheduler. It waits on the signal
 * source and, while the shell is attended, the request pipe. Signal
 * transitions and request dispatch run one at a time to completion, so a
 * request's effect on the registry can never interleave with preemption or
 * reaping.
 */

use crate::core::errors::{ChannelError, SchedulerError, SchedulerResult};
use crate::ipc::channel::ControlChannel;
use crate::ipc::handler::RequestHandler;
use crate::process::traits::ProcessControl;
use crate::scheduler::engine::Transition;
use crate::scheduler::events::reap_pending;
use crate::scheduler::state::SchedulerState;
use crate::signals::{timer, SignalSource};
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::io::Write;
use std::os::fd::AsFd;
use tracing::{debug, error, info};

pub struct EventLoop<C: ProcessControl, W: Write> {
    state: SchedulerState,
    control: C,
    signals: SignalSource,
    channel: Option<ControlChannel>,
    handler: RequestHandler<W>,
}

impl<C: ProcessControl, W: Write> EventLoop<C, W> {
    pub fn new(
        state: SchedulerState,
        control: C,
        signals: SignalSource,
        channel: Option<ControlChannel>,
        handler: RequestHandler<W>,
    ) -> Self {
        Self {
            state,
            control,
            signals,
            channel,
            handler,
        }
    }

    /// Run until the last task has been reaped
    pub fn run(mut self) -> SchedulerResult<()> {
        info!(
            tasks = self.state.registry().running_count(),
            "Scheduler entering control loop"
        );

        loop {
            let (signals_ready, request_ready) = self.wait()?;

            if signals_ready && self.on_signals()? == Transition::AllTasksDone {
                timer::disarm();
                let out = self.handler.out_mut();
                writeln!(out, "All tasks terminated.")?;
                writeln!(out, "Scheduler terminating...")?;
                out.flush()?;
                return Ok(());
            }

            if request_ready {
                self.serve_request()?;
            }
        }
    }

    /// Block until a signal or a request is available
    fn wait(&self) -> SchedulerResult<(bool, bool)> {
        let mut fds = vec![PollFd::new(self.signals.as_fd(), PollFlags::POLLIN)];
        if let Some(channel) = &self.channel {
            fds.push(PollFd::new(channel.as_fd(), PollFlags::POLLIN));
        }

        loop {
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => break,
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(SchedulerError::Poll(e)),
            }
        }

        let ready = |fd: &PollFd| {
            fd.revents().map_or(false, |events| {
                events.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR)
            })
        };
        Ok((ready(&fds[0]), fds.get(1).map_or(false, ready)))
    }

    fn on_signals(&mut self) -> SchedulerResult<Transition> {
        let pending = self.signals.drain()?;
        debug!(?pending, "Signals delivered");

        if pending.quantum_expired {
            self.state.on_quantum_expired(&self.control);
        }

        if pending.child_changed {
            let events = reap_pending()?;
            return Ok(self.state.on_child_events(events, &self.control));
        }

        Ok(Transition::Running)
    }

    /// Serve exactly one shell request; a broken channel is dropped for good
    fn serve_request(&mut self) -> SchedulerResult<()> {
        let Some(channel) = self.channel.as_mut() else {
            return Ok(());
        };

        let request = match channel.read_request() {
            Ok(request) => request,
            Err(e) => {
                self.abandon_shell(e);
                return Ok(());
            }
        };
        debug!(?request, "Shell request");

        let code = self
            .handler
            .handle(&mut self.state, &self.control, &request)?;

        let written = match self.channel.as_mut() {
            Some(channel) => channel.write_reply(code),
            None => Ok(()),
        };
        if let Err(e) = written {
            self.abandon_shell(e);
        }

        Ok(())
    }

    fn abandon_shell(&mut self, cause: ChannelError) {
        error!(error = %cause, "Scheduler: giving up on shell request processing");
        self.channel = None;
    }
}
