/*!
 * Preemption & Reaping Engine
 *
 * The two signal-driven transitions of the schedule. Quantum expiry only
 * stops the current task; choosing its successor happens once the stop is
 * observed as a child state change.
 */

use super::events::ChildEvent;
use super::policy::{select_next, select_successor};
use super::state::SchedulerState;
use crate::core::types::Pid;
use crate::process::traits::ProcessControl;
use tracing::{debug, info, warn};

/// Outcome of processing a batch of child events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// At least one task remains
    Running,
    /// The last task was reaped; the scheduler should exit successfully
    AllTasksDone,
}

impl SchedulerState {
    /// Quantum expired: stop whoever is current
    pub fn on_quantum_expired<C: ProcessControl>(&self, control: &C) {
        if let Some(pid) = self.current {
            debug!(%pid, "Quantum expired, preempting");
            control.pause(pid);
        }
    }

    /// Apply a drained batch of child state changes
    ///
    /// When anything was processed and a task remains, the current task is
    /// resumed and the quantum timer rearmed.
    pub fn on_child_events<C, I>(&mut self, events: I, control: &C) -> Transition
    where
        C: ProcessControl,
        I: IntoIterator<Item = ChildEvent>,
    {
        let mut processed = 0usize;

        for event in events {
            processed += 1;
            let pid = event.pid();

            if event.is_termination() {
                if self.reap(pid) == Transition::AllTasksDone {
                    return Transition::AllTasksDone;
                }
            } else {
                self.advance_after_stop(pid);
            }
        }

        if processed > 0 {
            if let Some(pid) = self.current {
                control.resume(pid);
                control.arm_quantum();
            }
        }

        Transition::Running
    }

    fn reap(&mut self, pid: Pid) -> Transition {
        if !self.registry.contains(pid) {
            warn!(%pid, "Reaped a process that is not registered");
            return Transition::Running;
        }

        if self.current == Some(pid) {
            let next = select_successor(&self.registry, pid);
            self.registry.remove(pid);
            self.current = next;

            if next.is_none() {
                info!("All tasks terminated");
                return Transition::AllTasksDone;
            }
            debug!(exited = %pid, next = ?next, "Current task exited");
        } else {
            self.registry.remove(pid);
            debug!(%pid, "Background task exited");

            if self.registry.is_empty() {
                self.current = None;
                info!("All tasks terminated");
                return Transition::AllTasksDone;
            }
        }

        Transition::Running
    }

    fn advance_after_stop(&mut self, pid: Pid) {
        match self.current {
            Some(current) if current == pid => {
                self.current = select_next(&self.registry, current);
                debug!(stopped = %pid, next = ?self.current, "Advancing schedule");
            }
            // A task parked by someone other than the timer; it keeps its
            // place in the ring and runs again when its turn comes.
            _ => debug!(%pid, "Non-current task stopped"),
        }
    }
}
