/*!
 * Scheduler State
 * The registry plus the task the controller believes is running
 */

use crate::core::types::{Pid, SerialId, Task};
use crate::process::registry::TaskRegistry;
use tracing::info;

/// All shared mutable schedule state
///
/// Owned by the control loop; handlers and request dispatch get it by
/// `&mut` one at a time, so no locking is involved.
#[derive(Debug, Default)]
pub struct SchedulerState {
    pub(crate) registry: TaskRegistry,
    pub(crate) current: Option<Pid>,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TaskRegistry {
        &mut self.registry
    }

    /// Task currently running or about to be resumed
    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current.and_then(|pid| self.registry.find_by_pid(pid))
    }

    /// Register a task under the next unused serial id
    pub fn register(&mut self, pid: Pid, name: &str) -> SerialId {
        let serial_id = self.registry.next_serial();
        self.registry.add(serial_id, pid, name);
        serial_id
    }

    /// Designate the head of the registry as the first task to run
    pub fn start(&mut self) -> Option<Pid> {
        self.current = self.registry.head().map(|task| task.pid);
        if let Some(task) = self.current_task() {
            info!(serial_id = task.serial_id, pid = %task.pid, "Starting schedule");
        }
        self.current
    }
}
