/*!
 * Task Registry
 *
 * Circular, insertion-ordered collection of task records. Traversal starts at
 * the head (oldest surviving task) and wraps from the tail back to the head.
 * Records are owned here exclusively; everything else borrows them.
 */

use crate::core::types::{Pid, SerialId, Task};
use tracing::debug;

#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
    created: u32,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task at the tail
    pub fn add(&mut self, serial_id: SerialId, pid: Pid, name: &str) {
        let task = Task::new(serial_id, pid, name);
        debug!(serial_id, %pid, name = %task.name, "Task registered");
        self.tasks.push(task);
        self.created += 1;
    }

    /// Unlink the task with the given process id
    ///
    /// Returns `None` when no such task is registered.
    pub fn remove(&mut self, pid: Pid) -> Option<Task> {
        let index = self.position(pid)?;
        let task = self.tasks.remove(index);
        debug!(serial_id = task.serial_id, %pid, "Task unregistered");
        Some(task)
    }

    pub fn find_by_serial(&self, serial_id: SerialId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.serial_id == serial_id)
    }

    pub fn find_by_serial_mut(&mut self, serial_id: SerialId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.serial_id == serial_id)
    }

    pub fn find_by_pid(&self, pid: Pid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.pid == pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.position(pid).is_some()
    }

    /// Head-to-tail traversal; each call is a fresh scan
    pub fn iter(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter()
    }

    /// Number of registered tasks
    pub fn running_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks ever added, which is also the next unused serial id
    pub fn next_serial(&self) -> SerialId {
        self.created
    }

    pub fn head(&self) -> Option<&Task> {
        self.tasks.first()
    }

    /// Traversal position of a task
    pub(crate) fn position(&self, pid: Pid) -> Option<usize> {
        self.tasks.iter().position(|t| t.pid == pid)
    }

    /// Task at `steps` hops after `position`, wrapping around
    pub(crate) fn nth_after(&self, position: usize, steps: usize) -> &Task {
        &self.tasks[(position + steps) % self.tasks.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Priority;
    use pretty_assertions::assert_eq;

    fn pid(raw: i32) -> Pid {
        Pid::from_raw(raw)
    }

    fn registry_of(n: i32) -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        for i in 0..n {
            registry.add(i as SerialId, pid(100 + i), &format!("task{}", i));
        }
        registry
    }

    #[test]
    fn test_add_appends_in_creation_order() {
        let registry = registry_of(3);

        let serials: Vec<_> = registry.iter().map(|t| t.serial_id).collect();
        assert_eq!(serials, vec![0, 1, 2]);
        assert_eq!(registry.running_count(), 3);
        assert_eq!(registry.next_serial(), 3);
        assert!(registry.iter().all(|t| t.priority == Priority::Low));
    }

    #[test]
    fn test_remove_by_pid() {
        let mut registry = registry_of(3);

        let removed = registry.remove(pid(101)).unwrap();
        assert_eq!(removed.serial_id, 1);
        assert_eq!(registry.running_count(), 2);
        assert!(registry.find_by_pid(pid(101)).is_none());
        assert!(!registry.contains(pid(101)));
    }

    #[test]
    fn test_remove_missing_pid_is_reported() {
        let mut registry = registry_of(2);
        assert!(registry.remove(pid(999)).is_none());
        assert_eq!(registry.running_count(), 2);
    }

    #[test]
    fn test_serials_are_never_reused() {
        let mut registry = registry_of(3);
        registry.remove(pid(102));

        assert_eq!(registry.next_serial(), 3);
        registry.add(registry.next_serial(), pid(200), "late");
        assert_eq!(registry.find_by_serial(3).unwrap().pid, pid(200));
    }

    #[test]
    fn test_circular_traversal() {
        let registry = registry_of(3);
        let start = registry.position(pid(101)).unwrap();

        assert_eq!(registry.nth_after(start, 1).pid, pid(102));
        assert_eq!(registry.nth_after(start, 2).pid, pid(100));
        assert_eq!(registry.nth_after(start, registry.running_count()).pid, pid(101));
    }

    #[test]
    fn test_removal_keeps_ring_closed() {
        let mut registry = registry_of(4);
        registry.remove(pid(102));

        let start = registry.position(pid(101)).unwrap();
        assert_eq!(registry.nth_after(start, 1).pid, pid(103));
        assert_eq!(registry.nth_after(start, 3).pid, pid(101));
    }

    #[test]
    fn test_find_by_serial_mut_updates_priority() {
        let mut registry = registry_of(2);
        registry.find_by_serial_mut(1).unwrap().priority = Priority::High;
        assert!(registry.find_by_serial(1).unwrap().is_high());
        assert!(registry.find_by_serial(7).is_none());
    }
}
