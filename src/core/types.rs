/*!
 * Core Types
 * Common types used across the scheduler
 */

use crate::core::limits::TASK_NAME_MAX;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use nix::unistd::Pid;

/// Scheduler-assigned task identifier (0 is the shell)
pub type SerialId = u32;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    Low,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => f.write_str("LOW"),
            Priority::High => f.write_str("HIGH"),
        }
    }
}

/// One scheduled OS process
///
/// Running/stopped is never stored here; it is whatever the OS says it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub serial_id: SerialId,
    pub pid: Pid,
    pub name: String,
    pub priority: Priority,
}

impl Task {
    pub fn new(serial_id: SerialId, pid: Pid, name: &str) -> Self {
        Self {
            serial_id,
            pid,
            name: bounded_name(name),
            priority: Priority::Low,
        }
    }

    pub fn is_high(&self) -> bool {
        self.priority == Priority::High
    }
}

/// Truncate a display name to the fixed task name bound (one byte is kept
/// for the terminator the shell side expects).
pub fn bounded_name(name: &str) -> String {
    let limit = TASK_NAME_MAX - 1;
    if name.len() <= limit {
        return name.to_string();
    }

    let mut end = limit;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_low_priority() {
        let task = Task::new(3, Pid::from_raw(42), "./prog");
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.is_high());
    }

    #[test]
    fn test_long_names_are_truncated() {
        let long = "x".repeat(200);
        assert_eq!(bounded_name(&long).len(), TASK_NAME_MAX - 1);
        assert_eq!(bounded_name("short"), "short");
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let name = "é".repeat(40);
        let bounded = bounded_name(&name);
        assert!(bounded.len() <= TASK_NAME_MAX - 1);
        assert!(bounded.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::Low.to_string(), "LOW");
        assert_eq!(Priority::High.to_string(), "HIGH");
    }
}
