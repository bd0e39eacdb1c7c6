/*!
 * Scheduler Limits and Constants
 *
 * Centralized location for the fixed parameters of the scheduler and the
 * layout constants of the control channel.
 */

use std::time::Duration;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Default time quantum
/// Driven by the process alarm timer, so only whole seconds are honoured
pub const DEFAULT_QUANTUM: Duration = Duration::from_secs(2);

/// Serial id reserved for the shell pseudo-task
pub const SHELL_SERIAL_ID: u32 = 0;

/// Default shell executable
pub const DEFAULT_SHELL_EXECUTABLE: &str = "shell";

// =============================================================================
// TASKS
// =============================================================================

/// Task name buffer size, terminator included
pub const TASK_NAME_MAX: usize = 60;

/// Width of the zero-padded descriptor numbers handed to the shell
pub const SHELL_FD_ARG_WIDTH: usize = 5;

// =============================================================================
// CONTROL CHANNEL
// =============================================================================

/// Fixed-width executable path field of a request record
pub const REQUEST_PATH_LEN: usize = 60;

/// Size of one request record: kind + serial id + path
pub const REQUEST_RECORD_SIZE: usize = 4 + 4 + REQUEST_PATH_LEN;

/// Size of one reply record
pub const REPLY_RECORD_SIZE: usize = 4;
