/*!
 * Process Module
 * Task registry, process lifecycle and readiness synchronization
 */

pub mod lifecycle;
pub mod readiness;
pub mod registry;
pub mod traits;

pub use lifecycle::{spawn, spawn_shell, OsProcessControl};
pub use readiness::{wait_for_ready_children, wait_until_ready};
pub use registry::TaskRegistry;
pub use traits::ProcessControl;
