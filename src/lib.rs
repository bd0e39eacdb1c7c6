/*!
 * sigsched
 * User-space preemptive scheduler for OS processes, steered by a shell
 * over a private control channel
 */

pub mod core;
pub mod ipc;
pub mod monitoring;
pub mod process;
pub mod runtime;
pub mod scheduler;
pub mod signals;

// Re-exports
pub use crate::core::{
    ChannelError, ConfigError, ListingFormat, Pid, Priority, SchedulerConfig, SchedulerError,
    SchedulerResult, SerialId, Task,
};
pub use ipc::{ControlChannel, Request, RequestHandler, ShellEndpoint};
pub use monitoring::init_tracing;
pub use process::{OsProcessControl, ProcessControl, TaskRegistry};
pub use runtime::{bootstrap, EventLoop, Scheduler};
pub use scheduler::{ChildEvent, SchedulerState, Transition};
