/*!
 * Core Module
 * Shared types, limits, configuration and errors
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod types;

pub use config::{ListingFormat, SchedulerConfig};
pub use errors::{ChannelError, ConfigError, SchedulerError, SchedulerResult};
pub use types::{Pid, Priority, SerialId, Task};
