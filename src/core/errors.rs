/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use crate::core::types::Pid;
use miette::Diagnostic;
use thiserror::Error;

/// Result type for fallible scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Fatal scheduler errors
///
/// Every variant terminates the scheduler with exit status 1.
#[derive(Error, Debug, Diagnostic)]
pub enum SchedulerError {
    #[error("no tasks to schedule")]
    #[diagnostic(
        code(scheduler::no_workload),
        help("Pass at least one executable to schedule: sigsched <prog> [<prog>...]")
    )]
    NoWorkload,

    #[error("failed to fork '{executable}': {source}")]
    #[diagnostic(
        code(scheduler::fork_failed),
        help("The system may be out of processes or memory.")
    )]
    ForkFailed {
        executable: String,
        #[source]
        source: nix::Error,
    },

    #[error("launch argument '{0}' contains an interior NUL byte")]
    #[diagnostic(code(scheduler::invalid_executable))]
    InvalidExecutable(String),

    #[error("failed to create control channel: {0}")]
    #[diagnostic(
        code(scheduler::channel_setup_failed),
        help("Check the per-process descriptor limit.")
    )]
    ChannelSetup(#[source] nix::Error),

    #[error("failed to set up signal handling: {context}: {source}")]
    #[diagnostic(code(scheduler::signal_setup_failed))]
    SignalSetup {
        context: &'static str,
        #[source]
        source: nix::Error,
    },

    #[error("child {pid} did not reach the ready state: {status}")]
    #[diagnostic(
        code(scheduler::child_not_ready),
        help("Children must stop themselves before exec; something else changed their state.")
    )]
    ChildNotReady { pid: Pid, status: String },

    #[error("waiting for children failed: {0}")]
    #[diagnostic(code(scheduler::wait_failed))]
    Wait(#[source] nix::Error),

    #[error("control loop poll failed: {0}")]
    #[diagnostic(code(scheduler::poll_failed))]
    Poll(#[source] nix::Error),

    #[error("failed to write task listing: {0}")]
    #[diagnostic(code(scheduler::output_failed))]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Control channel breakage
///
/// Never fatal: the scheduler stops serving the shell and keeps running.
#[derive(Error, Debug, Diagnostic)]
pub enum ChannelError {
    #[error("short read from shell: got {actual} of {expected} bytes")]
    #[diagnostic(code(channel::short_read))]
    ShortRead { expected: usize, actual: usize },

    #[error("short write to shell: wrote {actual} of {expected} bytes")]
    #[diagnostic(code(channel::short_write))]
    ShortWrite { expected: usize, actual: usize },

    #[error("control channel I/O error: {0}")]
    #[diagnostic(code(channel::io))]
    Io(#[from] std::io::Error),
}

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Unset the variable to fall back to its default.")
    )]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}
