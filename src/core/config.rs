/*!
 * Scheduler Configuration
 * Environment-driven settings with validated defaults
 */

use crate::core::errors::ConfigError;
use crate::core::limits::{DEFAULT_QUANTUM, DEFAULT_SHELL_EXECUTABLE};
use std::time::Duration;

pub const QUANTUM_VAR: &str = "SCHED_QUANTUM_SECS";
pub const SHELL_VAR: &str = "SCHED_SHELL";
pub const LIST_FORMAT_VAR: &str = "SCHED_LIST_FORMAT";

/// Rendering of the "print tasks" listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingFormat {
    #[default]
    Text,
    Json,
}

/// Scheduler settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub quantum: Duration,
    pub shell_executable: String,
    pub listing_format: ListingFormat,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            shell_executable: DEFAULT_SHELL_EXECUTABLE.to_string(),
            listing_format: ListingFormat::Text,
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(QUANTUM_VAR) {
            config.quantum = parse_quantum(&raw)?;
        }

        if let Some(raw) = lookup(SHELL_VAR) {
            if raw.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: SHELL_VAR,
                    value: raw,
                    reason: "shell executable must not be empty",
                });
            }
            config.shell_executable = raw;
        }

        if let Some(raw) = lookup(LIST_FORMAT_VAR) {
            config.listing_format = match raw.trim().to_lowercase().as_str() {
                "text" => ListingFormat::Text,
                "json" => ListingFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: LIST_FORMAT_VAR,
                        value: raw,
                        reason: "expected 'text' or 'json'",
                    })
                }
            };
        }

        Ok(config)
    }
}

fn parse_quantum(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: QUANTUM_VAR,
            value: raw.to_string(),
            reason: "quantum must be at least one second",
        }),
        Ok(secs) => Ok(Duration::from_secs(u64::from(secs))),
        Err(_) => Err(ConfigError::InvalidValue {
            key: QUANTUM_VAR,
            value: raw.to_string(),
            reason: "expected a whole number of seconds",
        }),
    }
}
