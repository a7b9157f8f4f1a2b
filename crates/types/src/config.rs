// Path: crates/types/src/config.rs

//! Shared configuration for the wallet engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts and retry intervals for operation supervision.
///
/// The monitor waits `acknowledge_timeout` for the first sign of life from a
/// submitted operation and `completion_timeout` for finality before falling
/// back to an explicit status poll. `default_retry` is used when a status
/// response does not supply its own retry interval.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Milliseconds to wait for acknowledgement before polling.
    #[serde(default = "default_acknowledge_timeout_ms")]
    pub acknowledge_timeout_ms: u64,
    /// Milliseconds to wait for completion before polling.
    #[serde(default = "default_completion_timeout_ms")]
    pub completion_timeout_ms: u64,
    /// Fallback poll interval in milliseconds.
    #[serde(default = "default_retry_ms")]
    pub default_retry_ms: u64,
}

fn default_acknowledge_timeout_ms() -> u64 {
    30_000
}
fn default_completion_timeout_ms() -> u64 {
    180_000
}
fn default_retry_ms() -> u64 {
    10_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            acknowledge_timeout_ms: default_acknowledge_timeout_ms(),
            completion_timeout_ms: default_completion_timeout_ms(),
            default_retry_ms: default_retry_ms(),
        }
    }
}

impl EngineConfig {
    /// The acknowledge-phase timeout as a `Duration`.
    pub fn acknowledge_timeout(&self) -> Duration {
        Duration::from_millis(self.acknowledge_timeout_ms)
    }

    /// The completion-phase timeout as a `Duration`.
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_ms)
    }

    /// The fallback poll interval as a `Duration`.
    pub fn default_retry(&self) -> Duration {
        Duration::from_millis(self.default_retry_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: EngineConfig = toml::from_str("acknowledge_timeout_ms = 500").expect("parse");
        assert_eq!(config.acknowledge_timeout(), Duration::from_millis(500));
        assert_eq!(config.completion_timeout_ms, 180_000);
        assert_eq!(config.default_retry_ms, 10_000);
    }

    #[test]
    fn default_matches_serde_defaults() {
        let from_empty: EngineConfig = toml::from_str("").expect("parse");
        assert_eq!(from_empty, EngineConfig::default());
    }
}
