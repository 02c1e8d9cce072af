//! Chip controller configuration.
//!
//! # Responsibility
//! - Hold the tunable constants of the chip controller.
//! - Load and validate them from JSON documents.
//!
//! # Invariants
//! - Defaults reproduce the stock layout: 1230px breakpoint, 2000ms
//!   message lifetime, three recognized containers.
//! - A loaded config always has a positive breakpoint and at least one
//!   recognized region.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_COMPACT_BREAKPOINT: u32 = 1230;
pub const DEFAULT_MESSAGE_CLEAR_DELAY_MS: u64 = 2000;
pub const DEFAULT_RECOGNIZED_REGIONS: [&str; 3] =
    ["first-container", "second-container", "add-task-container"];

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid controller config: {err}"),
            Self::Invalid(message) => write!(f, "invalid controller config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Viewports narrower than this (in px) use the compact layout.
    pub compact_breakpoint: u32,
    /// Lifetime of the transient validation message.
    pub message_clear_delay_ms: u64,
    /// Container names whose interactions keep the panel open.
    pub recognized_regions: Vec<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            compact_breakpoint: DEFAULT_COMPACT_BREAKPOINT,
            message_clear_delay_ms: DEFAULT_MESSAGE_CLEAR_DELAY_MS,
            recognized_regions: DEFAULT_RECOGNIZED_REGIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl ControllerConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed JSON or wrong field types.
    /// - `ConfigError::Invalid` when validation fails.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compact_breakpoint == 0 {
            return Err(ConfigError::Invalid(
                "compact_breakpoint must be positive".to_string(),
            ));
        }
        if self
            .recognized_regions
            .iter()
            .all(|name| name.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "recognized_regions must name at least one container".to_string(),
            ));
        }
        Ok(())
    }

    pub fn message_clear_delay(&self) -> Duration {
        Duration::from_millis(self.message_clear_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ControllerConfig, DEFAULT_COMPACT_BREAKPOINT};

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ControllerConfig::from_json_str(r#"{"message_clear_delay_ms": 500}"#).unwrap();
        assert_eq!(config.message_clear_delay_ms, 500);
        assert_eq!(config.compact_breakpoint, DEFAULT_COMPACT_BREAKPOINT);
        assert_eq!(config.recognized_regions.len(), 3);
    }

    #[test]
    fn rejects_zero_breakpoint_and_empty_regions() {
        let err = ControllerConfig::from_json_str(r#"{"compact_breakpoint": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ControllerConfig::from_json_str(r#"{"recognized_regions": [" "]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ControllerConfig::from_json_str("{compact").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
