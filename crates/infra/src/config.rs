//! Configuration loading and representation.

use thiserror::Error;

pub const AGGREGATE_TYPE_VAR: &str = "ORDERING_AGGREGATE_TYPE";
pub const PUBLISH_EVENTS_VAR: &str = "ORDERING_PUBLISH_EVENTS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for [`OrderApplicationService`](crate::service::OrderApplicationService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Stream name stamped into published envelopes.
    pub aggregate_type: String,
    /// When false, drained events are discarded instead of published.
    pub publish_events: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            aggregate_type: "order".to_string(),
            publish_events: true,
        }
    }
}

impl ServiceConfig {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(AGGREGATE_TYPE_VAR) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::Invalid {
                    key: AGGREGATE_TYPE_VAR,
                    value,
                });
            }
            config.aggregate_type = trimmed.to_string();
        }

        if let Some(value) = lookup(PUBLISH_EVENTS_VAR) {
            config.publish_events = parse_bool(PUBLISH_EVENTS_VAR, value)?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
