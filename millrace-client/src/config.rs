//! Starter configuration.
//!
//! Settings load from `MILLRACE_*` environment variables with defaults
//! suitable for local development, and are validated before use.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use millrace_core::BackoffPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Connection-level settings shared by every client operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Domain the workflow executions live in
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Task list new executions are scheduled on
    #[serde(default = "default_task_list")]
    pub task_list: String,

    /// Frontend endpoint; unused when a service is injected directly
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Identity reported on every request; generated when unset
    #[serde(default)]
    pub identity: Option<String>,
}

fn default_domain() -> String {
    "millrace-samples".to_string()
}

fn default_task_list() -> String {
    "hello-world".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:7833".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            task_list: default_task_list(),
            endpoint: default_endpoint(),
            identity: None,
        }
    }
}

/// Status polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Attempts before polling gives up
    #[serde(default = "default_maximum_attempts")]
    pub maximum_attempts: i32,

    /// First delay between attempts, in milliseconds
    #[serde(default = "default_base_interval_ms")]
    pub base_interval_ms: u64,

    /// Multiplier applied to the delay after every attempt
    #[serde(default = "default_backoff_coefficient")]
    pub backoff_coefficient: f64,

    /// Delay ceiling, in milliseconds
    #[serde(default = "default_maximum_interval_ms")]
    pub maximum_interval_ms: u64,
}

fn default_maximum_attempts() -> i32 {
    1000
}

fn default_base_interval_ms() -> u64 {
    1000
}

fn default_backoff_coefficient() -> f64 {
    2.0
}

fn default_maximum_interval_ms() -> u64 {
    300_000
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            maximum_attempts: default_maximum_attempts(),
            base_interval_ms: default_base_interval_ms(),
            backoff_coefficient: default_backoff_coefficient(),
            maximum_interval_ms: default_maximum_interval_ms(),
        }
    }
}

impl PollerConfig {
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            base_interval: Duration::from_millis(self.base_interval_ms),
            backoff_coefficient: self.backoff_coefficient,
            maximum_interval: Duration::from_millis(self.maximum_interval_ms),
            maximum_attempts: self.maximum_attempts,
        }
    }
}

/// Everything the starter binary needs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StarterConfig {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub poller: PollerConfig,
}

impl StarterConfig {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(domain) = std::env::var("MILLRACE_DOMAIN") {
            config.client.domain = domain;
        }
        if let Ok(task_list) = std::env::var("MILLRACE_TASK_LIST") {
            config.client.task_list = task_list;
        }
        if let Ok(endpoint) = std::env::var("MILLRACE_ENDPOINT") {
            config.client.endpoint = endpoint;
        }
        if let Ok(identity) = std::env::var("MILLRACE_IDENTITY") {
            config.client.identity = Some(identity);
        }
        if let Some(attempts) = parse_env("MILLRACE_MAX_POLL_ATTEMPTS")? {
            config.poller.maximum_attempts = attempts;
        }
        if let Some(base) = parse_env("MILLRACE_POLL_BASE_INTERVAL_MS")? {
            config.poller.base_interval_ms = base;
        }
        if let Some(cap) = parse_env("MILLRACE_POLL_MAXIMUM_INTERVAL_MS")? {
            config.poller.maximum_interval_ms = cap;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client.domain.is_empty() {
            return Err(ConfigError::MissingField("client.domain".to_string()));
        }

        if self.client.task_list.is_empty() {
            return Err(ConfigError::MissingField("client.task_list".to_string()));
        }

        if self.poller.maximum_attempts <= 0 {
            return Err(ConfigError::Invalid(
                "Poller maximum_attempts must be greater than 0".to_string(),
            ));
        }

        if self.poller.backoff_coefficient < 1.0 {
            return Err(ConfigError::Invalid(
                "Backoff coefficient must be >= 1.0".to_string(),
            ));
        }

        if self.poller.maximum_interval_ms < self.poller.base_interval_ms {
            return Err(ConfigError::Invalid(
                "Poller maximum_interval_ms must not be below base_interval_ms".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{} must be a number, got {:?}", key, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = StarterConfig::default();
        assert_eq!(config.poller.maximum_attempts, 1000);
        assert_eq!(config.poller.base_interval_ms, 1000);
        assert_eq!(config.poller.maximum_interval_ms, 300_000);
        assert_eq!(config.poller.backoff_coefficient, 2.0);
        assert_eq!(config.client.domain, "millrace-samples");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_deserializes_to_defaults() {
        let config: StarterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.poller.maximum_attempts, 1000);
        assert_eq!(config.client.task_list, "hello-world");
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = StarterConfig::default();
        config.poller.maximum_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_missing_domain() {
        let mut config = StarterConfig::default();
        config.client.domain.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_validate_rejects_cap_below_base() {
        let mut config = StarterConfig::default();
        config.poller.maximum_interval_ms = 500;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_backoff_policy_carries_configured_values() {
        let mut config = PollerConfig::default();
        config.maximum_attempts = 5;
        config.base_interval_ms = 250;
        config.maximum_interval_ms = 2000;

        let policy = config.backoff_policy();
        assert_eq!(policy.maximum_attempts, 5);
        assert_eq!(policy.base_interval, Duration::from_millis(250));
        assert_eq!(policy.maximum_interval, Duration::from_millis(2000));
    }
}
