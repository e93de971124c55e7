//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use crate::constants::*;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

/// Output format for controller logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("text") {
            LogFormat::Text
        } else {
            LogFormat::Json
        }
    }
}

/// Controller-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Requeue interval after a non-retryable reconciliation problem (seconds)
    pub reconciliation_error_requeue_secs: u64,
    /// Fibonacci backoff minimum (seconds)
    pub backoff_min_secs: u64,
    /// Fibonacci backoff maximum (seconds)
    pub backoff_max_secs: u64,
    /// Timeout for a single object store request (seconds, 0 disables)
    pub store_request_timeout_secs: u64,
    /// Delay before restarting the watch stream after it ends (seconds)
    pub watch_restart_delay_secs: u64,
    /// Strategy used when a resource's type has no explicit mapping
    pub default_strategy: String,
    /// Deployment type to strategy mapping
    /// Format: `type=strategy` pairs separated by commas, e.g. "workshop=openshift,managed=aws"
    pub strategy_map: BTreeMap<String, String>,
    /// Namespace to watch. `None` watches all namespaces.
    pub watch_namespace: Option<String>,
    /// HTTP port for metrics and probes
    pub metrics_port: u16,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: LogFormat,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            reconciliation_error_requeue_secs: DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
            backoff_min_secs: DEFAULT_BACKOFF_MIN_SECS,
            backoff_max_secs: DEFAULT_BACKOFF_MAX_SECS,
            store_request_timeout_secs: DEFAULT_STORE_REQUEST_TIMEOUT_SECS,
            watch_restart_delay_secs: DEFAULT_WATCH_RESTART_DELAY_SECS,
            default_strategy: OPENSHIFT_STRATEGY.to_string(),
            strategy_map: BTreeMap::new(),
            watch_namespace: None,
            metrics_port: DEFAULT_METRICS_PORT,
            log_level: "INFO".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str, default: u64| -> u64 {
            match lookup(key) {
                Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                    warn!("Ignoring invalid value '{}' for {}, using {}", raw, key, default);
                    default
                }),
                None => default,
            }
        };

        let metrics_port = match lookup("METRICS_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "Ignoring invalid METRICS_PORT '{}', using {}",
                    raw, defaults.metrics_port
                );
                defaults.metrics_port
            }),
            None => defaults.metrics_port,
        };

        Self {
            reconciliation_error_requeue_secs: parsed(
                "RECONCILIATION_ERROR_REQUEUE_SECS",
                defaults.reconciliation_error_requeue_secs,
            ),
            backoff_min_secs: parsed("BACKOFF_MIN_SECS", defaults.backoff_min_secs),
            backoff_max_secs: parsed("BACKOFF_MAX_SECS", defaults.backoff_max_secs),
            store_request_timeout_secs: parsed(
                "STORE_REQUEST_TIMEOUT_SECS",
                defaults.store_request_timeout_secs,
            ),
            watch_restart_delay_secs: parsed(
                "WATCH_RESTART_DELAY_SECS",
                defaults.watch_restart_delay_secs,
            ),
            default_strategy: lookup("DEFAULT_STRATEGY")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.default_strategy),
            strategy_map: lookup("BLOB_STORAGE_STRATEGY_MAP")
                .map(|raw| parse_strategy_map(&raw))
                .unwrap_or_default(),
            watch_namespace: lookup("WATCH_NAMESPACE")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            metrics_port,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT")
                .map_or(defaults.log_format, |raw| LogFormat::parse(raw.trim())),
        }
    }

    /// Strategy for a resource's deployment type
    #[must_use]
    pub fn strategy_for(&self, deployment_type: &str) -> &str {
        self.strategy_map
            .get(deployment_type)
            .map_or(self.default_strategy.as_str(), String::as_str)
    }

    pub fn reconciliation_error_requeue_duration(&self) -> Duration {
        Duration::from_secs(self.reconciliation_error_requeue_secs)
    }

    pub fn store_request_timeout(&self) -> Duration {
        Duration::from_secs(self.store_request_timeout_secs)
    }

    pub fn watch_restart_delay_duration(&self) -> Duration {
        Duration::from_secs(self.watch_restart_delay_secs)
    }
}

/// Parse `type=strategy` pairs separated by commas
///
/// Malformed entries are skipped with a warning.
pub fn parse_strategy_map(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parsed = entry
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .filter(|(k, v)| !k.is_empty() && !v.is_empty());
            if parsed.is_none() {
                warn!("Skipping malformed strategy mapping '{}'", entry);
            }
            parsed.map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect()
}
