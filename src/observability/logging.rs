//! # Logging
//!
//! Tracing subscriber setup for the operator binary.

use crate::config::{ControllerConfig, LogFormat};
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
///
/// `LOG_LEVEL` applies to this crate; dependencies stay at `warn`.
#[must_use]
pub fn default_filter(log_level: &str) -> String {
    format!(
        "warn,cloud_resource_operator={}",
        log_level.trim().to_lowercase()
    )
}

/// Install the global tracing subscriber
pub fn init_tracing(config: &ControllerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(&config.log_level)))
        .unwrap_or_else(|_| EnvFilter::new("cloud_resource_operator=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_lowercases_level() {
        assert_eq!(default_filter("DEBUG"), "warn,cloud_resource_operator=debug");
        assert!(EnvFilter::try_new(default_filter(" Info ")).is_ok());
    }
}
