//! # Configuration
//!
//! Operator settings loaded from environment variables.
//! Environment variables are populated from a ConfigMap using `envFrom` in the deployment.

mod controller;

pub use controller::{parse_strategy_map, ControllerConfig, LogFormat};
