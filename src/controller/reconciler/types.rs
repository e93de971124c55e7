//! # Types
//!
//! Core types for the reconciler.

use crate::config::ControllerConfig;
use crate::controller::backoff::FibonacciBackoff;
use crate::provider::{ProviderError, ProviderRegistry};
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("provider failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("failed to update BlobStorage status: {0}")]
    Status(#[from] kube::Error),
}

/// Why a resource is being requeued, used as the requeue metric label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequeueReason {
    /// Provisioned; check again after the provider's interval
    Periodic,
    /// No provider handles the resolved strategy
    UnsupportedStrategy,
    /// The resource cannot be provisioned as written
    InvalidConfiguration,
    /// A retryable failure, retried by the error policy
    ErrorBackoff,
}

impl RequeueReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RequeueReason::Periodic => "periodic",
            RequeueReason::UnsupportedStrategy => "unsupported-strategy",
            RequeueReason::InvalidConfiguration => "invalid-configuration",
            RequeueReason::ErrorBackoff => "error-backoff",
        }
    }
}

impl std::fmt::Display for RequeueReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backoff state for a specific resource
#[derive(Debug, Clone)]
pub struct BackoffState {
    pub backoff: FibonacciBackoff,
    pub error_count: u32,
}

impl BackoffState {
    #[must_use]
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            backoff: FibonacciBackoff::new(min_secs, max_secs),
            error_count: 0,
        }
    }

    pub fn increment_error(&mut self) {
        self.error_count += 1;
    }
}

/// Per-resource failure history, keyed by namespace/name
///
/// Entries exist only while a resource is failing.
#[derive(Debug, Clone)]
pub struct BackoffTracker {
    min_secs: u64,
    max_secs: u64,
    states: Arc<Mutex<HashMap<String, BackoffState>>>,
}

impl BackoffTracker {
    #[must_use]
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            min_secs,
            max_secs,
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Next retry delay and error count for a failing resource
    pub fn next(&self, resource_key: &str) -> (Duration, u32) {
        match self.states.lock() {
            Ok(mut states) => {
                let state = states
                    .entry(resource_key.to_string())
                    .or_insert_with(|| BackoffState::new(self.min_secs, self.max_secs));
                state.increment_error();
                (state.backoff.next_backoff(), state.error_count)
            }
            // A poisoned map only loses progression; retry at the floor
            Err(_) => (Duration::from_secs(self.min_secs.max(1)), 0),
        }
    }

    /// Drop the failure history of a resource
    pub fn clear(&self, resource_key: &str) {
        if let Ok(mut states) = self.states.lock() {
            states.remove(resource_key);
        }
    }

    /// Number of resources currently backing off
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.lock().map_or(0, |states| states.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared reconciliation context
#[derive(Clone)]
pub struct Reconciler {
    pub client: Client,
    pub registry: ProviderRegistry,
    pub config: ControllerConfig,
    pub backoff: BackoffTracker,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(client: Client, registry: ProviderRegistry, config: ControllerConfig) -> Self {
        let backoff = BackoffTracker::new(config.backoff_min_secs, config.backoff_max_secs);
        Self {
            client,
            registry,
            config,
            backoff,
        }
    }
}

/// Key used for per-resource bookkeeping
#[must_use]
pub fn resource_key(namespace: Option<&str>, name: &str) -> String {
    format!("{}/{}", namespace.unwrap_or_default(), name)
}
