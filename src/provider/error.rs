//! # Provider Errors
//!
//! Error types returned by blob storage providers.

use crate::provider::store::StoreError;
use thiserror::Error;

/// Object store call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Get,
    Create,
    Update,
}

impl StoreOperation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::Get => "get",
            StoreOperation::Create => "create",
            StoreOperation::Update => "update",
        }
    }
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The resource cannot be reconciled as written; no store call was made
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The object store rejected or failed a request
    #[error("failed to {operation} secret {namespace}/{name}: {source}")]
    Persistence {
        operation: StoreOperation,
        namespace: String,
        name: String,
        #[source]
        source: StoreError,
    },
}

impl ProviderError {
    /// Whether retrying without changing the resource could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Persistence { .. })
    }
}
