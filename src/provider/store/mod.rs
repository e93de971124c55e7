//! # Secret Stores
//!
//! Object store abstraction used by providers to persist connection secrets.
//!
//! - `kubernetes`: Kubernetes `Secret` objects through the API server
//! - `memory`: in-memory store for tests and local runs

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

mod kubernetes;
mod memory;

pub use kubernetes::KubeSecretStore;
pub use memory::InMemorySecretStore;

/// Key/value contents of a secret
pub type SecretData = BTreeMap<String, Vec<u8>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("secret {namespace}/{name} already exists")]
    AlreadyExists { namespace: String, name: String },
    #[error("secret {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },
    #[error("Kubernetes API request failed: {0}")]
    Api(#[from] kube::Error),
    #[error("request did not complete within {0:?}")]
    Timeout(Duration),
    #[error("object store unavailable: {0}")]
    Unavailable(String),
}

/// Get/create/update access to namespaced secrets
///
/// Implementations must be safe to share between concurrent reconciliations.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret's data. `Ok(None)` means the secret does not exist.
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<SecretData>, StoreError>;

    /// Create a secret that does not exist yet
    async fn create(&self, namespace: &str, name: &str, data: SecretData)
        -> Result<(), StoreError>;

    /// Write `data` into an existing secret
    ///
    /// Keys in `data` are set; keys absent from `data` are left as stored.
    async fn update(&self, namespace: &str, name: &str, data: SecretData)
        -> Result<(), StoreError>;
}
