//! # Provider Modules
//!
//! Blob storage providers and the pieces they share.
//!
//! Each provider implements `BlobStorageProvider` and is selected at runtime by
//! strategy identifier through the `ProviderRegistry`.

use crate::crd::{BlobStorage, SecretRef};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub mod details;
pub mod error;
pub mod openshift;
pub mod registry;
pub mod store;

pub use details::{BlobStorageDeploymentDetails, BlobStorageInstance};
pub use error::{ProviderError, StoreOperation};
pub use openshift::OpenShiftBlobStorageProvider;
pub use registry::ProviderRegistry;
pub use store::{InMemorySecretStore, KubeSecretStore, SecretData, SecretStore, StoreError};

/// Provider trait for blob storage backends
#[async_trait]
pub trait BlobStorageProvider: Send + Sync {
    /// Name recorded in the resource status as `provider`
    fn get_name(&self) -> &'static str;

    /// Whether this provider handles the given strategy identifier
    fn supports_strategy(&self, strategy: &str) -> bool;

    /// How long the controller should wait before reconciling the resource again
    fn get_reconcile_time(&self, bs: &BlobStorage) -> Duration;

    /// Ensure the connection-detail secret for `bs` exists and return its contents
    ///
    /// Returns the typed details together with the recommended re-check interval.
    async fn create_storage(
        &self,
        bs: &BlobStorage,
    ) -> Result<(BlobStorageInstance, Duration), ProviderError>;
}

/// Resolved location of a connection-detail secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretCoordinates {
    pub namespace: String,
    pub name: String,
}

impl SecretCoordinates {
    #[must_use]
    pub fn to_secret_ref(&self) -> SecretRef {
        SecretRef::new(&self.name, &self.namespace)
    }
}

impl std::fmt::Display for SecretCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Work out where the connection-detail secret for `bs` lives
///
/// A secret already recorded in the status wins over the spec, so a resource
/// keeps pointing at the secret it was first associated with. Empty namespaces
/// fall back to the resource's own namespace.
pub fn resolve_secret_coordinates(bs: &BlobStorage) -> Result<SecretCoordinates, ProviderError> {
    let resource_namespace = bs
        .metadata
        .namespace
        .as_deref()
        .filter(|ns| !ns.is_empty());

    let recorded = bs
        .status
        .as_ref()
        .and_then(|status| status.secret_ref.as_ref())
        .filter(|secret_ref| !secret_ref.name.is_empty());

    let (secret_ref, source) = match recorded {
        Some(secret_ref) => (secret_ref, "status"),
        None => {
            let secret_ref = bs
                .spec
                .secret_ref
                .as_ref()
                .filter(|secret_ref| !secret_ref.name.is_empty())
                .ok_or_else(|| {
                    ProviderError::InvalidConfiguration(
                        "spec.secretRef.name must be set".to_string(),
                    )
                })?;
            (secret_ref, "spec")
        }
    };

    let namespace = secret_ref
        .namespace()
        .or(resource_namespace)
        .ok_or_else(|| {
            ProviderError::InvalidConfiguration(format!(
                "no namespace for secret '{}': neither the secret reference nor the resource names one",
                secret_ref.name
            ))
        })?;

    debug!(
        secret.name = %secret_ref.name,
        secret.namespace = namespace,
        source,
        "Resolved blob storage secret coordinates"
    );

    Ok(SecretCoordinates {
        namespace: namespace.to_string(),
        name: secret_ref.name.clone(),
    })
}
