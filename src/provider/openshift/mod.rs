//! # OpenShift Blob Storage Provider
//!
//! In-cluster provider for the `openshift` strategy. No bucket is created;
//! the provider only materializes the connection secret so workloads can
//! mount it, filling every detail that has not been provisioned with the
//! placeholder.
//!
//! ## Merge policy
//!
//! - Secret missing: create it with all four detail keys set to the placeholder
//! - Secret present: keep every detail key that holds a value, fill the rest
//! - Nothing filled: no write
//!
//! Repeated passes over the same secret converge: once every key is filled
//! the provider only reads.

use crate::constants::{
    DEFAULT_BLOB_STORAGE_RECONCILE_SECS, OPENSHIFT_BLOB_STORAGE_PROVIDER_NAME, OPENSHIFT_STRATEGY,
};
use crate::crd::BlobStorage;
use crate::observability::metrics;
use crate::provider::details::{fill_placeholders, BlobStorageDeploymentDetails};
use crate::provider::store::{SecretData, SecretStore, StoreError};
use crate::provider::{
    resolve_secret_coordinates, BlobStorageInstance, BlobStorageProvider, ProviderError,
    SecretCoordinates, StoreOperation,
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Provider that keeps connection details in a secret inside the cluster
pub struct OpenShiftBlobStorageProvider {
    store: Arc<dyn SecretStore>,
    request_timeout: Option<Duration>,
}

impl std::fmt::Debug for OpenShiftBlobStorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenShiftBlobStorageProvider")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl OpenShiftBlobStorageProvider {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            request_timeout: None,
        }
    }

    /// Bound every store call by `timeout`. A zero duration disables the bound.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    async fn store_call<T, F>(
        &self,
        operation: StoreOperation,
        coordinates: &SecretCoordinates,
        call: F,
    ) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let result = match self.request_timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .unwrap_or_else(|_elapsed| Err(StoreError::Timeout(timeout))),
            None => call.await,
        };

        result.map_err(|source| ProviderError::Persistence {
            operation,
            namespace: coordinates.namespace.clone(),
            name: coordinates.name.clone(),
            source,
        })
    }

    async fn persist(
        &self,
        coordinates: &SecretCoordinates,
        existed: bool,
        data: SecretData,
        filled: &[&str],
    ) -> Result<(), ProviderError> {
        if !existed {
            self.store_call(
                StoreOperation::Create,
                coordinates,
                self.store
                    .create(&coordinates.namespace, &coordinates.name, data),
            )
            .await?;
            metrics::increment_secret_writes(StoreOperation::Create.as_str());
            info!(
                "Created blob storage secret {} with placeholder keys {:?}",
                coordinates, filled
            );
        } else if !filled.is_empty() {
            self.store_call(
                StoreOperation::Update,
                coordinates,
                self.store
                    .update(&coordinates.namespace, &coordinates.name, data),
            )
            .await?;
            metrics::increment_secret_writes(StoreOperation::Update.as_str());
            info!(
                "Filled missing keys {:?} in blob storage secret {}",
                filled, coordinates
            );
        } else {
            debug!("Blob storage secret {} is complete, no write needed", coordinates);
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStorageProvider for OpenShiftBlobStorageProvider {
    fn get_name(&self) -> &'static str {
        OPENSHIFT_BLOB_STORAGE_PROVIDER_NAME
    }

    fn supports_strategy(&self, strategy: &str) -> bool {
        strategy == OPENSHIFT_STRATEGY
    }

    fn get_reconcile_time(&self, _bs: &BlobStorage) -> Duration {
        Duration::from_secs(DEFAULT_BLOB_STORAGE_RECONCILE_SECS)
    }

    async fn create_storage(
        &self,
        bs: &BlobStorage,
    ) -> Result<(BlobStorageInstance, Duration), ProviderError> {
        let coordinates = resolve_secret_coordinates(bs)?;

        let existing = self
            .store_call(
                StoreOperation::Get,
                &coordinates,
                self.store.get(&coordinates.namespace, &coordinates.name),
            )
            .await?;

        let existed = existing.is_some();
        let mut data = existing.unwrap_or_default();
        let filled = fill_placeholders(&mut data);
        let details = BlobStorageDeploymentDetails::from_data(&data);

        self.persist(&coordinates, existed, data, &filled).await?;

        if details.has_placeholders() {
            debug!(
                "Blob storage secret {} still holds placeholder values",
                coordinates
            );
        }

        Ok((
            BlobStorageInstance::new(details),
            self.get_reconcile_time(bs),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{BlobStorageSpec, SecretRef};
    use crate::provider::store::InMemorySecretStore;

    fn provider(store: &InMemorySecretStore) -> OpenShiftBlobStorageProvider {
        OpenShiftBlobStorageProvider::new(Arc::new(store.clone()))
    }

    #[test]
    fn test_supports_strategy() {
        let provider = provider(&InMemorySecretStore::new());
        assert!(provider.supports_strategy("openshift"));
        assert!(!provider.supports_strategy("test"));
        assert!(!provider.supports_strategy("OpenShift"));
        assert!(!provider.supports_strategy(""));
    }

    #[test]
    fn test_reconcile_time_is_fixed() {
        let provider = provider(&InMemorySecretStore::new());
        assert_eq!(
            provider.get_reconcile_time(&BlobStorage::default()),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let provider = provider(&InMemorySecretStore::new()).with_request_timeout(Duration::ZERO);
        assert!(provider.request_timeout.is_none());
    }

    #[tokio::test]
    async fn test_invalid_configuration_makes_no_store_call() {
        let store = InMemorySecretStore::new();
        let mut bs = BlobStorage::new("test", BlobStorageSpec::default());
        bs.metadata.namespace = Some("test".to_string());

        let err = provider(&store).create_storage(&bs).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidConfiguration(_)));
        assert!(!err.is_retryable());
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn test_created_secret_lands_in_resource_namespace() {
        let store = InMemorySecretStore::new();
        let mut bs = BlobStorage::new(
            "test",
            BlobStorageSpec {
                secret_ref: Some(SecretRef {
                    name: "test-sec".to_string(),
                    namespace: None,
                }),
                ..Default::default()
            },
        );
        bs.metadata.namespace = Some("apps".to_string());

        let (_, requeue) = provider(&store).create_storage(&bs).await.unwrap();

        assert_eq!(requeue, Duration::from_secs(10));
        assert!(store.secret("apps", "test-sec").await.is_some());
    }
}
