//! # Provider Registry
//!
//! Selects the provider implementation for a strategy identifier.

use crate::provider::BlobStorageProvider;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn BlobStorageProvider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider. Providers are consulted in registration order.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn BlobStorageProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// First provider that supports `strategy`
    #[must_use]
    pub fn select(&self, strategy: &str) -> Option<Arc<dyn BlobStorageProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.supports_strategy(strategy))
            .map(Arc::clone)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.get_name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::BlobStorage;
    use crate::provider::{
        BlobStorageDeploymentDetails, BlobStorageInstance, InMemorySecretStore,
        OpenShiftBlobStorageProvider, ProviderError,
    };
    use async_trait::async_trait;
    use std::time::Duration;

    #[derive(Debug)]
    struct ManagedProvider;

    #[async_trait]
    impl BlobStorageProvider for ManagedProvider {
        fn get_name(&self) -> &'static str {
            "managed-blobstorage"
        }

        fn supports_strategy(&self, strategy: &str) -> bool {
            strategy == "managed"
        }

        fn get_reconcile_time(&self, _bs: &BlobStorage) -> Duration {
            Duration::from_secs(30)
        }

        async fn create_storage(
            &self,
            _bs: &BlobStorage,
        ) -> Result<(BlobStorageInstance, Duration), ProviderError> {
            Ok((
                BlobStorageInstance::new(BlobStorageDeploymentDetails::placeholder()),
                Duration::from_secs(30),
            ))
        }
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new()
            .with_provider(Arc::new(OpenShiftBlobStorageProvider::new(Arc::new(
                InMemorySecretStore::new(),
            ))))
            .with_provider(Arc::new(ManagedProvider))
    }

    #[test]
    fn test_select_by_strategy() {
        let registry = registry();
        assert_eq!(
            registry.select("openshift").map(|p| p.get_name()),
            Some("openshift-blobstorage")
        );
        assert_eq!(
            registry.select("managed").map(|p| p.get_name()),
            Some("managed-blobstorage")
        );
    }

    #[test]
    fn test_select_unknown_strategy() {
        assert!(registry().select("aws").is_none());
        assert!(ProviderRegistry::new().select("openshift").is_none());
    }

    #[test]
    fn test_names_in_registration_order() {
        assert_eq!(
            registry().names(),
            vec!["openshift-blobstorage", "managed-blobstorage"]
        );
    }
}
