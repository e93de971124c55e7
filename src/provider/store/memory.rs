//! # In-Memory Secret Store
//!
//! Ephemeral `SecretStore` used by tests and local runs.
//! Thread-safe using `Arc<RwLock>` for concurrent access.

use super::{SecretData, SecretStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// In-memory secret store keyed by (namespace, name)
///
/// Counts reads and successful writes, and can be primed to fail the next
/// read or write so error paths can be exercised deterministically.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretStore {
    secrets: Arc<RwLock<HashMap<(String, String), SecretData>>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    fail_next_read: Arc<Mutex<Option<String>>>,
    fail_next_write: Arc<Mutex<Option<String>>>,
}

fn key(namespace: &str, name: &str) -> (String, String) {
    (namespace.to_string(), name.to_string())
}

impl InMemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a secret without counting it as a write
    pub async fn insert(&self, namespace: &str, name: &str, data: SecretData) {
        self.secrets.write().await.insert(key(namespace, name), data);
    }

    /// Current contents of a secret
    pub async fn secret(&self, namespace: &str, name: &str) -> Option<SecretData> {
        self.secrets.read().await.get(&key(namespace, name)).cloned()
    }

    /// Number of secrets held
    pub async fn len(&self) -> usize {
        self.secrets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.secrets.read().await.is_empty()
    }

    /// Number of `get` calls served
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of successful `create` and `update` calls
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make the next `get` fail with `StoreError::Unavailable`
    pub async fn fail_next_read(&self, message: impl Into<String>) {
        *self.fail_next_read.lock().await = Some(message.into());
    }

    /// Make the next `create` or `update` fail with `StoreError::Unavailable`
    pub async fn fail_next_write(&self, message: impl Into<String>) {
        *self.fail_next_write.lock().await = Some(message.into());
    }

    async fn take_write_failure(&self) -> Result<(), StoreError> {
        match self.fail_next_write.lock().await.take() {
            Some(message) => Err(StoreError::Unavailable(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<SecretData>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_next_read.lock().await.take() {
            return Err(StoreError::Unavailable(message));
        }
        Ok(self.secret(namespace, name).await)
    }

    async fn create(
        &self,
        namespace: &str,
        name: &str,
        data: SecretData,
    ) -> Result<(), StoreError> {
        self.take_write_failure().await?;
        let mut secrets = self.secrets.write().await;
        let entry_key = key(namespace, name);
        if secrets.contains_key(&entry_key) {
            return Err(StoreError::AlreadyExists {
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        }
        secrets.insert(entry_key, data);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update(
        &self,
        namespace: &str,
        name: &str,
        data: SecretData,
    ) -> Result<(), StoreError> {
        self.take_write_failure().await?;
        let mut secrets = self.secrets.write().await;
        let Some(existing) = secrets.get_mut(&key(namespace, name)) else {
            return Err(StoreError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        };
        existing.extend(data);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
