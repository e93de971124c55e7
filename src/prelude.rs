//! # Prelude
//!
//! Re-exports commonly used types and traits.

pub use crate::crd::*;

pub use crate::provider::{
    BlobStorageDeploymentDetails, BlobStorageInstance, BlobStorageProvider, ProviderError,
    ProviderRegistry, SecretData, SecretStore, StoreError,
};

pub use crate::controller::reconciler::{reconcile, Reconciler, ReconcilerError};

pub use crate::config::ControllerConfig;
