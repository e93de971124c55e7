//! # Custom Resource Definitions
//!
//! CRD types for the cloud resource operator.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `BlobStorage` resource, its spec and the shared `SecretRef`
//! - `status.rs` - status and lifecycle phase types

mod spec;
mod status;

// Re-export all public types
pub use spec::{BlobStorage, BlobStorageSpec, SecretRef};
pub use status::{BlobStorageStatus, Phase};
