//! # Reconciler
//!
//! Core reconciliation logic for `BlobStorage` resources.
//!
//! ## Reconciliation Flow
//!
//! 1. Skip resources that are being deleted
//! 2. Map the resource's deployment type to a strategy and select a provider
//! 3. Ask the provider to ensure the connection-detail secret exists
//! 4. Update status when the outcome differs from what is recorded
//! 5. Requeue after the provider's interval, or fail into the error policy

pub mod reconcile;
pub mod status;
pub mod types;

pub use reconcile::{evaluate, reconcile, Decision, ReconcileOutcome};
pub use status::{desired_status, patch_status, status_changed};
pub use types::{
    resource_key, BackoffState, BackoffTracker, Reconciler, ReconcilerError, RequeueReason,
};
