//! # Constants
//!
//! Shared constants used throughout the operator.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Value written into any blob storage detail that has not been provisioned yet.
/// Consumers of the connection secret treat this as "not ready".
pub const PLACEHOLDER: &str = "REPLACE_ME";

/// Strategy identifier handled by the in-cluster (OpenShift) provider
pub const OPENSHIFT_STRATEGY: &str = "openshift";

/// Provider name recorded in `BlobStorage` status by the in-cluster provider
pub const OPENSHIFT_BLOB_STORAGE_PROVIDER_NAME: &str = "openshift-blobstorage";

/// Interval between successful reconciliations of a `BlobStorage` (seconds)
pub const DEFAULT_BLOB_STORAGE_RECONCILE_SECS: u64 = 10;

/// Status message for a resource whose secret is in place
pub const CREATION_SUCCESSFUL_MESSAGE: &str = "creation successful";

/// Field manager used for status patches and created secrets
pub const FIELD_MANAGER: &str = "cloud-resource-operator";

/// Label key applied to secrets created by the operator
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 5000;

/// Default requeue interval for reconciliation errors (seconds)
pub const DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS: u64 = 60;

/// Default Fibonacci backoff starting value (seconds)
pub const DEFAULT_BACKOFF_MIN_SECS: u64 = 1;

/// Default Fibonacci backoff maximum value (seconds)
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 60;

/// Default timeout for a single object store request (seconds, 0 disables)
pub const DEFAULT_STORE_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default delay before restarting the watch stream after it ends (seconds)
pub const DEFAULT_WATCH_RESTART_DELAY_SECS: u64 = 5;
