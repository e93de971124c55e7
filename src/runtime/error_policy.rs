//! # Error Policy
//!
//! Backoff for failed reconciliations.

use crate::controller::reconciler::{resource_key, Reconciler, ReconcilerError, RequeueReason};
use crate::crd::BlobStorage;
use crate::observability::metrics;
use kube_runtime::controller::Action;
use std::sync::Arc;
use tracing::{error, info};

/// Handle reconciliation errors with Fibonacci backoff
///
/// Backoff state is tracked per resource so one failing resource does not slow
/// down the retries of another.
pub fn handle_reconciliation_error(
    obj: Arc<BlobStorage>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let name = obj.metadata.name.as_deref().unwrap_or("unknown");
    let namespace = obj.metadata.namespace.as_deref();

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.watch.reconciliation_error",
        resource.name = name,
        resource.namespace = namespace.unwrap_or_default(),
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {}: {}", name, error);
    metrics::increment_reconciliation_errors();

    let (delay, error_count) = ctx.backoff.next(&resource_key(namespace, name));

    info!(
        "Retrying with Fibonacci backoff: {}s (error count: {})",
        delay.as_secs(),
        error_count
    );

    metrics::increment_requeues_total(RequeueReason::ErrorBackoff.as_str());
    Action::requeue(delay)
}
