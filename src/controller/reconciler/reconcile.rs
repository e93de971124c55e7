//! # Reconciliation Logic
//!
//! Main reconciliation loop for BlobStorage resources.
//!
//! `evaluate` decides what should happen to a resource without touching the
//! API server; `reconcile` applies the decision and hands errors to the error
//! policy.

use crate::config::ControllerConfig;
use crate::constants::CREATION_SUCCESSFUL_MESSAGE;
use crate::controller::reconciler::status::{desired_status, patch_status, status_changed};
use crate::controller::reconciler::types::{
    resource_key, Reconciler, ReconcilerError, RequeueReason,
};
use crate::crd::{BlobStorage, BlobStorageStatus, Phase};
use crate::observability::metrics;
use crate::provider::{resolve_secret_coordinates, ProviderError, ProviderRegistry};
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn, Instrument};

/// What the controller should do next with a resource
#[derive(Debug)]
pub enum Decision {
    /// Leave the resource alone until it changes
    AwaitChange,
    /// Check the resource again after the interval
    Requeue {
        after: Duration,
        reason: RequeueReason,
    },
    /// Provisioning failed in a way retrying may fix; the error policy decides when
    Fail(ProviderError),
}

#[derive(Debug)]
pub struct ReconcileOutcome {
    /// Status to write, or `None` when the current one is already accurate
    pub status: Option<BlobStorageStatus>,
    pub decision: Decision,
}

/// Work out the status and next action for `bs`
pub async fn evaluate(
    bs: &BlobStorage,
    registry: &ProviderRegistry,
    config: &ControllerConfig,
) -> ReconcileOutcome {
    if bs.metadata.deletion_timestamp.is_some() {
        debug!("BlobStorage is being deleted, nothing to do");
        return ReconcileOutcome {
            status: None,
            decision: Decision::AwaitChange,
        };
    }

    let strategy = config.strategy_for(&bs.spec.r#type);

    let Some(provider) = registry.select(strategy) else {
        warn!(
            "No provider supports strategy '{}' (registered: {:?})",
            strategy,
            registry.names()
        );
        let desired = desired_status(
            bs,
            Phase::Failed,
            format!("unsupported deployment strategy: {strategy}"),
            None,
            strategy,
            None,
        );
        return ReconcileOutcome {
            status: changed(bs, desired),
            decision: Decision::Requeue {
                after: config.reconciliation_error_requeue_duration(),
                reason: RequeueReason::UnsupportedStrategy,
            },
        };
    };

    match provider.create_storage(bs).await {
        Ok((instance, interval)) => {
            debug!(
                "Provider {} returned {:?}",
                provider.get_name(),
                instance.deployment_details
            );
            let secret_ref = resolve_secret_coordinates(bs)
                .ok()
                .map(|coordinates| coordinates.to_secret_ref());
            let desired = desired_status(
                bs,
                Phase::Complete,
                CREATION_SUCCESSFUL_MESSAGE,
                secret_ref,
                strategy,
                Some(provider.get_name()),
            );
            ReconcileOutcome {
                status: changed(bs, desired),
                decision: Decision::Requeue {
                    after: interval,
                    reason: RequeueReason::Periodic,
                },
            }
        }
        Err(e) => {
            let desired = desired_status(
                bs,
                Phase::Failed,
                e.to_string(),
                None,
                strategy,
                Some(provider.get_name()),
            );
            let decision = if e.is_retryable() {
                Decision::Fail(e)
            } else {
                // Retrying will not help until the resource is edited
                warn!("BlobStorage cannot be provisioned as written: {}", e);
                Decision::Requeue {
                    after: config.reconciliation_error_requeue_duration(),
                    reason: RequeueReason::InvalidConfiguration,
                }
            };
            ReconcileOutcome {
                status: changed(bs, desired),
                decision,
            }
        }
    }
}

fn changed(bs: &BlobStorage, desired: BlobStorageStatus) -> Option<BlobStorageStatus> {
    status_changed(bs.status.as_ref(), &desired).then_some(desired)
}

/// Main reconciliation function
///
/// Errors are handled by `error_policy`, which applies per-resource backoff.
pub async fn reconcile(
    bs: Arc<BlobStorage>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let name = bs.metadata.name.as_deref().unwrap_or("unknown");
    let namespace = bs.metadata.namespace.as_deref();
    let key = resource_key(namespace, name);
    let span = info_span!(
        "controller.reconcile",
        resource.name = name,
        resource.namespace = namespace.unwrap_or_default()
    );

    async move {
        let start = Instant::now();
        metrics::increment_reconciliations();

        let outcome = evaluate(&bs, &ctx.registry, &ctx.config).await;

        if let Some(status) = &outcome.status {
            let phase = status.phase.map_or("unknown", |p| p.as_str());
            info!("Updating status: phase={}", phase);
            if let Err(e) = patch_status(&ctx.client, &bs, status).await {
                metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());
                return Err(ReconcilerError::Status(e));
            }
        }

        metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());

        match outcome.decision {
            Decision::AwaitChange => {
                ctx.backoff.clear(&key);
                Ok(Action::await_change())
            }
            Decision::Requeue { after, reason } => {
                // Only retryable failures keep a backoff entry
                ctx.backoff.clear(&key);
                metrics::increment_requeues_total(reason.as_str());
                debug!("Requeueing in {:?} ({})", after, reason);
                Ok(Action::requeue(after))
            }
            Decision::Fail(e) => Err(ReconcilerError::Provider(e)),
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{BlobStorageSpec, SecretRef};
    use crate::provider::{InMemorySecretStore, OpenShiftBlobStorageProvider};

    fn registry(store: &InMemorySecretStore) -> ProviderRegistry {
        ProviderRegistry::new().with_provider(Arc::new(OpenShiftBlobStorageProvider::new(
            Arc::new(store.clone()),
        )))
    }

    fn blob_storage(r#type: &str) -> BlobStorage {
        let mut bs = BlobStorage::new(
            "bs",
            BlobStorageSpec {
                secret_ref: Some(SecretRef {
                    name: "creds".to_string(),
                    namespace: None,
                }),
                r#type: r#type.to_string(),
                tier: "development".to_string(),
            },
        );
        bs.metadata.namespace = Some("ns".to_string());
        bs
    }

    #[tokio::test]
    async fn test_evaluate_success_sets_complete() {
        let store = InMemorySecretStore::new();
        let outcome = evaluate(
            &blob_storage("workshop"),
            &registry(&store),
            &ControllerConfig::default(),
        )
        .await;

        let status = outcome.status.expect("status should be written");
        assert_eq!(status.phase, Some(Phase::Complete));
        assert_eq!(status.message.as_deref(), Some("creation successful"));
        assert_eq!(status.secret_ref, Some(SecretRef::new("creds", "ns")));
        assert_eq!(status.provider.as_deref(), Some("openshift-blobstorage"));
        assert!(matches!(
            outcome.decision,
            Decision::Requeue { after, reason: RequeueReason::Periodic } if after == Duration::from_secs(10)
        ));
    }

    #[tokio::test]
    async fn test_evaluate_unsupported_strategy() {
        let store = InMemorySecretStore::new();
        let mut config = ControllerConfig::default();
        config
            .strategy_map
            .insert("managed".to_string(), "aws".to_string());

        let outcome = evaluate(&blob_storage("managed"), &registry(&store), &config).await;

        let status = outcome.status.expect("status should be written");
        assert_eq!(status.phase, Some(Phase::Failed));
        assert_eq!(
            status.message.as_deref(),
            Some("unsupported deployment strategy: aws")
        );
        assert!(matches!(
            outcome.decision,
            Decision::Requeue {
                reason: RequeueReason::UnsupportedStrategy,
                ..
            }
        ));
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_deleting_does_nothing() {
        let store = InMemorySecretStore::new();
        let mut bs = blob_storage("workshop");
        bs.metadata.deletion_timestamp =
            Some(serde_json::from_value(serde_json::json!("2024-01-01T00:00:00Z")).unwrap());

        let outcome = evaluate(&bs, &registry(&store), &ControllerConfig::default()).await;

        assert!(outcome.status.is_none());
        assert!(matches!(outcome.decision, Decision::AwaitChange));
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_provider_failure() {
        let store = InMemorySecretStore::new();
        store.fail_next_read("api server unavailable").await;

        let outcome = evaluate(
            &blob_storage("workshop"),
            &registry(&store),
            &ControllerConfig::default(),
        )
        .await;

        let status = outcome.status.expect("status should be written");
        assert_eq!(status.phase, Some(Phase::Failed));
        assert!(status
            .message
            .as_deref()
            .is_some_and(|m| m.contains("api server unavailable")));
        assert!(matches!(
            outcome.decision,
            Decision::Fail(ProviderError::Persistence { .. })
        ));
    }

    #[tokio::test]
    async fn test_evaluate_skips_unchanged_status() {
        let store = InMemorySecretStore::new();
        let registry = registry(&store);
        let config = ControllerConfig::default();
        let mut bs = blob_storage("workshop");

        let first = evaluate(&bs, &registry, &config).await;
        bs.status = first.status;

        let second = evaluate(&bs, &registry, &config).await;
        assert!(second.status.is_none());
    }

    #[tokio::test]
    async fn test_evaluate_invalid_configuration_requeues_without_backoff() {
        let store = InMemorySecretStore::new();
        let mut bs = blob_storage("workshop");
        bs.spec.secret_ref = None;
        let config = ControllerConfig::default();

        let outcome = evaluate(&bs, &registry(&store), &config).await;

        let status = outcome.status.expect("status should be written");
        assert_eq!(status.phase, Some(Phase::Failed));
        assert!(status
            .message
            .as_deref()
            .is_some_and(|m| m.starts_with("invalid configuration")));
        assert!(matches!(
            outcome.decision,
            Decision::Requeue {
                after,
                reason: RequeueReason::InvalidConfiguration,
            } if after == config.reconciliation_error_requeue_duration()
        ));
        assert_eq!(store.read_count(), 0);
    }
}
