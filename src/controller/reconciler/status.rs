//! # Status Management
//!
//! Computing and patching the BlobStorage status subresource.

use crate::constants::FIELD_MANAGER;
use crate::crd::{BlobStorage, BlobStorageStatus, Phase, SecretRef};
use kube::api::{Api, Patch, PatchParams};
use kube::Client;
use tracing::debug;

/// Status the resource should carry after this reconciliation
///
/// Fields left unknown by the outcome (the secret ref of a failed attempt, for
/// instance) are carried over from the current status.
#[must_use]
pub fn desired_status(
    bs: &BlobStorage,
    phase: Phase,
    message: impl Into<String>,
    secret_ref: Option<SecretRef>,
    strategy: &str,
    provider: Option<&str>,
) -> BlobStorageStatus {
    let current = bs.status.as_ref();
    BlobStorageStatus {
        phase: Some(phase),
        message: Some(message.into()),
        secret_ref: secret_ref.or_else(|| current.and_then(|s| s.secret_ref.clone())),
        strategy: Some(strategy.to_string()),
        provider: provider
            .map(str::to_string)
            .or_else(|| current.and_then(|s| s.provider.clone())),
        observed_generation: bs.metadata.generation,
        last_reconcile_time: Some(chrono::Utc::now().to_rfc3339()),
    }
}

/// Whether patching `desired` would change anything observable
///
/// The reconcile timestamp is ignored so a steady resource is not rewritten on
/// every periodic requeue.
#[must_use]
pub fn status_changed(current: Option<&BlobStorageStatus>, desired: &BlobStorageStatus) -> bool {
    let Some(current) = current else {
        return true;
    };
    current.phase != desired.phase
        || current.message != desired.message
        || current.secret_ref != desired.secret_ref
        || current.strategy != desired.strategy
        || current.provider != desired.provider
        || current.observed_generation != desired.observed_generation
}

/// Write `status` to the resource's status subresource
pub async fn patch_status(
    client: &Client,
    bs: &BlobStorage,
    status: &BlobStorageStatus,
) -> Result<(), kube::Error> {
    let name = bs.metadata.name.as_deref().unwrap_or("unknown");
    let Some(namespace) = bs.metadata.namespace.as_deref() else {
        debug!("BlobStorage {} has no namespace, skipping status update", name);
        return Ok(());
    };

    let api: Api<BlobStorage> = Api::namespaced(client.clone(), namespace);
    let patch = serde_json::json!({ "status": status });

    match api
        .patch_status(name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(patch))
        .await
    {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(api_err)) if api_err.code == 404 => {
            debug!(
                "BlobStorage {}/{} was deleted during reconciliation, skipping status update",
                namespace, name
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}
