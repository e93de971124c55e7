//! # BlobStorage Status
//!
//! Status types for tracking the provisioning lifecycle.

use crate::crd::SecretRef;
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a cloud resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum Phase {
    #[serde(rename = "initialising")]
    Initialising,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "deleting")]
    Deleting,
    #[serde(rename = "complete")]
    Complete,
    #[serde(rename = "failed")]
    Failed,
}

impl Phase {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Initialising => "initialising",
            Phase::InProgress => "in progress",
            Phase::Deleting => "deleting",
            Phase::Complete => "complete",
            Phase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of the BlobStorage resource
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlobStorageStatus {
    /// Current lifecycle phase
    #[serde(default)]
    pub phase: Option<Phase>,
    /// Human-readable description of the current state
    #[serde(default)]
    pub message: Option<String>,
    /// Secret holding the connection details, once one has been associated
    #[serde(default)]
    pub secret_ref: Option<SecretRef>,
    /// Strategy that handled this resource (e.g., "openshift")
    #[serde(default)]
    pub strategy: Option<String>,
    /// Provider implementation that handled this resource
    #[serde(default)]
    pub provider: Option<String>,
    /// Observed generation
    #[serde(default)]
    pub observed_generation: Option<i64>,
    /// Last reconciliation time (RFC3339)
    #[serde(default)]
    pub last_reconcile_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_wire_values() {
        assert_eq!(
            serde_json::to_value(Phase::InProgress).unwrap(),
            serde_json::json!("in progress")
        );
        let phase: Phase = serde_json::from_value(serde_json::json!("complete")).unwrap();
        assert_eq!(phase, Phase::Complete);
    }

    #[test]
    fn test_phase_display_matches_wire_value() {
        for phase in [
            Phase::Initialising,
            Phase::InProgress,
            Phase::Deleting,
            Phase::Complete,
            Phase::Failed,
        ] {
            assert_eq!(
                serde_json::to_value(phase).unwrap(),
                serde_json::json!(phase.to_string())
            );
        }
    }

    #[test]
    fn test_status_round_trips_secret_ref() {
        let status: BlobStorageStatus = serde_json::from_value(serde_json::json!({
            "phase": "complete",
            "secretRef": { "name": "test", "namespace": "test" }
        }))
        .unwrap();

        assert_eq!(status.phase, Some(Phase::Complete));
        assert_eq!(status.secret_ref, Some(SecretRef::new("test", "test")));
        assert!(status.strategy.is_none());
    }
}
