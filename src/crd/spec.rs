//! # BlobStorage Spec
//!
//! `BlobStorage` resource and the secret reference it carries.

use serde::{Deserialize, Serialize};

/// BlobStorage Custom Resource Definition
///
/// Requests a blob storage bucket and names the secret that will carry its
/// connection details.
///
/// # Example
///
/// ```yaml
/// apiVersion: integreatly.org/v1alpha1
/// kind: BlobStorage
/// metadata:
///   name: backups
///   namespace: my-app
/// spec:
///   type: workshop
///   tier: development
///   secretRef:
///     name: backups-blobstorage
/// ```
#[derive(
    kube::CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema,
)]
#[kube(
    kind = "BlobStorage",
    group = "integreatly.org",
    version = "v1alpha1",
    namespaced,
    status = "crate::crd::BlobStorageStatus",
    shortname = "bs",
    derive = "Default",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Phase", "type":"string", "jsonPath":".status.phase"}, {"name":"Strategy", "type":"string", "jsonPath":".status.strategy"}, {"name":"Secret", "type":"string", "jsonPath":".status.secretRef.name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct BlobStorageSpec {
    /// Where the connection-detail secret should live
    /// Namespace defaults to the BlobStorage namespace when empty
    #[serde(default)]
    pub secret_ref: Option<SecretRef>,
    /// Deployment type, mapped to a provider strategy by controller configuration
    /// Examples: "workshop", "managed"
    #[serde(default)]
    pub r#type: String,
    /// Tier of the requested storage (e.g., "development", "production")
    #[serde(default)]
    pub tier: String,
}

/// Reference to a Kubernetes secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretRef {
    /// Secret name
    pub name: String,
    /// Secret namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl SecretRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// Namespace if set and non-empty
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }
}

impl std::fmt::Display for SecretRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.namespace() {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_deserializes_camel_case() {
        let spec: BlobStorageSpec = serde_json::from_value(serde_json::json!({
            "type": "workshop",
            "tier": "development",
            "secretRef": { "name": "test-sec" }
        }))
        .unwrap();

        assert_eq!(spec.r#type, "workshop");
        assert_eq!(spec.tier, "development");
        assert_eq!(
            spec.secret_ref,
            Some(SecretRef {
                name: "test-sec".to_string(),
                namespace: None,
            })
        );
    }

    #[test]
    fn test_spec_defaults_when_fields_missing() {
        let spec: BlobStorageSpec = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(spec.secret_ref.is_none());
        assert!(spec.r#type.is_empty());
        assert!(spec.tier.is_empty());
    }

    #[test]
    fn test_secret_ref_empty_namespace_is_unset() {
        let secret_ref = SecretRef {
            name: "test".to_string(),
            namespace: Some(String::new()),
        };
        assert_eq!(secret_ref.namespace(), None);
        assert_eq!(secret_ref.to_string(), "test");
    }

    #[test]
    fn test_secret_ref_display() {
        assert_eq!(SecretRef::new("creds", "ns").to_string(), "ns/creds");
    }
}
