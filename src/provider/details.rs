//! # Deployment Details
//!
//! Typed projection of a blob storage connection secret.

use crate::constants::PLACEHOLDER;
use crate::provider::store::SecretData;

/// Secret key holding the bucket name
pub const DETAILS_BUCKET_NAME: &str = "bucketName";
/// Secret key holding the bucket region
pub const DETAILS_BUCKET_REGION: &str = "bucketRegion";
/// Secret key holding the access key id
pub const DETAILS_CREDENTIAL_KEY_ID: &str = "credentialKeyID";
/// Secret key holding the secret access key
pub const DETAILS_CREDENTIAL_SECRET_KEY: &str = "credentialSecretKey";

/// The four keys every blob storage connection secret carries
pub const DETAILS_KEYS: [&str; 4] = [
    DETAILS_BUCKET_NAME,
    DETAILS_BUCKET_REGION,
    DETAILS_CREDENTIAL_KEY_ID,
    DETAILS_CREDENTIAL_SECRET_KEY,
];

/// Connection details for a blob storage bucket
///
/// Every field is always populated: either with the value read from the
/// secret or with [`PLACEHOLDER`].
#[derive(Clone, PartialEq, Eq)]
pub struct BlobStorageDeploymentDetails {
    pub bucket_name: String,
    pub bucket_region: String,
    pub credential_key_id: String,
    pub credential_secret_key: String,
}

impl std::fmt::Debug for BlobStorageDeploymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStorageDeploymentDetails")
            .field("bucket_name", &self.bucket_name)
            .field("bucket_region", &self.bucket_region)
            .field("credential_key_id", &self.credential_key_id)
            .field("credential_secret_key", &"***")
            .finish()
    }
}

impl BlobStorageDeploymentDetails {
    /// Details with every field set to the placeholder
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            bucket_name: PLACEHOLDER.to_string(),
            bucket_region: PLACEHOLDER.to_string(),
            credential_key_id: PLACEHOLDER.to_string(),
            credential_secret_key: PLACEHOLDER.to_string(),
        }
    }

    /// Project a secret mapping onto the four detail fields
    ///
    /// Missing or empty keys read as the placeholder. Values that are not
    /// valid UTF-8 are decoded lossily; the stored bytes are not touched.
    #[must_use]
    pub fn from_data(data: &SecretData) -> Self {
        let field = |key: &str| {
            data.get(key)
                .filter(|value| !value.is_empty())
                .map_or_else(
                    || PLACEHOLDER.to_string(),
                    |value| String::from_utf8_lossy(value).into_owned(),
                )
        };

        Self {
            bucket_name: field(DETAILS_BUCKET_NAME),
            bucket_region: field(DETAILS_BUCKET_REGION),
            credential_key_id: field(DETAILS_CREDENTIAL_KEY_ID),
            credential_secret_key: field(DETAILS_CREDENTIAL_SECRET_KEY),
        }
    }

    /// Render the details as a secret mapping
    #[must_use]
    pub fn to_data(&self) -> SecretData {
        [
            (DETAILS_BUCKET_NAME, &self.bucket_name),
            (DETAILS_BUCKET_REGION, &self.bucket_region),
            (DETAILS_CREDENTIAL_KEY_ID, &self.credential_key_id),
            (DETAILS_CREDENTIAL_SECRET_KEY, &self.credential_secret_key),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.as_bytes().to_vec()))
        .collect()
    }

    /// Whether any field still holds the placeholder
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        [
            &self.bucket_name,
            &self.bucket_region,
            &self.credential_key_id,
            &self.credential_secret_key,
        ]
        .into_iter()
        .any(|value| value == PLACEHOLDER)
    }
}

/// Fill every missing or empty detail key with the placeholder
///
/// Keys that already hold a value are left byte-for-byte untouched, as are
/// keys outside [`DETAILS_KEYS`]. Returns the keys that were filled, in
/// [`DETAILS_KEYS`] order.
pub fn fill_placeholders(data: &mut SecretData) -> Vec<&'static str> {
    let mut filled = Vec::new();
    for key in DETAILS_KEYS {
        let present = data.get(key).is_some_and(|value| !value.is_empty());
        if !present {
            data.insert(key.to_string(), PLACEHOLDER.as_bytes().to_vec());
            filled.push(key);
        }
    }
    filled
}

/// Result of provisioning a blob storage resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobStorageInstance {
    pub deployment_details: BlobStorageDeploymentDetails,
}

impl BlobStorageInstance {
    #[must_use]
    pub fn new(deployment_details: BlobStorageDeploymentDetails) -> Self {
        Self { deployment_details }
    }
}
