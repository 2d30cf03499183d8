//! Data models for the Vault KV SDK
//!
//! Response types map onto the JSON envelope Vault wraps every answer in:
//!
//! ```json
//! {"request_id": "...", "lease_id": "", "renewable": false, "lease_duration": 0,
//!  "data": {...}, "wrap_info": null, "warnings": null}
//! ```
//!
//! # Key Types
//!
//! * [`Secret`] - a decoded read: payload plus [`VersionMetadata`]
//! * [`WriteResult`] - the version a write created
//! * [`ListResult`] - immediate children of a metadata path
//! * [`DeleteResult`] - delete acknowledgement

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use time::OffsetDateTime;

/// Untyped secret payload: the fields stored under `data.data`
pub type SecretData = serde_json::Map<String, serde_json::Value>;

/// Response envelope shared by every Vault endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct VaultResponse<T> {
    /// Server-assigned request ID
    #[serde(default)]
    pub request_id: String,
    /// Lease ID, empty for KV secrets
    #[serde(default)]
    pub lease_id: String,
    /// Whether the lease is renewable
    #[serde(default)]
    pub renewable: bool,
    /// Lease duration in seconds
    #[serde(default)]
    pub lease_duration: u64,
    /// Endpoint specific payload
    pub data: Option<T>,
    /// Response wrapping information
    #[serde(default)]
    pub wrap_info: Option<serde_json::Value>,
    /// Non-fatal warnings
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// Metadata of a single secret version
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionMetadata {
    /// Version number, assigned by the server and increasing per path
    pub version: u64,
    /// When this version was written
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created_time: Option<OffsetDateTime>,
    /// When this version was soft-deleted, `None` if it is live
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub deletion_time: Option<OffsetDateTime>,
    /// Whether this version was permanently destroyed
    #[serde(default)]
    pub destroyed: bool,
    /// User supplied metadata attached to the secret
    #[serde(default)]
    pub custom_metadata: Option<HashMap<String, String>>,
}

impl VersionMetadata {
    /// Whether the version is soft-deleted or destroyed
    pub fn is_deleted(&self) -> bool {
        self.destroyed || self.deletion_time.is_some()
    }
}

/// A secret read from the store
///
/// `T` defaults to [`SecretData`]; use [`Client::read_as`](crate::Client::read_as)
/// to decode into a caller-defined type. The payload is not printed by `Debug`.
///
/// # Example
///
/// ```no_run
/// # use vault_kv_sdk::Client;
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let secret = client.read("secret/data/test").await?;
/// if let Some(value) = secret.data.get("key") {
///     println!("key = {} (v{})", value, secret.version());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Secret<T = SecretData> {
    /// Logical path that was read
    pub path: String,
    /// Secret fields
    pub data: T,
    /// Version metadata
    pub metadata: VersionMetadata,
    /// Server-assigned request ID
    pub request_id: String,
    /// Non-fatal warnings
    pub warnings: Vec<String>,
}

impl<T> Secret<T> {
    /// Version number of the returned data
    pub fn version(&self) -> u64 {
        self.metadata.version
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("path", &self.path)
            .field("data", &"****")
            .field("metadata", &self.metadata)
            .field("request_id", &self.request_id)
            .finish()
    }
}

/// Result of a write
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Metadata of the version the write created
    pub metadata: VersionMetadata,
    /// Server-assigned request ID
    pub request_id: String,
    /// Non-fatal warnings
    pub warnings: Vec<String>,
}

impl WriteResult {
    /// Version number assigned by the write
    pub fn version(&self) -> u64 {
        self.metadata.version
    }
}

/// Result of a list
#[derive(Debug, Clone, Default)]
pub struct ListResult {
    /// Child key names in server order; sub-collections end with `/`
    pub keys: Vec<String>,
    /// Server-assigned request ID, empty when the path had no children
    pub request_id: String,
}

impl ListResult {
    /// Whether the listed path had no children
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Result of a delete
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// False when the server reported the path absent
    pub deleted: bool,
    /// `X-Request-ID` echoed by a proxy in front of the server.
    ///
    /// Vault answers a delete with an empty 204, so this is `None` unless a
    /// proxy or load balancer adds the header.
    pub request_id: Option<String>,
}

/// `data` of a KV v2 read
#[derive(Debug, Deserialize)]
pub(crate) struct KvData<T> {
    pub data: Option<T>,
    pub metadata: VersionMetadata,
}

/// `data` of a list
#[derive(Debug, Default, Deserialize)]
pub(crate) struct KvKeys {
    #[serde(default)]
    pub keys: Vec<String>,
}

/// RFC 3339 timestamps where Vault uses `""` for "not set"
mod timestamp {
    use serde::{Deserialize, Deserializer};
    use time::{format_description::well_known::Rfc3339, OffsetDateTime};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => OffsetDateTime::parse(s, &Rfc3339)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
