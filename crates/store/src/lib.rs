//! Secret-store abstraction for secretcfg
//!
//! The loader treats the remote secret store as an opaque collaborator: it
//! lists secrets under a project and fetches individual version payloads.
//! Authentication, transport, retries, and pagination all belong to the
//! implementation behind [`SecretStore`].
//!
//! Two implementations ship with secretcfg:
//!
//! - [`MemoryStore`] - in-memory, for tests and offline development
//! - `GcloudStore` (in the `secretcfg-gcloud` crate) - Google Secret
//!   Manager via the `gcloud` CLI

mod memory;
mod payload;
pub mod resource;

pub use memory::MemoryStore;
pub use payload::SecretPayload;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Error types for secret-store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Listing secrets under a parent failed
    #[error("Failed to list secrets under '{parent}': {message}")]
    ListFailed {
        /// Parent resource name the listing targeted
        parent: String,
        /// Error message from the store
        message: String,
    },

    /// Fetching a secret version's payload failed
    #[error("Failed to access secret version '{name}': {message}")]
    AccessFailed {
        /// Full version resource name
        name: String,
        /// Error message from the store
        message: String,
    },

    /// A resource name did not have the expected shape
    #[error("Invalid secret resource name: '{name}'")]
    InvalidResourceName {
        /// The rejected resource name
        name: String,
    },
}

/// Descriptor of a secret returned by a listing call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SecretInfo {
    /// Fully qualified resource name, `projects/<project>/secrets/<name>`.
    pub name: String,

    /// Labels attached to the secret, if any.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl SecretInfo {
    /// Create a descriptor from a fully qualified resource name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: HashMap::new(),
        }
    }

    /// The short secret name: the last segment of the resource name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or("")
    }
}

/// Trait for the remote secret store the loader reads from.
///
/// Implementors must provide:
/// - [`list_secrets`](SecretStore::list_secrets) - enumerate secrets under a project
/// - [`access_secret_version`](SecretStore::access_secret_version) - fetch one version's payload
/// - [`provider_name`](SecretStore::provider_name) - provider identifier for logging
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Get the provider name for this store.
    ///
    /// Examples: `"gcloud"`, `"memory"`
    fn provider_name(&self) -> &'static str;

    /// List the secrets under `parent` (`projects/<project>`).
    ///
    /// `filter` is a server-side filter expression forwarded verbatim; `None`
    /// lists everything. Implementations drain all result pages before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ListFailed`] when the store rejects the call,
    /// or [`StoreError::InvalidResourceName`] when `parent` is malformed.
    async fn list_secrets(
        &self,
        parent: &str,
        filter: Option<&str>,
    ) -> Result<Vec<SecretInfo>, StoreError>;

    /// Fetch one secret version's payload.
    ///
    /// `name` is a full version resource name,
    /// `projects/<project>/secrets/<secret>/versions/<version>`. `Ok(None)`
    /// means the version answered without a payload; callers treat that the
    /// same as an empty payload and skip the write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AccessFailed`] when the version does not exist
    /// or the store rejects the call.
    async fn access_secret_version(&self, name: &str)
    -> Result<Option<SecretPayload>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        let info = SecretInfo::new("projects/my-project/secrets/db-password");
        assert_eq!(info.short_name(), "db-password");
    }

    #[test]
    fn test_short_name_without_separators() {
        let info = SecretInfo::new("bare-name");
        assert_eq!(info.short_name(), "bare-name");
    }

    #[test]
    fn test_short_name_empty() {
        let info = SecretInfo::new("");
        assert_eq!(info.short_name(), "");
    }

    #[test]
    fn test_store_error_messages() {
        let err = StoreError::ListFailed {
            parent: "projects/p".to_string(),
            message: "permission denied".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("projects/p"));
        assert!(msg.contains("permission denied"));

        let err = StoreError::AccessFailed {
            name: "projects/p/secrets/s/versions/latest".to_string(),
            message: "not found".to_string(),
        };
        assert!(err.to_string().contains("versions/latest"));
    }

    #[test]
    fn test_secret_info_deserializes_with_unknown_fields() {
        let json = r#"{
            "name": "projects/p/secrets/s",
            "labels": {"team": "platform"},
            "createTime": "2024-01-01T00:00:00Z"
        }"#;
        let info: SecretInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.short_name(), "s");
        assert_eq!(info.labels.get("team").map(String::as_str), Some("platform"));
    }
}
