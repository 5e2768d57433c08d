//! In-memory secret store

use crate::payload::SecretPayload;
use crate::resource::parse_version_name;
use crate::{SecretInfo, SecretStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory [`SecretStore`] for tests and offline development.
///
/// Secrets are registered up front with per-version payloads. Listing
/// returns every secret under the requested parent; server-side `filter`
/// expressions are accepted but not interpreted. Accessing an unknown secret
/// or version fails the way a remote store would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    secrets: Vec<MemorySecret>,
}

#[derive(Debug, Clone)]
struct MemorySecret {
    info: SecretInfo,
    versions: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload for `secret` under `project` at `version`.
    ///
    /// Repeated calls for the same secret add or replace versions.
    pub fn insert(
        &mut self,
        project: &str,
        secret: &str,
        version: &str,
        payload: impl Into<Vec<u8>>,
    ) -> &mut Self {
        let name = format!("projects/{project}/secrets/{secret}");
        let index = match self.secrets.iter().position(|s| s.info.name == name) {
            Some(index) => index,
            None => {
                self.secrets.push(MemorySecret {
                    info: SecretInfo::new(name),
                    versions: HashMap::new(),
                });
                self.secrets.len() - 1
            }
        };
        self.secrets[index]
            .versions
            .insert(version.to_string(), payload.into());
        self
    }

    /// Attach labels to an already-registered secret.
    pub fn label(&mut self, project: &str, secret: &str, key: &str, value: &str) -> &mut Self {
        let name = format!("projects/{project}/secrets/{secret}");
        if let Some(slot) = self.secrets.iter_mut().find(|s| s.info.name == name) {
            slot.info
                .labels
                .insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    async fn list_secrets(
        &self,
        parent: &str,
        _filter: Option<&str>,
    ) -> Result<Vec<SecretInfo>, StoreError> {
        let prefix = format!("{parent}/secrets/");
        Ok(self
            .secrets
            .iter()
            .filter(|s| s.info.name.starts_with(&prefix))
            .map(|s| s.info.clone())
            .collect())
    }

    async fn access_secret_version(
        &self,
        name: &str,
    ) -> Result<Option<SecretPayload>, StoreError> {
        let version_ref =
            parse_version_name(name).ok_or_else(|| StoreError::InvalidResourceName {
                name: name.to_string(),
            })?;
        let secret_name = format!(
            "projects/{}/secrets/{}",
            version_ref.project, version_ref.secret
        );
        self.secrets
            .iter()
            .find(|s| s.info.name == secret_name)
            .and_then(|s| s.versions.get(version_ref.version))
            .map(|data| Some(SecretPayload::from_bytes(data)))
            .ok_or_else(|| StoreError::AccessFailed {
                name: name.to_string(),
                message: "secret version not found".to_string(),
            })
    }
}
