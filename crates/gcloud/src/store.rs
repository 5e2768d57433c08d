//! Secret Manager store backed by the gcloud CLI

use async_trait::async_trait;
use secretcfg_store::resource::{parse_parent, parse_version_name};
use secretcfg_store::{SecretInfo, SecretPayload, SecretStore, StoreError};
use tokio::process::Command;

/// Google Secret Manager store using the `gcloud` CLI.
///
/// Listing runs `gcloud secrets list` with JSON output; fetching runs
/// `gcloud secrets versions access`. The CLI handles credentials and drains
/// result pages itself, so callers see the full listing in one call.
#[derive(Debug, Clone)]
pub struct GcloudStore {
    gcloud_bin: String,
}

impl Default for GcloudStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GcloudStore {
    /// Create a store invoking `gcloud` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gcloud_bin: "gcloud".to_string(),
        }
    }

    /// Create a store invoking a specific gcloud binary.
    #[must_use]
    pub fn with_binary(gcloud_bin: impl Into<String>) -> Self {
        Self {
            gcloud_bin: gcloud_bin.into(),
        }
    }

    /// Run the CLI and return stdout, mapping failures through `error`.
    async fn run(
        &self,
        args: &[&str],
        error: impl Fn(String) -> StoreError,
    ) -> Result<Vec<u8>, StoreError> {
        let output = Command::new(&self.gcloud_bin)
            .args(args)
            .output()
            .await
            .map_err(|e| error(format!("failed to execute gcloud CLI: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(error(format!("gcloud CLI failed: {}", stderr.trim())));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl SecretStore for GcloudStore {
    fn provider_name(&self) -> &'static str {
        "gcloud"
    }

    async fn list_secrets(
        &self,
        parent: &str,
        filter: Option<&str>,
    ) -> Result<Vec<SecretInfo>, StoreError> {
        let project = parse_parent(parent).ok_or_else(|| StoreError::InvalidResourceName {
            name: parent.to_string(),
        })?;

        let mut args = vec!["secrets", "list", "--project", project, "--format", "json"];
        if let Some(filter) = filter {
            args.push("--filter");
            args.push(filter);
        }

        let stdout = self
            .run(&args, |message| StoreError::ListFailed {
                parent: parent.to_string(),
                message,
            })
            .await?;

        let listed: Vec<SecretInfo> =
            serde_json::from_slice(&stdout).map_err(|e| StoreError::ListFailed {
                parent: parent.to_string(),
                message: format!("unexpected gcloud listing output: {e}"),
            })?;

        tracing::debug!(parent = %parent, count = listed.len(), "listed secrets via gcloud");
        Ok(listed)
    }

    async fn access_secret_version(
        &self,
        name: &str,
    ) -> Result<Option<SecretPayload>, StoreError> {
        let version_ref =
            parse_version_name(name).ok_or_else(|| StoreError::InvalidResourceName {
                name: name.to_string(),
            })?;

        let stdout = self
            .run(
                &[
                    "secrets",
                    "versions",
                    "access",
                    version_ref.version,
                    "--secret",
                    version_ref.secret,
                    "--project",
                    version_ref.project,
                ],
                |message| StoreError::AccessFailed {
                    name: name.to_string(),
                    message,
                },
            )
            .await?;

        let text = String::from_utf8_lossy(&stdout);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(SecretPayload::new(trimmed.to_string())))
    }
}
