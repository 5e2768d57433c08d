//! Top-level secret-loading orchestration

use crate::options::WithSecretsOptions;
use secretcfg_config::{ConfigTree, PlaceholderEntry, placeholders, set_value};
use secretcfg_store::{SecretStore, StoreError};
use thiserror::Error;

/// Error types for a loading run
#[derive(Debug, Error)]
pub enum LoadError {
    /// A store call failed during listing or fetching
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Augment `config` with secret values from `store`.
///
/// Two selection mechanisms run over the listed secrets, in listing order:
///
/// - mapping-table hits fetch once at the pinned version (default `latest`)
///   and write the decoded payload to every destination path
/// - placeholder hits fetch once per occurrence, at the occurrence's
///   version, and write to that occurrence's derived path
///
/// One secret may trigger both. Writes are order-dependent and the last
/// write wins on shared paths, so a mapping-table version and a placeholder
/// version targeting the same path can disagree; the placeholder write lands
/// last for a given secret.
///
/// Fetches resolve sequentially; empty or absent payloads are skipped
/// without a log line. With `continue_on_error` set, a store failure is
/// logged and the configuration as merged so far is returned.
///
/// # Errors
///
/// Returns [`LoadError::Store`] when listing or fetching fails and
/// `continue_on_error` is not set.
pub async fn with_secrets(
    store: &dyn SecretStore,
    options: &WithSecretsOptions,
    config: ConfigTree,
) -> Result<ConfigTree, LoadError> {
    if !options.enabled {
        return Ok(config);
    }

    let mut merged = config;
    match load_into(store, options, &mut merged).await {
        Ok(()) => {}
        Err(err) if options.continue_on_error => {
            tracing::error!(error = %err, "continuing with partially loaded secrets");
        }
        Err(err) => return Err(err),
    }
    Ok(merged)
}

async fn load_into(
    store: &dyn SecretStore,
    options: &WithSecretsOptions,
    merged: &mut ConfigTree,
) -> Result<(), LoadError> {
    let parent = options.parent();
    tracing::info!(
        parent = %parent,
        provider = store.provider_name(),
        "loading secrets into configuration"
    );

    let placeholder_entries = placeholders(merged, &options.scan_roots);
    let secrets = store
        .list_secrets(&parent, options.filter.as_deref())
        .await?;

    for secret in &secrets {
        let short_name = secret.short_name();
        if !options.passes_filter(secret) {
            tracing::debug!(secret = %short_name, "secret rejected by client-side filter");
            continue;
        }

        if let Some(path_spec) = options.mapping.get(short_name) {
            let version_name = format!(
                "{}/versions/{}",
                secret.name,
                options.mapped_version(short_name)
            );
            if let Some(payload) = store.access_secret_version(&version_name).await?
                && !payload.is_empty()
            {
                for path in path_spec.paths() {
                    set_value(merged, path, payload.expose());
                }
            }
        }

        for entry in matching(&placeholder_entries, short_name) {
            let version_name = format!("{}/versions/{}", secret.name, entry.secret_version);
            if let Some(payload) = store.access_secret_version(&version_name).await?
                && !payload.is_empty()
            {
                set_value(merged, &entry.path, payload.expose());
            }
        }
    }

    Ok(())
}

fn matching<'a>(
    entries: &'a [PlaceholderEntry],
    short_name: &'a str,
) -> impl Iterator<Item = &'a PlaceholderEntry> {
    entries.iter().filter(move |e| e.secret_name == short_name)
}
