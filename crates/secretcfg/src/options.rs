//! Options for the secret loader

use secretcfg_config::DEFAULT_SCAN_ROOTS;
use secretcfg_store::SecretInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Destination path(s) for one mapped secret.
///
/// Deserializes from either a single string or a list of strings, so mapping
/// tables read naturally from JSON or YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PathSpec {
    /// A single destination path.
    One(String),
    /// Several destination paths receiving the same value.
    Many(Vec<String>),
}

impl PathSpec {
    /// The destination paths in declaration order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        match self {
            Self::One(path) => std::slice::from_ref(path),
            Self::Many(paths) => paths,
        }
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        Self::One(path.to_string())
    }
}

impl From<String> for PathSpec {
    fn from(path: String) -> Self {
        Self::One(path)
    }
}

impl From<Vec<String>> for PathSpec {
    fn from(paths: Vec<String>) -> Self {
        Self::Many(paths)
    }
}

impl From<&[&str]> for PathSpec {
    fn from(paths: &[&str]) -> Self {
        Self::Many(paths.iter().map(ToString::to_string).collect())
    }
}

/// Client-side predicate deciding whether a listed secret is loaded at all.
///
/// Runs after the server-side filter, against the full descriptor; a `false`
/// return skips the secret for both the mapping table and placeholder hits.
pub type SecretFilter = Arc<dyn Fn(&SecretInfo) -> bool + Send + Sync>;

/// Options for [`with_secrets`](crate::with_secrets).
#[derive(Clone)]
pub struct WithSecretsOptions {
    /// Project to load from; a bare identifier is prefixed with `projects/`.
    pub project: String,

    /// Server-side filter expression, forwarded verbatim to the store.
    pub filter: Option<String>,

    /// Client-side predicate; secrets it rejects are skipped entirely.
    pub secret_filter: Option<SecretFilter>,

    /// Short secret name to destination path(s).
    pub mapping: HashMap<String, PathSpec>,

    /// Short secret name to pinned version label for mapping-table fetches.
    /// Unpinned secrets fetch `latest`.
    pub versions: HashMap<String, String>,

    /// Root keys scanned for `{GoogleSecret:...}` placeholders.
    pub scan_roots: Vec<String>,

    /// When false, no store call is made and the configuration is returned
    /// unchanged.
    pub enabled: bool,

    /// When true, any store error is logged and the configuration as merged
    /// so far is returned instead of the error propagating.
    pub continue_on_error: bool,
}

impl WithSecretsOptions {
    /// Create options for a project with defaults everywhere else.
    #[must_use]
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            filter: None,
            secret_filter: None,
            mapping: HashMap::new(),
            versions: HashMap::new(),
            scan_roots: DEFAULT_SCAN_ROOTS.iter().map(ToString::to_string).collect(),
            enabled: true,
            continue_on_error: false,
        }
    }

    /// Set the server-side filter expression.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the client-side secret predicate.
    #[must_use]
    pub fn with_secret_filter(
        mut self,
        secret_filter: impl Fn(&SecretInfo) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.secret_filter = Some(Arc::new(secret_filter));
        self
    }

    /// Map a secret's short name to destination path(s).
    #[must_use]
    pub fn map_secret(mut self, secret: impl Into<String>, paths: impl Into<PathSpec>) -> Self {
        self.mapping.insert(secret.into(), paths.into());
        self
    }

    /// Pin the version fetched for a mapped secret.
    #[must_use]
    pub fn pin_version(mut self, secret: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(secret.into(), version.into());
        self
    }

    /// Replace the root keys scanned for placeholders.
    #[must_use]
    pub fn with_scan_roots(mut self, roots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scan_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable loading altogether.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Swallow store errors instead of propagating them.
    #[must_use]
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Version label to fetch for a mapped secret.
    pub(crate) fn mapped_version(&self, short_name: &str) -> &str {
        self.versions
            .get(short_name)
            .map_or(secretcfg_config::DEFAULT_VERSION, String::as_str)
    }

    /// Whether the client-side predicate accepts `secret`.
    pub(crate) fn passes_filter(&self, secret: &SecretInfo) -> bool {
        self.secret_filter.as_ref().is_none_or(|f| f(secret))
    }

    /// Parent resource name, prefixing `projects/` when not already present.
    pub(crate) fn parent(&self) -> String {
        if self.project.starts_with("projects/") {
            self.project.clone()
        } else {
            format!("projects/{}", self.project)
        }
    }
}

impl std::fmt::Debug for WithSecretsOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithSecretsOptions")
            .field("project", &self.project)
            .field("filter", &self.filter)
            .field("secret_filter", &self.secret_filter.as_ref().map(|_| "…"))
            .field("mapping", &self.mapping)
            .field("versions", &self.versions)
            .field("scan_roots", &self.scan_roots)
            .field("enabled", &self.enabled)
            .field("continue_on_error", &self.continue_on_error)
            .finish()
    }
}
