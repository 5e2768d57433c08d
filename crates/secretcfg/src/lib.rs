//! Augment runtime configuration with values from Google Secret Manager
//!
//! At application startup, [`with_secrets`] lists the secrets of a project,
//! selects the relevant ones, and writes their payloads into a nested
//! configuration tree. Secrets are selected two ways, independently:
//!
//! - a **mapping table** from short secret names to destination paths
//!   (`.` and `__` are equivalent separators)
//! - **placeholders** embedded in existing configuration strings,
//!   `{GoogleSecret:<name>}` or `{GoogleSecret:<name>:<version>}`
//!
//! ```ignore
//! use secretcfg::{GcloudStore, WithSecretsOptions, with_secrets};
//!
//! let options = WithSecretsOptions::new("my-project")
//!     .with_filter("labels.env=prod")
//!     .map_secret("db-password", "serverRuntimeConfig__db__password")
//!     .pin_version("db-password", "3");
//!
//! let config = with_secrets(&GcloudStore::new(), &options, config).await?;
//! ```
//!
//! The store behind the loader is the [`SecretStore`] trait; `GcloudStore`
//! talks to Google Secret Manager through the `gcloud` CLI, and
//! [`MemoryStore`] backs tests and offline development.

mod loader;
mod options;

pub use loader::{LoadError, with_secrets};
pub use options::{PathSpec, SecretFilter, WithSecretsOptions};

// Re-export the pieces callers need to build stores and configs.
pub use secretcfg_config::{
    ConfigTree, DEFAULT_SCAN_ROOTS, DEFAULT_VERSION, PlaceholderEntry, placeholders, set_value,
};
pub use secretcfg_store::{MemoryStore, SecretInfo, SecretPayload, SecretStore, StoreError};

#[cfg(feature = "gcloud")]
pub use secretcfg_gcloud::GcloudStore;
