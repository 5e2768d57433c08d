//! Google Secret Manager integration for secretcfg
//!
//! Provides [`GcloudStore`], a [`secretcfg_store::SecretStore`] backed by
//! the `gcloud` CLI. Authentication, transport, and listing pagination are
//! all the CLI's concern.

mod store;

pub use store::GcloudStore;
