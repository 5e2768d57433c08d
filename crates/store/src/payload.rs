//! Secret payloads with redacted output
//!
//! A fetched payload is decoded to text once at the store boundary and kept
//! behind [`secrecy::SecretString`] so Debug and Display output never leak
//! the value. Callers call [`SecretPayload::expose`] at the single point
//! where the value is written into the configuration tree.

use secrecy::{ExposeSecret, SecretString};

/// A secret version's payload, decoded to text.
#[derive(Clone)]
pub struct SecretPayload {
    inner: SecretString,
}

impl SecretPayload {
    /// Wrap an already-decoded payload value.
    #[must_use]
    pub fn new(value: String) -> Self {
        Self {
            inner: SecretString::from(value),
        }
    }

    /// Decode raw payload bytes as UTF-8 text.
    ///
    /// Invalid sequences are replaced rather than rejected; secret payloads
    /// written through this loader are always text.
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::new(String::from_utf8_lossy(data).into_owned())
    }

    /// Expose the payload for use.
    ///
    /// The caller must not log or persist the exposed value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }

    /// Length of the payload without exposing it.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Check whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl std::fmt::Display for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}
