//! Error types for the secrets provider.
//!
//! Responsibilities:
//! - Define the error raised when a secrets source is misconfigured.
//!
//! Does NOT handle:
//! - Filesystem failures during a load. A missing directory, a vanished file or
//!   an unreadable file is logged and treated as "no entry", never surfaced.
//!
//! Invariants:
//! - Every variant names the offending setting.
//! - Error messages never include secret values.

use thiserror::Error;

/// Errors that can occur while configuring a secrets source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretsError {
    /// A required setting was absent or unusable.
    ///
    /// Raised synchronously while building a source, before any filesystem access.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfiguration {
        /// Name of the offending setting.
        field: &'static str,
        /// Human-readable reason.
        message: String,
    },
}

impl SecretsError {
    pub(crate) fn missing(field: &'static str) -> Self {
        SecretsError::InvalidConfiguration {
            field,
            message: "must be provided".to_string(),
        }
    }
}
