//! Secrets source builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `SecretsSourceBuilder` for assembling source settings.
//! - Merge settings from builder methods, environment variables and defaults.
//! - Validate the result into an immutable `SecretsSource`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Scanning the secrets directory (see source.rs).
//!
//! Invariants / Assumptions:
//! - Builder methods called before `from_env()` take precedence over environment variables.
//! - Environment variables take precedence over `with_defaults()` when applied first.
//! - `build()` never touches the filesystem.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::env::{apply_env, prefixes_from_env};
use super::error::SecretsError;
use super::source::SecretsSource;
use crate::constants::{DEFAULT_COLON_PLACEHOLDER, DEFAULT_SECRETS_DIR};

/// Builder for [`SecretsSource`].
///
/// Also deserializable, so a secrets section can live in an application's own
/// config file:
///
/// ```toml
/// secrets_dir = "/run/secrets"
/// colon_placeholder = "__"
/// allowed_prefixes = ["myapp__"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsSourceBuilder {
    #[serde(skip_serializing_if = "Option::is_none")]
    secrets_dir: Option<PathBuf>,
    #[serde(rename = "colon_placeholder", skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_prefixes: Option<Vec<String>>,
}

impl SecretsSourceBuilder {
    /// Create a builder with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory holding secret files.
    pub fn with_secrets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.secrets_dir = Some(dir.into());
        self
    }

    /// Set the token that stands in for `:` in filenames.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Only load files whose names start with one of these prefixes.
    pub fn with_allowed_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    /// Read allowed prefixes from the comma-separated variable `var_name`.
    ///
    /// An unset or blank variable clears the prefix filter.
    ///
    /// # Errors
    ///
    /// Returns `SecretsError::InvalidConfiguration` if `var_name` is blank.
    pub fn with_allowed_prefixes_from_env(mut self, var_name: &str) -> Result<Self, SecretsError> {
        self.allowed_prefixes = prefixes_from_env(var_name)?;
        Ok(self)
    }

    /// Fill unset settings from `DOCKER_SECRETS_DIR`,
    /// `DOCKER_SECRETS_COLON_PLACEHOLDER` and `DOCKER_SECRETS_ALLOWED_PREFIXES`.
    pub fn from_env(mut self) -> Self {
        apply_env(&mut self);
        self
    }

    /// Fill an unset directory with `/run/secrets` and an unset placeholder with `__`.
    pub fn with_defaults(mut self) -> Self {
        self.secrets_dir
            .get_or_insert_with(|| PathBuf::from(DEFAULT_SECRETS_DIR));
        self.placeholder
            .get_or_insert_with(|| DEFAULT_COLON_PLACEHOLDER.to_string());
        self
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns `SecretsError::InvalidConfiguration` if the directory or the
    /// placeholder was never set.
    pub fn build(self) -> Result<SecretsSource, SecretsError> {
        SecretsSource::new(self.secrets_dir, self.placeholder, self.allowed_prefixes)
    }

    pub(super) fn secrets_dir(&self) -> Option<&Path> {
        self.secrets_dir.as_deref()
    }

    pub(super) fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub(super) fn allowed_prefixes(&self) -> Option<&[String]> {
        self.allowed_prefixes.as_deref()
    }

    pub(super) fn set_secrets_dir(&mut self, dir: Option<PathBuf>) {
        self.secrets_dir = dir;
    }

    pub(super) fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    pub(super) fn set_allowed_prefixes(&mut self, prefixes: Option<Vec<String>>) {
        self.allowed_prefixes = prefixes;
    }
}
