//! Validated secrets source and the directory scan that loads it.
//!
//! Responsibilities:
//! - Hold the immutable settings of one secrets directory.
//! - Scan that directory through a `SecretsFileSystem` into a `SecretsMap`.
//!
//! Does NOT handle:
//! - Reading settings from the environment (see `env.rs` and `builder.rs`).
//! - Layering several providers together (see `configuration.rs`).
//!
//! Invariants:
//! - Construction fails only when the directory or placeholder is absent.
//! - A load never fails: a missing directory, a vanished file or an unreadable
//!   file simply produce fewer entries.
//! - Every load builds a fresh map; nothing is carried over between loads.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use super::error::SecretsError;
use crate::constants::{DEFAULT_COLON_PLACEHOLDER, DEFAULT_SECRETS_DIR};
use crate::fs::{OsFileSystem, SecretsFileSystem};
use crate::map::SecretsMap;
use crate::provider::SecretsProvider;
use crate::transform::{derive_key, fold_key, matches_any_prefix, secret_value_from_bytes};

/// Settings for loading secrets from one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretsSource {
    secrets_dir: PathBuf,
    placeholder: String,
    allowed_prefixes: Vec<String>,
    folded_prefixes: Vec<String>,
}

impl Default for SecretsSource {
    fn default() -> Self {
        Self::default_source()
    }
}

impl SecretsSource {
    /// Validate and create a source.
    ///
    /// `allowed_prefixes` of `None` or an empty list disables filtering.
    ///
    /// # Errors
    ///
    /// Returns `SecretsError::InvalidConfiguration` if `secrets_dir` or
    /// `placeholder` is `None`.
    pub fn new(
        secrets_dir: Option<PathBuf>,
        placeholder: Option<String>,
        allowed_prefixes: Option<Vec<String>>,
    ) -> Result<Self, SecretsError> {
        let secrets_dir = secrets_dir.ok_or_else(|| SecretsError::missing("secrets_dir"))?;
        let placeholder = placeholder.ok_or_else(|| SecretsError::missing("colon_placeholder"))?;
        let allowed_prefixes = allowed_prefixes.unwrap_or_default();
        let folded_prefixes = allowed_prefixes.iter().map(|p| fold_key(p)).collect();

        Ok(Self {
            secrets_dir,
            placeholder,
            allowed_prefixes,
            folded_prefixes,
        })
    }

    /// `/run/secrets` with the `__` placeholder and no prefix filter.
    pub fn default_source() -> Self {
        Self {
            secrets_dir: PathBuf::from(DEFAULT_SECRETS_DIR),
            placeholder: DEFAULT_COLON_PLACEHOLDER.to_string(),
            allowed_prefixes: Vec::new(),
            folded_prefixes: Vec::new(),
        }
    }

    /// Directory scanned for secret files.
    pub fn secrets_dir(&self) -> &Path {
        &self.secrets_dir
    }

    /// Token replaced with `:` in filenames.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Allowed filename prefixes; empty means every file is loaded.
    pub fn allowed_prefixes(&self) -> &[String] {
        &self.allowed_prefixes
    }

    /// Whether a file with this name passes the prefix filter.
    pub fn is_allowed(&self, file_name: &str) -> bool {
        self.folded_prefixes.is_empty() || matches_any_prefix(file_name, &self.folded_prefixes)
    }

    /// Create a provider that reads this source from the real filesystem.
    pub fn provider(&self) -> SecretsProvider {
        SecretsProvider::new(self.clone())
    }

    /// Load secrets from the real filesystem.
    pub fn load(&self) -> SecretsMap {
        self.load_with(&OsFileSystem)
    }

    /// Load secrets through the given filesystem.
    pub fn load_with<F: SecretsFileSystem + ?Sized>(&self, fs: &F) -> SecretsMap {
        let mut secrets = SecretsMap::new();

        if !fs.dir_exists(&self.secrets_dir) {
            tracing::debug!(
                secrets_dir = %self.secrets_dir.display(),
                "Secrets directory does not exist; no secrets loaded"
            );
            return secrets;
        }

        let files = match fs.list_files(&self.secrets_dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(
                    secrets_dir = %self.secrets_dir.display(),
                    error = %e,
                    "Could not list secrets directory; no secrets loaded"
                );
                return secrets;
            }
        };

        for path in &files {
            self.load_file(fs, path, &mut secrets);
        }

        tracing::info!(
            secrets_dir = %self.secrets_dir.display(),
            count = secrets.len(),
            "Loaded secrets from directory"
        );
        secrets
    }

    fn load_file<F: SecretsFileSystem + ?Sized>(
        &self,
        fs: &F,
        path: &Path,
        secrets: &mut SecretsMap,
    ) {
        if path.to_string_lossy().trim().is_empty() {
            return;
        }

        if !fs.file_exists(path) {
            tracing::debug!(path = %path.display(), "Secret file vanished before read; skipping");
            return;
        }

        let Some(file_name) = path.file_name() else {
            return;
        };
        let Some(file_name) = file_name.to_str() else {
            tracing::warn!(
                path = %path.display(),
                "Secret filename is not valid UTF-8; skipping"
            );
            return;
        };
        if file_name.trim().is_empty() {
            return;
        }

        if !self.is_allowed(file_name) {
            tracing::debug!(
                file_name,
                "Secret file does not match any allowed prefix; skipping"
            );
            return;
        }

        let bytes = match fs.read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Secret file vanished before read; skipping");
                return;
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not read secret file; skipping"
                );
                return;
            }
        };

        let key = derive_key(file_name, &self.placeholder);
        let value = secret_value_from_bytes(bytes);
        tracing::debug!(key = %key, path = %path.display(), "Loaded secret");

        if let Some(previous) = secrets.insert(key, SecretString::new(value.into())) {
            tracing::debug!(
                key = previous.key(),
                path = %path.display(),
                "Secret overrides an earlier file with the same key"
            );
        }
    }
}
