//! Loadable, queryable configuration providers.
//!
//! Responsibilities:
//! - Define the `ConfigProvider` capability (load + lookup).
//! - Implement it for a secrets directory (`SecretsProvider`) and for fixed
//!   in-memory pairs (`MemoryProvider`).
//!
//! Does NOT handle:
//! - Ordering or precedence between providers (see `configuration.rs`).
//!
//! Invariants:
//! - `load` replaces all previously loaded data; it never merges.
//! - Lookups before the first `load` find nothing.

use secrecy::SecretString;

use crate::fs::{OsFileSystem, SecretsFileSystem};
use crate::loader::{SecretsError, SecretsSource};
use crate::map::SecretsMap;

/// A source of configuration values that can be (re)loaded and queried.
pub trait ConfigProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Recompute this provider's data from its backing store.
    ///
    /// # Errors
    ///
    /// Implementations return an error when their backing store is unusable.
    fn load(&mut self) -> Result<(), SecretsError>;

    /// Look up a value by key, ignoring case.
    fn try_get(&self, key: &str) -> Option<&SecretString>;
}

/// Provider that reads a secrets directory.
#[derive(Debug)]
pub struct SecretsProvider<F = OsFileSystem> {
    source: SecretsSource,
    fs: F,
    data: SecretsMap,
}

impl SecretsProvider {
    /// Provider over the real filesystem.
    pub fn new(source: SecretsSource) -> Self {
        Self::with_file_system(source, OsFileSystem)
    }
}

impl<F: SecretsFileSystem> SecretsProvider<F> {
    /// Provider over a custom filesystem, such as `MemoryFileSystem`.
    pub fn with_file_system(source: SecretsSource, fs: F) -> Self {
        Self {
            source,
            fs,
            data: SecretsMap::new(),
        }
    }

    /// Settings this provider was created with.
    pub fn source(&self) -> &SecretsSource {
        &self.source
    }

    /// Snapshot of the most recent load.
    pub fn data(&self) -> &SecretsMap {
        &self.data
    }
}

impl<F: SecretsFileSystem> ConfigProvider for SecretsProvider<F> {
    fn name(&self) -> &str {
        "docker-secrets"
    }

    fn load(&mut self) -> Result<(), SecretsError> {
        self.data = self.source.load_with(&self.fs);
        Ok(())
    }

    fn try_get(&self, key: &str) -> Option<&SecretString> {
        self.data.try_get(key)
    }
}

/// Provider over fixed key/value pairs, typically used as a defaults layer.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    initial: Vec<(String, SecretString)>,
    data: SecretsMap,
}

impl MemoryProvider {
    /// Create a provider from key/value pairs.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let initial = pairs
            .into_iter()
            .map(|(key, value)| {
                let value: String = value.into();
                (key.into(), SecretString::new(value.into()))
            })
            .collect();
        Self {
            initial,
            data: SecretsMap::new(),
        }
    }
}

impl ConfigProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&mut self) -> Result<(), SecretsError> {
        self.data = self.initial.iter().cloned().collect();
        Ok(())
    }

    fn try_get(&self, key: &str) -> Option<&SecretString> {
        self.data.try_get(key)
    }
}
