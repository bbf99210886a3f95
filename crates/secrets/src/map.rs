//! Case-insensitive storage for loaded secrets.
//!
//! Responsibilities:
//! - Hold the key/value pairs produced by one load.
//! - Answer lookups regardless of key casing.
//!
//! Invariants:
//! - Keys are stored under their folded form; the spelling of the most recent
//!   insert is kept for display.
//! - Values are `SecretString`, so `Debug` output never reveals them.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};

use crate::transform::fold_key;

/// A single loaded secret.
#[derive(Debug, Clone)]
pub struct SecretEntry {
    key: String,
    value: SecretString,
}

impl SecretEntry {
    /// The configuration key as derived from the filename.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The secret value.
    pub fn value(&self) -> &SecretString {
        &self.value
    }
}

impl PartialEq for SecretEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value.expose_secret() == other.value.expose_secret()
    }
}

impl Eq for SecretEntry {}

/// Mapping from configuration key to secret value with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretsMap {
    entries: HashMap<String, SecretEntry>,
}

impl SecretsMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any entry whose key differs only by case.
    ///
    /// Returns the replaced entry.
    pub fn insert(&mut self, key: impl Into<String>, value: SecretString) -> Option<SecretEntry> {
        let key = key.into();
        self.entries
            .insert(fold_key(&key), SecretEntry { key, value })
    }

    /// Look up a value by key, ignoring case.
    pub fn try_get(&self, key: &str) -> Option<&SecretString> {
        self.entry(key).map(SecretEntry::value)
    }

    /// Look up the full entry by key, ignoring case.
    pub fn entry(&self, key: &str) -> Option<&SecretEntry> {
        self.entries.get(&fold_key(key))
    }

    /// Whether a key is present, ignoring case.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&fold_key(key))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &SecretEntry> {
        self.entries.values()
    }

    /// Iterate over keys (original spelling) in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(SecretEntry::key)
    }
}

impl<K: Into<String>> FromIterator<(K, SecretString)> for SecretsMap {
    fn from_iter<I: IntoIterator<Item = (K, SecretString)>>(iter: I) -> Self {
        let mut map = SecretsMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
