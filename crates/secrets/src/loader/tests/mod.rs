//! Tests for secrets source construction and loading.
//!
//! Responsibilities:
//! - Test validation of required settings.
//! - Test directory scanning against an in-memory filesystem.
//! - Test builder precedence between explicit calls, environment and defaults.
//!
//! Invariants:
//! - Tests that touch environment variables use `serial_test`.
//! - Filesystem scenarios use `MemoryFileSystem` or mocks, never `/run/secrets`.

pub mod load_tests;

use crate::loader::source::SecretsSource;

/// A `/run/secrets` source with the `__` placeholder and the given prefixes.
pub fn run_secrets_source(prefixes: &[&str]) -> SecretsSource {
    let prefixes = if prefixes.is_empty() {
        None
    } else {
        Some(prefixes.iter().map(|p| p.to_string()).collect())
    };
    SecretsSource::new(
        Some("/run/secrets".into()),
        Some("__".to_string()),
        prefixes,
    )
    .unwrap()
}
