//! Secrets source configuration and loading.
//!
//! Responsibilities:
//! - Build a validated `SecretsSource` from builder calls, environment
//!   variables, serialized settings and defaults.
//! - Scan the secrets directory into a case-insensitive `SecretsMap`.
//!
//! Does NOT handle:
//! - Filesystem access details (see `fs/`).
//! - Combining secrets with other configuration layers (see `configuration.rs`).
//!
//! Invariants / Assumptions:
//! - Validation happens at build time, before any filesystem access.
//! - Loading is synchronous, read-only and never returns an error.

mod builder;
mod env;
mod error;
mod source;

#[cfg(test)]
mod tests;

pub use builder::SecretsSourceBuilder;
pub use env::{env_var_or_none, parse_prefixes, prefixes_from_env};
pub use error::SecretsError;
pub use source::SecretsSource;
