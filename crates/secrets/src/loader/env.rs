//! Environment variable parsing for secrets source configuration.
//!
//! Responsibilities:
//! - Read the `DOCKER_SECRETS_*` variables into a `SecretsSourceBuilder`.
//! - Parse comma-separated allowed prefixes from any named variable.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Validating the final settings (see `SecretsSourceBuilder::build`).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Settings already present on the builder are never overwritten.

use std::path::PathBuf;

use super::builder::SecretsSourceBuilder;
use super::error::SecretsError;
use crate::constants::{
    ENV_ALLOWED_PREFIXES, ENV_COLON_PLACEHOLDER, ENV_SECRETS_DIR, PREFIXES_DELIMITER,
};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Split a comma-separated prefix list.
///
/// Segments are trimmed and empty ones dropped; `None` when nothing remains,
/// which disables prefix filtering.
pub fn parse_prefixes(raw: &str) -> Option<Vec<String>> {
    let prefixes: Vec<String> = raw
        .split(PREFIXES_DELIMITER)
        .map(str::trim)
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_string)
        .collect();

    if prefixes.is_empty() {
        None
    } else {
        Some(prefixes)
    }
}

/// Read allowed prefixes from the environment variable named `var_name`.
///
/// # Errors
///
/// Returns `SecretsError::InvalidConfiguration` if `var_name` is blank.
pub fn prefixes_from_env(var_name: &str) -> Result<Option<Vec<String>>, SecretsError> {
    if var_name.trim().is_empty() {
        return Err(SecretsError::InvalidConfiguration {
            field: "allowed_prefixes_env_var",
            message: "must not be empty".to_string(),
        });
    }

    Ok(env_var_or_none(var_name).and_then(|raw| parse_prefixes(&raw)))
}

/// Fill unset builder settings from the `DOCKER_SECRETS_*` variables.
pub(super) fn apply_env(builder: &mut SecretsSourceBuilder) {
    if builder.secrets_dir().is_none()
        && let Some(dir) = env_var_or_none(ENV_SECRETS_DIR)
    {
        builder.set_secrets_dir(Some(PathBuf::from(dir)));
    }
    if builder.placeholder().is_none()
        && let Some(placeholder) = env_var_or_none(ENV_COLON_PLACEHOLDER)
    {
        builder.set_placeholder(Some(placeholder));
    }
    if builder.allowed_prefixes().is_none()
        && let Some(raw) = env_var_or_none(ENV_ALLOWED_PREFIXES)
    {
        builder.set_allowed_prefixes(parse_prefixes(&raw));
    }
}
