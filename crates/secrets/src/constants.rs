//! Centralized constants for the secrets provider.
//!
//! Defaults mirror the Docker Swarm and Kubernetes conventions for mounting
//! secrets as individual files.

// =============================================================================
// Source Defaults
// =============================================================================

/// Default directory where orchestrators mount secret files.
pub const DEFAULT_SECRETS_DIR: &str = "/run/secrets";

/// Default token that stands in for `:` inside secret filenames.
pub const DEFAULT_COLON_PLACEHOLDER: &str = "__";

/// Separator between hierarchical configuration key segments.
pub const KEY_DELIMITER: &str = ":";

/// Separator for allowed prefixes supplied through a single environment variable.
pub const PREFIXES_DELIMITER: char = ',';

/// Platform line terminator stripped (once) from the end of secret values.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// Platform line terminator stripped (once) from the end of secret values.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// UTF-8 byte order mark, dropped from the start of secret values.
pub(crate) const BYTE_ORDER_MARK: char = '\u{feff}';

// =============================================================================
// Environment Variables
// =============================================================================

/// Overrides the secrets directory when set.
pub const ENV_SECRETS_DIR: &str = "DOCKER_SECRETS_DIR";

/// Overrides the colon placeholder when set.
pub const ENV_COLON_PLACEHOLDER: &str = "DOCKER_SECRETS_COLON_PLACEHOLDER";

/// Comma-separated list of allowed filename prefixes.
pub const ENV_ALLOWED_PREFIXES: &str = "DOCKER_SECRETS_ALLOWED_PREFIXES";
