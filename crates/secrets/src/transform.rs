//! Filename and content transformations applied while loading secrets.
//!
//! Responsibilities:
//! - Turn a flat secret filename into a hierarchical configuration key.
//! - Fold keys and prefixes for case-insensitive comparison.
//! - Normalize raw file contents into a secret value.
//!
//! Invariants:
//! - Case folding is ordinal and per character (`char::to_lowercase`), never
//!   locale-aware or dependent on neighbouring characters.
//! - At most one trailing line terminator is removed from a value.

use crate::constants::{BYTE_ORDER_MARK, KEY_DELIMITER, LINE_ENDING};

/// Replace every occurrence of `placeholder` in `file_name` with `:`.
///
/// An empty placeholder matches nothing, so the filename is used verbatim.
///
/// ```
/// use docker_secrets::derive_key;
///
/// assert_eq!(derive_key("foo__bar__baz", "__"), "foo:bar:baz");
/// assert_eq!(derive_key("secret_one", "__"), "secret_one");
/// ```
pub fn derive_key(file_name: &str, placeholder: &str) -> String {
    if placeholder.is_empty() {
        return file_name.to_string();
    }
    file_name.replace(placeholder, KEY_DELIMITER)
}

/// Canonical form used to compare keys and prefixes without regard to case.
///
/// Each character is lowered on its own. `str::to_lowercase` maps a final
/// capital sigma to `ς` but a medial one to `σ`, which would make the folded
/// form of `ΟΔΟΣ:X` differ from that of `οδος:x`.
pub fn fold_key(key: &str) -> String {
    key.chars().flat_map(char::to_lowercase).collect()
}

/// Whether `file_name` starts with any of the (already folded) prefixes.
pub(crate) fn matches_any_prefix(file_name: &str, folded_prefixes: &[String]) -> bool {
    let folded_name = fold_key(file_name);
    folded_prefixes
        .iter()
        .any(|prefix| folded_name.starts_with(prefix.as_str()))
}

/// Decode raw file bytes into a secret value.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, a leading byte
/// order mark is dropped, and a single trailing platform line terminator is
/// stripped.
pub(crate) fn secret_value_from_bytes(bytes: Vec<u8>) -> String {
    let mut text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    if text.starts_with(BYTE_ORDER_MARK) {
        text.remove(0);
    }
    strip_line_ending(text)
}

/// Remove exactly one trailing platform line terminator, if present.
pub(crate) fn strip_line_ending(mut value: String) -> String {
    if value.ends_with(LINE_ENDING) {
        value.truncate(value.len() - LINE_ENDING.len());
    }
    value
}
