//! Strict allow-list validation for interpolated identifiers.
//!
//! Labels, relationship types, and orderable field names are the only
//! values spliced directly into generated query text; everything else is
//! a bound parameter. The allow-list keeps that splice injection-safe:
//! ASCII alphanumerics and underscore only, no leading digit.

use crate::error::OgmError;

/// Returns true when `name` is safe to interpolate into query text.
pub fn is_safe_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Checks an identifier, returning it on success.
pub fn checked(name: &str) -> Result<&str, OgmError> {
    if is_safe_identifier(name) {
        Ok(name)
    } else {
        Err(OgmError::InvalidIdentifier(name.to_string()))
    }
}
