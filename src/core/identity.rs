//! Identifier and field validators
//!
//! Pure, total functions over strings. Every entry point that persists an id or a
//! contact address runs them before touching the store.

use uuid::Uuid;

use crate::core::error::{CatalogError, Result};

/// Hyphen positions in the canonical 8-4-4-4-12 form
const HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// Length of a hyphenated identifier
const ID_LEN: usize = 36;

/// Generate a new random (version 4) identifier in lowercase hyphenated form
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Check that `s` is a hyphenated 8-4-4-4-12 hex identifier with a version nibble
/// of 1-5 and an RFC 4122 variant nibble (8, 9, a or b). Case-insensitive.
pub fn is_valid_id(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != ID_LEN {
        return false;
    }

    for (i, b) in bytes.iter().enumerate() {
        if HYPHENS.contains(&i) {
            if *b != b'-' {
                return false;
            }
        } else if !b.is_ascii_hexdigit() {
            return false;
        }
    }

    let version_ok = matches!(bytes[14], b'1'..=b'5');
    let variant_ok = matches!(bytes[19].to_ascii_lowercase(), b'8' | b'9' | b'a' | b'b');
    version_ok && variant_ok
}

/// Fail with a validation error labelled `label` unless `s` is a valid id
pub fn require_valid_id(s: &str, label: &str) -> Result<()> {
    if is_valid_id(s) {
        Ok(())
    } else {
        Err(CatalogError::validation(
            label,
            format!("'{}' is not a UUID string", s),
        ))
    }
}

/// Trim and validate a caller-supplied id, returning its stored (lowercase) form
pub fn normalize_id(s: &str, label: &str) -> Result<String> {
    let id = s.trim();
    require_valid_id(id, label)?;
    Ok(id.to_lowercase())
}

/// Normalize a caller-supplied id, or generate one when absent
pub fn resolve_new_id(id: Option<&str>, label: &str) -> Result<String> {
    match id {
        Some(id) => normalize_id(id, label),
        None => Ok(new_id()),
    }
}

/// Check the minimal `local@domain.tld` shape of a contact address
pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = s.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Fail with a validation error unless `s` looks like an email address
pub fn require_valid_email(s: &str) -> Result<()> {
    if is_valid_email(s) {
        Ok(())
    } else {
        Err(CatalogError::validation(
            "supplier_contact",
            format!("'{}' is not a valid email address", s),
        ))
    }
}
