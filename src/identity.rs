//! Content-derived record identifiers.
//!
//! A record's id is the SHA-256 of its normalized address, city and state,
//! hex encoded and truncated to 24 characters (96 bits). The same location
//! always hashes to the same id, so re-ingesting an export upserts instead of
//! duplicating.

use sha2::{Digest, Sha256};

use crate::error::RecordError;

/// Length of a record id in hex characters.
pub const ID_LEN: usize = 24;

/// Build the composite key the id is hashed from.
///
/// Each part is trimmed and lowercased independently, then joined with `|`.
pub fn identity_key(address: &str, city: &str, state: &str) -> String {
    format!(
        "{}|{}|{}",
        address.trim().to_lowercase(),
        city.trim().to_lowercase(),
        state.trim().to_lowercase()
    )
}

/// Hash an already-built identity key.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let result = hasher.finalize();

    let full_hex = format!("{:x}", result);
    full_hex[..ID_LEN].to_string()
}

/// Compute the id for an address/city/state triple.
///
/// # Errors
/// Returns `RecordError::MissingIdentityField` naming the first absent part.
///
/// # Example
/// ```
/// use marketrows::identity::record_id;
///
/// let a = record_id(Some("1 Main St"), Some("Springfield"), Some("IL")).unwrap();
/// let b = record_id(Some(" 1 MAIN ST"), Some("springfield "), Some("il")).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 24);
/// ```
pub fn record_id(
    address: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
) -> Result<String, RecordError> {
    let address = address.ok_or(RecordError::MissingIdentityField { field: "address" })?;
    let city = city.ok_or(RecordError::MissingIdentityField { field: "city" })?;
    let state = state.ok_or(RecordError::MissingIdentityField { field: "state" })?;

    Ok(hash_key(&identity_key(address, city, state)))
}
