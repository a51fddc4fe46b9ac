//! SHA-256 and hex helpers.
//!
//! Hex comparisons in this crate are always case-insensitive: other
//! implementations may emit uppercase digests, and that must never read as
//! tampering.

use serde_json::Value;
use sha2::{Digest, Sha256};

use trustproof_contracts::error::{TrustProofError, TrustProofResult};

use crate::canonical::canonicalize;

/// True when `s` is exactly 64 ASCII hex digits, in either case.
pub fn is_hex64(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Lowercase a hex string.
pub fn normalize_hex(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Case-insensitive hex comparison.
pub fn hex_equals(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `s`.
pub fn sha256_hex(s: &str) -> String {
    hex::encode(Sha256::digest(s.as_bytes()))
}

/// SHA-256 of the canonical form of `value`.
///
/// This is how callers fill `hashes.input_hash` and `hashes.output_hash`.
pub fn hash_canonical(value: &Value) -> String {
    sha256_hex(&canonicalize(value))
}

/// Validate that `value` is 64-char hex and return it lowercased.
pub fn require_hex64(field: &str, value: &str) -> TrustProofResult<String> {
    if !is_hex64(value) {
        return Err(TrustProofError::InvalidHex {
            field: field.to_string(),
            reason: "expected a 64-char hex string".to_string(),
        });
    }
    Ok(normalize_hex(value))
}
