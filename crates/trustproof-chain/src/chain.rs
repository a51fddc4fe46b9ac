//! Event material and entry-hash primitives.
//!
//! The entry hash commits to exactly eight claim fields plus the previous
//! link:
//!
//!   material   = canonical JSON of {subject, action, resource, policy,
//!                result, hashes, timestamp, jti}
//!   entry_hash = sha256_hex(lowercase(prev_hash) + material)
//!
//! A field missing from the claims is left out of the material entirely,
//! while an explicit `null` is kept.  `chain` is never part of the material.

use serde_json::{Map, Value};

use trustproof_contracts::{
    claims::{ChainLink, ClaimsMap, EVENT_MATERIAL_FIELDS},
    error::{TrustProofError, TrustProofResult},
};

use crate::{
    canonical::canonicalize,
    hash::{require_hex64, sha256_hex},
};

/// Canonical event material for a claims value.
///
/// Fails with `InvalidInput` when `claims` is not a JSON object.
pub fn compute_canonical_event_material(claims: &Value) -> TrustProofResult<String> {
    let map = claims.as_object().ok_or_else(|| TrustProofError::InvalidInput {
        reason: "claims must be a JSON object".to_string(),
    })?;
    Ok(event_material(map))
}

/// Canonical event material for a claims object.
pub fn event_material(claims: &ClaimsMap) -> String {
    let mut projected = Map::new();
    for field in EVENT_MATERIAL_FIELDS {
        if let Some(value) = claims.get(field) {
            projected.insert(field.to_string(), value.clone());
        }
    }
    canonicalize(&Value::Object(projected))
}

/// `sha256_hex(lowercase(prev_hash) + material)`.
///
/// Fails with `InvalidHex` when `prev_hash` is not 64 hex characters.
pub fn compute_entry_hash(prev_hash: &str, material: &str) -> TrustProofResult<String> {
    let prev = require_hex64("prev_hash", prev_hash)?;
    let mut preimage = String::with_capacity(prev.len() + material.len());
    preimage.push_str(&prev);
    preimage.push_str(material);
    Ok(sha256_hex(&preimage))
}

/// Link `claims` to `prev_hash`: compute the entry hash and overwrite
/// `claims.chain` with the lowercased `{prev_hash, entry_hash}` pair.
///
/// Returns the link that was written.
pub fn seal(claims: &mut ClaimsMap, prev_hash: &str) -> TrustProofResult<ChainLink> {
    let prev_hash = require_hex64("prev_hash", prev_hash)?;
    let entry_hash = compute_entry_hash(&prev_hash, &event_material(claims))?;
    let link = ChainLink {
        prev_hash,
        entry_hash,
    };
    claims.insert("chain".to_string(), serde_json::to_value(&link)?);
    Ok(link)
}

/// The `chain` object of a claims map, if both hashes are strings.
pub(crate) fn chain_fields(claims: &ClaimsMap) -> Option<(&str, &str)> {
    let chain = claims.get("chain")?.as_object()?;
    let prev = chain.get("prev_hash")?.as_str()?;
    let entry = chain.get("entry_hash")?.as_str()?;
    Some((prev, entry))
}
