//! Appending a new record to a chain.

use serde_json::Value;
use tracing::debug;

use trustproof_contracts::{
    claims::{ChainLink, ClaimsMap, GENESIS_PREV_HASH},
    error::{TrustProofError, TrustProofResult},
};
use trustproof_core::traits::{SignOptions, Signer};

use crate::{
    chain::seal,
    hash::{is_hex64, normalize_hex},
    token::decode_payload_untrusted,
};

/// What the new record links back to.
#[derive(Debug, Clone, Copy)]
pub enum ChainPrev<'a> {
    /// Start a new chain at the genesis hash.
    Genesis,
    /// A previously issued token.  Its payload is decoded without signature
    /// verification: append only needs continuity, and the whole chain is
    /// authenticated later by `verify_chain`.
    Token(&'a str),
    /// The claims of the previous record.
    Claims(&'a ClaimsMap),
}

impl<'a> From<Option<&'a str>> for ChainPrev<'a> {
    fn from(token: Option<&'a str>) -> Self {
        match token {
            Some(token) => ChainPrev::Token(token),
            None => ChainPrev::Genesis,
        }
    }
}

impl ChainPrev<'_> {
    /// The lowercased entry hash the next record must link to.
    pub fn entry_hash(&self) -> TrustProofResult<String> {
        match self {
            ChainPrev::Genesis => Ok(GENESIS_PREV_HASH.to_string()),
            ChainPrev::Token(token) => {
                let claims = decode_payload_untrusted(token)?;
                entry_hash_of(&claims)
            }
            ChainPrev::Claims(claims) => entry_hash_of(claims),
        }
    }
}

fn entry_hash_of(claims: &ClaimsMap) -> TrustProofResult<String> {
    let entry_hash = claims
        .get("chain")
        .and_then(|chain| chain.get("entry_hash"))
        .and_then(Value::as_str)
        .ok_or_else(|| TrustProofError::InvalidInput {
            reason: "previous record is missing chain.entry_hash".to_string(),
        })?;

    if !is_hex64(entry_hash) {
        return Err(TrustProofError::InvalidHex {
            field: "chain.entry_hash".to_string(),
            reason: "previous record's entry hash is not a 64-char hex string".to_string(),
        });
    }
    Ok(normalize_hex(entry_hash))
}

/// Link `next_claims` to `prev`, compute its entry hash and sign it.
///
/// Any existing `chain` object on `next_claims` is replaced.  Errors are
/// returned for a malformed `prev`, non-object claims, and anything the
/// signer rejects (e.g. schema-invalid claims).
pub fn append<S: Signer>(
    prev: ChainPrev<'_>,
    next_claims: Value,
    signer: &S,
    key: &S::SigningKey,
    opts: &SignOptions,
) -> TrustProofResult<String> {
    let prev_hash = prev.entry_hash()?;
    let (token, _) = seal_and_sign(&prev_hash, next_claims, signer, key, opts)?;
    Ok(token)
}

/// Shared by `append` and `ChainCursor::append`.
pub(crate) fn seal_and_sign<S: Signer>(
    prev_hash: &str,
    next_claims: Value,
    signer: &S,
    key: &S::SigningKey,
    opts: &SignOptions,
) -> TrustProofResult<(String, ChainLink)> {
    let mut claims = match next_claims {
        Value::Object(map) => map,
        _ => {
            return Err(TrustProofError::InvalidInput {
                reason: "next claims must be a JSON object".to_string(),
            })
        }
    };

    let link = seal(&mut claims, prev_hash)?;
    debug!(
        prev_hash = %link.prev_hash,
        entry_hash = %link.entry_hash,
        "sealed chain link"
    );

    let token = signer.sign(&claims, key, opts)?;
    Ok((token, link))
}
