//! Compact token segments (`header.payload.signature`).
//!
//! Nothing here checks signatures.  `decode_payload_untrusted` exists so
//! that `append` can read the previous record's entry hash out of a token
//! the caller already holds; never treat its output as verified.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

use trustproof_contracts::{
    claims::ClaimsMap,
    error::{TrustProofError, TrustProofResult},
};

/// The three segments of a compact token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactParts<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> CompactParts<'a> {
    /// The bytes a signature covers: `header.payload`.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }
}

/// Split a token into exactly three non-empty segments.
pub fn split_compact(token: &str) -> TrustProofResult<CompactParts<'_>> {
    let mut parts = token.trim().split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok(CompactParts {
                header,
                payload,
                signature,
            })
        }
        _ => Err(TrustProofError::MalformedToken {
            reason: "expected three dot-separated segments".to_string(),
        }),
    }
}

/// base64url without padding.
pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url segment.  Trailing `=` padding is tolerated.
pub fn decode_segment(segment: &str) -> TrustProofResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| TrustProofError::MalformedToken {
            reason: format!("segment is not valid base64url: {e}"),
        })
}

/// Decode a base64url segment holding a JSON object.
pub fn decode_json_segment(segment: &str) -> TrustProofResult<ClaimsMap> {
    let bytes = decode_segment(segment)?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| TrustProofError::MalformedToken {
            reason: format!("segment is not valid JSON: {e}"),
        })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(TrustProofError::MalformedToken {
            reason: "segment is not a JSON object".to_string(),
        }),
    }
}

/// Decode a token's payload without verifying its signature.
pub fn decode_payload_untrusted(token: &str) -> TrustProofResult<ClaimsMap> {
    let parts = split_compact(token)?;
    decode_json_segment(parts.payload)
}
