//! A keyed-digest `Signer` for exercising chain logic without real crypto.
//!
//! The "signature" is `sha256(key + "." + signing_input)`.  Anyone holding
//! the key can forge tokens, which is exactly what tamper tests need.

use serde_json::{json, Value};

use trustproof_contracts::{
    claims::ClaimsMap,
    error::{TrustProofError, TrustProofResult},
    verify::{ErrorCode, ProofError, ProofVerification},
};
use trustproof_core::traits::{SignOptions, Signer, VerifyOptions};

use crate::{
    append::append,
    binding::check_hash_bindings,
    hash::sha256_hex,
    token::{decode_json_segment, decode_payload_untrusted, encode_segment, split_compact},
};

pub(crate) struct DigestSigner;

pub(crate) const KEY: &str = "test-key";

impl Signer for DigestSigner {
    type SigningKey = str;
    type VerifyingKey = str;

    fn sign(&self, claims: &ClaimsMap, key: &str, opts: &SignOptions) -> TrustProofResult<String> {
        if !matches!(claims.get("jti"), Some(Value::String(_))) {
            return Err(TrustProofError::InvalidEnvelope {
                reason: "/jti is required".to_string(),
            });
        }
        let mut header = json!({"alg": "HS-TEST"});
        if let Some(kid) = &opts.kid {
            header["kid"] = json!(kid);
        }
        let signing_input = format!(
            "{}.{}",
            encode_segment(header.to_string().as_bytes()),
            encode_segment(serde_json::to_vec(claims)?.as_slice())
        );
        let signature = sha256_hex(&format!("{key}.{signing_input}"));
        Ok(format!("{signing_input}.{}", encode_segment(signature.as_bytes())))
    }

    fn verify(&self, token: &str, key: &str, opts: &VerifyOptions) -> ProofVerification {
        let invalid = || {
            ProofVerification::rejected(ProofError::new(
                ErrorCode::InvalidSignature,
                "signature check failed",
            ))
        };
        let Ok(parts) = split_compact(token) else {
            return invalid();
        };
        let expected = sha256_hex(&format!("{key}.{}", parts.signing_input()));
        if encode_segment(expected.as_bytes()) != parts.signature {
            return invalid();
        }
        let Ok(claims) = decode_json_segment(parts.payload) else {
            return invalid();
        };
        let errors = check_hash_bindings(&claims, opts);
        ProofVerification::from_claims(claims, errors)
    }
}

/// Re-sign a token's payload after `edit`, without touching `chain`.
pub(crate) fn forge(token: &str, edit: impl FnOnce(&mut ClaimsMap)) -> String {
    let parts = split_compact(token).unwrap();
    let mut claims = decode_json_segment(parts.payload).unwrap();
    edit(&mut claims);
    DigestSigner
        .sign(&claims, KEY, &SignOptions::default())
        .unwrap()
}

pub(crate) fn claims(jti: &str, action: &str) -> Value {
    json!({
        "subject": {"type": "agent", "id": "agent_payments_01"},
        "action": action,
        "resource": {"type": "payout", "id": "po_1001"},
        "policy": {
            "policy_v": "v0",
            "scopes": ["payout:create"],
            "constraints": {"max_amount": 5000}
        },
        "result": {"decision": "allow", "reason_codes": ["within_limits"]},
        "hashes": {"input_hash": "a".repeat(64), "output_hash": "b".repeat(64)},
        "timestamp": "2026-02-24T12:00:00Z",
        "jti": jti
    })
}

/// `n` linked tokens with jtis `jti_0..`.
pub(crate) fn build_chain(n: usize) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for i in 0..n {
        let prev = tokens.last().map(String::as_str).into();
        let token = append(
            prev,
            claims(&format!("jti_{i}"), "payout.initiate"),
            &DigestSigner,
            KEY,
            &SignOptions::default(),
        )
        .unwrap();
        tokens.push(token);
    }
    tokens
}

pub(crate) fn payload(token: &str) -> ClaimsMap {
    decode_payload_untrusted(token).unwrap()
}
