//! `Ed25519JwsSigner`: compact JWS (`EdDSA`) over TrustProof claims.
//!
//! Token layout:
//!
//!   base64url(header) "." base64url(payload) "." base64url(signature)
//!
//!   header    = {"alg":"EdDSA","typ":"JWT"} plus "kid" when given
//!   payload   = claims plus "iat" (seconds) unless the claims carry one
//!   signature = Ed25519 over the ASCII bytes of `header "." payload`
//!
//! Verification order is fixed: signature, then JWT metadata removal,
//! schema, jti, hash bindings.  Anything wrong with the token itself is a
//! single `INVALID_SIGNATURE` and no claims are returned.

use chrono::Utc;
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use serde_json::{json, Value};
use tracing::{debug, warn};

use trustproof_chain::{
    check_hash_bindings,
    token::{decode_json_segment, decode_segment, encode_segment, split_compact},
};
use trustproof_contracts::{
    claims::ClaimsMap,
    error::{TrustProofError, TrustProofResult},
    verify::{ErrorCode, ProofError, ProofVerification},
};
use trustproof_core::traits::{SchemaValidator, SignOptions, Signer, VerifyOptions};
use trustproof_verify::EnvelopeSchemaValidator;

/// The only accepted `alg` header value.
pub const ALG: &str = "EdDSA";

/// Registered JWT claims removed from the payload before schema validation.
pub const JWT_METADATA_KEYS: [&str; 6] = ["iat", "exp", "nbf", "iss", "aud", "sub"];

/// Signs and verifies TrustProof claims as Ed25519 compact JWS tokens.
#[derive(Debug)]
pub struct Ed25519JwsSigner<V = EnvelopeSchemaValidator> {
    schema: V,
}

impl Ed25519JwsSigner<EnvelopeSchemaValidator> {
    /// A signer validating against the bundled envelope schema.
    pub fn new() -> TrustProofResult<Self> {
        Ok(Self {
            schema: EnvelopeSchemaValidator::new()?,
        })
    }
}

impl<V: SchemaValidator> Ed25519JwsSigner<V> {
    pub fn with_validator(schema: V) -> Self {
        Self { schema }
    }

    fn invalid_signature(reason: &str) -> ProofVerification {
        warn!(reason, "token rejected");
        ProofVerification::rejected(ProofError::new(
            ErrorCode::InvalidSignature,
            "Token signature verification failed.",
        ))
    }

    /// Check structure, header and signature; return the raw payload.
    fn verified_payload(token: &str, key: &VerifyingKey) -> Result<ClaimsMap, &'static str> {
        let parts = split_compact(token).map_err(|_| "not a compact token")?;

        let header = decode_json_segment(parts.header).map_err(|_| "unreadable header")?;
        if header.get("alg").and_then(Value::as_str) != Some(ALG) {
            return Err("unsupported alg");
        }

        let signature_bytes = decode_segment(parts.signature).map_err(|_| "unreadable signature")?;
        let signature_bytes: [u8; 64] = signature_bytes
            .as_slice()
            .try_into()
            .map_err(|_| "signature has the wrong length")?;
        let signature = Signature::from_bytes(&signature_bytes);

        key.verify(parts.signing_input().as_bytes(), &signature)
            .map_err(|_| "signature mismatch")?;

        decode_json_segment(parts.payload).map_err(|_| "unreadable payload")
    }
}

impl<V: SchemaValidator> Signer for Ed25519JwsSigner<V> {
    type SigningKey = SigningKey;
    type VerifyingKey = VerifyingKey;

    fn sign(
        &self,
        claims: &ClaimsMap,
        key: &SigningKey,
        opts: &SignOptions,
    ) -> TrustProofResult<String> {
        let report = self.schema.validate(&Value::Object(claims.clone()));
        if !report.valid {
            return Err(TrustProofError::InvalidEnvelope {
                reason: report.summary(),
            });
        }

        let mut header = json!({"alg": ALG, "typ": "JWT"});
        if let Some(kid) = &opts.kid {
            header["kid"] = json!(kid);
        }

        let mut payload = claims.clone();
        if !payload.contains_key("iat") {
            payload.insert("iat".to_string(), json!(Utc::now().timestamp()));
        }

        let signing_input = format!(
            "{}.{}",
            encode_segment(serde_json::to_vec(&header)?.as_slice()),
            encode_segment(serde_json::to_vec(&payload)?.as_slice())
        );
        let signature = key.sign(signing_input.as_bytes());

        debug!(
            jti = claims.get("jti").and_then(serde_json::Value::as_str).unwrap_or_default(),
            kid = opts.kid.as_deref().unwrap_or_default(),
            "signed proof"
        );
        Ok(format!(
            "{signing_input}.{}",
            encode_segment(&signature.to_bytes())
        ))
    }

    fn verify(&self, token: &str, key: &VerifyingKey, opts: &VerifyOptions) -> ProofVerification {
        let mut claims = match Self::verified_payload(token, key) {
            Ok(claims) => claims,
            Err(reason) => return Self::invalid_signature(reason),
        };

        for metadata in JWT_METADATA_KEYS {
            claims.remove(metadata);
        }

        let mut errors = Vec::new();

        let report = self.schema.validate(&Value::Object(claims.clone()));
        if !report.valid {
            errors.push(
                ProofError::new(ErrorCode::InvalidSchema, report.summary())
                    .with_details(serde_json::to_value(&report.errors).unwrap_or(Value::Null)),
            );
        }

        let jti_present = claims
            .get("jti")
            .and_then(Value::as_str)
            .is_some_and(|jti| !jti.trim().is_empty());
        if !jti_present {
            errors.push(ProofError::new(
                ErrorCode::MissingJti,
                "Claims must include a non-empty jti.",
            ));
        }

        errors.extend(check_hash_bindings(&claims, opts));

        if !errors.is_empty() {
            warn!(count = errors.len(), "proof failed claim checks");
        }
        ProofVerification::from_claims(claims, errors)
    }
}
