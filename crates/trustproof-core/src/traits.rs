//! Capability traits at the edge of the hashing protocol.
//!
//! The chain logic never touches cryptography or schema rules directly.  It
//! delegates through two seams:
//!
//! - `Signer`: turns finalized claims into a compact signed token,
//!   and checks a token back into claims
//! - `SchemaValidator`: checks a claims object against the envelope schema
//!
//! `Signer::verify` must never panic or return an error for malformed input:
//! every outcome is a `ProofVerification` value.

use serde_json::Value;

use trustproof_contracts::{
    claims::ClaimsMap,
    error::TrustProofResult,
    verify::{ProofVerification, SchemaReport},
};

/// Options for producing a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignOptions {
    /// Key identifier placed in the protected header.
    pub kid: Option<String>,
}

impl SignOptions {
    pub fn with_kid(kid: impl Into<String>) -> Self {
        Self {
            kid: Some(kid.into()),
        }
    }
}

/// Options for verifying a single token.
///
/// When `expected_input` / `expected_output` are set, the verifier also
/// checks that `hashes.input_hash` / `hashes.output_hash` equal the SHA-256
/// of the canonical form of these values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyOptions {
    pub expected_input: Option<Value>,
    pub expected_output: Option<Value>,
}

/// Produces and checks compact signed tokens (`header.payload.signature`).
///
/// Key types are associated so the chain code stays agnostic of the
/// signature algorithm.
pub trait Signer: Send + Sync {
    /// Private key material used by `sign`.
    type SigningKey: ?Sized;
    /// Public key material used by `verify`.
    type VerifyingKey: ?Sized;

    /// Sign `claims` as the token payload.
    ///
    /// Fails loudly for claims that do not satisfy the envelope schema.
    fn sign(
        &self,
        claims: &ClaimsMap,
        key: &Self::SigningKey,
        opts: &SignOptions,
    ) -> TrustProofResult<String>;

    /// Verify `token` and return its claims with signature metadata removed.
    ///
    /// Never fails: malformed tokens produce `ok = false` with errors.
    fn verify(
        &self,
        token: &str,
        key: &Self::VerifyingKey,
        opts: &VerifyOptions,
    ) -> ProofVerification;
}

/// Checks a JSON value against the claims envelope schema.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, value: &Value) -> SchemaReport;
}
