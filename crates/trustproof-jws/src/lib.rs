//! # trustproof-jws
//!
//! Ed25519 compact JWS signing for TrustProof claims.
//!
//! This crate provides:
//! - `Ed25519JwsSigner`: the `Signer` the chain functions are usually
//!   driven with
//! - `Keypair`, `load_signing_key`, `load_verifying_key`: PEM key handling
//! - `verify_proof`: single-token verification with optional hash bindings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trustproof_chain::{append, ChainPrev};
//! use trustproof_jws::{Ed25519JwsSigner, Keypair};
//!
//! let signer = Ed25519JwsSigner::new()?;
//! let keypair = Keypair::generate();
//! let token = append(ChainPrev::Genesis, claims, &signer, keypair.signing_key(), &Default::default())?;
//! ```

pub mod keys;
pub mod signer;

pub use keys::{load_signing_key, load_verifying_key, Keypair};
pub use signer::{Ed25519JwsSigner, ALG, JWT_METADATA_KEYS};

use ed25519_dalek::{SigningKey, VerifyingKey};
use trustproof_contracts::{claims::ClaimsMap, error::TrustProofResult, verify::ProofVerification};
use trustproof_core::traits::{SignOptions, Signer, VerifyOptions};

/// Sign finalized claims with the bundled envelope schema.
pub fn generate_proof(
    claims: &ClaimsMap,
    key: &SigningKey,
    opts: &SignOptions,
) -> TrustProofResult<String> {
    Ed25519JwsSigner::new()?.sign(claims, key, opts)
}

/// Verify one token with the bundled envelope schema.
///
/// Only fails if the bundled schema cannot be compiled.
pub fn verify_proof(
    token: &str,
    key: &VerifyingKey,
    opts: &VerifyOptions,
) -> TrustProofResult<ProofVerification> {
    Ok(Ed25519JwsSigner::new()?.verify(token, key, opts))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
