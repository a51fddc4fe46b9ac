//! Library error type for the TrustProof crates.
//!
//! `TrustProofError` is returned by operations that *construct* proofs
//! (signing, appending, entry-hash computation) and by configuration and key
//! loading.  Operations that *evaluate* untrusted tokens never return it; they
//! report structured [`crate::verify::ProofError`] values instead.

use thiserror::Error;

/// The unified error type for proof construction and setup.
#[derive(Debug, Error)]
pub enum TrustProofError {
    /// A caller passed a value of the wrong shape (e.g. claims that are not
    /// a JSON object).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A field that must be a 64-character hex string was not.
    #[error("invalid hex in {field}: {reason}")]
    InvalidHex { field: String, reason: String },

    /// A compact token could not be split or decoded.
    #[error("malformed token: {reason}")]
    MalformedToken { reason: String },

    /// Claims failed schema validation at signing time.
    #[error("Invalid TrustProof envelope: {reason}")]
    InvalidEnvelope { reason: String },

    /// A signing or verifying key could not be loaded or parsed.
    #[error("key error: {reason}")]
    KeyError { reason: String },

    /// The schema document itself could not be compiled.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// JSON (de)serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for TrustProofError {
    fn from(e: serde_json::Error) -> Self {
        TrustProofError::Serialization {
            reason: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the TrustProof crates.
pub type TrustProofResult<T> = Result<T, TrustProofError>;
