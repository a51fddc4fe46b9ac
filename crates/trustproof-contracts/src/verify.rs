//! Verification result shapes and the protocol's error codes.
//!
//! Verification of untrusted tokens never fails with a Rust error.  Every
//! outcome, good or bad, is a value of one of these types so that callers
//! (and verifiers written in other languages) can compare results by code.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::claims::ClaimsMap;

/// Machine-readable failure codes shared by every TrustProof implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Signature or schema verification failed for a token in a chain, or its
    /// chain fields are malformed.
    InvalidProof,
    /// Recomputed entry hash does not match the claimed one.
    ChainEntryHashMismatch,
    /// `prev_hash` does not equal the prior record's `entry_hash`.
    ChainLinkMismatch,
    /// First record's `prev_hash` does not match the configured genesis value.
    ChainGenesisPrevHashInvalid,
    InvalidSignature,
    InvalidSchema,
    MissingJti,
    InputHashMismatch,
    OutputHashMismatch,
    /// CLI: a required argument was not supplied.
    MissingArgument,
    /// CLI: the public key could not be loaded.
    PubkeyLoadError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidProof => "INVALID_PROOF",
            ErrorCode::ChainEntryHashMismatch => "CHAIN_ENTRY_HASH_MISMATCH",
            ErrorCode::ChainLinkMismatch => "CHAIN_LINK_MISMATCH",
            ErrorCode::ChainGenesisPrevHashInvalid => "CHAIN_GENESIS_PREV_HASH_INVALID",
            ErrorCode::InvalidSignature => "INVALID_SIGNATURE",
            ErrorCode::InvalidSchema => "INVALID_SCHEMA",
            ErrorCode::MissingJti => "MISSING_JTI",
            ErrorCode::InputHashMismatch => "INPUT_HASH_MISMATCH",
            ErrorCode::OutputHashMismatch => "OUTPUT_HASH_MISMATCH",
            ErrorCode::MissingArgument => "MISSING_ARGUMENT",
            ErrorCode::PubkeyLoadError => "PUBKEY_LOAD_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failure reported by single-token verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ProofError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// The result of verifying one token.
///
/// `claims` is present whenever the signature checked out, even if later
/// checks (schema, jti, hash bindings) failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofVerification {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<ClaimsMap>,
    pub errors: Vec<ProofError>,
}

impl ProofVerification {
    /// A rejection that carries no claims (signature-level failure).
    pub fn rejected(error: ProofError) -> Self {
        Self {
            ok: false,
            claims: None,
            errors: vec![error],
        }
    }

    /// Build a result from verified claims and any collected errors.
    pub fn from_claims(claims: ClaimsMap, errors: Vec<ProofError>) -> Self {
        Self {
            ok: errors.is_empty(),
            claims: Some(claims),
            errors,
        }
    }

    /// `"CODE: message"` pairs joined with `"; "`.
    pub fn joined_errors(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// One failure reported by chain verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainError {
    /// Position of the offending token; absent for configuration failures
    /// detected before any token is examined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub code: ErrorCode,
    pub message: String,
}

impl ChainError {
    pub fn at(index: usize, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            code,
            message: message.into(),
        }
    }

    pub fn unindexed(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            index: None,
            code,
            message: message.into(),
        }
    }
}

/// The result of verifying an ordered list of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    pub ok: bool,
    pub errors: Vec<ChainError>,
    /// Number of tokens that passed every check before the first failure.
    #[serde(skip)]
    pub verified: usize,
}

impl ChainReport {
    pub fn passed(verified: usize) -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            verified,
        }
    }

    pub fn failed(errors: Vec<ChainError>, verified: usize) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
            verified,
        }
    }

    /// The earliest failure, if any.
    pub fn first_error(&self) -> Option<&ChainError> {
        self.errors.first()
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value; empty for the document root.
    pub instance_path: String,
    pub message: String,
}

/// The result of validating a value against the claims schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    pub valid: bool,
    pub errors: Vec<SchemaViolation>,
}

impl SchemaReport {
    pub fn from_violations(errors: Vec<SchemaViolation>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// `"<path> <message>"` per violation, joined with `"; "`.  The root is
    /// shown as `(root)`.
    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            return "unknown schema validation error".to_string();
        }
        self.errors
            .iter()
            .map(|v| {
                let location = if v.instance_path.is_empty() {
                    "(root)"
                } else {
                    v.instance_path.as_str()
                };
                format!("{location} {}", v.message)
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
