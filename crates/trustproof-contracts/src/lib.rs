//! # trustproof-contracts
//!
//! Shared types for the TrustProof crates: the claims envelope, the library
//! error type, and the structured results returned by verification.
//!
//! No logic lives in this crate beyond conversions.

pub mod claims;
pub mod error;
pub mod verify;

pub use claims::{
    ActionResult, ChainLink, Claims, ClaimsMap, Decision, Hashes, Policy, Resource, Subject,
    EVENT_MATERIAL_FIELDS, GENESIS_PREV_HASH,
};
pub use error::{TrustProofError, TrustProofResult};
pub use verify::{
    ChainError, ChainReport, ErrorCode, ProofError, ProofVerification, SchemaReport,
    SchemaViolation,
};
