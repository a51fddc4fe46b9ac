//! # trustproof-core
//!
//! The capability seams the TrustProof hashing protocol depends on.
//!
//! This crate provides:
//! - `Signer`: produces and verifies compact signed proof tokens
//! - `SchemaValidator`: validates claims against the envelope schema
//! - `SignOptions` / `VerifyOptions`: per-call knobs for the above
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trustproof_core::traits::{Signer, SignOptions, VerifyOptions};
//! ```

pub mod traits;

pub use traits::{SchemaValidator, SignOptions, Signer, VerifyOptions};
