//! TOML configuration for chain construction and verification.
//!
//! ```toml
//! expected_genesis_prev_hash = "0000...0000"
//! max_chain_length = 10000
//! collect_all = false
//! kid = "payments-2026-01"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use trustproof_contracts::{
    claims::GENESIS_PREV_HASH,
    error::{TrustProofError, TrustProofResult},
};
use trustproof_core::traits::SignOptions;

use crate::{hash::is_hex64, verifier::VerifyChainOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    #[serde(default = "default_genesis")]
    pub expected_genesis_prev_hash: String,
    #[serde(default)]
    pub max_chain_length: Option<usize>,
    #[serde(default)]
    pub collect_all: bool,
    /// Key identifier stamped into signed tokens.
    #[serde(default)]
    pub kid: Option<String>,
}

fn default_genesis() -> String {
    GENESIS_PREV_HASH.to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            expected_genesis_prev_hash: default_genesis(),
            max_chain_length: None,
            collect_all: false,
            kid: None,
        }
    }
}

impl ChainConfig {
    /// Parse and validate a TOML document.
    ///
    /// Returns `TrustProofError::ConfigError` if the TOML is malformed or a
    /// value is out of range.
    pub fn from_toml_str(s: &str) -> TrustProofResult<Self> {
        let config: ChainConfig = toml::from_str(s).map_err(|e| TrustProofError::ConfigError {
            reason: format!("failed to parse chain config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> TrustProofResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TrustProofError::ConfigError {
            reason: format!("failed to read chain config {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> TrustProofResult<()> {
        if !is_hex64(&self.expected_genesis_prev_hash) {
            return Err(TrustProofError::ConfigError {
                reason: "expected_genesis_prev_hash must be a 64-char hex string".to_string(),
            });
        }
        if self.max_chain_length == Some(0) {
            return Err(TrustProofError::ConfigError {
                reason: "max_chain_length must be at least 1".to_string(),
            });
        }
        if matches!(&self.kid, Some(kid) if kid.trim().is_empty()) {
            return Err(TrustProofError::ConfigError {
                reason: "kid must not be blank".to_string(),
            });
        }
        Ok(())
    }

    pub fn verify_options(&self) -> VerifyChainOptions {
        VerifyChainOptions {
            expected_genesis_prev_hash: self.expected_genesis_prev_hash.clone(),
            max_chain_length: self.max_chain_length,
            collect_all: self.collect_all,
        }
    }

    pub fn sign_options(&self) -> SignOptions {
        SignOptions {
            kid: self.kid.clone(),
        }
    }
}
