//! Chain verification.
//!
//! Every token is checked in order:
//!
//!   1. signature and schema, via the `Signer`
//!   2. `chain` object present with two 64-char hex hashes
//!   3. `entry_hash` equals the recomputed hash
//!   4. index 0: `prev_hash` equals the expected genesis value
//!      index i: `prev_hash` equals token i-1's `entry_hash`
//!
//! By default the first failure ends verification.  With `collect_all`
//! every token is examined and one error is reported per failing index.

use tracing::{debug, info, warn};

use trustproof_contracts::{
    claims::{ClaimsMap, GENESIS_PREV_HASH},
    verify::{ChainError, ChainReport, ErrorCode},
};
use trustproof_core::traits::{Signer, VerifyOptions};

use crate::{
    chain::{chain_fields, compute_entry_hash, event_material},
    hash::{hex_equals, is_hex64},
};

/// Options for `verify_chain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyChainOptions {
    /// `prev_hash` the first token must carry.  Must be 64-char hex.
    pub expected_genesis_prev_hash: String,
    /// Reject chains with more tokens than this.
    pub max_chain_length: Option<usize>,
    /// Keep going after a failure and report every failing index.
    pub collect_all: bool,
}

impl Default for VerifyChainOptions {
    fn default() -> Self {
        Self {
            expected_genesis_prev_hash: GENESIS_PREV_HASH.to_string(),
            max_chain_length: None,
            collect_all: false,
        }
    }
}

impl VerifyChainOptions {
    pub fn with_genesis(expected_genesis_prev_hash: impl Into<String>) -> Self {
        Self {
            expected_genesis_prev_hash: expected_genesis_prev_hash.into(),
            ..Self::default()
        }
    }
}

/// What a single token check produced.
struct Checked {
    /// Entry hash the next token links to.  `None` when unreadable.
    entry_hash: Option<String>,
    error: Option<(ErrorCode, String)>,
}

/// Verify an ordered list of tokens as one chain.
///
/// Never panics and never returns an error: every failure is a
/// `ChainError` in the report.  An empty list is a valid chain.
pub fn verify_chain<S, T>(
    tokens: &[T],
    signer: &S,
    key: &S::VerifyingKey,
    opts: &VerifyChainOptions,
) -> ChainReport
where
    S: Signer,
    T: AsRef<str>,
{
    if !is_hex64(&opts.expected_genesis_prev_hash) {
        warn!("expected genesis prev hash is not 64-char hex");
        return ChainReport::failed(
            vec![ChainError::unindexed(
                ErrorCode::ChainGenesisPrevHashInvalid,
                "expectedGenesisPrevHash must be a 64-char hex string.",
            )],
            0,
        );
    }

    if let Some(max) = opts.max_chain_length {
        if tokens.len() > max {
            warn!(len = tokens.len(), max, "chain exceeds configured maximum length");
            return ChainReport::failed(
                vec![ChainError::unindexed(
                    ErrorCode::InvalidProof,
                    format!("Chain length {} exceeds maxChainLength {max}.", tokens.len()),
                )],
                0,
            );
        }
    }

    let verify_opts = VerifyOptions::default();
    let mut errors = Vec::new();
    let mut verified = 0;
    let mut previous: Option<String> = None;

    for (index, token) in tokens.iter().enumerate() {
        let checked = check_token(
            index,
            token.as_ref(),
            previous.as_deref(),
            signer,
            key,
            &verify_opts,
            opts,
        );

        match checked.error {
            None => {
                if errors.is_empty() {
                    verified += 1;
                }
                debug!(index, "chain token verified");
            }
            Some((code, message)) => {
                warn!(index, code = %code, "chain verification failed");
                errors.push(ChainError::at(index, code, message));
                if !opts.collect_all {
                    return ChainReport::failed(errors, verified);
                }
            }
        }
        previous = checked.entry_hash;
    }

    if errors.is_empty() {
        info!(len = tokens.len(), "chain verified");
        return ChainReport::passed(verified);
    }
    ChainReport::failed(errors, verified)
}

fn check_token<S: Signer>(
    index: usize,
    token: &str,
    previous: Option<&str>,
    signer: &S,
    key: &S::VerifyingKey,
    verify_opts: &VerifyOptions,
    opts: &VerifyChainOptions,
) -> Checked {
    let fail = |entry_hash: Option<String>, code: ErrorCode, message: &str| Checked {
        entry_hash,
        error: Some((code, message.to_string())),
    };

    let verification = signer.verify(token, key, verify_opts);
    let claims: &ClaimsMap = match (&verification.claims, verification.ok) {
        (Some(claims), true) => claims,
        _ => {
            let message = if verification.errors.is_empty() {
                "Proof failed signature or schema validation.".to_string()
            } else {
                verification.joined_errors()
            };
            return fail(None, ErrorCode::InvalidProof, &message);
        }
    };

    let Some((prev_hash, entry_hash)) = chain_fields(claims) else {
        return fail(
            None,
            ErrorCode::InvalidProof,
            "Claims are missing chain object.",
        );
    };

    if !is_hex64(prev_hash) || !is_hex64(entry_hash) {
        return fail(
            None,
            ErrorCode::InvalidProof,
            "Claims chain hashes must be 64-char hex strings.",
        );
    }
    let claimed = Some(entry_hash.to_ascii_lowercase());

    let recomputed = match compute_entry_hash(prev_hash, &event_material(claims)) {
        Ok(hash) => hash,
        Err(e) => return fail(claimed, ErrorCode::InvalidProof, &e.to_string()),
    };
    if !hex_equals(&recomputed, entry_hash) {
        return fail(
            claimed,
            ErrorCode::ChainEntryHashMismatch,
            "chain.entry_hash does not match recomputed hash.",
        );
    }

    if index == 0 {
        if !hex_equals(prev_hash, &opts.expected_genesis_prev_hash) {
            return fail(
                claimed,
                ErrorCode::ChainGenesisPrevHashInvalid,
                "First proof chain.prev_hash does not match expected genesis prev hash.",
            );
        }
    } else if let Some(previous) = previous {
        if !hex_equals(prev_hash, previous) {
            return fail(
                claimed,
                ErrorCode::ChainLinkMismatch,
                "chain.prev_hash does not match the previous proof chain.entry_hash.",
            );
        }
    }

    Checked {
        entry_hash: claimed,
        error: None,
    }
}
