//! `ChainCursor`: the head of a chain under construction.
//!
//! A cursor is a plain value.  Each `append` returns the signed token and
//! the cursor for the next record; the old cursor is left unchanged, so a
//! failed append never advances the chain.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use trustproof_contracts::{claims::GENESIS_PREV_HASH, error::TrustProofResult};
use trustproof_core::traits::{SignOptions, Signer};

use crate::{
    append::{seal_and_sign, ChainPrev},
    hash::require_hex64,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainCursor {
    /// Entry hash of the last appended record, or the genesis hash.
    head: String,
    /// Records appended through this cursor lineage.
    len: usize,
}

impl Default for ChainCursor {
    fn default() -> Self {
        Self::genesis()
    }
}

impl ChainCursor {
    /// A cursor for an empty chain.
    pub fn genesis() -> Self {
        Self {
            head: GENESIS_PREV_HASH.to_string(),
            len: 0,
        }
    }

    /// Resume after an existing record (token or claims).
    ///
    /// Token payloads are read without signature verification; verify the
    /// chain first if the source is untrusted.
    pub fn resume(prev: ChainPrev<'_>, len: usize) -> TrustProofResult<Self> {
        Ok(Self {
            head: prev.entry_hash()?,
            len,
        })
    }

    /// Resume from a known head hash.
    pub fn from_head(head: &str, len: usize) -> TrustProofResult<Self> {
        Ok(Self {
            head: require_hex64("head", head)?,
            len,
        })
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Link, hash and sign `next_claims` after the current head.
    pub fn append<S: Signer>(
        &self,
        next_claims: Value,
        signer: &S,
        key: &S::SigningKey,
        opts: &SignOptions,
    ) -> TrustProofResult<(String, ChainCursor)> {
        let (token, link) = seal_and_sign(&self.head, next_claims, signer, key, opts)?;
        let next = ChainCursor {
            head: link.entry_hash,
            len: self.len + 1,
        };
        info!(len = next.len, head = %next.head, "chain advanced");
        Ok((token, next))
    }
}
