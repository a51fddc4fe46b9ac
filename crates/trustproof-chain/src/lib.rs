//! # trustproof-chain
//!
//! Tamper-evident hash chaining for TrustProof claims.
//!
//! ## Overview
//!
//! Each record commits to its own canonical event material and to the
//! previous record's entry hash.  Editing, dropping, or reordering any
//! record breaks the chain and is detected by `verify_chain`.
//!
//! Signing is delegated to a `trustproof_core::Signer`; this crate never
//! touches key material.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trustproof_chain::{append, verify_chain, ChainPrev, VerifyChainOptions};
//!
//! let first = append(ChainPrev::Genesis, claims_a, &signer, &key, &opts)?;
//! let second = append(ChainPrev::Token(&first), claims_b, &signer, &key, &opts)?;
//!
//! let report = verify_chain(&[first, second], &signer, &public_key, &VerifyChainOptions::default());
//! assert!(report.ok);
//! ```

pub mod append;
pub mod binding;
pub mod canonical;
pub mod chain;
pub mod config;
pub mod cursor;
pub mod hash;
pub mod token;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use append::{append, ChainPrev};
pub use binding::check_hash_bindings;
pub use canonical::canonicalize;
pub use chain::{compute_canonical_event_material, compute_entry_hash, event_material, seal};
pub use config::ChainConfig;
pub use cursor::ChainCursor;
pub use hash::{hash_canonical, hex_equals, is_hex64, normalize_hex, sha256_hex};
pub use token::{decode_payload_untrusted, split_compact, CompactParts};
pub use verifier::{verify_chain, VerifyChainOptions};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use trustproof_contracts::{
        claims::{ClaimsMap, GENESIS_PREV_HASH},
        error::TrustProofError,
        verify::ErrorCode,
    };
    use trustproof_core::traits::SignOptions;

    use super::*;
    use crate::test_support::{build_chain, claims, forge, payload, DigestSigner, KEY};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn verify(tokens: &[String]) -> trustproof_contracts::verify::ChainReport {
        verify_chain(tokens, &DigestSigner, KEY, &VerifyChainOptions::default())
    }

    // ── Append ────────────────────────────────────────────────────────────────

    #[test]
    fn genesis_append_links_to_zero_hash() {
        let token = build_chain(1).remove(0);
        let claims = payload(&token);

        assert_eq!(claims["chain"]["prev_hash"], json!(GENESIS_PREV_HASH));
        let expected = compute_entry_hash(GENESIS_PREV_HASH, &event_material(&claims)).unwrap();
        assert_eq!(claims["chain"]["entry_hash"], json!(expected));
    }

    #[test]
    fn append_links_to_previous_entry_hash() {
        let tokens = build_chain(2);
        assert_eq!(
            payload(&tokens[1])["chain"]["prev_hash"],
            payload(&tokens[0])["chain"]["entry_hash"]
        );
    }

    #[test]
    fn claims_prev_matches_token_prev() {
        let first = build_chain(1).remove(0);
        let first_claims = payload(&first);
        let opts = SignOptions::default();

        let via_token = append(
            ChainPrev::Token(&first),
            claims("jti_1", "payout.approve"),
            &DigestSigner,
            KEY,
            &opts,
        )
        .unwrap();
        let via_claims = append(
            ChainPrev::Claims(&first_claims),
            claims("jti_1", "payout.approve"),
            &DigestSigner,
            KEY,
            &opts,
        )
        .unwrap();

        assert_eq!(via_token, via_claims);
    }

    #[test]
    fn append_replaces_existing_chain_object() {
        let mut next = claims("jti_0", "payout.initiate");
        next["chain"] = json!({"prev_hash": "f".repeat(64), "entry_hash": "e".repeat(64)});

        let token = append(ChainPrev::Genesis, next, &DigestSigner, KEY, &SignOptions::default())
            .unwrap();
        let chain = &payload(&token)["chain"];
        assert_eq!(chain["prev_hash"], json!(GENESIS_PREV_HASH));
        assert_ne!(chain["entry_hash"], json!("e".repeat(64)));
    }

    #[test]
    fn append_normalizes_uppercase_prev_entry_hash() {
        let mut prev = ClaimsMap::new();
        prev.insert("chain".to_string(), json!({"entry_hash": "ABCDEF".repeat(10) + "ABCD"}));

        let token = append(
            ChainPrev::Claims(&prev),
            claims("jti_1", "payout.initiate"),
            &DigestSigner,
            KEY,
            &SignOptions::default(),
        )
        .unwrap();
        assert_eq!(
            payload(&token)["chain"]["prev_hash"],
            json!("abcdef".repeat(10) + "abcd")
        );
    }

    #[test]
    fn append_rejects_non_object_claims() {
        let err = append(ChainPrev::Genesis, json!("nope"), &DigestSigner, KEY, &SignOptions::default())
            .unwrap_err();
        assert!(matches!(err, TrustProofError::InvalidInput { .. }));
    }

    #[test]
    fn append_rejects_prev_without_entry_hash() {
        let prev = ClaimsMap::new();
        let err = append(
            ChainPrev::Claims(&prev),
            claims("jti_1", "x"),
            &DigestSigner,
            KEY,
            &SignOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TrustProofError::InvalidInput { .. }));

        let mut prev = ClaimsMap::new();
        prev.insert("chain".to_string(), json!({"entry_hash": "short"}));
        let err = append(
            ChainPrev::Claims(&prev),
            claims("jti_1", "x"),
            &DigestSigner,
            KEY,
            &SignOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TrustProofError::InvalidHex { .. }));
    }

    #[test]
    fn append_rejects_malformed_prev_token() {
        let err = append(
            ChainPrev::Token("not-a-token"),
            claims("jti_1", "x"),
            &DigestSigner,
            KEY,
            &SignOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TrustProofError::MalformedToken { .. }));
    }

    #[test]
    fn append_surfaces_signer_errors() {
        let mut next = claims("jti_0", "x");
        next.as_object_mut().unwrap().remove("jti");

        let err = append(ChainPrev::Genesis, next, &DigestSigner, KEY, &SignOptions::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid TrustProof envelope"));
    }

    // ── verify_chain ──────────────────────────────────────────────────────────

    #[test]
    fn empty_chain_is_valid() {
        let report = verify(&[]);
        assert!(report.ok);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn built_chain_verifies() {
        let report = verify(&build_chain(5));
        assert!(report.ok, "errors: {:?}", report.errors);
        assert_eq!(report.verified, 5);
        assert_eq!(report, trustproof_contracts::verify::ChainReport::passed(5));
    }

    #[test]
    fn bad_signature_is_invalid_proof_at_index() {
        let mut tokens = build_chain(3);
        tokens[1] = format!("{}x", tokens[1].trim_end_matches(|c: char| c != '.'));

        let report = verify(&tokens);
        let err = report.first_error().unwrap();
        assert!(!report.ok);
        assert_eq!(err.index, Some(1));
        assert_eq!(err.code, ErrorCode::InvalidProof);
        assert!(err.message.contains("INVALID_SIGNATURE"));
        assert_eq!(report.verified, 1);
    }

    #[test]
    fn edited_material_is_entry_hash_mismatch() {
        let mut tokens = build_chain(3);
        tokens[2] = forge(&tokens[2], |c| {
            c.insert("action".to_string(), json!("payout.cancel"));
        });

        let err = verify(&tokens).first_error().cloned().unwrap();
        assert_eq!(err.index, Some(2));
        assert_eq!(err.code, ErrorCode::ChainEntryHashMismatch);
    }

    #[test]
    fn reordered_tokens_break_the_link() {
        let mut tokens = build_chain(3);
        tokens.swap(1, 2);

        let err = verify(&tokens).first_error().cloned().unwrap();
        assert_eq!(err.index, Some(1));
        assert_eq!(err.code, ErrorCode::ChainLinkMismatch);
    }

    #[test]
    fn relinked_record_with_recomputed_hash_is_link_mismatch() {
        let mut tokens = build_chain(2);
        tokens[1] = forge(&tokens[1], |c| {
            seal(c, &"1".repeat(64)).unwrap();
        });

        let err = verify(&tokens).first_error().cloned().unwrap();
        assert_eq!(err.code, ErrorCode::ChainLinkMismatch);
        assert_eq!(
            err.message,
            "chain.prev_hash does not match the previous proof chain.entry_hash."
        );
    }

    #[test]
    fn dropped_first_record_fails_genesis_check() {
        let tokens = build_chain(3);
        let err = verify(&tokens[1..]).first_error().cloned().unwrap();
        assert_eq!(err.index, Some(0));
        assert_eq!(err.code, ErrorCode::ChainGenesisPrevHashInvalid);
    }

    #[test]
    fn missing_chain_object_is_invalid_proof() {
        let tokens = vec![forge(&build_chain(1)[0], |c| {
            c.remove("chain");
        })];
        let err = verify(&tokens).first_error().cloned().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidProof);
        assert_eq!(err.message, "Claims are missing chain object.");
    }

    #[test]
    fn non_hex_chain_hash_is_invalid_proof() {
        let tokens = vec![forge(&build_chain(1)[0], |c| {
            c["chain"]["entry_hash"] = json!("zz");
        })];
        let err = verify(&tokens).first_error().cloned().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidProof);
        assert_eq!(err.message, "Claims chain hashes must be 64-char hex strings.");
    }

    #[test]
    fn uppercase_chain_hashes_still_verify() {
        let tokens = vec![forge(&build_chain(1)[0], |c| {
            let upper = |v: &Value| json!(v.as_str().unwrap().to_uppercase());
            let prev = upper(&c["chain"]["prev_hash"]);
            let entry = upper(&c["chain"]["entry_hash"]);
            c.insert("chain".to_string(), json!({"prev_hash": prev, "entry_hash": entry}));
        })];
        assert!(verify(&tokens).ok);
    }

    #[test]
    fn invalid_genesis_option_is_unindexed() {
        let opts = VerifyChainOptions::with_genesis("not-hex");
        let report = verify_chain(&build_chain(1), &DigestSigner, KEY, &opts);

        let err = report.first_error().unwrap();
        assert_eq!(err.index, None);
        assert_eq!(err.code, ErrorCode::ChainGenesisPrevHashInvalid);
    }

    #[test]
    fn custom_genesis_is_honored() {
        let genesis = "9".repeat(64);
        let first = append(
            ChainPrev::Genesis,
            claims("jti_0", "x"),
            &DigestSigner,
            KEY,
            &SignOptions::default(),
        )
        .unwrap();
        let rebased = forge(&first, |c| {
            seal(c, &genesis).unwrap();
        });

        let opts = VerifyChainOptions::with_genesis(genesis.to_uppercase());
        assert!(verify_chain(&[rebased.clone()], &DigestSigner, KEY, &opts).ok);
        assert!(!verify(&[rebased]).ok);
    }

    #[test]
    fn max_chain_length_is_enforced() {
        let opts = VerifyChainOptions {
            max_chain_length: Some(2),
            ..VerifyChainOptions::default()
        };
        let report = verify_chain(&build_chain(3), &DigestSigner, KEY, &opts);
        let err = report.first_error().unwrap();
        assert_eq!(err.index, None);
        assert_eq!(err.code, ErrorCode::InvalidProof);

        assert!(verify_chain(&build_chain(2), &DigestSigner, KEY, &opts).ok);
    }

    #[test]
    fn collect_all_reports_every_failing_index() {
        let mut tokens = build_chain(5);
        tokens[1] = "garbage".to_string();
        tokens[3] = forge(&tokens[3], |c| {
            c.insert("jti".to_string(), json!("other"));
        });

        let opts = VerifyChainOptions {
            collect_all: true,
            ..VerifyChainOptions::default()
        };
        let report = verify_chain(&tokens, &DigestSigner, KEY, &opts);
        let indexes: Vec<_> = report.errors.iter().map(|e| e.index).collect();

        assert!(!report.ok);
        assert_eq!(indexes, vec![Some(1), Some(3)]);
        assert_eq!(report.errors[1].code, ErrorCode::ChainEntryHashMismatch);
        assert_eq!(report.verified, 1);
    }

    // ── ChainCursor ───────────────────────────────────────────────────────────

    #[test]
    fn cursor_threads_the_chain() {
        let opts = SignOptions::default();
        let cursor = ChainCursor::genesis();
        let (t0, cursor) = cursor
            .append(claims("jti_0", "a"), &DigestSigner, KEY, &opts)
            .unwrap();
        let (t1, cursor) = cursor
            .append(claims("jti_1", "b"), &DigestSigner, KEY, &opts)
            .unwrap();

        assert_eq!(cursor.len(), 2);
        assert_eq!(json!(cursor.head()), payload(&t1)["chain"]["entry_hash"]);
        assert!(verify(&[t0, t1]).ok);
    }

    #[test]
    fn failed_cursor_append_does_not_advance() {
        let cursor = ChainCursor::genesis();
        assert!(cursor
            .append(json!(null), &DigestSigner, KEY, &SignOptions::default())
            .is_err());
        assert_eq!(cursor.head(), GENESIS_PREV_HASH);
        assert!(cursor.is_empty());
    }

    #[test]
    fn cursor_resumes_from_token() {
        let tokens = build_chain(2);
        let cursor = ChainCursor::resume(ChainPrev::Token(&tokens[1]), 2).unwrap();
        let (t2, _) = cursor
            .append(claims("jti_2", "c"), &DigestSigner, KEY, &SignOptions::default())
            .unwrap();

        let mut all = tokens;
        all.push(t2);
        assert!(verify(&all).ok);
        assert!(ChainCursor::from_head("nope", 0).is_err());
    }

    // ── Properties ────────────────────────────────────────────────────────────

    mod properties {
        use proptest::prelude::*;
        use serde_json::{json, Map, Value};

        use crate::canonical::canonicalize;
        use crate::test_support::{build_chain, forge, DigestSigner, KEY};
        use crate::{verify_chain, VerifyChainOptions};

        fn arb_json() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(|n| json!(n)),
                "[a-zA-Z0-9 éü中\\\\\"]{0,12}".prop_map(Value::String),
            ];
            leaf.prop_recursive(3, 32, 6, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                    prop::collection::btree_map("[a-zA-Z_é]{1,6}", inner, 0..6)
                        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
                ]
            })
        }

        /// The same entries, in two independent insertion orders.
        fn arb_shuffled_entries() -> impl Strategy<Value = (Vec<(String, Value)>, Vec<(String, Value)>)> {
            prop::collection::btree_map("[a-zA-Z_é中]{1,6}", arb_json(), 1..8).prop_flat_map(|map| {
                let entries: Vec<(String, Value)> = map.into_iter().collect();
                (Just(entries.clone()).prop_shuffle(), Just(entries).prop_shuffle())
            })
        }

        /// JSON object text with keys written in exactly the given order.
        fn object_text(entries: &[(String, Value)]) -> String {
            let body: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}:{}", Value::String(key.clone()), value))
                .collect();
            format!("{{{}}}", body.join(","))
        }

        proptest! {
            #[test]
            fn key_insertion_order_does_not_change_canonical_form(
                (first, second) in arb_shuffled_entries()
            ) {
                let a: Value = serde_json::from_str(&object_text(&first)).unwrap();
                let b: Value = serde_json::from_str(&object_text(&second)).unwrap();
                prop_assert_eq!(canonicalize(&a), canonicalize(&b));

                let mut built_a = Map::new();
                for (key, value) in first.iter().rev() {
                    built_a.insert(key.clone(), value.clone());
                }
                let mut built_b = Map::new();
                for (key, value) in &second {
                    built_b.insert(key.clone(), value.clone());
                }
                prop_assert_eq!(
                    canonicalize(&Value::Object(built_a)),
                    canonicalize(&Value::Object(built_b))
                );
            }

            #[test]
            fn canonical_form_is_a_fixed_point(value in arb_json()) {
                let once = canonicalize(&value);
                let reparsed: Value = serde_json::from_str(&once).unwrap();
                prop_assert_eq!(canonicalize(&reparsed), once);
            }

            #[test]
            fn any_material_edit_is_detected(idx in 0usize..3, action in "[a-z.]{1,16}") {
                let mut tokens = build_chain(3);
                prop_assume!(action != "payout.initiate");
                tokens[idx] = forge(&tokens[idx], |c| {
                    c.insert("action".to_string(), json!(action));
                });

                let report = verify_chain(&tokens, &DigestSigner, KEY, &VerifyChainOptions::default());
                prop_assert!(!report.ok);
                prop_assert_eq!(report.errors[0].index, Some(idx));
            }
        }
    }
}
