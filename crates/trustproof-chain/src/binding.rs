//! Input/output hash bindings.
//!
//! A verifier holding the original input or output of an action can check
//! that the proof committed to exactly that value.

use serde_json::{json, Value};

use trustproof_contracts::{
    claims::ClaimsMap,
    verify::{ErrorCode, ProofError},
};
use trustproof_core::traits::VerifyOptions;

use crate::hash::{hash_canonical, hex_equals};

/// Compare `hashes.input_hash` / `hashes.output_hash` against the canonical
/// hashes of the expected values in `opts`.
///
/// Returns one error per mismatching binding; unset expectations are skipped.
pub fn check_hash_bindings(claims: &ClaimsMap, opts: &VerifyOptions) -> Vec<ProofError> {
    let mut errors = Vec::new();

    if let Some(expected) = &opts.expected_input {
        if let Some(err) = check_one(
            claims,
            "input_hash",
            expected,
            ErrorCode::InputHashMismatch,
            "hashes.input_hash does not match the expected input.",
        ) {
            errors.push(err);
        }
    }

    if let Some(expected) = &opts.expected_output {
        if let Some(err) = check_one(
            claims,
            "output_hash",
            expected,
            ErrorCode::OutputHashMismatch,
            "hashes.output_hash does not match the expected output.",
        ) {
            errors.push(err);
        }
    }

    errors
}

fn check_one(
    claims: &ClaimsMap,
    field: &str,
    expected: &Value,
    code: ErrorCode,
    message: &str,
) -> Option<ProofError> {
    let expected_hash = hash_canonical(expected);
    let actual = claims
        .get("hashes")
        .and_then(|hashes| hashes.get(field))
        .and_then(Value::as_str);

    match actual {
        Some(actual) if hex_equals(actual, &expected_hash) => None,
        _ => Some(ProofError::new(code, message).with_details(json!({
            "expected_hash": expected_hash,
            "actual_hash": actual,
        }))),
    }
}
