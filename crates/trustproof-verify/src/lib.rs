//! # trustproof-verify
//!
//! Structural validation of TrustProof claims envelopes.
//!
//! `EnvelopeSchemaValidator` checks a claims object against the bundled
//! JSON Schema: required fields, no unknown fields, decision values,
//! lowercase hex digests and the timestamp pattern.  Violations are
//! reported as values, never as errors.

pub mod schema;

pub use schema::{EnvelopeSchemaValidator, ENVELOPE_SCHEMA};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use trustproof_core::traits::SchemaValidator;

    use super::EnvelopeSchemaValidator;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn validator() -> EnvelopeSchemaValidator {
        EnvelopeSchemaValidator::new().unwrap()
    }

    fn example(name: &str) -> Value {
        let path = format!("{}/../../spec/examples/{name}.json", env!("CARGO_MANIFEST_DIR"));
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn bundled_examples_are_valid() {
        for name in ["allow", "deny", "step_up"] {
            let report = validator().validate(&example(name));
            assert!(report.valid, "{name}: {}", report.summary());
        }
    }

    #[test]
    fn missing_required_field_is_reported() {
        let mut claims = example("allow");
        claims.as_object_mut().unwrap().remove("jti");

        let report = validator().validate(&claims);
        assert!(!report.valid);
        assert!(report.summary().contains("jti"));
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let mut claims = example("allow");
        claims["iat"] = json!(1_700_000_000);

        assert!(!validator().validate(&claims).valid);
    }

    #[test]
    fn unknown_decision_is_rejected() {
        let mut claims = example("allow");
        claims["result"]["decision"] = json!("maybe");

        let report = validator().validate(&claims);
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .any(|v| v.instance_path == "/result/decision"));
    }

    #[test]
    fn uppercase_io_hashes_are_rejected() {
        let mut claims = example("deny");
        let upper = claims["hashes"]["input_hash"].as_str().unwrap().to_uppercase();
        claims["hashes"]["input_hash"] = json!(upper);

        assert!(!validator().validate(&claims).valid);
    }

    #[test]
    fn uppercase_chain_hashes_are_accepted() {
        let mut claims = example("step_up");
        let upper = claims["chain"]["entry_hash"].as_str().unwrap().to_uppercase();
        claims["chain"]["entry_hash"] = json!(upper);

        assert!(validator().validate(&claims).valid);
    }

    #[test]
    fn empty_jti_is_rejected() {
        let mut claims = example("allow");
        claims["jti"] = json!("");

        assert!(!validator().validate(&claims).valid);
    }

    #[test]
    fn non_object_reports_root_path() {
        let report = validator().validate(&json!("not claims"));
        assert!(!report.valid);
        assert!(report.summary().starts_with("(root)"));
    }

    #[test]
    fn invalid_schema_document_is_an_error() {
        let err = EnvelopeSchemaValidator::from_schema(&json!({"type": 12})).unwrap_err();
        assert!(err.to_string().contains("invalid JSON Schema document"));
    }
}
