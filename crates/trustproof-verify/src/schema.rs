//! JSON Schema validation of the claims envelope.
//!
//! `EnvelopeSchemaValidator` implements `SchemaValidator` from
//! `trustproof-core`.  The schema document ships with the crate
//! (`spec/trustproof.schema.json`) and is compiled once at construction.

use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, warn};

use trustproof_contracts::{
    error::{TrustProofError, TrustProofResult},
    verify::{SchemaReport, SchemaViolation},
};
use trustproof_core::traits::SchemaValidator;

/// The envelope schema, draft 2020-12.
pub const ENVELOPE_SCHEMA: &str = include_str!("../../../spec/trustproof.schema.json");

/// Compiled envelope schema.
pub struct EnvelopeSchemaValidator {
    validator: Validator,
}

impl EnvelopeSchemaValidator {
    /// Compile the bundled envelope schema.
    pub fn new() -> TrustProofResult<Self> {
        let schema: Value = serde_json::from_str(ENVELOPE_SCHEMA)?;
        Self::from_schema(&schema)
    }

    /// Compile a caller-provided schema document.
    ///
    /// Returns `TrustProofError::SchemaValidation` if the document is not a
    /// valid JSON Schema.
    pub fn from_schema(schema: &Value) -> TrustProofResult<Self> {
        let validator =
            jsonschema::validator_for(schema).map_err(|e| TrustProofError::SchemaValidation {
                reason: format!("invalid JSON Schema document: {e}"),
            })?;
        debug!("envelope schema compiled");
        Ok(Self { validator })
    }
}

impl std::fmt::Debug for EnvelopeSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeSchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator for EnvelopeSchemaValidator {
    fn validate(&self, value: &Value) -> SchemaReport {
        let violations: Vec<SchemaViolation> = self
            .validator
            .iter_errors(value)
            .map(|error| {
                let violation = SchemaViolation {
                    instance_path: error.instance_path.to_string(),
                    message: error.to_string(),
                };
                warn!(
                    path = %violation.instance_path,
                    message = %violation.message,
                    "envelope schema violation"
                );
                violation
            })
            .collect();

        SchemaReport::from_violations(violations)
    }
}
