//! The claims envelope carried inside every proof token.
//!
//! The hashing protocol operates on untyped JSON objects ([`ClaimsMap`]) so
//! that it can re-derive hashes from whatever a verified token actually
//! contains.  [`Claims`] is the typed form callers use to *build* a record;
//! convert it with [`Claims::to_map`] before appending or signing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{TrustProofError, TrustProofResult};

/// An untyped claims object, as it appears in a token payload.
pub type ClaimsMap = Map<String, Value>;

/// The `prev_hash` of the first record in a chain: sixty-four `'0'` characters.
pub const GENESIS_PREV_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// The eight fields that make up the canonical event material, in order.
///
/// `chain` is deliberately absent: it holds the hash computed over these.
pub const EVENT_MATERIAL_FIELDS: [&str; 8] = [
    "subject",
    "action",
    "resource",
    "policy",
    "result",
    "hashes",
    "timestamp",
    "jti",
];

/// The actor that performed the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// The target of the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// Authorization context in force when the action ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_v: String,
    pub scopes: Vec<String>,
    pub constraints: Map<String, Value>,
}

/// The outcome of a policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny,
    StepUp,
}

/// Decision plus the machine-readable reasons behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub decision: Decision,
    pub reason_codes: Vec<String>,
}

/// SHA-256 digests (lowercase hex) of the canonical input and output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashes {
    pub input_hash: String,
    pub output_hash: String,
}

/// One link of the hash chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub prev_hash: String,
    pub entry_hash: String,
}

impl ChainLink {
    /// A placeholder link pointing at genesis.  The appender overwrites both
    /// fields, so this only exists to make a freshly built envelope complete.
    pub fn genesis_placeholder() -> Self {
        Self {
            prev_hash: GENESIS_PREV_HASH.to_string(),
            entry_hash: GENESIS_PREV_HASH.to_string(),
        }
    }
}

/// The full claims envelope for one audited action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub subject: Subject,
    pub action: String,
    pub resource: Resource,
    pub policy: Policy,
    pub result: ActionResult,
    pub hashes: Hashes,
    /// ISO-8601 timestamp string.
    pub timestamp: String,
    /// Unique record identifier.
    pub jti: String,
    pub chain: ChainLink,
}

impl Claims {
    /// Convert into the untyped JSON object form used by the protocol.
    pub fn to_map(&self) -> TrustProofResult<ClaimsMap> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(TrustProofError::InvalidInput {
                reason: format!("claims serialized to non-object JSON: {other}"),
            }),
        }
    }

    /// Parse a typed envelope out of an untyped claims object.
    pub fn from_map(map: &ClaimsMap) -> TrustProofResult<Self> {
        Ok(serde_json::from_value(Value::Object(map.clone()))?)
    }
}
