//! Reference scenarios.
//!
//! Each scenario wires the real components (envelope schema, Ed25519 signer,
//! chain appender and verifier) to mock data and returns a structured
//! `ScenarioSummary` instead of printing, so the CLI and tests can inspect
//! the outcome.

pub mod agent_actions;
pub mod payout_stepup;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use trustproof_chain::{hash_canonical, seal};
use trustproof_contracts::{
    claims::{ActionResult, ChainLink, Claims, ClaimsMap, Hashes, Policy, Resource, Subject},
    error::TrustProofResult,
    verify::{ChainReport, ProofVerification},
    GENESIS_PREV_HASH,
};

/// One proof produced by a scenario, with its verification outcome.
#[derive(Debug, Clone, Serialize)]
pub struct NamedProof {
    pub name: String,
    pub token: String,
    pub claims: ClaimsMap,
    pub verification: ProofVerification,
}

/// A chain a scenario verified, by proof names.
#[derive(Debug, Clone, Serialize)]
pub struct ChainCheck {
    pub names: Vec<String>,
    pub report: ChainReport,
    /// Whether the scenario expected this chain to verify.
    pub expect_ok: bool,
}

impl ChainCheck {
    pub fn as_expected(&self) -> bool {
        self.report.ok == self.expect_ok
    }
}

/// Everything a scenario run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub proofs: Vec<NamedProof>,
    pub chains: Vec<ChainCheck>,
    pub lines: Vec<String>,
}

impl ScenarioSummary {
    pub(crate) fn new(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            proofs: Vec::new(),
            chains: Vec::new(),
            lines: vec![format!("TrustProof Example: {scenario}"), String::new()],
        }
    }

    /// True when every proof verified and every chain behaved as expected.
    pub fn passed(&self) -> bool {
        self.proofs.iter().all(|p| p.verification.ok)
            && self.chains.iter().all(ChainCheck::as_expected)
    }

    pub(crate) fn record_proof(
        &mut self,
        name: &str,
        token: String,
        verification: ProofVerification,
        fallback_claims: ClaimsMap,
        detail: String,
    ) {
        self.lines.push(verify_line(name, verification.ok));
        self.lines.push(format!("  {detail}"));
        self.proofs.push(NamedProof {
            name: name.to_string(),
            token,
            claims: verification.claims.clone().unwrap_or(fallback_claims),
            verification,
        });
    }

    pub(crate) fn proof(&self, name: &str) -> Option<&NamedProof> {
        self.proofs.iter().find(|p| p.name == name)
    }
}

fn verify_line(name: &str, ok: bool) -> String {
    if ok {
        format!("✅ Verified {name}")
    } else {
        format!("❌ Not Verified {name}")
    }
}

/// Inputs for one action record.
pub(crate) struct ActionRecord<'a> {
    pub subject: Subject,
    pub action: String,
    pub resource: Resource,
    pub policy: Policy,
    pub result: ActionResult,
    pub input: &'a serde_json::Value,
    pub output: &'a serde_json::Value,
    pub timestamp: &'a str,
    pub jti: &'a str,
}

impl ActionRecord<'_> {
    /// Build claims with I/O hashes filled in and a genesis placeholder link.
    pub(crate) fn claims(&self) -> TrustProofResult<ClaimsMap> {
        Claims {
            subject: self.subject.clone(),
            action: self.action.clone(),
            resource: self.resource.clone(),
            policy: self.policy.clone(),
            result: self.result.clone(),
            hashes: Hashes {
                input_hash: hash_canonical(self.input),
                output_hash: hash_canonical(self.output),
            },
            timestamp: self.timestamp.to_string(),
            jti: self.jti.to_string(),
            chain: ChainLink::genesis_placeholder(),
        }
        .to_map()
    }

    /// Claims sealed as the first record of a new chain.
    pub(crate) fn genesis_claims(&self) -> TrustProofResult<ClaimsMap> {
        let mut claims = self.claims()?;
        seal(&mut claims, GENESIS_PREV_HASH)?;
        Ok(claims)
    }
}
