//! # trustproof-scenarios
//!
//! Reference scenarios for the TrustProof proof chain, using mock data:
//!
//! 1. **Payout step-up**: independent allow / step_up payout proofs, then a
//!    step-up approval appended to the step_up proof and the two-record
//!    chain verified.
//! 2. **Agent actions**: two chained tool-call proofs, verified, then a
//!    single flipped signature character caught by chain verification.
//!
//! All data is hardcoded and fictional.  No external calls are made.

pub mod mock_data;
pub mod scenarios;

pub use scenarios::{ChainCheck, NamedProof, ScenarioSummary};

use trustproof_contracts::error::TrustProofResult;
use trustproof_jws::Keypair;

/// Run every scenario with one keypair, in a fixed order.
pub fn run_all(keypair: &Keypair) -> TrustProofResult<Vec<ScenarioSummary>> {
    Ok(vec![
        scenarios::payout_stepup::run_scenario(keypair)?,
        scenarios::agent_actions::run_scenario(keypair)?,
    ])
}
