//! Scenario: payout with step-up approval.
//!
//! 1. Two independent payout proofs, each a genesis record:
//!    25.00 USD (allow) and 7500.00 USD (step_up).
//! 2. The step-up approval is appended to the step_up proof.
//! 3. The two-record chain step_up -> approval is verified.

use tracing::info;

use trustproof_chain::{append, verify_chain, ChainPrev, VerifyChainOptions};
use trustproof_contracts::{
    claims::{ActionResult, Decision, Resource},
    error::{TrustProofError, TrustProofResult},
};
use trustproof_core::traits::{SignOptions, Signer, VerifyOptions};
use trustproof_jws::{Ed25519JwsSigner, Keypair};

use super::{ActionRecord, ChainCheck, ScenarioSummary};
use crate::mock_data::{payments_agent, payout_cases, payout_policy, step_up_approval};

pub const NAME: &str = "payout_stepup";

const APPROVAL: &str = "payout_stepup_approved";

/// Run the payout step-up scenario with `keypair`.
pub fn run_scenario(keypair: &Keypair) -> TrustProofResult<ScenarioSummary> {
    let signer = Ed25519JwsSigner::new()?;
    let public = keypair.verifying_key();
    let opts = SignOptions::default();
    let mut summary = ScenarioSummary::new(NAME);

    summary.lines.push("Cases:".to_string());
    for case in payout_cases() {
        let (decision, _) = case.evaluate();
        summary.lines.push(format!(
            "- payout {} USD to {} => {}",
            case.input()["amount"].as_str().unwrap_or_default(),
            case.merchant,
            decision_label(decision)
        ));
    }
    summary.lines.push(String::new());

    // ── Independent payout proofs ─────────────────────────────────────────────

    for case in payout_cases() {
        let (decision, reason_codes) = case.evaluate();
        let input = case.input();
        let output = case.output();
        let record = ActionRecord {
            subject: payments_agent(),
            action: "payout.initiate".to_string(),
            resource: payout(case.resource_id),
            policy: payout_policy(),
            result: ActionResult {
                decision,
                reason_codes,
            },
            input: &input,
            output: &output,
            timestamp: case.timestamp,
            jti: case.jti,
        };

        let claims = record.genesis_claims()?;
        let token = signer.sign(&claims, keypair.signing_key(), &opts)?;
        let verification = signer.verify(&token, &public, &VerifyOptions::default());
        info!(case = case.name, ok = verification.ok, "payout proof issued");

        summary.record_proof(
            case.name,
            token,
            verification,
            claims,
            format!(
                "action=payout.initiate decision={} jti={}",
                decision_label(decision),
                case.jti
            ),
        );
    }

    // ── Step-up approval appended to the step_up proof ────────────────────────

    let step_up_token = summary
        .proof("payout_stepup")
        .map(|p| p.token.clone())
        .ok_or_else(|| TrustProofError::InvalidInput {
            reason: "missing payout_stepup proof; cannot append approval".to_string(),
        })?;

    let (input, output) = step_up_approval();
    let approval = ActionRecord {
        subject: payments_agent(),
        action: "payout.step_up.approve".to_string(),
        resource: payout("po_demo_2"),
        policy: payout_policy(),
        result: ActionResult {
            decision: Decision::Allow,
            reason_codes: vec!["step_up_approved".to_string()],
        },
        input: &input,
        output: &output,
        timestamp: "2026-02-24T12:00:20Z",
        jti: "demo_payout_stepup_approved",
    };
    let approval_claims = approval.claims()?;

    let approval_token = append(
        ChainPrev::Token(&step_up_token),
        serde_json::Value::Object(approval_claims.clone()),
        &signer,
        keypair.signing_key(),
        &opts,
    )?;
    let approval_verification = signer.verify(&approval_token, &public, &VerifyOptions::default());
    summary.record_proof(
        APPROVAL,
        approval_token.clone(),
        approval_verification,
        approval_claims,
        "action=payout.step_up.approve decision=allow jti=demo_payout_stepup_approved".to_string(),
    );

    let report = verify_chain(
        &[step_up_token, approval_token],
        &signer,
        &public,
        &VerifyChainOptions::default(),
    );
    summary.lines.push(String::new());
    summary.lines.push(if report.ok {
        format!("✅ Verified chain payout_stepup -> {APPROVAL}")
    } else {
        format!("❌ Chain failed payout_stepup -> {APPROVAL}")
    });
    summary.chains.push(ChainCheck {
        names: vec!["payout_stepup".to_string(), APPROVAL.to_string()],
        report,
        expect_ok: true,
    });

    Ok(summary)
}

fn payout(id: &str) -> Resource {
    Resource {
        kind: "payout".to_string(),
        id: id.to_string(),
    }
}

fn decision_label(decision: Decision) -> &'static str {
    match decision {
        Decision::Allow => "allow",
        Decision::Deny => "deny",
        Decision::StepUp => "step_up",
    }
}
