//! Scenario: chained agent tool calls.
//!
//! Two tool calls (`payout_quote`, then `payout_initiate`) are recorded as a
//! chain.  The chain is verified, then one character of the second proof's
//! signature is flipped and the chain must fail at index 1.

use serde_json::Value;
use tracing::{info, warn};

use trustproof_chain::{
    append, split_compact, verify_chain, ChainPrev, VerifyChainOptions,
};
use trustproof_contracts::{
    claims::{ActionResult, Decision, Resource},
    error::{TrustProofError, TrustProofResult},
};
use trustproof_core::traits::{SignOptions, Signer, VerifyOptions};
use trustproof_jws::{Ed25519JwsSigner, Keypair};

use super::{ActionRecord, ChainCheck, ScenarioSummary};
use crate::mock_data::{payments_agent, tool_actions, tool_policy, ToolAction};

pub const NAME: &str = "agent_actions";

/// Run the agent tool-call scenario with `keypair`.
pub fn run_scenario(keypair: &Keypair) -> TrustProofResult<ScenarioSummary> {
    let signer = Ed25519JwsSigner::new()?;
    let public = keypair.verifying_key();
    let opts = SignOptions::default();
    let mut summary = ScenarioSummary::new(NAME);

    let actions = tool_actions();
    let [quote, initiate] = actions.as_slice() else {
        return Err(TrustProofError::InvalidInput {
            reason: "agent_actions needs exactly two tool calls".to_string(),
        });
    };

    summary.lines.push("Simulated tool calls:".to_string());
    for action in &actions {
        summary.lines.push(format!("- {}", action.tool_name.replace('_', ".")));
    }
    summary.lines.push(String::new());

    let first_claims = record_for(quote).genesis_claims()?;
    let first = signer.sign(&first_claims, keypair.signing_key(), &opts)?;
    let first_verification = signer.verify(&first, &public, &VerifyOptions::default());
    summary.record_proof(
        quote.name,
        first.clone(),
        first_verification,
        first_claims,
        detail(quote),
    );

    let second_claims = record_for(initiate).claims()?;
    let second = append(
        ChainPrev::Token(&first),
        Value::Object(second_claims.clone()),
        &signer,
        keypair.signing_key(),
        &opts,
    )?;
    let second_verification = signer.verify(&second, &public, &VerifyOptions::default());
    summary.record_proof(
        initiate.name,
        second.clone(),
        second_verification,
        second_claims,
        detail(initiate),
    );

    let names = vec![quote.name.to_string(), initiate.name.to_string()];
    let chain_opts = VerifyChainOptions::default();

    let report = verify_chain(&[first.clone(), second.clone()], &signer, &public, &chain_opts);
    summary.lines.push(String::new());
    summary.lines.push(if report.ok {
        format!("✅ Verified chain {} -> {}", quote.name, initiate.name)
    } else {
        format!("❌ Chain failed {} -> {}", quote.name, initiate.name)
    });
    info!(ok = report.ok, "tool-call chain verified");
    summary.chains.push(ChainCheck {
        names: names.clone(),
        report,
        expect_ok: true,
    });

    let tampered = tamper_one_char(&second)?;
    let tampered_report = verify_chain(&[first, tampered], &signer, &public, &chain_opts);
    summary.lines.push(if tampered_report.ok {
        "❌ Tamper => FAIL (unexpectedly verified)".to_string()
    } else {
        "✅ Tamper => OK (failed as expected)".to_string()
    });
    summary.lines.push(format!(
        "  tamper_error={}",
        tampered_report
            .first_error()
            .map(|e| e.code.as_str())
            .unwrap_or("NONE")
    ));
    if tampered_report.ok {
        warn!("tampered chain verified");
    }
    summary.chains.push(ChainCheck {
        names,
        report: tampered_report,
        expect_ok: false,
    });

    Ok(summary)
}

fn record_for(action: &ToolAction) -> ActionRecord<'_> {
    ActionRecord {
        subject: payments_agent(),
        action: format!("agent.tool.{}", action.tool_name),
        resource: Resource {
            kind: "tool".to_string(),
            id: action.tool_name.to_string(),
        },
        policy: tool_policy(),
        result: ActionResult {
            decision: Decision::Allow,
            reason_codes: vec!["tool_call_ok".to_string()],
        },
        input: &action.input,
        output: &action.output,
        timestamp: action.timestamp,
        jti: action.jti,
    }
}

fn detail(action: &ToolAction) -> String {
    format!(
        "action=agent.tool.{} resource={} jti={}",
        action.tool_name, action.tool_name, action.jti
    )
}

/// Replace one character near the start of the signature segment.
fn tamper_one_char(token: &str) -> TrustProofResult<String> {
    let parts = split_compact(token)?;
    let mut signature: Vec<char> = parts.signature.chars().collect();
    let index = 10.min(signature.len() - 1);
    signature[index] = if signature[index] == 'a' { 'b' } else { 'a' };
    Ok(format!(
        "{}.{}",
        parts.signing_input(),
        signature.into_iter().collect::<String>()
    ))
}
