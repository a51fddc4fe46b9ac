//! Subcommand implementations.
//!
//! Each command writes to the given `out` / `err` sinks and returns the
//! process exit code, so the commands can be exercised without spawning the
//! binary.

use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;

use trustproof_chain::{decode_payload_untrusted, verify_chain, ChainConfig};
use trustproof_contracts::{
    claims::ClaimsMap,
    verify::{ErrorCode, ProofError},
};
use trustproof_core::traits::{Signer, VerifyOptions};
use trustproof_jws::{load_verifying_key, Ed25519JwsSigner, Keypair};
use trustproof_scenarios::{
    scenarios::{agent_actions, payout_stepup},
    ScenarioSummary,
};

pub type Exit = io::Result<i32>;

/// Which reference scenario(s) `demo` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DemoScenario {
    PayoutStepup,
    AgentActions,
    RunAll,
}

// ── verify ────────────────────────────────────────────────────────────────────

pub fn verify(
    token: Option<&str>,
    pubkey: Option<&str>,
    json_mode: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Exit {
    let Some(token) = token else {
        return fail(
            json_mode,
            ProofError::new(ErrorCode::MissingArgument, "missing <token> argument"),
            out,
            err,
        );
    };
    let Some(pubkey) = pubkey else {
        return fail(
            json_mode,
            ProofError::new(ErrorCode::MissingArgument, "missing --pubkey <pem|b64|path>"),
            out,
            err,
        );
    };
    let key = match load_verifying_key(pubkey) {
        Ok(key) => key,
        Err(e) => {
            return fail(
                json_mode,
                ProofError::new(ErrorCode::PubkeyLoadError, e.to_string()),
                out,
                err,
            )
        }
    };

    let signer = match Ed25519JwsSigner::new() {
        Ok(signer) => signer,
        Err(e) => {
            writeln!(err, "{e}")?;
            return Ok(1);
        }
    };
    let result = signer.verify(token, &key, &VerifyOptions::default());

    if json_mode {
        writeln!(out, "{}", serde_json::to_string(&result)?)?;
    } else if result.ok {
        let claims = result.claims.clone().unwrap_or_default();
        writeln!(out, "{}", verified_summary(&claims))?;
    } else {
        writeln!(err, "{}", not_verified(&result.errors))?;
    }
    Ok(if result.ok { 0 } else { 1 })
}

fn fail(json_mode: bool, error: ProofError, out: &mut dyn Write, err: &mut dyn Write) -> Exit {
    if json_mode {
        let body = json!({"ok": false, "errors": [error]});
        writeln!(out, "{body}")?;
    } else {
        writeln!(err, "{}", not_verified(std::slice::from_ref(&error)))?;
    }
    Ok(1)
}

fn text_at<'a>(claims: &'a ClaimsMap, path: &[&str]) -> &'a str {
    let mut value: Option<&Value> = claims.get(path[0]);
    for key in &path[1..] {
        value = value.and_then(|v| v.get(*key));
    }
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
}

fn short_hash(claims: &ClaimsMap, path: &[&str]) -> String {
    match text_at(claims, path) {
        "unknown" => "unknown".to_string(),
        hash => format!("{}…", hash.chars().take(6).collect::<String>()),
    }
}

pub(crate) fn verified_summary(claims: &ClaimsMap) -> String {
    [
        "✅ Verified".to_string(),
        format!(
            "Subject: {}:{}",
            text_at(claims, &["subject", "type"]),
            text_at(claims, &["subject", "id"])
        ),
        format!("Action: {}", text_at(claims, &["action"])),
        format!("Decision: {}", text_at(claims, &["result", "decision"])),
        format!(
            "Resource: {}:{}",
            text_at(claims, &["resource", "type"]),
            text_at(claims, &["resource", "id"])
        ),
        format!("Timestamp: {}", text_at(claims, &["timestamp"])),
        format!("JTI: {}", text_at(claims, &["jti"])),
        format!(
            "Hashes: input={} output={}",
            short_hash(claims, &["hashes", "input_hash"]),
            short_hash(claims, &["hashes", "output_hash"])
        ),
        format!(
            "Chain: prev={} entry={}",
            short_hash(claims, &["chain", "prev_hash"]),
            short_hash(claims, &["chain", "entry_hash"])
        ),
    ]
    .join("\n")
}

pub(crate) fn not_verified(errors: &[ProofError]) -> String {
    let mut lines = vec!["❌ Not Verified".to_string()];
    lines.extend(errors.iter().map(|e| format!("{}: {}", e.code, e.message)));
    lines.join("\n")
}

// ── inspect ───────────────────────────────────────────────────────────────────

pub fn inspect(token: Option<&str>, json_mode: bool, out: &mut dyn Write, err: &mut dyn Write) -> Exit {
    let Some(token) = token else {
        writeln!(err, "FAIL\nmissing <token> argument")?;
        return Ok(1);
    };

    match decode_payload_untrusted(token) {
        Ok(payload) => {
            let payload = Value::Object(payload);
            if json_mode {
                writeln!(out, "{}", serde_json::to_string(&payload)?)?;
            } else {
                writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
            }
            Ok(0)
        }
        Err(e) => {
            if json_mode {
                writeln!(out, "{}", json!({"error": e.to_string()}))?;
            } else {
                writeln!(err, "FAIL\n{e}")?;
            }
            Ok(1)
        }
    }
}

// ── verify-chain ──────────────────────────────────────────────────────────────

pub fn verify_chain_cmd(
    tokens: &[String],
    pubkey: Option<&str>,
    config: Option<&Path>,
    json_mode: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Exit {
    let Some(pubkey) = pubkey else {
        return fail(
            json_mode,
            ProofError::new(ErrorCode::MissingArgument, "missing --pubkey <pem|b64|path>"),
            out,
            err,
        );
    };
    let key = match load_verifying_key(pubkey) {
        Ok(key) => key,
        Err(e) => {
            return fail(
                json_mode,
                ProofError::new(ErrorCode::PubkeyLoadError, e.to_string()),
                out,
                err,
            )
        }
    };

    let config = match config.map(ChainConfig::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            writeln!(err, "{e}")?;
            return Ok(1);
        }
    };
    debug!(tokens = tokens.len(), ?config, "verifying chain");

    let signer = match Ed25519JwsSigner::new() {
        Ok(signer) => signer,
        Err(e) => {
            writeln!(err, "{e}")?;
            return Ok(1);
        }
    };
    let report = verify_chain(tokens, &signer, &key, &config.verify_options());

    if json_mode {
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    } else if report.ok {
        writeln!(out, "✅ Chain verified ({} proofs)", report.verified)?;
    } else {
        writeln!(err, "❌ Chain not verified")?;
        for e in &report.errors {
            match e.index {
                Some(index) => writeln!(err, "[{index}] {}: {}", e.code, e.message)?,
                None => writeln!(err, "{}: {}", e.code, e.message)?,
            }
        }
    }
    Ok(if report.ok { 0 } else { 1 })
}

/// Tokens from positional arguments, then from `path` one per line.
pub fn collect_tokens(positional: Vec<String>, path: Option<&Path>) -> io::Result<Vec<String>> {
    let mut tokens = positional;
    if let Some(path) = path {
        let text = std::fs::read_to_string(path)?;
        tokens.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    Ok(tokens)
}

// ── keygen ────────────────────────────────────────────────────────────────────

pub fn keygen(out_dir: &Path, out: &mut dyn Write, err: &mut dyn Write) -> Exit {
    let keypair = Keypair::generate();
    match keypair.write_pem_files(out_dir) {
        Ok(()) => {
            writeln!(out, "wrote {}", out_dir.join("private.pem").display())?;
            writeln!(out, "wrote {}", out_dir.join("public.pem").display())?;
            Ok(0)
        }
        Err(e) => {
            writeln!(err, "{e}")?;
            Ok(1)
        }
    }
}

// ── demo ──────────────────────────────────────────────────────────────────────

pub fn demo(
    scenario: DemoScenario,
    out_dir: Option<&Path>,
    json_mode: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Exit {
    let keypair = Keypair::generate();
    let runs: Vec<fn(&Keypair) -> trustproof_contracts::TrustProofResult<ScenarioSummary>> =
        match scenario {
            DemoScenario::PayoutStepup => vec![payout_stepup::run_scenario],
            DemoScenario::AgentActions => vec![agent_actions::run_scenario],
            DemoScenario::RunAll => vec![payout_stepup::run_scenario, agent_actions::run_scenario],
        };

    let mut summaries = Vec::new();
    for run in runs {
        match run(&keypair) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                writeln!(err, "Demo error: {e}")?;
                return Ok(1);
            }
        }
    }

    if let Some(dir) = out_dir {
        for summary in &summaries {
            write_outputs(dir, summary)?;
        }
    }

    if json_mode {
        writeln!(out, "{}", serde_json::to_string(&summaries)?)?;
    } else {
        print_banner(out)?;
        for summary in &summaries {
            writeln!(out, "{}", summary.lines.join("\n"))?;
            writeln!(out)?;
        }
    }

    let passed = summaries.iter().all(ScenarioSummary::passed);
    if !passed {
        writeln!(err, "One or more scenarios did not behave as expected.")?;
    }
    Ok(if passed { 0 } else { 1 })
}

/// `<dir>/<scenario>/proofs.json` and `<dir>/<scenario>/summary.txt`.
fn write_outputs(dir: &Path, summary: &ScenarioSummary) -> io::Result<()> {
    let target = dir.join(&summary.scenario);
    std::fs::create_dir_all(&target)?;
    std::fs::write(
        target.join("proofs.json"),
        format!("{}\n", serde_json::to_string_pretty(&summary.proofs)?),
    )?;
    std::fs::write(
        target.join("summary.txt"),
        format!("{}\n", summary.lines.join("\n")),
    )?;
    Ok(())
}

fn print_banner(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "TrustProof: Signed, Hash-Chained Action Proofs")?;
    writeln!(out, "==============================================")?;
    writeln!(out)?;
    writeln!(out, "Per record:")?;
    writeln!(out, "  [1] Canonical JSON of input/output hashed into hashes.*")?;
    writeln!(out, "  [2] Event material = canonical JSON of the eight core claims")?;
    writeln!(out, "  [3] entry_hash = sha256(prev_hash + material)")?;
    writeln!(out, "  [4] Claims signed as an EdDSA compact JWS")?;
    writeln!(out)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
