//! TrustProof command-line interface.
//!
//! Verifies, inspects and chain-verifies proof tokens, generates Ed25519 key
//! pairs, and runs the reference scenarios.
//!
//! Usage:
//!   trustproof verify <token> --pubkey <pem|b64|path> [--json]
//!   trustproof inspect <token> [--json]
//!   trustproof verify-chain <token>... --pubkey <pem|b64|path> [--config chain.toml] [--json]
//!   trustproof keygen --out-dir keys/
//!   trustproof demo run-all

mod commands;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::DemoScenario;

// ── CLI definition ────────────────────────────────────────────────────────────

/// TrustProof: signed, hash-chained action proofs.
#[derive(Parser)]
#[command(
    name = "trustproof",
    about = "Verify and inspect TrustProof tokens",
    long_about = "Verifies TrustProof compact JWS tokens against an Ed25519 public key,\n\
                  decodes token payloads, checks hash chains, and runs reference scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify one token's signature, schema and jti.
    Verify {
        token: Option<String>,
        /// Public key as PEM text, base64-encoded PEM, or a file path.
        #[arg(long)]
        pubkey: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Decode a token's payload without verifying it.
    Inspect {
        token: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Verify an ordered list of tokens as one hash chain.
    VerifyChain {
        tokens: Vec<String>,
        /// Read additional tokens from a file, one per line.
        #[arg(long)]
        from_file: Option<PathBuf>,
        #[arg(long)]
        pubkey: Option<String>,
        /// TOML chain configuration (genesis, length limit, collect_all).
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Generate an Ed25519 key pair as private.pem / public.pem.
    Keygen {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Run reference scenarios with a fresh key pair.
    Demo {
        #[arg(value_enum, default_value = "run-all")]
        scenario: DemoScenario,
        /// Write proofs.json and summary.txt per scenario under this directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Logs go to stderr so --json output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let result = run(cli.command, &mut out, &mut err);
    let _ = out.flush();

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("trustproof: {e}");
            std::process::exit(1);
        }
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

fn run(command: Command, out: &mut dyn Write, err: &mut dyn Write) -> commands::Exit {
    match command {
        Command::Verify {
            token,
            pubkey,
            json,
        } => commands::verify(token.as_deref(), pubkey.as_deref(), json, out, err),
        Command::Inspect { token, json } => commands::inspect(token.as_deref(), json, out, err),
        Command::VerifyChain {
            tokens,
            from_file,
            pubkey,
            config,
            json,
        } => {
            let tokens = commands::collect_tokens(tokens, from_file.as_deref())?;
            commands::verify_chain_cmd(
                &tokens,
                pubkey.as_deref(),
                config.as_deref(),
                json,
                out,
                err,
            )
        }
        Command::Keygen { out_dir } => commands::keygen(&out_dir, out, err),
        Command::Demo {
            scenario,
            out_dir,
            json,
        } => commands::demo(scenario, out_dir.as_deref(), json, out, err),
    }
}
