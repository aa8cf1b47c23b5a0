//! # acad CLI entry point
//!
//! Parses command-line arguments, loads the node configuration, and
//! dispatches to subcommand handlers. Handlers print JSON on stdout; logs
//! go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use acad_cli::config::NodeConfig;
use acad_cli::credential::{run_issue, run_verify, IssueArgs, VerifyArgs};
use acad_cli::did::{run_did, DidArgs};
use acad_cli::document::{run_canonicalize, run_hash, CanonicalizeArgs, HashArgs};
use acad_cli::keys::{run_keygen, KeygenArgs};
use acad_cli::presentation::{
    run_present, run_verify_presentation, PresentArgs, VerifyPresentationArgs,
};
use acad_cli::status::{run_status, StatusArgs};

/// Academic credential trust layer.
///
/// Issues and verifies W3C Verifiable Credentials and Presentations signed
/// with Ed25519, resolves did:key and did:web identities, and maintains
/// StatusList2021 revocation lists.
#[derive(Parser, Debug)]
#[command(name = "acad", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML node configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an Ed25519 key pair and print its did:key.
    Keygen(KeygenArgs),

    /// did:key encoding, did:web URL mapping, and DID resolution.
    Did(DidArgs),

    /// Print the canonical form of a JSON document.
    Canonicalize(CanonicalizeArgs),

    /// Print the SHA-256 digest or HMAC tag of a document.
    Hash(HashArgs),

    /// Issue a signed credential.
    Issue(IssueArgs),

    /// Verify a credential. Exits 2 when invalid, 3 when revoked.
    Verify(VerifyArgs),

    /// Wrap credentials in a signed presentation.
    Present(PresentArgs),

    /// Verify a presentation and its credentials. Exits 2 when invalid.
    #[command(name = "verify-presentation")]
    VerifyPresentation(VerifyPresentationArgs),

    /// Status list maintenance (create, set, get, credential).
    Status(StatusArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "acad CLI starting");

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = NodeConfig::load(cli.config.as_deref())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match &cli.command {
            Commands::Keygen(args) => run_keygen(args),
            Commands::Did(args) => run_did(args, &config).await,
            Commands::Canonicalize(args) => run_canonicalize(args),
            Commands::Hash(args) => run_hash(args),
            Commands::Issue(args) => run_issue(args, &config).await,
            Commands::Verify(args) => run_verify(args, &config).await,
            Commands::Present(args) => run_present(args, &config).await,
            Commands::VerifyPresentation(args) => run_verify_presentation(args, &config).await,
            Commands::Status(args) => run_status(args, &config).await,
        }
    })
}
