//! # Credential Subcommands
//!
//! `issue` builds and signs a credential with the selected backend;
//! `verify` runs the verification pipeline and prints its result. Issuer
//! keys come from `--issuer-key` or DID resolution; `--status` enables the
//! revocation check against the credential's status list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use acad_did::DidKeyResolver;
use acad_status::StatusListChecker;
use acad_vc::{
    create_credential, CredentialOptions, CredentialVerifier, VerifiableCredential, VerifyResult,
};

use crate::config::NodeConfig;
use crate::{parse_public_key, CliFetcher, CliSigner, EXIT_INVALID, EXIT_REVOKED};

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Subject DID.
    #[arg(long)]
    pub subject: String,
    /// JSON object of subject claims.
    #[arg(long, value_name = "FILE")]
    pub claims: Option<PathBuf>,
    /// Additional credential type (repeatable).
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<String>,
    /// Credential id (default: urn:uuid).
    #[arg(long)]
    pub id: Option<String>,
    /// Expiration, RFC 3339.
    #[arg(long)]
    pub expires: Option<DateTime<Utc>>,
    /// Status list URL for the revocation pointer.
    #[arg(long, requires = "status_index")]
    pub status_list: Option<String>,
    /// Bit index in the status list.
    #[arg(long, requires = "status_list")]
    pub status_index: Option<usize>,
    /// Private key file (hex seed). Overrides configured backends.
    #[arg(long)]
    pub key: Option<PathBuf>,
    /// Issuer DID (default: config, then the key's did:key).
    #[arg(long)]
    pub issuer: Option<String>,
    /// Verification method (default: config, then the key's did:key method).
    #[arg(long)]
    pub verification_method: Option<String>,
    /// Write the credential here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Options shared by credential and presentation verification.
#[derive(Args, Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Pinned issuer public key (hex or z-multibase); skips DID resolution.
    #[arg(long)]
    pub issuer_key: Option<String>,
    /// Check revocation through the credential's status list.
    #[arg(long)]
    pub status: bool,
    /// Local DID documents or status list credentials to serve before the
    /// network (repeatable).
    #[arg(long = "document", value_name = "FILE")]
    pub documents: Vec<PathBuf>,
    /// Never touch the network.
    #[arg(long)]
    pub offline: bool,
    /// Evaluate temporal checks at this instant (RFC 3339) instead of now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    #[command(flatten)]
    pub options: VerifyOptions,
}

pub async fn run_issue(args: &IssueArgs, config: &NodeConfig) -> Result<u8> {
    let signer = CliSigner::select(args.key.as_deref(), config)?;
    let (issuer, verification_method) = crate::signer_identity(
        &signer,
        args.issuer.as_deref().or(config.issuer.as_deref()),
        args.verification_method
            .as_deref()
            .or(config.verification_method.as_deref()),
    )
    .await?;

    let mut opts = CredentialOptions::new(issuer, verification_method, &args.subject);
    if let Some(path) = &args.claims {
        opts = opts.with_claims(crate::read_json(path)?);
    }
    for t in &args.types {
        opts = opts.with_type(t);
    }
    if let Some(id) = &args.id {
        opts = opts.with_id(id);
    }
    if let Some(at) = args.expires {
        opts = opts.expires_at(at);
    }
    if let (Some(list), Some(index)) = (&args.status_list, args.status_index) {
        opts = opts.with_status(list, index);
    }

    let credential = create_credential(opts, &signer)
        .await
        .context("issuing credential")?;
    crate::write_json(&credential, args.out.as_deref())?;
    Ok(0)
}

pub async fn run_verify(args: &VerifyArgs, config: &NodeConfig) -> Result<u8> {
    let credential: VerifiableCredential = crate::read_json(&args.file)?;
    let result = verify_credential(&credential, &args.options, config).await?;
    crate::write_json(&result, None)?;
    Ok(exit_code(&result))
}

/// Run the credential pipeline with the flags in `options`.
pub async fn verify_credential(
    credential: &VerifiableCredential,
    options: &VerifyOptions,
    config: &NodeConfig,
) -> Result<VerifyResult> {
    let fetcher = CliFetcher::new(config, options.offline)?.with_documents(&options.documents)?;
    if options.status {
        let verifier = build_verifier(options, &fetcher)?
            .with_revocation_check(StatusListChecker::new(&fetcher));
        Ok(verifier.verify(credential).await)
    } else {
        Ok(build_verifier(options, &fetcher)?.verify(credential).await)
    }
}

/// A verifier configured from `options`, resolving keys through `fetcher`.
pub fn build_verifier<'a>(
    options: &VerifyOptions,
    fetcher: &'a CliFetcher,
) -> Result<CredentialVerifier<DidKeyResolver<&'a CliFetcher>>> {
    let mut verifier = CredentialVerifier::new().with_resolver(DidKeyResolver::new(fetcher));
    if let Some(key) = &options.issuer_key {
        verifier = verifier.with_issuer_key(parse_public_key(key)?);
    }
    if let Some(at) = options.at {
        verifier = verifier.at(at);
    }
    Ok(verifier)
}

/// Process exit code for a credential result.
pub fn exit_code(result: &VerifyResult) -> u8 {
    if !result.is_valid {
        EXIT_INVALID
    } else if result.is_revoked {
        EXIT_REVOKED
    } else {
        0
    }
}
