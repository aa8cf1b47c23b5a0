//! Presentation subcommands: `present` wraps credentials for a verifier's
//! challenge and domain; `verify-presentation` checks the holder proof and
//! every embedded credential.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use acad_did::DidKeyResolver;
use acad_status::StatusListChecker;
use acad_vc::{
    create_presentation, CredentialCheck, PresentationOptions, PresentationVerifier,
    PresentationVerifyResult, VerifiableCredential, VerifiablePresentation,
};

use crate::config::NodeConfig;
use crate::credential::{build_verifier, VerifyOptions};
use crate::{parse_public_key, CliFetcher, CliSigner, EXIT_INVALID};

#[derive(Args, Debug)]
pub struct PresentArgs {
    /// Credential files to embed, in order.
    #[arg(value_name = "CREDENTIAL", required = true)]
    pub credentials: Vec<PathBuf>,
    /// Verifier-chosen nonce.
    #[arg(long)]
    pub challenge: String,
    /// Verifier identity.
    #[arg(long)]
    pub domain: String,
    /// Holder private key file (hex seed). Overrides configured backends.
    #[arg(long)]
    pub key: Option<PathBuf>,
    /// Holder DID (default: the key's did:key).
    #[arg(long)]
    pub holder: Option<String>,
    #[arg(long)]
    pub verification_method: Option<String>,
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VerifyPresentationArgs {
    /// Presentation JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Expected challenge.
    #[arg(long)]
    pub challenge: String,
    /// Expected domain.
    #[arg(long)]
    pub domain: String,
    /// Pinned holder public key (hex or z-multibase).
    #[arg(long)]
    pub holder_key: Option<String>,
    #[command(flatten)]
    pub options: VerifyOptions,
}

pub async fn run_present(args: &PresentArgs, config: &NodeConfig) -> Result<u8> {
    let signer = CliSigner::select(args.key.as_deref(), config)?;
    let (holder, verification_method) = crate::signer_identity(
        &signer,
        args.holder.as_deref(),
        args.verification_method.as_deref(),
    )
    .await?;

    let credentials = args
        .credentials
        .iter()
        .map(|path| crate::read_json::<VerifiableCredential>(path))
        .collect::<Result<Vec<_>>>()?;

    let presentation = create_presentation(
        PresentationOptions::new(
            holder,
            verification_method,
            credentials,
            &args.challenge,
            &args.domain,
        ),
        &signer,
    )
    .await
    .context("creating presentation")?;
    crate::write_json(&presentation, args.out.as_deref())?;
    Ok(0)
}

pub async fn run_verify_presentation(args: &VerifyPresentationArgs, config: &NodeConfig) -> Result<u8> {
    let presentation: VerifiablePresentation = crate::read_json(&args.file)?;
    let fetcher = CliFetcher::new(config, args.options.offline)?
        .with_documents(&args.options.documents)?;

    let credential_verifier = build_verifier(&args.options, &fetcher)?;
    let result = if args.options.status {
        let check = credential_verifier.with_revocation_check(StatusListChecker::new(&fetcher));
        verify_with(args, &fetcher, check, &presentation).await?
    } else {
        verify_with(args, &fetcher, credential_verifier, &presentation).await?
    };

    crate::write_json(&result, None)?;
    Ok(if result.is_valid { 0 } else { EXIT_INVALID })
}

async fn verify_with<C: CredentialCheck>(
    args: &VerifyPresentationArgs,
    fetcher: &CliFetcher,
    check: C,
    presentation: &VerifiablePresentation,
) -> Result<PresentationVerifyResult> {
    let mut verifier = PresentationVerifier::new(&args.challenge, &args.domain, check)
        .with_resolver(DidKeyResolver::new(fetcher));
    if let Some(key) = &args.holder_key {
        verifier = verifier.with_holder_key(parse_public_key(key)?);
    }
    Ok(verifier.verify(presentation).await)
}
