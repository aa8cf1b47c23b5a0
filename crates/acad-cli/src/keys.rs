//! # Key Generation Subcommand
//!
//! Writes `<prefix>.key` (hex seed) and `<prefix>.pub` (hex public key) and
//! prints the key's `did:key` identity.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use acad_crypto::Ed25519KeyPair;
use acad_did::public_key_to_did_key;

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the key files.
    #[arg(long, short, default_value = ".")]
    pub out: PathBuf,
    /// Filename prefix.
    #[arg(long, default_value = "acad")]
    pub prefix: String,
}

pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    keygen(&args.out, &args.prefix, Ed25519KeyPair::generate())
}

fn keygen(out: &Path, prefix: &str, keypair: Ed25519KeyPair) -> Result<u8> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory: {}", out.display()))?;

    let public_key = keypair.public_key();
    let key_path = out.join(format!("{prefix}.key"));
    let pub_path = out.join(format!("{prefix}.pub"));

    std::fs::write(&key_path, keypair.export_seed_hex().as_bytes())
        .with_context(|| format!("failed to write private key: {}", key_path.display()))?;
    restrict_permissions(&key_path)?;
    std::fs::write(&pub_path, public_key.to_hex())
        .with_context(|| format!("failed to write public key: {}", pub_path.display()))?;

    let did = public_key_to_did_key(&public_key);
    tracing::info!(did = %did, key = %key_path.display(), "generated Ed25519 key");
    crate::write_json(
        &json!({
            "did": did,
            "verificationMethod": format!("{did}#{}", &did[acad_did::key::DID_KEY_PREFIX.len()..]),
            "publicKeyMultibase": public_key.to_multibase(),
            "privateKeyFile": key_path.display().to_string(),
            "publicKeyFile": pub_path.display().to_string(),
        }),
        None,
    )?;
    Ok(0)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to restrict permissions: {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
