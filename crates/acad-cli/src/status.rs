//! # Status List Subcommand
//!
//! Operates on a list state file, `{"encodedList": "...", "length": N}`.
//! `set` rewrites the file in place; run one writer per list at a time.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use acad_status::{
    build_list_credential, create_list, get_bit, set_bit, EncodedList, ListCredentialOptions,
};
use acad_vc::sign_credential;

use crate::config::NodeConfig;
use crate::CliSigner;

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(subcommand)]
    pub command: StatusCommand,
}

#[derive(Subcommand, Debug)]
pub enum StatusCommand {
    /// Create an all-zero list.
    Create {
        /// Length in bits (default: config status_list_length).
        #[arg(long)]
        length: Option<usize>,
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Set or clear one bit.
    Set {
        #[arg(value_name = "LIST")]
        list: PathBuf,
        index: usize,
        /// Clear the bit (reinstate) instead of setting it.
        #[arg(long)]
        clear: bool,
    },

    /// Print whether one bit is set.
    Get {
        #[arg(value_name = "LIST")]
        list: PathBuf,
        index: usize,
    },

    /// Wrap the list in a list credential for publication at --url.
    Credential {
        #[arg(value_name = "LIST")]
        list: PathBuf,
        #[arg(long)]
        url: String,
        /// Sign with the configured or given key.
        #[arg(long)]
        sign: bool,
        #[arg(long)]
        key: Option<PathBuf>,
        #[arg(long)]
        issuer: Option<String>,
        #[arg(long)]
        verification_method: Option<String>,
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

pub async fn run_status(args: &StatusArgs, config: &NodeConfig) -> Result<u8> {
    match &args.command {
        StatusCommand::Create { length, out } => {
            let list = create_list(length.unwrap_or(config.status_list_length))?;
            crate::write_json(&list, out.as_deref())?;
            Ok(0)
        }
        StatusCommand::Set { list, index, clear } => {
            cmd_set(list, *index, !clear)?;
            Ok(0)
        }
        StatusCommand::Get { list, index } => {
            let state: EncodedList = crate::read_json(list)?;
            println!("{}", get_bit(&state.encoded_list, *index)?);
            Ok(0)
        }
        StatusCommand::Credential {
            list,
            url,
            sign,
            key,
            issuer,
            verification_method,
            out,
        } => {
            let state: EncodedList = crate::read_json(list)?;
            let issuer_arg = issuer.as_deref().or(config.issuer.as_deref());
            let credential = if *sign || key.is_some() {
                let signer = CliSigner::select(key.as_deref(), config)?;
                let (issuer, vm) = crate::signer_identity(
                    &signer,
                    issuer_arg,
                    verification_method
                        .as_deref()
                        .or(config.verification_method.as_deref()),
                )
                .await?;
                let opts = ListCredentialOptions::new(url, issuer);
                let unsigned = build_list_credential(&opts, &state.encoded_list);
                sign_credential(unsigned, vm, &signer)
                    .await
                    .context("signing list credential")?
            } else {
                let issuer = issuer_arg
                    .context("--issuer (or config issuer) is required for an unsigned list credential")?;
                let opts = ListCredentialOptions::new(url, issuer);
                build_list_credential(&opts, &state.encoded_list)
            };
            crate::write_json(&credential, out.as_deref())?;
            Ok(0)
        }
    }
}

fn cmd_set(path: &Path, index: usize, revoked: bool) -> Result<()> {
    let mut state: EncodedList = crate::read_json(path)?;
    state.encoded_list = set_bit(&state.encoded_list, index, revoked)
        .with_context(|| format!("updating {}", path.display()))?;
    crate::write_json(&state, Some(path))?;
    tracing::info!(list = %path.display(), index, revoked, "status bit written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(dir: &Path, length: usize) -> PathBuf {
        let path = dir.join("list.json");
        crate::write_json(&create_list(length).unwrap(), Some(&path)).unwrap();
        path
    }

    fn bit(path: &Path, index: usize) -> bool {
        let state: EncodedList = crate::read_json(path).unwrap();
        get_bit(&state.encoded_list, index).unwrap()
    }

    #[test]
    fn set_and_clear_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = create(dir.path(), 1024);
        cmd_set(&path, 42, true).unwrap();
        assert!(bit(&path, 42));
        cmd_set(&path, 42, false).unwrap();
        assert!(!bit(&path, 42));
        assert!(cmd_set(&path, 1024, true).is_err());
    }

    #[tokio::test]
    async fn create_uses_config_length() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("list.json");
        let config = NodeConfig {
            status_list_length: 256,
            ..NodeConfig::default()
        };
        let args = StatusArgs {
            command: StatusCommand::Create {
                length: None,
                out: Some(out.clone()),
            },
        };
        run_status(&args, &config).await.unwrap();
        let state: EncodedList = crate::read_json(&out).unwrap();
        assert_eq!(state.length, 256);
    }

    #[tokio::test]
    async fn signed_list_credential() {
        let dir = tempfile::tempdir().unwrap();
        let list = create(dir.path(), 64);
        let key = dir.path().join("issuer.key");
        let keypair = acad_crypto::Ed25519KeyPair::from_seed(&[12u8; 32]);
        std::fs::write(&key, keypair.export_seed_hex().as_bytes()).unwrap();
        let out = dir.path().join("list-vc.json");

        let args = StatusArgs {
            command: StatusCommand::Credential {
                list,
                url: "https://uni.example/status/1".into(),
                sign: true,
                key: Some(key),
                issuer: None,
                verification_method: None,
                out: Some(out.clone()),
            },
        };
        run_status(&args, &NodeConfig::default()).await.unwrap();

        let vc: acad_vc::VerifiableCredential = crate::read_json(&out).unwrap();
        assert_eq!(vc.id.as_deref(), Some("https://uni.example/status/1"));
        assert!(vc.proof.is_some());
        let result = acad_vc::CredentialVerifier::new()
            .with_issuer_key(keypair.public_key())
            .verify(&vc)
            .await;
        assert!(result.is_valid, "{result:?}");
    }

    #[tokio::test]
    async fn unsigned_credential_needs_issuer() {
        let dir = tempfile::tempdir().unwrap();
        let list = create(dir.path(), 64);
        let args = StatusArgs {
            command: StatusCommand::Credential {
                list,
                url: "https://uni.example/status/1".into(),
                sign: false,
                key: None,
                issuer: None,
                verification_method: None,
                out: None,
            },
        };
        assert!(run_status(&args, &NodeConfig::default()).await.is_err());
    }
}
