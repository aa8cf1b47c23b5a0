//! # DID Subcommand
//!
//! `encode` derives a `did:key` from a public key, `url` maps a `did:web`
//! to its document URL, and `resolve` fetches or derives a DID document.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use acad_did::{did_web_to_url, public_key_to_did_key, resolve_any};

use crate::config::NodeConfig;
use crate::{parse_public_key, CliFetcher};

#[derive(Args, Debug)]
pub struct DidArgs {
    #[command(subcommand)]
    pub command: DidCommand,
}

#[derive(Subcommand, Debug)]
pub enum DidCommand {
    /// Derive the did:key for a public key.
    Encode {
        /// Public key as 64 hex chars or z-multibase.
        #[arg(value_name = "PUBLIC_KEY", conflicts_with = "key_file", required_unless_present = "key_file")]
        public_key: Option<String>,
        /// Read the public key from a .pub file instead.
        #[arg(long)]
        key_file: Option<PathBuf>,
    },

    /// Resolve a DID to its document.
    Resolve {
        did: String,
        /// Local DID documents to consult before the network.
        #[arg(long = "document", value_name = "FILE")]
        documents: Vec<PathBuf>,
        /// Never touch the network.
        #[arg(long)]
        offline: bool,
    },

    /// Print the document URL of a did:web.
    Url { did: String },
}

pub async fn run_did(args: &DidArgs, config: &NodeConfig) -> Result<u8> {
    match &args.command {
        DidCommand::Encode {
            public_key,
            key_file,
        } => cmd_encode(public_key.as_deref(), key_file.as_deref()),
        DidCommand::Resolve {
            did,
            documents,
            offline,
        } => {
            let fetcher = CliFetcher::new(config, *offline)?.with_documents(documents)?;
            let document = resolve_any(did, &fetcher)
                .await
                .with_context(|| format!("resolving {did}"))?;
            crate::write_json(&document, None)?;
            Ok(0)
        }
        DidCommand::Url { did } => {
            println!("{}", did_web_to_url(did)?);
            Ok(0)
        }
    }
}

fn cmd_encode(public_key: Option<&str>, key_file: Option<&Path>) -> Result<u8> {
    let text = match (public_key, key_file) {
        (Some(k), _) => k.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading public key: {}", path.display()))?,
        (None, None) => bail!("a public key or --key-file is required"),
    };
    println!("{}", public_key_to_did_key(&parse_public_key(&text)?));
    Ok(0)
}
