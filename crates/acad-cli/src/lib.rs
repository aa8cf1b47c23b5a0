//! # acad-cli — Operator CLI for the Credential Trust Layer
//!
//! ## Subcommands
//!
//! - `acad keygen`: generate an Ed25519 key and its `did:key`.
//! - `acad did encode|resolve|url`: DID codec and resolution.
//! - `acad canonicalize` / `acad hash`: JCS form and SHA-256/HMAC digests.
//! - `acad issue` / `acad verify`: credentials.
//! - `acad present` / `acad verify-presentation`: presentations.
//! - `acad status create|set|get|credential`: revocation lists.
//!
//! ```bash
//! acad keygen --out keys --prefix registrar
//! acad issue --key keys/registrar.key --subject did:key:z... --claims grade.json --status-list https://uni.example/status/1 --status-index 7
//! acad verify credential.json --status
//! ```
//!
//! Handlers return the process exit code: 0 on success, 2 when a
//! verification completes with `isValid = false`, 3 when it completes with
//! a revoked credential. Errors exit 1 from `main`.

pub mod config;
pub mod credential;
pub mod did;
pub mod document;
pub mod keys;
pub mod presentation;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use zeroize::Zeroizing;

use acad_core::{Fetch, FetchError, FetchResponse, MemoryFetcher};
use acad_crypto::{
    CryptoError, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, LocalSigner, RemoteSigner,
    Signer,
};
use acad_did::HttpFetcher;

use crate::config::NodeConfig;

/// Exit code for a verification that completed with `isValid = false`.
pub const EXIT_INVALID: u8 = 2;

/// Exit code for a validly signed but revoked credential.
pub const EXIT_REVOKED: u8 = 3;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing JSON: {}", path.display()))
}

/// Pretty-print `value` to `out`, or to stdout when `out` is `None`.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing output")?;
    match out {
        Some(path) => std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}

/// Load a key file holding a 64-hex-char seed.
pub fn load_key_file(path: &Path) -> Result<Ed25519KeyPair> {
    if !path.exists() {
        bail!("private key file not found: {}", path.display());
    }
    let hex = Zeroizing::new(
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
    );
    Ed25519KeyPair::from_hex_seed(hex.trim())
        .with_context(|| format!("invalid private key: {}", path.display()))
}

/// Parse a public key given as 64 hex chars or `z`-multibase.
pub fn parse_public_key(s: &str) -> Result<Ed25519PublicKey> {
    let s = s.trim();
    let key = if s.starts_with('z') {
        Ed25519PublicKey::from_multibase(s)
    } else {
        Ed25519PublicKey::from_hex(s)
    };
    key.with_context(|| format!("invalid public key {s:?}"))
}

// ── Signing backend selection ────────────────────────────────────────────

/// The signing backend chosen from flags and configuration.
#[derive(Debug)]
pub enum CliSigner {
    Local(LocalSigner),
    Remote(RemoteSigner),
}

impl CliSigner {
    /// `--key` file first, then the configured remote signer, then the
    /// configured environment variable.
    pub fn select(key_file: Option<&Path>, config: &NodeConfig) -> Result<Self> {
        if let Some(path) = key_file {
            return Ok(Self::Local(LocalSigner::new(load_key_file(path)?)));
        }
        if let Some(remote) = &config.remote_signer {
            let signer = RemoteSigner::new(remote.clone()).context("configuring remote signer")?;
            return Ok(Self::Remote(signer));
        }
        let signer = LocalSigner::from_env(&config.signing_key_env).with_context(|| {
            format!(
                "no signing key: pass --key, configure remote_signer, or set {}",
                config.signing_key_env
            )
        })?;
        Ok(Self::Local(signer))
    }
}

impl Signer for CliSigner {
    async fn sign(&self, data: &acad_core::CanonicalBytes) -> Result<Ed25519Signature, CryptoError> {
        match self {
            Self::Local(s) => s.sign(data).await,
            Self::Remote(s) => s.sign(data).await,
        }
    }

    async fn public_key(&self) -> Result<Ed25519PublicKey, CryptoError> {
        match self {
            Self::Local(s) => s.public_key().await,
            Self::Remote(s) => s.public_key().await,
        }
    }

    fn provider_name(&self) -> &str {
        match self {
            Self::Local(s) => s.provider_name(),
            Self::Remote(s) => s.provider_name(),
        }
    }
}

/// Signer identity: issuer/holder DID and verification method.
///
/// Explicit values win; otherwise the signer's `did:key` is used.
pub async fn signer_identity(
    signer: &CliSigner,
    did: Option<&str>,
    verification_method: Option<&str>,
) -> Result<(String, String)> {
    if let (Some(did), Some(vm)) = (did, verification_method) {
        return Ok((did.to_string(), vm.to_string()));
    }
    let key = signer.public_key().await.context("reading signer public key")?;
    let did_key = acad_did::public_key_to_did_key(&key);
    let fragment = &did_key[acad_did::key::DID_KEY_PREFIX.len()..];
    let did = did.map_or_else(|| did_key.clone(), str::to_string);
    let vm = verification_method.map_or_else(|| format!("{did_key}#{fragment}"), str::to_string);
    Ok((did, vm))
}

// ── Fetch capability ─────────────────────────────────────────────────────

/// Preloaded documents, optionally backed by HTTP.
///
/// A URL found in the local table is answered from it; anything else goes
/// to the network unless the fetcher is offline.
#[derive(Debug)]
pub struct CliFetcher {
    local: MemoryFetcher,
    preloaded: Vec<String>,
    http: Option<HttpFetcher>,
}

impl CliFetcher {
    pub fn new(config: &NodeConfig, offline: bool) -> Result<Self> {
        let http = if offline {
            None
        } else {
            Some(HttpFetcher::new(config.http_timeout()).context("building HTTP client")?)
        };
        Ok(Self {
            local: MemoryFetcher::new(),
            preloaded: Vec::new(),
            http,
        })
    }

    /// Serve the JSON document in `path` at the URL its `id` names. A
    /// `did:web` document is served at the DID's document URL.
    pub fn preload(&mut self, path: &Path) -> Result<String> {
        let doc: serde_json::Value = read_json(path)?;
        let Some(id) = doc.get("id").and_then(serde_json::Value::as_str) else {
            bail!("{} has no \"id\" to serve it under", path.display());
        };
        let url = if id.starts_with(acad_did::web::DID_WEB_PREFIX) {
            acad_did::did_web_to_url(id)
                .with_context(|| format!("{}: bad DID {id:?}", path.display()))?
        } else {
            id.to_string()
        };
        self.local
            .insert_json(url.clone(), &doc)
            .context("storing preloaded document")?;
        self.preloaded.push(url.clone());
        Ok(url)
    }

    /// Preload every file in `paths`.
    pub fn with_documents(mut self, paths: &[PathBuf]) -> Result<Self> {
        for path in paths {
            let url = self.preload(path)?;
            tracing::debug!(url = %url, path = %path.display(), "preloaded document");
        }
        Ok(self)
    }
}

impl Fetch for CliFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        if self.preloaded.iter().any(|u| u == url) {
            return self.local.fetch(url).await;
        }
        match &self.http {
            Some(http) => http.fetch(url).await,
            None => Err(FetchError::Transport {
                url: url.to_string(),
                reason: "offline and not preloaded".into(),
            }),
        }
    }
}
