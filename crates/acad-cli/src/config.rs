//! # Node Configuration
//!
//! Optional YAML file naming this node's issuer identity and signing
//! backend. Every field has a default, and command-line flags override
//! file values.
//!
//! ```yaml
//! issuer: did:web:registrar.uni.example
//! verification_method: did:web:registrar.uni.example#key-1
//! status_list_length: 131072
//! signing_key_env: ACAD_SIGNING_KEY
//! http_timeout_secs: 10
//! remote_signer:
//!   url: https://kms.registrar.example/v1
//!   key_id: registrar-2026
//!   timeout_secs: 5
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use acad_crypto::RemoteSignerConfig;
use acad_status::DEFAULT_LIST_LENGTH;

/// Environment variable read for the signing seed when none is configured.
pub const DEFAULT_SIGNING_KEY_ENV: &str = "ACAD_SIGNING_KEY";

/// Environment variable read for the remote signer's bearer token.
pub const REMOTE_SIGNER_TOKEN_ENV: &str = "ACAD_REMOTE_SIGNER_TOKEN";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Issuer DID used when `--issuer` is not given.
    #[serde(default)]
    pub issuer: Option<String>,

    /// Verification method used when `--verification-method` is not given.
    #[serde(default)]
    pub verification_method: Option<String>,

    #[serde(default = "default_list_length")]
    pub status_list_length: usize,

    /// Environment variable holding a 64-hex-char Ed25519 seed.
    #[serde(default = "default_signing_key_env")]
    pub signing_key_env: String,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Sign through an HTTP signing service instead of a local key.
    #[serde(default)]
    pub remote_signer: Option<RemoteSignerConfig>,
}

fn default_list_length() -> usize {
    DEFAULT_LIST_LENGTH
}

fn default_signing_key_env() -> String {
    DEFAULT_SIGNING_KEY_ENV.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            issuer: None,
            verification_method: None,
            status_list_length: DEFAULT_LIST_LENGTH,
            signing_key_env: default_signing_key_env(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            remote_signer: None,
        }
    }
}

impl NodeConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let mut config: NodeConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config YAML: {}", path.display()))?;

        if let Some(remote) = config.remote_signer.take() {
            config.remote_signer = Some(match std::env::var(REMOTE_SIGNER_TOKEN_ENV) {
                Ok(token) => remote.with_token(token),
                Err(_) => remote,
            });
        }
        tracing::debug!(path = %path.display(), "loaded node config");
        Ok(config)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
