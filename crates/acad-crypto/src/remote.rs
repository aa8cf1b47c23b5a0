//! # Remote Signing Service Client
//!
//! [`RemoteSigner`] delegates Ed25519 operations to an HTTP signing service
//! so that the issuer's private key never enters this process.
//!
//! ## Wire contract
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | sign | `POST {base}/sign` `{"keyId", "data"}` | `{"signature"}` |
//! | public key | `GET {base}/keys/{keyId}` | `{"publicKey"}` |
//! | verify | `POST {base}/verify` `{"data", "signature", "publicKey"}` | `{"valid"}` |
//!
//! `data` and `signature` are base64url without padding; `publicKey` uses
//! the multibase convention of [`crate::encoding`].
//!
//! ## Timeout & Retry
//!
//! One per-request timeout from [`RemoteSignerConfig::timeout_secs`].
//! Retries are NOT performed here; a transport failure surfaces as
//! [`CryptoError::Transport`] and the caller decides what to do.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use acad_core::CanonicalBytes;

use crate::ed25519::{Ed25519PublicKey, Ed25519Signature};
use crate::encoding::base64url_encode;
use crate::error::CryptoError;
use crate::signer::{SignatureVerifier, Signer};

/// Default request timeout for the signing service.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`RemoteSigner`].
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteSignerConfig {
    /// Base URL of the signing service (e.g. `https://kms.registrar.example/v1`).
    pub url: String,
    /// Key identifier known to the service.
    pub key_id: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional bearer token. Not serialized.
    #[serde(skip)]
    pub api_token: Option<Zeroizing<String>>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RemoteSignerConfig {
    /// Create a configuration with the default timeout and no token.
    pub fn new(url: impl Into<String>, key_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_id: key_id.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_token: None,
        }
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Zeroizing::new(token.into()));
        self
    }
}

impl std::fmt::Debug for RemoteSignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSignerConfig")
            .field("url", &self.url)
            .field("key_id", &self.key_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest<'a> {
    key_id: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct SignResponse {
    signature: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyResponse {
    public_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest {
    data: String,
    signature: String,
    public_key: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
}

/// HTTP client for a remote Ed25519 signing service.
#[derive(Debug, Clone)]
pub struct RemoteSigner {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
}

impl RemoteSigner {
    /// Build a client from configuration.
    pub fn new(config: RemoteSignerConfig) -> Result<Self, CryptoError> {
        let parsed = url::Url::parse(&config.url).map_err(|e| CryptoError::Transport {
            endpoint: config.url.clone(),
            reason: format!("invalid signing service URL: {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CryptoError::Transport {
                endpoint: config.url.clone(),
                reason: format!("unsupported URL scheme {:?}", parsed.scheme()),
            });
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = &config.api_token {
            let bearer = Zeroizing::new(format!("Bearer {}", token.as_str()));
            let mut value = reqwest::header::HeaderValue::from_str(&bearer)
                .map_err(|_| CryptoError::Transport {
                    endpoint: config.url.clone(),
                    reason: "invalid API token characters".into(),
                })?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CryptoError::Transport {
                endpoint: config.url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            key_id: config.key_id,
        })
    }

    /// Key identifier used for signing requests.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<T, CryptoError> {
        let resp = request.send().await.map_err(|e| {
            tracing::warn!(endpoint, error = %e, "signing service unreachable");
            CryptoError::Transport {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(endpoint, status = status.as_u16(), "signing service rejected request");
            return Err(CryptoError::RemoteRejected {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: body.chars().take(256).collect(),
            });
        }

        resp.json::<T>().await.map_err(|e| CryptoError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    fn invalid(endpoint: &str, e: CryptoError) -> CryptoError {
        CryptoError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        }
    }
}

impl Signer for RemoteSigner {
    async fn sign(&self, data: &CanonicalBytes) -> Result<Ed25519Signature, CryptoError> {
        let endpoint = format!("{}/sign", self.base_url);
        let body = SignRequest {
            key_id: &self.key_id,
            data: base64url_encode(data.as_bytes()),
        };
        let resp: SignResponse = self
            .send(self.client.post(&endpoint).json(&body), &endpoint)
            .await?;
        Ed25519Signature::from_base64url(&resp.signature).map_err(|e| Self::invalid(&endpoint, e))
    }

    async fn public_key(&self) -> Result<Ed25519PublicKey, CryptoError> {
        let endpoint = format!(
            "{}/keys/{}",
            self.base_url,
            urlencoding::encode(&self.key_id)
        );
        let resp: KeyResponse = self.send(self.client.get(&endpoint), &endpoint).await?;
        Ed25519PublicKey::from_multibase(&resp.public_key).map_err(|e| Self::invalid(&endpoint, e))
    }

    fn provider_name(&self) -> &str {
        "RemoteSigner"
    }
}

impl SignatureVerifier for RemoteSigner {
    async fn verify(
        &self,
        data: &CanonicalBytes,
        signature: &Ed25519Signature,
        public_key: &Ed25519PublicKey,
    ) -> Result<bool, CryptoError> {
        let endpoint = format!("{}/verify", self.base_url);
        let body = VerifyRequest {
            data: base64url_encode(data.as_bytes()),
            signature: signature.to_base64url(),
            public_key: public_key.to_multibase(),
        };
        let resp: VerifyResponse = self
            .send(self.client.post(&endpoint).json(&body), &endpoint)
            .await?;
        Ok(resp.valid)
    }
}
