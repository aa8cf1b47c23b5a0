//! # Signing Backends
//!
//! [`Signer`] and [`SignatureVerifier`] abstract where the private key
//! lives. Issue and verify pipelines are generic over these traits, so the
//! same code path serves an in-memory key, a key injected through the
//! environment, or an HTTP signing service.
//!
//! Both traits are async: a remote backend performs network I/O, and the
//! caller owns scheduling, timeout and retry policy. The local
//! implementations complete immediately.

use std::future::Future;
use std::sync::Arc;

use zeroize::Zeroizing;

use acad_core::CanonicalBytes;

use crate::ed25519::{self, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use crate::error::CryptoError;

/// Ed25519 signing backend.
pub trait Signer: Send + Sync {
    /// Sign canonicalized data with the managed key.
    fn sign(
        &self,
        data: &CanonicalBytes,
    ) -> impl Future<Output = Result<Ed25519Signature, CryptoError>> + Send;

    /// The public key matching the managed private key.
    fn public_key(&self) -> impl Future<Output = Result<Ed25519PublicKey, CryptoError>> + Send;

    /// Human-readable name for diagnostics.
    fn provider_name(&self) -> &str;
}

/// Ed25519 verification backend.
///
/// `Ok(false)` means the signature is invalid. `Err` is reserved for a
/// backend that could not answer at all.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `data` under `public_key`.
    fn verify(
        &self,
        data: &CanonicalBytes,
        signature: &Ed25519Signature,
        public_key: &Ed25519PublicKey,
    ) -> impl Future<Output = Result<bool, CryptoError>> + Send;
}

impl<T: Signer + ?Sized> Signer for &T {
    fn sign(
        &self,
        data: &CanonicalBytes,
    ) -> impl Future<Output = Result<Ed25519Signature, CryptoError>> + Send {
        (**self).sign(data)
    }

    fn public_key(&self) -> impl Future<Output = Result<Ed25519PublicKey, CryptoError>> + Send {
        (**self).public_key()
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

impl<T: Signer + ?Sized> Signer for Arc<T> {
    fn sign(
        &self,
        data: &CanonicalBytes,
    ) -> impl Future<Output = Result<Ed25519Signature, CryptoError>> + Send {
        (**self).sign(data)
    }

    fn public_key(&self) -> impl Future<Output = Result<Ed25519PublicKey, CryptoError>> + Send {
        (**self).public_key()
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for &T {
    fn verify(
        &self,
        data: &CanonicalBytes,
        signature: &Ed25519Signature,
        public_key: &Ed25519PublicKey,
    ) -> impl Future<Output = Result<bool, CryptoError>> + Send {
        (**self).verify(data, signature, public_key)
    }
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for Arc<T> {
    fn verify(
        &self,
        data: &CanonicalBytes,
        signature: &Ed25519Signature,
        public_key: &Ed25519PublicKey,
    ) -> impl Future<Output = Result<bool, CryptoError>> + Send {
        (**self).verify(data, signature, public_key)
    }
}

// ── LocalSigner ──────────────────────────────────────────────────────────

/// In-memory Ed25519 signer.
///
/// Key material lives in process memory and is zeroized on drop.
#[derive(Debug)]
pub struct LocalSigner {
    keypair: Ed25519KeyPair,
    source: &'static str,
}

impl LocalSigner {
    /// Wrap an existing key pair.
    pub fn new(keypair: Ed25519KeyPair) -> Self {
        Self {
            keypair,
            source: "LocalSigner",
        }
    }

    /// Generate a fresh key from the OS CSPRNG.
    pub fn generate() -> Self {
        Self::new(Ed25519KeyPair::generate())
    }

    /// Create from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::new(Ed25519KeyPair::from_seed(seed))
    }

    /// Load the seed from an environment variable holding 64 hex chars.
    ///
    /// ```bash
    /// export ACAD_SIGNING_KEY="9f1c..."  # 64 hex chars
    /// ```
    pub fn from_env(var_name: &str) -> Result<Self, CryptoError> {
        let hex = Zeroizing::new(std::env::var(var_name).map_err(|_| {
            CryptoError::MissingKey(format!("environment variable {var_name} not set"))
        })?);
        let keypair = Ed25519KeyPair::from_hex_seed(&hex).map_err(|e| match e {
            CryptoError::InvalidSigningKey(msg) => {
                CryptoError::InvalidSigningKey(format!("{var_name}: {msg}"))
            }
            other => other,
        })?;
        Ok(Self {
            keypair,
            source: "EnvSigner",
        })
    }

    /// Borrow the underlying key pair.
    pub fn keypair(&self) -> &Ed25519KeyPair {
        &self.keypair
    }
}

impl Signer for LocalSigner {
    async fn sign(&self, data: &CanonicalBytes) -> Result<Ed25519Signature, CryptoError> {
        Ok(self.keypair.sign(data))
    }

    async fn public_key(&self) -> Result<Ed25519PublicKey, CryptoError> {
        Ok(self.keypair.public_key())
    }

    fn provider_name(&self) -> &str {
        self.source
    }
}

// ── Ed25519Verifier ──────────────────────────────────────────────────────

/// Local, pure Ed25519 verification. Never returns `Err`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    async fn verify(
        &self,
        data: &CanonicalBytes,
        signature: &Ed25519Signature,
        public_key: &Ed25519PublicKey,
    ) -> Result<bool, CryptoError> {
        Ok(ed25519::verify(data, signature, public_key))
    }
}
