// Path: crates/engine/src/signing.rs

//! The signing boundary.
//!
//! The engine does not care how key material is held: given data bytes and
//! an identity, a `Signer` returns a signature or fails. A decline is its
//! own variant so flows can distinguish user cancellation from failure.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use tessera_crypto::Ed25519KeyPair;
use tessera_types::{AccountId, ErrorCode};

/// Errors a signing provider can report.
#[derive(Error, Debug)]
pub enum SignerError {
    /// The user (or policy) declined to sign. Maps to `Cancelled`.
    #[error("Signing declined")]
    Declined,
    /// No key material is available for the identity.
    #[error("No signing key for identity {0}")]
    Unavailable(AccountId),
    /// The provider failed for another reason. Maps to `Failed`.
    #[error("Signer failure: {0}")]
    Failure(String),
}

impl ErrorCode for SignerError {
    fn code(&self) -> &'static str {
        match self {
            Self::Declined => "SIGNER_DECLINED",
            Self::Unavailable(_) => "SIGNER_UNAVAILABLE",
            Self::Failure(_) => "SIGNER_FAILURE",
        }
    }
}

/// Produces signatures for identities on request.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Signs `data` on behalf of `identity`.
    async fn sign(&self, identity: &AccountId, data: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// An in-process signer over a fixed set of Ed25519 key pairs.
///
/// Suitable for tests and embedded wallets; hardware or remote approval
/// providers implement [`Signer`] themselves.
#[derive(Default)]
pub struct LocalSigner {
    keys: HashMap<AccountId, Ed25519KeyPair>,
}

impl LocalSigner {
    /// An empty signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key pair for `identity`.
    pub fn insert(&mut self, identity: AccountId, pair: Ed25519KeyPair) {
        self.keys.insert(identity, pair);
    }
}

#[async_trait]
impl Signer for LocalSigner {
    async fn sign(&self, identity: &AccountId, data: &[u8]) -> Result<Vec<u8>, SignerError> {
        let pair = self
            .keys
            .get(identity)
            .ok_or_else(|| SignerError::Unavailable(identity.clone()))?;
        Ok(pair.sign(data).to_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_signer_signs_for_known_identity() {
        let identity: AccountId = "tz1-local".into();
        let pair = Ed25519KeyPair::generate();
        let public = pair.public_key();

        let mut signer = LocalSigner::new();
        signer.insert(identity.clone(), pair);

        let signature = signer.sign(&identity, b"operation bytes").await.unwrap();
        let parsed = tessera_crypto::Ed25519Signature::from_bytes(&signature).unwrap();
        public.verify(b"operation bytes", &parsed).unwrap();
    }

    #[tokio::test]
    async fn unknown_identity_is_unavailable() {
        let signer = LocalSigner::new();
        let err = signer.sign(&"tz1-nobody".into(), b"x").await.unwrap_err();
        assert!(matches!(err, SignerError::Unavailable(_)));
        assert_eq!(err.code(), "SIGNER_UNAVAILABLE");
    }
}
