// Path: crates/crypto/src/sign.rs
//! Ed25519 key pairs, signatures, and the zero-on-drop seed wrapper.

use crate::error::CryptoError;
use crate::hash::blake2b_160;
use ed25519_dalek::{Signer, Verifier};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// A 32-byte Ed25519 seed that is zeroed when dropped.
///
/// Scoped acquisition with guaranteed release: the raw bytes are only
/// reachable through [`SecretSeed::expose`], and the backing buffer is wiped
/// as soon as the wrapper goes out of scope.
pub struct SecretSeed(Zeroizing<[u8; 32]>);

impl SecretSeed {
    /// Wraps seed bytes, taking ownership.
    pub fn new(seed: [u8; 32]) -> Self {
        Self(Zeroizing::new(seed))
    }

    /// Borrows the raw seed for immediate use.
    pub fn expose(&self) -> &[u8; 32] {
        &self.0
    }
}

/// An Ed25519 key pair.
#[derive(Clone)]
pub struct Ed25519KeyPair {
    signing: ed25519_dalek::SigningKey,
}

/// An Ed25519 public key.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ed25519PublicKey(ed25519_dalek::VerifyingKey);

/// An Ed25519 signature.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ed25519Signature(ed25519_dalek::Signature);

impl Ed25519KeyPair {
    /// Generates a new key pair from the OS RNG.
    pub fn generate() -> Self {
        let mut rng = OsRng;
        Self {
            signing: ed25519_dalek::SigningKey::generate(&mut rng),
        }
    }

    /// Derives the key pair from a seed.
    pub fn from_seed(seed: &SecretSeed) -> Self {
        Self {
            signing: ed25519_dalek::SigningKey::from_bytes(seed.expose()),
        }
    }

    /// The public half.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing.verifying_key())
    }

    /// Signs a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing.sign(message))
    }
}

impl Ed25519PublicKey {
    /// Parses a 32-byte public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: &[u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len())))?;
        ed25519_dalek::VerifyingKey::from_bytes(arr)
            .map(Ed25519PublicKey)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))
    }

    /// The raw 32 key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// The 20-byte Blake2b hash of the key, the payload of an identity
    /// address.
    pub fn key_hash(&self) -> Result<[u8; 20], CryptoError> {
        blake2b_160(self.0.as_bytes())
    }

    /// Verifies a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        self.0
            .verify(message, &signature.0)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl Ed25519Signature {
    /// Parses a 64-byte signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: &[u8; 64] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!("expected 64 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(ed25519_dalek::Signature::from_bytes(arr)))
    }

    /// The raw 64 signature bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }
}
