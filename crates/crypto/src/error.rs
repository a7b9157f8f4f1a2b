// Path: crates/crypto/src/error.rs
//! Local error types for the `tessera-crypto` crate.

use tessera_types::ErrorCode;
use thiserror::Error;

/// Errors raised by signing and hashing primitives.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key bytes could not be parsed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// Signature bytes could not be parsed.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// A signature did not verify against the given key and message.
    #[error("Signature verification failed")]
    VerificationFailed,
    /// The requested digest length is not supported.
    #[error("Invalid digest length: {0}")]
    InvalidDigestLength(usize),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::VerificationFailed => "CRYPTO_VERIFICATION_FAILED",
            Self::InvalidDigestLength(_) => "CRYPTO_INVALID_DIGEST_LENGTH",
        }
    }
}
