// Path: crates/crypto/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Tessera Crypto
//!
//! Ed25519 signing and Blake2b hashing for the wallet engine. Key material
//! is held behind zero-on-drop wrappers; how secrets are stored at rest is
//! the host application's concern, not this crate's.

pub mod error;
pub mod hash;
pub mod sign;

pub use error::CryptoError;
pub use hash::{blake2b_160, blake2b_256};
pub use sign::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, SecretSeed};
