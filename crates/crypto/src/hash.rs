// Path: crates/crypto/src/hash.rs
//! Blake2b digests at the two lengths the wallet needs.

use crate::error::CryptoError;
use blake2::digest::{Update, VariableOutput};
use blake2::Blake2bVar;

fn blake2b(data: &[u8], out: &mut [u8]) -> Result<(), CryptoError> {
    let mut hasher =
        Blake2bVar::new(out.len()).map_err(|_| CryptoError::InvalidDigestLength(out.len()))?;
    hasher.update(data);
    hasher
        .finalize_variable(out)
        .map_err(|_| CryptoError::InvalidDigestLength(out.len()))
}

/// The 32-byte Blake2b digest, used for operation hashes.
pub fn blake2b_256(data: &[u8]) -> Result<[u8; 32], CryptoError> {
    let mut out = [0u8; 32];
    blake2b(data, &mut out)?;
    Ok(out)
}

/// The 20-byte Blake2b digest, used to derive public key hashes.
pub fn blake2b_160(data: &[u8]) -> Result<[u8; 20], CryptoError> {
    let mut out = [0u8; 20];
    blake2b(data, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digests_are_deterministic_and_length_distinct() {
        let a = blake2b_256(b"tessera").unwrap();
        let b = blake2b_256(b"tessera").unwrap();
        assert_eq!(a, b);

        let short = blake2b_160(b"tessera").unwrap();
        // Blake2b is not truncation-consistent across output lengths.
        assert_ne!(&a[..20], &short[..]);
    }

    #[test]
    fn empty_input_known_answer() {
        let digest = blake2b_256(b"").unwrap();
        assert_eq!(
            hex::encode(digest),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn different_inputs_differ() {
        assert_ne!(blake2b_256(b"a").unwrap(), blake2b_256(b"b").unwrap());
    }
}
