// Path: crates/codec/src/prefixed.rs

//! Base58Check encoding of prefixed hash identifiers.
//!
//! Raw hash bytes are tagged with a type-specific constant prefix and then
//! Base58-encoded with a 4-byte double-SHA256 checksum. Decoding reverses
//! this, validating both the checksum and the expected prefix.

use tessera_types::CodecError;

/// A prefixed-hash type: the constant leading bytes and the payload length
/// they commit to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct HashPrefix {
    /// Human-readable kind, used in error messages.
    pub kind: &'static str,
    /// The constant bytes prepended to the payload.
    pub bytes: &'static [u8],
    /// The exact payload length in bytes.
    pub payload_len: usize,
}

/// A 32-byte block hash.
pub const BLOCK_HASH: HashPrefix = HashPrefix {
    kind: "block hash",
    bytes: &[1, 52],
    payload_len: 32,
};

/// A 32-byte operation hash.
pub const OPERATION_HASH: HashPrefix = HashPrefix {
    kind: "operation hash",
    bytes: &[5, 116],
    payload_len: 32,
};

/// A 20-byte Ed25519 public key hash (identity address).
pub const ED25519_PUBLIC_KEY_HASH: HashPrefix = HashPrefix {
    kind: "ed25519 public key hash",
    bytes: &[6, 161, 159],
    payload_len: 20,
};

/// A 20-byte Secp256k1 public key hash (identity address).
pub const SECP256K1_PUBLIC_KEY_HASH: HashPrefix = HashPrefix {
    kind: "secp256k1 public key hash",
    bytes: &[6, 161, 161],
    payload_len: 20,
};

/// A 20-byte P256 public key hash (identity address).
pub const P256_PUBLIC_KEY_HASH: HashPrefix = HashPrefix {
    kind: "p256 public key hash",
    bytes: &[6, 161, 164],
    payload_len: 20,
};

/// A 20-byte originated contract hash (account address).
pub const CONTRACT_HASH: HashPrefix = HashPrefix {
    kind: "contract hash",
    bytes: &[2, 90, 121],
    payload_len: 20,
};

/// A 32-byte Ed25519 public key.
pub const ED25519_PUBLIC_KEY: HashPrefix = HashPrefix {
    kind: "ed25519 public key",
    bytes: &[13, 15, 37, 217],
    payload_len: 32,
};

/// The identity hash-family prefixes, indexed by the wire selector byte.
pub const IDENTITY_HASH_FAMILIES: [HashPrefix; 3] = [
    ED25519_PUBLIC_KEY_HASH,
    SECP256K1_PUBLIC_KEY_HASH,
    P256_PUBLIC_KEY_HASH,
];

/// Encodes `payload` under `prefix` as a Base58Check string.
pub fn encode(prefix: &HashPrefix, payload: &[u8]) -> Result<String, CodecError> {
    if payload.len() != prefix.payload_len {
        return Err(CodecError::PayloadLength {
            kind: prefix.kind,
            expected: prefix.payload_len,
            got: payload.len(),
        });
    }
    let mut data = Vec::with_capacity(prefix.bytes.len() + payload.len());
    data.extend_from_slice(prefix.bytes);
    data.extend_from_slice(payload);
    Ok(bs58::encode(data).with_check().into_string())
}

/// Decodes a Base58Check string, validating the checksum and `prefix`, and
/// returns the raw payload.
pub fn decode(prefix: &HashPrefix, encoded: &str) -> Result<Vec<u8>, CodecError> {
    let data = bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map_err(|e| CodecError::Base58(e.to_string()))?;
    let payload = data
        .strip_prefix(prefix.bytes)
        .ok_or(CodecError::PrefixMismatch(prefix.kind))?;
    if payload.len() != prefix.payload_len {
        return Err(CodecError::PayloadLength {
            kind: prefix.kind,
            expected: prefix.payload_len,
            got: payload.len(),
        });
    }
    Ok(payload.to_vec())
}

/// Decodes against the first matching prefix of `candidates`, returning the
/// matched prefix and payload. Used where an address may belong to any of
/// the identity hash families.
pub fn decode_any<'p>(
    candidates: &'p [HashPrefix],
    encoded: &str,
) -> Result<(&'p HashPrefix, Vec<u8>), CodecError> {
    let data = bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map_err(|e| CodecError::Base58(e.to_string()))?;
    for prefix in candidates {
        if let Some(payload) = data.strip_prefix(prefix.bytes) {
            if payload.len() == prefix.payload_len {
                return Ok((prefix, payload.to_vec()));
            }
        }
    }
    Err(CodecError::PrefixMismatch("any candidate"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_hash_roundtrip() {
        let payload = [0xabu8; 32];
        let encoded = encode(&BLOCK_HASH, &payload).unwrap();
        // Block hashes render with their well-known leading character.
        assert!(encoded.starts_with('B'), "got {encoded}");
        let decoded = decode(&BLOCK_HASH, &encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn identity_hash_roundtrip() {
        let payload = [7u8; 20];
        let encoded = encode(&ED25519_PUBLIC_KEY_HASH, &payload).unwrap();
        let (prefix, decoded) = decode_any(&IDENTITY_HASH_FAMILIES, &encoded).unwrap();
        assert_eq!(prefix.bytes, ED25519_PUBLIC_KEY_HASH.bytes);
        assert_eq!(decoded, payload);
    }

    #[test]
    fn corrupted_checksum_fails() {
        let encoded = encode(&CONTRACT_HASH, &[1u8; 20]).unwrap();
        let mut corrupted = encoded.into_bytes();
        // Flip the last character to break the checksum.
        let last = corrupted.last_mut().unwrap();
        *last = if *last == b'1' { b'2' } else { b'1' };
        let corrupted = String::from_utf8(corrupted).unwrap();
        let err = decode(&CONTRACT_HASH, &corrupted).unwrap_err();
        assert!(matches!(err, CodecError::Base58(_)));
    }

    #[test]
    fn wrong_prefix_fails() {
        let encoded = encode(&BLOCK_HASH, &[0u8; 32]).unwrap();
        let err = decode(&OPERATION_HASH, &encoded).unwrap_err();
        assert_eq!(err, CodecError::PrefixMismatch("operation hash"));
    }

    #[test]
    fn wrong_payload_length_rejected_on_encode() {
        let err = encode(&BLOCK_HASH, &[0u8; 20]).unwrap_err();
        assert_eq!(
            err,
            CodecError::PayloadLength {
                kind: "block hash",
                expected: 32,
                got: 20
            }
        );
    }
}
