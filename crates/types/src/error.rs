// Path: crates/types/src/error.rs
//! Core error types for the Tessera wallet engine.

use crate::id::AccountId;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised while decoding operation bytes or prefixed hashes.
///
/// Decode errors are fatal to the single decode call, surfaced synchronously
/// to the caller, and never retried automatically.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// A read ran past the end of the buffer.
    #[error("Unexpected end of buffer: wanted {wanted} bytes, {remaining} remain")]
    UnexpectedEof {
        /// Bytes the read required.
        wanted: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },
    /// The leading tag byte of an operation item is not part of the format.
    ///
    /// Also covers trailing garbage: leftover bytes after a complete item
    /// are read as the next tag and rejected here.
    #[error("Unknown operation tag: {0}")]
    UnknownTag(u8),
    /// The buffer uses a format feature this decoder refuses to handle.
    #[error("Unsupported operation feature: {0}")]
    Unsupported(&'static str),
    /// A variable-length integer would not fit in 64 bits.
    #[error("Variable-length integer overflows 64 bits")]
    VarintOverflow,
    /// The account-reference selector byte is out of range.
    #[error("Unknown account reference selector: {0}")]
    UnknownReferenceSelector(u8),
    /// The identity hash-family selector byte is out of range.
    #[error("Unknown identity hash family: {0}")]
    UnknownHashFamily(u8),
    /// A Base58Check string failed checksum or character validation.
    #[error("Base58Check decode failed: {0}")]
    Base58(String),
    /// A decoded prefixed hash did not carry the expected type prefix.
    #[error("Hash prefix mismatch for {0}")]
    PrefixMismatch(&'static str),
    /// A hash payload had the wrong length for its prefix.
    #[error("Invalid payload length for {kind}: expected {expected}, got {got}")]
    PayloadLength {
        /// The prefixed-hash kind.
        kind: &'static str,
        /// The length the prefix requires.
        expected: usize,
        /// The length found.
        got: usize,
    },
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedEof { .. } => "CODEC_UNEXPECTED_EOF",
            Self::UnknownTag(_) => "CODEC_UNKNOWN_TAG",
            Self::Unsupported(_) => "CODEC_UNSUPPORTED_FEATURE",
            Self::VarintOverflow => "CODEC_VARINT_OVERFLOW",
            Self::UnknownReferenceSelector(_) => "CODEC_UNKNOWN_REFERENCE_SELECTOR",
            Self::UnknownHashFamily(_) => "CODEC_UNKNOWN_HASH_FAMILY",
            Self::Base58(_) => "CODEC_BASE58_INVALID",
            Self::PrefixMismatch(_) => "CODEC_PREFIX_MISMATCH",
            Self::PayloadLength { .. } => "CODEC_PAYLOAD_LENGTH",
        }
    }
}

/// Errors raised when a decoded, server-prepared operation disagrees with
/// the task the caller declared.
///
/// These are the safety check before trusting prepared bytes for signing:
/// fatal, raised at the point of use, never retried.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The operation did not contain exactly a main transfer plus a
    /// service-fee transfer.
    #[error("Expected {expected} transfers in prepared operation, got {got}")]
    TransferCount {
        /// The number of transfers required.
        expected: usize,
        /// The number decoded.
        got: usize,
    },
    /// The main transfer's kind does not match the task variant.
    #[error("Prepared operation kind mismatch")]
    KindMismatch,
    /// The main transfer's source does not match the task.
    #[error("Prepared source mismatch: expected {expected}, got {got}")]
    SourceMismatch {
        /// The source the task declared.
        expected: AccountId,
        /// The source decoded from the prepared bytes.
        got: AccountId,
    },
    /// The main transfer's destination does not match the task.
    #[error("Prepared destination mismatch")]
    DestinationMismatch,
    /// The main transfer's amount does not match the task.
    #[error("Prepared amount mismatch")]
    AmountMismatch,
    /// The second transfer's amount does not equal the declared service fee.
    #[error("Prepared service fee mismatch")]
    ServiceFeeMismatch,
    /// The summed per-item fees do not equal the declared network fee.
    #[error("Prepared network fee mismatch")]
    NetworkFeeMismatch,
}

impl ErrorCode for ValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::TransferCount { .. } => "VALIDATE_TRANSFER_COUNT",
            Self::KindMismatch => "VALIDATE_KIND_MISMATCH",
            Self::SourceMismatch { .. } => "VALIDATE_SOURCE_MISMATCH",
            Self::DestinationMismatch => "VALIDATE_DESTINATION_MISMATCH",
            Self::AmountMismatch => "VALIDATE_AMOUNT_MISMATCH",
            Self::ServiceFeeMismatch => "VALIDATE_SERVICE_FEE_MISMATCH",
            Self::NetworkFeeMismatch => "VALIDATE_NETWORK_FEE_MISMATCH",
        }
    }
}

/// Errors raised by the engine's operation flows.
///
/// Lifecycle failures (network, timeout, cancellation) are never thrown
/// across the flow boundary; they are folded into terminal `Progress`
/// values. This enum covers the prepare/sign/submit path, where an error
/// becomes `Failed` or `Cancelled` on the owning flow.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A transport-level request failed.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The signing provider declined the operation.
    #[error("Signing declined by the approval provider")]
    SigningDeclined,
    /// The signing provider failed for a non-decline reason.
    #[error("Signer error: {0}")]
    Signer(String),
    /// The prepared operation bytes failed to decode.
    #[error("Operation decode failed: {0}")]
    Codec(#[from] CodecError),
    /// The prepared operation disagreed with the declared task.
    #[error("Prepared operation validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl ErrorCode for EngineError {
    fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "ENGINE_CONNECTION_ERROR",
            Self::SigningDeclined => "ENGINE_SIGNING_DECLINED",
            Self::Signer(_) => "ENGINE_SIGNER_ERROR",
            Self::Codec(_) => "ENGINE_CODEC_ERROR",
            Self::Validation(_) => "ENGINE_VALIDATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_distinct() {
        let errors: Vec<Box<dyn ErrorCode>> = vec![
            Box::new(CodecError::UnknownTag(3)),
            Box::new(CodecError::VarintOverflow),
            Box::new(ValidationError::ServiceFeeMismatch),
            Box::new(EngineError::SigningDeclined),
        ];
        let codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(
            codes,
            vec![
                "CODEC_UNKNOWN_TAG",
                "CODEC_VARINT_OVERFLOW",
                "VALIDATE_SERVICE_FEE_MISMATCH",
                "ENGINE_SIGNING_DECLINED",
            ]
        );
    }
}
