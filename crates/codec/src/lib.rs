// Path: crates/codec/src/lib.rs
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

//! # Tessera Codec
//!
//! Byte-exact decoding of signed operation buffers, plus the low-level
//! primitives it rests on: a bounds-checked byte cursor, LEB128-style
//! variable-length integers, and Base58Check prefixed-hash identifiers.
//!
//! Decoding is fail-fast: any malformed, truncated, or trailing input is a
//! hard `CodecError`, never a silent truncation.

pub mod cursor;
pub mod operation;
pub mod prefixed;

pub use cursor::ByteCursor;
pub use operation::{ParsedOperation, Transfer, TransferKind};
pub use prefixed::HashPrefix;
