// Path: crates/types/src/id.rs

//! Canonical identifiers used throughout the wallet engine.
//!
//! Accounts and blocks are identified by their prefixed-hash Base58Check
//! string form, which is what the network hands out and what users see.
//! Operations are identified by a server-assigned string that is unique per
//! submitted operation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The Base58Check address of a balance-holding entity.
///
/// Covers both identities (public-key-hash addresses) and originated
/// accounts (contract-hash addresses). The wallet treats the string form as
/// canonical; the codec crate converts to and from raw hash bytes.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wraps an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A server-assigned identifier for a submitted operation.
///
/// Absent until submission succeeds; unique per operation. Network events
/// reference pending local state through this id.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    /// Wraps an operation id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperationId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The prefixed-hash string form of a 32-byte block hash.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Hash)]
#[serde(transparent)]
pub struct BlockHash(String);

impl BlockHash {
    /// Wraps a block hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
