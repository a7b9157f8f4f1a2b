// Path: crates/engine/src/lib.rs
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

//! # Tessera Engine
//!
//! The asynchronous heart of the wallet: per-operation lifecycle flows
//! ([`Taskflow`]), the pending-operation registry, the poll-fallback
//! [`OperationMonitor`], and the [`Engine`] that reconciles inbound network
//! events against local account state.
//!
//! The engine is transport-agnostic: it talks to the network only through
//! the [`Connection`] trait and to key material only through the [`Signer`]
//! trait. Lifecycle failures (network errors, timeouts, declined signing)
//! never cross the flow boundary as errors; they surface as terminal
//! [`Progress`](tessera_types::Progress) values on the owning flow.

pub mod account;
pub mod connection;
pub mod engine;
pub mod flow;
pub mod monitor;
pub mod registry;
pub mod signing;
pub mod validate;

pub use account::{AccountState, BalanceUpdate, LedgerEntry, PendingChange, TokenBalance};
pub use connection::{AccountInfo, Connection, OperationStatus, PreparedOperation};
pub use engine::Engine;
pub use flow::Taskflow;
pub use monitor::{EventSink, OperationMonitor};
pub use registry::OperationRegistry;
pub use signing::{LocalSigner, Signer, SignerError};
pub use validate::validate_prepared;
