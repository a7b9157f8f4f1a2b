// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Tessera Wallet Types
//!
//! This crate is the foundational library for the Tessera wallet engine,
//! containing all core data structures, error types, and configuration
//! objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `tessera-types` has minimal dependencies and is itself
//! a dependency for every other crate in the workspace. This structure
//! prevents circular dependencies and provides a stable, canonical definition
//! for shared types like `AccountId`, `Amount`, `Progress`, and the
//! `NetworkEvent` union.

/// Monetary amounts in fixed-point micro units and signed deltas.
pub mod amount;
/// Shared configuration structures for the engine and monitor timeouts.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// The closed set of inbound network event variants.
pub mod events;
/// Identifiers for accounts, operations, and blocks.
pub mod id;
/// The task model: progress states, the common header, and task variants.
pub mod task;

pub use amount::{Amount, AmountDelta};
pub use config::EngineConfig;
pub use error::{CodecError, EngineError, ErrorCode, ValidationError};
pub use events::{NetworkEvent, ServiceState};
pub use id::{AccountId, BlockHash, OperationId};
pub use task::{
    ActivateTask, OperationHeader, OperationTask, OriginateTask, Progress, TransferTask,
};
