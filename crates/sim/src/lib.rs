// Path: crates/sim/src/lib.rs
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

//! # Tessera Sim
//!
//! A scriptable in-memory [`Connection`](tessera_engine::Connection)
//! backend. It prepares real wire bytes through [`OperationBuilder`], logs
//! submissions, counts polls, and serves whatever statuses and account
//! states a test scripts into it. No sockets, no wall-clock waits beyond
//! scripted latency: tests drive the clock and the event pipeline
//! themselves.

pub mod connection;
pub mod encode;

pub use connection::{SimConnection, SubmittedOperation};
pub use encode::OperationBuilder;
