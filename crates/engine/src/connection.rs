// Path: crates/engine/src/connection.rs

//! The boundary trait between the engine and whatever carries bytes to the
//! network.
//!
//! The engine only requires request/response semantics: given a task,
//! return an updated task plus operation bytes, or fail. Inbound push
//! events are delivered separately into the engine's event sink, possibly
//! out of order and possibly duplicated; the reconciliation logic owns
//! convergence.

use async_trait::async_trait;
use std::time::Duration;
use tessera_types::{
    AccountId, ActivateTask, Amount, EngineError, NetworkEvent, OperationId, OriginateTask,
    TransferTask,
};

use crate::account::AccountState;

/// A server-prepared operation: the (possibly fee-adjusted) task handed
/// back by the node, plus the unsigned operation bytes to validate and sign.
#[derive(Clone, Debug)]
pub struct PreparedOperation<T> {
    /// The task as the server filled it in.
    pub task: T,
    /// The unsigned operation bytes.
    pub bytes: Vec<u8>,
}

/// The answer to an explicit status poll for one pending operation.
#[derive(Clone, Debug, Default)]
pub struct OperationStatus {
    /// Source- and destination-side events the server knows about.
    pub events: Vec<NetworkEvent>,
    /// Server-suggested interval before the next poll.
    pub retry_after: Option<Duration>,
}

/// A snapshot of one account as the network sees it.
#[derive(Clone, Debug)]
pub struct AccountInfo {
    /// The confirmed balance.
    pub balance: Amount,
    /// The liveness the server reports.
    pub state: AccountState,
}

/// Async request/response operations against a wallet service node.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Asks the node to prepare a transfer, filling in fees and returning
    /// the operation bytes.
    async fn prepare_transfer(
        &self,
        task: &TransferTask,
    ) -> Result<PreparedOperation<TransferTask>, EngineError>;

    /// Asks the node to prepare an origination.
    async fn prepare_origination(
        &self,
        task: &OriginateTask,
    ) -> Result<PreparedOperation<OriginateTask>, EngineError>;

    /// Asks the node to prepare an identity activation.
    async fn prepare_activation(
        &self,
        task: &ActivateTask,
    ) -> Result<PreparedOperation<ActivateTask>, EngineError>;

    /// Submits signed operation bytes; returns the server-assigned id.
    async fn submit_operation(
        &self,
        bytes: &[u8],
        signature: &[u8],
    ) -> Result<OperationId, EngineError>;

    /// Explicitly polls the status of one pending operation.
    async fn operation_status(&self, id: &OperationId) -> Result<OperationStatus, EngineError>;

    /// Fetches the current state of one account.
    async fn account_info(&self, id: &AccountId) -> Result<AccountInfo, EngineError>;
}
