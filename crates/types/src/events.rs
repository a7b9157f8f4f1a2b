// Path: crates/types/src/events.rs

//! The closed set of network event variants the engine reconciles.
//!
//! Events may arrive out of order and duplicated; the reconciliation logic
//! in the engine crate is responsible for convergence regardless of arrival
//! order. Variants that carry a `block_index` participate in the engine's
//! staleness filter.

use crate::amount::Amount;
use crate::id::{AccountId, OperationId};
use serde::{Deserialize, Serialize};

/// One inbound notification from the network, pushed or polled.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub enum NetworkEvent {
    /// A pending origination was seen: the destination account exists but is
    /// not yet final.
    OriginatePending {
        /// The operation creating the account.
        operation_id: OperationId,
        /// The funding identity.
        manager: AccountId,
        /// The address of the account being created.
        account: AccountId,
        /// The initial balance being moved in.
        amount: Amount,
    },
    /// The origination is final on-chain.
    Originate {
        /// The operation that created the account.
        operation_id: OperationId,
        /// The funding identity.
        manager: AccountId,
        /// The created account.
        account: AccountId,
        /// The account's confirmed balance.
        balance: Amount,
        /// The block the origination landed in.
        block_index: u64,
    },
    /// The network gave up on a pending origination.
    OriginationTimeout {
        /// The operation that timed out.
        operation_id: OperationId,
        /// The funding identity.
        manager: AccountId,
        /// The account that will now never be created.
        account: AccountId,
    },
    /// A tracked account's balance is final at a new value.
    BalanceChanged {
        /// The operation that caused the change.
        operation_id: OperationId,
        /// The affected account.
        account: AccountId,
        /// The confirmed balance.
        balance: Amount,
        /// The block the change landed in.
        block_index: u64,
    },
    /// A transfer touching a tracked account is pending.
    TransactionPending {
        /// The pending operation.
        operation_id: OperationId,
        /// The affected account.
        account: AccountId,
        /// The pending balance delta, outgoing total for the source.
        amount: Amount,
        /// Whether the delta credits (`true`) or debits the account.
        incoming: bool,
    },
    /// The network gave up on a pending transfer.
    TransactionTimeout {
        /// The operation that timed out.
        operation_id: OperationId,
        /// The affected account.
        account: AccountId,
    },
    /// An identity activation is pending.
    ActivationPending {
        /// The pending operation.
        operation_id: OperationId,
        /// The identity being activated.
        identity: AccountId,
        /// The credit being redeemed.
        amount: Amount,
    },
    /// The network gave up on a pending activation.
    ActivationTimeout {
        /// The operation that timed out.
        operation_id: OperationId,
        /// The identity whose activation expired.
        identity: AccountId,
    },
    /// The wallet service's own availability changed.
    Service(ServiceState),
}

impl NetworkEvent {
    /// The block index this event is anchored to, if it carries one.
    ///
    /// Only finalized events are anchored; pending and timeout notifications
    /// bypass the staleness filter.
    pub fn block_index(&self) -> Option<u64> {
        match self {
            Self::Originate { block_index, .. } | Self::BalanceChanged { block_index, .. } => {
                Some(*block_index)
            }
            _ => None,
        }
    }

    /// The operation this event refers to, if any.
    pub fn operation_id(&self) -> Option<&OperationId> {
        match self {
            Self::OriginatePending { operation_id, .. }
            | Self::Originate { operation_id, .. }
            | Self::OriginationTimeout { operation_id, .. }
            | Self::BalanceChanged { operation_id, .. }
            | Self::TransactionPending { operation_id, .. }
            | Self::TransactionTimeout { operation_id, .. }
            | Self::ActivationPending { operation_id, .. }
            | Self::ActivationTimeout { operation_id, .. } => Some(operation_id),
            Self::Service(_) => None,
        }
    }
}

/// Process-wide availability of the wallet service backend.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ServiceState {
    /// Reachability has not been established yet.
    #[default]
    Unknown,
    /// The service is reachable and healthy.
    Operational,
    /// The service is reachable but degraded.
    Degraded,
    /// The service is unreachable.
    Down,
}
