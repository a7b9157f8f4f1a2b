// Path: crates/types/src/task.rs

//! The task model for submitted operations.
//!
//! Task variants share a common `OperationHeader` by composition rather than
//! inheritance: each variant embeds the header, and `OperationTask` is the
//! tagged union used wherever polymorphic handling is needed.

use crate::amount::Amount;
use crate::id::{AccountId, OperationId};
use serde::{Deserialize, Serialize};

/// The lifecycle progress of one submitted operation.
///
/// Monotonic in practice: `Confirmed`, `Timeout`, `Failed`, and `Cancelled`
/// are final; `Acknowledged` is near-terminal (only a completion state can
/// follow it). The progress field itself is last-write; the flow's
/// completion signals are first-write-wins.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum Progress {
    /// The task exists locally but nothing has been sent to the network.
    #[default]
    Created,
    /// The server returned a prepared operation that passed validation.
    Prepared,
    /// The signed operation was accepted for forwarding.
    Submitted,
    /// A node has seen the operation (pending inclusion).
    Acknowledged,
    /// The operation is final on-chain.
    Confirmed,
    /// The monitor gave up waiting for acknowledgement or confirmation.
    Timeout,
    /// The operation failed during prepare/submit or on-chain.
    Failed,
    /// The user declined to sign.
    Cancelled,
}

impl Progress {
    /// Whether this progress value ends the lifecycle.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Progress::Confirmed | Progress::Timeout | Progress::Failed | Progress::Cancelled
        )
    }

    /// Whether this progress value resolves the acknowledge signal.
    pub fn settles_acknowledge(&self) -> bool {
        matches!(self, Progress::Acknowledged) || self.is_final()
    }

    /// Whether a flow resolved with this value succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Progress::Acknowledged | Progress::Confirmed)
    }
}

/// Fields common to every operation task.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct OperationHeader {
    /// Server-assigned id, set once submission succeeds.
    pub operation_id: Option<OperationId>,
    /// Lifecycle progress, last-write-wins.
    pub progress: Progress,
    /// Fee paid to the network, totalled across operation items.
    pub network_fee: Amount,
    /// Fee paid to the wallet service, carried as the second transfer.
    pub service_fee: Amount,
    /// Burn charged for newly allocated storage.
    pub storage_fee: Amount,
    /// The amount moved by the main transfer.
    pub transfer_amount: Amount,
}

impl OperationHeader {
    /// Constructs a header for a given transfer amount with zero fees.
    pub fn for_amount(transfer_amount: Amount) -> Self {
        Self {
            transfer_amount,
            ..Self::default()
        }
    }

    /// The total debit: transfer amount plus all fees.
    pub fn total_amount(&self) -> Amount {
        self.transfer_amount
            .saturating_add(self.network_fee)
            .saturating_add(self.service_fee)
            .saturating_add(self.storage_fee)
    }
}

/// Moves funds from a source to an existing destination account.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct TransferTask {
    /// Common operation fields.
    pub header: OperationHeader,
    /// The debited identity or account.
    pub source: AccountId,
    /// The credited account.
    pub destination: AccountId,
}

/// Creates a new on-chain account funded from a source identity.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct OriginateTask {
    /// Common operation fields; `transfer_amount` is the initial balance.
    pub header: OperationHeader,
    /// The funding (and managing) identity.
    pub source: AccountId,
    /// Optional delegate for the new account.
    pub delegate: Option<AccountId>,
}

/// One-time crediting of a previously unfunded identity via a redeemable
/// secret.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ActivateTask {
    /// Common operation fields; `transfer_amount` is the redeemed credit.
    pub header: OperationHeader,
    /// The identity being activated.
    pub identity: AccountId,
    /// The hex-encoded redeemable secret.
    pub secret: String,
}

/// The tagged union over all task variants.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub enum OperationTask {
    /// A funds transfer.
    Transfer(TransferTask),
    /// An account origination.
    Originate(OriginateTask),
    /// An identity activation.
    Activate(ActivateTask),
}

impl OperationTask {
    /// Shared header, read-only.
    pub fn header(&self) -> &OperationHeader {
        match self {
            Self::Transfer(t) => &t.header,
            Self::Originate(t) => &t.header,
            Self::Activate(t) => &t.header,
        }
    }

    /// Shared header, mutable.
    pub fn header_mut(&mut self) -> &mut OperationHeader {
        match self {
            Self::Transfer(t) => &mut t.header,
            Self::Originate(t) => &mut t.header,
            Self::Activate(t) => &mut t.header,
        }
    }

    /// The identity or account that signs and pays for this task.
    pub fn source(&self) -> &AccountId {
        match self {
            Self::Transfer(t) => &t.source,
            Self::Originate(t) => &t.source,
            Self::Activate(t) => &t.identity,
        }
    }
}
