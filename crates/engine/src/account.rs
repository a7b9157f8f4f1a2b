// Path: crates/engine/src/account.rs

//! Balance-holding entities and their local bookkeeping.
//!
//! A `TokenBalance` covers any balance holder, identity or originated
//! account. It tracks the confirmed balance, a liveness state machine,
//! in-flight `pending_changes` keyed by operation id, and an append-only
//! ledger of finalized entries. Pending changes are removed exactly once,
//! when the matching operation closes; entries only ever grow.
//!
//! Observers subscribe explicitly and receive change records over a
//! channel; delivery context is the subscriber's, not an implicit global.

use log::debug;
use std::collections::HashMap;
use tokio::sync::mpsc;

use tessera_types::{AccountId, Amount, AmountDelta, OperationId};

/// Liveness of a balance holder as far as this client knows.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AccountState {
    /// Never looked at.
    #[default]
    Uninitialized,
    /// A startup query is in flight.
    Initializing,
    /// Confirmed on-chain and current.
    Online,
    /// Reachable but the answer was inconclusive.
    Unknown,
    /// The backend could not be reached.
    Offline,
    /// An origination for this account is pending.
    Creating,
    /// A balance-affecting operation is pending.
    Changing,
    /// The network gave up on the origination; the account never appeared.
    UnheardOf,
}

/// Whether a balance holder is a signing identity or an originated account.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HolderKind {
    /// Controls signing keys; may manage subordinate accounts.
    Identity,
    /// Created on-chain by an origination.
    Account,
}

/// A locally recorded, not-yet-confirmed balance delta.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PendingChange {
    /// The operation awaiting confirmation or timeout.
    pub operation_id: OperationId,
    /// The signed delta that will apply if the operation confirms.
    pub delta: AmountDelta,
}

/// One finalized ledger record. Entries are append-only.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LedgerEntry {
    /// The operation that produced this entry.
    pub operation_id: OperationId,
    /// The confirmed signed delta.
    pub delta: AmountDelta,
    /// The block the operation landed in, when known.
    pub block_index: Option<u64>,
}

/// A change record delivered to subscribers.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BalanceUpdate {
    /// The holder that changed.
    pub id: AccountId,
    /// Its balance after the change.
    pub balance: Amount,
    /// Its state after the change.
    pub state: AccountState,
}

/// Local bookkeeping for one balance holder.
pub struct TokenBalance {
    id: AccountId,
    kind: HolderKind,
    balance: Amount,
    state: AccountState,
    pending: HashMap<OperationId, PendingChange>,
    entries: Vec<LedgerEntry>,
    subscribers: Vec<mpsc::UnboundedSender<BalanceUpdate>>,
}

impl TokenBalance {
    /// A fresh, untouched holder.
    pub fn new(id: AccountId, kind: HolderKind) -> Self {
        Self {
            id,
            kind,
            balance: Amount::ZERO,
            state: AccountState::Uninitialized,
            pending: HashMap::new(),
            entries: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// The holder's address.
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Identity or originated account.
    pub fn kind(&self) -> HolderKind {
        self.kind
    }

    /// The confirmed balance.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// The current liveness state.
    pub fn state(&self) -> AccountState {
        self.state
    }

    /// The in-flight deltas, in no particular order.
    pub fn pending_changes(&self) -> impl Iterator<Item = &PendingChange> {
        self.pending.values()
    }

    /// How many operations are pending against this holder.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The finalized ledger history, oldest first.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Registers a change observer. The receiver sees every balance or
    /// state change from now on, delivered on the subscriber's own context.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<BalanceUpdate> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Records a pending delta for `operation_id`. Idempotent: a second
    /// insert for the same id is ignored and reported as `false`.
    pub fn add_pending(&mut self, change: PendingChange) -> bool {
        if self.pending.contains_key(&change.operation_id) {
            debug!(
                "pending change for {} already recorded on {}, ignored",
                change.operation_id, self.id
            );
            return false;
        }
        self.pending.insert(change.operation_id.clone(), change);
        true
    }

    /// Removes the pending delta for `operation_id`, if present. Returns
    /// the removed change; removal happens at most once per id.
    pub fn close_pending(&mut self, operation_id: &OperationId) -> Option<PendingChange> {
        self.pending.remove(operation_id)
    }

    /// Appends a finalized entry. The ledger never shrinks.
    pub fn push_entry(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    /// Sets the confirmed balance and notifies subscribers.
    pub fn set_balance(&mut self, balance: Amount) {
        self.balance = balance;
        self.notify();
    }

    /// Moves the liveness state and notifies subscribers.
    pub fn set_state(&mut self, state: AccountState) {
        if self.state != state {
            debug!("{} state {:?} -> {:?}", self.id, self.state, state);
            self.state = state;
            self.notify();
        }
    }

    fn notify(&mut self) {
        let update = BalanceUpdate {
            id: self.id.clone(),
            balance: self.balance,
            state: self.state,
        };
        // Drop subscribers whose receiver is gone.
        self.subscribers.retain(|tx| tx.send(update.clone()).is_ok());
    }
}
