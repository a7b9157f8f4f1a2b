// Path: crates/engine/src/engine.rs

//! The client engine: account cache, event reconciliation, and the
//! prepare/validate/sign/submit flows.
//!
//! Account state is mutated only from this engine's own event-handling and
//! initialization paths, which the caller drives on a single logical
//! timeline. Monitors run as spawned tasks but touch only the registry and
//! the event sink, never the account cache directly.

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use tessera_codec::ParsedOperation;
use tessera_types::{
    AccountId, ActivateTask, AmountDelta, EngineConfig, EngineError, NetworkEvent, OperationId,
    OperationTask, OriginateTask, Progress, ServiceState, TransferTask,
};

use crate::account::{AccountState, HolderKind, LedgerEntry, PendingChange, TokenBalance};
use crate::connection::Connection;
use crate::flow::Taskflow;
use crate::monitor::{EventSink, OperationMonitor};
use crate::registry::OperationRegistry;
use crate::signing::{Signer, SignerError};
use crate::validate::validate_prepared;

/// The wallet engine for one client instance.
pub struct Engine {
    connection: Arc<dyn Connection>,
    config: EngineConfig,
    registry: Arc<OperationRegistry>,
    accounts: HashMap<AccountId, TokenBalance>,
    /// Highest block index observed; strictly older events are dropped.
    current_block_index: u64,
    /// Per-holder closed operations, so replays neither reopen pending
    /// deltas nor duplicate ledger entries.
    closed: HashSet<(AccountId, OperationId)>,
    service: watch::Sender<ServiceState>,
    events_tx: mpsc::UnboundedSender<NetworkEvent>,
    events_rx: mpsc::UnboundedReceiver<NetworkEvent>,
}

impl Engine {
    /// Builds an engine over a connection.
    pub fn new(connection: Arc<dyn Connection>, config: EngineConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (service, _) = watch::channel(ServiceState::default());
        Self {
            connection,
            config,
            registry: Arc::new(OperationRegistry::new()),
            accounts: HashMap::new(),
            current_block_index: 0,
            closed: HashSet::new(),
            service,
            events_tx,
            events_rx,
        }
    }

    /// The registry of in-flight operations.
    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    /// A sender into this engine's event pipeline. Connections and monitors
    /// deliver inbound events through this.
    pub fn event_sink(&self) -> EventSink {
        self.events_tx.clone()
    }

    /// The last observed service availability.
    pub fn service_state(&self) -> ServiceState {
        *self.service.borrow()
    }

    /// Subscribes to service availability changes.
    pub fn subscribe_service(&self) -> watch::Receiver<ServiceState> {
        self.service.subscribe()
    }

    /// The tracked holder for `id`, if any.
    pub fn account(&self, id: &AccountId) -> Option<&TokenBalance> {
        self.accounts.get(id)
    }

    /// Mutable access to a tracked holder, for subscription registration.
    pub fn account_mut(&mut self, id: &AccountId) -> Option<&mut TokenBalance> {
        self.accounts.get_mut(id)
    }

    /// The staleness watermark.
    pub fn current_block_index(&self) -> u64 {
        self.current_block_index
    }

    /// Starts tracking identities and queries their current state, one
    /// concurrent startup query per identity. Results are applied as they
    /// land; all queries are awaited before this returns.
    pub async fn initialize(&mut self, identities: Vec<AccountId>) {
        let mut queries = JoinSet::new();
        for id in identities {
            let holder = self
                .accounts
                .entry(id.clone())
                .or_insert_with(|| TokenBalance::new(id.clone(), HolderKind::Identity));
            holder.set_state(AccountState::Initializing);
            let connection = self.connection.clone();
            queries.spawn(async move {
                let info = connection.account_info(&id).await;
                (id, info)
            });
        }
        while let Some(joined) = queries.join_next().await {
            let Ok((id, result)) = joined else { continue };
            let Some(holder) = self.accounts.get_mut(&id) else { continue };
            match result {
                Ok(info) => {
                    holder.set_balance(info.balance);
                    holder.set_state(info.state);
                }
                Err(e) => {
                    warn!("initialization of {id} failed: {e}");
                    holder.set_state(AccountState::Offline);
                }
            }
        }
        info!("initialized {} identities", self.accounts.len());
    }

    /// Consumes the event pipeline until the sender side is closed.
    pub async fn run_events(&mut self) {
        while let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }

    /// Applies every event already queued in the pipeline, then returns.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Submits a transfer. Never fails: prepare/sign/submit errors become
    /// terminal progress on the returned flow.
    pub async fn transfer(&mut self, task: TransferTask, signer: &dyn Signer) -> Arc<Taskflow> {
        let flow = Arc::new(Taskflow::new(OperationTask::Transfer(task.clone())));
        let result = async {
            let prepared = self.connection.prepare_transfer(&task).await?;
            self.finish_submission(&flow, OperationTask::Transfer(prepared.task), prepared.bytes, signer)
                .await
        }
        .await;
        Self::settle_submission(&flow, result);
        flow
    }

    /// Submits an origination. Same failure contract as [`Engine::transfer`].
    pub async fn originate(&mut self, task: OriginateTask, signer: &dyn Signer) -> Arc<Taskflow> {
        let flow = Arc::new(Taskflow::new(OperationTask::Originate(task.clone())));
        let result = async {
            let prepared = self.connection.prepare_origination(&task).await?;
            self.finish_submission(&flow, OperationTask::Originate(prepared.task), prepared.bytes, signer)
                .await
        }
        .await;
        Self::settle_submission(&flow, result);
        flow
    }

    /// Submits an identity activation. Same failure contract as
    /// [`Engine::transfer`].
    pub async fn activate(&mut self, task: ActivateTask, signer: &dyn Signer) -> Arc<Taskflow> {
        let flow = Arc::new(Taskflow::new(OperationTask::Activate(task.clone())));
        let result = async {
            let prepared = self.connection.prepare_activation(&task).await?;
            self.finish_submission(&flow, OperationTask::Activate(prepared.task), prepared.bytes, signer)
                .await
        }
        .await;
        Self::settle_submission(&flow, result);
        flow
    }

    /// Decode, validate, sign, submit, register, and start the monitor.
    async fn finish_submission(
        &mut self,
        flow: &Arc<Taskflow>,
        updated: OperationTask,
        bytes: Vec<u8>,
        signer: &dyn Signer,
    ) -> Result<(), EngineError> {
        let parsed = ParsedOperation::decode(&bytes)?;
        validate_prepared(&parsed, &updated)?;
        flow.replace_task(updated.clone());
        flow.update(Progress::Prepared);

        let signature = signer
            .sign(updated.source(), &bytes)
            .await
            .map_err(|e| match e {
                SignerError::Declined => EngineError::SigningDeclined,
                other => EngineError::Signer(other.to_string()),
            })?;

        let operation_id = self.connection.submit_operation(&bytes, &signature).await?;
        info!("operation submitted as {operation_id}");
        flow.set_operation_id(operation_id.clone());
        flow.update(Progress::Submitted);

        self.registry.register(operation_id.clone(), flow.clone());
        let monitor = OperationMonitor::new(
            operation_id,
            flow.clone(),
            self.connection.clone(),
            self.events_tx.clone(),
            &self.config,
        );
        tokio::spawn(monitor.run());
        Ok(())
    }

    fn settle_submission(flow: &Arc<Taskflow>, result: Result<(), EngineError>) {
        match result {
            Ok(()) => {}
            Err(EngineError::SigningDeclined) => {
                info!("operation cancelled: signing declined");
                flow.update(Progress::Cancelled);
            }
            Err(e) => {
                warn!("operation failed before acknowledgement: {e}");
                flow.update(Progress::Failed);
            }
        }
    }

    /// Applies one inbound event. Safe under duplicates, reordering, and
    /// staleness; replays of closed operations are no-ops.
    pub fn handle_event(&mut self, event: NetworkEvent) {
        if let Some(block_index) = event.block_index() {
            if block_index < self.current_block_index {
                debug!(
                    "dropping stale event at block {block_index} (watermark {})",
                    self.current_block_index
                );
                return;
            }
            self.current_block_index = block_index;
        }

        match event {
            NetworkEvent::OriginatePending {
                operation_id,
                manager,
                account,
                amount,
            } => {
                if !self.accounts.contains_key(&manager) {
                    warn!("origination pending for unknown identity {manager}, ignored");
                    return;
                }
                if self.closed.contains(&(account.clone(), operation_id.clone())) {
                    debug!("origination {operation_id} already closed, pending ignored");
                    return;
                }
                let holder = self
                    .accounts
                    .entry(account.clone())
                    .or_insert_with(|| TokenBalance::new(account.clone(), HolderKind::Account));
                holder.add_pending(PendingChange {
                    operation_id: operation_id.clone(),
                    delta: AmountDelta::incoming(amount),
                });
                holder.set_state(AccountState::Creating);
                self.registry.update(&operation_id, Progress::Acknowledged);
            }

            NetworkEvent::Originate {
                operation_id,
                account,
                balance,
                block_index,
                ..
            } => {
                if !self.closed.insert((account.clone(), operation_id.clone())) {
                    debug!("duplicate origination confirm for {operation_id}, ignored");
                    return;
                }
                let holder = self
                    .accounts
                    .entry(account.clone())
                    .or_insert_with(|| TokenBalance::new(account.clone(), HolderKind::Account));
                let pending = holder.close_pending(&operation_id);
                let delta = pending
                    .map(|p| p.delta)
                    .unwrap_or_else(|| AmountDelta::incoming(balance));
                holder.push_entry(LedgerEntry {
                    operation_id: operation_id.clone(),
                    delta,
                    block_index: Some(block_index),
                });
                holder.set_balance(balance);
                holder.set_state(AccountState::Online);
                self.registry.update(&operation_id, Progress::Confirmed);
            }

            NetworkEvent::OriginationTimeout {
                operation_id,
                manager,
                account,
            } => {
                if !self.accounts.contains_key(&manager) {
                    warn!("origination timeout for unknown identity {manager}, ignored");
                    return;
                }
                self.close_without_entry(&account, &operation_id);
                self.close_without_entry(&manager, &operation_id);
                if let Some(holder) = self.accounts.get_mut(&account) {
                    holder.set_state(AccountState::UnheardOf);
                }
                self.registry.update(&operation_id, Progress::Timeout);
            }

            NetworkEvent::BalanceChanged {
                operation_id,
                account,
                balance,
                block_index,
            } => {
                let Some(holder) = self.accounts.get_mut(&account) else {
                    warn!("balance change for untracked account {account}, ignored");
                    return;
                };
                if !self.closed.insert((account.clone(), operation_id.clone())) {
                    debug!("duplicate balance change for {operation_id}, ignored");
                    return;
                }
                let old = holder.balance();
                let pending = holder.close_pending(&operation_id);
                let delta = pending.map(|p| p.delta).unwrap_or_else(|| balance.delta_from(old));
                holder.push_entry(LedgerEntry {
                    operation_id: operation_id.clone(),
                    delta,
                    block_index: Some(block_index),
                });
                holder.set_balance(balance);
                holder.set_state(AccountState::Online);
                self.registry.update(&operation_id, Progress::Confirmed);
            }

            NetworkEvent::TransactionPending {
                operation_id,
                account,
                amount,
                incoming,
            } => {
                if self.closed.contains(&(account.clone(), operation_id.clone())) {
                    debug!("transaction {operation_id} already closed, pending ignored");
                    return;
                }
                let Some(holder) = self.accounts.get_mut(&account) else {
                    warn!("pending transaction for untracked account {account}, ignored");
                    return;
                };
                holder.add_pending(PendingChange {
                    operation_id: operation_id.clone(),
                    delta: if incoming {
                        AmountDelta::incoming(amount)
                    } else {
                        AmountDelta::outgoing(amount)
                    },
                });
                holder.set_state(AccountState::Changing);
                self.registry.update(&operation_id, Progress::Acknowledged);
            }

            NetworkEvent::TransactionTimeout {
                operation_id,
                account,
            } => {
                if !self.accounts.contains_key(&account) {
                    warn!("transaction timeout for untracked account {account}, ignored");
                    return;
                }
                self.close_without_entry(&account, &operation_id);
                if let Some(holder) = self.accounts.get_mut(&account) {
                    if holder.state() == AccountState::Changing {
                        holder.set_state(AccountState::Online);
                    }
                }
                self.registry.update(&operation_id, Progress::Timeout);
            }

            NetworkEvent::ActivationPending {
                operation_id,
                identity,
                amount,
            } => {
                if self.closed.contains(&(identity.clone(), operation_id.clone())) {
                    debug!("activation {operation_id} already closed, pending ignored");
                    return;
                }
                let Some(holder) = self.accounts.get_mut(&identity) else {
                    warn!("pending activation for untracked identity {identity}, ignored");
                    return;
                };
                holder.add_pending(PendingChange {
                    operation_id: operation_id.clone(),
                    delta: AmountDelta::incoming(amount),
                });
                holder.set_state(AccountState::Changing);
                self.registry.update(&operation_id, Progress::Acknowledged);
            }

            NetworkEvent::ActivationTimeout {
                operation_id,
                identity,
            } => {
                if !self.accounts.contains_key(&identity) {
                    warn!("activation timeout for untracked identity {identity}, ignored");
                    return;
                }
                self.close_without_entry(&identity, &operation_id);
                if let Some(holder) = self.accounts.get_mut(&identity) {
                    if holder.state() == AccountState::Changing {
                        holder.set_state(AccountState::Online);
                    }
                }
                self.registry.update(&operation_id, Progress::Timeout);
            }

            NetworkEvent::Service(state) => {
                debug!("service state now {state:?}");
                self.service.send_replace(state);
            }
        }
    }

    /// Closes a pending operation on one holder without recording a ledger
    /// entry (timeouts). Marks the pair closed so replays are ignored.
    fn close_without_entry(&mut self, holder_id: &AccountId, operation_id: &OperationId) {
        self.closed
            .insert((holder_id.clone(), operation_id.clone()));
        if let Some(holder) = self.accounts.get_mut(holder_id) {
            holder.close_pending(operation_id);
        }
    }
}
