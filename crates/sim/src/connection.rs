// Path: crates/sim/src/connection.rs

//! The scriptable in-memory backend.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tessera_engine::{AccountInfo, Connection, OperationStatus, PreparedOperation};
use tessera_types::{
    AccountId, ActivateTask, Amount, EngineError, OperationId, OriginateTask, TransferTask,
};

use crate::encode::OperationBuilder;

const BRANCH: [u8; 32] = [0x11; 32];
const DEFAULT_NETWORK_FEE: Amount = Amount::from_micro(1_400);

/// One logged call to `submit_operation`.
#[derive(Clone, Debug)]
pub struct SubmittedOperation {
    /// The id the simulator assigned.
    pub id: OperationId,
    /// The submitted operation bytes.
    pub bytes: Vec<u8>,
    /// The submitted signature.
    pub signature: Vec<u8>,
}

/// An in-memory [`Connection`] whose behaviour tests script up front.
///
/// Prepared bytes are real wire encodings, so they decode and cross-check
/// like node output. Submissions are logged; status polls are counted and
/// answered from a scripted per-operation table, defaulting to an empty
/// status when nothing is scripted.
pub struct SimConnection {
    service_account: AccountId,
    accounts: Mutex<HashMap<AccountId, AccountInfo>>,
    statuses: Mutex<HashMap<OperationId, OperationStatus>>,
    submissions: Mutex<Vec<SubmittedOperation>>,
    retry_after: Mutex<Option<Duration>>,
    account_latency: Mutex<Option<Duration>>,
    reject_next_submit: AtomicBool,
    next_id: AtomicU64,
    polls: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimConnection {
    /// A simulator routing service fees to `service_account`.
    pub fn new(service_account: AccountId) -> Self {
        Self {
            service_account,
            accounts: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            retry_after: Mutex::new(None),
            account_latency: Mutex::new(None),
            reject_next_submit: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            polls: AtomicU64::new(0),
        }
    }

    /// Scripts the account snapshot returned by `account_info`.
    pub fn set_account(&self, id: AccountId, info: AccountInfo) {
        lock(&self.accounts).insert(id, info);
    }

    /// Scripts the answer to status polls for one operation.
    pub fn set_status(&self, id: OperationId, status: OperationStatus) {
        lock(&self.statuses).insert(id, status);
    }

    /// Sets the retry interval attached to unscripted poll answers.
    pub fn set_retry_after(&self, retry: Option<Duration>) {
        *lock(&self.retry_after) = retry;
    }

    /// Adds a simulated round-trip delay to every `account_info` call.
    pub fn set_account_latency(&self, latency: Option<Duration>) {
        *lock(&self.account_latency) = latency;
    }

    /// Makes the next `submit_operation` call fail.
    pub fn reject_next_submit(&self) {
        self.reject_next_submit.store(true, Ordering::SeqCst);
    }

    /// Every submission logged so far.
    pub fn submissions(&self) -> Vec<SubmittedOperation> {
        lock(&self.submissions).clone()
    }

    /// The id the next accepted submission will get.
    pub fn peek_next_id(&self) -> OperationId {
        OperationId::new(format!("sim-op-{}", self.next_id.load(Ordering::SeqCst)))
    }

    /// How many status polls have been answered.
    pub fn poll_count(&self) -> u64 {
        self.polls.load(Ordering::SeqCst)
    }

    fn fill_network_fee(fee: Amount) -> Amount {
        if fee == Amount::ZERO {
            DEFAULT_NETWORK_FEE
        } else {
            fee
        }
    }
}

#[async_trait]
impl Connection for SimConnection {
    async fn prepare_transfer(
        &self,
        task: &TransferTask,
    ) -> Result<PreparedOperation<TransferTask>, EngineError> {
        let mut task = task.clone();
        task.header.network_fee = Self::fill_network_fee(task.header.network_fee);
        let bytes = OperationBuilder::new(BRANCH)
            .transaction(
                &task.source,
                &task.destination,
                task.header.transfer_amount,
                task.header.network_fee,
            )?
            .transaction(
                &task.source,
                &self.service_account,
                task.header.service_fee,
                Amount::ZERO,
            )?
            .build();
        Ok(PreparedOperation { task, bytes })
    }

    async fn prepare_origination(
        &self,
        task: &OriginateTask,
    ) -> Result<PreparedOperation<OriginateTask>, EngineError> {
        let mut task = task.clone();
        task.header.network_fee = Self::fill_network_fee(task.header.network_fee);
        let bytes = OperationBuilder::new(BRANCH)
            .origination(
                &task.source,
                task.header.transfer_amount,
                task.header.network_fee,
                task.delegate.as_ref(),
            )?
            .transaction(
                &task.source,
                &self.service_account,
                task.header.service_fee,
                Amount::ZERO,
            )?
            .build();
        Ok(PreparedOperation { task, bytes })
    }

    async fn prepare_activation(
        &self,
        task: &ActivateTask,
    ) -> Result<PreparedOperation<ActivateTask>, EngineError> {
        let bytes = OperationBuilder::new(BRANCH).activation(&[0xaa; 40]).build();
        Ok(PreparedOperation {
            task: task.clone(),
            bytes,
        })
    }

    async fn submit_operation(
        &self,
        bytes: &[u8],
        signature: &[u8],
    ) -> Result<OperationId, EngineError> {
        if self.reject_next_submit.swap(false, Ordering::SeqCst) {
            return Err(EngineError::Connection("submission rejected".into()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = OperationId::new(format!("sim-op-{n}"));
        debug!("accepted submission {id} ({} bytes)", bytes.len());
        lock(&self.submissions).push(SubmittedOperation {
            id: id.clone(),
            bytes: bytes.to_vec(),
            signature: signature.to_vec(),
        });
        Ok(id)
    }

    async fn operation_status(&self, id: &OperationId) -> Result<OperationStatus, EngineError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = lock(&self.statuses).get(id) {
            return Ok(status.clone());
        }
        Ok(OperationStatus {
            events: Vec::new(),
            retry_after: *lock(&self.retry_after),
        })
    }

    async fn account_info(&self, id: &AccountId) -> Result<AccountInfo, EngineError> {
        let latency = *lock(&self.account_latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        lock(&self.accounts)
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::Connection(format!("no account {id}")))
    }
}
