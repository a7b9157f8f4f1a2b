// Path: crates/engine/tests/lifecycle.rs

//! End-to-end operation flows against the simulated backend: submission,
//! acknowledgement, confirmation, and the monitor's poll fallback.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use tessera_codec::prefixed;
use tessera_crypto::Ed25519KeyPair;
use tessera_engine::{
    AccountInfo, AccountState, Engine, LocalSigner, OperationStatus, Signer, SignerError,
};
use tessera_sim::SimConnection;
use tessera_types::{
    AccountId, ActivateTask, Amount, EngineConfig, NetworkEvent, OperationHeader, Progress,
    TransferTask,
};

fn identity(hash: [u8; 20]) -> AccountId {
    AccountId::new(prefixed::encode(&prefixed::ED25519_PUBLIC_KEY_HASH, &hash).unwrap())
}

fn contract(hash: [u8; 20]) -> AccountId {
    AccountId::new(prefixed::encode(&prefixed::CONTRACT_HASH, &hash).unwrap())
}

fn transfer_task(source: &AccountId) -> TransferTask {
    let mut header = OperationHeader::for_amount(Amount::from_micro(2_000_000));
    header.service_fee = Amount::from_micro(100_000);
    TransferTask {
        header,
        source: source.clone(),
        destination: contract([2; 20]),
    }
}

async fn setup(config: EngineConfig) -> (Engine, Arc<SimConnection>, AccountId, LocalSigner) {
    let sim = Arc::new(SimConnection::new(contract([9; 20])));
    let source = identity([1; 20]);
    sim.set_account(
        source.clone(),
        AccountInfo {
            balance: Amount::from_micro(10_000_000),
            state: AccountState::Online,
        },
    );
    let mut engine = Engine::new(sim.clone(), config);
    engine.initialize(vec![source.clone()]).await;
    let mut signer = LocalSigner::new();
    signer.insert(source.clone(), Ed25519KeyPair::generate());
    (engine, sim, source, signer)
}

struct DecliningSigner;

#[async_trait]
impl Signer for DecliningSigner {
    async fn sign(&self, _identity: &AccountId, _data: &[u8]) -> Result<Vec<u8>, SignerError> {
        Err(SignerError::Declined)
    }
}

#[tokio::test]
async fn transfer_submits_then_confirms_through_events() {
    let (mut engine, sim, source, signer) = setup(EngineConfig::default()).await;
    let flow = engine.transfer(transfer_task(&source), &signer).await;

    assert_eq!(flow.progress(), Progress::Submitted);
    let op = flow.operation_id().unwrap();
    assert_eq!(op.as_str(), "sim-op-1");
    assert_eq!(engine.registry().len(), 1);
    assert_eq!(sim.submissions().len(), 1);

    engine.handle_event(NetworkEvent::TransactionPending {
        operation_id: op.clone(),
        account: source.clone(),
        amount: Amount::from_micro(2_101_400),
        incoming: false,
    });
    assert_eq!(flow.when_acknowledged().await, Progress::Acknowledged);

    engine.handle_event(NetworkEvent::BalanceChanged {
        operation_id: op.clone(),
        account: source.clone(),
        balance: Amount::from_micro(7_898_600),
        block_index: 1,
    });
    assert_eq!(flow.when_completed().await, Progress::Confirmed);
    assert!(engine.registry().is_empty());

    let holder = engine.account(&source).unwrap();
    assert_eq!(holder.balance(), Amount::from_micro(7_898_600));
    assert_eq!(holder.entries().len(), 1);
    assert_eq!(holder.entries()[0].operation_id, op);
}

#[tokio::test]
async fn declined_signing_cancels_the_flow() {
    let (mut engine, sim, source, _signer) = setup(EngineConfig::default()).await;
    let flow = engine.transfer(transfer_task(&source), &DecliningSigner).await;

    assert_eq!(flow.when_completed().await, Progress::Cancelled);
    assert!(engine.registry().is_empty());
    assert!(sim.submissions().is_empty());
}

#[tokio::test]
async fn rejected_submission_fails_the_flow() {
    let (mut engine, sim, source, signer) = setup(EngineConfig::default()).await;
    sim.reject_next_submit();
    let flow = engine.transfer(transfer_task(&source), &signer).await;

    assert_eq!(flow.when_completed().await, Progress::Failed);
    assert!(engine.registry().is_empty());
    assert!(flow.operation_id().is_none());
}

#[tokio::test]
async fn activation_confirms_through_events() {
    let (mut engine, _sim, source, signer) = setup(EngineConfig::default()).await;
    let task = ActivateTask {
        header: OperationHeader::for_amount(Amount::from_micro(3_000_000)),
        identity: source.clone(),
        secret: "aabbccdd".into(),
    };
    let flow = engine.activate(task, &signer).await;
    assert_eq!(flow.progress(), Progress::Submitted);
    let op = flow.operation_id().unwrap();

    engine.handle_event(NetworkEvent::ActivationPending {
        operation_id: op.clone(),
        identity: source.clone(),
        amount: Amount::from_micro(3_000_000),
    });
    engine.handle_event(NetworkEvent::BalanceChanged {
        operation_id: op,
        account: source.clone(),
        balance: Amount::from_micro(13_000_000),
        block_index: 1,
    });
    assert_eq!(flow.when_completed().await, Progress::Confirmed);
}

#[tokio::test(start_paused = true)]
async fn monitor_polls_when_no_events_arrive_and_stops_on_completion() {
    let config = EngineConfig {
        acknowledge_timeout_ms: 100,
        completion_timeout_ms: 200,
        default_retry_ms: 100,
    };
    let (mut engine, sim, source, signer) = setup(config).await;
    let flow = engine.transfer(transfer_task(&source), &signer).await;
    let op = flow.operation_id().unwrap();

    // Silence from the network: the monitor falls back to polling.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(sim.poll_count() >= 3, "got {} polls", sim.poll_count());

    // Script the poll answer; the next poll feeds the events into the
    // engine's pipeline.
    sim.set_status(
        op.clone(),
        OperationStatus {
            events: vec![
                NetworkEvent::TransactionPending {
                    operation_id: op.clone(),
                    account: source.clone(),
                    amount: Amount::from_micro(2_101_400),
                    incoming: false,
                },
                NetworkEvent::BalanceChanged {
                    operation_id: op.clone(),
                    account: source.clone(),
                    balance: Amount::from_micro(7_898_600),
                    block_index: 1,
                },
            ],
            retry_after: None,
        },
    );
    tokio::time::sleep(Duration::from_millis(200)).await;
    engine.drain_events();
    assert_eq!(flow.when_completed().await, Progress::Confirmed);

    // The monitor notices completion and stops polling.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let settled = sim.poll_count();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(sim.poll_count(), settled);
}

#[tokio::test(start_paused = true)]
async fn monitor_rearms_with_server_supplied_retry_interval() {
    let config = EngineConfig {
        acknowledge_timeout_ms: 100,
        completion_timeout_ms: 200,
        default_retry_ms: 100,
    };
    let (mut engine, sim, source, signer) = setup(config).await;
    // Every poll answer tells the client to come back in 300ms, three
    // times slower than the configured fallback interval.
    sim.set_retry_after(Some(Duration::from_millis(300)));
    let _flow = engine.transfer(transfer_task(&source), &signer).await;

    // First poll at the 100ms acknowledge timeout, then one every 300ms:
    // t = 100, 400, 700, 1000.
    tokio::time::sleep(Duration::from_millis(1050)).await;
    assert_eq!(sim.poll_count(), 4, "cadence must follow the server interval");
}

#[tokio::test(start_paused = true)]
async fn registry_update_wakes_the_monitor_without_polling() {
    let (mut engine, sim, source, signer) = setup(EngineConfig::default()).await;
    let flow = engine.transfer(transfer_task(&source), &signer).await;
    let op = flow.operation_id().unwrap();

    // Let the monitor park in its acknowledge wait (30s timeout).
    tokio::time::sleep(Duration::from_millis(1)).await;

    engine.handle_event(NetworkEvent::TransactionPending {
        operation_id: op.clone(),
        account: source.clone(),
        amount: Amount::from_micro(2_101_400),
        incoming: false,
    });
    engine.handle_event(NetworkEvent::BalanceChanged {
        operation_id: op,
        account: source.clone(),
        balance: Amount::from_micro(7_898_600),
        block_index: 1,
    });
    assert_eq!(flow.when_completed().await, Progress::Confirmed);

    // The updates cut the wait short: the monitor re-checks and exits
    // immediately instead of riding out its timeout into a poll.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(sim.poll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn monitor_times_out_without_any_network_answer() {
    let config = EngineConfig {
        acknowledge_timeout_ms: 100,
        completion_timeout_ms: 200,
        default_retry_ms: 100,
    };
    let (mut engine, _sim, source, signer) = setup(config).await;
    let flow = engine.transfer(transfer_task(&source), &signer).await;
    let op = flow.operation_id().unwrap();

    // The network never answers with events; the client gives up when the
    // server reports the operation expired.
    engine.handle_event(NetworkEvent::TransactionTimeout {
        operation_id: op,
        account: source.clone(),
    });
    assert_eq!(flow.when_completed().await, Progress::Timeout);
    assert!(engine.registry().is_empty());
    assert_eq!(engine.account(&source).unwrap().pending_count(), 0);
}
