// Path: crates/engine/src/monitor.rs

//! The poll-fallback supervisor for one pending operation.
//!
//! Push notifications can be lost; the monitor guarantees the flow still
//! reaches a terminal progress. It runs two phases, waiting first for
//! acknowledgement and then for completion. In each phase it arms a
//! cancellable delay: if the delay elapses with no update, it issues an
//! explicit status poll, feeds any returned events into the engine's event
//! pipeline, and re-arms with the server-supplied retry interval.
//!
//! Progress updates reach the monitor through the registry:
//! `OperationRegistry::update` forwards the value to the flow, and the
//! flow's change notification cuts the monitor's wait short so the phase
//! check happens immediately instead of after the full timeout.

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use tessera_types::{EngineConfig, NetworkEvent, OperationId};

use crate::connection::Connection;
use crate::flow::Taskflow;

/// The engine's inbound event pipeline.
pub type EventSink = tokio::sync::mpsc::UnboundedSender<NetworkEvent>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    Acknowledge,
    Complete,
}

/// Supervises one submitted operation until its flow is terminal.
pub struct OperationMonitor {
    operation_id: OperationId,
    flow: Arc<Taskflow>,
    connection: Arc<dyn Connection>,
    events: EventSink,
    acknowledge_timeout: Duration,
    completion_timeout: Duration,
    default_retry: Duration,
}

impl OperationMonitor {
    /// Builds a monitor for a freshly submitted operation.
    pub fn new(
        operation_id: OperationId,
        flow: Arc<Taskflow>,
        connection: Arc<dyn Connection>,
        events: EventSink,
        config: &EngineConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            operation_id,
            flow,
            connection,
            events,
            acknowledge_timeout: config.acknowledge_timeout(),
            completion_timeout: config.completion_timeout(),
            default_retry: config.default_retry(),
        })
    }

    /// Runs until the flow reaches a terminal progress.
    pub async fn run(self: Arc<Self>) {
        self.wait_phase(Phase::Acknowledge).await;
        self.wait_phase(Phase::Complete).await;
        debug!("monitor for {} finished", self.operation_id);
    }

    fn phase_settled(&self, phase: Phase) -> bool {
        match phase {
            Phase::Acknowledge => self.flow.is_acknowledged(),
            Phase::Complete => self.flow.is_complete(),
        }
    }

    async fn wait_phase(&self, phase: Phase) {
        let mut delay = match phase {
            Phase::Acknowledge => self.acknowledge_timeout,
            Phase::Complete => self.completion_timeout,
        };
        while !self.phase_settled(phase) {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    // No update arrived in time; fall back to polling.
                    match self.connection.operation_status(&self.operation_id).await {
                        Ok(status) => {
                            debug!(
                                "status poll for {} returned {} event(s)",
                                self.operation_id,
                                status.events.len()
                            );
                            for event in status.events {
                                if self.events.send(event).is_err() {
                                    // Engine gone; nothing left to supervise.
                                    return;
                                }
                            }
                            delay = status.retry_after.unwrap_or(self.default_retry);
                        }
                        Err(e) => {
                            warn!(
                                "status poll for {} failed ({e}), retrying",
                                self.operation_id
                            );
                        }
                    }
                }
                _ = self.flow.changed() => {
                    // Fresh update arrived; loop re-checks the phase now.
                }
            }
        }
    }
}
