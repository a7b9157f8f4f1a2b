// Path: crates/engine/src/registry.rs

//! The engine-owned registry of in-flight operations.
//!
//! Maps server-assigned operation ids to their flows so that network events
//! and status polls can find the matching lifecycle from anywhere. Entries
//! are inserted once the id is known and removed when a final progress
//! value arrives. Lookups on unknown ids are no-ops: the operation may
//! belong to a different client instance or have already completed.

use dashmap::DashMap;
use log::debug;
use std::sync::Arc;

use tessera_types::{OperationId, Progress};

use crate::flow::Taskflow;

/// Concurrent id-to-flow map, safe to share across operation flows.
#[derive(Default)]
pub struct OperationRegistry {
    pending: DashMap<OperationId, Arc<Taskflow>>,
}

impl OperationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a flow under its server-assigned id.
    pub fn register(&self, id: OperationId, flow: Arc<Taskflow>) {
        debug!("registering pending operation {id}");
        self.pending.insert(id, flow);
    }

    /// Forwards a progress update to the owning flow, deregistering it if
    /// the progress is final. Unknown ids are silently skipped.
    pub fn update(&self, id: &OperationId, progress: Progress) {
        // Clone out of the map entry before any removal so the shard lock
        // is not held across the flow update.
        let flow = self.pending.get(id).map(|entry| entry.value().clone());
        match flow {
            Some(flow) => {
                flow.update(progress);
                if progress.is_final() {
                    self.pending.remove(id);
                    debug!("operation {id} closed with {progress:?}");
                }
            }
            None => debug!("progress {progress:?} for unknown operation {id}, ignored"),
        }
    }

    /// The flow registered under `id`, if any.
    pub fn get(&self, id: &OperationId) -> Option<Arc<Taskflow>> {
        self.pending.get(id).map(|entry| entry.value().clone())
    }

    /// How many operations are currently in flight.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no operations are in flight.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
