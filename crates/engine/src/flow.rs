// Path: crates/engine/src/flow.rs

//! The per-operation lifecycle tracker.
//!
//! A `Taskflow` wraps one task and exposes two awaitable signals:
//! `when_acknowledged` resolves on the first acknowledgement or terminal
//! progress, `when_completed` on terminal progress only. Both are
//! first-write-wins; duplicate or out-of-order updates are silent no-ops on
//! the signals, while the task's own progress field is last-write.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{watch, Notify};

use tessera_types::{OperationId, OperationTask, Progress};

/// A set-once completion slot any number of observers can await, before or
/// after resolution.
struct Signal {
    tx: watch::Sender<Option<Progress>>,
}

impl Signal {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// First write wins; later calls change nothing.
    fn resolve(&self, progress: Progress) {
        self.tx.send_if_modified(|slot| {
            if slot.is_none() {
                *slot = Some(progress);
                true
            } else {
                false
            }
        });
    }

    fn is_resolved(&self) -> bool {
        self.tx.borrow().is_some()
    }

    async fn wait(&self) -> Progress {
        let mut rx = self.tx.subscribe();
        let progress = match rx.wait_for(Option::is_some).await {
            Ok(value) => value.unwrap_or(Progress::Failed),
            // The sender lives as long as `self`; this arm is unreachable
            // while any caller still borrows the flow.
            Err(_) => Progress::Failed,
        };
        progress
    }
}

/// Lifecycle tracker for one submitted operation.
pub struct Taskflow {
    task: Mutex<OperationTask>,
    acknowledged: Signal,
    completed: Signal,
    changed: Notify,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Taskflow {
    /// Wraps a task in a fresh flow with both signals unresolved.
    pub fn new(task: OperationTask) -> Self {
        Self {
            task: Mutex::new(task),
            acknowledged: Signal::new(),
            completed: Signal::new(),
            changed: Notify::new(),
        }
    }

    /// Applies a progress notification.
    ///
    /// The task's progress field takes the new value unconditionally; the
    /// completion signals resolve at most once each, on the first
    /// qualifying value.
    pub fn update(&self, progress: Progress) {
        lock(&self.task).header_mut().progress = progress;
        match progress {
            Progress::Acknowledged => self.acknowledged.resolve(progress),
            Progress::Confirmed
            | Progress::Timeout
            | Progress::Failed
            | Progress::Cancelled => {
                self.acknowledged.resolve(progress);
                self.completed.resolve(progress);
            }
            Progress::Created | Progress::Prepared | Progress::Submitted => {}
        }
        self.changed.notify_waiters();
    }

    /// Resolves once the operation has been acknowledged or ended; yields
    /// the progress value that resolved the signal.
    pub async fn when_acknowledged(&self) -> Progress {
        self.acknowledged.wait().await
    }

    /// Resolves once the operation reached a terminal progress.
    pub async fn when_completed(&self) -> Progress {
        self.completed.wait().await
    }

    /// Waits for the next `update` call, whatever it carries. Used by the
    /// monitor to cut its timeout short when fresher information arrives.
    pub async fn changed(&self) {
        self.changed.notified().await;
    }

    /// Whether the acknowledge signal has resolved.
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged.is_resolved()
    }

    /// Whether the completion signal has resolved.
    pub fn is_complete(&self) -> bool {
        self.completed.is_resolved()
    }

    /// The task's current progress (last written).
    pub fn progress(&self) -> Progress {
        lock(&self.task).header().progress
    }

    /// The server-assigned operation id, if submission has succeeded.
    pub fn operation_id(&self) -> Option<OperationId> {
        lock(&self.task).header().operation_id.clone()
    }

    /// Records the server-assigned id after submission.
    pub fn set_operation_id(&self, id: OperationId) {
        lock(&self.task).header_mut().operation_id = Some(id);
    }

    /// Replaces the wrapped task with the server-updated version,
    /// preserving the current progress and operation id.
    pub fn replace_task(&self, mut task: OperationTask) {
        let mut guard = lock(&self.task);
        task.header_mut().progress = guard.header().progress;
        task.header_mut().operation_id = guard.header().operation_id.clone();
        *guard = task;
    }

    /// A snapshot of the wrapped task.
    pub fn task(&self) -> OperationTask {
        lock(&self.task).clone()
    }
}
