//! Per-block debounced commit timers
//!
//! `CommitScheduler` owns at most one pending timer per block. Scheduling a
//! commit for a block aborts that block's previous timer; when a timer fires
//! a [`DueCommit`] is delivered on the scheduler's channel and turned into an
//! `EditorEvent::CommitDue` by the session.
//!
//! Timers are tokio tasks, so `schedule` must be called from within a tokio
//! runtime. Dropping the scheduler aborts every pending timer.

use crate::models::BlockId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A debounce interval elapsed for `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueCommit {
    pub id: BlockId,
    pub generation: u64,
}

/// Timer task for the draft generation it will commit
struct PendingCommit {
    generation: u64,
    handle: JoinHandle<()>,
}

pub struct CommitScheduler {
    pending: HashMap<BlockId, PendingCommit>,
    due_tx: mpsc::UnboundedSender<DueCommit>,
}

impl CommitScheduler {
    /// Create a scheduler and the receiver its due commits are delivered on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DueCommit>) {
        let (due_tx, due_rx) = mpsc::unbounded_channel();
        (
            Self {
                pending: HashMap::new(),
                due_tx,
            },
            due_rx,
        )
    }

    /// Start (or restart) the timer for `id`
    pub fn schedule(&mut self, id: BlockId, generation: u64, delay: Duration) {
        let due_tx = self.due_tx.clone();
        let due = DueCommit {
            id: id.clone(),
            generation,
        };

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = due_tx.send(due);
        });

        if let Some(previous) = self.pending.insert(id, PendingCommit { generation, handle }) {
            previous.handle.abort();
        }
    }

    /// Cancel the timer for `id`; returns whether one was still running
    pub fn cancel(&mut self, id: &BlockId) -> bool {
        match self.pending.remove(id) {
            Some(PendingCommit { handle, .. }) => {
                let running = !handle.is_finished();
                handle.abort();
                if running {
                    tracing::debug!("Cancelled pending commit for block '{}'", id);
                }
                running
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        let count = self.pending.len();
        for (_, pending) in self.pending.drain() {
            pending.handle.abort();
        }
        if count > 0 {
            tracing::debug!("Cancelled {} pending commit timer(s)", count);
        }
    }

    /// Forget the timer that delivered `due`
    ///
    /// Leaves a timer scheduled for a newer generation of the block in place.
    pub fn complete(&mut self, due: &DueCommit) {
        if self
            .pending
            .get(&due.id)
            .is_some_and(|pending| pending.generation == due.generation)
        {
            self.pending.remove(&due.id);
        }
    }

    pub fn is_pending(&self, id: &BlockId) -> bool {
        self.pending
            .get(id)
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    /// Number of timers that have not fired yet
    pub fn pending_count(&self) -> usize {
        self.pending
            .values()
            .filter(|pending| !pending.handle.is_finished())
            .count()
    }
}

impl Drop for CommitScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
