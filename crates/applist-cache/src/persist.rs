use crate::entry::SharedEntries;
use applist_core::{AppRecord, SnapshotStore};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

/// Handle to the background task that writes cache snapshots.
///
/// Each [`request`](Persister::request) bumps a generation counter. The
/// worker wakes on the latest generation, takes one snapshot of the
/// entries and saves it, so any number of requests made while a write is
/// in progress collapse into a single follow-up write. The worker exits
/// once the handle is dropped and the last pending request is written.
#[derive(Debug)]
pub(crate) struct Persister {
    requested: watch::Sender<u64>,
    completed: watch::Receiver<u64>,
}

impl Persister {
    /// Spawns the worker on the current tokio runtime.
    pub(crate) fn spawn<S: SnapshotStore>(store: Arc<S>, entries: SharedEntries) -> Self {
        let (requested, pending) = watch::channel(0_u64);
        let (done, completed) = watch::channel(0_u64);
        tokio::spawn(run(store, entries, pending, done));
        Self {
            requested,
            completed,
        }
    }

    /// Asks for the current entries to be written. Never blocks.
    pub(crate) fn request(&self) {
        self.requested.send_modify(|generation| *generation += 1);
    }

    /// Waits until every request made before this call has been attempted.
    pub(crate) async fn flush(&self) {
        let target = *self.requested.borrow();
        let mut completed = self.completed.clone();
        if completed.wait_for(|done| *done >= target).await.is_err() {
            warn!(generation = target, "Persistence worker stopped before flush completed");
        }
    }
}

pub(crate) fn snapshot(entries: &SharedEntries) -> Vec<AppRecord> {
    let mut records = entries
        .lock()
        .values()
        .map(|entry| entry.record.clone())
        .collect::<Vec<_>>();
    records.sort_by_key(|record| record.id);
    records
}

async fn run<S: SnapshotStore>(
    store: Arc<S>,
    entries: SharedEntries,
    mut pending: watch::Receiver<u64>,
    done: watch::Sender<u64>,
) {
    while pending.changed().await.is_ok() {
        let generation = *pending.borrow_and_update();
        let records = snapshot(&entries);

        match store.save(&records).await {
            Ok(()) => debug!(generation, count = records.len(), "Persisted cache snapshot"),
            Err(e) => warn!(generation, error = %e, "Failed to persist cache snapshot"),
        }

        done.send_replace(generation);
    }

    trace!("Persistence worker stopped");
}
