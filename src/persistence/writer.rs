//! Fire-and-forget background writer
//!
//! [`PersistWriter`] is a cheap clonable handle to a tokio task that owns a
//! [`Persistence`] backend. `schedule` never blocks: it queues a snapshot and
//! returns. The task coalesces whatever has queued up and writes only the
//! newest snapshot, running the blocking backend call on the blocking pool.
//!
//! A failed write is logged and counted; it never reaches the caller that
//! triggered it, and the in-memory state stays as it is.

use super::Persistence;
use crate::store::PersistedState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum WriterCommand {
    Save(PersistedState),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

#[derive(Debug, Default)]
struct WriterStats {
    written: AtomicU64,
    failed: AtomicU64,
}

/// Handle to the background writer task
#[derive(Debug, Clone)]
pub struct PersistWriter {
    tx: mpsc::UnboundedSender<WriterCommand>,
    stats: Arc<WriterStats>,
}

impl std::fmt::Debug for WriterCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriterCommand::Save(_) => write!(f, "Save"),
            WriterCommand::Flush(_) => write!(f, "Flush"),
            WriterCommand::Shutdown => write!(f, "Shutdown"),
        }
    }
}

impl PersistWriter {
    /// Start the writer task on the current tokio runtime
    ///
    /// # Returns
    ///
    /// The handle and the task's `JoinHandle`, which resolves after `shutdown`
    /// or once every handle has been dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(backend: Arc<dyn Persistence>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stats = Arc::new(WriterStats::default());
        let task = tokio::spawn(run_writer(backend, rx, Arc::clone(&stats)));
        (Self { tx, stats }, task)
    }

    /// Queue a snapshot for writing without waiting for it
    pub fn schedule(&self, state: PersistedState) {
        if self.tx.send(WriterCommand::Save(state)).is_err() {
            tracing::warn!("Persistence writer has stopped, snapshot dropped");
        }
    }

    /// Wait until every snapshot scheduled so far has been handled
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(WriterCommand::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    /// Flush pending snapshots, then end the writer task
    pub async fn shutdown(&self) {
        self.flush().await;
        let _ = self.tx.send(WriterCommand::Shutdown);
    }

    /// Number of snapshots successfully written
    pub fn written(&self) -> u64 {
        self.stats.written.load(Ordering::Relaxed)
    }

    /// Number of snapshots the backend failed to write
    pub fn failed(&self) -> u64 {
        self.stats.failed.load(Ordering::Relaxed)
    }
}

async fn run_writer(
    backend: Arc<dyn Persistence>,
    mut rx: mpsc::UnboundedReceiver<WriterCommand>,
    stats: Arc<WriterStats>,
) {
    while let Some(first) = rx.recv().await {
        let mut latest = None;
        let mut acks = Vec::new();
        let mut stop = false;

        let mut next = Some(first);
        while let Some(command) = next.take() {
            match command {
                WriterCommand::Save(state) => latest = Some(state),
                WriterCommand::Flush(ack) => acks.push(ack),
                WriterCommand::Shutdown => stop = true,
            }
            if !stop {
                next = rx.try_recv().ok();
            }
        }

        if let Some(state) = latest {
            write_snapshot(Arc::clone(&backend), state, &stats).await;
        }
        for ack in acks {
            let _ = ack.send(());
        }
        if stop {
            break;
        }
    }
    tracing::debug!("Persistence writer stopped");
}

async fn write_snapshot(backend: Arc<dyn Persistence>, state: PersistedState, stats: &WriterStats) {
    let prompts = state.prompts.len();
    match tokio::task::spawn_blocking(move || backend.save(&state)).await {
        Ok(Ok(())) => {
            stats.written.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(prompts, "Persisted store snapshot");
        }
        Ok(Err(e)) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, "Failed to persist store snapshot");
        }
        Err(e) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, "Persistence task panicked");
        }
    }
}
