//! Debounced Page Persistence
//!
//! `PageSyncer` owns a background task that receives every committed page
//! snapshot and writes only the last one of each burst:
//!
//! 1. The first snapshot of a burst opens a quiet window
//! 2. Each newer snapshot inside the window replaces the pending one and
//!    restarts the window
//! 3. When the window elapses the pending snapshot goes to
//!    `PageRepository::persist_page`
//!
//! Failures are logged and published as `PageEvent::PersistFailed`. There is
//! no retry and no rollback; the next burst simply writes a newer snapshot.
//! Closing the channel (drop or `shutdown()`) flushes the pending snapshot
//! immediately instead of waiting out the window.

use crate::db::PageRepository;
use crate::models::Page;
use crate::services::PageEvent;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Counters reported by the persistence task when it exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Snapshots written successfully
    pub persisted: usize,

    /// Snapshots whose write failed
    pub failed: usize,

    /// Snapshots replaced by a newer one before their window elapsed
    pub superseded: usize,
}

/// Handle to the debounced persistence task
pub struct PageSyncer {
    snapshot_tx: Option<mpsc::UnboundedSender<Arc<Page>>>,
    task: Option<JoinHandle<SyncStats>>,
}

impl PageSyncer {
    /// Spawn the persistence task on the current tokio runtime
    pub fn spawn(
        repository: Arc<dyn PageRepository>,
        debounce: Duration,
        events: broadcast::Sender<PageEvent>,
    ) -> Self {
        tracing::info!(
            "PageSyncer starting ({}ms debounce)",
            debounce.as_millis()
        );

        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel::<Arc<Page>>();
        let task = tokio::spawn(Self::run(snapshot_rx, repository, debounce, events));

        Self {
            snapshot_tx: Some(snapshot_tx),
            task: Some(task),
        }
    }

    /// Queue a snapshot for persistence
    ///
    /// Non-blocking. Snapshots queued after shutdown are dropped with a warning.
    pub fn notify(&self, page: Arc<Page>) {
        let Some(tx) = &self.snapshot_tx else {
            tracing::warn!("PageSyncer has shut down, snapshot of {} dropped", page.id);
            return;
        };
        if let Err(mpsc::error::SendError(page)) = tx.send(page) {
            tracing::warn!("PageSyncer task has exited, snapshot of {} dropped", page.id);
        }
    }

    /// Flush the pending snapshot and wait for the task to exit
    pub async fn shutdown(mut self) -> SyncStats {
        tracing::info!("Shutting down PageSyncer");
        self.snapshot_tx.take();

        match self.task.take() {
            Some(task) => task.await.unwrap_or_else(|e| {
                tracing::error!("PageSyncer task failed: {}", e);
                SyncStats::default()
            }),
            None => SyncStats::default(),
        }
    }

    async fn run(
        mut snapshot_rx: mpsc::UnboundedReceiver<Arc<Page>>,
        repository: Arc<dyn PageRepository>,
        debounce: Duration,
        events: broadcast::Sender<PageEvent>,
    ) -> SyncStats {
        let mut stats = SyncStats::default();

        while let Some(first) = snapshot_rx.recv().await {
            let mut pending = first;
            let mut superseded = 0;

            loop {
                match tokio::time::timeout(debounce, snapshot_rx.recv()).await {
                    Ok(Some(newer)) => {
                        pending = newer;
                        superseded += 1;
                    }
                    // Channel closed: flush now
                    Ok(None) => break,
                    // Quiet window elapsed
                    Err(_) => break,
                }
            }

            if superseded > 0 {
                tracing::debug!(
                    "Coalesced {} intermediate snapshots of page {}",
                    superseded,
                    pending.id
                );
            }
            stats.superseded += superseded;

            Self::persist(repository.as_ref(), &events, &pending, &mut stats).await;
        }

        tracing::info!(
            "PageSyncer stopped (persisted: {}, failed: {}, superseded: {})",
            stats.persisted,
            stats.failed,
            stats.superseded
        );
        stats
    }

    async fn persist(
        repository: &dyn PageRepository,
        events: &broadcast::Sender<PageEvent>,
        page: &Page,
        stats: &mut SyncStats,
    ) {
        // Send errors only mean nobody is subscribed
        match repository.persist_page(page).await {
            Ok(()) => {
                stats.persisted += 1;
                tracing::debug!("Persisted page {} ({} nodes)", page.id, page.nodes.len());
                let _ = events.send(PageEvent::Persisted {
                    page_id: page.id.clone(),
                    at: Utc::now(),
                });
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!("Failed to persist page {}: {}", page.id, e);
                let _ = events.send(PageEvent::PersistFailed {
                    page_id: page.id.clone(),
                    error: e.to_string(),
                    at: Utc::now(),
                });
            }
        }
    }
}
