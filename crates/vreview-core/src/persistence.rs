//! Persistence coordinator: decides when the review document is written.
//!
//! Two independent write paths share one routine:
//! - autosave: trailing-edge debounce over the live state cell. Every published
//!   mutation restarts the timer; the document is read when the timer fires.
//! - immediate: manual save and end-of-session save, read at call time.
//!
//! Writes are spawned or awaited to completion and never cancelled. Each one
//! carries a full document, so overlapping writes need no merge; the store's
//! last-write-wins decides the durable value. Failures surface through
//! [`SaveStatus`] and never touch the in-memory labels.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use vreview_models::{ReviewSnapshot, SaveState, SaveStatus};
use vreview_storage::SnapshotStore;

use crate::error::{SessionError, SessionResult};
use crate::live::LiveState;
use crate::metrics::record_snapshot_write;

/// What caused a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    Autosave,
    Manual,
    SessionEnd,
}

impl SaveTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveTrigger::Autosave => "autosave",
            SaveTrigger::Manual => "manual",
            SaveTrigger::SessionEnd => "session_end",
        }
    }
}

struct Writer {
    live: LiveState,
    store: Arc<dyn SnapshotStore>,
    status: watch::Sender<SaveStatus>,
    dispatched: AtomicU64,
    closed: AtomicBool,
}

impl Writer {
    fn mark_dirty(&self) {
        self.status.send_if_modified(|s| {
            if s.state == SaveState::Dirty {
                return false;
            }
            s.state = SaveState::Dirty;
            true
        });
    }

    /// Write the document as it is at this instant.
    async fn write(&self, trigger: SaveTrigger) -> SessionResult<SaveStatus> {
        let snapshot = self.live.current();
        let seq = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        self.status.send_modify(|s| {
            s.state = SaveState::Saving;
            s.write_seq = seq;
        });
        debug!(
            seq,
            trigger = trigger.as_str(),
            last_page = snapshot.last_page,
            labels = snapshot.labels.len(),
            "Dispatching review document write"
        );

        let result = self.store.save_snapshot(&snapshot).await;
        record_snapshot_write(trigger.as_str(), result.is_ok());

        match result {
            Ok(()) => {
                info!(seq, trigger = trigger.as_str(), labels = snapshot.labels.len(), "Review document saved");
                let now = Utc::now();
                // Only the latest dispatched write speaks for the indicator, and a
                // success never hides mutations made while it was in flight.
                self.status.send_if_modified(|s| {
                    if s.write_seq != seq {
                        return false;
                    }
                    if s.state == SaveState::Saving {
                        s.state = SaveState::Saved;
                    }
                    s.last_saved_at = Some(now);
                    s.last_error = None;
                    true
                });
                let status = self.status.borrow().clone();
                Ok(status)
            }
            Err(e) => {
                warn!(seq, trigger = trigger.as_str(), error = %e, "Review document write failed");
                let message = e.to_string();
                let now = Utc::now();
                self.status.send_if_modified(|s| {
                    if s.write_seq != seq {
                        return false;
                    }
                    s.state = SaveState::Failed;
                    s.last_error = Some(message);
                    s.last_failed_at = Some(now);
                    true
                });
                Err(SessionError::Save(e))
            }
        }
    }
}

/// Owns the autosave task for one session.
pub struct PersistenceCoordinator {
    writer: Arc<Writer>,
    debounce_task: JoinHandle<()>,
}

impl PersistenceCoordinator {
    /// Start watching `live` and autosaving after `delay` of quiet.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(live: LiveState, store: Arc<dyn SnapshotStore>, delay: Duration) -> Self {
        let (status, _) = watch::channel(SaveStatus::default());
        let changes = live.subscribe();
        let writer = Arc::new(Writer {
            live,
            store,
            status,
            dispatched: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        });

        let debounce_task = tokio::spawn(debounce_loop(Arc::clone(&writer), changes, delay));
        Self {
            writer,
            debounce_task,
        }
    }

    /// Write the latest state now. A pending autosave is left in place.
    ///
    /// Refused after [`shutdown`](Self::shutdown): the final document belongs
    /// to the session end, and a later write would clobber a successor's.
    pub async fn save_now(&self) -> SessionResult<SaveStatus> {
        if self.writer.closed.load(Ordering::SeqCst) {
            warn!("Manual save rejected on closed review session");
            return Err(SessionError::Closed);
        }
        self.writer.write(SaveTrigger::Manual).await
    }


    pub fn status(&self) -> SaveStatus {
        self.writer.status.borrow().clone()
    }

    /// Stop autosaving and write the final state unconditionally.
    pub async fn shutdown(&self) -> SessionResult<SaveStatus> {
        self.writer.closed.store(true, Ordering::SeqCst);
        self.debounce_task.abort();
        self.writer.write(SaveTrigger::SessionEnd).await
    }
}

impl Drop for PersistenceCoordinator {
    fn drop(&mut self) {
        self.debounce_task.abort();
    }
}

async fn debounce_loop(writer: Arc<Writer>, mut changes: watch::Receiver<ReviewSnapshot>, delay: Duration) {
    loop {
        // Idle until the first mutation after the last write was dispatched.
        if changes.changed().await.is_err() {
            return;
        }
        writer.mark_dirty();

        let timer = tokio::time::sleep(delay);
        tokio::pin!(timer);
        loop {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    writer.mark_dirty();
                    timer.as_mut().reset(Instant::now() + delay);
                }
                () = &mut timer => break,
            }
        }

        let writer = Arc::clone(&writer);
        tokio::spawn(async move {
            // Failures are already logged and reflected in the status.
            let _ = writer.write(SaveTrigger::Autosave).await;
        });
    }
}
