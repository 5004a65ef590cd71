//! Session bootstrap: catalog + stored document + autosave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, info, warn};
use vreview_models::SaveStatus;
use vreview_storage::{CatalogSource, SnapshotStore};

use crate::catalog::Catalog;
use crate::config::ReviewConfig;
use crate::error::{SessionError, SessionResult};
use crate::persistence::PersistenceCoordinator;
use crate::session::ReviewSession;

/// A running review session and its persistence coordinator.
pub struct ActiveSession {
    session: RwLock<ReviewSession>,
    persistence: PersistenceCoordinator,
    opened_at: DateTime<Utc>,
    closed: AtomicBool,
}

impl ActiveSession {
    /// List the catalog, load the stored document and start autosaving.
    ///
    /// Either load failing is fatal for the session; callers retry by opening
    /// again. A missing document is not a failure.
    pub async fn open(
        catalog: &dyn CatalogSource,
        store: Arc<dyn SnapshotStore>,
        config: ReviewConfig,
    ) -> SessionResult<Self> {
        let keys = catalog.list_item_keys().await.map_err(|e| {
            error!(error = %e, "Catalog listing failed");
            SessionError::Catalog(e)
        })?;

        let snapshot = store
            .load_snapshot()
            .await
            .map_err(|e| {
                error!(error = %e, "Loading review document failed");
                SessionError::Snapshot(e)
            })?
            .unwrap_or_default();

        let session = ReviewSession::open(Catalog::from_keys(keys), snapshot, config);
        info!(
            items = session.catalog().len(),
            labels = session.labels().len(),
            page = session.cursor().current_page(),
            total_pages = session.cursor().total_pages(),
            page_size = session.config().page_size,
            "Review session opened"
        );

        let persistence = PersistenceCoordinator::start(
            session.live().clone(),
            store,
            session.config().autosave_delay,
        );

        Ok(Self {
            session: RwLock::new(session),
            persistence,
            opened_at: Utc::now(),
            closed: AtomicBool::new(false),
        })
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, ReviewSession> {
        self.session.read().await
    }

    /// Exclusive access for mutations. Fails once the session is closed.
    pub async fn write(&self) -> SessionResult<RwLockWriteGuard<'_, ReviewSession>> {
        let guard = self.session.write().await;
        if self.is_closed() {
            warn!("Mutation rejected on closed review session");
            return Err(SessionError::Closed);
        }
        Ok(guard)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn persistence(&self) -> &PersistenceCoordinator {
        &self.persistence
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// End-of-session save. Autosave stops; the final state is written.
    ///
    /// Holds the session lock throughout: mutations already holding it land
    /// before the final write, later ones get [`SessionError::Closed`].
    pub async fn close(&self) -> SessionResult<SaveStatus> {
        let _guard = self.session.write().await;
        self.closed.store(true, Ordering::SeqCst);
        info!("Closing review session");
        self.persistence.shutdown().await
    }
}
