//! Session lifecycle: init, save, status and summary.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vreview_core::SessionError;
use vreview_models::{ItemId, LabelMap, ReviewSnapshot, ReviewSummary, SaveStatus};

use crate::error::{ApiError, ApiResult};
use crate::handlers::navigation::CursorView;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct InitQuery {
    #[serde(default)]
    pub reload: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    pub video_keys: Vec<ItemId>,
    pub labels: LabelMap,
    pub last_page: u32,
    pub page_size: usize,
    pub total_pages: u32,
    pub tags_enabled: bool,
}

/// GET /api/init[?reload=true]
///
/// Opens the session on first use. `reload` writes the running session and
/// re-reads catalog and document from storage.
pub async fn init(
    State(state): State<AppState>,
    Query(query): Query<InitQuery>,
) -> ApiResult<Json<InitResponse>> {
    let session = if query.reload {
        info!("Reloading review session");
        state.reload_session().await?
    } else {
        state.session().await?
    };

    let s = session.read().await;
    Ok(Json(InitResponse {
        video_keys: s.catalog().keys().to_vec(),
        labels: s.labels(),
        last_page: s.cursor().current_page(),
        page_size: s.config().page_size,
        total_pages: s.cursor().total_pages(),
        tags_enabled: s.config().tags_enabled,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub saved: bool,
    pub status: SaveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/save
///
/// Immediate save. A `{ lastPage, labels }` body replaces the session state
/// first; an empty body saves the state as it is.
pub async fn save(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    let replacement = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let snapshot = ReviewSnapshot::from_json_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("invalid review document: {}", e)))?;
        Some(snapshot)
    };

    let session = state.session().await?;
    if let Some(snapshot) = replacement {
        info!(
            last_page = snapshot.last_page,
            labels = snapshot.labels.len(),
            "Replacing session state from client document"
        );
        session.write().await?.apply_snapshot(snapshot);
    }

    let persistence = session.persistence();
    let response = match persistence.save_now().await {
        Ok(status) => Json(SaveResponse {
            saved: true,
            status,
            error: None,
        })
        .into_response(),
        Err(e @ SessionError::Closed) => return Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Manual save failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(SaveResponse {
                    saved: false,
                    status: persistence.status(),
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    };
    Ok(response)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: SaveStatus,
    pub cursor: CursorView,
    pub opened_at: DateTime<Utc>,
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let session = state.session().await?;
    let cursor = CursorView::of(&*session.read().await);
    Ok(Json(StatusResponse {
        status: session.persistence().status(),
        cursor,
        opened_at: session.opened_at(),
    }))
}

/// GET /api/summary
pub async fn summary(State(state): State<AppState>) -> ApiResult<Json<ReviewSummary>> {
    let session = state.session().await?;
    let summary = session.read().await.summary();
    Ok(Json(summary))
}
