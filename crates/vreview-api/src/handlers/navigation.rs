//! Page views, navigation, focus and search.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vreview_core::{Direction, ReviewSession};
use vreview_models::PageView;

use crate::error::ApiResult;
use crate::state::AppState;

/// Cursor position as seen by the client.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CursorView {
    pub page: u32,
    pub focused_index: usize,
    pub total_pages: u32,
    pub page_size: usize,
}

impl CursorView {
    pub fn of(session: &ReviewSession) -> Self {
        let cursor = session.cursor();
        Self {
            page: cursor.current_page(),
            focused_index: cursor.focused_index(),
            total_pages: cursor.total_pages(),
            page_size: cursor.page_size(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VideosQuery {
    #[serde(default)]
    pub page: Option<i64>,
}

/// GET /api/videos?page=N
///
/// Page view for N (clamped) without moving the cursor; no page means the
/// cursor's page.
pub async fn get_videos(
    State(state): State<AppState>,
    Query(query): Query<VideosQuery>,
) -> ApiResult<Json<PageView>> {
    let session = state.session().await?;
    let (page, keys) = {
        let s = session.read().await;
        let page = match query.page {
            Some(requested) => s.clamp(requested),
            None => s.cursor().current_page(),
        };
        (page, s.page_keys(page).to_vec())
    };

    // Signing happens without the session lock; labels are read afterwards so
    // edits made meanwhile show up.
    let descriptors = state.pages.fetch(page, &keys).await?;
    let view = session.read().await.annotate(page, descriptors);
    Ok(Json(view))
}

/// GET /api/page
pub async fn get_page(state: State<AppState>) -> ApiResult<Json<PageView>> {
    get_videos(state, Query(VideosQuery { page: None })).await
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    #[serde(alias = "forward")]
    Next,
    #[serde(alias = "previous", alias = "backward")]
    Prev,
}

impl From<NavDirection> for Direction {
    fn from(d: NavDirection) -> Self {
        match d {
            NavDirection::Next => Direction::Forward,
            NavDirection::Prev => Direction::Backward,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NavigateRequest {
    Step { direction: NavDirection },
    Jump { page: i64 },
}

/// POST /api/navigate
pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> ApiResult<Json<CursorView>> {
    let session = state.session().await?;
    let mut s = session.write().await?;
    match request {
        NavigateRequest::Step { direction } => s.navigate(direction.into()),
        NavigateRequest::Jump { page } => s.go_to_page(page),
    };
    Ok(Json(CursorView::of(&s)))
}

#[derive(Debug, Deserialize)]
pub struct FocusRequest {
    pub index: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusResponse {
    pub accepted: bool,
    pub cursor: CursorView,
}

/// POST /api/focus
pub async fn focus(
    State(state): State<AppState>,
    Json(request): Json<FocusRequest>,
) -> ApiResult<Json<FocusResponse>> {
    let session = state.session().await?;
    let mut s = session.write().await?;
    let accepted = usize::try_from(request.index)
        .map(|index| s.focus(index))
        .unwrap_or(false);
    if !accepted {
        debug!(index = request.index, "Focus request out of range");
    }
    Ok(Json(FocusResponse {
        accepted,
        cursor: CursorView::of(&s),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub found: bool,
    pub page: Option<u32>,
    pub index: Option<usize>,
}

/// GET /api/search?q=
///
/// A hit moves the cursor to the matching page and slot.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let session = state.session().await?;
    let hit = session.write().await?.search(&query.q);
    Ok(Json(SearchResponse {
        found: hit.is_some(),
        page: hit.map(|h| h.page),
        index: hit.map(|h| h.index),
    }))
}
