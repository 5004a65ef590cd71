//! Label mutations.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use vreview_models::{Disposition, ItemId, LabelState, SaveStatus};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Longest tag accepted from a client, in characters.
pub const MAX_TAG_CHARS: usize = 512;

#[derive(Debug, Deserialize)]
pub struct SetLabelRequest {
    pub key: ItemId,
    pub disposition: Disposition,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelResponse {
    pub key: ItemId,
    pub label: LabelState,
    pub status: SaveStatus,
}

/// POST /api/labels
pub async fn set_label(
    State(state): State<AppState>,
    Json(request): Json<SetLabelRequest>,
) -> ApiResult<Json<LabelResponse>> {
    if request.tag.chars().count() > MAX_TAG_CHARS {
        return Err(ApiError::bad_request(format!(
            "tag exceeds {} characters",
            MAX_TAG_CHARS
        )));
    }

    let session = state.session().await?;
    let label = session
        .write()
        .await?
        .set_label(&request.key, request.disposition, request.tag)?;
    info!(
        key = %request.key,
        disposition = %label.disposition,
        tagged = !label.tag.is_empty(),
        "Label set"
    );

    Ok(Json(LabelResponse {
        key: request.key,
        label,
        status: session.persistence().status(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub index: usize,
}

/// POST /api/labels/toggle
///
/// Flip the item at a slot of the current page, keeping its tag.
pub async fn toggle_label(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> ApiResult<Json<LabelResponse>> {
    let session = state.session().await?;
    let (key, label) = session.write().await?.toggle_slot(request.index)?;
    info!(key = %key, disposition = %label.disposition, "Label toggled");

    Ok(Json(LabelResponse {
        key,
        label,
        status: session.persistence().status(),
    }))
}
