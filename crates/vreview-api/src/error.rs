//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use vreview_core::SessionError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Session(e) => match e {
                SessionError::Catalog(_) | SessionError::Snapshot(_) => StatusCode::SERVICE_UNAVAILABLE,
                SessionError::PageFetch { .. } | SessionError::Save(_) => StatusCode::BAD_GATEWAY,
                SessionError::UnknownItem(_) | SessionError::EmptySlot { .. } => StatusCode::NOT_FOUND,
                SessionError::Closed => StatusCode::CONFLICT,
            },
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Session(SessionError::Catalog(_) | SessionError::Snapshot(_)) => Some("session_unavailable"),
            ApiError::Session(SessionError::PageFetch { .. }) => Some("page_fetch_failed"),
            ApiError::Session(SessionError::Save(_)) => Some("save_failed"),
            ApiError::Session(SessionError::UnknownItem(_)) => Some("unknown_item"),
            ApiError::Session(SessionError::EmptySlot { .. }) => Some("empty_slot"),
            ApiError::Session(SessionError::Closed) => Some("session_closed"),
            ApiError::RateLimited => Some("rate_limited"),
            _ => None,
        }
    }

    /// Errors whose message carries backend details.
    fn is_internal(&self) -> bool {
        matches!(
            self,
            ApiError::Session(
                SessionError::Catalog(_)
                    | SessionError::Snapshot(_)
                    | SessionError::PageFetch { .. }
                    | SessionError::Save(_)
            )
        )
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = if self.is_internal()
            && std::env::var("ENVIRONMENT").unwrap_or_default() == "production"
        {
            "A storage error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            detail,
            code: self.code().map(str::to_string),
        };

        (status, Json(body)).into_response()
    }
}
