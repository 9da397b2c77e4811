use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Sync service error variants. The relay uses `is_retryable` to split
/// transient faults (retried up to the attempt budget) from permanent ones
/// (quarantined on first sight).
#[derive(Debug, thiserror::Error)]
pub enum SyncServiceError {
    #[error("email already registered")]
    EmailTaken,
    #[error("user not found")]
    UserNotFound,
    #[error("content not found")]
    ContentNotFound,
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),
    #[error("projection failed: {0}")]
    ProjectionFailed(String),
    #[error("storage error: {0}")]
    Storage(anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl SyncServiceError {
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        Self::Storage(err.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ContentNotFound => "CONTENT_NOT_FOUND",
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::UnknownEventKind(_) => "UNKNOWN_EVENT_KIND",
            Self::ProjectionFailed(_) => "PROJECTION_FAILED",
            Self::Storage(_) => "STORAGE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether a later attempt could plausibly succeed. Validation faults and
    /// unknown kinds cannot become valid by waiting.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::ProjectionFailed(_) | Self::Internal(_)
        )
    }
}

impl IntoResponse for SyncServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::UserNotFound | Self::ContentNotFound => StatusCode::NOT_FOUND,
            Self::InvalidPayload(_) | Self::UnknownEventKind(_) => StatusCode::BAD_REQUEST,
            Self::ProjectionFailed(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        match &self {
            Self::Internal(e) | Self::Storage(e) => {
                tracing::error!(error = %e, kind = self.kind(), "internal error");
            }
            Self::ProjectionFailed(msg) => {
                tracing::error!(error = %msg, kind = "PROJECTION_FAILED", "internal error");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
