use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use church_site_core::auth::AuthError;
use church_site_core::content::ContentError;
use church_site_core::media::MediaError;
use church_site_core::messages::InboxError;
use serde_json::json;

/// API error type rendered as `{"error": {type, message, statusCode}}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            ApiError::Storage(msg) => {
                tracing::error!("Storage failure: {msg}");
                (
                    StatusCode::INSUFFICIENT_STORAGE,
                    "storageFailure",
                    "Content could not be saved".to_string(),
                )
            }
            ApiError::Upstream(msg) => {
                tracing::error!("Upstream failure: {msg}");
                (StatusCode::BAD_GATEWAY, "upstreamFailure", msg.clone())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Decode(_) | ContentError::NotAnObject(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ContentError::Encode(_) | ContentError::Persist(_) => ApiError::Storage(err.to_string()),
        }
    }
}

impl From<InboxError> for ApiError {
    fn from(err: InboxError) -> Self {
        match err {
            InboxError::NotFound(id) => ApiError::NotFound(format!("message {id}")),
            InboxError::Invalid(e) => ApiError::BadRequest(e.to_string()),
            InboxError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::InvalidFolder(_)
            | MediaError::UnsupportedType(_)
            | MediaError::Empty(_)
            | MediaError::ForeignUrl(_) => ApiError::BadRequest(err.to_string()),
            MediaError::Backend { .. } | MediaError::Http(_) => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) => ApiError::Unauthorized,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
