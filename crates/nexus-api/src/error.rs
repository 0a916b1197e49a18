//! Maps log failures onto HTTP responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use nexus_types::api::ErrorResponse;
use nexus_types::error::LogError;

#[derive(Debug)]
pub enum ApiError {
    Log(LogError),
    NotFound,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Log(LogError::Validation(msg.into()))
    }
}

impl From<LogError> for ApiError {
    fn from(e: LogError) -> Self {
        Self::Log(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::validation(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::validation(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::Log(e @ LogError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, Some(e.kind()), e.to_string())
            }
            Self::Log(e @ LogError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Some(e.kind()), e.to_string())
            }
            Self::NotFound => (StatusCode::NOT_FOUND, None, "Route not found".to_string()),
        };

        let body = ErrorResponse {
            status: "error".into(),
            kind: kind.map(str::to_string),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Run a blocking store call off the async runtime.
///
/// The task keeps running if the request future is dropped, so an append
/// that has started always completes.
pub async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, LogError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Log(LogError::Storage("store task did not complete".into()))
        })?
        .map_err(ApiError::from)
}
