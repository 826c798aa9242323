//! Conversion of domain errors into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use bizdir_core::RepositoryError;
use bizdir_core::reports::ReportError;
use bizdir_shared::AppError;

/// Error returned by handlers; renders as `{"error": <CODE>, "message": <text>}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Maps a company lookup failure.
    #[must_use]
    pub fn company(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self(AppError::NotFound("company not found".to_string())),
            RepositoryError::Storage(e) => Self(AppError::Database(e)),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_client_error() {
            warn!(status = status.as_u16(), error = %self.0, "request rejected");
            self.0.to_string()
        } else {
            error!(error = %self.0, "request failed");
            "An internal error occurred".to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}
