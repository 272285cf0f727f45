use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("a dashboard load is already in progress")]
    LoadInProgress,

    #[error("dashboard data is not ready")]
    NotReady,

    #[error("{0}")]
    LoadFailed(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::LoadInProgress => StatusCode::CONFLICT,
            AppError::NotReady => StatusCode::CONFLICT,
            AppError::LoadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
