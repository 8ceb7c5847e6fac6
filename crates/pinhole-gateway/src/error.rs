use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pinhole_core::StorageError;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No url to shorten.")]
    MissingUrl,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUrl => StatusCode::BAD_REQUEST,
            AppError::Storage(e) if e.is_backend_failure() => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::MissingUrl => (status, self.to_string()).into_response(),
            AppError::Storage(e) => {
                error!(error = %e, "storage request failed");
                (status, "Storage unavailable.").into_response()
            }
        }
    }
}
