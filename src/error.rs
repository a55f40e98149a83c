use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message returned for failures whose details must not leak to callers
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error, please try later";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Failed to fetch similar products for productId: {product_id}")]
    FetchFailed { product_id: String },

    #[error("Request timed out, please try later")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn fetch_failed(product_id: impl Into<String>) -> Self {
        AppError::FetchFailed {
            product_id: product_id.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::FetchFailed { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Unhandled internal error");
                GENERIC_ERROR_MESSAGE.to_string()
            }
            AppError::FetchFailed { product_id } => {
                tracing::error!(product_id = %product_id, "Similar products fetch failed");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
