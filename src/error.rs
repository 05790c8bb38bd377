//! Application error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned to API clients when an index has no stored observations
pub const NOT_FOUND_MESSAGE: &str = "데이터를 찾을 수 없습니다.";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider error for {ticker}: {message}")]
    Provider { ticker: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Build a provider failure for a ticker
    pub fn provider(ticker: &str, message: impl Into<String>) -> Self {
        AppError::Provider {
            ticker: ticker.to_string(),
            message: message.into(),
        }
    }

    /// Whether this error came from the quote provider (fetch, parse or transport)
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, AppError::Provider { .. } | AppError::Http(_))
    }

    /// Whether this error came from the backing store
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, AppError::Database(_))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Serializable error payload for API clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let error = match err {
            AppError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            other => other.to_string(),
        };

        ErrorResponse { error }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
