use axum::http::StatusCode;
use thiserror::Error;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Storage responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid object path: {0}")]
    InvalidPath(String),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        if status.is_server_error() {
            tracing::error!("{}", error);
            // Internal detail stays in the log
            HttpError::server_error(crate::error::ErrorMessage::ServerError.to_string())
        } else {
            HttpError::new(error.to_string(), status)
        }
    }
}
