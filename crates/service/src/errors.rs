use client::ApiError;
use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ModelError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("session storage error: {0}")]
    Session(#[from] SessionError),
}

impl ServiceError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ServiceError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.api().and_then(ApiError::status)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.api().and_then(ApiError::error_code)
    }
}

/// Failures of the client-side session media.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(String),
    #[error("encode error: {0}")]
    Encode(String),
}
