use common::types::{ErrorEnvelope, ErrorParams};
use thiserror::Error;

/// The backend answered with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct StructuredError {
    pub message: String,
    pub http_status: u16,
    pub error_code: Option<String>,
    pub params: Option<ErrorParams>,
}

impl StructuredError {
    /// Build from a status and a (possibly undecodable) error body.
    pub fn from_envelope(http_status: u16, envelope: Option<ErrorEnvelope>) -> Self {
        let envelope = envelope.unwrap_or_default();
        Self {
            message: envelope
                .message
                .unwrap_or_else(|| format!("HTTP {http_status}")),
            http_status,
            error_code: envelope.error_code,
            params: envelope.params,
        }
    }
}

/// Coarse category callers branch on when presenting an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Server responded with an error status.
    Structured,
    /// No HTTP response was obtained.
    Transport,
    /// Rejected locally before any network call.
    Precondition,
    /// A 2xx body did not match the expected shape.
    Decode,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Structured(#[from] StructuredError),
    #[error("API Error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("tenant identifier missing")]
    MissingTenant,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Structured(_) => ErrorKind::Structured,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::MissingTenant | ApiError::InvalidRequest(_) => ErrorKind::Precondition,
            ApiError::Parse(_) => ErrorKind::Decode,
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredError> {
        match self {
            ApiError::Structured(e) => Some(e),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.as_structured().map(|e| e.http_status)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.as_structured().and_then(|e| e.error_code.as_deref())
    }

    pub fn params(&self) -> Option<&ErrorParams> {
        self.as_structured().and_then(|e| e.params.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_envelope_falls_back_to_status_message() {
        let e = StructuredError::from_envelope(502, None);
        assert_eq!(e.message, "HTTP 502");
        assert_eq!(e.http_status, 502);
        assert!(e.error_code.is_none());
        assert!(e.params.is_none());
    }

    #[test]
    fn envelope_fields_copied_through() {
        let env = ErrorEnvelope::from_body(br#"{"message":"nope","errorCode":"E1","params":{"n":1}}"#);
        let e = StructuredError::from_envelope(409, env);
        assert_eq!(e.to_string(), "nope");
        assert_eq!(e.error_code.as_deref(), Some("E1"));
        assert_eq!(e.params.unwrap()["n"], serde_json::json!(1));
    }

    #[test]
    fn kinds_and_accessors() {
        let err: ApiError = StructuredError::from_envelope(404, None).into();
        assert_eq!(err.kind(), ErrorKind::Structured);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.error_code(), None);
        assert_eq!(ApiError::MissingTenant.kind(), ErrorKind::Precondition);
        assert_eq!(ApiError::MissingTenant.status(), None);
    }
}
