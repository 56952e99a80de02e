use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::RestErrorBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Validation,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Builds an error from a non-success HTTP response body. Bodies that
    /// are not JSON are kept verbatim as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let code = ErrorCode::from_http_status(status);
        let message = match serde_json::from_str::<RestErrorBody>(body) {
            Ok(parsed) => match (parsed.message, parsed.details) {
                (Some(message), Some(details)) => format!("{message} ({details})"),
                (Some(message), None) => message,
                (None, Some(details)) => details,
                (None, None) => format!("http status {status}"),
            },
            Err(_) if body.trim().is_empty() => format!("http status {status}"),
            Err(_) => body.trim().to_string(),
        };
        Self { code, message }
    }
}
