use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use rcpt_api::ErrorBody;

/// Startup and lifecycle errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger error: {0}")]
    Ledger(#[from] rcpt_ledger::LedgerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Request-level failure returned by an operation handler.
///
/// Neither kind ever touches the audit log.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or malformed request fields, detected before any ledger call.
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<String>,
    },

    /// The ledger call failed or was rejected; `details` is the upstream message.
    #[error("{message}: {details}")]
    Operation {
        message: &'static str,
        details: String,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn operation(message: &'static str, source: impl std::fmt::Display) -> Self {
        Self::Operation {
            message,
            details: source.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Operation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            Self::Validation { message, details } => ErrorBody {
                error: message.clone(),
                details: details.clone(),
            },
            Self::Operation { message, details } => ErrorBody {
                error: (*message).to_string(),
                details: Some(details.clone()),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation("Invalid JSON body", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation { message, details } => {
                tracing::debug!(error = %message, details = ?details, "request rejected");
            }
            Self::Operation { message, details } => {
                tracing::warn!(error = %message, details = %details, "operation failed");
            }
        }
        (self.status(), Json(self.body())).into_response()
    }
}
