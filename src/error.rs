//! Error types for the Venuity client

use serde::Serialize;
use thiserror::Error;

/// Generic message shown when the server gives no usable explanation
pub const GENERIC_SERVER_MESSAGE: &str = "Something went wrong on our side. Please try again.";

/// Message shown when no API base URL could be reached
pub const TRANSPORT_MESSAGE: &str =
    "We couldn't reach Venuity. Check your connection and try again.";

/// Message shown when the session ended and the user must sign in again
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Coarse error classification used by the views to pick a banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SessionExpired,
    Authentication,
    Transport,
    Server,
    Storage,
    Validation,
    NotFound,
    BusinessRule,
    Internal,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A 401 outside the soft-fail endpoints; the session has been cleared
    #[error("Session expired while calling {endpoint}")]
    SessionExpired { endpoint: String },

    /// A 401 on a soft-fail endpoint; the session is left untouched
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No response reached us from any configured base URL
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a 4xx/5xx status
    #[error("Server error ({status}): {}", message.as_deref().unwrap_or("<no message>"))]
    Server { status: u16, message: Option<String> },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::SessionExpired { .. } => ErrorKind::SessionExpired,
            AppError::Authentication(_) => ErrorKind::Authentication,
            AppError::Transport(_) => ErrorKind::Transport,
            AppError::Server { .. } => ErrorKind::Server,
            AppError::Storage(_) | AppError::Serialization(_) => ErrorKind::Storage,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::BusinessRule(_) => ErrorKind::BusinessRule,
            AppError::Config(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether a user-triggered retry can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Server)
    }

    /// Message suitable for a banner or a transient notification.
    ///
    /// Server messages are passed through verbatim when the response carried
    /// one; every other case maps to a fixed string.
    pub fn user_message(&self) -> String {
        match self {
            AppError::SessionExpired { .. } => SESSION_EXPIRED_MESSAGE.to_string(),
            AppError::Authentication(msg) => msg.clone(),
            AppError::Transport(_) => TRANSPORT_MESSAGE.to_string(),
            AppError::Server { message, .. } => message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string()),
            AppError::Validation(msg) | AppError::BusinessRule(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Storage(_)
            | AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Internal(_) => GENERIC_SERVER_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => AppError::Server {
                status: status.as_u16(),
                message: None,
            },
            None => AppError::Transport(e.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
