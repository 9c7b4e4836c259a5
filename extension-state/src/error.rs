//! Error types for extension-state

use thiserror::Error;

/// Message shown when a document write is rejected
pub const CONFLICT_MESSAGE: &str =
    "This item has been modified by someone else. Please refresh the page to get the latest version.";

/// Result type for extension-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Failure reported by an external service client
///
/// Orchestration only relies on `message`; `status` is kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
    pub status: Option<u16>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// HTTP 409/412, the statuses an optimistic-concurrency mismatch produces
    pub fn is_conflict(&self) -> bool {
        matches!(self.status, Some(409) | Some(412))
    }
}

/// Errors surfaced to callers of action creators
#[derive(Debug, Error)]
pub enum StateError {
    /// An external fetch failed; displays as the service's message
    #[error("{0}")]
    Fetch(#[from] ServiceError),

    /// A document write was rejected
    #[error("{}", CONFLICT_MESSAGE)]
    Conflict,

    /// A setting could not be encoded or decoded
    #[error("Invalid setting value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An action creator was requested for a service that was not provided
    #[error("Service not configured: {0}")]
    ServiceNotConfigured(&'static str),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StateError {
    /// Message suitable for an error banner
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
