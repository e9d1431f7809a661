//! Error types for the vmgr API
//!
//! A single error enum is shared by the service traits and every binding
//! that implements them.

/// Errors returned by service operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed with status {status}: {reason}: {detail}")]
    Fault {
        status: u16,
        reason: String,
        detail: String,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("all servers failed")]
    AllServersFailed,

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// Wrap a transport-level error from an HTTP stack
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ApiError::Transport(Box::new(err))
    }

    /// HTTP status carried by the error, if the engine answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Fault { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
