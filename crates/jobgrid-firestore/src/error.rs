//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited, retry after {0}ms")]
    RateLimited(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
}

impl StoreError {
    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map an HTTP status from the Firestore REST API to a store error.
    pub fn from_http_status(status: u16, detail: String) -> Self {
        match status {
            404 => StoreError::NotFound(detail),
            409 => StoreError::AlreadyExists(detail),
            403 => StoreError::PermissionDenied(detail),
            401 => StoreError::AuthError(detail),
            412 => StoreError::PreconditionFailed(detail),
            429 => StoreError::RateLimited(1000),
            _ => StoreError::RequestFailed(detail),
        }
    }

    /// Check if the error is worth retrying (timeouts, throttling, 5xx).
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Network(_) | StoreError::RateLimited(_) => true,
            StoreError::RequestFailed(msg) => {
                msg.contains("UNAVAILABLE") || msg.contains("DEADLINE_EXCEEDED")
            }
            _ => false,
        }
    }

    /// Suggested retry delay from a 429 response, if any.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            StoreError::RateLimited(ms) => Some(*ms),
            _ => None,
        }
    }

    /// HTTP status this error originated from, for metrics labels.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            StoreError::NotFound(_) => Some(404),
            StoreError::AlreadyExists(_) => Some(409),
            StoreError::PermissionDenied(_) => Some(403),
            StoreError::AuthError(_) => Some(401),
            StoreError::PreconditionFailed(_) => Some(412),
            StoreError::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}
