//! Error taxonomy for Storefront operations.
//!
//! Every failure a service can surface falls into one of these variants.
//! `Gateway` is the only variant that is safe to retry, and for writes
//! only when the operation itself is idempotent.

use thiserror::Error;

use crate::db::DatabaseError;

/// Result type alias using the Storefront [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Domain errors surfaced by the catalog data layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing required input. Surfaced verbatim, never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No resolved user identity.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Identity resolved but lacks the required ownership or role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness or policy violation. Carries the current state so the
    /// caller can reconcile.
    #[error("Conflict: {message} (current state: {current})")]
    Conflict { message: String, current: String },

    /// State-machine transition attempted from a non-eligible state.
    #[error("Invalid transition to {requested}: application is {current}")]
    InvalidTransition { current: String, requested: String },

    /// Transient store/network failure.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether a caller may retry the failed operation with backoff.
    ///
    /// Only transient gateway failures qualify; writes must additionally
    /// be idempotent before a retry is safe.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}

impl From<DatabaseError> for Error {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(what) => Self::NotFound(what),
            DatabaseError::Duplicate(what) => Self::Conflict {
                message: what,
                current: "existing".into(),
            },
            other => Self::Gateway(other.to_string()),
        }
    }
}
