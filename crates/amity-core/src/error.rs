//! Error taxonomy shared by the Amity services.

use thiserror::Error;

use crate::db::DatabaseError;

/// Result type alias using the Amity [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to callers of the relationship and notification APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing, malformed, expired or revoked credential
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Unknown username or record id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate relationship request or taken account name
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transition attempted from an invalid source state
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Malformed request body or path
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization or storage failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The bare message, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthenticated(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::PreconditionFailed(m)
            | Self::InvalidRequest(m)
            | Self::Internal(m) => m,
        }
    }
}

impl From<DatabaseError> for Error {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            other => Self::Internal(other.to_string()),
        }
    }
}
