//! Error types shared across the Conferia workspace.

use thiserror::Error;

/// Core operation result type.
pub type Result<T> = std::result::Result<T, ConferiaError>;

/// Errors surfaced by the registry and reconciliation engine.
///
/// Validation and not-found failures never leave partial writes behind: the
/// operation is checked before anything touches the store.
#[derive(Error, Debug)]
pub enum ConferiaError {
    /// A field failed boundary validation (missing, too short, unknown
    /// sector/room pair).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Target id or QR token does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict (duplicate asset tag or QR token).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Actor lacks the role required for the operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Failure inside the persistence boundary.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ConferiaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn storage(msg: impl std::fmt::Display) -> Self {
        Self::Storage(msg.to_string())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for ConferiaError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<std::io::Error> for ConferiaError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}
