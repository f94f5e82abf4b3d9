//! Common error types for DEVO

use thiserror::Error;
use uuid::Uuid;

/// Common result type for DEVO operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across DEVO modules
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The record store rejected or failed an insert.
    /// The candidate stays in its session partition.
    #[error("Insert failed: {0}")]
    InsertFailed(String),

    /// Another approval of the same candidate has not finished yet
    #[error("Approval already in progress for candidate {0}")]
    ApprovalInProgress(Uuid),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
