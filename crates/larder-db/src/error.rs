//! Database error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// Store unreachable at startup. Fatal: nothing is processed without it.
    #[error("Failed to connect to relational store: {0}")]
    Connect(tokio_postgres::Error),

    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Row not found: {0}")]
    NotFound(String),
}
