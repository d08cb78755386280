//! Document store error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocStoreError>;

#[derive(Debug, Error)]
pub enum DocStoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("Document not found: {0}")]
    NotFound(String),
}
