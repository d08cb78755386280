use thiserror::Error;

#[derive(Debug, Error)]
pub enum LarderError {
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    Http { status: u16, url: String },

    #[error("API quota exhausted: {0}")]
    Quota(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LarderError {
    /// Whether this error is a rate-limit rejection, as opposed to a
    /// general failure. Quota errors are the only retryable class.
    pub fn is_quota(&self) -> bool {
        matches!(self, LarderError::Quota(_))
    }
}

pub type Result<T> = std::result::Result<T, LarderError>;
