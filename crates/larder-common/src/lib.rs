//! Shared building blocks for the larder pipelines: the common error type,
//! the allowlisted HTTP client, and text normalisation.

pub mod error;
pub mod normalise;
pub mod sandbox;

pub use error::{LarderError, Result};
