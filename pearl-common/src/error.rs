//! Common error types for the Pearl tag comparison

use thiserror::Error;

/// Common result type for tagging and comparison operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds shared by the pipeline, the tagging client and the web layer
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed token or request data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every poem produced zero tokens, nothing to compare
    #[error("Empty corpus: no tokens to compare")]
    EmptyCorpus,

    /// Tagging service failure (network, auth, rate limit, API status)
    #[error("External service error: {0}")]
    ExternalService(String),
}
