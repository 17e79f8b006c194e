use thiserror::Error;

/// Core error type shared across Seedforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A model structure violates internal invariants.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    /// Nothing useful can be done with the given configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A requested feature is not yet supported.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by Seedforge crates.
pub type Result<T> = std::result::Result<T, Error>;
