use thiserror::Error;

/// Errors emitted by the generation engine.
///
/// Parse misses and resolution misses never surface here; they degrade into
/// warnings and placeholder values. This type covers I/O around the real-id
/// source and genuinely invalid input.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    #[error("id source error: {0}")]
    IdSource(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
