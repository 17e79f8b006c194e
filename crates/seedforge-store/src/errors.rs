use thiserror::Error;

/// Errors emitted by the storage layer.
///
/// Batch-level insert failures are not errors: they are logged with counts
/// and the run continues. Only configuration-class problems abort.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("adapter error: {0}")]
    Adapter(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
