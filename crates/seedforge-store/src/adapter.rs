use async_trait::async_trait;

use seedforge_core::ModelStructure;
use seedforge_generate::Record;

use crate::errors::StorageError;

/// Outcome of one unordered batch insert. A batch with failures is still a
/// successful call; the caller logs the counts and moves on.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertOutcome {
    pub inserted: usize,
    pub failed: usize,
}

/// Trait implemented by live persistence-layer adapters.
///
/// The connection is process-shared state: `connect` reuses an existing
/// session when one is open, and callers only disconnect what they opened.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    fn is_connected(&self) -> bool;

    async fn connect(&mut self) -> Result<(), StorageError>;

    async fn disconnect(&mut self) -> Result<(), StorageError>;

    /// Entity types registered with the application schema layer.
    async fn registered_models(&self) -> Result<Vec<String>, StorageError>;

    /// Identifier projection over a collection, capped at `limit`.
    async fn collection_ids(&self, model: &str, limit: usize)
    -> Result<Vec<String>, StorageError>;

    /// Register a dynamically inferred structure for an unmatched entity.
    async fn register_inferred_model(
        &mut self,
        structure: &ModelStructure,
    ) -> Result<(), StorageError>;

    /// Insert records in unordered mode: one invalid record must not abort
    /// the remainder of the batch.
    async fn insert_batch(
        &mut self,
        model: &str,
        records: &[Record],
    ) -> Result<InsertOutcome, StorageError>;
}
