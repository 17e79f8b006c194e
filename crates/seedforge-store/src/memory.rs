use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use seedforge_core::ModelStructure;
use seedforge_generate::{GenerationError, RealIdSource, Record};

use crate::adapter::{InsertOutcome, StoreAdapter};
use crate::errors::StorageError;

/// In-memory store adapter used by tests and dry runs.
///
/// Collections are keyed by lowercased model name, matching the live
/// adapter's collection naming. Inserts reject duplicate `_id` values so
/// unordered-batch accounting behaves like a unique primary index.
#[derive(Debug, Default)]
pub struct InMemoryStoreAdapter {
    connected: bool,
    registered: BTreeMap<String, ModelStructure>,
    collections: BTreeMap<String, Vec<Record>>,
}

impl InMemoryStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register a model, as an application boot sequence would.
    pub fn with_model(mut self, structure: ModelStructure) -> Self {
        self.registered
            .insert(structure.name.clone(), structure);
        self
    }

    /// Pre-load a collection with existing records.
    pub fn with_collection(mut self, model: &str, records: Vec<Record>) -> Self {
        self.collections.insert(model.to_lowercase(), records);
        self
    }

    pub fn collection(&self, model: &str) -> &[Record] {
        self.collections
            .get(&model.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    // inherent so callers with the concrete type need no trait disambiguation
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn record_id(record: &Record) -> Option<&str> {
        match record.get("_id") {
            Some(Value::String(id)) => Some(id.as_str()),
            _ => None,
        }
    }
}

#[async_trait]
impl StoreAdapter for InMemoryStoreAdapter {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), StorageError> {
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), StorageError> {
        self.connected = false;
        Ok(())
    }

    async fn registered_models(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.registered.keys().cloned().collect())
    }

    async fn collection_ids(
        &self,
        model: &str,
        limit: usize,
    ) -> Result<Vec<String>, StorageError> {
        let ids = self
            .collection(model)
            .iter()
            .filter_map(Self::record_id)
            .take(limit)
            .map(str::to_string)
            .collect();
        Ok(ids)
    }

    async fn register_inferred_model(
        &mut self,
        structure: &ModelStructure,
    ) -> Result<(), StorageError> {
        debug!(model = %structure.name, fields = structure.fields.len(), "registering inferred model");
        self.registered
            .insert(structure.name.clone(), structure.clone());
        Ok(())
    }

    async fn insert_batch(
        &mut self,
        model: &str,
        records: &[Record],
    ) -> Result<InsertOutcome, StorageError> {
        if !self.connected {
            return Err(StorageError::Adapter(
                "insert attempted without an open connection".to_string(),
            ));
        }
        let collection = self.collections.entry(model.to_lowercase()).or_default();
        let mut outcome = InsertOutcome::default();
        for record in records {
            let duplicate = match Self::record_id(record) {
                Some(id) => collection
                    .iter()
                    .any(|existing| Self::record_id(existing) == Some(id)),
                None => false,
            };
            if duplicate {
                outcome.failed += 1;
            } else {
                collection.push(record.clone());
                outcome.inserted += 1;
            }
        }
        Ok(outcome)
    }
}

#[async_trait]
impl RealIdSource for InMemoryStoreAdapter {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn fetch_ids(&self, model: &str, limit: usize) -> Result<Vec<String>, GenerationError> {
        let ids = self
            .collection(model)
            .iter()
            .filter_map(Self::record_id)
            .take(limit)
            .map(str::to_string)
            .collect();
        Ok(ids)
    }
}
