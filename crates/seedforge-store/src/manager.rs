use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use seedforge_generate::Datasets;

use crate::adapter::StoreAdapter;
use crate::errors::StorageError;
use crate::infer::infer_structure;
use crate::script::render_import_script;

/// Persistence target for a generated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty JSON document keyed by model name.
    Json,
    /// Executable `mongosh` import script.
    MongoImport,
    /// Direct inserts through a [`StoreAdapter`].
    Db,
}

impl FromStr for OutputFormat {
    type Err = StorageError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "mongo" | "mongoimport" | "mongo-import" => Ok(Self::MongoImport),
            "db" => Ok(Self::Db),
            other => Err(StorageError::Configuration(format!(
                "unknown output format '{other}' (expected json, mongo or db)"
            ))),
        }
    }
}

/// What a database save actually did, per model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbSaveReport {
    pub inserted_by_model: BTreeMap<String, usize>,
    pub failed_by_model: BTreeMap<String, usize>,
    /// Models that had no registered structure and were inferred on the fly.
    pub inferred_models: Vec<String>,
}

/// Routes datasets to files or a live store.
#[derive(Debug, Clone)]
pub struct StorageManager {
    batch_size: usize,
}

impl Default for StorageManager {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

impl StorageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn save_json(&self, datasets: &Datasets, path: &Path) -> Result<(), StorageError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), datasets)?;
        info!(path = %path.display(), models = datasets.len(), "wrote JSON dataset");
        Ok(())
    }

    /// Reloads a dataset previously written by [`save_json`].
    ///
    /// [`save_json`]: StorageManager::save_json
    pub fn load_json(&self, path: &Path) -> Result<Datasets, StorageError> {
        let file = File::open(path)?;
        let datasets = serde_json::from_reader(BufReader::new(file))?;
        Ok(datasets)
    }

    pub fn save_mongo_script(&self, datasets: &Datasets, path: &Path) -> Result<(), StorageError> {
        let script = render_import_script(datasets)?;
        std::fs::write(path, script)?;
        info!(path = %path.display(), models = datasets.len(), "wrote import script");
        Ok(())
    }

    /// Inserts every dataset through the adapter.
    ///
    /// Reuses an already-open connection and only closes what it opened.
    /// Models without a registered structure get a permissive one inferred
    /// from their first record. Batch failures are logged and skipped; only
    /// an empty schema registry aborts the save.
    pub async fn save_db(
        &self,
        adapter: &mut dyn StoreAdapter,
        datasets: &Datasets,
    ) -> Result<DbSaveReport, StorageError> {
        let opened_here = !adapter.is_connected();
        if opened_here {
            adapter.connect().await?;
        }

        let result = self.insert_datasets(adapter, datasets).await;

        if opened_here {
            adapter.disconnect().await?;
        }
        result
    }

    async fn insert_datasets(
        &self,
        adapter: &mut dyn StoreAdapter,
        datasets: &Datasets,
    ) -> Result<DbSaveReport, StorageError> {
        let registered = adapter.registered_models().await?;
        if registered.is_empty() {
            return Err(StorageError::Configuration(
                "no models registered with the store; nothing to insert into".to_string(),
            ));
        }

        let mut report = DbSaveReport::default();
        for (model, records) in datasets {
            let target = match registered
                .iter()
                .find(|name| name.eq_ignore_ascii_case(model))
            {
                Some(name) => name.clone(),
                None => {
                    let sample = records.first().cloned().unwrap_or_default();
                    let structure = infer_structure(model, &sample);
                    adapter.register_inferred_model(&structure).await?;
                    report.inferred_models.push(model.clone());
                    model.clone()
                }
            };

            let mut inserted = 0;
            let mut failed = 0;
            for batch in records.chunks(self.batch_size) {
                let outcome = adapter.insert_batch(&target, batch).await?;
                inserted += outcome.inserted;
                failed += outcome.failed;
            }
            if failed > 0 {
                warn!(model = %target, inserted, total = records.len(), "partial batch insert");
            } else {
                info!(model = %target, inserted, "inserted dataset");
            }
            report.inserted_by_model.insert(model.clone(), inserted);
            report.failed_by_model.insert(model.clone(), failed);
        }
        Ok(report)
    }

    /// Single entry point used by the CLI: file formats need a path, the
    /// database format needs an adapter.
    pub async fn save_data(
        &self,
        datasets: &Datasets,
        format: OutputFormat,
        path: Option<&Path>,
        adapter: Option<&mut dyn StoreAdapter>,
    ) -> Result<Option<DbSaveReport>, StorageError> {
        match format {
            OutputFormat::Json => {
                let path = path.ok_or_else(|| {
                    StorageError::Configuration("json output requires a path".to_string())
                })?;
                self.save_json(datasets, path)?;
                Ok(None)
            }
            OutputFormat::MongoImport => {
                let path = path.ok_or_else(|| {
                    StorageError::Configuration("mongo output requires a path".to_string())
                })?;
                self.save_mongo_script(datasets, path)?;
                Ok(None)
            }
            OutputFormat::Db => {
                let adapter = adapter.ok_or_else(|| {
                    StorageError::Configuration("db output requires a store adapter".to_string())
                })?;
                Ok(Some(self.save_db(adapter, datasets).await?))
            }
        }
    }
}
