use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use seedforge_core::{Error, ModelStructure, Result};

use crate::strategy::StrategyRegistry;

/// Options that control model-file discovery.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Root directory holding the schema source files.
    pub models_dir: PathBuf,
    /// File-stem suffixes trusted without inspecting content.
    pub trusted_suffixes: Vec<String>,
}

impl ScanOptions {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            trusted_suffixes: vec![".schema".to_string(), ".model".to_string()],
        }
    }
}

/// A discovered model source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub name: String,
    pub path: PathBuf,
}

/// A discovered model together with its analyzed structure.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub entry: ModelEntry,
    pub structure: ModelStructure,
}

/// Lists candidate entity files on disk and runs them through the analysis
/// registry. Owns its registry so callers can swap in extra strategies.
pub struct ModelScanner {
    options: ScanOptions,
    registry: StrategyRegistry,
}

impl ModelScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            registry: StrategyRegistry::default(),
        }
    }

    pub fn with_registry(options: ScanOptions, registry: StrategyRegistry) -> Self {
        Self { options, registry }
    }

    /// Enumerate entities with a matching schema-source file on disk.
    ///
    /// A missing models directory is a configuration error: no useful work
    /// can proceed without it.
    pub fn list_available_models(&self) -> Result<Vec<ModelEntry>> {
        if !self.options.models_dir.is_dir() {
            return Err(Error::Configuration(format!(
                "models directory not found: {}",
                self.options.models_dir.display()
            )));
        }

        let mut entries = Vec::new();
        self.walk(&self.options.models_dir, &mut entries)?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries.dedup_by(|a, b| a.name == b.name);
        debug!(
            dir = %self.options.models_dir.display(),
            models = entries.len(),
            "model scan finished"
        );
        Ok(entries)
    }

    /// Analyze one named model; unknown names are configuration errors.
    pub fn get_model_info(&self, name: &str) -> Result<ModelInfo> {
        let wanted = name.to_lowercase();
        let entry = self
            .list_available_models()?
            .into_iter()
            .find(|entry| entry.name.to_lowercase() == wanted)
            .ok_or_else(|| Error::Configuration(format!("model not found: {name}")))?;
        let structure = self.analyze_entry(&entry)?;
        Ok(ModelInfo { entry, structure })
    }

    /// Analyze every discovered model, in name order.
    pub fn analyze_all(&self) -> Result<Vec<ModelStructure>> {
        let entries = self.list_available_models()?;
        if entries.is_empty() {
            return Err(Error::Configuration(format!(
                "no models found under {}",
                self.options.models_dir.display()
            )));
        }
        let mut structures = Vec::with_capacity(entries.len());
        for entry in &entries {
            structures.push(self.analyze_entry(entry)?);
        }
        Ok(structures)
    }

    fn analyze_entry(&self, entry: &ModelEntry) -> Result<ModelStructure> {
        let source = fs::read_to_string(&entry.path).map_err(|err| {
            Error::Configuration(format!(
                "cannot read {}: {err}",
                entry.path.display()
            ))
        })?;
        let structure = self.registry.analyze_model(&entry.name, &source);
        if structure.is_empty() {
            warn!(
                model = %entry.name,
                path = %entry.path.display(),
                "analysis produced no fields"
            );
        }
        Ok(structure)
    }

    fn walk(&self, dir: &Path, out: &mut Vec<ModelEntry>) -> Result<()> {
        let read = fs::read_dir(dir).map_err(|err| {
            Error::Configuration(format!("cannot list {}: {err}", dir.display()))
        })?;
        for entry in read.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.walk(&path, out)?;
            } else if let Some(name) = self.model_name_for(&path) {
                out.push(ModelEntry { name, path });
            }
        }
        Ok(())
    }

    /// Derive the entity name from the file stem, or reject the file.
    ///
    /// `user.schema.ts` and `post.model.ts` stems are trusted; any other
    /// `.ts`/`.js` file counts only when its text carries a schema marker,
    /// so helper files do not become phantom models.
    fn model_name_for(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?;
        if !matches!(ext, "ts" | "js") {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let (base, trusted) = match self
            .options
            .trusted_suffixes
            .iter()
            .find_map(|suffix| stem.strip_suffix(suffix.as_str()))
        {
            Some(base) => (base, true),
            None => (stem, false),
        };
        if base.is_empty() {
            return None;
        }
        if !trusted {
            let text = fs::read_to_string(path).ok()?;
            if !looks_like_schema(&text) {
                return None;
            }
        }
        Some(to_pascal_case(base))
    }
}

fn looks_like_schema(text: &str) -> bool {
    text.contains("new Schema(")
        || text.contains("mongoose.Schema")
        || text.contains("Joi.object(")
}

fn to_pascal_case(raw: &str) -> String {
    raw.split(['-', '_', '.'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
