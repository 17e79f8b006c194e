use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Records to generate per model.
    pub count: usize,
    /// Semantic, name-driven values; `false` pins deterministic placeholders.
    pub realistic: bool,
    /// Run seed; every model re-seeds from a hash of this and its name.
    pub seed: u64,
    /// Caller-supplied overrides keyed by field name. A list value means
    /// "pick one of these at random", a scalar is used verbatim.
    pub custom_values: BTreeMap<String, Value>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            count: 10,
            realistic: true,
            seed: 42,
            custom_values: BTreeMap::new(),
        }
    }
}

/// Summary of one generated model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    pub model: String,
    pub records_requested: usize,
    pub records_generated: usize,
    /// Model had an empty structure; records are id-and-timestamps stubs.
    pub empty_structure: bool,
}

/// Report for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub models: Vec<ModelReport>,
    /// References that had to fall back to a freshly synthesized identifier.
    pub synthesized_references: u64,
    pub warnings: Vec<String>,
}
