use std::collections::BTreeMap;

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use tracing::{info, warn};

use seedforge_core::ModelStructure;

use crate::ids::{hash_seed, object_id};
use crate::model::{GenerateOptions, GenerationReport, ModelReport};
use crate::resolver::ReferenceResolver;
use crate::values::{GenerationContext, GeneratorRegistry};

/// A generated record: field name to value, plus `_id` and audit timestamps.
pub type Record = serde_json::Map<String, Value>;

/// Per-model record sets produced by one generation run.
pub type Datasets = BTreeMap<String, Vec<Record>>;

/// Fields the engine stamps itself and never delegates to a strategy.
pub const RESERVED_FIELDS: &[&str] = &[
    "_id",
    "__v",
    "createdAt",
    "updatedAt",
    "deletedAt",
    "isDeleted",
];

/// Marker field set on records emitted for an empty structure.
pub const WARNING_FIELD: &str = "_warning";

/// Orchestrates record generation for a set of model structures.
pub struct GenerationEngine {
    options: GenerateOptions,
    registry: GeneratorRegistry,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            registry: GeneratorRegistry::new(),
        }
    }

    pub fn with_registry(options: GenerateOptions, registry: GeneratorRegistry) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate one record. Reference fields receive placeholder ids here;
    /// the resolver back-fills them once every model's pool exists.
    pub fn generate_record(
        &self,
        structure: &ModelStructure,
        index: usize,
        rng: &mut dyn RngCore,
    ) -> Record {
        let mut record = Record::new();

        if structure.is_empty() {
            record.insert(
                WARNING_FIELD.to_string(),
                Value::String("model structure has no fields".to_string()),
            );
        } else {
            let ctx = GenerationContext {
                index,
                realistic: self.options.realistic,
                model_name: &structure.name,
                structure,
                custom_values: &self.options.custom_values,
            };
            for field in &structure.fields {
                if RESERVED_FIELDS.contains(&field.name.as_str()) {
                    continue;
                }
                if let Some(custom) = self.options.custom_values.get(&field.name) {
                    record.insert(field.name.clone(), pick_custom(custom, rng));
                    continue;
                }
                // Sparse optional data: realistic mode omits ~20% of
                // non-required fields entirely.
                if self.options.realistic && !field.required && rng.random_bool(0.2) {
                    continue;
                }
                let value = self.registry.generate_value(field, &ctx, rng);
                record.insert(field.name.clone(), value);
            }
        }

        let now = Utc::now().to_rfc3339();
        record.insert("_id".to_string(), Value::String(object_id(rng)));
        record.insert("createdAt".to_string(), Value::String(now.clone()));
        record.insert("updatedAt".to_string(), Value::String(now));
        record
    }

    pub fn generate_records(
        &self,
        structure: &ModelStructure,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Record> {
        if structure.is_empty() {
            warn!(
                model = %structure.name,
                "empty structure, emitting stub records"
            );
        }
        (0..count)
            .map(|index| self.generate_record(structure, index, rng))
            .collect()
    }

    /// Generate every model in caller order, then run the reference pass
    /// over the full dataset map. Ordering referenced models first maximizes
    /// the chance their pools exist when the referencing model resolves, but
    /// is not required for correctness.
    pub async fn generate_all(
        &self,
        structures: &[ModelStructure],
        resolver: &mut ReferenceResolver,
    ) -> (Datasets, GenerationReport) {
        let mut datasets = Datasets::new();
        let mut report = GenerationReport {
            seed: self.options.seed,
            ..GenerationReport::default()
        };

        for structure in structures {
            let mut rng =
                ChaCha8Rng::seed_from_u64(hash_seed(self.options.seed, &structure.name));
            info!(
                model = %structure.name,
                records = self.options.count,
                realistic = self.options.realistic,
                "generating records"
            );
            let records = self.generate_records(structure, self.options.count, &mut rng);
            report.models.push(ModelReport {
                model: structure.name.clone(),
                records_requested: self.options.count,
                records_generated: records.len(),
                empty_structure: structure.is_empty(),
            });
            if structure.is_empty() {
                report
                    .warnings
                    .push(format!("{}: empty structure, stub records only", structure.name));
            }
            datasets.insert(structure.name.clone(), records);
        }

        let pools = record_pools(&datasets);
        for structure in structures {
            if structure.references.is_empty() {
                continue;
            }
            // Separate stream so the reference pass cannot disturb the
            // per-model value sequences.
            let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(
                self.options.seed.rotate_left(17),
                &structure.name,
            ));
            if let Some(records) = datasets.get_mut(&structure.name) {
                for record in records.iter_mut() {
                    resolver
                        .resolve_references(record, structure, &pools, &mut rng)
                        .await;
                }
            }
        }

        report.synthesized_references = resolver.synthesized_count();
        info!(
            models = report.models.len(),
            synthesized_refs = report.synthesized_references,
            "generation finished"
        );
        (datasets, report)
    }
}

/// Identifier pools per model (lowercased name), for the reference pass.
pub fn record_pools(datasets: &Datasets) -> BTreeMap<String, Vec<String>> {
    let mut pools = BTreeMap::new();
    for (model, records) in datasets {
        let ids: Vec<String> = records
            .iter()
            .filter_map(|record| record.get("_id"))
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        pools.insert(model.to_lowercase(), ids);
    }
    pools
}

fn pick_custom(custom: &Value, rng: &mut dyn RngCore) -> Value {
    match custom {
        Value::Array(candidates) if !candidates.is_empty() => candidates
            .choose(rng)
            .cloned()
            .unwrap_or(Value::Null),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedforge_core::{FieldDefinition, FieldKind};

    fn engine(realistic: bool) -> GenerationEngine {
        GenerationEngine::new(GenerateOptions {
            count: 5,
            realistic,
            seed: 99,
            custom_values: BTreeMap::new(),
        })
    }

    #[test]
    fn empty_structure_yields_warning_stub() {
        let structure = ModelStructure::empty("Ghost");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let record = engine(true).generate_record(&structure, 0, &mut rng);

        assert!(record.contains_key(WARNING_FIELD));
        assert!(record.contains_key("_id"));
        assert!(record.contains_key("createdAt"));
        assert!(record.contains_key("updatedAt"));
    }

    #[test]
    fn reserved_fields_are_never_delegated() {
        let mut structure = ModelStructure::empty("Audit");
        structure.fields = vec![
            FieldDefinition::new("createdAt", FieldKind::Date),
            FieldDefinition::new("label", FieldKind::String).required(),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let record = engine(false).generate_record(&structure, 0, &mut rng);

        // createdAt comes from the engine stamp, label from the strategy.
        assert_eq!(record["label"], Value::String("label_1".to_string()));
        assert!(record.contains_key("createdAt"));
    }

    #[test]
    fn custom_overrides_beat_every_strategy() {
        let mut structure = ModelStructure::empty("Doc");
        structure.fields = vec![FieldDefinition::new("status", FieldKind::String).required()];
        let mut custom = BTreeMap::new();
        custom.insert("status".to_string(), Value::String("frozen".to_string()));

        let engine = GenerationEngine::new(GenerateOptions {
            count: 1,
            realistic: true,
            seed: 1,
            custom_values: custom,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let record = engine.generate_record(&structure, 0, &mut rng);
        assert_eq!(record["status"], Value::String("frozen".to_string()));
    }

    #[test]
    fn custom_list_overrides_pick_one_candidate() {
        let mut structure = ModelStructure::empty("Doc");
        structure.fields = vec![FieldDefinition::new("tier", FieldKind::String).required()];
        let mut custom = BTreeMap::new();
        custom.insert(
            "tier".to_string(),
            serde_json::json!(["bronze", "silver", "gold"]),
        );

        let engine = GenerationEngine::new(GenerateOptions {
            count: 1,
            realistic: true,
            seed: 1,
            custom_values: custom,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for index in 0..20 {
            let record = engine.generate_record(&structure, index, &mut rng);
            let tier = record["tier"].as_str().expect("string");
            assert!(["bronze", "silver", "gold"].contains(&tier));
        }
    }

    #[test]
    fn plain_mode_never_omits_declared_fields() {
        let mut structure = ModelStructure::empty("Doc");
        structure.fields = vec![
            FieldDefinition::new("title", FieldKind::String).required(),
            FieldDefinition::new("subtitle", FieldKind::String),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for index in 0..50 {
            let record = engine(false).generate_record(&structure, index, &mut rng);
            assert!(record.contains_key("title"));
            assert!(record.contains_key("subtitle"));
        }
    }

    #[test]
    fn required_fields_survive_realistic_omission() {
        let mut structure = ModelStructure::empty("Doc");
        structure.fields = vec![FieldDefinition::new("title", FieldKind::String).required()];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for index in 0..200 {
            let record = engine(true).generate_record(&structure, index, &mut rng);
            assert!(record.contains_key("title"), "run {index} dropped title");
        }
    }
}
