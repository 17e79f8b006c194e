//! Cross-model reference resolution.
//!
//! Runs as a follow-up pass once every model's identifier pool exists.
//! Resolution never fails: an unreachable real-id source or an empty pool
//! degrades to a freshly synthesized identifier, which is a soft-integrity
//! relaxation by design of the seeding workflow, not an error.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use serde_json::Value;
use tracing::{debug, warn};

use seedforge_core::ModelStructure;

use crate::engine::Record;
use crate::errors::GenerationError;
use crate::ids::object_id;

/// Source of already-persisted identifiers for anchor models.
///
/// Implemented by the live store adapter; tests use in-memory fakes.
#[async_trait]
pub trait RealIdSource: Send + Sync {
    fn is_connected(&self) -> bool;

    async fn fetch_ids(&self, model: &str, limit: usize) -> Result<Vec<String>, GenerationError>;
}

/// Options owned by the resolver instance (constructor-injected, no
/// module-level globals, so concurrent resolvers stay independent).
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Models expected to already be persisted; real ids are preferred.
    pub anchor_models: Vec<String>,
    /// How many real ids to cache per anchor model.
    pub real_id_limit: usize,
    /// Maximum cardinality of an array reference.
    pub max_array_refs: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            anchor_models: vec!["User".to_string(), "Users".to_string()],
            real_id_limit: 10,
            max_array_refs: 3,
        }
    }
}

/// Resolves single and array-valued reference fields in place.
pub struct ReferenceResolver {
    options: ResolverOptions,
    source: Option<Box<dyn RealIdSource>>,
    real_ids: HashMap<String, Vec<String>>,
    warned_models: HashSet<String>,
    synthesized: u64,
}

impl ReferenceResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            source: None,
            real_ids: HashMap::new(),
            warned_models: HashSet::new(),
            synthesized: 0,
        }
    }

    pub fn with_source(options: ResolverOptions, source: Box<dyn RealIdSource>) -> Self {
        let mut resolver = Self::new(options);
        resolver.source = Some(source);
        resolver
    }

    /// References that fell back to a synthesized identifier so far.
    pub fn synthesized_count(&self) -> u64 {
        self.synthesized
    }

    /// Resolve every reference entry of `structure` on `record`, sampling
    /// from `pools` (model name, lowercased, to generated identifiers).
    pub async fn resolve_references(
        &mut self,
        record: &mut Record,
        structure: &ModelStructure,
        pools: &BTreeMap<String, Vec<String>>,
        rng: &mut dyn RngCore,
    ) {
        for reference in &structure.references {
            let pool = self.pool_for(&reference.model, pools).await;
            let value = if reference.is_array {
                self.resolve_array(&reference.model, &pool, rng)
            } else {
                self.resolve_single(&reference.model, &pool, rng)
            };
            record.insert(reference.field.clone(), value);
        }
    }

    /// Identifier pool for a model: cached real ids for anchors when the
    /// source is reachable, otherwise the in-memory generated pool.
    async fn pool_for(
        &mut self,
        model: &str,
        pools: &BTreeMap<String, Vec<String>>,
    ) -> Vec<String> {
        if self.is_anchor(model) {
            let real = self.cached_real_ids(model).await;
            if !real.is_empty() {
                return real;
            }
        }
        pools.get(&model.to_lowercase()).cloned().unwrap_or_default()
    }

    fn is_anchor(&self, model: &str) -> bool {
        self.options
            .anchor_models
            .iter()
            .any(|anchor| anchor.eq_ignore_ascii_case(model))
    }

    /// Lazily fetch and cache real ids, once per model per resolver
    /// instance. An unconnected source leaves the cache empty so resolution
    /// falls through to the generated pools.
    async fn cached_real_ids(&mut self, model: &str) -> Vec<String> {
        let key = model.to_lowercase();
        if let Some(ids) = self.real_ids.get(&key) {
            return ids.clone();
        }
        let ids = match &self.source {
            Some(source) if source.is_connected() => {
                match source.fetch_ids(model, self.options.real_id_limit).await {
                    Ok(ids) => ids,
                    Err(err) => {
                        warn!(model = %model, error = %err, "real-id fetch failed");
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };
        debug!(model = %model, ids = ids.len(), "anchor id cache primed");
        self.real_ids.insert(key, ids.clone());
        ids
    }

    fn resolve_single(&mut self, model: &str, pool: &[String], rng: &mut dyn RngCore) -> Value {
        match pool.choose(rng) {
            Some(id) => Value::String(id.clone()),
            None => Value::String(self.synthesize(model, rng)),
        }
    }

    /// Distinct identifiers, cardinality in `[0, min(max, pool size)]`.
    /// Rejection sampling is capped at the pool size per slot; exhaustion
    /// stops early with fewer references rather than looping.
    fn resolve_array(&mut self, model: &str, pool: &[String], rng: &mut dyn RngCore) -> Value {
        if pool.is_empty() {
            // Keep both "no relations" and "orphan relation" cases exercised.
            return if rng.random_bool(0.5) {
                Value::Array(Vec::new())
            } else {
                Value::Array(vec![Value::String(self.synthesize(model, rng))])
            };
        }

        let upper = self.options.max_array_refs.min(pool.len());
        let wanted = rng.random_range(0..=upper);
        let mut chosen_indices = HashSet::new();
        let mut out = Vec::with_capacity(wanted);

        'slots: for _ in 0..wanted {
            let mut attempts = 0;
            loop {
                let idx = rng.random_range(0..pool.len());
                if chosen_indices.insert(idx) {
                    out.push(Value::String(pool[idx].clone()));
                    break;
                }
                attempts += 1;
                if attempts >= pool.len() {
                    break 'slots;
                }
            }
        }
        Value::Array(out)
    }

    fn synthesize(&mut self, model: &str, rng: &mut dyn RngCore) -> String {
        self.synthesized += 1;
        if self.warned_models.insert(model.to_string()) {
            warn!(
                model = %model,
                "no identifier pool available, synthesizing dangling references"
            );
        }
        object_id(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use seedforge_core::{FieldDefinition, FieldKind};

    use crate::ids::is_object_id;

    struct FixedSource {
        connected: bool,
        ids: Vec<String>,
    }

    #[async_trait]
    impl RealIdSource for FixedSource {
        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn fetch_ids(
            &self,
            _model: &str,
            limit: usize,
        ) -> Result<Vec<String>, GenerationError> {
            Ok(self.ids.iter().take(limit).cloned().collect())
        }
    }

    fn post_structure() -> ModelStructure {
        let mut structure = ModelStructure::empty("Post");
        structure.fields = vec![
            FieldDefinition::new("author", FieldKind::ObjectId).reference_to("User"),
            {
                let mut likes = FieldDefinition::new("likes", FieldKind::Array)
                    .array_of(FieldKind::ObjectId);
                likes.kind = FieldKind::Array;
                likes.is_reference = true;
                likes.ref_model = Some("User".to_string());
                likes
            },
        ];
        structure.rebuild_references();
        structure
    }

    #[tokio::test]
    async fn array_references_are_distinct_and_bounded() {
        let structure = post_structure();
        let mut pools = BTreeMap::new();
        pools.insert(
            "user".to_string(),
            (0..8).map(|i| format!("{i:024x}")).collect::<Vec<_>>(),
        );

        let mut resolver = ReferenceResolver::new(ResolverOptions::default());
        let mut rng = ChaCha8Rng::seed_from_u64(77);

        for _ in 0..100 {
            let mut record = Record::new();
            resolver
                .resolve_references(&mut record, &structure, &pools, &mut rng)
                .await;
            let likes = record["likes"].as_array().expect("array");
            assert!(likes.len() <= 3);
            let mut seen = HashSet::new();
            for id in likes {
                assert!(seen.insert(id.as_str().expect("string").to_string()));
            }
        }
    }

    #[tokio::test]
    async fn empty_pool_synthesizes_valid_identifiers() {
        let structure = post_structure();
        let pools = BTreeMap::new();
        let mut resolver = ReferenceResolver::new(ResolverOptions::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mut record = Record::new();
        resolver
            .resolve_references(&mut record, &structure, &pools, &mut rng)
            .await;

        let author = record["author"].as_str().expect("string");
        assert!(is_object_id(author));
        assert!(resolver.synthesized_count() >= 1);
    }

    #[tokio::test]
    async fn anchor_models_prefer_real_ids() {
        let structure = post_structure();
        let mut pools = BTreeMap::new();
        pools.insert("user".to_string(), vec!["f".repeat(24)]);

        let real = vec!["a".repeat(24), "b".repeat(24)];
        let source = FixedSource {
            connected: true,
            ids: real.clone(),
        };
        let mut resolver =
            ReferenceResolver::with_source(ResolverOptions::default(), Box::new(source));
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for _ in 0..20 {
            let mut record = Record::new();
            resolver
                .resolve_references(&mut record, &structure, &pools, &mut rng)
                .await;
            let author = record["author"].as_str().expect("string");
            assert!(real.iter().any(|id| id == author), "{author} not a real id");
        }
    }

    #[tokio::test]
    async fn disconnected_source_falls_through_to_generated_pool() {
        let structure = post_structure();
        let generated = vec!["c".repeat(24)];
        let mut pools = BTreeMap::new();
        pools.insert("user".to_string(), generated.clone());

        let source = FixedSource {
            connected: false,
            ids: vec!["a".repeat(24)],
        };
        let mut resolver =
            ReferenceResolver::with_source(ResolverOptions::default(), Box::new(source));
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut record = Record::new();
        resolver
            .resolve_references(&mut record, &structure, &pools, &mut rng)
            .await;
        assert_eq!(record["author"].as_str(), Some(generated[0].as_str()));
    }
}
