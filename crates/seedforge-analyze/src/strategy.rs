use tracing::warn;

use seedforge_core::{ModelStructure, Result};

use crate::mongoose::MongooseTextStrategy;

/// Capability interface implemented by schema-text analysis strategies.
///
/// Strategies are consulted in registration order; the first one whose
/// `can_analyze` accepts the source text is asked to produce a structure.
pub trait AnalysisStrategy: Send + Sync {
    fn id(&self) -> &'static str;

    /// Cheap marker check; must not allocate per call beyond scanning.
    fn can_analyze(&self, model_name: &str, source: &str) -> bool;

    /// Extract a structure from the source text. Returning an error is
    /// treated by the registry as "this strategy produced nothing".
    fn analyze(&self, model_name: &str, source: &str) -> Result<ModelStructure>;
}

/// Ordered collection of analysis strategies with fallback semantics.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn AnalysisStrategy>>,
}

impl StrategyRegistry {
    /// Registry with no strategies; callers register their own.
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn register(&mut self, strategy: Box<dyn AnalysisStrategy>) {
        self.strategies.push(strategy);
    }

    /// Analyze schema source text into a model structure.
    ///
    /// Never fails: when no strategy matches, or every matching strategy
    /// errors out, an empty structure is returned and a warning logged.
    /// Callers must treat `fields.is_empty()` as valid-but-useless.
    pub fn analyze_model(&self, model_name: &str, source: &str) -> ModelStructure {
        for strategy in &self.strategies {
            if !strategy.can_analyze(model_name, source) {
                continue;
            }
            match strategy.analyze(model_name, source) {
                Ok(structure) => return structure,
                Err(err) => {
                    warn!(
                        model = %model_name,
                        strategy = strategy.id(),
                        error = %err,
                        "analysis strategy failed, trying next"
                    );
                }
            }
        }

        warn!(
            model = %model_name,
            "no analysis strategy matched, returning empty structure"
        );
        ModelStructure::empty(model_name)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(MongooseTextStrategy::new()));
        registry
    }
}
