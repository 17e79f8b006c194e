//! Per-kind value strategies and their registry.
//!
//! Selection is capability-based: every registered strategy is asked whether
//! it can generate the field, the highest-priority match wins (registration
//! order breaks ties), and a field no strategy claims gets a deterministic
//! placeholder so a batch never aborts.

use std::collections::BTreeMap;

use rand::RngCore;
use serde_json::Value;

use seedforge_core::{FieldDefinition, FieldKind, ModelStructure};

pub mod composites;
pub mod dates;
pub mod numbers;
pub mod strings;

/// Ephemeral per-record, per-field context; rebuilt for every field.
pub struct GenerationContext<'a> {
    pub index: usize,
    pub realistic: bool,
    pub model_name: &'a str,
    pub structure: &'a ModelStructure,
    pub custom_values: &'a BTreeMap<String, Value>,
}

/// A value strategy for one field kind or field semantics.
pub trait ValueStrategy: Send + Sync {
    fn id(&self) -> &'static str;

    /// Higher wins among applicable strategies.
    fn priority(&self) -> i32 {
        10
    }

    fn can_generate(&self, field: &FieldDefinition, ctx: &GenerationContext<'_>) -> bool;

    fn generate(
        &self,
        field: &FieldDefinition,
        ctx: &GenerationContext<'_>,
        registry: &GeneratorRegistry,
        rng: &mut dyn RngCore,
    ) -> Value;
}

/// Registry of value strategies with priority-based selection.
pub struct GeneratorRegistry {
    strategies: Vec<Box<dyn ValueStrategy>>,
}

impl GeneratorRegistry {
    /// Registry with the full default strategy set.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_strategy(Box::new(composites::EnumStrategy));
        registry.register_strategy(Box::new(composites::ObjectIdStrategy));
        registry.register_strategy(Box::new(strings::StringStrategy));
        registry.register_strategy(Box::new(numbers::NumberStrategy));
        registry.register_strategy(Box::new(composites::BooleanStrategy));
        registry.register_strategy(Box::new(dates::DateStrategy));
        registry.register_strategy(Box::new(composites::ArrayStrategy));
        registry.register_strategy(Box::new(composites::ObjectStrategy));
        registry
    }

    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn register_strategy(&mut self, strategy: Box<dyn ValueStrategy>) {
        self.strategies.push(strategy);
    }

    /// Generate a value for the field, or a `"<field>_<index+1>"` placeholder
    /// when no strategy applies.
    pub fn generate_value(
        &self,
        field: &FieldDefinition,
        ctx: &GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Value {
        let mut best: Option<&dyn ValueStrategy> = None;
        for strategy in &self.strategies {
            if !strategy.can_generate(field, ctx) {
                continue;
            }
            match best {
                Some(current) if strategy.priority() <= current.priority() => {}
                _ => best = Some(strategy.as_ref()),
            }
        }
        match best {
            Some(strategy) => strategy.generate(field, ctx, self, rng),
            None => placeholder(field, ctx),
        }
    }

    /// Generate an element value of a given kind; used by the array strategy
    /// to recurse into its declared item kind.
    pub fn generate_element(
        &self,
        parent: &FieldDefinition,
        kind: FieldKind,
        ctx: &GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Value {
        let mut element = FieldDefinition::new(parent.name.clone(), kind);
        element.required = true;
        element.is_enum = parent.is_enum;
        element.enum_values = parent.enum_values.clone();
        self.generate_value(&element, ctx, rng)
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn placeholder(field: &FieldDefinition, ctx: &GenerationContext<'_>) -> Value {
    Value::String(format!("{}_{}", field.name, ctx.index + 1))
}
