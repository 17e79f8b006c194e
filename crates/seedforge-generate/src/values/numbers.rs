//! Name-keyed numeric generation.

use rand::{Rng, RngCore};
use serde_json::Value;

use seedforge_core::{FieldDefinition, FieldKind};

use crate::values::{GenerationContext, GeneratorRegistry, ValueStrategy};

type NumberGen = fn(usize, &mut dyn RngCore) -> Value;

struct NumericCategory {
    keywords: &'static [&'static str],
    generate: NumberGen,
}

static CATEGORIES: &[NumericCategory] = &[
    NumericCategory { keywords: &["age"], generate: gen_age },
    NumericCategory { keywords: &["year"], generate: gen_year },
    NumericCategory { keywords: &["price", "cost", "amount", "total"], generate: gen_price },
    // "discount" contains "count", so it must sit above the count row.
    NumericCategory { keywords: &["discount", "percent"], generate: gen_percentage },
    NumericCategory { keywords: &["quantity", "count"], generate: gen_quantity },
    NumericCategory { keywords: &["rating"], generate: gen_rating },
    NumericCategory { keywords: &["version", "revision"], generate: gen_version },
    // Ordering fields use the record index verbatim so sequences stay monotonic.
    NumericCategory { keywords: &["order", "position", "index", "rank"], generate: gen_ordinal },
    NumericCategory { keywords: &["duration"], generate: gen_duration },
    NumericCategory { keywords: &["score"], generate: gen_score },
    NumericCategory { keywords: &["height"], generate: gen_height },
    NumericCategory { keywords: &["width"], generate: gen_width },
    NumericCategory { keywords: &["weight"], generate: gen_weight },
    NumericCategory { keywords: &["stock", "inventory"], generate: gen_stock },
];

pub struct NumberStrategy;

impl ValueStrategy for NumberStrategy {
    fn id(&self) -> &'static str {
        "value.number"
    }

    fn can_generate(&self, field: &FieldDefinition, _ctx: &GenerationContext<'_>) -> bool {
        field.kind == FieldKind::Number && !field.is_array
    }

    fn generate(
        &self,
        field: &FieldDefinition,
        ctx: &GenerationContext<'_>,
        _registry: &GeneratorRegistry,
        rng: &mut dyn RngCore,
    ) -> Value {
        if !ctx.realistic {
            return Value::from(ctx.index as i64 + 1);
        }

        let lower = field.name.to_lowercase();
        for category in CATEGORIES {
            if category.keywords.iter().any(|kw| lower.contains(kw)) {
                return (category.generate)(ctx.index, rng);
            }
        }
        Value::from(rng.random_range(1..=1000_i64))
    }
}

fn gen_age(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(18..=90_i64))
}

fn gen_year(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(2000..=2030_i64))
}

fn gen_price(_index: usize, rng: &mut dyn RngCore) -> Value {
    let cents: i64 = rng.random_range(100..=999_999);
    Value::from(cents as f64 / 100.0)
}

fn gen_quantity(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(1..=100_i64))
}

fn gen_rating(_index: usize, rng: &mut dyn RngCore) -> Value {
    let tenths: i64 = rng.random_range(0..=50);
    Value::from(tenths as f64 / 10.0)
}

fn gen_version(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(1..=20_i64))
}

fn gen_ordinal(index: usize, _rng: &mut dyn RngCore) -> Value {
    Value::from(index as i64)
}

fn gen_duration(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(1..=7200_i64))
}

fn gen_score(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(0..=100_i64))
}

fn gen_height(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(100..=2000_i64))
}

fn gen_width(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(100..=2000_i64))
}

fn gen_weight(_index: usize, rng: &mut dyn RngCore) -> Value {
    let grams: i64 = rng.random_range(100..=50_000);
    Value::from(grams as f64 / 1000.0)
}

fn gen_percentage(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(0..=100_i64))
}

fn gen_stock(_index: usize, rng: &mut dyn RngCore) -> Value {
    Value::from(rng.random_range(0..=500_i64))
}
