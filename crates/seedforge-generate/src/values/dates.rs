//! Name-keyed date generation. Values are emitted as RFC 3339 strings.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, RngCore};
use serde_json::Value;

use seedforge_core::{FieldDefinition, FieldKind};

use crate::values::{GenerationContext, GeneratorRegistry, ValueStrategy};

type DateGen = fn(DateTime<Utc>, &mut dyn RngCore) -> DateTime<Utc>;

struct DateCategory {
    keywords: &'static [&'static str],
    generate: DateGen,
}

static CATEGORIES: &[DateCategory] = &[
    DateCategory { keywords: &["birth", "dob"], generate: gen_birthdate },
    DateCategory { keywords: &["expir"], generate: gen_expiry },
    DateCategory { keywords: &["future", "next"], generate: gen_near_future },
    DateCategory { keywords: &["past", "prev"], generate: gen_near_past },
    DateCategory { keywords: &["created"], generate: gen_created },
    DateCategory { keywords: &["updated", "modified"], generate: gen_updated },
    DateCategory { keywords: &["published"], generate: gen_published },
    DateCategory { keywords: &["start", "begin"], generate: gen_start },
    DateCategory { keywords: &["end", "finish", "due"], generate: gen_end },
];

pub struct DateStrategy;

impl ValueStrategy for DateStrategy {
    fn id(&self) -> &'static str {
        "value.date"
    }

    fn can_generate(&self, field: &FieldDefinition, _ctx: &GenerationContext<'_>) -> bool {
        field.kind == FieldKind::Date && !field.is_array
    }

    fn generate(
        &self,
        field: &FieldDefinition,
        ctx: &GenerationContext<'_>,
        _registry: &GeneratorRegistry,
        rng: &mut dyn RngCore,
    ) -> Value {
        let now = Utc::now();
        if !ctx.realistic {
            return Value::String(now.to_rfc3339());
        }

        let lower = field.name.to_lowercase();
        for category in CATEGORIES {
            if category.keywords.iter().any(|kw| lower.contains(kw)) {
                return Value::String((category.generate)(now, rng).to_rfc3339());
            }
        }
        // Unmatched: uniform over the last two years.
        let offset = rng.random_range(0..=730_i64);
        Value::String((now - Duration::days(offset)).to_rfc3339())
    }
}

fn gen_birthdate(now: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    let days: i64 = rng.random_range(18 * 365..=65 * 365);
    now - Duration::days(days)
}

fn gen_expiry(now: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    now + Duration::days(rng.random_range(365..=3 * 365_i64))
}

fn gen_near_future(now: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    now + Duration::days(rng.random_range(1..=90_i64))
}

fn gen_near_past(now: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    now - Duration::days(rng.random_range(1..=90_i64))
}

fn gen_created(now: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    now - Duration::days(rng.random_range(0..=365_i64))
}

fn gen_updated(now: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    now - Duration::days(rng.random_range(0..=30_i64))
}

fn gen_published(now: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    now - Duration::days(rng.random_range(0..=180_i64))
}

fn gen_start(now: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    now + Duration::days(rng.random_range(0..=30_i64))
}

fn gen_end(now: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    // Offset past the `start` window so end dates land after start dates.
    now + Duration::days(rng.random_range(31..=90_i64))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use seedforge_core::ModelStructure;

    fn run(field_name: &str) -> DateTime<Utc> {
        let structure = ModelStructure::empty("Sample");
        let custom = BTreeMap::new();
        let ctx = GenerationContext {
            index: 0,
            realistic: true,
            model_name: "Sample",
            structure: &structure,
            custom_values: &custom,
        };
        let field = FieldDefinition::new(field_name, FieldKind::Date);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let registry = GeneratorRegistry::empty();
        let value = DateStrategy.generate(&field, &ctx, &registry, &mut rng);
        DateTime::parse_from_rfc3339(value.as_str().expect("string"))
            .expect("valid rfc3339")
            .with_timezone(&Utc)
    }

    #[test]
    fn birthdates_are_in_the_adult_past() {
        let date = run("birthDate");
        let years = (Utc::now() - date).num_days() / 365;
        assert!((17..=66).contains(&years), "{years} years ago");
    }

    #[test]
    fn expiry_is_well_into_the_future() {
        let date = run("expiresAt");
        assert!(date > Utc::now() + Duration::days(300));
    }

    #[test]
    fn end_dates_land_after_start_dates() {
        let start = run("startDate");
        let end = run("endDate");
        assert!(end > start);
    }
}
