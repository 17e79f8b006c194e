//! Boolean, enum, object-id, array, and nested-object strategies.

use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, StreetName, ZipCode};
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::Word;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use serde_json::{Map, Value, json};

use seedforge_core::{FieldDefinition, FieldKind};

use crate::ids::object_id;
use crate::values::{GenerationContext, GeneratorRegistry, ValueStrategy};

pub struct BooleanStrategy;

impl ValueStrategy for BooleanStrategy {
    fn id(&self) -> &'static str {
        "value.boolean"
    }

    fn can_generate(&self, field: &FieldDefinition, _ctx: &GenerationContext<'_>) -> bool {
        field.kind == FieldKind::Boolean && !field.is_array
    }

    fn generate(
        &self,
        _field: &FieldDefinition,
        _ctx: &GenerationContext<'_>,
        _registry: &GeneratorRegistry,
        rng: &mut dyn RngCore,
    ) -> Value {
        Value::Bool(rng.random_bool(0.5))
    }
}

/// Enum fields outrank the plain per-kind strategies so declared value sets
/// always win in realistic mode.
pub struct EnumStrategy;

impl ValueStrategy for EnumStrategy {
    fn id(&self) -> &'static str {
        "value.enum"
    }

    fn priority(&self) -> i32 {
        20
    }

    fn can_generate(&self, field: &FieldDefinition, ctx: &GenerationContext<'_>) -> bool {
        ctx.realistic
            && !field.is_array
            && field
                .enum_values
                .as_deref()
                .is_some_and(|values| !values.is_empty())
    }

    fn generate(
        &self,
        field: &FieldDefinition,
        _ctx: &GenerationContext<'_>,
        _registry: &GeneratorRegistry,
        rng: &mut dyn RngCore,
    ) -> Value {
        let picked = field
            .enum_values
            .as_deref()
            .and_then(|values| values.choose(rng))
            .cloned()
            .unwrap_or_default();
        Value::String(picked)
    }
}

/// Object-id fields get a structurally valid synthetic identifier. For
/// reference fields this is only a placeholder: the resolver back-fills the
/// real value in its follow-up pass.
pub struct ObjectIdStrategy;

impl ValueStrategy for ObjectIdStrategy {
    fn id(&self) -> &'static str {
        "value.object_id"
    }

    fn priority(&self) -> i32 {
        15
    }

    fn can_generate(&self, field: &FieldDefinition, _ctx: &GenerationContext<'_>) -> bool {
        field.kind == FieldKind::ObjectId && !field.is_array
    }

    fn generate(
        &self,
        _field: &FieldDefinition,
        _ctx: &GenerationContext<'_>,
        _registry: &GeneratorRegistry,
        rng: &mut dyn RngCore,
    ) -> Value {
        Value::String(object_id(rng))
    }
}

pub struct ArrayStrategy;

impl ValueStrategy for ArrayStrategy {
    fn id(&self) -> &'static str {
        "value.array"
    }

    fn can_generate(&self, field: &FieldDefinition, _ctx: &GenerationContext<'_>) -> bool {
        field.is_array || field.kind == FieldKind::Array
    }

    fn generate(
        &self,
        field: &FieldDefinition,
        ctx: &GenerationContext<'_>,
        registry: &GeneratorRegistry,
        rng: &mut dyn RngCore,
    ) -> Value {
        let len = if ctx.realistic {
            rng.random_range(0..=5_usize)
        } else {
            2
        };

        let item_kind = field.item_kind.filter(|kind| *kind != FieldKind::Array);
        let mut items = Vec::with_capacity(len);
        for slot in 0..len {
            let value = match item_kind {
                Some(kind) => registry.generate_element(field, kind, ctx, rng),
                None => Value::String(format!("{}_{}", field.name, slot + 1)),
            };
            items.push(value);
        }
        Value::Array(items)
    }
}

type ObjectGen = fn(&mut dyn RngCore) -> Value;

struct ObjectShape {
    keywords: &'static [&'static str],
    generate: ObjectGen,
}

static SHAPES: &[ObjectShape] = &[
    ObjectShape { keywords: &["metadata", "meta"], generate: gen_metadata },
    ObjectShape { keywords: &["address"], generate: gen_address },
    ObjectShape { keywords: &["config", "settings", "options"], generate: gen_config },
    ObjectShape { keywords: &["coordinates", "location", "geo"], generate: gen_coordinates },
    ObjectShape { keywords: &["social"], generate: gen_social },
];

pub struct ObjectStrategy;

impl ValueStrategy for ObjectStrategy {
    fn id(&self) -> &'static str {
        "value.object"
    }

    fn can_generate(&self, field: &FieldDefinition, _ctx: &GenerationContext<'_>) -> bool {
        field.kind == FieldKind::Object && !field.is_array
    }

    fn generate(
        &self,
        field: &FieldDefinition,
        _ctx: &GenerationContext<'_>,
        _registry: &GeneratorRegistry,
        rng: &mut dyn RngCore,
    ) -> Value {
        let lower = field.name.to_lowercase();
        for shape in SHAPES {
            if shape.keywords.iter().any(|kw| lower.contains(kw)) {
                return (shape.generate)(rng);
            }
        }

        // Generic object with 2-5 synthetic pairs.
        let pairs = rng.random_range(2..=5_usize);
        let mut map = Map::new();
        for idx in 0..pairs {
            let word: String = Word().fake_with_rng(rng);
            map.insert(format!("key_{}", idx + 1), Value::String(word));
        }
        Value::Object(map)
    }
}

fn gen_metadata(rng: &mut dyn RngCore) -> Value {
    json!({
        "source": "seed",
        "version": rng.random_range(1..=9_u32),
        "generated": true,
    })
}

fn gen_address(rng: &mut dyn RngCore) -> Value {
    let street: String = StreetName().fake_with_rng(rng);
    let city: String = CityName().fake_with_rng(rng);
    let country: String = CountryName().fake_with_rng(rng);
    let postal: String = ZipCode().fake_with_rng(rng);
    json!({
        "street": format!("{street}, {}", rng.random_range(1..=9999_u32)),
        "city": city,
        "country": country,
        "postalCode": postal,
    })
}

fn gen_config(rng: &mut dyn RngCore) -> Value {
    const MODES: &[&str] = &["default", "compact", "extended"];
    json!({
        "enabled": rng.random_bool(0.5),
        "level": rng.random_range(1..=5_u32),
        "mode": MODES.choose(rng).copied().unwrap_or("default"),
    })
}

fn gen_coordinates(rng: &mut dyn RngCore) -> Value {
    let lat: f64 = rng.random_range(-90.0..=90.0);
    let lng: f64 = rng.random_range(-180.0..=180.0);
    json!({
        "lat": (lat * 1e6).round() / 1e6,
        "lng": (lng * 1e6).round() / 1e6,
    })
}

fn gen_social(rng: &mut dyn RngCore) -> Value {
    let handle: String = Username().fake_with_rng(rng);
    json!({
        "twitter": format!("@{handle}"),
        "github": handle,
    })
}
