use chrono::DateTime;
use serde_json::Value;
use tracing::debug;

use seedforge_core::{FieldDefinition, FieldKind, ModelStructure};
use seedforge_generate::Record;
use seedforge_generate::ids::is_object_id;

/// Infers a permissive structure from a sample record's runtime value
/// types. Used when saving to the database and the target model was never
/// registered: the schema only needs to admit the generated data, so every
/// field is optional and uniqueness is disabled.
pub fn infer_structure(model: &str, sample: &Record) -> ModelStructure {
    let mut structure = ModelStructure::empty(model);
    for (name, value) in sample {
        if name == "_id" {
            continue;
        }
        structure.fields.push(infer_field(name, value));
    }
    debug!(model, fields = structure.fields.len(), "inferred permissive structure");
    structure.rebuild_references();
    structure
}

fn infer_field(name: &str, value: &Value) -> FieldDefinition {
    let mut field = FieldDefinition::new(name, infer_kind(value));
    if let Value::Array(items) = value {
        field.is_array = true;
        field.item_kind = items.first().map(infer_kind);
        field.kind = FieldKind::Array;
    }
    field
}

fn infer_kind(value: &Value) -> FieldKind {
    match value {
        Value::Bool(_) => FieldKind::Boolean,
        Value::Number(_) => FieldKind::Number,
        Value::String(text) if is_object_id(text) => FieldKind::ObjectId,
        Value::String(text) if DateTime::parse_from_rfc3339(text).is_ok() => FieldKind::Date,
        Value::String(_) | Value::Null => FieldKind::String,
        Value::Array(_) => FieldKind::Array,
        Value::Object(_) => FieldKind::Object,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn infers_kinds_from_runtime_values() {
        let mut sample = Record::new();
        sample.insert("_id".to_string(), json!("64b2f0c8a1d2e3f405060708"));
        sample.insert("name".to_string(), json!("Ada"));
        sample.insert("age".to_string(), json!(37));
        sample.insert("active".to_string(), json!(true));
        sample.insert("createdAt".to_string(), json!("2024-03-01T12:00:00+00:00"));
        sample.insert("owner".to_string(), json!("64b2f0c8a1d2e3f405060709"));
        sample.insert("tags".to_string(), json!(["a", "b"]));
        sample.insert("meta".to_string(), json!({"k": 1}));

        let structure = infer_structure("Widget", &sample);

        assert_eq!(structure.name, "Widget");
        assert!(structure.field("_id").is_none());
        assert_eq!(structure.field("name").unwrap().kind, FieldKind::String);
        assert_eq!(structure.field("age").unwrap().kind, FieldKind::Number);
        assert_eq!(structure.field("active").unwrap().kind, FieldKind::Boolean);
        assert_eq!(structure.field("createdAt").unwrap().kind, FieldKind::Date);
        assert_eq!(structure.field("owner").unwrap().kind, FieldKind::ObjectId);
        assert_eq!(structure.field("meta").unwrap().kind, FieldKind::Object);

        let tags = structure.field("tags").unwrap();
        assert!(tags.is_array);
        assert_eq!(tags.item_kind, Some(FieldKind::String));
    }

    #[test]
    fn inferred_fields_are_optional_and_not_unique() {
        let mut sample = Record::new();
        sample.insert("email".to_string(), json!("a@b.test"));

        let structure = infer_structure("Contact", &sample);
        let email = structure.field("email").unwrap();
        assert!(!email.required);
        assert!(!email.unique);
    }
}
