use seedforge_core::{FieldDefinition, FieldKind, ModelStructure};

fn sample_structure() -> ModelStructure {
    let mut structure = ModelStructure::empty("Order");
    structure.fields = vec![
        FieldDefinition::new("code", FieldKind::String).required(),
        FieldDefinition::new("customer_id", FieldKind::ObjectId).reference_to("User"),
        FieldDefinition::new("tags", FieldKind::Array).array_of(FieldKind::String),
    ];
    structure.enums.insert(
        "code".to_string(),
        vec!["A".to_string(), "B".to_string()],
    );
    structure.fields[0].is_enum = true;
    structure.fields[0].enum_values = Some(vec!["A".to_string(), "B".to_string()]);
    structure.rebuild_references();
    structure
}

#[test]
fn structure_round_trips_through_json() {
    let structure = sample_structure();
    let encoded = serde_json::to_string_pretty(&structure).expect("serialize");
    let decoded: ModelStructure = serde_json::from_str(&encoded).expect("deserialize");

    assert_eq!(decoded.name, "Order");
    assert_eq!(decoded.fields.len(), 3);
    assert_eq!(decoded.references, structure.references);
    assert_eq!(decoded.enums.get("code").map(Vec::len), Some(2));
}

#[test]
fn field_kind_uses_snake_case_tags() {
    let encoded = serde_json::to_string(&FieldKind::ObjectId).expect("serialize");
    assert_eq!(encoded, "\"object_id\"");
}
