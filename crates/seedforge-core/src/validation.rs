use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::model::ModelStructure;

/// Validate internal consistency of a model structure.
///
/// This checks:
/// - non-empty model name
/// - duplicate field names
/// - reference entries that name a declared field
/// - enum entries that name a declared field
pub fn validate_structure(structure: &ModelStructure) -> Result<()> {
    if structure.name.trim().is_empty() {
        return Err(Error::InvalidStructure("empty model name".to_string()));
    }

    let mut fields = BTreeSet::new();
    for field in &structure.fields {
        if !fields.insert(field.name.as_str()) {
            return Err(Error::InvalidStructure(format!(
                "duplicate field name: {}.{}",
                structure.name, field.name
            )));
        }
        if field.is_reference && field.kind != crate::model::FieldKind::ObjectId {
            return Err(Error::InvalidStructure(format!(
                "reference field {}.{} must be object-id kind",
                structure.name, field.name
            )));
        }
    }

    for reference in &structure.references {
        if !fields.contains(reference.field.as_str()) {
            return Err(Error::InvalidStructure(format!(
                "reference names missing field: {}.{}",
                structure.name, reference.field
            )));
        }
    }

    for field_name in structure.enums.keys() {
        if !fields.contains(field_name.as_str()) {
            return Err(Error::InvalidStructure(format!(
                "enum names missing field: {}.{}",
                structure.name, field_name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDefinition, FieldKind, ReferenceDefinition};

    fn post_structure() -> ModelStructure {
        let mut structure = ModelStructure::empty("Post");
        structure.fields = vec![
            FieldDefinition::new("title", FieldKind::String).required(),
            FieldDefinition::new("author_id", FieldKind::ObjectId).reference_to("User"),
        ];
        structure.rebuild_references();
        structure
    }

    #[test]
    fn accepts_consistent_structure() {
        let structure = post_structure();
        assert!(validate_structure(&structure).is_ok());
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let mut structure = post_structure();
        structure
            .fields
            .push(FieldDefinition::new("title", FieldKind::String));
        assert!(matches!(
            validate_structure(&structure),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn rejects_dangling_reference_entry() {
        let mut structure = post_structure();
        structure.references.push(ReferenceDefinition {
            field: "missing".to_string(),
            model: "User".to_string(),
            is_array: false,
        });
        assert!(matches!(
            validate_structure(&structure),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn rejects_enum_on_unknown_field() {
        let mut structure = post_structure();
        structure.enums.insert(
            "status".to_string(),
            vec!["draft".to_string(), "published".to_string()],
        );
        assert!(matches!(
            validate_structure(&structure),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn rebuild_references_tracks_reference_fields() {
        let structure = post_structure();
        assert_eq!(structure.references.len(), 1);
        assert_eq!(structure.references[0].field, "author_id");
        assert_eq!(structure.references[0].model, "User");
        assert!(!structure.references[0].is_array);
    }
}
