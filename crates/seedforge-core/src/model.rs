use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical description of one entity's persistence schema.
///
/// Built fresh on every analysis call and immutable afterwards; the
/// generation layer only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelStructure {
    /// Entity identifier, e.g. `User` or `Post`.
    pub name: String,
    /// Ordered field declarations; names are unique within the structure.
    pub fields: Vec<FieldDefinition>,
    /// Denormalized view of the fields that point at another entity.
    pub references: Vec<ReferenceDefinition>,
    /// Allowed value sets keyed by field name.
    pub enums: BTreeMap<String, Vec<String>>,
}

impl ModelStructure {
    /// An empty-but-valid structure; returned when no analysis strategy
    /// could extract anything from the source text.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            references: Vec::new(),
            enums: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Rebuild the `references` view from the current fields.
    pub fn rebuild_references(&mut self) {
        self.references = self
            .fields
            .iter()
            .filter(|field| field.is_reference)
            .filter_map(|field| {
                field.ref_model.as_ref().map(|model| ReferenceDefinition {
                    field: field.name.clone(),
                    model: model.clone(),
                    is_array: field.is_array,
                })
            })
            .collect();
    }
}

/// Primitive kind of a model field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Date,
    /// Reference-shaped identifier (document-store object id).
    ObjectId,
    Array,
    Object,
}

/// One attribute of a model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Declared with a uniqueness constraint in the source schema.
    pub unique: bool,
    pub is_array: bool,
    pub is_reference: bool,
    /// Target entity name for reference fields, when the source declared one.
    pub ref_model: Option<String>,
    pub is_enum: bool,
    pub enum_values: Option<Vec<String>>,
    /// Declared item kind for array fields, when the source declared one.
    pub item_kind: Option<FieldKind>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            unique: false,
            is_array: false,
            is_reference: false,
            ref_model: None,
            is_enum: false,
            enum_values: None,
            item_kind: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn array_of(mut self, item: FieldKind) -> Self {
        self.is_array = true;
        self.item_kind = Some(item);
        self
    }

    pub fn reference_to(mut self, model: impl Into<String>) -> Self {
        self.kind = FieldKind::ObjectId;
        self.is_reference = true;
        self.ref_model = Some(model.into());
        self
    }
}

/// Denormalized reference entry consumed by the resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ReferenceDefinition {
    /// Field on the referencing model holding the foreign identifier(s).
    pub field: String,
    /// Referenced entity name.
    pub model: String,
    pub is_array: bool,
}
