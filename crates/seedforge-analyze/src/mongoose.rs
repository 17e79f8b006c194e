//! Default schema-text strategy for Mongoose-style sources.
//!
//! The same codebase may declare an entity three or four different ways: a
//! TypeScript interface, an object literal passed to `new Schema(...)`, the
//! shorthand `name: String` form, or a Joi validation object. The passes
//! below run in that order and the first one that yields any fields wins.
//! Everything here is best-effort lexical scanning: a field the patterns
//! cannot recognize is dropped, never an error.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use seedforge_core::{FieldDefinition, FieldKind, ModelStructure, Result};

use crate::strategy::AnalysisStrategy;

static INTERFACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:export\s+)?(?:interface|type)\s+([A-Za-z_]\w*)(?:\s+extends\s+[^{]+)?\s*=?\s*\{")
        .expect("interface pattern")
});
static INTERFACE_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:readonly\s+)?([A-Za-z_]\w*)(\??)\s*:\s*(.+?)[;,]?\s*$")
        .expect("interface field pattern")
});
static SCHEMA_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"new\s+(?:mongoose\s*\.\s*)?Schema\s*\(").expect("schema call pattern")
});
static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^\s*['"]?([A-Za-z_]\w*)['"]?\s*:\s*(.+)$"#).expect("entry pattern")
});
static TYPE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"type\s*:\s*(\[)?\s*(?:mongoose\s*\.\s*)?(?:Schema\s*\.\s*)?(?:Types\s*\.\s*)?([A-Za-z]\w*)")
        .expect("type token pattern")
});
static REQUIRED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"required\s*:\s*true").expect("required pattern"));
static UNIQUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"unique\s*:\s*true").expect("unique pattern"));
static REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ref\s*:\s*['"]([A-Za-z_]\w*)['"]"#).expect("ref pattern"));
static ENUM_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"enum\s*:\s*\[([^\]]*)\]").expect("enum attr pattern"));
static INLINE_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*['"]?([A-Za-z_]\w*)['"]?\s*:\s*(String|Number|Boolean|Date|Buffer|ObjectId)\b"#)
        .expect("inline pair pattern")
});
static JOI_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[Jj]oi\s*\.\s*object\s*\(").expect("joi object pattern"));
static JOI_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^\s*['"]?([A-Za-z_]\w*)['"]?\s*:\s*[Jj]oi\s*\.\s*([a-z]\w*)\s*\((.*)$"#)
        .expect("joi field pattern")
});
static JOI_VALID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.valid\s*\(([^)]*)\)").expect("joi valid pattern"));
static UNION_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]?([A-Za-z_]\w*)['"]?\??\s*:\s*((?:['"][^'"|]+['"]\s*\|\s*)+['"][^'"|]+['"])"#)
        .expect("union literal pattern")
});
static SCHEMA_ENUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)['"]?([A-Za-z_]\w*)['"]?\s*:\s*\{[^{}]*?enum\s*:\s*\[([^\]]*)\]"#)
        .expect("schema enum pattern")
});
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("quoted pattern"));

/// Multi-pass extraction over Mongoose-flavored schema source text.
pub struct MongooseTextStrategy;

impl MongooseTextStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MongooseTextStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisStrategy for MongooseTextStrategy {
    fn id(&self) -> &'static str {
        "analyze.mongoose_text"
    }

    fn can_analyze(&self, _model_name: &str, source: &str) -> bool {
        SCHEMA_CALL_RE.is_match(source)
            || source.contains("interface ")
            || JOI_OBJECT_RE.is_match(source)
    }

    fn analyze(&self, model_name: &str, source: &str) -> Result<ModelStructure> {
        let mut fields = extract_from_interface(model_name, source);
        if fields.is_empty() {
            fields = extract_from_schema_block(source);
        }
        if fields.is_empty() {
            fields = extract_inline_pairs(source);
        }
        if fields.is_empty() {
            fields = extract_joi_object(source);
        }

        debug!(
            model = %model_name,
            fields = fields.len(),
            "schema text analyzed"
        );

        let mut structure = ModelStructure::empty(model_name);
        structure.fields = dedup_by_name(fields);
        backfill_enums(source, &mut structure);
        structure.rebuild_references();
        Ok(structure)
    }
}

/// Pass (a): a TypeScript interface/type block associated with the entity.
fn extract_from_interface(model_name: &str, source: &str) -> Vec<FieldDefinition> {
    let Some(body) = find_interface_body(model_name, source) else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    for line in body.split(['\n', ';']) {
        let trimmed = line.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with('*') || trimmed.starts_with("/*") {
            continue;
        }
        let Some(caps) = INTERFACE_FIELD_RE.captures(line) else {
            continue;
        };
        let name = caps[1].to_string();
        let optional = &caps[2] == "?";
        let type_text = caps[3].trim();

        let mut field = classify_type_text(&name, type_text);
        field.required = !optional;
        if field.is_reference && field.ref_model.is_none() {
            field.ref_model = lookup_ref_in_schema(source, &field.name);
        }
        if lookup_unique_in_schema(source, &field.name) {
            field.unique = true;
        }
        fields.push(field);
    }
    fields
}

fn find_interface_body<'a>(model_name: &str, source: &'a str) -> Option<&'a str> {
    let wanted = model_name.to_lowercase();
    let mut fallback = None;
    let mut count = 0;
    for caps in INTERFACE_RE.captures_iter(source) {
        let whole = caps.get(0)?;
        let open = whole.start() + whole.as_str().rfind('{')?;
        let body = balanced_block(source, open)?;
        count += 1;
        if !wanted.is_empty() && caps[1].to_lowercase().contains(&wanted) {
            return Some(body);
        }
        if fallback.is_none() {
            fallback = Some(body);
        }
    }
    // A lone interface in the file is taken to describe the entity even
    // when its name does not echo the model name.
    if count == 1 { fallback } else { None }
}

/// Pass (b): the object literal passed to the schema constructor.
fn extract_from_schema_block(source: &str) -> Vec<FieldDefinition> {
    let Some(call) = SCHEMA_CALL_RE.find(source) else {
        return Vec::new();
    };
    let Some(open) = source[call.end()..].find('{').map(|idx| call.end() + idx) else {
        return Vec::new();
    };
    let Some(body) = balanced_block(source, open) else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    for entry in split_top_level(body) {
        if let Some(field) = parse_schema_entry(entry) {
            fields.push(field);
        }
    }
    fields
}

fn parse_schema_entry(entry: &str) -> Option<FieldDefinition> {
    let caps = ENTRY_RE.captures(entry)?;
    let name = caps[1].to_string();
    let value = caps[2].trim();

    if let Some(inner) = value.strip_prefix('[') {
        // Array-of declaration: `tags: [String]` or `authors: [{ type: ... }]`.
        let inner = inner.trim().trim_end_matches([']', ',']).trim();
        let mut field = if inner.starts_with('{') {
            parse_attribute_block(&name, inner)?
        } else {
            bare_token_field(&name, inner)?
        };
        let item = field.kind;
        field = field.array_of(item);
        field.kind = FieldKind::Array;
        return Some(field);
    }

    if value.starts_with('{') {
        return parse_attribute_block(&name, value);
    }

    bare_token_field(&name, value)
}

/// Attribute block form: `{ type: String, required: true, ref: 'User', ... }`.
/// Each attribute is matched independently; a missing attribute is simply
/// absent, it never fails the field.
fn parse_attribute_block(name: &str, block: &str) -> Option<FieldDefinition> {
    let (is_array, kind) = match TYPE_TOKEN_RE.captures(block) {
        Some(caps) => (caps.get(1).is_some(), map_type_token(&caps[2])?),
        // No explicit type token: a nested shape, treated as object.
        None => (false, FieldKind::Object),
    };

    let mut field = FieldDefinition::new(name, kind);
    if is_array {
        field = field.array_of(kind);
        field.kind = FieldKind::Array;
    }
    if REQUIRED_RE.is_match(block) {
        field.required = true;
    }
    if UNIQUE_RE.is_match(block) {
        field.unique = true;
    }
    if kind == FieldKind::ObjectId {
        field.is_reference = true;
        field.ref_model = REF_RE.captures(block).map(|caps| caps[1].to_string());
    }
    if let Some(caps) = ENUM_ATTR_RE.captures(block) {
        let values = parse_quoted_list(&caps[1]);
        if !values.is_empty() {
            field.is_enum = true;
            field.enum_values = Some(values);
        }
    }
    Some(field)
}

fn bare_token_field(name: &str, token: &str) -> Option<FieldDefinition> {
    let token = token.trim().trim_end_matches(',').trim();
    let kind = map_type_token(token.rsplit('.').next().unwrap_or(token))?;
    let mut field = FieldDefinition::new(name, kind);
    if kind == FieldKind::ObjectId {
        field.is_reference = true;
    }
    Some(field)
}

fn map_type_token(token: &str) -> Option<FieldKind> {
    match token {
        "String" | "Buffer" => Some(FieldKind::String),
        "Number" | "Decimal128" => Some(FieldKind::Number),
        "Boolean" => Some(FieldKind::Boolean),
        "Date" => Some(FieldKind::Date),
        "ObjectId" => Some(FieldKind::ObjectId),
        "Mixed" | "Map" | "Object" => Some(FieldKind::Object),
        "Array" => Some(FieldKind::Array),
        _ => None,
    }
}

/// Pass (c): shorthand `name: String` pairs anywhere in the source.
fn extract_inline_pairs(source: &str) -> Vec<FieldDefinition> {
    let mut seen = HashSet::new();
    let mut fields = Vec::new();
    for caps in INLINE_PAIR_RE.captures_iter(source) {
        let name = &caps[1];
        if !seen.insert(name.to_string()) {
            continue;
        }
        if let Some(field) = bare_token_field(name, &caps[2]) {
            fields.push(field);
        }
    }
    fields
}

/// Pass (d): Joi-style declarative validators, for entities defined without
/// the schema constructor at all.
fn extract_joi_object(source: &str) -> Vec<FieldDefinition> {
    let Some(call) = JOI_OBJECT_RE.find(source) else {
        return Vec::new();
    };
    let Some(open) = source[call.end()..].find('{').map(|idx| call.end() + idx) else {
        return Vec::new();
    };
    let Some(body) = balanced_block(source, open) else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    for entry in split_top_level(body) {
        let Some(caps) = JOI_FIELD_RE.captures(entry) else {
            continue;
        };
        let name = caps[1].to_string();
        let kind = match &caps[2] {
            "string" => FieldKind::String,
            "number" => FieldKind::Number,
            "boolean" | "bool" => FieldKind::Boolean,
            "date" => FieldKind::Date,
            "array" => FieldKind::Array,
            "object" | "any" | "alternatives" => FieldKind::Object,
            _ => continue,
        };
        let mut field = FieldDefinition::new(name, kind);
        field.required = entry.contains(".required()");
        if let Some(valid) = JOI_VALID_RE.captures(entry) {
            let values = parse_quoted_list(&valid[1]);
            if !values.is_empty() {
                field.is_enum = true;
                field.enum_values = Some(values);
            }
        }
        fields.push(field);
    }
    fields
}

/// Final pass, independent of which extraction branch produced the fields:
/// back-fill enum membership from union-of-literal type annotations and
/// in-schema `enum: [...]` attributes anywhere in the source.
fn backfill_enums(source: &str, structure: &mut ModelStructure) {
    let mut found: Vec<(String, Vec<String>)> = Vec::new();

    for caps in UNION_LITERAL_RE.captures_iter(source) {
        found.push((caps[1].to_string(), parse_quoted_list(&caps[2])));
    }
    for caps in SCHEMA_ENUM_RE.captures_iter(source) {
        found.push((caps[1].to_string(), parse_quoted_list(&caps[2])));
    }
    // Values already carried on the fields themselves (pass (b)/(d)).
    for field in &structure.fields {
        if let Some(values) = &field.enum_values {
            found.push((field.name.clone(), values.clone()));
        }
    }

    for (name, values) in found {
        if values.is_empty() {
            continue;
        }
        let Some(field) = structure
            .fields
            .iter_mut()
            .find(|field| field.name == name)
        else {
            continue;
        };
        field.is_enum = true;
        field.enum_values = Some(values.clone());
        structure.enums.insert(name, values);
    }
}

/// Look for a `ref: '...'` annotation on the named field inside the nearby
/// schema block; used when the field itself came from an interface.
fn lookup_ref_in_schema(source: &str, field_name: &str) -> Option<String> {
    let pattern = format!(
        r#"(?s)['"]?{}['"]?\s*:\s*\{{[^{{}}]*?ref\s*:\s*['"]([A-Za-z_]\w*)['"]"#,
        regex::escape(field_name)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(source).map(|caps| caps[1].to_string())
}

/// Same idea for `unique: true`: the interface annotation cannot carry it,
/// so it is picked up from the field's attribute block when one exists.
fn lookup_unique_in_schema(source: &str, field_name: &str) -> bool {
    let pattern = format!(
        r#"(?s)['"]?{}['"]?\s*:\s*\{{[^{{}}]*?unique\s*:\s*true"#,
        regex::escape(field_name)
    );
    Regex::new(&pattern)
        .map(|re| re.is_match(source))
        .unwrap_or(false)
}

fn parse_quoted_list(raw: &str) -> Vec<String> {
    QUOTED_RE
        .captures_iter(raw)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn dedup_by_name(fields: Vec<FieldDefinition>) -> Vec<FieldDefinition> {
    let mut seen = HashSet::new();
    fields
        .into_iter()
        .filter(|field| seen.insert(field.name.clone()))
        .collect()
}

/// Classify an interface type annotation into a canonical field kind.
fn classify_type_text(name: &str, raw: &str) -> FieldDefinition {
    let text = raw.trim().trim_end_matches(',').trim();

    if let Some(inner) = text.strip_suffix("[]") {
        let item = classify_type_text(name, inner);
        let mut field = FieldDefinition::new(name, FieldKind::Array).array_of(item.kind);
        field.is_reference = item.is_reference;
        field.ref_model = item.ref_model;
        return field;
    }
    if let Some(inner) = text
        .strip_prefix("Array<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        let item = classify_type_text(name, inner);
        let mut field = FieldDefinition::new(name, FieldKind::Array).array_of(item.kind);
        field.is_reference = item.is_reference;
        field.ref_model = item.ref_model;
        return field;
    }

    if text.contains("ObjectId") {
        let mut field = FieldDefinition::new(name, FieldKind::ObjectId);
        field.is_reference = true;
        return field;
    }

    let lower = text.to_lowercase();
    let kind = if lower.contains("string") || text.contains('\'') || text.contains('"') {
        FieldKind::String
    } else if lower.contains("number") {
        FieldKind::Number
    } else if lower.contains("boolean") {
        FieldKind::Boolean
    } else if text.contains("Date") {
        FieldKind::Date
    } else {
        FieldKind::Object
    };
    FieldDefinition::new(name, kind)
}

/// Slice out the body between a `{` and its matching `}`, tolerant of nested
/// braces and quoted strings. Returns `None` when the block never closes.
fn balanced_block(source: &str, open: usize) -> Option<&str> {
    let bytes = source.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }
    let mut depth = 0_usize;
    let mut in_str: Option<u8> = None;
    for (idx, &byte) in bytes.iter().enumerate().skip(open) {
        match in_str {
            Some(quote) => {
                if byte == quote && bytes.get(idx.wrapping_sub(1)) != Some(&b'\\') {
                    in_str = None;
                }
            }
            None => match byte {
                b'\'' | b'"' | b'`' => in_str = Some(byte),
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(&source[open + 1..idx]);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// Split an object-literal body on commas at nesting depth zero.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut start = 0_usize;
    let mut in_str: Option<char> = None;
    let mut prev = '\0';

    for (idx, ch) in body.char_indices() {
        match in_str {
            Some(quote) => {
                if ch == quote && prev != '\\' {
                    in_str = None;
                }
            }
            None => match ch {
                '\'' | '"' | '`' => in_str = Some(ch),
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => depth -= 1,
                ',' if depth == 0 => {
                    parts.push(&body[start..idx]);
                    start = idx + 1;
                }
                _ => {}
            },
        }
        prev = ch;
    }
    if start < body.len() {
        parts.push(&body[start..]);
    }
    parts
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect()
}
