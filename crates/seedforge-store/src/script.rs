use serde_json::Value;

use seedforge_generate::{Datasets, Record};

use crate::errors::StorageError;

/// Unique index declarations appended for well-known collections when the
/// script touches them.
const UNIQUE_INDEXES: &[(&str, &[&str])] = &[
    ("users", &["email", "username"]),
    ("categories", &["slug"]),
    ("products", &["sku"]),
];

const BATCH_SIZE: usize = 100;

/// Renders an executable `mongosh` seeding script for the given datasets.
///
/// Each collection is dropped before inserts so the script is idempotent;
/// inserts are batched to keep individual statements reviewable.
pub fn render_import_script(datasets: &Datasets) -> Result<String, StorageError> {
    let mut script = String::new();
    script.push_str("// Generated seeding script. Run with: mongosh <db> <this file>\n");

    for (model, records) in datasets {
        let collection = collection_name(model);
        script.push('\n');
        script.push_str(&format!("// --- {model} ---\n"));
        script.push_str(&format!("db.{collection}.drop();\n"));

        if records.is_empty() {
            script.push_str("// no data\n");
            continue;
        }

        for batch in records.chunks(BATCH_SIZE) {
            script.push_str(&format!("db.{collection}.insertMany("));
            script.push_str(&render_batch(batch)?);
            script.push_str(", { ordered: false });\n");
        }
    }

    let indexes = render_indexes(datasets);
    if !indexes.is_empty() {
        script.push('\n');
        script.push_str("// --- unique indexes ---\n");
        script.push_str(&indexes);
    }

    Ok(script)
}

/// Collection name for a model: lowercased, naively pluralized.
pub fn collection_name(model: &str) -> String {
    let lower = model.to_lowercase();
    if lower.ends_with('s') {
        lower
    } else {
        format!("{lower}s")
    }
}

fn render_batch(batch: &[Record]) -> Result<String, StorageError> {
    let values: Vec<Value> = batch
        .iter()
        .map(|record| Value::Object(record.clone()))
        .collect();
    Ok(serde_json::to_string_pretty(&Value::Array(values))?)
}

fn render_indexes(datasets: &Datasets) -> String {
    let mut out = String::new();
    for (collection, fields) in UNIQUE_INDEXES {
        let present = datasets
            .keys()
            .any(|model| collection_name(model) == *collection);
        if !present {
            continue;
        }
        for field in *fields {
            out.push_str(&format!(
                "db.{collection}.createIndex({{ {field}: 1 }}, {{ unique: true }});\n"
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    fn record(id: &str) -> Record {
        let mut map = Record::new();
        map.insert("_id".to_string(), json!(id));
        map
    }

    #[test]
    fn empty_collection_gets_drop_and_marker() {
        let mut datasets: Datasets = BTreeMap::new();
        datasets.insert("Post".to_string(), Vec::new());

        let script = render_import_script(&datasets).unwrap();
        assert!(script.contains("db.posts.drop();"));
        assert!(script.contains("// no data"));
        assert!(!script.contains("insertMany"));
    }

    #[test]
    fn large_collection_is_batched() {
        let mut datasets: Datasets = BTreeMap::new();
        let records = (0..250).map(|i| record(&format!("id{i}"))).collect();
        datasets.insert("Post".to_string(), records);

        let script = render_import_script(&datasets).unwrap();
        assert_eq!(script.matches("db.posts.insertMany(").count(), 3);
    }

    #[test]
    fn unique_indexes_only_for_present_collections() {
        let mut datasets: Datasets = BTreeMap::new();
        datasets.insert("User".to_string(), vec![record("a")]);
        datasets.insert("Post".to_string(), vec![record("b")]);

        let script = render_import_script(&datasets).unwrap();
        assert!(script.contains("db.users.createIndex({ email: 1 }, { unique: true });"));
        assert!(script.contains("db.users.createIndex({ username: 1 }, { unique: true });"));
        assert!(!script.contains("db.products.createIndex"));
    }

    #[test]
    fn pluralization_keeps_trailing_s() {
        assert_eq!(collection_name("User"), "users");
        assert_eq!(collection_name("Address"), "address");
        assert_eq!(collection_name("News"), "news");
    }
}
