//! Shared helpers for integration tests.

#![allow(dead_code)]

use serde_json::Value;
use staticseek::{create_index, Document, FieldSpec, Index, IndexConfig, SearchOptions};
use std::collections::HashMap;

/// A document with a single `body` field.
pub fn body_doc(key: &str, body: &str) -> Document {
    let mut fields = HashMap::new();
    fields.insert("body".to_string(), body.to_string());
    Document {
        key: key.to_string(),
        fields,
        metadata: Value::Null,
    }
}

/// A document with `title` and `body` fields.
pub fn titled_doc(key: &str, title: &str, body: &str) -> Document {
    let mut fields = HashMap::new();
    fields.insert("title".to_string(), title.to_string());
    fields.insert("body".to_string(), body.to_string());
    Document {
        key: key.to_string(),
        fields,
        metadata: Value::Null,
    }
}

/// Config indexing only `body`, weight 1.
pub fn body_config() -> IndexConfig {
    IndexConfig {
        fields: vec![FieldSpec::new("body", 1.0)],
        ..IndexConfig::default()
    }
}

/// Build an index over single-field body documents.
pub fn body_index(texts: &[&str]) -> Index {
    let docs: Vec<Document> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| body_doc(&format!("/doc/{}", i), text))
        .collect();
    create_index(&docs, body_config()).expect("index build")
}

/// Build an index over (title, body) documents with the default config.
pub fn titled_index(docs_data: &[(&str, &str)]) -> Index {
    let docs: Vec<Document> = docs_data
        .iter()
        .enumerate()
        .map(|(i, (title, body))| titled_doc(&format!("/doc/{}", i), title, body))
        .collect();
    create_index(&docs, IndexConfig::default()).expect("index build")
}

/// Run a query and return just the result keys, in rank order.
pub fn search_keys(index: &Index, query: &str) -> Vec<String> {
    staticseek::search(index, query, SearchOptions::default())
        .expect("query should parse")
        .into_iter()
        .map(|r| r.key)
        .collect()
}

/// Run a query and return sorted result keys (order-insensitive checks).
pub fn search_keys_sorted(index: &Index, query: &str) -> Vec<String> {
    let mut keys = search_keys(index, query);
    keys.sort();
    keys
}
