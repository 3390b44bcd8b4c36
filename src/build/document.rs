//! Document loading for the build pipeline.
//!
//! Input is plain JSON: either one file holding an array of documents, or a
//! directory of `.json` files each holding a document or an array of them.
//! Directory entries are read in sorted filename order - document insertion
//! order is the ranking tie-break, so load order must be reproducible.

use crate::types::Document;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One document, or a batch - both accepted per file.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    One(Box<Document>),
    Many(Vec<Document>),
}

/// Load documents from a JSON file or a directory of JSON files.
pub fn load_documents(input: &Path) -> Result<Vec<Document>, String> {
    if input.is_dir() {
        let mut paths: Vec<_> = fs::read_dir(input)
            .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut documents = Vec::new();
        for path in paths {
            documents.extend(load_file(&path)?);
        }
        Ok(documents)
    } else {
        load_file(input)
    }
}

fn load_file(path: &Path) -> Result<Vec<Document>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let parsed: DocumentFile = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid document JSON in {}: {}", path.display(), e))?;
    Ok(match parsed {
        DocumentFile::One(doc) => vec![*doc],
        DocumentFile::Many(docs) => docs,
    })
}
