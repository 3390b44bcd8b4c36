//! Build pipeline: documents in, serialized index out.
//!
//! This is the build-time half of the engine, the part a static site
//! generator invokes once per build. Errors here are strings - they surface
//! on a CLI, not through the library API.

pub mod document;

pub use document::load_documents;

use crate::codec::index_to_object;
use crate::index::IndexConfig;
use crate::types::Index;
use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

/// What `run_build` did, for CLI reporting.
pub struct BuildSummary {
    pub doc_count: usize,
    pub term_count: usize,
    pub posting_count: usize,
    pub output_bytes: usize,
}

#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━╸")
}

/// Build an index from a documents file/directory and write it as JSON.
///
/// `config_path` optionally points at an [`IndexConfig`] JSON file; without
/// it the default configuration (title + body fields) applies.
pub fn run_build(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
) -> Result<BuildSummary, String> {
    let config = match config_path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
            serde_json::from_str::<IndexConfig>(&content)
                .map_err(|e| format!("Invalid config JSON in {}: {}", path.display(), e))?
        }
        None => IndexConfig::default(),
    };

    let documents = load_documents(input)?;

    #[cfg(feature = "parallel")]
    let progress = {
        let pb = ProgressBar::new(documents.len() as u64);
        pb.set_style(create_progress_style());
        pb.set_prefix("Indexing");
        pb
    };

    let index = build_index(&documents, config)?;

    #[cfg(feature = "parallel")]
    {
        progress.set_position(documents.len() as u64);
        progress.finish_with_message("done");
    }

    let portable = index_to_object(&index);
    let json = serde_json::to_string(&portable)
        .map_err(|e| format!("Failed to serialize index: {}", e))?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
    }
    fs::write(output, &json)
        .map_err(|e| format!("Failed to write {}: {}", output.display(), e))?;

    Ok(BuildSummary {
        doc_count: index.doc_count(),
        term_count: index.term_count(),
        posting_count: index.posting_count(),
        output_bytes: json.len(),
    })
}

#[cfg(feature = "parallel")]
fn build_index(
    documents: &[crate::types::Document],
    config: IndexConfig,
) -> Result<Index, String> {
    crate::index::create_index_parallel(documents, config).map_err(|e| e.to_string())
}

#[cfg(not(feature = "parallel"))]
fn build_index(
    documents: &[crate::types::Document],
    config: IndexConfig,
) -> Result<Index, String> {
    crate::index::create_index(documents, config).map_err(|e| e.to_string())
}

/// Load a serialized index back from disk (CLI search/inspect path).
pub fn load_index(path: &Path) -> Result<Index, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let portable: crate::codec::PortableIndex = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid index JSON in {}: {}", path.display(), e))?;
    crate::codec::create_index_from_object(portable).map_err(|e| e.to_string())
}
