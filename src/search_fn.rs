//! Search function factory and the one-shot convenience entry point.
//!
//! [`create_search_fn`] is a pure binding: it validates options once, fixes
//! the scoring backend once, and returns a closure that captures the index by
//! shared reference. Calling the closure never mutates the index, so one
//! index can serve any number of search functions and concurrent callers.

use crate::error::{ConfigError, SearchError};
use crate::highlight::build_highlights;
use crate::query::{parse, validate_fields};
use crate::scoring::{CpuBackend, ScoreBackend};
use crate::types::{Index, SearchResult};
use std::sync::Arc;

/// Options bound into a search function.
///
/// Defaults: `limit = 100`, `min_score = 0.0`, `highlight = false`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of results. Zero is a [`ConfigError`], never silently
    /// clamped - a caller that typos `0` should not silently get nothing.
    pub limit: usize,
    /// Drop results scoring below this threshold.
    pub min_score: f64,
    /// Attach matched token positions to each result.
    pub highlight: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            limit: 100,
            min_score: 0.0,
            highlight: false,
        }
    }
}

impl SearchOptions {
    /// Fail-fast validation, run once at binding time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::NonPositiveLimit { limit: self.limit });
        }
        if !self.min_score.is_finite() {
            return Err(ConfigError::NonFiniteMinScore);
        }
        Ok(())
    }
}

/// Bind an index and options to a reusable query function.
///
/// The returned closure parses, validates, executes, and ranks - returning an
/// empty `Vec` for queries that match nothing (not an error) and
/// [`SearchError`] only for malformed queries or unknown field restrictions.
pub fn create_search_fn(
    index: &Index,
    options: SearchOptions,
) -> Result<impl Fn(&str) -> Result<Vec<SearchResult>, SearchError> + '_, ConfigError> {
    create_search_fn_with_backend(index, options, Arc::new(CpuBackend))
}

/// Like [`create_search_fn`], with an explicit scoring backend.
///
/// The backend is probed once, here: if it reports itself unavailable the CPU
/// path is bound instead, silently. An accelerator is an optimization, and
/// its absence is not the caller's problem.
pub fn create_search_fn_with_backend(
    index: &Index,
    options: SearchOptions,
    backend: Arc<dyn ScoreBackend>,
) -> Result<impl Fn(&str) -> Result<Vec<SearchResult>, SearchError> + '_, ConfigError> {
    options.validate()?;
    let backend: Arc<dyn ScoreBackend> = if backend.is_available() {
        backend
    } else {
        Arc::new(CpuBackend)
    };

    Ok(move |query: &str| -> Result<Vec<SearchResult>, SearchError> {
        let node = parse(query, &index.tokenizer)?;
        validate_fields(&node, index)?;
        let hits = crate::search::execute(&node, index, backend.as_ref());

        let results: Vec<SearchResult> = hits
            .into_iter()
            .filter(|hit| hit.score >= options.min_score)
            .take(options.limit)
            .map(|hit| {
                let doc = &index.docs[hit.doc_id as usize];
                SearchResult {
                    key: doc.key.clone(),
                    score: hit.score,
                    metadata: doc.metadata.clone(),
                    highlights: if options.highlight {
                        build_highlights(index, hit.doc_id, &hit.terms)
                    } else {
                        Vec::new()
                    },
                }
            })
            .collect();
        Ok(results)
    })
}

/// One-shot convenience form: equivalent to
/// `create_search_fn(index, options)?(query)`.
pub fn search(
    index: &Index,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<SearchResult>, SearchError> {
    let search_fn = create_search_fn(index, options)?;
    search_fn(query)
}
