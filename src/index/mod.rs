//! Inverted index construction.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTING_LIST_SORTED**: Each posting list is sorted by (doc_id, field)
//! 2. **DOC_FREQ_CORRECT**: doc_freq equals count of unique doc_ids
//! 3. **NON_EMPTY**: Every term has at least one posting
//! 4. **DETERMINISTIC**: The same documents and config always produce an index
//!    that serializes byte-identically
//!
//! The builder owns all intermediate structures; the finished [`Index`] is
//! handed to the caller and never mutated again. Sorting falls out of
//! construction order - documents are processed in insertion order and fields
//! in ordinal order, so no posting list ever needs an explicit sort.

use crate::error::ConfigError;
use crate::fuzzy::build_gram_map;
use crate::tokenizer::{tokenize, TokenizerConfig};
use crate::types::{Document, FieldSpec, Index, Posting, PostingList, StoredDoc};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything `create_index` needs to know, validated up front.
///
/// Unknown knobs don't exist by construction (`deny_unknown_fields` on the
/// serde side); invalid values are rejected with a [`ConfigError`] before any
/// document is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IndexConfig {
    /// Fields to index, in ordinal order, with their scoring weights.
    pub fields: Vec<FieldSpec>,
    /// Tokenization settings, shared verbatim with query parsing.
    pub tokenizer: TokenizerConfig,
    /// Gram length of the fuzzy pre-filter (2..=4).
    pub ngram_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            fields: vec![FieldSpec::new("title", 2.0), FieldSpec::new("body", 1.0)],
            tokenizer: TokenizerConfig::default(),
            ngram_size: 2,
        }
    }
}

impl IndexConfig {
    /// Fail-fast validation. Nothing is guessed or clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        for (i, field) in self.fields.iter().enumerate() {
            if !(field.weight > 0.0) {
                return Err(ConfigError::NonPositiveWeight {
                    field: field.name.clone(),
                    weight: field.weight,
                });
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(ConfigError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }
        if !(2..=4).contains(&self.ngram_size) {
            return Err(ConfigError::BadNgramSize {
                size: self.ngram_size,
            });
        }
        if !(1..=3).contains(&self.tokenizer.cjk_ngram) {
            return Err(ConfigError::BadCjkNgramSize {
                size: self.tokenizer.cjk_ngram,
            });
        }
        if self.tokenizer.min_term_len == 0 {
            return Err(ConfigError::ZeroMinTermLength);
        }
        Ok(())
    }
}

/// Per-document tokenization output: term → postings fragments, plus the
/// field token counts. Independent per document, which is what makes the
/// parallel build embarrassingly parallel.
struct DocTerms {
    terms: HashMap<String, Vec<Posting>>,
    field_lengths: Vec<u32>,
}

fn tokenize_document(doc_id: u32, doc: &Document, config: &IndexConfig) -> DocTerms {
    let mut terms: HashMap<String, Vec<Posting>> = HashMap::new();
    let mut field_lengths = Vec::with_capacity(config.fields.len());

    for (ordinal, spec) in config.fields.iter().enumerate() {
        let text = doc.fields.get(&spec.name).map(String::as_str).unwrap_or("");
        let tokens = tokenize(text, &config.tokenizer);
        field_lengths.push(tokens.len() as u32);

        let mut positions: HashMap<&str, Vec<u32>> = HashMap::new();
        for token in &tokens {
            positions.entry(token.term.as_str()).or_default().push(token.position);
        }
        for (term, pos) in positions {
            terms.entry(term.to_string()).or_default().push(Posting {
                doc_id,
                field: ordinal as u16,
                positions: pos,
            });
        }
    }

    // A term seen in several fields produced one fragment per field, in field
    // iteration order only within `positions` - restore (doc, field) order.
    for postings in terms.values_mut() {
        postings.sort_by_key(|p| p.field);
    }

    DocTerms {
        terms,
        field_lengths,
    }
}

/// Merge per-document maps in doc-id order, preserving POSTING_LIST_SORTED,
/// then derive vocabulary, statistics, and the fuzzy gram map.
fn assemble(
    docs: &[Document],
    per_doc: Vec<DocTerms>,
    config: IndexConfig,
) -> Index {
    let mut terms: HashMap<String, Vec<Posting>> = HashMap::new();
    let mut field_lengths = Vec::with_capacity(per_doc.len());

    for doc_terms in per_doc {
        for (term, postings) in doc_terms.terms {
            terms.entry(term).or_default().extend(postings);
        }
        field_lengths.push(doc_terms.field_lengths);
    }

    let final_terms: HashMap<String, PostingList> = terms
        .into_iter()
        .map(|(term, postings)| {
            let mut doc_ids: Vec<u32> = postings.iter().map(|p| p.doc_id).collect();
            doc_ids.dedup();
            let doc_freq = doc_ids.len() as u32;
            (term, PostingList { postings, doc_freq })
        })
        .collect();

    let mut vocabulary: Vec<String> = final_terms.keys().cloned().collect();
    vocabulary.sort_unstable();

    let grams = build_gram_map(&vocabulary, config.ngram_size);

    let doc_count = docs.len();
    let avg_field_length: Vec<f64> = (0..config.fields.len())
        .map(|f| {
            if doc_count == 0 {
                0.0
            } else {
                let total: u64 = field_lengths.iter().map(|l| u64::from(l[f])).sum();
                total as f64 / doc_count as f64
            }
        })
        .collect();

    let stored: Vec<StoredDoc> = docs
        .iter()
        .map(|d| StoredDoc {
            key: d.key.clone(),
            metadata: d.metadata.clone(),
        })
        .collect();

    Index {
        docs: stored,
        fields: config.fields,
        terms: final_terms,
        vocabulary,
        grams,
        field_lengths,
        avg_field_length,
        tokenizer: config.tokenizer,
        ngram_size: config.ngram_size,
    }
}

/// Build an index from raw documents.
///
/// Single-pass and CPU-bound: each document's fields stream through the
/// tokenizer, postings accumulate keyed by term, and corpus statistics are
/// computed incrementally. Ownership of the finished index transfers to the
/// caller - on a static site build it is typically serialized immediately and
/// dropped.
pub fn create_index(docs: &[Document], config: IndexConfig) -> Result<Index, ConfigError> {
    config.validate()?;

    let per_doc: Vec<DocTerms> = docs
        .iter()
        .enumerate()
        .map(|(doc_id, doc)| tokenize_document(doc_id as u32, doc, &config))
        .collect();

    let index = assemble(docs, per_doc, config);
    debug_assert!(crate::types::check_index_well_formed(&index));
    Ok(index)
}

/// Build an index using parallel map-reduce.
///
/// Map phase tokenizes documents independently across the rayon pool; the
/// reduce phase merges per-document maps in doc-id order so posting lists
/// come out sorted without a post-pass. Produces an index identical to
/// [`create_index`] - sharding must never change the result.
#[cfg(feature = "parallel")]
pub fn create_index_parallel(docs: &[Document], config: IndexConfig) -> Result<Index, ConfigError> {
    config.validate()?;

    let per_doc: Vec<DocTerms> = docs
        .par_iter()
        .enumerate()
        .map(|(doc_id, doc)| tokenize_document(doc_id as u32, doc, &config))
        .collect();

    let index = assemble(docs, per_doc, config);
    debug_assert!(crate::types::check_index_well_formed(&index));
    Ok(index)
}
