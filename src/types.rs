//! The building blocks of a search index.
//!
//! These types define how documents, terms, and postings fit together.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Posting**: `doc_id < docs.len() ∧ field < fields.len() ∧ !positions.is_empty()`
//!   Every posting points at a real document and field, and a term that never
//!   occurs has no posting at all.
//!
//! - **PostingList**: postings sorted by `(doc_id, field)`, no duplicates.
//!   Boolean AND/OR/NOT are merge-joins over doc ids; an unsorted list turns a
//!   linear join quadratic and, worse, nondeterministic.
//!
//! - **Index**: `field_lengths.len() = docs.len()`, every inner vector
//!   `fields.len()` long; `vocabulary` is the strictly sorted key set of
//!   `terms`. The index is immutable once built - that immutability is the
//!   whole concurrency story at query time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// NEWTYPES
// =============================================================================

/// Type-safe document identifier: the position of a document in insertion
/// order. Prevents accidentally passing a token position where a document id
/// is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    /// Create a new DocId, validating it's within bounds.
    #[inline]
    pub fn new(id: u32, num_docs: usize) -> Option<Self> {
        if (id as usize) < num_docs {
            Some(DocId(id))
        } else {
            None
        }
    }

    /// Get the underlying value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

impl From<DocId> for usize {
    fn from(id: DocId) -> Self {
        id.0 as usize
    }
}

// =============================================================================
// INPUT MODEL
// =============================================================================

/// A unit of searchable content, owned by the caller.
///
/// `key` is an opaque identifier (typically the page path). `fields` maps
/// field names to raw text; only names listed in the index configuration get
/// indexed. `metadata` is returned verbatim with results - URL, excerpt
/// anchors, whatever the site needs to render a hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub key: String,
    pub fields: HashMap<String, String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A field to index and its relative weight in scoring.
///
/// The position of a spec in `IndexConfig::fields` is the field's ordinal;
/// postings store that ordinal, not the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    pub weight: f64,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        FieldSpec {
            name: name.into(),
            weight,
        }
    }
}

// =============================================================================
// INVERTED INDEX
// =============================================================================

/// All occurrences of one term within one (document, field) pair.
///
/// `positions` are token indices within the field (not byte offsets), strictly
/// increasing. Term frequency is `positions.len()` - it is never stored
/// separately because the two would inevitably drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub doc_id: u32,
    pub field: u16,
    pub positions: Vec<u32>,
}

impl Posting {
    /// Number of occurrences in this (document, field).
    #[inline]
    pub fn term_freq(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// All occurrences of a single term across the corpus.
///
/// `doc_freq` counts unique documents (not postings - one document can
/// contribute several postings, one per field it matches in). Cached because
/// IDF needs it on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingList {
    /// Sorted by (doc_id, field).
    pub postings: Vec<Posting>,
    /// Number of unique documents containing this term.
    pub doc_freq: u32,
}

/// Document metadata kept inside the index for result assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDoc {
    pub key: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// The complete search index: term map, vocabulary, and corpus statistics.
///
/// Built once by [`crate::create_index`], then read-only. Concurrent queries
/// against the same index never conflict because nothing here mutates after
/// construction.
#[derive(Debug, Clone)]
pub struct Index {
    /// Document metadata in insertion order (the tie-break order for ranking).
    pub(crate) docs: Vec<StoredDoc>,
    /// Indexed fields in ordinal order.
    pub(crate) fields: Vec<FieldSpec>,
    /// Term → posting list. O(1) exact lookup.
    pub(crate) terms: HashMap<String, PostingList>,
    /// Strictly sorted unique terms; the fuzzy search space.
    pub(crate) vocabulary: Vec<String>,
    /// gram → indices into `vocabulary`. Derived from the vocabulary at build
    /// and load time, never serialized.
    pub(crate) grams: HashMap<String, Vec<u32>>,
    /// Token count per document per field: `field_lengths[doc][field]`.
    pub(crate) field_lengths: Vec<Vec<u32>>,
    /// Mean token count per field across the corpus.
    pub(crate) avg_field_length: Vec<f64>,
    /// Tokenizer settings the index was built with. Queries run through the
    /// exact same pipeline - this is the symmetry invariant, carried as data
    /// instead of ambient state.
    pub(crate) tokenizer: crate::tokenizer::TokenizerConfig,
    /// Gram length of the fuzzy pre-filter.
    pub(crate) ngram_size: usize,
}

impl Index {
    /// Number of indexed documents.
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    /// Number of unique terms.
    pub fn term_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Total number of postings across all terms.
    pub fn posting_count(&self) -> usize {
        self.terms.values().map(|pl| pl.postings.len()).sum()
    }

    /// The fields this index was built over, in ordinal order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Resolve a field name to its ordinal.
    pub fn field_ordinal(&self, name: &str) -> Option<u16> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .map(|i| i as u16)
    }

    /// Key of a document by id.
    pub fn doc_key(&self, doc_id: DocId) -> Option<&str> {
        self.docs.get(doc_id.as_usize()).map(|d| d.key.as_str())
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Matched token positions within one field of a result document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// Field name (resolved from the ordinal for display).
    pub field: String,
    /// Token positions of matched terms, sorted ascending.
    pub positions: Vec<u32>,
}

/// A ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The document's opaque key.
    pub key: String,
    /// Relevance score (higher is better).
    pub score: f64,
    /// Caller metadata, returned verbatim.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Matched spans, empty unless highlighting was enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<Highlight>,
}

/// Check that an index satisfies its structural invariants (debug assertion).
pub(crate) fn check_index_well_formed(index: &Index) -> bool {
    if index.field_lengths.len() != index.docs.len() {
        return false;
    }
    if index.avg_field_length.len() != index.fields.len() {
        return false;
    }
    for lengths in &index.field_lengths {
        if lengths.len() != index.fields.len() {
            return false;
        }
    }
    if index.vocabulary.windows(2).any(|w| w[0] >= w[1]) {
        return false;
    }
    if index.vocabulary.len() != index.terms.len() {
        return false;
    }
    for (term, list) in &index.terms {
        if list.postings.is_empty() {
            return false;
        }
        for pair in list.postings.windows(2) {
            if (pair[0].doc_id, pair[0].field) >= (pair[1].doc_id, pair[1].field) {
                return false;
            }
        }
        let mut doc_ids: Vec<u32> = list.postings.iter().map(|p| p.doc_id).collect();
        doc_ids.dedup();
        if list.doc_freq as usize != doc_ids.len() {
            return false;
        }
        for posting in &list.postings {
            if posting.doc_id as usize >= index.docs.len() {
                return false;
            }
            if posting.field as usize >= index.fields.len() {
                return false;
            }
            if posting.positions.is_empty() {
                return false;
            }
            if posting.positions.windows(2).any(|w| w[0] >= w[1]) {
                return false;
            }
        }
        if index.vocabulary.binary_search(term).is_err() {
            return false;
        }
    }
    true
}
