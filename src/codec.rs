//! Portable index format.
//!
//! [`PortableIndex`] is the JSON-encodable form of an [`Index`]: what a build
//! pipeline writes as a static asset and a client page loads back. The layout
//! below is a stable contract - change it and you bump [`FORMAT_VERSION`], so
//! an old blob fails loudly with a [`SchemaError`] instead of silently
//! mis-parsing.
//!
//! # Layout (format version 1)
//!
//! Flat arrays of primitives, not nested object graphs - this serializes
//! small and parses fast on the client:
//!
//! - `terms[i]` owns postings `posting_offsets[i] .. posting_offsets[i+1]`
//!   (prefix sums; parallel arrays `posting_doc_ids` / `posting_fields`).
//! - posting `j` owns positions `position_offsets[j] .. position_offsets[j+1]`.
//! - `field_lengths` is row-major `docs × fields`.
//! - `checksum` is a CRC32 over the primitive payload.
//!
//! Derived state (doc frequencies, average field lengths, the fuzzy gram map)
//! is deliberately absent: it is recomputed deterministically on load, and
//! statistics that cannot drift from their source cannot break scoring after
//! a round-trip.

use crate::error::SchemaError;
use crate::fuzzy::build_gram_map;
use crate::tokenizer::TokenizerConfig;
use crate::types::{FieldSpec, Index, Posting, PostingList, StoredDoc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The only format version this build reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// Self-contained, JSON-encodable index representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PortableIndex {
    pub version: u32,
    pub field_names: Vec<String>,
    pub field_weights: Vec<f64>,
    pub doc_keys: Vec<String>,
    pub doc_metadata: Vec<serde_json::Value>,
    /// Row-major `docs × fields` token counts.
    pub field_lengths: Vec<u32>,
    /// Strictly sorted vocabulary.
    pub terms: Vec<String>,
    /// `terms.len() + 1` prefix sums into the posting arrays.
    pub posting_offsets: Vec<u32>,
    pub posting_doc_ids: Vec<u32>,
    pub posting_fields: Vec<u16>,
    /// `posting_doc_ids.len() + 1` prefix sums into `positions`.
    pub position_offsets: Vec<u32>,
    pub positions: Vec<u32>,
    pub tokenizer: TokenizerConfig,
    pub ngram_size: u32,
    /// CRC32 over the primitive payload.
    pub checksum: u32,
}

/// CRC32 over everything that determines search behavior.
///
/// Metadata is excluded on purpose: it is opaque caller data, returned
/// verbatim, and has no influence on matching or ranking.
fn payload_checksum(p: &PortableIndex) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&p.version.to_le_bytes());
    for name in &p.field_names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    for weight in &p.field_weights {
        hasher.update(&weight.to_le_bytes());
    }
    for key in &p.doc_keys {
        hasher.update(key.as_bytes());
        hasher.update(&[0]);
    }
    for v in &p.field_lengths {
        hasher.update(&v.to_le_bytes());
    }
    for term in &p.terms {
        hasher.update(term.as_bytes());
        hasher.update(&[0]);
    }
    for v in &p.posting_offsets {
        hasher.update(&v.to_le_bytes());
    }
    for v in &p.posting_doc_ids {
        hasher.update(&v.to_le_bytes());
    }
    for v in &p.posting_fields {
        hasher.update(&v.to_le_bytes());
    }
    for v in &p.position_offsets {
        hasher.update(&v.to_le_bytes());
    }
    for v in &p.positions {
        hasher.update(&v.to_le_bytes());
    }
    hasher.finalize()
}

/// Serialize an index to its portable object form.
///
/// Deterministic: terms are written in vocabulary (lexicographic) order and
/// postings in their sorted (doc, field) order, so the same index always
/// produces byte-identical JSON.
pub fn index_to_object(index: &Index) -> PortableIndex {
    let mut posting_offsets = Vec::with_capacity(index.vocabulary.len() + 1);
    let mut posting_doc_ids = Vec::new();
    let mut posting_fields = Vec::new();
    let mut position_offsets = vec![0u32];
    let mut positions = Vec::new();

    posting_offsets.push(0);
    for term in &index.vocabulary {
        let list = &index.terms[term];
        for posting in &list.postings {
            posting_doc_ids.push(posting.doc_id);
            posting_fields.push(posting.field);
            positions.extend_from_slice(&posting.positions);
            position_offsets.push(positions.len() as u32);
        }
        posting_offsets.push(posting_doc_ids.len() as u32);
    }

    let field_lengths: Vec<u32> = index
        .field_lengths
        .iter()
        .flat_map(|row| row.iter().copied())
        .collect();

    let mut portable = PortableIndex {
        version: FORMAT_VERSION,
        field_names: index.fields.iter().map(|f| f.name.clone()).collect(),
        field_weights: index.fields.iter().map(|f| f.weight).collect(),
        doc_keys: index.docs.iter().map(|d| d.key.clone()).collect(),
        doc_metadata: index.docs.iter().map(|d| d.metadata.clone()).collect(),
        field_lengths,
        terms: index.vocabulary.clone(),
        posting_offsets,
        posting_doc_ids,
        posting_fields,
        position_offsets,
        positions,
        tokenizer: index.tokenizer.clone(),
        ngram_size: index.ngram_size as u32,
        checksum: 0,
    };
    portable.checksum = payload_checksum(&portable);
    portable
}

/// Validate a prefix-sum offset array: right length, starts at 0, monotonic,
/// ends at the payload length.
fn check_offsets(
    name: &'static str,
    offsets: &[u32],
    expected_len: usize,
    payload_len: usize,
) -> Result<(), SchemaError> {
    if offsets.len() != expected_len {
        return Err(SchemaError::MismatchedLength {
            array: name,
            expected: expected_len,
            found: offsets.len(),
        });
    }
    if offsets.first() != Some(&0) {
        return Err(SchemaError::NonMonotonicOffsets {
            array: name,
            position: 0,
        });
    }
    for (i, pair) in offsets.windows(2).enumerate() {
        if pair[0] > pair[1] {
            return Err(SchemaError::NonMonotonicOffsets {
                array: name,
                position: i + 1,
            });
        }
    }
    if *offsets.last().unwrap_or(&0) as usize != payload_len {
        return Err(SchemaError::MismatchedLength {
            array: name,
            expected: payload_len,
            found: *offsets.last().unwrap_or(&0) as usize,
        });
    }
    Ok(())
}

/// Deserialize a portable object back into a queryable index.
///
/// Fails with [`SchemaError`] on version mismatch or any structural
/// corruption - a blob that passes here answers every query exactly as the
/// index it was serialized from.
pub fn create_index_from_object(portable: PortableIndex) -> Result<Index, SchemaError> {
    if portable.version != FORMAT_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            found: portable.version,
            supported: FORMAT_VERSION,
        });
    }

    let computed = payload_checksum(&portable);
    if computed != portable.checksum {
        return Err(SchemaError::ChecksumMismatch {
            stored: portable.checksum,
            computed,
        });
    }

    let num_fields = portable.field_names.len();
    let num_docs = portable.doc_keys.len();

    if portable.field_weights.len() != num_fields {
        return Err(SchemaError::MismatchedLength {
            array: "fieldWeights",
            expected: num_fields,
            found: portable.field_weights.len(),
        });
    }
    if portable.doc_metadata.len() != num_docs {
        return Err(SchemaError::MismatchedLength {
            array: "docMetadata",
            expected: num_docs,
            found: portable.doc_metadata.len(),
        });
    }
    if portable.field_lengths.len() != num_docs * num_fields {
        return Err(SchemaError::MismatchedLength {
            array: "fieldLengths",
            expected: num_docs * num_fields,
            found: portable.field_lengths.len(),
        });
    }
    if portable.posting_fields.len() != portable.posting_doc_ids.len() {
        return Err(SchemaError::MismatchedLength {
            array: "postingFields",
            expected: portable.posting_doc_ids.len(),
            found: portable.posting_fields.len(),
        });
    }

    check_offsets(
        "postingOffsets",
        &portable.posting_offsets,
        portable.terms.len() + 1,
        portable.posting_doc_ids.len(),
    )?;
    check_offsets(
        "positionOffsets",
        &portable.position_offsets,
        portable.posting_doc_ids.len() + 1,
        portable.positions.len(),
    )?;

    for (i, pair) in portable.terms.windows(2).enumerate() {
        if pair[0] >= pair[1] {
            return Err(SchemaError::UnsortedVocabulary { position: i + 1 });
        }
    }

    let fields: Vec<FieldSpec> = portable
        .field_names
        .iter()
        .cloned()
        .zip(portable.field_weights.iter().copied())
        .map(|(name, weight)| FieldSpec { name, weight })
        .collect();

    // Embedded config must itself be valid, or queries would behave
    // differently from index time.
    let embedded = crate::index::IndexConfig {
        fields: fields.clone(),
        tokenizer: portable.tokenizer.clone(),
        ngram_size: portable.ngram_size as usize,
    };
    embedded
        .validate()
        .map_err(|e| SchemaError::BadEmbeddedConfig {
            reason: e.to_string(),
        })?;

    // Rebuild posting lists term by term.
    let mut terms: HashMap<String, PostingList> = HashMap::with_capacity(portable.terms.len());
    for (term_index, term) in portable.terms.iter().enumerate() {
        let start = portable.posting_offsets[term_index] as usize;
        let end = portable.posting_offsets[term_index + 1] as usize;
        if start == end {
            return Err(SchemaError::EmptyPostingList { term_index });
        }

        let mut postings = Vec::with_capacity(end - start);
        for j in start..end {
            let doc_id = portable.posting_doc_ids[j];
            if doc_id as usize >= num_docs {
                return Err(SchemaError::DocIdOutOfRange {
                    doc_id,
                    total_docs: num_docs,
                });
            }
            let field = portable.posting_fields[j];
            if field as usize >= num_fields {
                return Err(SchemaError::FieldOutOfRange {
                    field,
                    total_fields: num_fields,
                });
            }
            let pos_start = portable.position_offsets[j] as usize;
            let pos_end = portable.position_offsets[j + 1] as usize;
            if pos_start == pos_end {
                return Err(SchemaError::EmptyPosting { term_index });
            }
            let positions = portable.positions[pos_start..pos_end].to_vec();
            for (k, pair) in positions.windows(2).enumerate() {
                if pair[0] >= pair[1] {
                    return Err(SchemaError::NonMonotonicOffsets {
                        array: "positions",
                        position: pos_start + k + 1,
                    });
                }
            }
            postings.push(Posting {
                doc_id,
                field,
                positions,
            });
        }

        for (k, pair) in postings.windows(2).enumerate() {
            if (pair[0].doc_id, pair[0].field) >= (pair[1].doc_id, pair[1].field) {
                return Err(SchemaError::NonMonotonicOffsets {
                    array: "postingDocIds",
                    position: start + k + 1,
                });
            }
        }

        let mut doc_ids: Vec<u32> = postings.iter().map(|p| p.doc_id).collect();
        doc_ids.dedup();
        let doc_freq = doc_ids.len() as u32;

        terms.insert(term.clone(), PostingList { postings, doc_freq });
    }

    let docs: Vec<StoredDoc> = portable
        .doc_keys
        .into_iter()
        .zip(portable.doc_metadata)
        .map(|(key, metadata)| StoredDoc { key, metadata })
        .collect();

    // num_fields >= 1 here: the embedded config validation rejected empty fields.
    let field_lengths: Vec<Vec<u32>> = portable
        .field_lengths
        .chunks(num_fields)
        .map(<[u32]>::to_vec)
        .collect();

    let avg_field_length: Vec<f64> = (0..num_fields)
        .map(|f| {
            if num_docs == 0 {
                0.0
            } else {
                let total: u64 = field_lengths.iter().map(|row| u64::from(row[f])).sum();
                total as f64 / num_docs as f64
            }
        })
        .collect();

    let grams = build_gram_map(&portable.terms, portable.ngram_size as usize);

    let index = Index {
        docs,
        fields,
        terms,
        vocabulary: portable.terms,
        grams,
        field_lengths,
        avg_field_length,
        tokenizer: portable.tokenizer,
        ngram_size: portable.ngram_size as usize,
    };
    debug_assert!(crate::types::check_index_well_formed(&index));
    Ok(index)
}
