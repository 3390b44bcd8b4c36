//! Highlight assembly.
//!
//! After execution the engine knows, per document, which vocabulary terms
//! matched. Highlighting maps those back to token positions via the same
//! posting lists that produced the match - no re-scanning of document text,
//! which the index does not even store.

use crate::types::{Highlight, Index};
use std::collections::BTreeMap;

/// Collect matched token positions for one result document, grouped by field.
///
/// Fields come out in ordinal order and positions sorted ascending, so the
/// output is deterministic.
pub(crate) fn build_highlights(index: &Index, doc_id: u32, term_idxs: &[u32]) -> Vec<Highlight> {
    let mut by_field: BTreeMap<u16, Vec<u32>> = BTreeMap::new();

    for &idx in term_idxs {
        let Some(term) = index.vocabulary.get(idx as usize) else {
            continue;
        };
        let Some(list) = index.terms.get(term) else {
            continue;
        };
        // Postings are doc-id sorted; jump straight to this document.
        let start = list.postings.partition_point(|p| p.doc_id < doc_id);
        for posting in &list.postings[start..] {
            if posting.doc_id != doc_id {
                break;
            }
            by_field
                .entry(posting.field)
                .or_default()
                .extend_from_slice(&posting.positions);
        }
    }

    by_field
        .into_iter()
        .map(|(field, mut positions)| {
            positions.sort_unstable();
            positions.dedup();
            Highlight {
                field: index
                    .fields
                    .get(field as usize)
                    .map(|f| f.name.clone())
                    .unwrap_or_default(),
                positions,
            }
        })
        .collect()
}
