//! Typo-tolerant term resolution.
//!
//! A fuzzy leaf query resolves against the index vocabulary in two stages:
//!
//! 1. **n-gram pre-filter**: candidate terms must share at least one character
//!    gram with the query. A term within edit distance `k` of a query with `g`
//!    grams shares at least `g - n·k` of them, so requiring one shared gram is
//!    sound whenever `g > n·k`. Below that the pre-filter cannot prune and we
//!    fall back to a length-filtered scan of the vocabulary - still bounded,
//!    because the length-difference check rejects most of it in O(1).
//! 2. **bounded Levenshtein** over the survivors, keeping the exact distance
//!    so scoring can apply the tolerance penalty.
//!
//! The pre-filter exists to bound fuzzy-match cost; it must never change the
//! result set. The `fuzzy_oracle` property tests compare both paths against a
//! full scan.

pub mod levenshtein;

pub use levenshtein::{levenshtein_bounded, levenshtein_within};

use crate::types::Index;
use std::collections::HashMap;

/// Maximum edit distance the query language accepts (`term~2`).
pub const MAX_TOLERANCE: u8 = 2;

/// A vocabulary term matched by a fuzzy lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Index into the vocabulary.
    pub term_idx: u32,
    /// Edit distance from the query term (0 for exact).
    pub distance: u8,
}

/// Overlapping character grams of a term, used both to build the pre-filter
/// map and to probe it. A term shorter than the gram length contributes itself
/// as its only gram.
pub fn term_grams(term: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = term.chars().collect();
    if chars.len() <= n {
        return vec![term.to_string()];
    }
    (0..=chars.len() - n)
        .map(|i| chars[i..i + n].iter().collect())
        .collect()
}

/// Build the gram → vocabulary-index map. Derived state: rebuilt on load,
/// never serialized. Deterministic because the vocabulary is sorted and gram
/// lists are appended in vocabulary order.
pub(crate) fn build_gram_map(vocabulary: &[String], n: usize) -> HashMap<String, Vec<u32>> {
    let mut grams: HashMap<String, Vec<u32>> = HashMap::new();
    for (idx, term) in vocabulary.iter().enumerate() {
        let mut seen = Vec::new();
        for gram in term_grams(term, n) {
            if seen.contains(&gram) {
                continue;
            }
            grams.entry(gram.clone()).or_default().push(idx as u32);
            seen.push(gram);
        }
    }
    grams
}

/// Resolve a query term against the vocabulary within `tolerance` edits.
///
/// Matches are returned in vocabulary (lexicographic) order, so downstream
/// accumulation is deterministic. Widening the tolerance only ever adds
/// matches - the monotonicity property tests pin this down.
pub fn lookup(index: &Index, term: &str, tolerance: u8) -> Vec<FuzzyMatch> {
    let tolerance = tolerance.min(MAX_TOLERANCE);
    if tolerance == 0 {
        return match index.vocabulary.binary_search(&term.to_string()) {
            Ok(idx) => vec![FuzzyMatch {
                term_idx: idx as u32,
                distance: 0,
            }],
            Err(_) => Vec::new(),
        };
    }

    let query_len = term.chars().count();
    let n = index.ngram_size;
    let grams = term_grams(term, n);

    // Shared-gram bound is only a real constraint when the query has more
    // grams than edits can destroy.
    let prefilter_sound = grams.len() > n * tolerance as usize;

    let mut matches = Vec::new();
    if prefilter_sound {
        let mut candidate_ids: Vec<u32> = grams
            .iter()
            .filter_map(|g| index.grams.get(g))
            .flat_map(|ids| ids.iter().copied())
            .collect();
        candidate_ids.sort_unstable();
        candidate_ids.dedup();

        for idx in candidate_ids {
            let candidate = &index.vocabulary[idx as usize];
            if let Some(d) = bounded_distance(term, query_len, candidate, tolerance) {
                matches.push(FuzzyMatch {
                    term_idx: idx,
                    distance: d,
                });
            }
        }
    } else {
        for (idx, candidate) in index.vocabulary.iter().enumerate() {
            if let Some(d) = bounded_distance(term, query_len, candidate, tolerance) {
                matches.push(FuzzyMatch {
                    term_idx: idx as u32,
                    distance: d,
                });
            }
        }
    }

    matches
}

#[inline]
fn bounded_distance(term: &str, term_len: usize, candidate: &str, tolerance: u8) -> Option<u8> {
    // Length check first: cheaper than even starting the DP.
    if candidate.chars().count().abs_diff(term_len) > tolerance as usize {
        return None;
    }
    levenshtein_bounded(term, candidate, tolerance as usize).map(|d| d as u8)
}
