//! Scoring functions and the pluggable scoring backend.
//!
//! Relevance is Okapi BM25 per (term, document, field), multiplied by the
//! field's configured weight and by a tolerance penalty for fuzzy matches,
//! then summed across the query's matched terms.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! - **TOLERANCE_PENALTY_MONOTONIC**: `penalty(0) = 1 > penalty(1) > penalty(2)`.
//!   An exact match must never score below a fuzzy match of the same term.
//! - **BACKEND_RANK_EQUIVALENCE**: any [`ScoreBackend`] must produce the same
//!   ranking as [`CpuBackend`] for the same candidates. Scores may differ in
//!   floating-point rounding; relative order may not. This is a correctness
//!   requirement on accelerators, not a performance note.

use crate::types::Index;

/// BM25 term-frequency saturation.
pub const BM25_K1: f64 = 1.2;
/// BM25 length-normalization strength.
pub const BM25_B: f64 = 0.75;

/// One (term, document, field) match, resolved and ready to score.
///
/// This is the unit the backend contract works in: the executor resolves
/// candidates on the CPU (lookups are pointer-chasing, not arithmetic), the
/// backend turns them into scores (pure arithmetic, the part worth
/// accelerating).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCandidate {
    pub doc_id: u32,
    pub field: u16,
    /// Occurrences of the matched term in this (doc, field).
    pub term_freq: u32,
    /// Documents containing the matched term.
    pub doc_freq: u32,
    /// Edit distance between query term and matched term.
    pub distance: u8,
}

/// Capability interface for scoring accelerators.
///
/// One method, selected at [`crate::create_search_fn`] time. An
/// implementation that reports `false` from [`ScoreBackend::is_available`]
/// is silently replaced by [`CpuBackend`] - an accelerator is a performance
/// optimization, never a correctness dependency.
pub trait ScoreBackend: Send + Sync {
    /// Score each candidate. Must return exactly `candidates.len()` scores,
    /// in order, ranking-equivalent to [`CpuBackend`].
    fn score(&self, index: &Index, candidates: &[ScoreCandidate]) -> Vec<f64>;

    /// Can this backend run here? Checked once at search-function creation.
    fn is_available(&self) -> bool {
        true
    }
}

/// Reference scoring path: scalar BM25 on the CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

impl ScoreBackend for CpuBackend {
    fn score(&self, index: &Index, candidates: &[ScoreCandidate]) -> Vec<f64> {
        candidates
            .iter()
            .map(|c| score_candidate(index, c))
            .collect()
    }
}

/// BM25 for one candidate, weighted by field and tolerance.
pub fn score_candidate(index: &Index, c: &ScoreCandidate) -> f64 {
    let field = c.field as usize;
    let field_len = index
        .field_lengths
        .get(c.doc_id as usize)
        .and_then(|l| l.get(field))
        .copied()
        .unwrap_or(0) as f64;
    let avg_len = index.avg_field_length.get(field).copied().unwrap_or(0.0);
    let weight = index.fields.get(field).map(|f| f.weight).unwrap_or(1.0);

    let bm25 = bm25(
        c.term_freq as f64,
        c.doc_freq as f64,
        index.docs.len() as f64,
        field_len,
        avg_len,
    );
    bm25 * weight * tolerance_penalty(c.distance)
}

/// Okapi BM25 for a single term-document-field triple.
///
/// IDF uses the `+ 1` variant so it never goes negative even for terms that
/// appear in every document - a real situation on two-page sites.
pub fn bm25(tf: f64, df: f64, total_docs: f64, field_len: f64, avg_field_len: f64) -> f64 {
    if tf <= 0.0 || total_docs <= 0.0 {
        return 0.0;
    }
    let idf = ((total_docs - df + 0.5) / (df + 0.5) + 1.0).ln();
    let norm = if avg_field_len > 0.0 {
        1.0 - BM25_B + BM25_B * field_len / avg_field_len
    } else {
        1.0
    };
    let tf_norm = (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * norm);
    idf * tf_norm
}

/// Discount for fuzzy matches: 1/(1+d).
///
/// Exact matches are unpenalized; distance 1 halves the contribution,
/// distance 2 cuts it to a third.
#[inline]
pub fn tolerance_penalty(distance: u8) -> f64 {
    1.0 / (1.0 + f64::from(distance))
}
