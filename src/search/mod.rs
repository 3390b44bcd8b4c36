//! Query execution.
//!
//! Resolves a parsed query tree against an immutable index:
//!
//! - **Term leaves** resolve to candidate postings - an O(1) exact lookup at
//!   tolerance 0, otherwise a bounded fuzzy lookup over the vocabulary. When
//!   several vocabulary terms match one query term, each document keeps the
//!   best-scoring variant (max-dedup), so "fox~" never double-counts a
//!   document that contains both "fox" and "box".
//! - **Phrase leaves** intersect their terms' posting lists with a merge-join
//!   and then require positionally adjacent occurrences within one field.
//! - **Combinators** are set algebra over document ids: AND intersects,
//!   OR unions (scores sum in both), NOT complements against the corpus with
//!   zero score contribution.
//!
//! The merge-joins are linear because posting lists are sorted by doc id -
//! that sort order exists precisely for this. Execution never fails: an
//! unmatched query is an empty map, not an error.

use crate::query::QueryNode;
use crate::scoring::{ScoreBackend, ScoreCandidate};
use crate::types::{Index, PostingList};
use std::collections::HashMap;

/// Accumulated evidence for one document while a query tree is evaluated.
#[derive(Debug, Clone, Default)]
pub(crate) struct DocMatch {
    /// Summed score across the matched parts of the tree.
    pub score: f64,
    /// Matched vocabulary term indices, for highlight assembly.
    pub terms: Vec<u32>,
}

/// A ranked hit before result assembly.
#[derive(Debug, Clone)]
pub(crate) struct Hit {
    pub doc_id: u32,
    pub score: f64,
    pub terms: Vec<u32>,
}

/// Evaluate a query tree and rank the hits.
///
/// Ranking is deterministic: descending score, ascending doc id (insertion
/// order) on ties.
pub(crate) fn execute(node: &QueryNode, index: &Index, backend: &dyn ScoreBackend) -> Vec<Hit> {
    let matches = eval(node, index, backend);

    let mut hits: Vec<Hit> = matches
        .into_iter()
        .map(|(doc_id, m)| Hit {
            doc_id,
            score: m.score,
            terms: m.terms,
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
    hits
}

fn eval(node: &QueryNode, index: &Index, backend: &dyn ScoreBackend) -> HashMap<u32, DocMatch> {
    match node {
        QueryNode::Term {
            term,
            tolerance,
            field,
        } => eval_term(index, backend, term, *tolerance, field.as_deref()),
        QueryNode::Phrase { terms, field } => eval_phrase(index, backend, terms, field.as_deref()),
        QueryNode::And(children) => eval_and(children, index, backend),
        QueryNode::Or(children) => eval_or(children, index, backend),
        QueryNode::Not(child) => eval_not(child, index, backend),
    }
}

// =============================================================================
// LEAVES
// =============================================================================

fn eval_term(
    index: &Index,
    backend: &dyn ScoreBackend,
    term: &str,
    tolerance: u8,
    field: Option<&str>,
) -> HashMap<u32, DocMatch> {
    let field_ordinal = field.and_then(|name| index.field_ordinal(name));
    if field.is_some() && field_ordinal.is_none() {
        // Unknown fields are rejected before execution; this arm only guards
        // direct internal callers.
        return HashMap::new();
    }

    let matches = crate::fuzzy::lookup(index, term, tolerance);
    let mut doc_best: HashMap<u32, DocMatch> = HashMap::new();

    for m in matches {
        let vocab_term = &index.vocabulary[m.term_idx as usize];
        let Some(list) = index.terms.get(vocab_term) else {
            continue;
        };

        // Score this vocabulary term's postings in one backend call.
        let candidates: Vec<ScoreCandidate> = list
            .postings
            .iter()
            .filter(|p| field_ordinal.is_none_or(|f| p.field == f))
            .map(|p| ScoreCandidate {
                doc_id: p.doc_id,
                field: p.field,
                term_freq: p.term_freq(),
                doc_freq: list.doc_freq,
                distance: m.distance,
            })
            .collect();
        if candidates.is_empty() {
            continue;
        }
        let scores = backend.score(index, &candidates);

        // Sum fields per document for this variant...
        let mut per_doc: HashMap<u32, f64> = HashMap::new();
        for (candidate, score) in candidates.iter().zip(scores) {
            *per_doc.entry(candidate.doc_id).or_insert(0.0) += score;
        }

        // ...then keep the best-scoring variant per document across the
        // fuzzy match set.
        for (doc_id, score) in per_doc {
            let entry = doc_best.entry(doc_id).or_default();
            entry.score = entry.score.max(score);
            if !entry.terms.contains(&m.term_idx) {
                entry.terms.push(m.term_idx);
            }
        }
    }

    doc_best
}

fn eval_phrase(
    index: &Index,
    backend: &dyn ScoreBackend,
    terms: &[String],
    field: Option<&str>,
) -> HashMap<u32, DocMatch> {
    let field_ordinal = field.and_then(|name| index.field_ordinal(name));
    if field.is_some() && field_ordinal.is_none() {
        return HashMap::new();
    }
    if terms.is_empty() {
        return HashMap::new();
    }

    // Phrases are exact: one missing term and the phrase cannot occur.
    let mut lists = Vec::with_capacity(terms.len());
    let mut term_idxs = Vec::with_capacity(terms.len());
    for term in terms {
        let Some(list) = index.terms.get(term) else {
            return HashMap::new();
        };
        lists.push(list);
        match index.vocabulary.binary_search(term) {
            Ok(idx) => term_idxs.push(idx as u32),
            Err(_) => return HashMap::new(),
        }
    }

    // The rarest term gives the phrase its IDF: adjacency can only make a
    // match rarer than its rarest constituent.
    let min_doc_freq = lists.iter().map(|l| l.doc_freq).min().unwrap_or(0);

    // Merge-join document ids common to every list (lists are doc-id sorted).
    let candidate_docs = intersect_doc_ids(&lists);

    let mut candidates: Vec<ScoreCandidate> = Vec::new();
    for doc_id in candidate_docs {
        for field_ord in 0..index.fields.len() as u16 {
            if field_ordinal.is_some_and(|f| f != field_ord) {
                continue;
            }
            let occurrences = phrase_occurrences(&lists, doc_id, field_ord);
            if occurrences > 0 {
                candidates.push(ScoreCandidate {
                    doc_id,
                    field: field_ord,
                    term_freq: occurrences,
                    doc_freq: min_doc_freq,
                    distance: 0,
                });
            }
        }
    }

    let mut out: HashMap<u32, DocMatch> = HashMap::new();
    if candidates.is_empty() {
        return out;
    }
    let scores = backend.score(index, &candidates);
    for (candidate, score) in candidates.iter().zip(scores) {
        let entry = out.entry(candidate.doc_id).or_default();
        entry.score += score;
        for idx in &term_idxs {
            if !entry.terms.contains(idx) {
                entry.terms.push(*idx);
            }
        }
    }
    out
}

/// Doc ids present in every posting list (k-way merge over sorted lists).
fn intersect_doc_ids(lists: &[&PostingList]) -> Vec<u32> {
    let Some(first) = lists.first() else {
        return Vec::new();
    };

    let mut result: Vec<u32> = first.postings.iter().map(|p| p.doc_id).collect();
    result.dedup();

    for list in &lists[1..] {
        let mut other: Vec<u32> = list.postings.iter().map(|p| p.doc_id).collect();
        other.dedup();

        let mut merged = Vec::with_capacity(result.len().min(other.len()));
        let (mut i, mut j) = (0, 0);
        while i < result.len() && j < other.len() {
            match result[i].cmp(&other[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    merged.push(result[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        result = merged;
        if result.is_empty() {
            break;
        }
    }
    result
}

/// Count adjacency runs of the phrase's terms in one (doc, field).
///
/// Successive intersection: positions where term k can end a prefix of
/// length k+1 are `positions(term_k) ∩ (previous + 1)`.
fn phrase_occurrences(lists: &[&PostingList], doc_id: u32, field: u16) -> u32 {
    let mut current: Option<Vec<u32>> = None;

    for list in lists {
        let Some(positions) = field_positions(list, doc_id, field) else {
            return 0;
        };
        let next = match current {
            None => positions.to_vec(),
            Some(prev) => {
                // Both sides sorted: linear intersection of prev+1 with positions.
                let mut next = Vec::new();
                let (mut i, mut j) = (0, 0);
                while i < prev.len() && j < positions.len() {
                    let want = prev[i] + 1;
                    match want.cmp(&positions[j]) {
                        std::cmp::Ordering::Less => i += 1,
                        std::cmp::Ordering::Greater => j += 1,
                        std::cmp::Ordering::Equal => {
                            next.push(positions[j]);
                            i += 1;
                            j += 1;
                        }
                    }
                }
                next
            }
        };
        if next.is_empty() {
            return 0;
        }
        current = Some(next);
    }

    current.map_or(0, |v| v.len() as u32)
}

/// Positions of a term in one (doc, field), via binary search over the
/// doc-id-sorted posting list.
fn field_positions<'a>(list: &'a PostingList, doc_id: u32, field: u16) -> Option<&'a [u32]> {
    let postings = &list.postings;
    let idx = postings.partition_point(|p| (p.doc_id, p.field) < (doc_id, field));
    let posting = postings.get(idx)?;
    (posting.doc_id == doc_id && posting.field == field).then_some(posting.positions.as_slice())
}

// =============================================================================
// COMBINATORS
// =============================================================================

fn eval_and(
    children: &[QueryNode],
    index: &Index,
    backend: &dyn ScoreBackend,
) -> HashMap<u32, DocMatch> {
    let Some((first, rest)) = children.split_first() else {
        // And([]) is the empty query: matches nothing.
        return HashMap::new();
    };

    let mut acc = eval(first, index, backend);
    for child in rest {
        if acc.is_empty() {
            break;
        }
        let other = eval(child, index, backend);
        acc.retain(|doc_id, m| {
            if let Some(o) = other.get(doc_id) {
                m.score += o.score;
                for idx in &o.terms {
                    if !m.terms.contains(idx) {
                        m.terms.push(*idx);
                    }
                }
                true
            } else {
                false
            }
        });
    }
    acc
}

fn eval_or(
    children: &[QueryNode],
    index: &Index,
    backend: &dyn ScoreBackend,
) -> HashMap<u32, DocMatch> {
    let mut acc: HashMap<u32, DocMatch> = HashMap::new();
    for child in children {
        for (doc_id, m) in eval(child, index, backend) {
            let entry = acc.entry(doc_id).or_default();
            entry.score += m.score;
            for idx in m.terms {
                if !entry.terms.contains(&idx) {
                    entry.terms.push(idx);
                }
            }
        }
    }
    acc
}

fn eval_not(
    child: &QueryNode,
    index: &Index,
    backend: &dyn ScoreBackend,
) -> HashMap<u32, DocMatch> {
    let excluded = eval(child, index, backend);
    (0..index.docs.len() as u32)
        .filter(|doc_id| !excluded.contains_key(doc_id))
        .map(|doc_id| (doc_id, DocMatch::default()))
        .collect()
}
