//! Language-aware tokenization.
//!
//! Turns raw field text into a sequence of normalized terms with token
//! positions. The same pipeline runs at index time and at query time - the
//! engine's correctness depends on that symmetry, so the configuration lives
//! inside the index rather than in any module-level state.
//!
//! # Pipeline
//!
//! 1. UAX#29 word segmentation (`unicode_words`) - punctuation, whitespace,
//!    and control characters never become terms.
//! 2. Per-word normalization: NFD decomposition, combining-mark removal,
//!    lowercasing (each step configurable).
//! 3. Script handling: words from scripts without whitespace word boundaries
//!    (Han, Hiragana, Katakana, Hangul) are split into fixed-length character
//!    n-grams so that two substrings a reader considers the same word produce
//!    the same grams. Everything else stays one term per word.
//! 4. Filtering: stop words and too-short terms are dropped. Dropped tokens do
//!    not consume a position - positions count indexed tokens only, which
//!    keeps phrase adjacency symmetric between index and query time.
//!
//! Tokenization never fails. Unrecognized content is skipped; an empty field
//! yields an empty sequence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// English stop words filtered by default.
///
/// Deliberately short: on doc-site corpora an aggressive list hurts more than
/// it helps (and causes false fuzzy matches like "land" → "and").
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "or", "that", "the", "to", "was", "will", "with",
];

/// Tokenizer settings, embedded in the index and reused verbatim for queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TokenizerConfig {
    /// Terms to drop after normalization. A `BTreeSet` so the serialized
    /// index is byte-identical across builds.
    pub stop_words: BTreeSet<String>,
    /// Minimum term length in characters; shorter terms are dropped.
    pub min_term_len: usize,
    /// Lowercase terms.
    pub fold_case: bool,
    /// Strip combining marks after NFD decomposition ("café" → "cafe").
    pub fold_diacritics: bool,
    /// Character n-gram length for scripts without word boundaries.
    pub cjk_ngram: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
            min_term_len: 1,
            fold_case: true,
            fold_diacritics: true,
            cjk_ngram: 2,
        }
    }
}

/// A normalized term and its token position within the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub position: u32,
}

/// Check if a character belongs to a script without whitespace word
/// boundaries (segmented by character n-grams instead).
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4e00}'..='\u{9fff}' |  // CJK Unified Ideographs
        '\u{3400}'..='\u{4dbf}' |  // CJK Extension A
        '\u{3040}'..='\u{309f}' |  // Hiragana
        '\u{30a0}'..='\u{30ff}' |  // Katakana
        '\u{ac00}'..='\u{d7af}'    // Hangul Syllables
    )
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
/// Examples: ́ (acute), ̄ (macron), ̣ (dot below)
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{0C00}'..='\u{0C7F}' |  // Telugu (some combining marks)
        '\u{0900}'..='\u{097F}' |  // Devanagari (some combining marks)
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Normalize a single word: NFD decompose, strip combining marks, lowercase.
///
/// This is the term-level normalization only - no segmentation. Applying it
/// to an already-normalized term is a no-op (the fixed-point property the
/// tests rely on).
pub fn normalize_word(word: &str, config: &TokenizerConfig) -> String {
    let folded: String = if config.fold_diacritics {
        word.nfd().filter(|c| !is_combining_mark(*c)).collect()
    } else {
        word.to_string()
    };
    if config.fold_case {
        folded.to_lowercase()
    } else {
        folded
    }
}

/// Tokenize one field's text into normalized terms with positions.
///
/// The text is first split into CJK and non-CJK spans. CJK spans must be cut
/// *before* UAX#29 segmentation - word-boundary rules split unspaced Han and
/// Hiragana per character, which would shred the n-gram scheme. Non-CJK spans
/// go through `unicode_words` as usual.
///
/// Deterministic: the same text and config always yield the same sequence.
/// Positions start at 0 per field and increase by 1 per emitted term.
pub fn tokenize(text: &str, config: &TokenizerConfig) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut position = 0u32;

    for (cjk, span) in script_spans(text) {
        if cjk {
            let run = normalize_word(span, config);
            emit_ngrams(&run, config, &mut position, &mut tokens);
        } else {
            for word in span.unicode_words() {
                let normalized = normalize_word(word, config);
                if !normalized.is_empty() {
                    emit_term(normalized, config, &mut position, &mut tokens);
                }
            }
        }
    }

    tokens
}

/// Tokenize a query literal through the exact pipeline used at index time.
///
/// Returns just the term sequence - the parser decides whether a multi-term
/// word becomes a phrase.
pub fn tokenize_terms(text: &str, config: &TokenizerConfig) -> Vec<String> {
    tokenize(text, config).into_iter().map(|t| t.term).collect()
}

/// Split text into maximal runs of CJK / non-CJK characters, in order.
fn script_spans(text: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;
    for (idx, c) in text.char_indices() {
        let cjk = is_cjk(c);
        match current {
            Some(kind) if kind == cjk => {}
            Some(kind) => {
                spans.push((kind, &text[start..idx]));
                start = idx;
                current = Some(cjk);
            }
            None => current = Some(cjk),
        }
    }
    if let Some(kind) = current {
        spans.push((kind, &text[start..]));
    }
    spans.into_iter()
}

/// Emit overlapping character n-grams for a CJK run. A run shorter than the
/// gram length is emitted whole - dropping it would make short words
/// unsearchable.
fn emit_ngrams(run: &str, config: &TokenizerConfig, position: &mut u32, out: &mut Vec<Token>) {
    let n = config.cjk_ngram.max(1);
    let chars: Vec<char> = run.chars().collect();
    if chars.len() <= n {
        emit_cjk_term(run.to_string(), config, position, out);
        return;
    }
    for start in 0..=(chars.len() - n) {
        let gram: String = chars[start..start + n].iter().collect();
        emit_cjk_term(gram, config, position, out);
    }
}

fn emit_term(term: String, config: &TokenizerConfig, position: &mut u32, out: &mut Vec<Token>) {
    if term.chars().count() < config.min_term_len {
        return;
    }
    if config.stop_words.contains(&term) {
        return;
    }
    out.push(Token {
        term,
        position: *position,
    });
    *position += 1;
}

/// CJK grams bypass the min-length filter: a single ideograph is a word.
fn emit_cjk_term(term: String, config: &TokenizerConfig, position: &mut u32, out: &mut Vec<Token>) {
    if config.stop_words.contains(&term) {
        return;
    }
    out.push(Token {
        term,
        position: *position,
    });
    *position += 1;
}
