//! Error types surfaced by the public API.
//!
//! Three failure families, matching how the engine can actually go wrong:
//!
//! - [`ConfigError`] - an invalid configuration value. Fails fast at
//!   `create_index` / `create_search_fn` time; nothing is guessed or clamped.
//! - [`QuerySyntaxError`] - a malformed query string. Carries the byte
//!   position of the offending character so a UI can point at it.
//! - [`SchemaError`] - a serialized index that cannot be trusted: wrong
//!   version, structurally broken, or failing its checksum.
//!
//! Tokenization anomalies (control characters, unrecognized scripts) are NOT
//! errors - the tokenizer skips them, since partially indexing a document
//! beats aborting a whole-site build.

use std::fmt;

/// Invalid configuration value, rejected before any work is done.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `fields` was empty - an index over nothing is a caller bug.
    NoFields,
    /// A field weight must be strictly positive.
    NonPositiveWeight { field: String, weight: f64 },
    /// The same field name was listed twice.
    DuplicateField { field: String },
    /// A query or option referenced a field name the index was not built with.
    UnknownField { field: String },
    /// Result limit must be at least 1; 0 is rejected, not clamped.
    NonPositiveLimit { limit: usize },
    /// `min_score` must be a finite number.
    NonFiniteMinScore,
    /// Fuzzy pre-filter gram length outside the supported 2..=4 range.
    BadNgramSize { size: usize },
    /// CJK segmentation gram length outside the supported 1..=3 range.
    BadCjkNgramSize { size: usize },
    /// Minimum term length of 0 would index empty terms.
    ZeroMinTermLength,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoFields => {
                write!(f, "index config lists no fields to index")
            }
            ConfigError::NonPositiveWeight { field, weight } => {
                write!(f, "field '{}' has non-positive weight {}", field, weight)
            }
            ConfigError::DuplicateField { field } => {
                write!(f, "field '{}' is listed more than once", field)
            }
            ConfigError::UnknownField { field } => {
                write!(f, "unknown field '{}'", field)
            }
            ConfigError::NonPositiveLimit { limit } => {
                write!(f, "result limit must be >= 1, got {}", limit)
            }
            ConfigError::NonFiniteMinScore => {
                write!(f, "min_score must be finite")
            }
            ConfigError::BadNgramSize { size } => {
                write!(f, "fuzzy n-gram size must be in 2..=4, got {}", size)
            }
            ConfigError::BadCjkNgramSize { size } => {
                write!(f, "cjk n-gram size must be in 1..=3, got {}", size)
            }
            ConfigError::ZeroMinTermLength => {
                write!(f, "min_term_len must be >= 1")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Malformed query string. `position` is a byte offset into the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySyntaxError {
    /// A `"` was opened and never closed.
    UnbalancedQuote { position: usize },
    /// A `(` without matching `)`.
    UnclosedParen { position: usize },
    /// A `)` with no `(` open.
    UnexpectedParen { position: usize },
    /// An operator (`OR`, `NOT`, `-`, `field:`) with nothing after it.
    EmptyClause { position: usize },
    /// `~` tolerance marker with an unsupported distance.
    BadTolerance { position: usize, found: String },
}

impl QuerySyntaxError {
    /// Byte offset of the offending character in the original query string.
    pub fn position(&self) -> usize {
        match self {
            QuerySyntaxError::UnbalancedQuote { position }
            | QuerySyntaxError::UnclosedParen { position }
            | QuerySyntaxError::UnexpectedParen { position }
            | QuerySyntaxError::EmptyClause { position }
            | QuerySyntaxError::BadTolerance { position, .. } => *position,
        }
    }
}

impl fmt::Display for QuerySyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySyntaxError::UnbalancedQuote { position } => {
                write!(f, "unbalanced quote at byte {}", position)
            }
            QuerySyntaxError::UnclosedParen { position } => {
                write!(f, "unclosed '(' at byte {}", position)
            }
            QuerySyntaxError::UnexpectedParen { position } => {
                write!(f, "unexpected ')' at byte {}", position)
            }
            QuerySyntaxError::EmptyClause { position } => {
                write!(f, "operator with empty clause at byte {}", position)
            }
            QuerySyntaxError::BadTolerance { position, found } => {
                write!(
                    f,
                    "bad fuzzy tolerance '{}' at byte {} (supported: 1..=2)",
                    found, position
                )
            }
        }
    }
}

impl std::error::Error for QuerySyntaxError {}

/// A serialized index that cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Version tag not recognized by this build.
    UnsupportedVersion { found: u32, supported: u32 },
    /// A prefix-sum offset array is not monotonically non-decreasing.
    NonMonotonicOffsets { array: &'static str, position: usize },
    /// An offset array has the wrong number of entries for its terms/postings.
    MismatchedLength {
        array: &'static str,
        expected: usize,
        found: usize,
    },
    /// A posting references a document that does not exist.
    DocIdOutOfRange { doc_id: u32, total_docs: usize },
    /// A posting references a field ordinal the index was not built with.
    FieldOutOfRange { field: u16, total_fields: usize },
    /// A posting carries no positions - term frequency would be zero.
    EmptyPosting { term_index: usize },
    /// A vocabulary term owns no postings at all.
    EmptyPostingList { term_index: usize },
    /// Vocabulary is not sorted or contains duplicates.
    UnsortedVocabulary { position: usize },
    /// Stored checksum does not match the recomputed one.
    ChecksumMismatch { stored: u32, computed: u32 },
    /// Embedded tokenizer or field configuration failed validation.
    BadEmbeddedConfig { reason: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnsupportedVersion { found, supported } => {
                write!(
                    f,
                    "unsupported index format version {} (this build reads {})",
                    found, supported
                )
            }
            SchemaError::NonMonotonicOffsets { array, position } => {
                write!(f, "offset array '{}' decreases at entry {}", array, position)
            }
            SchemaError::MismatchedLength {
                array,
                expected,
                found,
            } => {
                write!(
                    f,
                    "array '{}' has {} entries, expected {}",
                    array, found, expected
                )
            }
            SchemaError::DocIdOutOfRange { doc_id, total_docs } => {
                write!(f, "posting doc_id {} >= doc count {}", doc_id, total_docs)
            }
            SchemaError::FieldOutOfRange {
                field,
                total_fields,
            } => {
                write!(f, "posting field {} >= field count {}", field, total_fields)
            }
            SchemaError::EmptyPosting { term_index } => {
                write!(f, "term {} has a posting with no positions", term_index)
            }
            SchemaError::EmptyPostingList { term_index } => {
                write!(f, "term {} has no postings", term_index)
            }
            SchemaError::UnsortedVocabulary { position } => {
                write!(f, "vocabulary not strictly sorted at entry {}", position)
            }
            SchemaError::ChecksumMismatch { stored, computed } => {
                write!(
                    f,
                    "checksum mismatch: stored {:08x}, computed {:08x}",
                    stored, computed
                )
            }
            SchemaError::BadEmbeddedConfig { reason } => {
                write!(f, "embedded config invalid: {}", reason)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Umbrella error for the one-shot [`crate::search`] convenience call, which
/// can fail on either its options or its query string.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    Config(ConfigError),
    Query(QuerySyntaxError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Config(e) => write!(f, "{}", e),
            SearchError::Query(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Config(e) => Some(e),
            SearchError::Query(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SearchError {
    fn from(e: ConfigError) -> Self {
        SearchError::Config(e)
    }
}

impl From<QuerySyntaxError> for SearchError {
    fn from(e: QuerySyntaxError) -> Self {
        SearchError::Query(e)
    }
}
