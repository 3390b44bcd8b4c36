//! Lightweight full-text search for static sites.
//!
//! Content is indexed once at build time, the index is serialized to a
//! portable JSON-encodable object and shipped as a static asset, and queries
//! run entirely client-side against the deserialized index - no server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ tokenizer.rs │────▶│  index.rs   │────▶│  codec.rs   │
//! │ (tokenize,   │     │(create_index│     │(portable    │
//! │  CJK n-grams)│     │ statistics) │     │ object form)│
//! └──────────────┘     └─────────────┘     └─────────────┘
//!        │                                        │
//!        ▼                                        ▼
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  query.rs    │────▶│  search.rs  │◀────│ scoring.rs  │
//! │ (parse tree) │     │ (execute)   │     │ (BM25 +     │
//! │              │     │             │     │  backends)  │
//! └──────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use staticseek::{create_index, search, Document, IndexConfig, SearchOptions};
//!
//! let index = create_index(&documents, IndexConfig::default())?;
//!
//! // Build time: persist as a static asset.
//! let blob = serde_json::to_string(&staticseek::index_to_object(&index))?;
//!
//! // Client side: load and query.
//! let portable = serde_json::from_str(&blob)?;
//! let index = staticseek::create_index_from_object(portable)?;
//! let results = search(&index, "quick fox", SearchOptions::default())?;
//! ```
//!
//! # Query language
//!
//! `quick fox` (implicit AND), `fox OR dog`, `NOT dog` / `-dog`,
//! `"quick brown"` (phrase), `quick~` / `quick~2` (typo tolerance),
//! `title:fox` (field restriction), parentheses for grouping.

// Module declarations
pub mod codec;
pub mod error;
pub mod fuzzy;
mod highlight;
pub mod index;
pub mod query;
pub mod scoring;
mod search;
pub mod search_fn;
pub mod tokenizer;
pub mod types;

pub mod build;
pub mod cli;

// Re-exports for the public API
pub use codec::{create_index_from_object, index_to_object, PortableIndex, FORMAT_VERSION};
pub use error::{ConfigError, QuerySyntaxError, SchemaError, SearchError};
pub use index::{create_index, IndexConfig};
#[cfg(feature = "parallel")]
pub use index::create_index_parallel;
pub use query::{parse, QueryNode};
pub use scoring::{CpuBackend, ScoreBackend, ScoreCandidate};
pub use search_fn::{create_search_fn, create_search_fn_with_backend, search, SearchOptions};
pub use tokenizer::{tokenize, TokenizerConfig};
pub use types::{DocId, Document, FieldSpec, Highlight, Index, SearchResult};
