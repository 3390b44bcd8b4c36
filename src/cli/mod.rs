//! CLI definitions for the staticseek command-line interface.
//!
//! Three subcommands: `index` to build a serialized index from JSON
//! documents, `search` to query one, and `inspect` to examine its structure
//! and on-the-wire size (raw and brotli-compressed, since the artifact ships
//! over a network).

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "staticseek",
    about = "Full-text search index builder for static sites",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a search index from JSON documents
    Index {
        /// Documents file, or directory of .json document files
        #[arg(short, long)]
        input: String,

        /// Output path for the serialized index
        #[arg(short, long)]
        output: String,

        /// Path to an IndexConfig JSON file (default: title + body fields)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Search a serialized index and display results
    Search {
        /// Path to the serialized index
        file: String,

        /// Search query (supports OR, NOT/-, "phrases", term~, field:term)
        query: String,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Show matched token positions per field
        #[arg(long)]
        highlight: bool,
    },

    /// Inspect a serialized index's structure and size
    Inspect {
        /// Path to the serialized index
        file: String,
    },
}
