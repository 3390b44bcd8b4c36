use clap::Parser;
use staticseek::build::{load_index, run_build};
use staticseek::cli::display::{
    color, format_size, savings, score_value, BOLD, DIM, GRAY, GREEN, YELLOW,
};
use staticseek::cli::{Cli, Commands};
use staticseek::{search, SearchOptions};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", color(YELLOW, &format!("error: {}", message)));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Index {
            input,
            output,
            config,
        } => cmd_index(&input, &output, config.as_deref()),
        Commands::Search {
            file,
            query,
            limit,
            highlight,
        } => cmd_search(&file, &query, limit, highlight),
        Commands::Inspect { file } => cmd_inspect(&file),
    }
}

fn cmd_index(input: &str, output: &str, config: Option<&str>) -> Result<(), String> {
    let summary = run_build(
        Path::new(input),
        Path::new(output),
        config.map(Path::new),
    )?;
    println!(
        "{} {} docs, {} terms, {} postings → {} ({})",
        color(GREEN, "indexed"),
        summary.doc_count,
        summary.term_count,
        summary.posting_count,
        output,
        format_size(summary.output_bytes),
    );
    Ok(())
}

fn cmd_search(file: &str, query: &str, limit: usize, highlight: bool) -> Result<(), String> {
    let index = load_index(Path::new(file))?;
    let options = SearchOptions {
        limit,
        highlight,
        ..SearchOptions::default()
    };
    let results = search(&index, query, options).map_err(|e| e.to_string())?;

    if results.is_empty() {
        println!("{}", color(GRAY, "no results"));
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        println!(
            "{:>3}. {} {}",
            rank + 1,
            score_value(result.score),
            color(BOLD, &result.key),
        );
        for h in &result.highlights {
            let positions: Vec<String> = h.positions.iter().map(u32::to_string).collect();
            println!(
                "     {} {}",
                color(DIM, &format!("{}:", h.field)),
                color(GRAY, &positions.join(", ")),
            );
        }
    }
    Ok(())
}

fn cmd_inspect(file: &str) -> Result<(), String> {
    let raw = std::fs::read(file).map_err(|e| format!("Failed to read {}: {}", file, e))?;
    let index = load_index(Path::new(file))?;

    let compressed_size = brotli_size(&raw)?;

    println!("{}", color(BOLD, file));
    println!("  format version  {}", staticseek::FORMAT_VERSION);
    println!("  documents       {}", index.doc_count());
    println!("  unique terms    {}", index.term_count());
    println!("  postings        {}", index.posting_count());
    let fields: Vec<String> = index
        .fields()
        .iter()
        .map(|f| format!("{} (×{})", f.name, f.weight))
        .collect();
    println!("  fields          {}", fields.join(", "));
    println!("  raw size        {}", format_size(raw.len()));
    println!(
        "  brotli size     {} ({} smaller)",
        format_size(compressed_size),
        savings(raw.len(), compressed_size),
    );
    Ok(())
}

/// Brotli-compressed size: what the index actually costs over the wire,
/// since static hosts serve it content-encoded.
fn brotli_size(raw: &[u8]) -> Result<usize, String> {
    let mut compressed = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut compressed, 4096, 9, 22);
        writer
            .write_all(raw)
            .map_err(|e| format!("Compression failed: {}", e))?;
    }
    Ok(compressed.len())
}
