//! Terminal display utilities for the staticseek CLI.
//!
//! ANSI color helpers that respect `NO_COLOR` and non-TTY pipelines, plus a
//! few semantic formatters for sizes and scores.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const GRAY: &str = "\x1b[90m";

/// Check if colors should be used (TTY detection).
pub fn use_colors() -> bool {
    // Respect NO_COLOR standard
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply color if TTY, otherwise return plain text.
pub fn color(c: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", c, text, RESET)
    } else {
        text.to_string()
    }
}

/// Format bytes as human-readable size.
pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Savings percentage of compressed vs. raw size.
pub fn savings(raw: usize, compressed: usize) -> String {
    if raw == 0 {
        return "n/a".to_string();
    }
    let pct = (1.0 - compressed as f64 / raw as f64) * 100.0;
    format!("{:.0}%", pct)
}

/// Score formatted for the result listing.
pub fn score_value(score: f64) -> String {
    color(CYAN, &format!("{:>8.3}", score))
}
