//! Console reporting.

use crate::paths::CanonicalPath;
use crate::session::RunSummary;
use colored::Colorize;

/// `lib/api.js ( 1.25 KB)`
pub fn file_header(path: &str, bytes: usize) {
    let display = if path.contains('/') {
        path.to_string()
    } else {
        format!("./{path}")
    };
    let kb = bytes as f64 / 1024.0;
    println!("{} ({:>5.2} KB)", display.bold(), kb);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "warn:".yellow().bold(), message);
}

pub fn change(comment: &str) {
    println!("{} {}", "[change]".green(), comment);
}

pub fn renamed(module: &CanonicalPath, name: &str, symbols: &[String]) {
    println!(
        "{} {} => {} ({})",
        "[rename]".green(),
        module,
        name.cyan(),
        symbols.join(", ")
    );
}

pub fn info(message: &str) {
    eprintln!("{} {}", "info:".blue().bold(), message);
}

/// Lists every bare identifier the run eliminated, shortest first. Names that
/// are already all lowercase are flagged, since they rarely read well as
/// `Module.member` accesses.
pub fn eliminated_symbols(symbols: &[String]) {
    println!("{}", "Eliminated identifiers:".bold());
    for symbol in symbols {
        if *symbol == symbol.to_lowercase() {
            println!("{} {}", symbol, "<==========".yellow());
        } else {
            println!("{symbol}");
        }
    }
    println!();
}

pub fn summary(summary: &RunSummary) {
    eprintln!(
        "\n{} Files: {} scanned, {} changed; Patches: {}; Warnings: {}",
        "Summary:".bold(),
        summary.files_scanned,
        summary.files_changed,
        summary.patches_applied,
        summary.warnings
    );
    eprintln!(
        "         Modules named: {}, Symbols rewritten: {}",
        summary.modules_named, summary.symbols_rewritten
    );
}
