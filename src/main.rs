//! js-restructure: collapse destructured `require()` imports into namespace
//! bindings across a JavaScript project.
//!
//! `let { a, b } = require('./foo/bar')` becomes
//! `let Bar = require('./foo/bar.js')`, and bare `a`/`b` uses become
//! `Bar.a`/`Bar.b`. Chosen names are persisted so every file importing the
//! same module agrees on one name.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Commands};
use colored::Colorize;
use js_restructure::names::{JsonFileStore, ModuleNameMap};
use js_restructure::naming::{AcceptSuggestions, NameSupplier, TerminalSupplier};
use js_restructure::report;
use js_restructure::scanner::{FileFilter, collect_source_files};
use js_restructure::session::{Options, Restructurer};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Restructure {
            dirs,
            paths_only,
            map,
            exclude,
            no_default_excludes,
            yes,
            json,
            verbose,
        } => {
            let options = Options {
                paths_only,
                filter: FileFilter::new(&exclude, !no_default_excludes)?,
                verbose,
                quiet: json,
            };
            let dirs = default_dirs(dirs);
            if yes {
                cmd_restructure(&dirs, &map, AcceptSuggestions, options, json)
            } else {
                cmd_restructure(&dirs, &map, TerminalSupplier, options, json)
            }
        }
        Commands::Scan {
            dirs,
            exclude,
            no_default_excludes,
        } => cmd_scan(
            &default_dirs(dirs),
            &FileFilter::new(&exclude, !no_default_excludes)?,
        ),
        Commands::Map { map, json } => cmd_map(&map, json),
    }
}

fn default_dirs(dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    if dirs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        dirs
    }
}

fn cmd_restructure<N: NameSupplier>(
    dirs: &[PathBuf],
    map: &Path,
    supplier: N,
    options: Options,
    json: bool,
) -> Result<()> {
    let verbose = options.verbose;
    if verbose {
        report::info(&format!("module map: {}", map.display()));
    }

    let names = ModuleNameMap::open(JsonFileStore::new(map))?;
    let mut restructurer = Restructurer::new(names, supplier, options);
    let summary = restructurer.run(dirs)?;
    let eliminated = restructurer.eliminated_symbols();

    if json {
        let output = serde_json::json!({
            "summary": summary,
            "eliminated": eliminated,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    report::eliminated_symbols(&eliminated);
    if verbose {
        report::summary(&summary);
    }
    Ok(())
}

fn cmd_scan(dirs: &[PathBuf], filter: &FileFilter) -> Result<()> {
    let mut files = Vec::new();
    for dir in dirs {
        files.extend(collect_source_files(dir, filter)?);
    }

    println!("Would scan {} files:", files.len());
    for file in files {
        println!("  {}", file.display());
    }

    Ok(())
}

fn cmd_map(map: &Path, json: bool) -> Result<()> {
    let names = ModuleNameMap::open(JsonFileStore::new(map))?;

    if json {
        println!("{}", serde_json::to_string_pretty(names.entries())?);
        return Ok(());
    }

    if names.is_empty() {
        println!("{} No module names assigned in {}", "info:".blue().bold(), map.display());
        return Ok(());
    }

    let width = names
        .entries()
        .keys()
        .map(|p| p.as_str().len())
        .max()
        .unwrap_or(0);
    for (path, name) in names.entries() {
        println!("  {}  {}", format!("{:<width$}", path.as_str()).dimmed(), name.green());
    }

    Ok(())
}
