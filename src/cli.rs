//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Each subcommand corresponds to a distinct operation: restructuring
//! imports, listing scan targets, or inspecting the persisted name map.

use clap::{Parser, Subcommand};
use js_restructure::names::DEFAULT_MAP_PATH;
use std::path::PathBuf;

/// Collapse destructured require() imports into namespace bindings.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Canonicalize require() paths and rewrite destructured imports in place.
    Restructure {
        /// Project roots to process. Defaults to current directory.
        dirs: Vec<PathBuf>,

        /// Only add missing trailing `/` or `.js` to require() paths.
        #[arg(long)]
        paths_only: bool,

        /// Module name map, created on first assignment.
        #[arg(long, default_value = DEFAULT_MAP_PATH)]
        map: PathBuf,

        /// Glob patterns for directories/files to exclude (e.g., "vendor", "*.min.js").
        /// By default, entries starting with `.` and `node_modules` are excluded.
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Disable default exclusion of `.` prefixed entries and `node_modules`.
        #[arg(long)]
        no_default_excludes: bool,

        /// Accept suggested module names without prompting.
        #[arg(short, long)]
        yes: bool,

        /// Emit the run summary as JSON.
        #[arg(long)]
        json: bool,

        /// Print additional diagnostics to stderr.
        #[arg(short, long)]
        verbose: bool,
    },

    /// List files that would be processed without touching them.
    Scan {
        /// Project roots to scan. Defaults to current directory.
        dirs: Vec<PathBuf>,

        /// Glob patterns for directories/files to exclude.
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Disable default exclusion of `.` prefixed entries and `node_modules`.
        #[arg(long)]
        no_default_excludes: bool,
    },

    /// Print the persisted module name map.
    Map {
        /// Module name map to read.
        #[arg(long, default_value = DEFAULT_MAP_PATH)]
        map: PathBuf,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}
