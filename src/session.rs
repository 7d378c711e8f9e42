//! The restructuring driver.
//!
//! Walks each root, and for every source file in turn:
//!
//! 1. analyzes the text and prints warnings,
//! 2. applies canonical-form patches and writes the file,
//! 3. names every destructured module (map, then supplier) and rewrites its
//!    import into a namespace binding, writing the file again.
//!
//! Files are processed strictly one after another, so naming, persisting the
//! map, and prompting never interleave.

use crate::analyzer::{AnalyzeOptions, analyze};
use crate::names::{MapStore, ModuleNameMap};
use crate::naming::{NameRequest, NameSupplier, resolve_answer, suggest_name};
use crate::paths::{CanonicalPath, PathContext};
use crate::registry::{MultiImporterRecord, Warnings};
use crate::report;
use crate::rewriter::rewrite_destructured;
use crate::scanner::{FileFilter, collect_source_files};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Run configuration.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Only fix specifier forms; leave destructured imports alone.
    pub paths_only: bool,
    pub filter: FileFilter,
    pub verbose: bool,
    /// Suppress the per-file console report; stdout is left to the caller.
    pub quiet: bool,
}

/// Totals for a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub patches_applied: usize,
    pub warnings: usize,
    pub modules_named: usize,
    pub symbols_rewritten: usize,
}

/// What happened to one file.
#[derive(Debug, Default, Clone)]
pub struct FileOutcome {
    /// Root-relative path.
    pub path: String,
    pub warnings: Warnings,
    /// Comments of the applied canonical-form patches.
    pub changes: Vec<String>,
    /// Modules rewritten to a namespace binding, with the name used.
    pub renamed: Vec<(CanonicalPath, String)>,
    pub changed: bool,
}

pub struct Restructurer<S, N> {
    names: ModuleNameMap<S>,
    supplier: N,
    options: Options,
    /// Single-binding imports seen so far across the project.
    singles: BTreeMap<String, CanonicalPath>,
    eliminated: BTreeSet<String>,
    summary: RunSummary,
}

impl<S: MapStore, N: NameSupplier> Restructurer<S, N> {
    pub fn new(names: ModuleNameMap<S>, supplier: N, options: Options) -> Self {
        Self {
            names,
            supplier,
            options,
            singles: BTreeMap::new(),
            eliminated: BTreeSet::new(),
            summary: RunSummary::default(),
        }
    }

    /// Processes every root in order.
    pub fn run(&mut self, roots: &[PathBuf]) -> Result<RunSummary> {
        for root in roots {
            self.process_root(root)?;
        }
        Ok(self.summary.clone())
    }

    pub fn process_root(&mut self, root: &Path) -> Result<()> {
        let root = std::path::absolute(root)
            .with_context(|| format!("Failed to resolve {}", root.display()))?;
        let files = collect_source_files(&root, &self.options.filter)?;
        if self.options.verbose {
            report::info(&format!(
                "{} source files under {}",
                files.len(),
                root.display()
            ));
        }

        for file in files {
            self.process_file(&root, &file)?;
        }
        Ok(())
    }

    /// Analyzes, patches and rewrites one file in place.
    pub fn process_file(&mut self, root: &Path, file: &Path) -> Result<FileOutcome> {
        let rel = relative_path(root, file);
        let original = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let ctx = PathContext::new(root, rel.as_str());
        let opts = AnalyzeOptions {
            paths_only: self.options.paths_only,
        };
        let analysis = analyze(&original, &ctx, &self.names, opts)
            .with_context(|| format!("Failed to analyze {}", rel))?;
        self.summary.files_scanned += 1;

        let mut outcome = FileOutcome {
            path: rel.clone(),
            ..FileOutcome::default()
        };

        if analysis.is_notable() && !self.options.quiet {
            report::file_header(&rel, original.len());
        }
        for (_, message) in analysis.warnings.iter() {
            report::warning(message);
        }
        self.summary.warnings += analysis.warnings.len();

        let mut text = original.clone();
        for patch in &analysis.patches {
            text = patch.apply(&text);
            if !self.options.quiet {
                report::change(&patch.comment);
            }
            outcome.changes.push(patch.comment.clone());
        }
        self.summary.patches_applied += analysis.patches.len();
        if text != original {
            write_file(file, &text)?;
        }

        for (name, path) in analysis.singles.iter() {
            self.singles
                .entry(name.to_string())
                .or_insert_with(|| path.clone());
        }

        for (module, record) in analysis.multi.iter() {
            let name = self.module_name(module, record)?;
            let rewrite = rewrite_destructured(&text, &rel, &name, record)
                .with_context(|| format!("Failed to rewrite {} in {}", module, rel))?;
            text = rewrite.text;
            if self.options.verbose && !self.options.quiet {
                report::renamed(module, &name, &rewrite.symbols);
            }
            self.summary.symbols_rewritten += rewrite.symbols.len();
            self.eliminated.extend(rewrite.symbols);
            outcome.renamed.push((module.module_key(), name));
        }
        if !analysis.multi.is_empty() {
            write_file(file, &text)?;
            if !self.options.quiet {
                println!();
            }
        }

        outcome.changed = text != original;
        if outcome.changed {
            self.summary.files_changed += 1;
        }
        outcome.warnings = analysis.warnings;
        Ok(outcome)
    }

    /// Looks up the module's name, asking the supplier and persisting the
    /// answer if it has none yet.
    fn module_name(&mut self, module: &CanonicalPath, record: &MultiImporterRecord) -> Result<String> {
        let key = module.module_key();
        if let Some(name) = self.names.get(&key) {
            return Ok(name.to_string());
        }

        let suggestion = suggest_name(&key);
        let request = NameRequest {
            module: &key,
            specifier: &record.specifier,
            symbols: &record.symbols,
            suggestion: &suggestion,
        };
        let answer = self.supplier.ask(&request)?;
        let name = resolve_answer(&answer, &suggestion, &key)?;
        self.names.assign(&key, &name, &self.singles)?;
        self.summary.modules_named += 1;
        Ok(name)
    }

    /// Every distinct symbol turned into a member access, shortest first.
    pub fn eliminated_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.eliminated.iter().cloned().collect();
        symbols.sort_by_key(String::len);
        symbols
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn names(&self) -> &ModuleNameMap<S> {
        &self.names
    }

    pub fn supplier(&self) -> &N {
        &self.supplier
    }
}

/// Root-relative, `/`-separated form of `file`.
fn relative_path(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_file(file: &Path, text: &str) -> Result<()> {
    std::fs::write(file, text).with_context(|| format!("Failed to write {}", file.display()))
}
