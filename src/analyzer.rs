//! Per-file import analysis.
//!
//! Runs the scanner over one file's text and sorts what it finds: canonical
//! form patches, warnings, plain single-binding imports, and destructured
//! imports eligible for a namespace rewrite. Nothing here touches the file.

use crate::error::RestructureError;
use crate::fixer::canonical_form_patch;
use crate::names::{MapStore, ModuleNameMap};
use crate::naming::is_identifier;
use crate::paths::PathContext;
use crate::registry::{MultiImporterRecord, MultiImporterRegistry, SingleImporters, Warnings};
use crate::rewriter::Patch;
use crate::scanner::{ImportKind, extract_imports};

/// Knobs for a single analysis pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// Only fix specifier forms; ignore destructured imports.
    pub paths_only: bool,
}

/// Everything learned from one file.
#[derive(Debug, Default)]
pub struct FileAnalysis {
    pub patches: Vec<Patch>,
    pub warnings: Warnings,
    pub singles: SingleImporters,
    pub multi: MultiImporterRegistry,
}

impl FileAnalysis {
    /// Whether the file deserves a header in the console report.
    pub fn is_notable(&self) -> bool {
        !self.warnings.is_empty() || !self.multi.is_empty()
    }
}

/// Analyzes `source`, the current text of `ctx.file`.
///
/// Fails with [`RestructureError::DuplicateImportName`] when a plain import
/// binds a name that the map already gave to a different module.
pub fn analyze<S: MapStore>(
    source: &str,
    ctx: &PathContext,
    names: &ModuleNameMap<S>,
    opts: AnalyzeOptions,
) -> Result<FileAnalysis, RestructureError> {
    let mut analysis = FileAnalysis::default();

    for import in extract_imports(source) {
        // Later stages see the specifier as it will read once patched.
        let mut literal = import.literal.clone();
        if let Some(patch) = canonical_form_patch(ctx, &import, &mut analysis.warnings) {
            literal = patch.replacement.clone();
            if !analysis.patches.iter().any(|p| p.pattern == patch.pattern) {
                analysis.patches.push(patch);
            }
        }
        let specifier = &literal[1..literal.len() - 1];
        let canonical = ctx.canonicalize(specifier);

        match import.kind {
            ImportKind::Destructured(symbols) => {
                if opts.paths_only || !canonical.is_local() || symbols.is_empty() {
                    continue;
                }
                if let Some(bad) = symbols.iter().find(|s| !is_identifier(s)) {
                    analysis.warnings.push(
                        canonical.as_str(),
                        format!(
                            "unsupported destructuring: {} {} = {} (near '{}')",
                            import.keyword,
                            import.binding.split_whitespace().collect::<Vec<_>>().join(" "),
                            literal,
                            bad
                        ),
                    );
                    continue;
                }
                let record = MultiImporterRecord {
                    specifier: literal.clone(),
                    binding: import.binding,
                    symbols,
                };
                // Keyed like the name map, so `./x/` and `./x/index.js` are one module.
                analysis.multi.record(
                    canonical.module_key(),
                    record,
                    &import.keyword,
                    &mut analysis.warnings,
                );
            }
            ImportKind::Single(name) => {
                if let Some(other) = names.reverse(&name)
                    && *other != canonical.module_key()
                {
                    return Err(RestructureError::DuplicateImportName {
                        name,
                        module: other.clone(),
                    });
                }
                analysis.singles.record(
                    &name,
                    canonical,
                    &import.keyword,
                    specifier,
                    &mut analysis.warnings,
                );
            }
        }
    }

    Ok(analysis)
}
