//! Text rewriting for applying fixes.
//!
//! Two kinds of edits live here. [`Patch`] is a declarative, global literal
//! substitution used for canonical-form fixes. [`rewrite_destructured`] turns a
//! destructuring import into a namespace binding:
//!
//! ```text
//! let { a, b } = require('./foo/bar.js');   let Bar = require('./foo/bar.js');
//! a(b);                                  => Bar.a(Bar.b);
//! ```

use crate::error::RestructureError;
use crate::registry::MultiImporterRecord;
use regex::{Captures, Regex};

/// A global text substitution. Applying it never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub pattern: String,
    pub replacement: String,
    /// Human readable description shown when the patch is applied.
    pub comment: String,
}

impl Patch {
    pub fn new(
        pattern: impl Into<String>,
        replacement: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            comment: comment.into(),
        }
    }

    /// Replaces every occurrence of the pattern.
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.pattern, &self.replacement)
    }
}

/// Applies patches in order.
pub fn apply_patches(content: &str, patches: &[Patch]) -> String {
    patches
        .iter()
        .fold(content.to_string(), |text, patch| patch.apply(&text))
}

/// Result of a namespace rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Bare identifiers that were turned into member accesses.
    pub symbols: Vec<String>,
}

/// Rewrites `record`'s destructuring import in `text` to bind `name` instead,
/// and qualifies every bare use of a destructured symbol as `name.symbol`.
///
/// Fails with [`RestructureError::NameCollision`] if `name` already occurs as a
/// whole word in `text`. `file` only labels that error.
pub fn rewrite_destructured(
    text: &str,
    file: &str,
    name: &str,
    record: &MultiImporterRecord,
) -> Result<Rewrite, RestructureError> {
    let existing = Regex::new(&format!(r"\b{}\b", regex::escape(name)))?;
    if existing.is_match(text) {
        return Err(RestructureError::NameCollision {
            name: name.to_string(),
            file: file.to_string(),
        });
    }

    // The whole destructuring goes first; the per-symbol patterns below would
    // otherwise match inside it.
    let mut text = text.replace(&record.binding, name);

    let mut symbols = Vec::with_capacity(record.symbols.len());
    for symbol in &record.symbols {
        // Start of text, whitespace, `(` or `[`, but never `.`.
        let bare = Regex::new(&format!(r"(^|\s|\(|\[)({})\b", regex::escape(symbol)))?;
        text = bare
            .replace_all(&text, |caps: &Captures| {
                format!("{}{}.{}", &caps[1], name, &caps[2])
            })
            .into_owned();
        symbols.push(symbol.clone());
    }

    Ok(Rewrite { text, symbols })
}
