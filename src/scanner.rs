//! JavaScript source scanner.
//!
//! Recursively walks directories to collect `.js` files, skipping hidden
//! entries and `node_modules`. A small cursor-based matcher then extracts
//! `require()` statements of the shape
//!
//! ```text
//! <var|let|const> <binding> = require(<quoted path>)
//! ```
//!
//! where `<binding>` is an identifier or a `{ ... }` destructuring list. The
//! matcher knows nothing about rewriting; it only produces [`RawImportMatch`]
//! records.

use anyhow::{Context, Result};
use glob::Pattern;
use std::ops::Range;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions treated as JavaScript sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

const KEYWORDS: &[&str] = &["const", "let", "var"];

/// One extracted import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImportMatch {
    /// `var`, `let` or `const`.
    pub keyword: String,
    /// Binding text exactly as written, e.g. `{ a,\n  b }` or `Foo`.
    pub binding: String,
    /// Path literal including its quotes, e.g. `'./foo'`.
    pub literal: String,
    /// Path literal without quotes.
    pub specifier: String,
    /// Byte range of the whole statement.
    pub span: Range<usize>,
    pub kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    /// `let Foo = require(...)`
    Single(String),
    /// `let { a, b } = require(...)`, with the collapsed symbol list.
    Destructured(Vec<String>),
}

impl RawImportMatch {
    pub fn is_destructured(&self) -> bool {
        matches!(self.kind, ImportKind::Destructured(_))
    }

    /// Opening (and closing) quote character of the literal.
    pub fn quote(&self) -> char {
        self.literal.chars().next().unwrap_or('\'')
    }
}

/// Which entries the directory walk skips.
#[derive(Debug, Clone)]
pub struct FileFilter {
    /// User supplied glob patterns, matched against entry names and
    /// root-relative paths.
    pub excludes: Vec<Pattern>,
    /// Skip `.`-prefixed entries and `node_modules`.
    pub default_excludes: bool,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            excludes: Vec::new(),
            default_excludes: true,
        }
    }
}

impl FileFilter {
    /// Compiles `patterns` into a filter.
    pub fn new(patterns: &[String], default_excludes: bool) -> Result<Self> {
        let excludes = patterns
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern '{}'", p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            excludes,
            default_excludes,
        })
    }

    fn is_excluded(&self, root: &Path, entry: &walkdir::DirEntry) -> bool {
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };
        if self.default_excludes && (name.starts_with('.') || name == "node_modules") {
            return true;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        self.excludes
            .iter()
            .any(|p| p.matches(name) || p.matches_path(rel))
    }
}

/// Collects JavaScript sources under `root`, sorted by path.
pub fn collect_source_files(root: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !filter.is_excluded(root, e))
    {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
        {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Extracts every `require()` statement from `source`, in order of appearance.
pub fn extract_imports(source: &str) -> Vec<RawImportMatch> {
    let bytes = source.as_bytes();
    let mut imports = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let at_word_start =
            bytes[pos].is_ascii_alphabetic() && (pos == 0 || !is_ident_byte(bytes[pos - 1]));
        if at_word_start && let Some(found) = match_statement(source, pos) {
            pos = found.span.end;
            imports.push(found);
            continue;
        }
        pos += 1;
    }

    imports
}

fn match_statement(source: &str, start: usize) -> Option<RawImportMatch> {
    let mut cursor = Cursor { src: source, pos: start };

    let keyword = KEYWORDS.iter().find(|kw| cursor.rest().starts_with(*kw))?;
    cursor.pos += keyword.len();
    if cursor.skip_ws() == 0 {
        return None;
    }

    let binding = if cursor.peek() == Some(b'{') {
        cursor.braced()?
    } else {
        cursor.ident()?
    };

    cursor.skip_ws();
    cursor.expect("=")?;
    cursor.skip_ws();
    cursor.expect("require")?;
    cursor.skip_ws();
    cursor.expect("(")?;
    cursor.skip_ws();
    let (literal, specifier) = cursor.quoted()?;
    cursor.skip_ws();
    cursor.expect(")")?;

    let kind = match binding.strip_prefix('{').and_then(|b| b.strip_suffix('}')) {
        Some(inner) => ImportKind::Destructured(collapse_symbols(inner)),
        None => ImportKind::Single(binding.to_string()),
    };

    Some(RawImportMatch {
        keyword: keyword.to_string(),
        binding: binding.to_string(),
        literal: literal.to_string(),
        specifier: specifier.to_string(),
        span: start..cursor.pos,
        kind,
    })
}

/// `{ foo,\n bar, }` => `["foo", "bar"]`
fn collapse_symbols(inner: &str) -> Vec<String> {
    inner
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    /// Skips whitespace and returns how many bytes were consumed.
    fn skip_ws(&mut self) -> usize {
        let skipped: usize = self
            .rest()
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        self.pos += skipped;
        skipped
    }

    fn expect(&mut self, lit: &str) -> Option<()> {
        if self.rest().starts_with(lit) {
            self.pos += lit.len();
            Some(())
        } else {
            None
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let len = self.rest().bytes().take_while(|b| is_ident_byte(*b)).count();
        if len == 0 {
            return None;
        }
        let ident = &self.rest()[..len];
        self.pos += len;
        Some(ident)
    }

    /// `{` followed by at least one non-`}` character and a closing `}`.
    fn braced(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let close = rest.find('}')?;
        if close < 2 {
            return None;
        }
        let braced = &rest[..=close];
        self.pos += close + 1;
        Some(braced)
    }

    /// A single-line string literal. Returns `(with quotes, without quotes)`.
    fn quoted(&mut self) -> Option<(&'a str, &'a str)> {
        let rest = self.rest();
        let quote = rest.chars().next().filter(|c| matches!(c, '\'' | '"' | '`'))?;
        let body = &rest[1..];
        let close = body.find(|c: char| c == quote || c == '\n')?;
        if close == 0 || !body[close..].starts_with(quote) {
            return None;
        }
        let literal = &rest[..close + 2];
        let inner = &body[..close];
        self.pos += literal.len();
        Some((literal, inner))
    }
}
