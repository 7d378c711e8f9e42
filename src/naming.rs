//! Choosing a namespace name for a module.
//!
//! A default name is derived from the module path ([`suggest_name`]); a
//! [`NameSupplier`] may override it. On the terminal that is a dialoguer
//! prompt, elsewhere it can be scripted or skipped.

use crate::error::RestructureError;
use crate::paths::{CanonicalPath, KNOWN_EXTENSIONS};
use anyhow::{Context, Result};

/// Everything a supplier needs to pick a name for one module.
#[derive(Debug, Clone, Copy)]
pub struct NameRequest<'a> {
    /// Module key the name will be stored under.
    pub module: &'a CanonicalPath,
    /// Path literal as written in the importing file.
    pub specifier: &'a str,
    /// Symbols that will be prefixed with the name.
    pub symbols: &'a [String],
    pub suggestion: &'a str,
}

impl NameRequest<'_> {
    /// Question shown before reading an answer; the suggestion is the default.
    pub fn prompt(&self) -> String {
        format!(
            "What should we name {}?\n(prefix for {:?})\n[{}]",
            self.specifier, self.symbols, self.suggestion
        )
    }
}

/// Source of a human- or machine-chosen name.
pub trait NameSupplier {
    /// Returns the chosen name. An empty answer accepts the suggestion.
    fn ask(&mut self, request: &NameRequest<'_>) -> Result<String>;
}

/// Asks on the terminal. Dialoguer draws on stderr, so stdout stays clean.
#[derive(Debug, Default)]
pub struct TerminalSupplier;

impl NameSupplier for TerminalSupplier {
    fn ask(&mut self, request: &NameRequest<'_>) -> Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(request.prompt())
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Failed to read a name for {}", request.module))
    }
}

/// Takes every suggestion without asking.
#[derive(Debug, Default)]
pub struct AcceptSuggestions;

impl NameSupplier for AcceptSuggestions {
    fn ask(&mut self, _request: &NameRequest<'_>) -> Result<String> {
        Ok(String::new())
    }
}

/// Derives a namespace name from a module key.
///
/// `./lib/foo-bar.js` => `FooBar`, `./lib/util/strings.js` => `StringsUtil`,
/// `./lib/models/` => `Models`, `./app/models/user.js` => `UserModel`.
///
/// The result is always an identifier or empty: other characters are dropped
/// and a leading digit gets a `_` prefix (`./lib/2fa.js` => `_2fa`).
pub fn suggest_name(module: &CanonicalPath) -> String {
    let path = module.as_str().trim_end_matches('/');
    let mut segments = path.rsplit('/');
    let basename = segments.next().unwrap_or_default();
    let category = segments.next().unwrap_or_default();

    let stem = KNOWN_EXTENSIONS
        .iter()
        .find_map(|ext| basename.strip_suffix(ext))
        .unwrap_or(basename);
    if stem.is_empty() || stem == "." {
        return String::new();
    }

    let mut name = String::with_capacity(stem.len() + 5);
    let mut chars = stem.chars();
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
    }
    while let Some(c) = chars.next() {
        if matches!(c, '-' | '_' | '.') {
            match chars.next() {
                Some(next) => name.extend(next.to_uppercase()),
                None => name.push(c),
            }
        } else {
            name.push(c);
        }
    }
    name.retain(|c| c.is_ascii_alphanumeric() || c == '_');
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    match category {
        "util" | "utils" => name.push_str("Util"),
        "model" | "models" => name.push_str("Model"),
        _ => {}
    }
    name
}

/// Turns a supplier answer into the final name.
///
/// An empty answer falls back to `suggestion`; if that is empty too the run
/// fails instead of leaving the module unnamed.
pub fn resolve_answer(
    answer: &str,
    suggestion: &str,
    module: &CanonicalPath,
) -> Result<String, RestructureError> {
    let answer = answer.trim();
    let name = if answer.is_empty() { suggestion } else { answer };
    if name.is_empty() {
        return Err(RestructureError::NoName {
            module: module.clone(),
        });
    }
    if !is_identifier(name) {
        return Err(RestructureError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(name.to_string())
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    bytes
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
