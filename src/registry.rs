//! Per-file import registries.
//!
//! [`MultiImporterRegistry`] remembers, for each canonical module path, the one
//! destructuring import a file makes of it. [`SingleImporters`] does the same
//! for plain `let Foo = require(...)` bindings keyed by local name. Neither ever
//! overwrites an earlier entry; a conflicting redeclaration becomes a warning.

use crate::paths::CanonicalPath;
use serde::Serialize;
use std::collections::BTreeMap;

/// Warning messages grouped by canonical path (or file).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Warnings(BTreeMap<String, Vec<String>>);

impl Warnings {
    pub fn push(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of messages across all keys.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(key, msgs)| msgs.iter().map(move |m| (key.as_str(), m.as_str())))
    }
}

/// The single destructuring import a file makes of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiImporterRecord {
    /// Quoted path literal as written, e.g. `'./foo/bar.js'`.
    pub specifier: String,
    /// Destructuring text as written, e.g. `{ a, b }`.
    pub binding: String,
    /// Destructured symbol names.
    pub symbols: Vec<String>,
}

/// Destructured imports of one file, in order of first appearance.
#[derive(Debug, Default, Clone)]
pub struct MultiImporterRegistry {
    records: Vec<(CanonicalPath, MultiImporterRecord)>,
}

impl MultiImporterRegistry {
    /// Records `record` for `path` unless the file already destructures that
    /// module. A differing redeclaration is reported and dropped.
    pub fn record(
        &mut self,
        path: CanonicalPath,
        record: MultiImporterRecord,
        keyword: &str,
        warnings: &mut Warnings,
    ) -> bool {
        match self.get(&path) {
            None => {
                self.records.push((path, record));
                true
            }
            Some(existing) if *existing == record => false,
            Some(_) => {
                warnings.push(
                    path.as_str(),
                    format!(
                        "confusing redeclaration: {} {{ {} }} = {}",
                        keyword,
                        record.symbols.join(","),
                        record.specifier
                    ),
                );
                false
            }
        }
    }

    pub fn get(&self, path: &CanonicalPath) -> Option<&MultiImporterRecord> {
        self.records
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, record)| record)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalPath, &MultiImporterRecord)> {
        self.records.iter().map(|(p, r)| (p, r))
    }
}

/// Plain single-binding imports, keyed by the bound name.
#[derive(Debug, Default, Clone)]
pub struct SingleImporters {
    names: BTreeMap<String, CanonicalPath>,
}

impl SingleImporters {
    /// Records `name -> path`. Rebinding a name to a different module keeps
    /// the first binding and reports the second.
    pub fn record(
        &mut self,
        name: &str,
        path: CanonicalPath,
        keyword: &str,
        specifier: &str,
        warnings: &mut Warnings,
    ) -> bool {
        match self.names.get(name) {
            Some(existing) if *existing == path => false,
            Some(_) => {
                warnings.push(
                    path.as_str(),
                    format!("confusing redeclaration: {} {} = {}", keyword, name, specifier),
                );
                false
            }
            None => {
                self.names.insert(name.to_string(), path);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CanonicalPath> {
        self.names.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalPath)> {
        self.names.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
