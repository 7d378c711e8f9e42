//! Persisted module name map.
//!
//! Maps a canonical module key to the namespace identifier chosen for it. The
//! mapping is unique in both directions across the whole project and survives
//! between runs through a [`MapStore`]. Every successful [`ModuleNameMap::assign`]
//! rewrites the store wholesale.

use crate::error::RestructureError;
use crate::paths::CanonicalPath;
use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default location of the persisted map, relative to the working directory.
pub const DEFAULT_MAP_PATH: &str = "module-map.json";

pub type NameEntries = BTreeMap<CanonicalPath, String>;

/// Load/save boundary for the name map.
pub trait MapStore {
    /// Returns the stored entries, or `None` if nothing has been stored yet.
    fn load(&self) -> Result<Option<NameEntries>>;

    /// Replaces the stored entries with `entries`.
    fn save(&mut self, entries: &NameEntries) -> Result<()>;
}

/// JSON object file, written atomically through a sibling temp file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MapStore for JsonFileStore {
    fn load(&self) -> Result<Option<NameEntries>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let entries = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(entries))
    }

    fn save(&mut self, entries: &NameEntries) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        writeln!(tmp)?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store, used by tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub entries: NameEntries,
    /// Number of times `save` was called.
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(p, n)| (CanonicalPath::new(p), n.to_string()))
                .collect(),
            saves: 0,
        }
    }
}

impl MapStore for MemoryStore {
    fn load(&self) -> Result<Option<NameEntries>> {
        Ok(Some(self.entries.clone()))
    }

    fn save(&mut self, entries: &NameEntries) -> Result<()> {
        self.entries = entries.clone();
        self.saves += 1;
        Ok(())
    }
}

/// Project-wide `module key <-> name` table.
#[derive(Debug)]
pub struct ModuleNameMap<S> {
    entries: NameEntries,
    reverse: HashMap<String, CanonicalPath>,
    store: S,
}

impl<S: MapStore> ModuleNameMap<S> {
    /// Loads the map from `store`. A missing or unreadable store starts empty;
    /// a store that gives one name to two modules is rejected.
    pub fn open(store: S) -> Result<Self> {
        let entries = match store.load() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                eprintln!(
                    "{} ignoring unreadable module map: {:#}",
                    "warn:".yellow().bold(),
                    err
                );
                NameEntries::new()
            }
        };

        let mut reverse = HashMap::with_capacity(entries.len());
        for (path, name) in &entries {
            if let Some(existing) = reverse.insert(name.clone(), path.clone()) {
                return Err(RestructureError::DuplicateName {
                    name: name.clone(),
                    existing,
                    requested: path.clone(),
                }
                .into());
            }
        }

        Ok(Self {
            entries,
            reverse,
            store,
        })
    }

    pub fn get(&self, path: &CanonicalPath) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn reverse(&self, name: &str) -> Option<&CanonicalPath> {
        self.reverse.get(name)
    }

    /// Assigns `name` to `path` and persists the whole map.
    ///
    /// `singles` holds the project's single-binding imports seen so far; a
    /// plain `let <name> = require(...)` of another module blocks the name.
    pub fn assign(
        &mut self,
        path: &CanonicalPath,
        name: &str,
        singles: &BTreeMap<String, CanonicalPath>,
    ) -> Result<()> {
        if let Some(existing) = self.entries.get(path) {
            if existing == name {
                return Ok(());
            }
            return Err(RestructureError::AlreadyAssigned {
                path: path.clone(),
                existing: existing.clone(),
                requested: name.to_string(),
            }
            .into());
        }
        if let Some(existing) = self.reverse.get(name) {
            return Err(RestructureError::DuplicateName {
                name: name.to_string(),
                existing: existing.clone(),
                requested: path.clone(),
            }
            .into());
        }
        if let Some(existing) = singles.get(name)
            && existing.module_key() != *path
        {
            return Err(RestructureError::SingleImportConflict {
                name: name.to_string(),
                existing: existing.clone(),
                requested: path.clone(),
            }
            .into());
        }

        self.entries.insert(path.clone(), name.to_string());
        if let Err(err) = self.store.save(&self.entries) {
            self.entries.remove(path);
            return Err(err.context(format!("Failed to persist name for {}", path)));
        }
        self.reverse.insert(name.to_string(), path.clone());
        Ok(())
    }

    pub fn entries(&self) -> &NameEntries {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
