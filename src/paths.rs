//! Import specifier canonicalization.
//!
//! Every `require()` target is reduced to a root-relative key so that the same
//! module imported from different files aggregates under one name. Local keys
//! look like `./lib/foo.js` or `./lib/foo/`; package specifiers such as `fs`
//! pass through untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix that marks a local, root-relative key.
const LOCAL_MARKER: &str = "./";

/// Symbolic prefix standing for the project root, as in `require('$/lib/db')`.
const ROOT_ALIAS: &str = "$/";

/// Extensions that mark a specifier as already pointing at a file.
pub const KNOWN_EXTENSIONS: &[&str] = &[".js", ".mjs", ".cjs", ".json"];

/// Normalized key for an import target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local keys are resolved inside the project; everything else is a package.
    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_MARKER)
    }

    pub fn looks_like_dir(&self) -> bool {
        self.0.ends_with('/')
    }

    pub fn has_known_extension(&self) -> bool {
        KNOWN_EXTENSIONS.iter().any(|ext| self.0.ends_with(ext))
    }

    /// Key used in the name map: `./foo/index.js` and `./foo/` are one module.
    pub fn module_key(&self) -> CanonicalPath {
        match self.0.strip_suffix("/index.js") {
            Some(dir) => Self(format!("{dir}/")),
            None => self.clone(),
        }
    }

    /// On-disk location of a local key, `None` for packages.
    pub fn to_absolute(&self, root: &Path) -> Option<PathBuf> {
        let rel = self.0.strip_prefix(LOCAL_MARKER)?;
        let rel = rel.trim_end_matches('/');
        if rel.is_empty() {
            return Some(root.to_path_buf());
        }
        Some(rel.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg)))
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an import statement lives: the project root and the importing file.
#[derive(Debug, Clone)]
pub struct PathContext {
    pub root: PathBuf,
    /// Root-relative path of the importing file, `/`-separated.
    pub file: String,
}

impl PathContext {
    pub fn new(root: impl Into<PathBuf>, file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file: file.into(),
        }
    }

    /// Directory of the importing file relative to the root, `""` at the top.
    pub fn file_dir(&self) -> &str {
        self.file.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    /// Maps a raw specifier to its canonical key.
    ///
    /// `./` and `../` specifiers are resolved against the importing file's
    /// directory; `$/` specifiers against the root. A trailing `/` survives.
    /// Anything that is neither, or that climbs out of the root, is returned
    /// as-is.
    pub fn canonicalize(&self, specifier: &str) -> CanonicalPath {
        let joined = if specifier.starts_with("./") || specifier.starts_with("../") {
            let dir = self.file_dir();
            if dir.is_empty() {
                specifier.to_string()
            } else {
                format!("{dir}/{specifier}")
            }
        } else if let Some(rest) = specifier.strip_prefix(ROOT_ALIAS) {
            rest.to_string()
        } else {
            return CanonicalPath::new(specifier);
        };

        let Some(segments) = normalize(&joined) else {
            return CanonicalPath::new(specifier);
        };

        let mut key = format!("{LOCAL_MARKER}{}", segments.join("/"));
        if specifier.ends_with('/') && !segments.is_empty() {
            key.push('/');
        }
        CanonicalPath(key)
    }
}

/// Lexically resolves `.` and `..` segments. Returns `None` when the path
/// escapes the root.
fn normalize(path: &str) -> Option<Vec<&str>> {
    let mut out = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                out.pop()?;
            }
            seg => out.push(seg),
        }
    }
    Some(out)
}
