//! Domain errors that abort a run.
//!
//! File-scoped problems (missing targets, confusing redeclarations) are not
//! errors; they are collected as [`crate::registry::Warnings`] instead.

use crate::paths::CanonicalPath;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestructureError {
    /// The chosen name already appears as a whole word in the file.
    #[error("found {name} already in {file}")]
    NameCollision { name: String, file: String },

    /// The name is already assigned to another module.
    #[error("duplicate name {name}: requested for {requested}, already used by {existing}")]
    DuplicateName {
        name: String,
        existing: CanonicalPath,
        requested: CanonicalPath,
    },

    /// The module already holds a different name.
    #[error("{path} is already named {existing}, refusing to rename it to {requested}")]
    AlreadyAssigned {
        path: CanonicalPath,
        existing: String,
        requested: String,
    },

    /// A single-binding import elsewhere uses the name for a different module.
    #[error("name {name} for {requested} is already a plain import of {existing}")]
    SingleImportConflict {
        name: String,
        existing: CanonicalPath,
        requested: CanonicalPath,
    },

    /// A single-binding import reuses a name the map gave to another module.
    #[error("duplicate import name: {name}: {module}")]
    DuplicateImportName { name: String, module: CanonicalPath },

    #[error("'{name}' is not a valid identifier")]
    InvalidName { name: String },

    /// Neither the supplier nor the suggestion produced a name.
    #[error("no name given for {module} and no suggestion available")]
    NoName { module: CanonicalPath },

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}
