//! js-restructure library for collapsing destructured `require()` imports.
//!
//! This library provides programmatic access to the restructuring workflow.
//! The core workflow involves three phases:
//!
//! 1. **Scanning**: Collect `.js` files and extract `require()` statements
//! 2. **Analysis**: Canonicalize import paths, propose path fixes, and group
//!    destructured imports by module
//! 3. **Rewriting**: Name each module once, project-wide, and rewrite its
//!    destructured imports into `Name.member` accesses
//!
//! # Example
//!
//! ```no_run
//! use js_restructure::names::{ModuleNameMap, JsonFileStore};
//! use js_restructure::naming::AcceptSuggestions;
//! use js_restructure::session::{Options, Restructurer};
//! use std::path::PathBuf;
//!
//! let names = ModuleNameMap::open(JsonFileStore::new("module-map.json")).unwrap();
//! let mut restructurer = Restructurer::new(names, AcceptSuggestions, Options::default());
//! let summary = restructurer.run(&[PathBuf::from("./src")]).unwrap();
//!
//! println!("Rewrote {} symbols", summary.symbols_rewritten);
//! ```

pub mod analyzer;
pub mod error;
pub mod fixer;
pub mod names;
pub mod naming;
pub mod paths;
pub mod registry;
pub mod report;
pub mod rewriter;
pub mod scanner;
pub mod session;

// Re-export commonly used types at crate root
pub use error::RestructureError;
pub use paths::CanonicalPath;
pub use scanner::RawImportMatch;
pub use session::{Restructurer, RunSummary};
