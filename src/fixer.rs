//! Canonical-form fixes for local `require()` specifiers.
//!
//! A specifier like `'./lib/models'` is ambiguous to a reader: it may be a
//! directory with an `index.js` or a file named `models.js`. The fixer probes
//! the filesystem and proposes a [`Patch`] that spells out the trailing `/` or
//! the `.js` extension. When the probe is inconclusive it records a warning and
//! leaves the text alone.

use crate::paths::PathContext;
use crate::registry::Warnings;
use crate::rewriter::Patch;
use crate::scanner::RawImportMatch;
use std::ffi::OsString;
use std::path::PathBuf;

/// Extension appended to specifiers that resolve to a file.
const SOURCE_EXTENSION: &str = ".js";

/// Proposes a patch completing `import`'s specifier, or records why it can't.
///
/// Package specifiers, specifiers that already end in `/`, and those that
/// already carry a known extension are never touched.
pub fn canonical_form_patch(
    ctx: &PathContext,
    import: &RawImportMatch,
    warnings: &mut Warnings,
) -> Option<Patch> {
    let canonical = ctx.canonicalize(&import.specifier);
    if !canonical.is_local() || canonical.looks_like_dir() || canonical.has_known_extension() {
        return None;
    }
    let abspath = canonical.to_absolute(&ctx.root)?;

    // Probe failures count as "does not exist".
    let is_dir = abspath.is_dir();
    let is_file = with_extension(abspath, SOURCE_EXTENSION).is_file();

    let quote = import.quote();
    let literal = &import.literal;
    let unquoted = &literal[..literal.len() - quote.len_utf8()];

    match (is_dir, is_file) {
        (true, false) => Some(Patch::new(
            literal,
            format!("{unquoted}/{quote}"),
            format!("add missing trailing '/' to directory require: {literal}"),
        )),
        (false, true) => Some(Patch::new(
            literal,
            format!("{unquoted}{SOURCE_EXTENSION}{quote}"),
            format!("add missing trailing '{SOURCE_EXTENSION}' to file require: {literal}"),
        )),
        (true, true) => {
            warnings.push(
                canonical.as_str(),
                format!("ambiguous require: {canonical}: is both file and directory"),
            );
            None
        }
        (false, false) => {
            warnings.push(
                canonical.as_str(),
                format!("missing require: {canonical}: neither file nor directory"),
            );
            None
        }
    }
}

/// Appends `ext` to the final component without replacing an existing one,
/// so `lib/v1.2` becomes `lib/v1.2.js`.
fn with_extension(path: PathBuf, ext: &str) -> PathBuf {
    let mut raw: OsString = path.into_os_string();
    raw.push(ext);
    PathBuf::from(raw)
}
