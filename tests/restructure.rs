use js_restructure::RestructureError;
use js_restructure::names::{MemoryStore, ModuleNameMap};
use js_restructure::naming::{NameRequest, NameSupplier};
use js_restructure::paths::CanonicalPath;
use js_restructure::session::{Options, Restructurer};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Answers prompts from a fixed script and remembers what it was asked.
#[derive(Default)]
struct ScriptedSupplier {
    answers: VecDeque<String>,
    asked: Vec<(String, String)>,
}

impl ScriptedSupplier {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl NameSupplier for ScriptedSupplier {
    fn ask(&mut self, request: &NameRequest<'_>) -> anyhow::Result<String> {
        self.asked
            .push((request.module.to_string(), request.suggestion.to_string()));
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path)).unwrap()
}

fn restructurer(
    store: MemoryStore,
    answers: &[&str],
) -> Restructurer<MemoryStore, ScriptedSupplier> {
    let names = ModuleNameMap::open(store).unwrap();
    Restructurer::new(names, ScriptedSupplier::new(answers), Options::default())
}

fn roots(dir: &TempDir) -> Vec<PathBuf> {
    vec![dir.path().to_path_buf()]
}

fn domain_error(err: &anyhow::Error) -> &RestructureError {
    err.downcast_ref::<RestructureError>()
        .unwrap_or_else(|| panic!("unexpected error: {err:#}"))
}

#[test]
fn destructured_import_becomes_namespace() {
    let dir = project(&[
        ("foo/bar.js", "module.exports = { a: 1, b: 2 };\n"),
        (
            "index.js",
            "'use strict';\n\nlet { a, b } = require('./foo/bar');\n\nconsole.log(a, b);\nif (a) {\n  run([b]);\n}\n",
        ),
    ]);

    let mut r = restructurer(MemoryStore::default(), &[""]);
    let summary = r.run(&roots(&dir)).unwrap();

    insta::assert_snapshot!(read(&dir, "index.js"), @r"
    'use strict';

    let Bar = require('./foo/bar.js');

    console.log(Bar.a, Bar.b);
    if (Bar.a) {
      run([Bar.b]);
    }
    ");

    assert_eq!(
        r.names().get(&CanonicalPath::new("./foo/bar.js")),
        Some("Bar")
    );
    assert_eq!(r.names().store().saves, 1);
    assert_eq!(summary.modules_named, 1);
    assert_eq!(summary.patches_applied, 1);
    assert_eq!(summary.symbols_rewritten, 2);
    assert_eq!(summary.files_changed, 1);
    assert_eq!(r.eliminated_symbols(), vec!["a", "b"]);
}

#[test]
fn second_importer_reuses_persisted_name() {
    let dir = project(&[
        ("lib/util/strings.js", ""),
        ("a.js", "const { pad } = require('./lib/util/strings.js');\npad(1);\n"),
        ("b.js", "const { pad, trim } = require('./lib/util/strings.js');\ntrim(pad(2));\n"),
    ]);

    let mut r = restructurer(MemoryStore::default(), &[]);
    r.run(&roots(&dir)).unwrap();

    assert_eq!(
        r.supplier().asked,
        vec![(
            "./lib/util/strings.js".to_string(),
            "StringsUtil".to_string()
        )]
    );
    assert_eq!(r.names().store().saves, 1);
    assert_eq!(
        read(&dir, "a.js"),
        "const StringsUtil = require('./lib/util/strings.js');\nStringsUtil.pad(1);\n"
    );
    assert_eq!(
        read(&dir, "b.js"),
        "const StringsUtil = require('./lib/util/strings.js');\nStringsUtil.trim(StringsUtil.pad(2));\n"
    );
}

#[test]
fn relative_and_aliased_imports_share_a_name() {
    let dir = project(&[
        ("lib/models/index.js", ""),
        ("app.js", "let { User } = require('./lib/models');\nnew User();\n"),
        ("lib/api/users.js", "let { Post } = require('$/lib/models/index.js');\nnew Post();\n"),
    ]);

    let mut r = restructurer(MemoryStore::default(), &["Models"]);
    r.run(&roots(&dir)).unwrap();

    assert_eq!(r.supplier().asked.len(), 1);
    assert_eq!(
        read(&dir, "app.js"),
        "let Models = require('./lib/models/');\nnew Models.User();\n"
    );
    assert_eq!(
        read(&dir, "lib/api/users.js"),
        "let Models = require('$/lib/models/index.js');\nnew Models.Post();\n"
    );
}

#[test]
fn preassigned_name_skips_prompt() {
    let dir = project(&[
        ("db.js", ""),
        ("index.js", "let { query } = require('./db.js');\nquery();\n"),
    ]);

    let mut r = restructurer(MemoryStore::with_entries([("./db.js", "Database")]), &[]);
    r.run(&roots(&dir)).unwrap();

    assert!(r.supplier().asked.is_empty());
    assert_eq!(r.names().store().saves, 0);
    assert_eq!(
        read(&dir, "index.js"),
        "let Database = require('./db.js');\nDatabase.query();\n"
    );
}

#[test]
fn colliding_name_aborts_after_patches_are_written() {
    let dir = project(&[
        ("foo/bar.js", ""),
        ("index.js", "let { a } = require('./foo/bar');\nlet Bar = 1;\na(Bar);\n"),
    ]);

    let mut r = restructurer(MemoryStore::default(), &[""]);
    let err = r.run(&roots(&dir)).unwrap_err();

    assert!(matches!(
        domain_error(&err),
        RestructureError::NameCollision { name, .. } if name == "Bar"
    ));
    assert_eq!(
        read(&dir, "index.js"),
        "let { a } = require('./foo/bar.js');\nlet Bar = 1;\na(Bar);\n"
    );
}

#[test]
fn same_name_for_two_modules_fails_the_run() {
    let dir = project(&[
        ("a/util.js", ""),
        ("b/util.js", ""),
        ("one.js", "let { x } = require('./a/util.js');\n"),
        ("two.js", "let { y } = require('./b/util.js');\n"),
    ]);

    let mut r = restructurer(MemoryStore::default(), &["Util", "Util"]);
    let err = r.run(&roots(&dir)).unwrap_err();

    assert!(matches!(domain_error(&err), RestructureError::DuplicateName { .. }));
    let entries = &r.names().store().entries;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries.get(&CanonicalPath::new("./a/util.js")).unwrap(), "Util");
    assert_eq!(read(&dir, "two.js"), "let { y } = require('./b/util.js');\n");
}

#[test]
fn redeclared_destructuring_is_left_alone() {
    let dir = project(&[
        ("m.js", ""),
        (
            "index.js",
            "let { a } = require('./m.js');\nfunction f() {\n  let { b } = require('./m.js');\n  return b;\n}\n",
        ),
    ]);

    let mut r = restructurer(MemoryStore::default(), &[""]);
    let root = dir.path().canonicalize().unwrap();
    let outcome = r.process_file(&root, &root.join("index.js")).unwrap();

    assert_eq!(
        outcome.warnings.get("./m.js").unwrap(),
        ["confusing redeclaration: let { b } = './m.js'"]
    );
    assert_eq!(
        read(&dir, "index.js"),
        "let M = require('./m.js');\nfunction f() {\n  let { b } = require('./m.js');\n  return b;\n}\n"
    );
}

#[test]
fn index_spelling_of_destructured_module_is_a_redeclaration() {
    let dir = project(&[
        ("lib/models/index.js", ""),
        (
            "app.js",
            "let { User } = require('./lib/models/');\nlet { Post } = require('./lib/models/index.js');\nnew User(Post);\n",
        ),
    ]);

    let mut r = restructurer(MemoryStore::default(), &[""]);
    let root = dir.path().canonicalize().unwrap();
    let outcome = r.process_file(&root, &root.join("app.js")).unwrap();

    assert_eq!(
        outcome.warnings.get("./lib/models/").unwrap(),
        ["confusing redeclaration: let { Post } = './lib/models/index.js'"]
    );
    assert_eq!(
        outcome.renamed,
        vec![(CanonicalPath::new("./lib/models/"), "Models".to_string())]
    );
    assert_eq!(
        read(&dir, "app.js"),
        "let Models = require('./lib/models/');\nlet { Post } = require('./lib/models/index.js');\nnew Models.User(Post);\n"
    );
}

#[test]
fn plain_import_blocks_name_for_other_module() {
    let dir = project(&[
        ("legacy/db.js", ""),
        ("lib/db.js", ""),
        ("a.js", "let Db = require('./legacy/db.js');\n"),
        ("b.js", "let { connect } = require('./lib/db.js');\n"),
    ]);

    let mut r = restructurer(MemoryStore::default(), &[""]);
    let err = r.run(&roots(&dir)).unwrap_err();
    assert!(matches!(
        domain_error(&err),
        RestructureError::SingleImportConflict { .. }
    ));
}

#[test]
fn empty_answer_without_suggestion_fails_fast() {
    let dir = project(&[
        ("index.js", ""),
        ("main.js", "let { start } = require('./');\n"),
    ]);

    let mut r = restructurer(MemoryStore::default(), &[""]);
    let err = r.run(&roots(&dir)).unwrap_err();
    assert!(matches!(domain_error(&err), RestructureError::NoName { .. }));
}

#[test]
fn digit_leading_module_gets_identifier_suggestion() {
    let dir = project(&[
        ("lib/2fa.js", ""),
        ("login.js", "const { verify } = require('./lib/2fa.js');\nverify(code);\n"),
    ]);

    let mut r = restructurer(MemoryStore::default(), &[""]);
    r.run(&roots(&dir)).unwrap();

    assert_eq!(
        r.supplier().asked,
        vec![("./lib/2fa.js".to_string(), "_2fa".to_string())]
    );
    assert_eq!(
        read(&dir, "login.js"),
        "const _2fa = require('./lib/2fa.js');\n_2fa.verify(code);\n"
    );
}

#[test]
fn paths_only_fixes_specifiers_without_renaming() {
    let dir = project(&[
        ("lib/models/index.js", ""),
        ("lib/db.js", ""),
        (
            "index.js",
            "let { User } = require('./lib/models');\nlet Db = require('./lib/db');\nlet Fs = require('fs');\n",
        ),
    ]);

    let names = ModuleNameMap::open(MemoryStore::default()).unwrap();
    let options = Options {
        paths_only: true,
        ..Options::default()
    };
    let mut r = Restructurer::new(names, ScriptedSupplier::default(), options);
    let summary = r.run(&roots(&dir)).unwrap();

    assert_eq!(
        read(&dir, "index.js"),
        "let { User } = require('./lib/models/');\nlet Db = require('./lib/db.js');\nlet Fs = require('fs');\n"
    );
    assert_eq!(summary.patches_applied, 2);
    assert_eq!(summary.modules_named, 0);
    assert!(r.supplier().asked.is_empty());

    // A second pass finds nothing left to fix.
    let mut again = restructurer(MemoryStore::default(), &[]);
    let second = again.run(&roots(&dir)).unwrap();
    assert_eq!(second.patches_applied, 0);
    assert_eq!(second.warnings, 0);
}

#[test]
fn missing_target_is_a_warning_not_an_error() {
    let dir = project(&[("index.js", "let Gone = require('./gone');\n")]);

    let mut r = restructurer(MemoryStore::default(), &[]);
    let root = dir.path().canonicalize().unwrap();
    let outcome = r.process_file(&root, &root.join("index.js")).unwrap();

    assert_eq!(
        outcome.warnings.get("./gone").unwrap(),
        ["missing require: ./gone: neither file nor directory"]
    );
    assert!(!outcome.changed);
    assert_eq!(read(&dir, "index.js"), "let Gone = require('./gone');\n");
}

#[test]
fn eliminated_symbols_are_sorted_shortest_first() {
    let dir = project(&[
        ("m.js", ""),
        ("n.js", ""),
        ("a.js", "let { render, Go, ok } = require('./m.js');\n"),
        ("b.js", "let { xy, longName } = require('./n.js');\n"),
    ]);

    let mut r = restructurer(MemoryStore::default(), &["", ""]);
    r.run(&roots(&dir)).unwrap();
    assert_eq!(
        r.eliminated_symbols(),
        vec!["Go", "ok", "xy", "render", "longName"]
    );
}

#[test]
fn skips_dependency_directories() {
    let dir = project(&[
        ("node_modules/pkg/index.js", "let { a } = require('./a');\n"),
        (".cache/x.js", "let { b } = require('./b');\n"),
        ("index.js", "console.log(1);\n"),
    ]);

    let mut r = restructurer(MemoryStore::default(), &[]);
    let summary = r.run(&roots(&dir)).unwrap();
    assert_eq!(summary.files_scanned, 1);
    assert_eq!(
        read(&dir, "node_modules/pkg/index.js"),
        "let { a } = require('./a');\n"
    );
}
