use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::SystemTime;

use pretty_assertions::assert_eq;
use sigfold::{Error, RunConfig, run};
use tempfile::TempDir;

const UNGROUPED: &str = "package p\n\nfunc f(a int, b int) (error) {\n\treturn nil\n}\n";
const GROUPED: &str = "package p\n\nfunc f(a, b int) error {\n\treturn nil\n}\n";
const BROKEN: &str = "package p\n\nfunc f(a int, b int {\n";

fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, contents) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(dir.path().join(rel)).unwrap()
}

fn mtime(dir: &TempDir, rel: &str) -> SystemTime {
    fs::metadata(dir.path().join(rel)).unwrap().modified().unwrap()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn rewrites_matching_files_only() {
    let dir = tree(&[
        ("main.go", UNGROUPED),
        ("pkg/util.go", UNGROUPED),
        ("notes.txt", UNGROUPED),
        ("vendor/dep/dep.go", UNGROUPED),
        (".git/hooks/hook.go", UNGROUPED),
    ]);
    let untouched = ["notes.txt", "vendor/dep/dep.go", ".git/hooks/hook.go"];
    let before: Vec<_> = untouched.iter().map(|rel| mtime(&dir, rel)).collect();

    let summary = run(&RunConfig::new(dir.path())).unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(summary.signatures, 2);
    assert_eq!(read(&dir, "main.go"), GROUPED);
    assert_eq!(read(&dir, "pkg/util.go"), GROUPED);
    for (rel, when) in untouched.iter().zip(before) {
        assert_eq!(read(&dir, rel), UNGROUPED, "{rel}");
        assert_eq!(mtime(&dir, rel), when, "{rel}");
    }
    assert_eq!(entries(dir.path()), vec![".git", "main.go", "notes.txt", "pkg", "vendor"]);
}

#[test]
fn canonical_files_are_rewritten_identically() {
    let dir = tree(&[("a.go", GROUPED)]);
    let summary = run(&RunConfig::new(dir.path())).unwrap();
    assert_eq!(summary.files, 1);
    assert_eq!(summary.signatures, 0);
    assert_eq!(read(&dir, "a.go"), GROUPED);
}

#[test]
fn parse_failure_stops_the_run_and_leaves_the_file_alone() {
    let dir = tree(&[("a.go", UNGROUPED), ("b.go", BROKEN), ("c.go", UNGROUPED)]);
    let broken_mtime = mtime(&dir, "b.go");

    let err = run(&RunConfig::new(dir.path())).unwrap_err();

    let Error::Parse { path, line, .. } = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert!(path.ends_with("b.go"));
    assert_eq!(*line, 3);
    // Files are visited in name order: a is done, c is never reached.
    assert_eq!(read(&dir, "a.go"), GROUPED);
    assert_eq!(read(&dir, "b.go"), BROKEN);
    assert_eq!(mtime(&dir, "b.go"), broken_mtime);
    assert_eq!(read(&dir, "c.go"), UNGROUPED);
    assert_eq!(entries(dir.path()), vec!["a.go", "b.go", "c.go"]);
}

#[test]
fn binary_is_silent_on_success() {
    let dir = tree(&[("main.go", UNGROUPED)]);
    let out = Command::new(env!("CARGO_BIN_EXE_sigfold"))
        .current_dir(dir.path())
        .env_remove("SIGFOLD_LOG")
        .output()
        .unwrap();

    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    assert!(out.stderr.is_empty(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(&dir, "main.go"), GROUPED);
}

#[test]
fn binary_reports_the_first_error() {
    let dir = tree(&[("bad.go", BROKEN)]);
    let out = Command::new(env!("CARGO_BIN_EXE_sigfold"))
        .arg(dir.path())
        .env_remove("SIGFOLD_LOG")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("sigfold: "), "{stderr}");
    assert!(stderr.contains("bad.go:3:"), "{stderr}");
    assert_eq!(read(&dir, "bad.go"), BROKEN);
}
