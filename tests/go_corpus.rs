//! Runs the in-memory pipeline over a directory of real Go code.
//!
//! Set `SIGFOLD_GO_CORPUS` to a directory (for example `$(go env GOROOT)/src`).
//! Nothing is written; each file is formatted twice to check the result is
//! stable.

use std::path::Path;

use sigfold::{Error, RunConfig, format_source};
use walkdir::WalkDir;

#[test]
fn formats_go_corpus_if_configured() {
    let Some(root) = std::env::var_os("SIGFOLD_GO_CORPUS") else {
        eprintln!("SIGFOLD_GO_CORPUS not set; skipping corpus test");
        return;
    };

    let config = RunConfig::new(&root);
    let mut total = 0usize;
    let mut unstable = Vec::new();

    let walker = WalkDir::new(&config.root).sort_by_file_name().into_iter();
    for entry in walker.filter_entry(|e| !(e.depth() > 0 && e.file_name() == "testdata")) {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_file() || !config.matches_extension(entry.path()) {
            continue;
        }
        let Ok(src) = std::fs::read_to_string(entry.path()) else {
            continue;
        };
        total += 1;

        let once = match format_source(entry.path(), &src) {
            Ok(out) => out.text,
            Err(err @ Error::Parse { .. }) => panic!("after {total} files: {err}"),
            Err(err) => panic!("{}: {err}", entry.path().display()),
        };
        let twice = format_source(Path::new("second pass"), &once)
            .unwrap_or_else(|err| panic!("{}: output does not parse: {err}", entry.path().display()));
        if twice.text != once {
            unstable.push(entry.into_path());
        }
    }

    assert!(unstable.is_empty(), "unstable output for {unstable:#?}");
    eprintln!("Formatted {total} Go files.");
}
