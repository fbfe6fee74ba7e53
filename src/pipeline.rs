//! The per-file pipeline and the run loop.
//!
//! Every file goes through parse, rewrite, print, normalize and replace, in
//! that order. The first failure ends the run; files already replaced stay
//! replaced and the failing file is never written.

use std::fs;
use std::path::{Path, PathBuf};

use sigfold_parser::{parse_source, print_unit};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::discover::source_files;
use crate::error::{Error, Result};
use crate::normalize::strip_single_result_parens;
use crate::rewrite::rewrite_signatures;
use crate::writer::replace_atomically;

/// Rewritten text of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    /// Signatures whose parameter or result lists changed.
    pub signatures: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub signatures: usize,
    pub bytes: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub signatures: usize,
}

/// Runs the in-memory part of the pipeline on `src`.
///
/// `path` only labels errors.
pub fn format_source(path: &Path, src: &str) -> Result<Formatted> {
    let mut unit = parse_source(src).map_err(|failure| Error::parse(path, src, failure))?;
    let signatures = rewrite_signatures(&mut unit).map_err(|err| Error::emit(path, err))?;
    let printed = print_unit(&unit).map_err(|err| Error::emit(path, err))?;
    let text = strip_single_result_parens(&printed).into_owned();
    Ok(Formatted { text, signatures })
}

/// Reads, rewrites and atomically replaces one file.
pub fn process_file(config: &RunConfig, path: &Path) -> Result<FileReport> {
    let src = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let formatted = format_source(path, &src)?;
    replace_atomically(path, &formatted.text, &config.extension)?;

    debug!(
        path = %path.display(),
        signatures = formatted.signatures,
        bytes = formatted.text.len(),
        "rewrote file"
    );
    Ok(FileReport {
        path: path.to_path_buf(),
        signatures: formatted.signatures,
        bytes: formatted.text.len(),
    })
}

/// Rewrites every matching file under `config.root`.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for path in source_files(config) {
        let report = process_file(config, &path?)?;
        summary.files += 1;
        summary.signatures += report.signatures;
    }
    info!(
        root = %config.root.display(),
        files = summary.files,
        signatures = summary.signatures,
        "run finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_and_counts_changed_signatures() {
        let src = indoc! {"
            package p

            func a(x int, y int) {}

            func b(x int) {}

            func c() (error) {
            	return nil
            }
        "};
        let out = format_source(Path::new("p.go"), src).unwrap();
        assert_eq!(out.signatures, 2);
        assert_eq!(
            out.text,
            indoc! {"
                package p

                func a(x, y int) {}

                func b(x int) {}

                func c() error {
                	return nil
                }
            "}
        );
    }

    #[test]
    fn parse_error_points_at_line_and_column() {
        let src = "package p\n\nfunc f( {\n";
        let err = format_source(Path::new("bad.go"), src).unwrap_err();
        let Error::Parse { line, path, .. } = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(*line, 3);
        assert_eq!(path, Path::new("bad.go"));
        assert!(err.to_string().starts_with("bad.go:3:"), "{err}");
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.go");
        let err = process_file(&RunConfig::new(dir.path()), &path).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
