use std::io;
use std::path::{Path, PathBuf};

use sigfold_parser::{EmitError, LineIndex, ParseFailure};
use thiserror::Error;

/// A failure that stops the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot walk the source tree")]
    Traversal(#[from] walkdir::Error),

    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}:{column}: {failure}", .path.display())]
    Parse {
        path: PathBuf,
        line: u32,
        column: u32,
        failure: ParseFailure,
    },

    #[error("cannot print {}", .path.display())]
    Emit {
        path: PathBuf,
        #[source]
        source: EmitError,
    },

    #[error("cannot replace {}", .path.display())]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Locates the first diagnostic of `failure` in `src`.
    pub(crate) fn parse(path: &Path, src: &str, failure: ParseFailure) -> Self {
        let offset = failure.first().map_or(0, |diag| diag.span.start);
        let (line, column) = LineIndex::new(src).line_col(offset);
        Error::Parse {
            path: path.to_path_buf(),
            line,
            column,
            failure,
        }
    }

    pub(crate) fn emit(path: &Path, source: EmitError) -> Self {
        Error::Emit {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn replace(path: &Path, source: io::Error) -> Self {
        Error::Replace {
            path: path.to_path_buf(),
            source,
        }
    }

    /// File the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Traversal(err) => err.path(),
            Error::Read { path, .. }
            | Error::Parse { path, .. }
            | Error::Emit { path, .. }
            | Error::Replace { path, .. } => Some(path),
        }
    }
}
