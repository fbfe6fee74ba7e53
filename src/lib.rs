//! Go signature normalizer.
//!
//! Walks a directory tree and rewrites every Go file so that adjacent
//! parameters and results of one type share a single type
//! (`a int, b int` becomes `a, b int`) and a lone unnamed result loses its
//! parentheses (`(error)` becomes `error`). Parsing and printing live in
//! [`sigfold_parser`]; this crate holds the rewrite, the traversal and the
//! file handling.

pub mod config;
pub mod discover;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod rewrite;
pub mod writer;

pub use config::RunConfig;
pub use error::{Error, Result};
pub use pipeline::{FileReport, Formatted, RunSummary, format_source, process_file, run};
