//! Source file discovery.

use std::path::PathBuf;

use tracing::trace;
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::error::{Error, Result};

/// Files under `config.root` whose extension matches, in lexical order.
///
/// Directories named in `skip_dirs` are pruned together with everything
/// below them. Symlinks are neither followed nor yielded.
pub fn source_files(config: &RunConfig) -> impl Iterator<Item = Result<PathBuf>> + '_ {
    WalkDir::new(&config.root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            let skip = entry.depth() > 0
                && entry.file_type().is_dir()
                && config.is_skipped_dir(entry.file_name());
            if skip {
                trace!(path = %entry.path().display(), "skipping directory");
            }
            !skip
        })
        .filter_map(move |entry| match entry {
            Err(err) => Some(Err(Error::Traversal(err))),
            Ok(entry) if entry.file_type().is_file() && config.matches_extension(entry.path()) => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package p\n").unwrap();
    }

    fn found(config: &RunConfig) -> Vec<String> {
        source_files(config)
            .map(|path| {
                let path = path.unwrap();
                let rel = path.strip_prefix(&config.root).unwrap();
                rel.to_string_lossy().replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn skips_vendor_and_git_and_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for rel in [
            "main.go",
            "README.md",
            "pkg/a.go",
            "pkg/b.go.bak",
            "pkg/vendor/c.go",
            "vendor/d.go",
            ".git/e.go",
            "sub/.git/f.go",
        ] {
            touch(dir.path(), rel);
        }

        let config = RunConfig::new(dir.path());
        assert_eq!(found(&config), vec!["main.go", "pkg/a.go"]);
    }

    #[test]
    fn file_named_like_a_skipped_dir_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "vendor.go");
        let config = RunConfig {
            skip_dirs: vec!["vendor.go".to_string()],
            ..RunConfig::new(dir.path())
        };
        assert_eq!(found(&config), vec!["vendor.go"]);
    }

    #[test]
    fn root_is_never_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "vendor/x.go");
        let config = RunConfig::new(dir.path().join("vendor"));
        assert_eq!(found(&config), vec!["x.go"]);
    }

    #[test]
    fn missing_root_is_a_traversal_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(dir.path().join("absent"));
        let results: Vec<_> = source_files(&config).collect();
        assert!(matches!(results.as_slice(), [Err(Error::Traversal(_))]));
    }
}
