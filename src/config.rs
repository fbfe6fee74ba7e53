//! Per-run settings.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Everything one run needs to know about where to look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory the walk starts from. Never skipped itself.
    pub root: PathBuf,
    /// Directory names pruned with everything below them.
    pub skip_dirs: Vec<String>,
    /// Extension of the files to rewrite, without the dot.
    pub extension: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            skip_dirs: vec!["vendor".to_string(), ".git".to_string()],
            extension: "go".to_string(),
        }
    }
}

impl RunConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn is_skipped_dir(&self, name: &OsStr) -> bool {
        self.skip_dirs.iter().any(|skip| OsStr::new(skip) == name)
    }

    /// Whether the file name ends in `.` + extension.
    ///
    /// A file named exactly `.go` counts.
    pub fn matches_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.as_encoded_bytes();
        let ext = self.extension.as_bytes();
        name.len() > ext.len()
            && name.ends_with(ext)
            && name[name.len() - ext.len() - 1] == b'.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_walk_current_directory() {
        let config = RunConfig::default();
        assert_eq!(config.root, PathBuf::from("."));
        assert!(config.is_skipped_dir(OsStr::new("vendor")));
        assert!(config.is_skipped_dir(OsStr::new(".git")));
        assert!(!config.is_skipped_dir(OsStr::new("Vendor")));
        assert!(!config.is_skipped_dir(OsStr::new("vendored")));
    }

    #[test]
    fn extension_matches_last_suffix_only() {
        let config = RunConfig::default();
        assert!(config.matches_extension(Path::new("a/main.go")));
        assert!(config.matches_extension(Path::new("x_test.go")));
        assert!(config.matches_extension(Path::new(".go")));
        assert!(!config.matches_extension(Path::new("main.go.orig")));
        assert!(!config.matches_extension(Path::new("go")));
        assert!(!config.matches_extension(Path::new("main.mgo")));
        assert!(!config.matches_extension(Path::new("README.md")));
    }
}
