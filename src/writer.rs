//! Atomic file replacement.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Replaces the contents of `path` with `contents`.
///
/// The text goes to a `fmt-*.<extension>` temporary file next to `path`,
/// which takes over the original's permissions and is then renamed over
/// it. Readers see either the old file or the new one. On any failure the
/// temporary file is removed and `path` is untouched.
pub fn replace_atomically(path: &Path, contents: &str, extension: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let fail = |source| Error::replace(path, source);

    let permissions = fs::metadata(path).map_err(fail)?.permissions();
    let suffix = format!(".{extension}");
    let mut tmp = tempfile::Builder::new()
        .prefix("fmt-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(fail)?;
    tmp.write_all(contents.as_bytes()).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;
    tmp.as_file().set_permissions(permissions).map_err(fail)?;
    tmp.persist(path).map_err(|err| fail(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("fmt-"))
            .collect()
    }

    #[test]
    fn replaces_contents_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.go");
        fs::write(&path, "package a\n").unwrap();

        replace_atomically(&path, "package b\n", "go").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "package b\n");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.go");
        fs::write(&path, "package main\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o754)).unwrap();

        replace_atomically(&path, "package main\n\n", "go").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o754);
    }

    #[test]
    fn missing_target_is_a_replace_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.go");

        let err = replace_atomically(&path, "package p\n", "go").unwrap_err();

        assert!(matches!(err, Error::Replace { .. }));
        assert!(!path.exists());
        assert!(leftovers(dir.path()).is_empty());
    }
}
