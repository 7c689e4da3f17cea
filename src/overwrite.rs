//! Decisions against pre-existing filesystem state.
//!
//! Replacement is symlink-safe by construction: an existing name is
//! removed with an `unlink`-style call that does not dereference symlinks,
//! never opened for truncation. Opening an existing symlink with truncate
//! would follow it and rewrite the target outside the sealed root.

use std::fs;
use std::io;
use std::path::Path;

use crate::options::OverwritePolicy;
use crate::{Error, Result};

/// Outcome of the overwrite decision for a file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prepared {
    /// The target slot is free; proceed to open the output.
    Write,
    /// Policy says leave the existing entry alone.
    Skip,
}

/// Decides what to do about a regular-file target, without touching disk.
///
/// Existing directories are a kind mismatch and always an error; existing
/// files and symlinks follow the policy. Used directly by the validation
/// pass, which must not write.
pub(crate) fn check_file(path: &Path, policy: OverwritePolicy) -> Result<Prepared> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Prepared::Write),
        Err(e) => return Err(Error::Io(e)),
    };

    if meta.file_type().is_dir() {
        return Err(Error::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    match policy {
        OverwritePolicy::Error => Err(Error::AlreadyExists {
            path: path.to_path_buf(),
        }),
        OverwritePolicy::Skip => Ok(Prepared::Skip),
        OverwritePolicy::Overwrite => Ok(Prepared::Write),
    }
}

/// Applies the overwrite policy for a regular-file target.
///
/// Like [`check_file`], but under `Overwrite` the existing name is
/// unlinked so the caller can open the output with `create_new`.
pub(crate) fn prepare_file(path: &Path, policy: OverwritePolicy) -> Result<Prepared> {
    let decision = check_file(path, policy)?;
    if decision == Prepared::Write {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(decision)
}

/// Read-only kind check for a directory target.
pub(crate) fn check_directory(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_dir() => Ok(()),
        Ok(_) => Err(Error::AlreadyExists {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Materialises a directory entry, accepting existing directories silently.
///
/// Returns `true` if the directory (or part of its chain) was created.
/// Anything else occupying the name, including a symlink pointing at a
/// directory, is a kind mismatch.
pub(crate) fn prepare_directory(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_dir() => Ok(false),
        Ok(_) => Err(Error::AlreadyExists {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(path)?;
            Ok(true)
        }
        Err(e) => Err(Error::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_file_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("new.txt");
        for policy in [
            OverwritePolicy::Error,
            OverwritePolicy::Skip,
            OverwritePolicy::Overwrite,
        ] {
            assert_eq!(prepare_file(&target, policy).unwrap(), Prepared::Write);
        }
    }

    #[test]
    fn test_prepare_file_existing_follows_policy() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("existing.txt");
        fs::write(&target, b"original").unwrap();

        let err = prepare_file(&target, OverwritePolicy::Error).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));

        assert_eq!(
            prepare_file(&target, OverwritePolicy::Skip).unwrap(),
            Prepared::Skip
        );
        assert_eq!(fs::read(&target).unwrap(), b"original");

        assert_eq!(
            prepare_file(&target, OverwritePolicy::Overwrite).unwrap(),
            Prepared::Write
        );
        assert!(!target.exists());
    }

    #[test]
    fn test_prepare_file_over_directory_is_kind_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("subdir");
        fs::create_dir(&target).unwrap();
        for policy in [
            OverwritePolicy::Error,
            OverwritePolicy::Skip,
            OverwritePolicy::Overwrite,
        ] {
            let err = prepare_file(&target, policy).unwrap_err();
            assert!(matches!(err, Error::AlreadyExists { .. }));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_unlinks_symlink_without_following() {
        let dir = tempfile::tempdir().unwrap();
        let sensitive = dir.path().join("sensitive.txt");
        fs::write(&sensitive, b"keep me").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&sensitive, &link).unwrap();

        assert_eq!(
            prepare_file(&link, OverwritePolicy::Overwrite).unwrap(),
            Prepared::Write
        );
        // The link name is gone, the target untouched.
        assert!(fs::symlink_metadata(&link).is_err());
        assert_eq!(fs::read(&sensitive).unwrap(), b"keep me");
    }

    #[test]
    fn test_check_file_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("existing.txt");
        fs::write(&target, b"original").unwrap();

        assert_eq!(
            check_file(&target, OverwritePolicy::Overwrite).unwrap(),
            Prepared::Write
        );
        assert_eq!(fs::read(&target).unwrap(), b"original");
    }

    #[test]
    fn test_prepare_directory_accepts_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b");
        assert!(prepare_directory(&target).unwrap());
        assert!(!prepare_directory(&target).unwrap());
        assert!(target.is_dir());
    }

    #[test]
    fn test_prepare_directory_over_file_is_kind_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("occupied");
        fs::write(&target, b"file").unwrap();
        let err = prepare_directory(&target).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_prepare_directory_over_symlink_is_kind_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let err = prepare_directory(&link).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
    }
}
