//! Path containment proofs for untrusted entry names.
//!
//! Every entry name coming out of an archive is attacker-controlled. This
//! module validates names lexically (no `..`, no absolute or drive-letter
//! prefixes, no NUL or control bytes), enforces the depth cap, and proves
//! that the composed target path stays strictly inside the sealed
//! destination root.
//!
//! # Why lexical containment rather than `realpath`
//!
//! The target file does not exist yet, so the OS cannot canonicalise it.
//! Resolving the parent via the OS is also unsafe: an adversary-controlled
//! symlink already beneath the root could redirect the resolution. The
//! guard therefore canonicalises lexically, and separately refuses to write
//! through any existing path component that is a symbolic link.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// The absolute, canonical destination directory of one extraction.
///
/// Sealed once at engine start; every resolved entry path is proven to lie
/// strictly beneath it.
#[derive(Debug, Clone)]
pub(crate) struct SealedRoot(PathBuf);

impl SealedRoot {
    /// Creates the destination directory if needed and seals its canonical
    /// form.
    pub(crate) fn seal(dest: &Path) -> Result<Self> {
        fs::create_dir_all(dest)?;
        let canonical = dest.canonicalize()?;
        if !canonical.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("destination '{}' is not a directory", dest.display()),
            )));
        }
        Ok(Self(canonical))
    }

    /// Returns the canonical root path.
    pub(crate) fn path(&self) -> &Path {
        &self.0
    }
}

/// A validated, contained target path for one entry.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedPath {
    /// Absolute target path beneath the sealed root.
    pub path: PathBuf,
}

fn escape(entry_index: usize, name: &str, reason: impl Into<String>) -> Error {
    Error::PathEscape {
        entry_index,
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validates an entry name lexically and splits it into path components.
///
/// Rejections (all [`Error::PathEscape`]):
/// - empty names, NUL bytes, control bytes below 0x20
/// - absolute paths, drive-letter prefixes (`C:`), `\\?\` and UNC prefixes
/// - backslashes on Windows hosts (the platform would re-interpret them as
///   separators after the guard has run; on POSIX a backslash is a literal)
/// - `.` and `..` components
/// - names that reduce to zero components (`"//"`)
///
/// Exceeding `max_depth` components is a [`Error::Quota`] rejection, like
/// the other three caps.
pub(crate) fn validate_name<'n>(
    name: &'n str,
    max_depth: u64,
    entry_index: usize,
) -> Result<Vec<&'n str>> {
    if name.is_empty() {
        return Err(escape(entry_index, name, "empty entry name"));
    }
    for byte in name.bytes() {
        if byte == 0 {
            return Err(escape(entry_index, name, "name contains NUL byte"));
        }
        if byte < 0x20 {
            return Err(escape(
                entry_index,
                name,
                format!("name contains control byte {:#04x}", byte),
            ));
        }
    }

    if name.starts_with('/') {
        return Err(escape(entry_index, name, "absolute path"));
    }
    let bytes = name.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return Err(escape(entry_index, name, "drive-letter prefix"));
    }
    if name.starts_with(r"\\?\") || name.starts_with(r"\\") {
        return Err(escape(entry_index, name, "UNC or verbatim prefix"));
    }
    if cfg!(windows) && name.contains('\\') {
        return Err(escape(
            entry_index,
            name,
            "backslash separator on a Windows host",
        ));
    }

    let components: Vec<&str> = name.split('/').filter(|c| !c.is_empty()).collect();
    if components.is_empty() {
        return Err(escape(entry_index, name, "no path components"));
    }
    for component in &components {
        if *component == "." || *component == ".." {
            return Err(escape(
                entry_index,
                name,
                format!("traversal component '{}'", component),
            ));
        }
    }

    if components.len() as u64 > max_depth {
        return Err(Error::Quota(format!(
            "entry '{}' has depth {} exceeding the limit of {}",
            name,
            components.len(),
            max_depth
        )));
    }

    Ok(components)
}

/// Composes the target path beneath the sealed root and proves containment.
///
/// The prefix check is component-wise (via `Path::starts_with`), repeated
/// after every push so that no single component can replace the
/// accumulated path. Existing ancestors are then probed with `lstat`; any
/// symbolic link among them fails the entry, because writing through it
/// could land outside the root.
pub(crate) fn resolve(
    root: &SealedRoot,
    components: &[&str],
    name: &str,
    entry_index: usize,
) -> Result<ResolvedPath> {
    let mut full = root.path().to_path_buf();
    for component in components {
        full.push(component);
        if !full.starts_with(root.path()) {
            return Err(escape(
                entry_index,
                name,
                "resolved path leaves the destination",
            ));
        }
    }
    if full == root.path() {
        return Err(escape(entry_index, name, "entry names the root itself"));
    }

    ensure_no_symlink_ancestors(root, components, name, entry_index)?;

    Ok(ResolvedPath { path: full })
}

/// Refuses to write beneath any existing intermediate component that is a
/// symbolic link.
fn ensure_no_symlink_ancestors(
    root: &SealedRoot,
    components: &[&str],
    name: &str,
    entry_index: usize,
) -> Result<()> {
    let mut current = root.path().to_path_buf();
    for component in &components[..components.len().saturating_sub(1)] {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(escape(
                    entry_index,
                    name,
                    format!(
                        "existing ancestor '{}' is a symbolic link",
                        current.display()
                    ),
                ));
            }
            Ok(_) => {}
            // Nothing deeper exists yet, so nothing can redirect the write.
            Err(e) if e.kind() == io::ErrorKind::NotFound => break,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(())
}
