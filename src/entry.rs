//! Entry types shared by the extraction, listing and verification paths.

use std::fmt;
use std::io::Read;

/// The kind of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file with a byte payload.
    File,
    /// A directory.
    Directory,
    /// A symbolic link. Never materialised on disk.
    Symlink,
    /// Anything else the decoder yields but the engine only counts as
    /// skipped (GNU sparse files, PAX global headers).
    Other,
}

impl EntryKind {
    /// Returns the lowercase kind name (`"file"`, `"directory"`,
    /// `"symlink"`, `"other"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symlink",
            EntryKind::Other => "other",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive information about one archive entry, produced by the listing
/// functions.
///
/// ```rust,no_run
/// for entry in unpak::list_zip_path("upload.zip")? {
///     println!("{:>10}  {}", entry.size, entry.name);
/// }
/// # Ok::<(), unpak::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// The archive-relative entry name.
    pub name: String,
    /// The declared (uncompressed) size in bytes.
    pub size: u64,
    /// The entry kind.
    pub kind: EntryKind,
}

impl EntryInfo {
    /// Returns `true` if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Returns `true` if this entry is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}

/// One archive entry as the decoder reports it, before any validation.
///
/// The name is untrusted; the declared size comes from the archive header
/// and is used for early quota rejection only, never for accounting. The
/// body reader is consumed at most once.
pub(crate) struct RawEntry<'a> {
    /// Archive-relative name, exactly as stored (directory names are
    /// normalised to drop the trailing slash).
    pub name: String,
    /// The entry kind.
    pub kind: EntryKind,
    /// Uncompressed size the header claims; 0 when unknown.
    pub declared_size: u64,
    /// Unix mode bits if the archive carries them.
    pub unix_mode: Option<u32>,
    /// Expected CRC-32 of the payload (ZIP central directory only).
    pub crc32: Option<u32>,
    /// The entry payload, decompressed on the fly.
    pub body: Box<dyn Read + 'a>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(EntryKind::File.as_str(), "file");
        assert_eq!(EntryKind::Directory.as_str(), "directory");
        assert_eq!(EntryKind::Symlink.as_str(), "symlink");
        assert_eq!(EntryKind::Other.as_str(), "other");
        assert_eq!(EntryKind::File.to_string(), "file");
    }

    #[test]
    fn test_entry_info_kind_flags() {
        let info = EntryInfo {
            name: "a/b.txt".into(),
            size: 12,
            kind: EntryKind::File,
        };
        assert!(info.is_file());
        assert!(!info.is_dir());
        assert!(!info.is_symlink());

        let dir = EntryInfo {
            name: "a".into(),
            size: 0,
            kind: EntryKind::Directory,
        };
        assert!(dir.is_dir());
        assert!(!dir.is_file());
    }
}
