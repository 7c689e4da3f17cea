//! Error types for archive extraction.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when extracting, listing, or verifying archives, along with
//! a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Every
//! error is fatal to the operation that produced it: the engine never
//! recovers locally, it leaves the filesystem in the documented state and
//! propagates.
//!
//! ```rust,no_run
//! use unpak::Error;
//!
//! fn handle(result: unpak::Result<unpak::Report>) {
//!     match result {
//!         Ok(report) => println!("extracted {} files", report.files_extracted),
//!         Err(Error::PathEscape { name, .. }) => {
//!             eprintln!("archive tried to escape the destination via '{}'", name);
//!         }
//!         Err(Error::Quota(msg)) => eprintln!("archive exceeds limits: {}", msg),
//!         Err(e) => eprintln!("error: {}", e),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// The main error type for archive extraction operations.
///
/// Each variant corresponds to one failure kind; variants that concern a
/// specific entry carry the entry index and the name as the archive reports
/// it.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Security | [`PathEscape`][Self::PathEscape], [`SymlinkNotAllowed`][Self::SymlinkNotAllowed] | Zip-Slip style attacks |
/// | Resources | [`Quota`][Self::Quota] | Zip-Bomb style attacks, configured caps |
/// | Filesystem | [`AlreadyExists`][Self::AlreadyExists], [`Io`][Self::Io] | Pre-existing targets, OS errors |
/// | Compatibility | [`EncryptedArchive`][Self::EncryptedArchive], [`UnsupportedEntryType`][Self::UnsupportedEntryType] | Rejected archive features |
/// | Format | [`Format`][Self::Format] | Malformed archive data |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading the archive or writing output.
    ///
    /// This wraps [`std::io::Error`] and is returned for operating-system
    /// level failures (file not found, permission denied, disk full) and for
    /// failures raised by a progress callback.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An entry name would resolve outside the sealed destination root.
    ///
    /// This is a **security error** indicating the archive contains a path
    /// designed to escape the extraction directory: `..` components,
    /// absolute paths, drive-letter or UNC prefixes, NUL bytes, or a
    /// resolved target whose existing ancestors include a symbolic link.
    ///
    /// **Never extract archives producing this error without understanding
    /// the risk.** There is no option to disable the check.
    #[error("path escape in entry {entry_index} ('{name}'): {reason}")]
    PathEscape {
        /// The index of the offending entry.
        entry_index: usize,
        /// The entry name as the archive reports it.
        name: String,
        /// A description of which rule rejected the name.
        reason: String,
    },

    /// A symlink entry was encountered while the symlink policy is `Error`.
    ///
    /// Symlinks are never materialised; the configurable choice is only
    /// between silently skipping them and failing the extraction. See
    /// [`SymlinkPolicy`](crate::SymlinkPolicy).
    #[error("symbolic link rejected at entry {entry_index}: {name}")]
    SymlinkNotAllowed {
        /// The index of the symlink entry.
        entry_index: usize,
        /// The entry name as the archive reports it.
        name: String,
    },

    /// A quota cap was exceeded.
    ///
    /// This error protects against malicious archives ("zip bombs") that
    /// decompress to extremely large sizes or entry counts. The message
    /// names the cap that tripped: total bytes, file count, per-file bytes,
    /// or path depth.
    #[error("quota exceeded: {0}")]
    Quota(String),

    /// The destination path already exists.
    ///
    /// Returned under [`OverwritePolicy::Error`](crate::OverwritePolicy),
    /// and unconditionally when the existing entry has a different kind
    /// than the archive entry (a file where a directory should go, or vice
    /// versa).
    #[error("destination already exists: {path}")]
    AlreadyExists {
        /// The on-disk path that already exists.
        path: PathBuf,
    },

    /// A ZIP entry has its encryption bit set.
    ///
    /// Encrypted archives are rejected outright; there is no password
    /// support.
    #[error("entry {entry_index} ('{name}') is encrypted; encrypted archives are not supported")]
    EncryptedArchive {
        /// The index of the encrypted entry.
        entry_index: usize,
        /// The entry name as the archive reports it.
        name: String,
    },

    /// A TAR entry has a typeflag the engine does not extract.
    ///
    /// Regular files, directories and symlinks (plus the long-name and PAX
    /// metadata records consumed by the decoder) are understood; hard
    /// links, FIFOs and device nodes are not.
    #[error("unsupported entry type {type_name} at entry {entry_index} ('{name}')")]
    UnsupportedEntryType {
        /// The index of the offending entry.
        entry_index: usize,
        /// The entry name as the archive reports it.
        name: String,
        /// The decoder's description of the typeflag.
        type_name: String,
    },

    /// The underlying decoder produced malformed data.
    ///
    /// Covers truncated headers, corrupt gzip streams, unsupported
    /// compression methods, and CRC mismatches detected during
    /// verification.
    #[error("malformed archive: {0}")]
    Format(String),
}

impl Error {
    /// Returns `true` if this error indicates a security issue.
    ///
    /// Security errors should generally cause the archive to be quarantined
    /// or rejected; they are never produced by well-formed benign archives.
    pub fn is_security_error(&self) -> bool {
        matches!(
            self,
            Error::PathEscape { .. } | Error::SymlinkNotAllowed { .. }
        )
    }

    /// Returns `true` if this error was produced by a quota cap.
    pub fn is_quota_error(&self) -> bool {
        matches!(self, Error::Quota(_))
    }
}

/// Maps a read error surfaced by a format decoder to the crate error.
///
/// Decoders report malformed input through synthetic `io::Error` values
/// (`InvalidData`, `UnexpectedEof`, or custom messages); those become
/// [`Error::Format`]. A genuine operating-system failure carries an errno
/// and stays [`Error::Io`].
pub(crate) fn map_read_error(err: io::Error) -> Error {
    if err.raw_os_error().is_some() {
        Error::Io(err)
    } else {
        Error::Format(err.to_string())
    }
}

/// A specialized `Result` type for archive extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
