//! Result types returned by extraction and verification.

/// Statistics for one completed extraction.
///
/// On success the counters are consistent with the filesystem:
/// `bytes_written` equals the summed sizes of the regular files created,
/// and `files_extracted + entries_skipped` never exceeds the number of
/// entries in the archive.
#[must_use = "extraction reports should be checked for skipped entries"]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Number of regular files written.
    pub files_extracted: u64,
    /// Number of directory entries the engine created.
    pub dirs_created: u64,
    /// Number of entries skipped by filters, overwrite policy, symlink
    /// policy, or unsupported-but-ignorable typeflags.
    pub entries_skipped: u64,
    /// Total payload bytes written to disk.
    pub bytes_written: u64,
}

/// Statistics for one completed verification.
///
/// Returned only when every checked entry passed; any mismatch surfaces as
/// a [`Format`](crate::Error::Format) error instead.
#[must_use = "verification reports should be checked"]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Number of entries that were verified.
    pub entries_verified: u64,
    /// Total payload bytes read during verification.
    pub bytes_verified: u64,
}
