//! Extraction configuration and policies.

use std::io;
use std::path::{Path, PathBuf};

use crate::progress::{Progress, ProgressCallback};

/// Default cap on total bytes written (1 GiB).
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 1024 * 1024 * 1024;
/// Default cap on the number of extracted files.
pub const DEFAULT_MAX_FILES: u64 = 10_000;
/// Default cap on the size of a single file (100 MiB).
pub const DEFAULT_MAX_SINGLE_FILE_BYTES: u64 = 100 * 1024 * 1024;
/// Default cap on path depth (components of the archive-relative name).
pub const DEFAULT_MAX_DEPTH: u64 = 50;

const MIB: u64 = 1024 * 1024;

/// Policy for handling existing files during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Return an error if the target exists.
    #[default]
    Error,
    /// Skip entries whose target exists.
    Skip,
    /// Remove the existing entry first, then write.
    ///
    /// The removal is an unlink that does not dereference symlinks; a
    /// symlink at the target name is replaced, never followed. Kind
    /// mismatches (directory vs file) remain errors.
    Overwrite,
}

/// Policy for symlink entries found in the archive.
///
/// Materialising symlinks is never offered: a link to `../../etc/passwd`
/// would defeat the path guard on subsequent runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkPolicy {
    /// Drop symlink entries and count them as skipped.
    #[default]
    Skip,
    /// Fail the extraction on the first symlink entry.
    Error,
}

/// Extraction scheduling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Extract entries as they are read. Constant additional memory;
    /// a failure may leave earlier entries on disk (the current partial
    /// file is always removed).
    #[default]
    Streaming,
    /// Run every non-writing check over the whole archive first, then
    /// write. If any check fails, nothing is written.
    ValidateFirst,
}

/// Configuration and entry point for one or more extractions into a fixed
/// destination directory.
///
/// `Extractor` is a builder: every setter consumes and returns it. The
/// configuration is immutable once an extraction begins (extraction
/// methods take `&self`), so one configured extractor can process several
/// archives.
///
/// # Example
///
/// ```rust,no_run
/// use unpak::{Extractor, ExtractMode, OverwritePolicy};
///
/// let report = Extractor::new("/var/uploads")
///     .max_total_mb(500)
///     .max_files(1_000)
///     .overwrite(OverwritePolicy::Skip)
///     .mode(ExtractMode::ValidateFirst)
///     .extract_zip_path("upload.zip")?;
/// println!("extracted {} files", report.files_extracted);
/// # Ok::<(), unpak::Error>(())
/// ```
pub struct Extractor {
    pub(crate) dest: PathBuf,
    pub(crate) max_total_bytes: u64,
    pub(crate) max_files: u64,
    pub(crate) max_single_file_bytes: u64,
    pub(crate) max_depth: u64,
    pub(crate) overwrite: OverwritePolicy,
    pub(crate) symlinks: SymlinkPolicy,
    pub(crate) mode: ExtractMode,
    pub(crate) only: Vec<String>,
    pub(crate) include_glob: Vec<String>,
    pub(crate) exclude_glob: Vec<String>,
    pub(crate) on_progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("dest", &self.dest)
            .field("max_total_bytes", &self.max_total_bytes)
            .field("max_files", &self.max_files)
            .field("max_single_file_bytes", &self.max_single_file_bytes)
            .field("max_depth", &self.max_depth)
            .field("overwrite", &self.overwrite)
            .field("symlinks", &self.symlinks)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Extractor {
    /// Creates an extractor targeting `dest` with the default caps and
    /// policies.
    pub fn new(dest: impl AsRef<Path>) -> Self {
        Self {
            dest: dest.as_ref().to_path_buf(),
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_files: DEFAULT_MAX_FILES,
            max_single_file_bytes: DEFAULT_MAX_SINGLE_FILE_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
            overwrite: OverwritePolicy::default(),
            symlinks: SymlinkPolicy::default(),
            mode: ExtractMode::default(),
            only: Vec::new(),
            include_glob: Vec::new(),
            exclude_glob: Vec::new(),
            on_progress: None,
        }
    }

    /// Caps the total bytes written, in MiB.
    pub fn max_total_mb(mut self, mb: u64) -> Self {
        self.max_total_bytes = mb.saturating_mul(MIB);
        self
    }

    /// Caps the total bytes written, in bytes.
    pub fn max_total_bytes(mut self, bytes: u64) -> Self {
        self.max_total_bytes = bytes;
        self
    }

    /// Caps the number of extracted files.
    pub fn max_files(mut self, count: u64) -> Self {
        self.max_files = count;
        self
    }

    /// Caps the size of any single file, in MiB.
    pub fn max_single_file_mb(mut self, mb: u64) -> Self {
        self.max_single_file_bytes = mb.saturating_mul(MIB);
        self
    }

    /// Caps the size of any single file, in bytes.
    pub fn max_single_file_bytes(mut self, bytes: u64) -> Self {
        self.max_single_file_bytes = bytes;
        self
    }

    /// Caps the component depth of entry names.
    pub fn max_depth(mut self, depth: u64) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the overwrite policy.
    pub fn overwrite(mut self, policy: OverwritePolicy) -> Self {
        self.overwrite = policy;
        self
    }

    /// Sets the symlink policy.
    pub fn symlinks(mut self, policy: SymlinkPolicy) -> Self {
        self.symlinks = policy;
        self
    }

    /// Sets the extraction mode.
    pub fn mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }

    /// Restricts extraction to exact archive-relative names.
    ///
    /// Repeated calls accumulate. Matching is exact and case-sensitive.
    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds include glob patterns; when any are set, an entry must match
    /// at least one. See the crate docs for the pattern syntax.
    pub fn include_glob<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_glob.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds exclude glob patterns; an entry matching any is skipped.
    pub fn exclude_glob<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_glob.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Installs a progress callback.
    ///
    /// Invoked inline after each successfully processed entry; an `Err`
    /// aborts the extraction as an I/O failure. The callback must not
    /// re-enter the engine.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Progress<'_>) -> io::Result<()> + 'static,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Returns the destination directory this extractor writes into.
    pub fn dest(&self) -> &Path {
        &self.dest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ex = Extractor::new("/tmp/out");
        assert_eq!(ex.max_total_bytes, DEFAULT_MAX_TOTAL_BYTES);
        assert_eq!(ex.max_files, DEFAULT_MAX_FILES);
        assert_eq!(ex.max_single_file_bytes, DEFAULT_MAX_SINGLE_FILE_BYTES);
        assert_eq!(ex.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(ex.overwrite, OverwritePolicy::Error);
        assert_eq!(ex.symlinks, SymlinkPolicy::Skip);
        assert_eq!(ex.mode, ExtractMode::Streaming);
    }

    #[test]
    fn test_mb_setters_scale() {
        let ex = Extractor::new(".").max_total_mb(500).max_single_file_mb(10);
        assert_eq!(ex.max_total_bytes, 500 * MIB);
        assert_eq!(ex.max_single_file_bytes, 10 * MIB);
    }

    #[test]
    fn test_mb_setter_zero_means_zero_bytes() {
        let ex = Extractor::new(".").max_total_mb(0);
        assert_eq!(ex.max_total_bytes, 0);
    }

    #[test]
    fn test_mb_setter_saturates() {
        let ex = Extractor::new(".").max_total_mb(u64::MAX);
        assert_eq!(ex.max_total_bytes, u64::MAX);
    }

    #[test]
    fn test_filter_setters_accumulate() {
        let ex = Extractor::new(".")
            .only(["a.txt"])
            .only(["b.txt"])
            .include_glob(["*.rs"])
            .exclude_glob(["target/**", "*.tmp"]);
        assert_eq!(ex.only, vec!["a.txt", "b.txt"]);
        assert_eq!(ex.include_glob, vec!["*.rs"]);
        assert_eq!(ex.exclude_glob, vec!["target/**", "*.tmp"]);
    }

    #[test]
    fn test_debug_omits_callback() {
        let ex = Extractor::new(".").on_progress(|_| Ok(()));
        let dbg = format!("{:?}", ex);
        assert!(dbg.contains("Extractor"));
        assert!(dbg.contains(".."));
    }
}
