//! Progress reporting for extraction.
//!
//! The engine invokes the configured callback inline on the calling
//! thread, between entries and never during a chunk copy, so the callback
//! always observes consistent ledger state. It fires once per successfully
//! processed entry; it is never called with a failed entry.
//!
//! # Example
//!
//! ```rust,no_run
//! use unpak::Extractor;
//!
//! let report = Extractor::new("./out")
//!     .on_progress(|p| {
//!         match p.total_entries {
//!             Some(total) => println!("[{}/{}] {}", p.entry_index + 1, total, p.entry_name),
//!             None => println!("[{}] {}", p.entry_index + 1, p.entry_name),
//!         }
//!         Ok(())
//!     })
//!     .extract_zip_path("archive.zip")?;
//! # let _ = report;
//! # Ok::<(), unpak::Error>(())
//! ```

use std::io;

/// A snapshot handed to the progress callback after each processed entry.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Archive-relative name of the entry just processed.
    pub entry_name: &'a str,
    /// The entry's declared size in bytes.
    pub entry_size: u64,
    /// Zero-based index of the entry in archive order.
    pub entry_index: usize,
    /// Total number of entries when known up front (ZIP central directory,
    /// or the validation pass of `validate_first` mode); `None` for a
    /// single-pass TAR stream.
    pub total_entries: Option<usize>,
    /// Total payload bytes written so far.
    pub bytes_written: u64,
    /// Regular files extracted so far.
    pub files_extracted: u64,
}

/// The boxed callback type stored in the extractor configuration.
///
/// Returning an error aborts the extraction; it surfaces as
/// [`Error::Io`](crate::Error::Io). The callback must not re-enter the
/// engine.
pub type ProgressCallback = Box<dyn Fn(&Progress<'_>) -> io::Result<()>>;
