//! # unpak
//!
//! Hardened extraction of untrusted ZIP, TAR and gzip-compressed TAR
//! archives into a caller-supplied destination directory.
//!
//! The crate is built for upload handlers, build systems and any service
//! that must accept archives from the network. It defends against the two
//! classic attack families:
//!
//! - **Zip-Slip**: entries whose paths escape the destination, via `..`
//!   components, absolute paths, drive-letter prefixes, or symlinks
//!   planted beneath the destination. Every resolved path is proven to
//!   lie strictly inside the sealed destination root.
//! - **Zip-Bombs**: archives that inflate to catastrophic size or entry
//!   count. Running quota counters bound total bytes, file count,
//!   per-file bytes and path depth, and every charge happens *before* the
//!   resource is consumed.
//!
//! ## Quick Start
//!
//! ### Extracting an Archive
//!
//! ```rust,no_run
//! use unpak::Extractor;
//!
//! fn main() -> unpak::Result<()> {
//!     let report = Extractor::new("/var/uploads").extract_zip_path("upload.zip")?;
//!     println!(
//!         "extracted {} files ({} bytes), skipped {}",
//!         report.files_extracted, report.bytes_written, report.entries_skipped
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ### Tightening the Limits
//!
//! ```rust,no_run
//! use unpak::{Extractor, ExtractMode, OverwritePolicy, SymlinkPolicy};
//!
//! fn main() -> unpak::Result<()> {
//!     let report = Extractor::new("/var/uploads")
//!         .max_total_mb(500)
//!         .max_files(1_000)
//!         .max_single_file_mb(50)
//!         .overwrite(OverwritePolicy::Skip)
//!         .symlinks(SymlinkPolicy::Error)
//!         .mode(ExtractMode::ValidateFirst)
//!         .extract_tar_gz_path("release.tar.gz")?;
//!     println!("{} files", report.files_extracted);
//!     Ok(())
//! }
//! ```
//!
//! ### Listing and Verifying
//!
//! ```rust,no_run
//! fn main() -> unpak::Result<()> {
//!     for entry in unpak::list_zip_path("upload.zip")? {
//!         println!("{:>10}  {} ({})", entry.size, entry.name, entry.kind);
//!     }
//!     let report = unpak::verify_zip_path("upload.zip")?;
//!     println!("verified {} entries", report.entries_verified);
//!     Ok(())
//! }
//! ```
//!
//! ## Extraction Modes
//!
//! - [`ExtractMode::Streaming`] (default): entries are extracted as they
//!   are read, with constant additional memory. A failure aborts
//!   immediately; the partially written current file is removed, entries
//!   already completed remain on disk.
//! - [`ExtractMode::ValidateFirst`]: every check that does not require
//!   writing (filters, path guard, declared-size quotas, encryption and
//!   typeflag checks) runs over the whole archive first. If any entry
//!   fails, nothing is written.
//!
//! ## Glob Patterns
//!
//! The `include_glob`/`exclude_glob` filters are anchored to the full
//! archive-relative name: `?` matches exactly one byte other than `/`,
//! `*` matches any run of bytes other than `/`, and `**` additionally
//! crosses `/`.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `zip` | Yes | ZIP support (stored and deflate entries) |
//! | `tar` | Yes | TAR and TAR+gzip support |
//! | `cli` | No | Command-line interface tool |
//!
//! ## Scope
//!
//! The engine is single-threaded and synchronous; an extraction call is a
//! blocking operation that owns all its state. Symlinks are never
//! materialised, encrypted archives are rejected, file ownership is not
//! preserved, and archives are never written or modified in place.
//! Independent extractions on separate threads are safe as long as their
//! destination directories are disjoint.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

/// Chunk size for streamed copies and checksum reads (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod entry;
pub mod error;
pub mod options;
pub mod progress;
pub mod report;

mod copier;
mod extract;
mod filter;
mod format;
mod glob;
mod guard;
mod list;
mod overwrite;
mod quota;
mod verify;

pub use entry::{EntryInfo, EntryKind};
pub use error::{Error, Result};
pub use options::{ExtractMode, Extractor, OverwritePolicy, SymlinkPolicy};
pub use progress::{Progress, ProgressCallback};
pub use report::{Report, VerifyReport};

#[cfg(feature = "zip")]
pub use list::{list_zip_bytes, list_zip_path};
#[cfg(feature = "zip")]
pub use verify::{verify_zip_bytes, verify_zip_path};

#[cfg(feature = "tar")]
pub use list::{list_tar_bytes, list_tar_gz_bytes, list_tar_gz_path, list_tar_path};
#[cfg(feature = "tar")]
pub use verify::{verify_tar_bytes, verify_tar_gz_bytes, verify_tar_gz_path, verify_tar_path};
