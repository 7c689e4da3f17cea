//! Format-neutral entry iteration.
//!
//! Each archive format supplies one capability: produce the next
//! [`RawEntry`] or signal end-of-stream or a format error. The driver,
//! lister and verifier consume entries exclusively through the
//! [`EntryIterator`] trait and carry no compile-time branch on the format.
//!
//! An [`ArchiveReader`] is the re-scannable container behind an iterator:
//! `validate_first` mode walks the same archive twice, so the container
//! must be able to restart the entry stream (ZIP by resetting its index
//! into the central directory, TAR by rewinding the seekable source).

use std::io::Read;

use crate::Result;
use crate::entry::RawEntry;

#[cfg(feature = "tar")]
pub(crate) mod tar;
#[cfg(feature = "zip")]
pub(crate) mod zip;

/// A lazy, format-neutral stream of archive entries.
///
/// Entries must be consumed in order; the body reader of one entry is
/// invalidated by the next call.
pub(crate) trait EntryIterator {
    /// Advances to the next entry, or returns `None` at end of stream.
    fn next_entry(&mut self) -> Result<Option<RawEntry<'_>>>;

    /// Number of entries when the format knows it up front (ZIP central
    /// directory); `None` for single-pass streams.
    fn len_hint(&self) -> Option<usize> {
        None
    }
}

/// A container that can walk its entries from the start, repeatedly.
pub(crate) trait ArchiveReader {
    /// Restarts the entry stream and hands it to `walk`.
    fn scan(&mut self, walk: &mut dyn FnMut(&mut dyn EntryIterator) -> Result<()>) -> Result<()>;
}

/// Reads an entry body to the end, discarding the data.
///
/// Used by the verifier for formats without per-entry checksums: the read
/// itself exercises the decoder over the full payload.
pub(crate) fn drain(body: &mut dyn Read) -> std::io::Result<u64> {
    let mut buf = [0u8; crate::READ_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = body.read(&mut buf)?;
        if n == 0 {
            return Ok(total);
        }
        total += n as u64;
    }
}

/// Strips the trailing `/` that directory entries carry in both formats.
pub(crate) fn trim_dir_name(name: &str) -> String {
    name.trim_end_matches('/').to_string()
}
