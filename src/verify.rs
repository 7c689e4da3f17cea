//! Read-only archive verification.
//!
//! ZIP entries are inflated in full and their CRC-32 is recomputed and
//! compared against the central-directory value. TAR has no per-payload
//! checksum, so verification walks the complete stream (and gzip
//! envelope), which exercises every header and the decompressor; any
//! malformed data surfaces as a format error.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use crate::entry::EntryKind;
use crate::error::map_read_error;
use crate::format::{ArchiveReader, drain};
use crate::report::VerifyReport;
use crate::{Error, READ_BUFFER_SIZE, Result};

#[cfg(feature = "tar")]
use crate::format::tar::{Codec, TarReader};
#[cfg(feature = "zip")]
use crate::format::zip::ZipReader;

/// Verifies the integrity of a ZIP archive at `archive`.
#[cfg(feature = "zip")]
#[cfg_attr(docsrs, doc(cfg(feature = "zip")))]
pub fn verify_zip_path(archive: impl AsRef<Path>) -> Result<VerifyReport> {
    let file = File::open(archive.as_ref())?;
    let mut reader = ZipReader::new(BufReader::new(file))?;
    check(&mut reader)
}

/// Verifies the integrity of a ZIP archive held in memory.
#[cfg(feature = "zip")]
#[cfg_attr(docsrs, doc(cfg(feature = "zip")))]
pub fn verify_zip_bytes(bytes: &[u8]) -> Result<VerifyReport> {
    let mut reader = ZipReader::new(Cursor::new(bytes))?;
    check(&mut reader)
}

/// Verifies that an uncompressed TAR archive at `archive` parses in full.
#[cfg(feature = "tar")]
#[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
pub fn verify_tar_path(archive: impl AsRef<Path>) -> Result<VerifyReport> {
    let file = File::open(archive.as_ref())?;
    let mut reader = TarReader::new(BufReader::new(file), Codec::Plain);
    check(&mut reader)
}

/// Verifies that an uncompressed TAR archive held in memory parses in full.
#[cfg(feature = "tar")]
#[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
pub fn verify_tar_bytes(bytes: &[u8]) -> Result<VerifyReport> {
    let mut reader = TarReader::new(Cursor::new(bytes), Codec::Plain);
    check(&mut reader)
}

/// Verifies that a gzip-compressed TAR archive at `archive` parses in full.
#[cfg(feature = "tar")]
#[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
pub fn verify_tar_gz_path(archive: impl AsRef<Path>) -> Result<VerifyReport> {
    let file = File::open(archive.as_ref())?;
    let mut reader = TarReader::new(BufReader::new(file), Codec::Gzip);
    check(&mut reader)
}

/// Verifies that a gzip-compressed TAR archive held in memory parses in full.
#[cfg(feature = "tar")]
#[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
pub fn verify_tar_gz_bytes(bytes: &[u8]) -> Result<VerifyReport> {
    let mut reader = TarReader::new(Cursor::new(bytes), Codec::Gzip);
    check(&mut reader)
}

fn check(archive: &mut dyn ArchiveReader) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();
    archive.scan(&mut |entries| {
        let mut index = 0usize;
        while let Some(mut entry) = entries.next_entry()? {
            match entry.kind {
                EntryKind::File => {
                    let bytes = match entry.crc32 {
                        Some(expected) => {
                            checksum_body(entry.body.as_mut(), expected, index, &entry.name)?
                        }
                        None => drain(entry.body.as_mut()).map_err(map_read_error)?,
                    };
                    report.entries_verified += 1;
                    report.bytes_verified += bytes;
                }
                EntryKind::Directory | EntryKind::Symlink => {
                    report.entries_verified += 1;
                }
                EntryKind::Other => {}
            }
            index += 1;
        }
        Ok(())
    })?;
    Ok(report)
}

/// Reads a body to the end while hashing it, then compares checksums.
fn checksum_body(body: &mut dyn Read, expected: u32, index: usize, name: &str) -> Result<u64> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = body.read(&mut buf).map_err(map_read_error)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }
    let actual = hasher.finalize();
    if actual != expected {
        return Err(Error::Format(format!(
            "CRC mismatch for entry {} ('{}'): expected {:#010x}, got {:#010x}",
            index, name, expected, actual
        )));
    }
    Ok(total)
}
