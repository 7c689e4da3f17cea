//! Read-only archive listing.
//!
//! Listing reuses the entry iterators and the lexical half of the path
//! guard, so callers see exactly the rejections extraction would produce,
//! without touching the filesystem. Enumeration is capped at the default
//! file-count quota to bound the cost of hostile archives.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use crate::entry::EntryInfo;
use crate::format::ArchiveReader;
use crate::guard;
use crate::options::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILES};
use crate::{Error, Result};

#[cfg(feature = "tar")]
use crate::format::tar::{Codec, TarReader};
#[cfg(feature = "zip")]
use crate::format::zip::ZipReader;

/// Lists the entries of a ZIP archive at `archive`.
#[cfg(feature = "zip")]
#[cfg_attr(docsrs, doc(cfg(feature = "zip")))]
pub fn list_zip_path(archive: impl AsRef<Path>) -> Result<Vec<EntryInfo>> {
    let file = File::open(archive.as_ref())?;
    let mut reader = ZipReader::new(BufReader::new(file))?;
    collect(&mut reader)
}

/// Lists the entries of a ZIP archive held in memory.
#[cfg(feature = "zip")]
#[cfg_attr(docsrs, doc(cfg(feature = "zip")))]
pub fn list_zip_bytes(bytes: &[u8]) -> Result<Vec<EntryInfo>> {
    let mut reader = ZipReader::new(Cursor::new(bytes))?;
    collect(&mut reader)
}

/// Lists the entries of an uncompressed TAR archive at `archive`.
#[cfg(feature = "tar")]
#[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
pub fn list_tar_path(archive: impl AsRef<Path>) -> Result<Vec<EntryInfo>> {
    let file = File::open(archive.as_ref())?;
    let mut reader = TarReader::new(BufReader::new(file), Codec::Plain);
    collect(&mut reader)
}

/// Lists the entries of an uncompressed TAR archive held in memory.
#[cfg(feature = "tar")]
#[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
pub fn list_tar_bytes(bytes: &[u8]) -> Result<Vec<EntryInfo>> {
    let mut reader = TarReader::new(Cursor::new(bytes), Codec::Plain);
    collect(&mut reader)
}

/// Lists the entries of a gzip-compressed TAR archive at `archive`.
#[cfg(feature = "tar")]
#[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
pub fn list_tar_gz_path(archive: impl AsRef<Path>) -> Result<Vec<EntryInfo>> {
    let file = File::open(archive.as_ref())?;
    let mut reader = TarReader::new(BufReader::new(file), Codec::Gzip);
    collect(&mut reader)
}

/// Lists the entries of a gzip-compressed TAR archive held in memory.
#[cfg(feature = "tar")]
#[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
pub fn list_tar_gz_bytes(bytes: &[u8]) -> Result<Vec<EntryInfo>> {
    let mut reader = TarReader::new(Cursor::new(bytes), Codec::Gzip);
    collect(&mut reader)
}

fn collect(archive: &mut dyn ArchiveReader) -> Result<Vec<EntryInfo>> {
    let mut out = Vec::new();
    archive.scan(&mut |entries| {
        let mut index = 0usize;
        while let Some(entry) = entries.next_entry()? {
            if out.len() as u64 >= DEFAULT_MAX_FILES {
                return Err(Error::Quota(format!(
                    "archive lists more than {} entries",
                    DEFAULT_MAX_FILES
                )));
            }
            guard::validate_name(&entry.name, DEFAULT_MAX_DEPTH, index)?;
            out.push(EntryInfo {
                name: entry.name,
                size: entry.declared_size,
                kind: entry.kind,
            });
            index += 1;
        }
        Ok(())
    })?;
    Ok(out)
}
