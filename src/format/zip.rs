//! ZIP entry iteration over the central directory.
//!
//! Entries with the encryption bit set are rejected, as are compression
//! methods other than stored and deflate. Symlink entries are recognised
//! through the unix mode bits in the external attributes, which is how the
//! format encodes them.

use std::io::{Read, Seek};

use zip::{CompressionMethod, ZipArchive};

use super::{ArchiveReader, EntryIterator, trim_dir_name};
use crate::entry::{EntryKind, RawEntry};
use crate::{Error, Result};

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// A seekable ZIP archive whose central directory has been parsed.
pub(crate) struct ZipReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> ZipReader<R> {
    /// Parses the end-of-central-directory record and the entry table.
    pub(crate) fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader).map_err(map_zip_error)?;
        Ok(Self { archive })
    }
}

impl<R: Read + Seek> ArchiveReader for ZipReader<R> {
    fn scan(&mut self, walk: &mut dyn FnMut(&mut dyn EntryIterator) -> Result<()>) -> Result<()> {
        let mut entries = ZipEntries {
            archive: &mut self.archive,
            index: 0,
        };
        walk(&mut entries)
    }
}

struct ZipEntries<'a, R: Read + Seek> {
    archive: &'a mut ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> EntryIterator for ZipEntries<'_, R> {
    fn next_entry(&mut self) -> Result<Option<RawEntry<'_>>> {
        if self.index >= self.archive.len() {
            return Ok(None);
        }
        let index = self.index;
        self.index += 1;

        // Inspect the raw entry before asking for a decompressing reader,
        // so encrypted and oddly-compressed entries fail with a precise
        // error instead of whatever the decoder reports.
        {
            let raw = self.archive.by_index_raw(index).map_err(map_zip_error)?;
            if raw.encrypted() {
                return Err(Error::EncryptedArchive {
                    entry_index: index,
                    name: raw.name().to_string(),
                });
            }
            match raw.compression() {
                CompressionMethod::Stored | CompressionMethod::Deflated => {}
                other => {
                    return Err(Error::Format(format!(
                        "entry {} ('{}') uses unsupported compression method {:?}",
                        index,
                        raw.name(),
                        other
                    )));
                }
            }
        }

        let file = self.archive.by_index(index).map_err(map_zip_error)?;
        let kind = entry_kind(file.is_dir(), file.unix_mode());
        let name = if kind == EntryKind::Directory {
            trim_dir_name(file.name())
        } else {
            file.name().to_string()
        };
        let declared_size = file.size();
        let unix_mode = file.unix_mode();
        let crc32 = Some(file.crc32());

        Ok(Some(RawEntry {
            name,
            kind,
            declared_size,
            unix_mode,
            crc32,
            body: Box::new(file),
        }))
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.archive.len())
    }
}

fn entry_kind(is_dir: bool, unix_mode: Option<u32>) -> EntryKind {
    if let Some(mode) = unix_mode {
        if mode & S_IFMT == S_IFLNK {
            return EntryKind::Symlink;
        }
    }
    if is_dir {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}

fn map_zip_error(err: zip::result::ZipError) -> Error {
    match err {
        zip::result::ZipError::Io(e) => Error::Io(e),
        other => Error::Format(other.to_string()),
    }
}
