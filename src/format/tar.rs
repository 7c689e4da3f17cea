//! TAR entry iteration, with an optional gzip envelope.
//!
//! The decoder consumes PAX extended headers and GNU long-name records and
//! applies them to the following entry, so the iterator only ever sees
//! real entries. Sparse files and PAX global headers are yielded as
//! [`EntryKind::Other`] for the driver to count as skipped; any other
//! typeflag outside regular/directory/symlink is an
//! [`UnsupportedEntryType`](crate::Error::UnsupportedEntryType) failure.
//! A corrupt gzip stream surfaces as a format error.

use std::io::{Read, Seek, SeekFrom};

use flate2::read::GzDecoder;

use super::{ArchiveReader, EntryIterator, trim_dir_name};
use crate::entry::{EntryKind, RawEntry};
use crate::error::map_read_error;
use crate::{Error, Result};

/// The compression envelope around a TAR stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Codec {
    Plain,
    Gzip,
}

/// A seekable TAR (or TAR+gzip) source.
///
/// Each scan rewinds the source and re-reads the stream from the start;
/// for the gzip codec a fresh decoder wraps the rewound source.
pub(crate) struct TarReader<R: Read + Seek> {
    reader: R,
    codec: Codec,
}

impl<R: Read + Seek> TarReader<R> {
    pub(crate) fn new(reader: R, codec: Codec) -> Self {
        Self { reader, codec }
    }
}

impl<R: Read + Seek> ArchiveReader for TarReader<R> {
    fn scan(&mut self, walk: &mut dyn FnMut(&mut dyn EntryIterator) -> Result<()>) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        match self.codec {
            Codec::Plain => {
                let mut archive = tar::Archive::new(&mut self.reader);
                let entries = archive.entries().map_err(map_read_error)?;
                walk(&mut TarEntries { entries, index: 0 })
            }
            Codec::Gzip => {
                let decoder = GzDecoder::new(&mut self.reader);
                let mut archive = tar::Archive::new(decoder);
                let entries = archive.entries().map_err(map_read_error)?;
                walk(&mut TarEntries { entries, index: 0 })
            }
        }
    }
}

struct TarEntries<'a, R: Read> {
    entries: tar::Entries<'a, R>,
    index: usize,
}

impl<R: Read> EntryIterator for TarEntries<'_, R> {
    fn next_entry(&mut self) -> Result<Option<RawEntry<'_>>> {
        let Some(next) = self.entries.next() else {
            return Ok(None);
        };
        let entry = next.map_err(map_read_error)?;
        let index = self.index;
        self.index += 1;

        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let header = entry.header();
        let entry_type = header.entry_type();

        let kind = if entry_type.is_file() {
            EntryKind::File
        } else if entry_type.is_dir() {
            EntryKind::Directory
        } else if entry_type.is_symlink() {
            EntryKind::Symlink
        } else if entry_type.is_gnu_sparse() || entry_type.is_pax_global_extensions() {
            EntryKind::Other
        } else {
            return Err(Error::UnsupportedEntryType {
                entry_index: index,
                name,
                type_name: format!("{:?}", entry_type),
            });
        };

        let name = if kind == EntryKind::Directory {
            trim_dir_name(&name)
        } else {
            name
        };
        let declared_size = header.size().map_err(map_read_error)?;
        let unix_mode = header.mode().ok();

        Ok(Some(RawEntry {
            name,
            kind,
            declared_size,
            unix_mode,
            crc32: None,
            body: Box::new(entry),
        }))
    }
}
