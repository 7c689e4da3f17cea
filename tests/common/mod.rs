//! Shared test utilities for integration tests.
//!
//! Fixture archives are built in memory with the write sides of the same
//! format crates the library reads with.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test
//! file compiles as a separate crate and may only use a subset of these
//! helpers.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use flate2::Compression;
use flate2::write::GzEncoder;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One fixture entry for the ZIP builder.
pub enum ZipEntry<'a> {
    File(&'a str, &'a [u8]),
    FileWithMode(&'a str, &'a [u8], u32),
    /// Stored (uncompressed) file, for byte-level corruption tests.
    StoredFile(&'a str, &'a [u8]),
    Dir(&'a str),
    Symlink(&'a str, &'a str),
}

/// Builds an in-memory ZIP archive from the given entries.
pub fn zip_archive(entries: &[ZipEntry<'_>]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for entry in entries {
        match entry {
            ZipEntry::File(name, data) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
            ZipEntry::FileWithMode(name, data, mode) => {
                writer
                    .start_file(*name, options.unix_permissions(*mode))
                    .unwrap();
                writer.write_all(data).unwrap();
            }
            ZipEntry::StoredFile(name, data) => {
                writer
                    .start_file(*name, options.compression_method(CompressionMethod::Stored))
                    .unwrap();
                writer.write_all(data).unwrap();
            }
            ZipEntry::Dir(name) => {
                writer.add_directory(*name, options).unwrap();
            }
            ZipEntry::Symlink(name, target) => {
                writer.add_symlink(*name, *target, options).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Builds a ZIP archive of plain files.
pub fn zip_files(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let entries: Vec<ZipEntry<'_>> = entries
        .iter()
        .map(|(name, data)| ZipEntry::File(name, data))
        .collect();
    zip_archive(&entries)
}

/// One fixture entry for the TAR builder.
pub enum TarEntry<'a> {
    File(&'a str, &'a [u8]),
    FileWithMode(&'a str, &'a [u8], u32),
    Dir(&'a str),
    Symlink(&'a str, &'a str),
    Hardlink(&'a str, &'a str),
    Fifo(&'a str),
}

/// Writes `name` straight into a GNU header's raw name bytes, bypassing the
/// `tar` crate's path validation (which rejects `..` components). This lets
/// fixtures build archives containing traversal paths that a well-behaved
/// writer would refuse to produce, as needed for security tests.
fn set_raw_name(header: &mut tar::Header, name: &str) {
    let bytes = name.as_bytes();
    let slot = &mut header.as_old_mut().name;
    assert!(bytes.len() < slot.len(), "fixture name too long for raw header");
    slot[..bytes.len()].copy_from_slice(bytes);
    slot[bytes.len()..].fill(0);
}

/// Builds an in-memory TAR archive from the given entries.
pub fn tar_archive(entries: &[TarEntry<'_>]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for entry in entries {
        match entry {
            TarEntry::File(name, data) => {
                let mut header = tar::Header::new_gnu();
                header.set_size(data.len() as u64);
                header.set_mode(0o644);
                set_raw_name(&mut header, name);
                header.set_cksum();
                builder.append(&header, *data).unwrap();
            }
            TarEntry::FileWithMode(name, data, mode) => {
                let mut header = tar::Header::new_gnu();
                header.set_size(data.len() as u64);
                header.set_mode(*mode);
                builder.append_data(&mut header, name, *data).unwrap();
            }
            TarEntry::Dir(name) => {
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                builder.append_data(&mut header, name, &[][..]).unwrap();
            }
            TarEntry::Symlink(name, target) => {
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_size(0);
                builder.append_link(&mut header, name, target).unwrap();
            }
            TarEntry::Hardlink(name, target) => {
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Link);
                header.set_size(0);
                builder.append_link(&mut header, name, target).unwrap();
            }
            TarEntry::Fifo(name) => {
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Fifo);
                header.set_size(0);
                header.set_mode(0o644);
                builder.append_data(&mut header, name, &[][..]).unwrap();
            }
        }
    }
    builder.into_inner().unwrap()
}

/// Builds a TAR archive of plain files.
pub fn tar_files(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let entries: Vec<TarEntry<'_>> = entries
        .iter()
        .map(|(name, data)| TarEntry::File(name, data))
        .collect();
    tar_archive(&entries)
}

/// Wraps raw bytes in a gzip envelope.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// Builds a gzip-compressed TAR archive of plain files.
pub fn tar_gz_files(entries: &[(&str, &[u8])]) -> Vec<u8> {
    gzip(&tar_files(entries))
}

/// Collects the relative paths of all files and directories under `root`,
/// sorted, as forward-slash strings.
pub fn snapshot_tree(root: &std::path::Path) -> Vec<String> {
    fn walk(dir: &std::path::Path, root: &std::path::Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            let rel = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            out.push(rel);
            if entry.file_type().unwrap().is_dir() {
                walk(&path, root, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
