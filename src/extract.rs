//! The extraction driver.
//!
//! Orchestrates the per-entry pipeline
//! `filter → path guard → quota → overwrite policy → streaming copy` in
//! one of two modes. `streaming` extracts entries as they are read and
//! needs constant additional memory; `validate_first` runs every
//! non-writing check over the whole archive, records a per-entry plan,
//! and only then writes; if any check fails, nothing is written.
//!
//! The driver exclusively owns the quota ledger, the current entry's body
//! reader and any open output file. Failures are immediately fatal; a
//! partially written current file is removed before the error propagates.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

use crate::copier::copy_entry;
use crate::entry::{EntryKind, RawEntry};
use crate::filter::FilterSet;
use crate::format::ArchiveReader;
use crate::guard::{self, SealedRoot};
use crate::options::{Extractor, ExtractMode, SymlinkPolicy};
use crate::overwrite::{self, Prepared};
use crate::progress::Progress;
use crate::quota::QuotaLedger;
use crate::report::Report;
use crate::{Error, Result};

#[cfg(feature = "tar")]
use crate::format::tar::{Codec, TarReader};
#[cfg(feature = "zip")]
use crate::format::zip::ZipReader;

impl Extractor {
    /// Extracts a ZIP archive from a file path.
    #[cfg(feature = "zip")]
    #[cfg_attr(docsrs, doc(cfg(feature = "zip")))]
    pub fn extract_zip_path(&self, archive: impl AsRef<Path>) -> Result<Report> {
        let file = File::open(archive.as_ref())?;
        let mut reader = ZipReader::new(BufReader::new(file))?;
        run(&mut reader, self)
    }

    /// Extracts a ZIP archive held in memory.
    #[cfg(feature = "zip")]
    #[cfg_attr(docsrs, doc(cfg(feature = "zip")))]
    pub fn extract_zip_bytes(&self, bytes: &[u8]) -> Result<Report> {
        let mut reader = ZipReader::new(Cursor::new(bytes))?;
        run(&mut reader, self)
    }

    /// Extracts an uncompressed TAR archive from a file path.
    #[cfg(feature = "tar")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
    pub fn extract_tar_path(&self, archive: impl AsRef<Path>) -> Result<Report> {
        let file = File::open(archive.as_ref())?;
        let mut reader = TarReader::new(BufReader::new(file), Codec::Plain);
        run(&mut reader, self)
    }

    /// Extracts an uncompressed TAR archive held in memory.
    #[cfg(feature = "tar")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
    pub fn extract_tar_bytes(&self, bytes: &[u8]) -> Result<Report> {
        let mut reader = TarReader::new(Cursor::new(bytes), Codec::Plain);
        run(&mut reader, self)
    }

    /// Extracts a gzip-compressed TAR archive from a file path.
    #[cfg(feature = "tar")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
    pub fn extract_tar_gz_path(&self, archive: impl AsRef<Path>) -> Result<Report> {
        let file = File::open(archive.as_ref())?;
        let mut reader = TarReader::new(BufReader::new(file), Codec::Gzip);
        run(&mut reader, self)
    }

    /// Extracts a gzip-compressed TAR archive held in memory.
    #[cfg(feature = "tar")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tar")))]
    pub fn extract_tar_gz_bytes(&self, bytes: &[u8]) -> Result<Report> {
        let mut reader = TarReader::new(Cursor::new(bytes), Codec::Gzip);
        run(&mut reader, self)
    }
}

/// Per-entry decision recorded by the validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Extract,
    Skip,
}

/// What became of one entry that passed all checks.
enum Outcome {
    Completed,
    Skipped,
}

pub(crate) fn run(archive: &mut dyn ArchiveReader, cfg: &Extractor) -> Result<Report> {
    let root = SealedRoot::seal(&cfg.dest)?;
    let filters = FilterSet::new(&cfg.only, &cfg.include_glob, &cfg.exclude_glob);
    match cfg.mode {
        ExtractMode::Streaming => run_streaming(archive, cfg, &root, &filters),
        ExtractMode::ValidateFirst => run_validate_first(archive, cfg, &root, &filters),
    }
}

fn run_streaming(
    archive: &mut dyn ArchiveReader,
    cfg: &Extractor,
    root: &SealedRoot,
    filters: &FilterSet<'_>,
) -> Result<Report> {
    let mut ledger = QuotaLedger::new(cfg.max_total_bytes, cfg.max_files, cfg.max_single_file_bytes);
    archive.scan(&mut |entries| {
        let total = entries.len_hint();
        let mut index = 0usize;
        while let Some(entry) = entries.next_entry()? {
            process_entry(entry, index, total, cfg, root, filters, &mut ledger)?;
            index += 1;
        }
        Ok(())
    })?;
    Ok(ledger.into_report())
}

fn run_validate_first(
    archive: &mut dyn ArchiveReader,
    cfg: &Extractor,
    root: &SealedRoot,
    filters: &FilterSet<'_>,
) -> Result<Report> {
    // Pass 1: every check that does not require writing. Declared sizes
    // stand in for actual payload sizes in the quota accounting.
    let mut plan: Vec<Decision> = Vec::new();
    {
        let mut declared =
            QuotaLedger::new(cfg.max_total_bytes, cfg.max_files, cfg.max_single_file_bytes);
        archive.scan(&mut |entries| {
            let mut index = 0usize;
            while let Some(entry) = entries.next_entry()? {
                let decision = validate_entry(&entry, index, cfg, root, filters, &mut declared)?;
                plan.push(decision);
                index += 1;
            }
            Ok(())
        })?;
    }

    // Pass 2: writes, with real streaming accounting.
    let total = plan.len();
    let mut ledger = QuotaLedger::new(cfg.max_total_bytes, cfg.max_files, cfg.max_single_file_bytes);
    archive.scan(&mut |entries| {
        let mut index = 0usize;
        while let Some(entry) = entries.next_entry()? {
            match plan.get(index) {
                Some(Decision::Extract) => {
                    process_entry(entry, index, Some(total), cfg, root, filters, &mut ledger)?;
                }
                Some(Decision::Skip) => ledger.record_skipped(),
                None => {
                    return Err(Error::Format(
                        "archive grew between validation passes".into(),
                    ));
                }
            }
            index += 1;
        }
        Ok(())
    })?;
    Ok(ledger.into_report())
}

/// Runs the read-only pipeline over one entry and records the decision.
fn validate_entry(
    entry: &RawEntry<'_>,
    index: usize,
    cfg: &Extractor,
    root: &SealedRoot,
    filters: &FilterSet<'_>,
    declared: &mut QuotaLedger,
) -> Result<Decision> {
    if !filters.admits(&entry.name) {
        return Ok(Decision::Skip);
    }
    let components = guard::validate_name(&entry.name, cfg.max_depth, index)?;
    match entry.kind {
        EntryKind::Other => Ok(Decision::Skip),
        EntryKind::Symlink => match cfg.symlinks {
            SymlinkPolicy::Skip => Ok(Decision::Skip),
            SymlinkPolicy::Error => Err(Error::SymlinkNotAllowed {
                entry_index: index,
                name: entry.name.clone(),
            }),
        },
        EntryKind::Directory => {
            let resolved = guard::resolve(root, &components, &entry.name, index)?;
            overwrite::check_directory(&resolved.path)?;
            Ok(Decision::Extract)
        }
        EntryKind::File => {
            let resolved = guard::resolve(root, &components, &entry.name, index)?;
            declared.precheck_declared(&entry.name, entry.declared_size)?;
            declared.reserve_file_slot(&entry.name)?;
            match overwrite::check_file(&resolved.path, cfg.overwrite)? {
                Prepared::Skip => Ok(Decision::Skip),
                Prepared::Write => {
                    // Commit only for entries the plan will extract, so a
                    // skipped-existing file does not eat into the budget.
                    declared.charge_declared(&entry.name, entry.declared_size)?;
                    declared.record_file();
                    Ok(Decision::Extract)
                }
            }
        }
    }
}

/// Runs the full pipeline over one entry, then reports progress.
fn process_entry(
    entry: RawEntry<'_>,
    index: usize,
    total: Option<usize>,
    cfg: &Extractor,
    root: &SealedRoot,
    filters: &FilterSet<'_>,
    ledger: &mut QuotaLedger,
) -> Result<()> {
    let RawEntry {
        name,
        kind,
        declared_size,
        unix_mode,
        crc32: _,
        mut body,
    } = entry;

    let outcome = handle_entry(
        &name,
        kind,
        declared_size,
        unix_mode,
        body.as_mut(),
        index,
        cfg,
        root,
        filters,
        ledger,
    )?;

    match outcome {
        Outcome::Skipped => ledger.record_skipped(),
        Outcome::Completed => {
            if let Some(callback) = &cfg.on_progress {
                let snapshot = Progress {
                    entry_name: &name,
                    entry_size: declared_size,
                    entry_index: index,
                    total_entries: total,
                    bytes_written: ledger.bytes_written(),
                    files_extracted: ledger.files_extracted(),
                };
                callback(&snapshot).map_err(Error::Io)?;
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_entry(
    name: &str,
    kind: EntryKind,
    declared_size: u64,
    unix_mode: Option<u32>,
    body: &mut dyn Read,
    index: usize,
    cfg: &Extractor,
    root: &SealedRoot,
    filters: &FilterSet<'_>,
    ledger: &mut QuotaLedger,
) -> Result<Outcome> {
    if !filters.admits(name) {
        log::debug!("entry '{}' filtered out", name);
        return Ok(Outcome::Skipped);
    }
    let components = guard::validate_name(name, cfg.max_depth, index)?;

    match kind {
        EntryKind::Other => {
            log::debug!("skipping entry '{}' with no extractable payload", name);
            Ok(Outcome::Skipped)
        }
        EntryKind::Symlink => match cfg.symlinks {
            SymlinkPolicy::Skip => {
                log::debug!("skipping symlink entry '{}'", name);
                Ok(Outcome::Skipped)
            }
            SymlinkPolicy::Error => Err(Error::SymlinkNotAllowed {
                entry_index: index,
                name: name.to_string(),
            }),
        },
        EntryKind::Directory => {
            let resolved = guard::resolve(root, &components, name, index)?;
            if overwrite::prepare_directory(&resolved.path)? {
                ledger.record_dir();
            }
            Ok(Outcome::Completed)
        }
        EntryKind::File => {
            let resolved = guard::resolve(root, &components, name, index)?;
            ledger.precheck_declared(name, declared_size)?;
            ledger.reserve_file_slot(name)?;

            match overwrite::prepare_file(&resolved.path, cfg.overwrite)? {
                Prepared::Skip => {
                    log::debug!("skipping existing '{}'", resolved.path.display());
                    return Ok(Outcome::Skipped);
                }
                Prepared::Write => {}
            }
            if let Some(parent) = resolved.path.parent() {
                fs::create_dir_all(parent)?;
            }

            // The slot was freed (or never occupied) above; `create_new`
            // refuses anything that appeared in between.
            let mut out = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&resolved.path)
                .map_err(|e| {
                    if e.kind() == io::ErrorKind::AlreadyExists {
                        Error::AlreadyExists {
                            path: resolved.path.clone(),
                        }
                    } else {
                        Error::Io(e)
                    }
                })?;

            if let Err(err) = copy_entry(body, &mut out, ledger, name) {
                drop(out);
                if let Err(cleanup) = fs::remove_file(&resolved.path) {
                    log::warn!(
                        "failed to remove partial file '{}': {}",
                        resolved.path.display(),
                        cleanup
                    );
                }
                return Err(err);
            }

            apply_permissions(&out, unix_mode)?;
            ledger.record_file();
            Ok(Outcome::Completed)
        }
    }
}

/// Applies the minimal permission rule: owner read/write always, the
/// archive's execute bits when it reports any. setuid/setgid/sticky are
/// masked out. Non-POSIX hosts keep the platform defaults.
#[cfg(unix)]
fn apply_permissions(out: &File, unix_mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut mode = 0o644;
    if let Some(archive_mode) = unix_mode {
        mode |= archive_mode & 0o111;
    }
    out.set_permissions(fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn apply_permissions(_out: &File, _unix_mode: Option<u32>) -> Result<()> {
    Ok(())
}
