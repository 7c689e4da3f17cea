//! Running quota counters for one extraction.
//!
//! Every charge is an upper-bound check performed before the resource is
//! consumed, which is what makes the ledger safe in streaming mode: a bomb
//! is cut off at the first chunk that would cross a limit, never after the
//! fact. All additions use checked arithmetic; overflow is reported as a
//! quota failure rather than wrapping.

use crate::report::Report;
use crate::{Error, Result};

/// Counters and caps for one extraction.
///
/// The ledger is exclusively owned by the driver; the counters are
/// monotone non-decreasing and `bytes_written` never exceeds
/// `max_total_bytes` at any observable point.
#[derive(Debug)]
pub(crate) struct QuotaLedger {
    max_total_bytes: u64,
    max_files: u64,
    max_single_file_bytes: u64,
    bytes_written: u64,
    files_extracted: u64,
    dirs_created: u64,
    entries_skipped: u64,
}

impl QuotaLedger {
    pub(crate) fn new(max_total_bytes: u64, max_files: u64, max_single_file_bytes: u64) -> Self {
        Self {
            max_total_bytes,
            max_files,
            max_single_file_bytes,
            bytes_written: 0,
            files_extracted: 0,
            dirs_created: 0,
            entries_skipped: 0,
        }
    }

    /// Cheap pre-rejection against the size the archive header declares.
    ///
    /// The declared size is never trusted for accounting (the streaming
    /// checks catch liars), but an honest oversized declaration fails here
    /// before any byte is read.
    pub(crate) fn precheck_declared(&self, name: &str, declared: u64) -> Result<()> {
        if declared > self.max_single_file_bytes {
            return Err(Error::Quota(format!(
                "entry '{}' declares {} bytes, exceeding the per-file limit of {}",
                name, declared, self.max_single_file_bytes
            )));
        }
        let projected = self
            .bytes_written
            .checked_add(declared)
            .ok_or_else(|| overflow(name))?;
        if projected > self.max_total_bytes {
            return Err(Error::Quota(format!(
                "entry '{}' declares {} bytes, exceeding the total limit of {}",
                name, declared, self.max_total_bytes
            )));
        }
        Ok(())
    }

    /// Like [`precheck_declared`](Self::precheck_declared), but commits the
    /// declared bytes to the running total. Used by the validation pass,
    /// where declared sizes are all the information available.
    pub(crate) fn charge_declared(&mut self, name: &str, declared: u64) -> Result<()> {
        self.precheck_declared(name, declared)?;
        self.bytes_written += declared;
        Ok(())
    }

    /// Checks that one more file fits under `max_files`. Charged before the
    /// output file is opened.
    pub(crate) fn reserve_file_slot(&self, name: &str) -> Result<()> {
        let next = self
            .files_extracted
            .checked_add(1)
            .ok_or_else(|| overflow(name))?;
        if next > self.max_files {
            return Err(Error::Quota(format!(
                "entry '{}' exceeds the file count limit of {}",
                name, self.max_files
            )));
        }
        Ok(())
    }

    /// Charges one chunk about to be written for the current entry.
    ///
    /// `entry_bytes` is the payload written for this entry so far. Both the
    /// per-file and the total cap are checked before the chunk is admitted;
    /// on success the total is advanced.
    pub(crate) fn charge_chunk(&mut self, name: &str, entry_bytes: u64, chunk: u64) -> Result<()> {
        let entry_total = entry_bytes
            .checked_add(chunk)
            .ok_or_else(|| overflow(name))?;
        if entry_total > self.max_single_file_bytes {
            return Err(Error::Quota(format!(
                "entry '{}' exceeds the per-file limit of {} bytes",
                name, self.max_single_file_bytes
            )));
        }
        let new_total = self
            .bytes_written
            .checked_add(chunk)
            .ok_or_else(|| overflow(name))?;
        if new_total > self.max_total_bytes {
            return Err(Error::Quota(format!(
                "entry '{}' exceeds the total limit of {} bytes",
                name, self.max_total_bytes
            )));
        }
        self.bytes_written = new_total;
        Ok(())
    }

    pub(crate) fn record_file(&mut self) {
        self.files_extracted += 1;
    }

    pub(crate) fn record_dir(&mut self) {
        self.dirs_created += 1;
    }

    pub(crate) fn record_skipped(&mut self) {
        self.entries_skipped += 1;
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub(crate) fn files_extracted(&self) -> u64 {
        self.files_extracted
    }

    pub(crate) fn into_report(self) -> Report {
        Report {
            files_extracted: self.files_extracted,
            dirs_created: self.dirs_created,
            entries_skipped: self.entries_skipped,
            bytes_written: self.bytes_written,
        }
    }
}

fn overflow(name: &str) -> Error {
    Error::Quota(format!("byte counter overflow at entry '{}'", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> QuotaLedger {
        QuotaLedger::new(1000, 3, 100)
    }

    #[test]
    fn test_precheck_declared_per_file() {
        let ledger = ledger();
        assert!(ledger.precheck_declared("ok", 100).is_ok());
        let err = ledger.precheck_declared("big", 101).unwrap_err();
        assert!(err.is_quota_error());
    }

    #[test]
    fn test_precheck_declared_total() {
        let mut ledger = QuotaLedger::new(150, 10, 100);
        ledger.charge_chunk("a", 0, 100).unwrap();
        assert!(ledger.precheck_declared("b", 50).is_ok());
        assert!(ledger.precheck_declared("b", 51).unwrap_err().is_quota_error());
    }

    #[test]
    fn test_zero_total_cap_rejects_any_declared_byte() {
        let ledger = QuotaLedger::new(0, 10, 100);
        assert!(ledger.precheck_declared("a", 1).unwrap_err().is_quota_error());
        assert!(ledger.precheck_declared("a", 0).is_ok());
    }

    #[test]
    fn test_reserve_file_slot() {
        let mut ledger = ledger();
        for _ in 0..3 {
            ledger.reserve_file_slot("f").unwrap();
            ledger.record_file();
        }
        assert!(ledger.reserve_file_slot("f").unwrap_err().is_quota_error());
    }

    #[test]
    fn test_charge_chunk_per_file_cap() {
        let mut ledger = ledger();
        ledger.charge_chunk("f", 0, 100).unwrap();
        let err = ledger.charge_chunk("f", 100, 1).unwrap_err();
        assert!(err.is_quota_error());
        // The rejected chunk did not advance the total.
        assert_eq!(ledger.bytes_written(), 100);
    }

    #[test]
    fn test_charge_chunk_total_cap_pre_increment() {
        let mut ledger = QuotaLedger::new(100, 10, 1000);
        ledger.charge_chunk("a", 0, 60).unwrap();
        ledger.charge_chunk("b", 0, 40).unwrap();
        assert_eq!(ledger.bytes_written(), 100);
        assert!(ledger.charge_chunk("c", 0, 1).unwrap_err().is_quota_error());
        assert_eq!(ledger.bytes_written(), 100);
    }

    #[test]
    fn test_overflow_is_quota_not_wrap() {
        let mut ledger = QuotaLedger::new(u64::MAX, 10, u64::MAX);
        ledger.charge_chunk("a", 0, u64::MAX - 1).unwrap();
        let err = ledger.charge_chunk("a", u64::MAX - 1, 2).unwrap_err();
        assert!(err.is_quota_error());
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn test_into_report() {
        let mut ledger = ledger();
        ledger.charge_chunk("a", 0, 42).unwrap();
        ledger.record_file();
        ledger.record_dir();
        ledger.record_skipped();
        let report = ledger.into_report();
        assert_eq!(report.files_extracted, 1);
        assert_eq!(report.dirs_created, 1);
        assert_eq!(report.entries_skipped, 1);
        assert_eq!(report.bytes_written, 42);
    }
}
