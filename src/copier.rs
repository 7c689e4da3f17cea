//! Bounded streaming copy from a decoder into an output file.

use std::fs::File;
use std::io::{Read, Write};

use crate::error::map_read_error;
use crate::quota::QuotaLedger;
use crate::{READ_BUFFER_SIZE, Result};

/// Copies an entry body into `out` in fixed-size chunks, charging the
/// ledger before each chunk touches the disk.
///
/// If a chunk would cross the per-file or the total cap the copy aborts
/// without writing it; the caller removes the partial file. Returns the
/// number of bytes written.
pub(crate) fn copy_entry(
    body: &mut dyn Read,
    out: &mut File,
    ledger: &mut QuotaLedger,
    name: &str,
) -> Result<u64> {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    let mut written = 0u64;
    loop {
        let n = body.read(&mut buf).map_err(map_read_error)?;
        if n == 0 {
            break;
        }
        ledger.charge_chunk(name, written, n as u64)?;
        out.write_all(&buf[..n])?;
        written += n as u64;
    }
    Ok(written)
}
