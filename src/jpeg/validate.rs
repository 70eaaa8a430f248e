use std::io::{Read, Seek, SeekFrom};

use super::error::{IoContext, JpegError};
use super::marker::{EOI, SOI};
use super::read_full;

/// Check that `rs` looks like a JPEG by its first and last two bytes.
///
/// Only the SOI and EOI markers are read, never the whole stream. The cursor
/// is left wherever the last read put it; callers that care about the current
/// offset must save and restore it themselves.
pub fn assert_jpeg<R: Read + Seek>(rs: &mut R) -> Result<(), JpegError> {
    rs.seek(SeekFrom::Start(0)).io_context("seeking to start of image")?;

    let mut p = [0u8; 2];
    let n = read_full(rs, &mut p).io_context("reading SOI marker")?;
    if n < p.len() || p != SOI {
        return Err(JpegError::MissingSoi);
    }

    rs.seek(SeekFrom::End(-2)).io_context("seeking to end of image")?;

    // A short read here is not fatal: it just fails the comparison below.
    p = [0u8; 2];
    read_full(rs, &mut p).io_context("reading EOI marker")?;
    if p != EOI {
        return Err(JpegError::MissingEoi);
    }

    Ok(())
}
