use std::io::{Read, Seek, SeekFrom};

use super::error::{IoContext, JpegError};
use super::marker::{DQT, MIN_SEGMENT_LEN, SOI, marker_label};
use super::read_full;

/// Seek `rs` to the first byte of its first DQT marker.
///
/// Walks the segment chain from just after SOI, skipping each segment by its
/// declared length. SOI/EOI are not checked here; use
/// [`assert_jpeg`](super::assert_jpeg) first when that matters.
///
/// Returns the absolute offset of the DQT marker.
pub fn seek_to_dqt<R: Read + Seek>(rs: &mut R) -> Result<u64, JpegError> {
    rs.seek(SeekFrom::Start(SOI.len() as u64))
        .io_context("seeking past SOI")?;

    let mut p = [0u8; 4];
    loop {
        let n = read_full(rs, &mut p).io_context("reading segment header")?;
        if n != p.len() {
            return Err(JpegError::TruncatedSegment);
        }

        if p[0..2] == DQT {
            break;
        }

        // The length counts itself but not the marker.
        let length = u16::from_be_bytes([p[2], p[3]]);
        if length < MIN_SEGMENT_LEN {
            return Err(JpegError::SegmentTooShort { length });
        }
        log::debug!("skipping {} segment, {length} bytes", marker_label(p[1]));

        // The 2-byte length field has already been consumed.
        rs.seek(SeekFrom::Current(i64::from(length) - 2))
            .io_context("skipping segment")?;
    }

    // Back up over the marker and length we just read.
    rs.seek(SeekFrom::Current(-(p.len() as i64)))
        .io_context("rewinding to DQT marker")
}
