//! JPEG container plumbing: marker tables, validation and segment scanning.
//!
//! - [`assert_jpeg`] — check for SOI/EOI without reading the whole stream
//! - [`seek_to_dqt`] — walk the segment chain and park the cursor on DQT
//!
//! Both operate on any `Read + Seek` and never buffer image data.

pub mod marker;

mod error;
mod scan;
mod validate;

use std::io::{self, Read};

pub use error::JpegError;
pub use scan::seek_to_dqt;
pub use validate::assert_jpeg;

/// Fill `buf` as far as the stream allows, returning the number of bytes read.
///
/// Unlike `read_exact`, running out of input is not an error.
pub(crate) fn read_full<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
