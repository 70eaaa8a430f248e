use std::io::{Chain, Cursor, Read, Seek};

use crate::jpeg::marker::{
    APP1, EXIF_HEADER, IFD_NEXT_NONE, MAX_SEGMENT_LEN, SEGMENT_PAD, SOI, TIFF_HEADER,
};
use crate::jpeg::{JpegError, assert_jpeg, seek_to_dqt};

use super::tag::{MetaData, Tag};

/// Bytes per IFD entry: code (4) + value length (4) + value offset (4).
const IFD_ENTRY_LEN: usize = 12;

/// Bytes of the IFD entry-count field.
const IFD_COUNT_LEN: usize = 2;

/// APP1 marker plus the length field.
const APP1_PREAMBLE_LEN: usize = 4;

/// New metadata followed by the remainder of the original stream.
///
/// Nothing from the source is read until the prefix has been consumed.
pub type Composed<R> = Chain<Cursor<Vec<u8>>, R>;

/// Byte layout of the APP1 segment for a given metadata set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ifd0Layout {
    /// Number of IFD0 entries.
    pub entries: usize,
    /// Where the value blob starts, relative to the TIFF header.
    pub data_offset: usize,
    /// Total of every value's encoded length (string bytes plus NUL).
    pub data_len: usize,
    /// Value written to the APP1 length field.
    pub app1_len: usize,
}

impl Ifd0Layout {
    /// Compute offsets and the APP1 length, failing if the segment cannot fit.
    pub fn compute(md: &MetaData) -> Result<Self, JpegError> {
        let entries = md.len();

        let data_offset = TIFF_HEADER.len()
            + IFD_COUNT_LEN
            + entries * IFD_ENTRY_LEN
            + IFD_NEXT_NONE.len();

        let data_len: usize = md.values().map(|v| v.len() + 1).sum();

        let app1_len = APP1_PREAMBLE_LEN + EXIF_HEADER.len() + data_offset + data_len;
        if app1_len > MAX_SEGMENT_LEN {
            return Err(JpegError::App1TooLong { length: app1_len });
        }

        Ok(Self {
            entries,
            data_offset,
            data_len,
            app1_len,
        })
    }
}

/// Tags of `md` in ascending id order.
fn sorted_tags(md: &MetaData) -> Vec<Tag> {
    let mut tags: Vec<Tag> = md.keys().copied().collect();
    tags.sort_by_key(|t| t.id());
    tags
}

/// Serialize SOI and a fresh APP1/EXIF segment holding `md`.
///
/// An empty set yields SOI alone. Fails before producing anything if the
/// segment would exceed 65535 bytes.
pub fn build_app1(md: &MetaData) -> Result<Vec<u8>, JpegError> {
    if md.is_empty() {
        return Ok(SOI.to_vec());
    }

    let layout = Ifd0Layout::compute(md)?;
    log::debug!(
        "APP1: {} entries, value data at +{}, segment length {}",
        layout.entries,
        layout.data_offset,
        layout.app1_len
    );

    let mut buf = Vec::with_capacity(SOI.len() + layout.app1_len);
    buf.extend_from_slice(&SOI);
    buf.extend_from_slice(&APP1);
    buf.extend_from_slice(&(layout.app1_len as u16).to_be_bytes());
    buf.extend_from_slice(&EXIF_HEADER);
    buf.extend_from_slice(&TIFF_HEADER);
    buf.extend_from_slice(&(layout.entries as u16).to_be_bytes());

    // Values can only be written once every entry is out.
    let mut data = Vec::with_capacity(layout.data_len);
    let mut offset = layout.data_offset;

    for tag in sorted_tags(md) {
        let value = &md[&tag];
        let len = value.len() + 1;

        buf.extend_from_slice(&tag.code());
        buf.extend_from_slice(&(len as u32).to_be_bytes());
        buf.extend_from_slice(&(offset as u32).to_be_bytes());

        data.extend_from_slice(value.as_bytes());
        data.push(0x00);
        offset += len;
    }

    buf.extend_from_slice(&IFD_NEXT_NONE);
    buf.extend_from_slice(&data);
    buf.extend_from_slice(&SEGMENT_PAD);

    Ok(buf)
}

/// Replace the EXIF metadata of the JPEG in `rs` with `md`.
///
/// The result yields SOI, the new APP1 segment (if `md` is non-empty), then
/// `rs` from its first DQT marker onwards. Everything between SOI and DQT in
/// the source (APP0, any old APP1, comments) is dropped; pixel data is never
/// decoded or re-encoded. An empty `md` therefore strips all metadata.
///
/// `rs` is validated with [`assert_jpeg`] first, so there is no need to call
/// it separately.
///
/// The returned reader wraps `rs`. Pass `&mut` to keep ownership, and drain
/// the output before touching the source again: moving its cursor changes
/// what the tail yields. If reading the tail fails, the output as a whole is
/// invalid, even though earlier bytes have already been handed out.
pub fn set_meta<R: Read + Seek>(mut rs: R, md: &MetaData) -> Result<Composed<R>, JpegError> {
    assert_jpeg(&mut rs)?;

    let prefix = build_app1(md)?;

    let dqt_at = seek_to_dqt(&mut rs)?;
    log::debug!("original image data resumes at offset {dqt_at}");

    Ok(Cursor::new(prefix).chain(rs))
}

/// Remove all metadata from the JPEG in `rs`. Same as [`set_meta`] with no tags.
pub fn strip_meta<R: Read + Seek>(rs: R) -> Result<Composed<R>, JpegError> {
    set_meta(rs, &MetaData::new())
}
