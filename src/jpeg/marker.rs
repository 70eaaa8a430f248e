//! Fixed byte sequences of the JPEG/EXIF container.
//!
//! Every multi-byte value here is big-endian ("Motorola" order). The TIFF
//! header's byte-order mark is pinned to `MM`; the IFD encoder writes all of
//! its integers big-endian to match, so the two must change together.

/// Start of Image.
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End of Image.
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// APP1, the application segment that carries EXIF.
pub const APP1: [u8; 2] = [0xFF, 0xE1];

/// Define Quantization Table. Original header data resumes untouched from here.
pub const DQT: [u8; 2] = [0xFF, 0xDB];

/// `Exif\0\0`
pub const EXIF_HEADER: [u8; 6] = [0x45, 0x78, 0x69, 0x66, 0x00, 0x00];

/// `MM`, magic 42, IFD0 at offset 8.
pub const TIFF_HEADER: [u8; 8] = [0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];

/// Next-IFD pointer terminating IFD0 (no IFD1/thumbnail).
pub const IFD_NEXT_NONE: [u8; 4] = [0x00, 0x00, 0x00, 0x00];

/// Zero padding written after the IFD0 value blob, inside the APP1 segment.
pub const SEGMENT_PAD: [u8; 2] = [0x00, 0x00];

/// Hard limit of a segment's 16-bit length field.
pub const MAX_SEGMENT_LEN: usize = u16::MAX as usize;

/// Smallest declared segment length the scanner accepts.
///
/// Counts the 2-byte length field, a 2-byte payload, a terminator byte and the
/// first byte of the following marker.
pub const MIN_SEGMENT_LEN: u16 = 6;

/// Human-readable label for a marker's second byte, used in log output.
pub fn marker_label(marker: u8) -> &'static str {
    match marker {
        0xD8 => "SOI",
        0xD9 => "EOI",
        0xDA => "SOS",
        0xDB => "DQT",
        0xC0 => "SOF0",
        0xC2 => "SOF2",
        0xC4 => "DHT",
        0xDD => "DRI",
        0xFE => "COM",
        0xE0 => "APP0",
        0xE1 => "APP1",
        0xE2 => "APP2",
        0xED => "APP13",
        0xEE => "APP14",
        0xE3..=0xEF => "APPn",
        _ => "OTHER",
    }
}
