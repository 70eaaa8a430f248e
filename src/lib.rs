//! # jpeg-meta
//!
//! Byte-exact JPEG metadata editor. Replaces the EXIF (APP1) segment of a JPEG
//! with a freshly built one, or strips metadata entirely, without decoding or
//! re-encoding pixel data.
//!
//! ## Quick Start
//!
//! The core works on any `Read + Seek` source and hands back a reader that
//! yields the new file. Nothing past the header is buffered:
//!
//! ```rust,no_run
//! use jpeg_meta::exif::{set_meta, MetaData, Tag};
//! use jpeg_meta::pipeline::write_file;
//! use std::fs::File;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut source = File::open("photo.jpg")?;
//!
//!     let md = MetaData::from([
//!         (Tag::Artist, "Jane Doe".to_string()),
//!         (Tag::Copyright, "(c) 2024 Jane Doe".to_string()),
//!     ]);
//!
//!     // Validates SOI/EOI, builds the APP1 segment, parks `source` on DQT.
//!     let output = set_meta(&mut source, &md)?;
//!     let n = write_file("photo-tagged.jpg".as_ref(), output)?;
//!     println!("Wrote {n} bytes");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Output Layout
//!
//! | Field | Size | Value |
//! |-------|------|-------|
//! | SOI | 2 | `FF D8` |
//! | APP1 marker | 2 | `FF E1` |
//! | APP1 length | 2 | big-endian, ≤ 65535 |
//! | EXIF header | 6 | `Exif\0\0` |
//! | TIFF header | 8 | `MM`, 42, IFD0 at 8 |
//! | IFD0 entry count | 2 | number of tags |
//! | IFD0 entries | 12 × count | tag, type, length, offset |
//! | next IFD | 4 | 0 |
//! | values | variable | NUL-terminated strings |
//! | padding | 2 | `00 00` |
//! | rest of source | … | from the DQT marker onwards, unmodified |
//!
//! ## Modules
//!
//! - [`jpeg`] — marker tables, SOI/EOI validation, segment scanning
//! - [`exif`] — tags, APP1/IFD0 encoding, read-back
//! - [`config`] — configuration types and loading/saving
//! - [`pipeline`] — file-level processing: collecting images, output naming, backups

pub mod config;
pub mod exif;
pub mod jpeg;
pub mod pipeline;
