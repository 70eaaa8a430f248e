//! EXIF metadata writing and read-back.
//!
//! - [`set_meta`] — replace a JPEG's metadata with a fresh APP1/EXIF segment
//! - [`strip_meta`] — drop all metadata
//! - [`read_meta`] — read the IFD0 string tags back from a file
//!
//! Only IFD0 string tags ([`Tag`]) are supported; there is no IFD1/thumbnail.

mod reader;
mod tag;
mod writer;

pub use reader::read_meta;
pub use tag::{MetaData, TYPE_ASCII, Tag, parse_tag_assignment};
pub use writer::{Composed, Ifd0Layout, build_app1, set_meta, strip_meta};
