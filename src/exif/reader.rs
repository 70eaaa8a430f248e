use anyhow::{Context, Result};
use nom_exif::*;
use std::path::Path;

use super::tag::{MetaData, Tag};

/// Read the writable IFD0 string tags back from an image file.
///
/// Images without EXIF yield an empty set. Readers follow the TIFF rule that
/// values of 4 bytes or less are stored inline, while the writer always stores
/// them in the value blob, so such very short values may read back garbled.
pub fn read_meta(path: &Path) -> Result<MetaData> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::file_path(path).context("Failed to open image file")?;

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(e) => {
            log::debug!("No EXIF data found in {}: {e}", path.display());
            return Ok(MetaData::new());
        }
    };
    let exif: Exif = iter.into();

    let mut data = MetaData::new();
    for tag in Tag::ALL {
        if let Some(val) = exif.get_by_ifd_tag_code(0, tag.id()) {
            if let Some(s) = entry_to_string(val) {
                data.insert(tag, s);
            }
        }
    }

    log::debug!("Read {} tag(s) from {}", data.len(), path.display());
    Ok(data)
}

/// Convert an EntryValue to an Option<String>.
fn entry_to_string(val: &EntryValue) -> Option<String> {
    let s = val.to_string();
    let s = s.trim().trim_end_matches('\0').trim_matches('"').to_string();
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::set_meta;
    use std::io::{Cursor, Read};

    fn minimal_jpeg() -> Vec<u8> {
        let mut v = vec![0xFF, 0xD8, 0xFF, 0xDB, 0x00, 0x43, 0x00];
        v.extend([16u8; 64]);
        v.extend_from_slice(&[0xFF, 0xD9]);
        v
    }

    #[test]
    fn reads_back_written_tags() {
        let md = MetaData::from([
            (Tag::Artist, "Jane Doe".to_string()),
            (Tag::Copyright, "Copyright 2024 Jane Doe".to_string()),
        ]);

        let mut source = Cursor::new(minimal_jpeg());
        let mut out = Vec::new();
        set_meta(&mut source, &md).unwrap().read_to_end(&mut out).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.jpg");
        std::fs::write(&path, &out).unwrap();

        let read = read_meta(&path).unwrap();
        assert_eq!(read.get(&Tag::Artist).map(String::as_str), Some("Jane Doe"));
        assert_eq!(
            read.get(&Tag::Copyright).map(String::as_str),
            Some("Copyright 2024 Jane Doe")
        );
        assert!(!read.contains_key(&Tag::Title));
    }

    #[test]
    fn no_exif_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.jpg");
        std::fs::write(&path, minimal_jpeg()).unwrap();
        assert!(read_meta(&path).unwrap().is_empty());
    }
}
