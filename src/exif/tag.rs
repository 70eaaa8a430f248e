use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// TIFF field type 2: 7-bit ASCII, NUL-terminated.
pub const TYPE_ASCII: u16 = 0x0002;

/// IFD0 tags that can be written.
///
/// Every tag is stored as an ASCII string. Variants are declared in ascending
/// tag-id order, so the derived `Ord` matches the on-disk ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// ImageDescription (0x010E)
    #[serde(alias = "description")]
    Title,
    /// Make (0x010F)
    Make,
    /// Model (0x0110)
    Model,
    /// Software (0x0131)
    Software,
    /// DateTime (0x0132), `YYYY:MM:DD HH:MM:SS`
    #[serde(alias = "date_time")]
    DateTime,
    /// Artist (0x013B)
    Artist,
    /// Copyright (0x8298)
    Copyright,
}

/// Metadata to write: one string per tag.
///
/// Iteration order does not matter; the encoder always emits tags sorted by id.
pub type MetaData = HashMap<Tag, String>;

impl Tag {
    pub const ALL: [Tag; 7] = [
        Tag::Title,
        Tag::Make,
        Tag::Model,
        Tag::Software,
        Tag::DateTime,
        Tag::Artist,
        Tag::Copyright,
    ];

    /// Numeric EXIF tag id.
    pub fn id(self) -> u16 {
        match self {
            Tag::Title => 0x010E,
            Tag::Make => 0x010F,
            Tag::Model => 0x0110,
            Tag::Software => 0x0131,
            Tag::DateTime => 0x0132,
            Tag::Artist => 0x013B,
            Tag::Copyright => 0x8298,
        }
    }

    /// The 4 bytes that open an IFD entry: tag id then field type.
    pub fn code(self) -> [u8; 4] {
        let [a, b] = self.id().to_be_bytes();
        let [c, d] = TYPE_ASCII.to_be_bytes();
        [a, b, c, d]
    }

    /// Look a tag up by its numeric id.
    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Lowercase name, as accepted by [`FromStr`] and used in config files.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Title => "title",
            Tag::Make => "make",
            Tag::Model => "model",
            Tag::Software => "software",
            Tag::DateTime => "datetime",
            Tag::Artist => "artist",
            Tag::Copyright => "copyright",
        }
    }

    /// EXIF field name.
    pub fn exif_name(self) -> &'static str {
        match self {
            Tag::Title => "ImageDescription",
            Tag::Make => "Make",
            Tag::Model => "Model",
            Tag::Software => "Software",
            Tag::DateTime => "DateTime",
            Tag::Artist => "Artist",
            Tag::Copyright => "Copyright",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let tag = match lower.as_str() {
            "title" | "description" | "imagedescription" => Tag::Title,
            "make" => Tag::Make,
            "model" => Tag::Model,
            "software" => Tag::Software,
            "datetime" | "date_time" | "date" => Tag::DateTime,
            "artist" | "author" => Tag::Artist,
            "copyright" => Tag::Copyright,
            _ => anyhow::bail!(
                "Unknown tag '{s}'. Expected one of: {}",
                Tag::ALL.map(Tag::name).join(", ")
            ),
        };
        Ok(tag)
    }
}

/// Parse a `name=value` pair, as given to `--tag` on the command line.
pub fn parse_tag_assignment(s: &str) -> anyhow::Result<(Tag, String)> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected NAME=VALUE, got '{s}'"))?;
    Ok((name.parse()?, value.to_string()))
}
