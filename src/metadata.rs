//! Access to the EXIF block embedded in an image file.
//!
//! Only the user-comment tag is ever edited; all other primary-IFD
//! fields are carried over untouched when a file is re-saved.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};

/// Charset prefixes the EXIF spec defines for user-comment payloads.
/// This tool writes raw UTF-8 without a prefix (matching the files it
/// has historically produced); comments written by other software may
/// carry one, so it is stripped on read.
const CHARSET_PREFIXES: &[&[u8]] = &[b"ASCII\0\0\0", b"UNICODE\0", b"JIS\0\0\0\0\0", &[0u8; 8]];

/// A file's parsed EXIF attributes, or an empty block for files that
/// have none yet.
pub struct ExifBlock {
    exif: Option<exif::Exif>,
}

impl ExifBlock {
    pub fn load(path: &Path) -> Result<Self, exif::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let exif = exif::Reader::new().read_from_container(&mut reader)?;
        Ok(Self { exif: Some(exif) })
    }

    pub fn empty() -> Self {
        Self { exif: None }
    }

    /// The user-comment payload with any charset prefix stripped, or
    /// `None` when the tag is absent.
    pub fn user_comment(&self) -> Option<Vec<u8>> {
        let field = self.exif.as_ref()?.get_field(Tag::UserComment, In::PRIMARY)?;
        let bytes: &[u8] = match field.value {
            Value::Undefined(ref bytes, _) => bytes.as_slice(),
            Value::Ascii(ref lines) => lines.first()?.as_slice(),
            _ => return None,
        };
        Some(strip_charset_prefix(bytes).to_vec())
    }

    /// Serialize the block with `comment` as the user-comment value,
    /// replacing any previous one, into a raw EXIF/TIFF payload.
    ///
    /// Thumbnail-IFD fields are not carried over: their strip offsets
    /// refer into the source file and would be stale in the output.
    pub fn dump_with_comment(&self, comment: &str) -> Result<Vec<u8>, exif::Error> {
        let comment_field = Field {
            tag: Tag::UserComment,
            ifd_num: In::PRIMARY,
            value: Value::Undefined(comment.as_bytes().to_vec(), 0),
        };

        let mut writer = Writer::new();
        if let Some(ref exif) = self.exif {
            for field in exif.fields() {
                if field.ifd_num == In::PRIMARY && field.tag != Tag::UserComment {
                    writer.push_field(field);
                }
            }
        }
        writer.push_field(&comment_field);

        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false)?;
        Ok(buf.into_inner())
    }
}

fn strip_charset_prefix(bytes: &[u8]) -> &[u8] {
    for prefix in CHARSET_PREFIXES {
        if let Some(rest) = bytes.strip_prefix(*prefix) {
            return rest;
        }
    }
    bytes
}

// ── Tests ───────────────────────────────────────────────────────────────────
