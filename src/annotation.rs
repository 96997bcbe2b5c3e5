//! The annotation record and its comment-string encoding.
//!
//! An annotation is stored inside the image as a single delimited text
//! blob in the EXIF user-comment tag:
//!
//! `Persons: Anna, Bert, Location: Berlin, Date: 01.01.2020`
//!
//! The format has no escaping. A person entry or location that itself
//! contains `", "` followed by `"Key: "`-shaped text will merge into the
//! neighbouring field on the next decode. Known limitation, kept for
//! compatibility with previously written files.

use chrono::NaiveDate;

use crate::error::{Error, Result};

// ── Data Model ──────────────────────────────────────────────────────────────

/// The in-memory record for the currently displayed image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Person names in insertion order. Duplicates allowed.
    pub persons: Vec<String>,
    pub location: String,
    /// Capture date as entered, `DD.MM.YYYY`. Validated on save only.
    pub date: String,
}

impl Annotation {
    /// Decode the user-comment bytes into an annotation. A missing or
    /// empty comment yields the default annotation; this never fails.
    ///
    /// The comment is partitioned on `", "`, each piece is split on its
    /// first `": "`. A piece without `": "` continues the value of the
    /// preceding pair, which is what keeps multi-person comments
    /// decodable; a piece before any pair is dropped, as are pairs with
    /// unrecognized keys.
    pub fn decode(comment: Option<&[u8]>) -> Self {
        let Some(bytes) = comment else {
            return Self::default();
        };
        if bytes.is_empty() {
            return Self::default();
        }
        let text = String::from_utf8_lossy(bytes);

        let mut pairs: Vec<(&str, String)> = Vec::new();
        for piece in text.split(", ") {
            if let Some((key, value)) = piece.split_once(": ") {
                pairs.push((key, value.to_string()));
            } else if let Some((_, value)) = pairs.last_mut() {
                value.push_str(", ");
                value.push_str(piece);
            }
        }

        let mut annotation = Self::default();
        for (key, value) in pairs {
            match key {
                "Persons" => {
                    annotation.persons = if value.is_empty() {
                        Vec::new()
                    } else {
                        value.split(", ").map(str::to_string).collect()
                    };
                }
                "Location" => annotation.location = value,
                "Date" => annotation.date = value,
                _ => {}
            }
        }
        annotation
    }

    /// Encode the annotation as the comment string, the exact inverse of
    /// [`Annotation::decode`] as long as no individual field value
    /// contains `", "` or `": "`.
    pub fn encode(&self) -> String {
        format!(
            "Persons: {}, Location: {}, Date: {}",
            self.persons.join(", "),
            self.location,
            self.date
        )
    }
}

// ── Date validation ─────────────────────────────────────────────────────────

/// Accept only zero-padded `DD.MM.YYYY` naming a real calendar date.
/// Shorthand forms such as `5.3.2024` are rejected.
pub fn validate_date(text: &str) -> Result<NaiveDate> {
    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[2] == b'.'
        && bytes[5] == b'.'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    if !well_formed {
        return Err(Error::DateFormat(text.to_string()));
    }

    let day = text[0..2].parse::<u32>();
    let month = text[3..5].parse::<u32>();
    let year = text[6..10].parse::<i32>();
    match (day, month, year) {
        (Ok(day), Ok(month), Ok(year)) => NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| Error::DateFormat(text.to_string())),
        _ => Err(Error::DateFormat(text.to_string())),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
