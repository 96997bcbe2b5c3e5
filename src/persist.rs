//! Reading and writing annotated images.
//!
//! Reads are tolerant: anything that prevents the annotation from being
//! recovered degrades to the empty annotation and is logged. Writes are
//! strict: every failure is reported to the caller.

use std::fs;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use image::ImageFormat;
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};

use crate::annotation::{self, Annotation};
use crate::error::Result;
use crate::metadata::ExifBlock;

/// Read the annotation embedded in an image.
pub fn load_annotation(path: &Path) -> Annotation {
    match ExifBlock::load(path) {
        Ok(block) => Annotation::decode(block.user_comment().as_deref()),
        Err(exif::Error::NotFound(_)) => {
            log::debug!("{}: no EXIF data", path.display());
            Annotation::default()
        }
        Err(err) => {
            log::warn!("{}: unreadable metadata: {err}", path.display());
            Annotation::default()
        }
    }
}

/// Write `source`'s pixels plus the annotation to the output directory,
/// under the source's basename, always as JPEG data.
///
/// An invalid date aborts before anything is touched. The output
/// directory is created as needed and may remain behind if a later step
/// fails. An existing file at the destination is overwritten.
pub fn save_annotation(
    source: &Path,
    annotation: &Annotation,
    output_dir: &Path,
) -> Result<PathBuf> {
    annotation::validate_date(&annotation.date)?;

    // A source without metadata (or with a block we cannot parse) gets a
    // fresh one rather than failing the save.
    let block = match ExifBlock::load(source) {
        Ok(block) => block,
        Err(err) => {
            log::debug!("{}: starting from an empty EXIF block ({err})", source.display());
            ExifBlock::empty()
        }
    };
    let exif_payload = block.dump_with_comment(&annotation.encode())?;

    fs::create_dir_all(output_dir)?;

    let pixels = image::open(source)?;
    let mut encoded = Vec::new();
    pixels
        .to_rgb8()
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Jpeg)?;

    let mut jpeg = Jpeg::from_bytes(Bytes::from(encoded))?;
    jpeg.set_exif(Some(Bytes::from(exif_payload)));

    let out_path = output_dir.join(source.file_name().unwrap_or_default());
    let file = fs::File::create(&out_path)?;
    jpeg.encoder().write_to(BufWriter::new(file))?;

    log::info!("{} -> {}", source.display(), out_path.display());
    Ok(out_path)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::{Rgb, RgbImage};

    fn write_test_image(path: &Path) {
        RgbImage::from_pixel(8, 8, Rgb([120, 80, 40]))
            .save(path)
            .unwrap();
    }

    fn sample_annotation() -> Annotation {
        Annotation {
            persons: vec!["Alice".to_string(), "Bob".to_string()],
            location: "Berlin".to_string(),
            date: "01.01.2020".to_string(),
        }
    }

    // ── save + load round trip ──────────────────────────────────

    #[test]
    fn save_then_load_reproduces_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("a.jpg");
        write_test_image(&source);

        let out_dir = tmp.path().join("out");
        let saved = save_annotation(&source, &sample_annotation(), &out_dir).unwrap();

        assert_eq!(saved, out_dir.join("a.jpg"));
        assert_eq!(load_annotation(&saved), sample_annotation());
    }

    #[test]
    fn reopening_a_saved_file_round_trips_again() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("a.jpg");
        write_test_image(&source);

        let first = save_annotation(&source, &sample_annotation(), &tmp.path().join("one")).unwrap();
        let reloaded = load_annotation(&first);
        let second = save_annotation(&first, &reloaded, &tmp.path().join("two")).unwrap();

        assert_eq!(load_annotation(&second), sample_annotation());
    }

    // ── format handling ─────────────────────────────────────────

    #[test]
    fn png_source_is_written_as_jpeg_under_original_basename() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("b.png");
        write_test_image(&source);

        let out_dir = tmp.path().join("out");
        let saved = save_annotation(&source, &sample_annotation(), &out_dir).unwrap();

        assert_eq!(saved, out_dir.join("b.png"));
        let bytes = fs::read(&saved).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        assert_eq!(load_annotation(&saved), sample_annotation());
    }

    #[test]
    fn save_overwrites_existing_output() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("a.jpg");
        write_test_image(&source);
        let out_dir = tmp.path().join("out");

        save_annotation(&source, &sample_annotation(), &out_dir).unwrap();

        let mut updated = sample_annotation();
        updated.location = "Hamburg".to_string();
        let saved = save_annotation(&source, &updated, &out_dir).unwrap();

        assert_eq!(load_annotation(&saved).location, "Hamburg");
    }

    // ── failure paths ───────────────────────────────────────────

    #[test]
    fn invalid_date_aborts_without_touching_the_output() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("a.jpg");
        write_test_image(&source);

        let out_dir = tmp.path().join("out");
        let mut annotation = sample_annotation();
        annotation.date = "2020-01-01".to_string();

        let err = save_annotation(&source, &annotation, &out_dir).unwrap_err();
        assert!(matches!(err, Error::DateFormat(_)));
        assert!(!out_dir.exists());
    }

    #[test]
    fn missing_source_surfaces_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("gone.jpg");
        let err = save_annotation(&source, &sample_annotation(), &tmp.path().join("out"));
        assert!(err.is_err());
    }

    #[test]
    fn load_from_image_without_metadata_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("a.jpg");
        write_test_image(&source);
        assert_eq!(load_annotation(&source), Annotation::default());
    }

    #[test]
    fn load_from_garbage_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("broken.jpg");
        fs::write(&source, b"this is not an image").unwrap();
        assert_eq!(load_annotation(&source), Annotation::default());
    }
}
