//! Directory snapshot of image files plus a cyclic cursor.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extensions recognized as images, compared case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// The image files found in the chosen source directory at selection
/// time. The listing is a fixed snapshot: later changes to the directory
/// are not picked up until the user selects it again.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<PathBuf>,
    cursor: usize,
}

impl Catalog {
    /// List the directory (non-recursive, filesystem enumeration order)
    /// and place the cursor on the first entry.
    pub fn scan(dir: &Path) -> Result<Self> {
        let listing = fs::read_dir(dir).map_err(|source| Error::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|source| Error::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && is_image(&path) {
                entries.push(path);
            }
        }

        log::info!("{}: {} images", dir.display(), entries.len());
        Ok(Self { entries, cursor: 0 })
    }

    pub fn current(&self) -> Option<&Path> {
        self.entries.get(self.cursor).map(PathBuf::as_path)
    }

    /// Move the cursor by `step` positions, wrapping at both ends.
    /// No-op on an empty catalog.
    pub fn advance(&mut self, step: isize) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as isize;
        self.cursor = (self.cursor as isize + step).rem_euclid(len) as usize;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zero-based cursor position, for the status readout.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_dir() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.jpg"), b"x").unwrap();
        fs::write(tmp.path().join("b.PNG"), b"x").unwrap();
        fs::write(tmp.path().join("c.jpeg"), b"x").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("d.jpg"), b"x").unwrap();
        tmp
    }

    #[test]
    fn scan_filters_extensions_case_insensitively() {
        let tmp = populated_dir();
        let catalog = Catalog::scan(tmp.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn scan_is_not_recursive() {
        let tmp = populated_dir();
        let catalog = Catalog::scan(tmp.path()).unwrap();
        assert!(catalog
            .current()
            .is_some_and(|p| p.parent() == Some(tmp.path())));
    }

    #[test]
    fn scan_missing_directory_fails() {
        let err = Catalog::scan(Path::new("/no/such/directory")).unwrap_err();
        assert!(matches!(err, Error::Directory { .. }));
    }

    #[test]
    fn scan_resets_cursor() {
        let tmp = populated_dir();
        let mut catalog = Catalog::scan(tmp.path()).unwrap();
        catalog.advance(2);
        catalog = Catalog::scan(tmp.path()).unwrap();
        assert_eq!(catalog.position(), 0);
    }

    #[test]
    fn advance_wraps_forward() {
        let tmp = populated_dir();
        let mut catalog = Catalog::scan(tmp.path()).unwrap();
        let start = catalog.current().unwrap().to_path_buf();
        for _ in 0..catalog.len() {
            catalog.advance(1);
        }
        assert_eq!(catalog.current().unwrap(), start);
    }

    #[test]
    fn advance_wraps_backward_from_zero() {
        let tmp = populated_dir();
        let mut catalog = Catalog::scan(tmp.path()).unwrap();
        catalog.advance(-1);
        assert_eq!(catalog.position(), catalog.len() - 1);
    }

    #[test]
    fn advance_on_empty_catalog_is_noop() {
        let mut catalog = Catalog::default();
        catalog.advance(1);
        catalog.advance(-1);
        assert!(catalog.current().is_none());
        assert_eq!(catalog.position(), 0);
    }

    #[test]
    fn empty_directory_yields_empty_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = Catalog::scan(tmp.path()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.current().is_none());
    }
}
