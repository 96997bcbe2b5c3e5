//! Persisted application preferences.
//!
//! Stored as JSON under the user's config directory. Config I/O never
//! fails the application; problems are logged and defaults take over.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where annotated copies are written. Relative paths resolve
    /// against the working directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Starting point for the next folder picker.
    #[serde(default)]
    pub last_source_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            last_source_dir: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

/// `<config dir>/photo-annotate/config.json`, or `None` when the
/// platform exposes no config directory.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("photo-annotate").join("config.json"))
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("{}: ignoring malformed config: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn store(&self, path: Option<&Path>) {
        let Some(path) = path else {
            return;
        };
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let data = serde_json::to_string_pretty(self)?;
            std::fs::write(path, data)
        })();
        if let Err(err) = result {
            log::warn!("{}: could not store config: {err}", path.display());
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
