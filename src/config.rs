//! Tool configuration
//!
//! Persists the texture directory between runs as a RON file under the
//! per-user config directory. A missing or unparsable file falls back to
//! the default without failing the run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default texture directory relative to the working directory
const DEFAULT_TEXTURE_DIR: &str = "textures";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory that the tree indexer scans
    pub texture_directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            texture_directory: PathBuf::from(DEFAULT_TEXTURE_DIR),
        }
    }
}

impl Config {
    /// Path of the config file under the per-user config directory
    pub fn file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("texel")
            .join("config.ron")
    }

    /// Load the config, falling back to defaults when missing or unparsable
    pub fn load() -> Self {
        Self::load_from(&Self::file_path())
    }

    fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match ron::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to parse config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save the config, creating the config directory if needed
    pub fn save(&self) -> std::io::Result<()> {
        self.save_to(&Self::file_path())
    }

    fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let pretty = ron::ser::PrettyConfig::new().indentor("  ".to_string());
        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, contents)
    }
}
