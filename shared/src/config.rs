//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for converter settings.
//! Settings are stored in TOML format in the platform-specific config directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Endian;

/// Converter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tileset lookup settings
    #[serde(default)]
    pub tileset: TilesetConfig,
    /// Byte orders of the load and save paths
    #[serde(default)]
    pub byte_order: ByteOrderConfig,
}

/// Where tileset archives are looked up.
///
/// Replaces an interactive "where is the Unit folder" prompt: the directory
/// is an explicit value handed to the tileset resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TilesetConfig {
    /// Directory holding `<name>.szs` tileset archives (default: unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_dir: Option<PathBuf>,
}

/// Byte orders used by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteOrderConfig {
    /// Order of course blobs being loaded (default: little)
    #[serde(default = "default_read_order")]
    pub read: Endian,
    /// Order of course blobs being saved (default: big)
    #[serde(default = "default_write_order")]
    pub write: Endian,
}

fn default_read_order() -> Endian {
    Endian::READ_DEFAULT
}
fn default_write_order() -> Endian {
    Endian::WRITE_DEFAULT
}

impl Default for ByteOrderConfig {
    fn default() -> Self {
        Self {
            read: default_read_order(),
            write: default_write_order(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the configuration from `path`.
    ///
    /// Returns default values if the file doesn't exist or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match Self::from_toml_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Ignoring malformed config: {}", e);
                Self::default()
            }
        }
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\CourseKit\config`
/// On macOS: `~/Library/Application Support/io.coursekit.CourseKit`
/// On Linux: `~/.config/coursekit`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.coursekit", "", "CourseKit")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.tileset.unit_dir, None);
        assert_eq!(config.byte_order.read, Endian::Little);
        assert_eq!(config.byte_order.write, Endian::Big);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialize_partial_byte_order() {
        let toml_str = r#"
[byte_order]
write = "little"
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert_eq!(config.byte_order.read, Endian::Little); // default
        assert_eq!(config.byte_order.write, Endian::Little);
    }

    #[test]
    fn test_config_deserialize_unit_dir() {
        let toml_str = r#"
[tileset]
unit_dir = "/games/romfs/Unit"
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert_eq!(
            config.tileset.unit_dir,
            Some(PathBuf::from("/games/romfs/Unit"))
        );
    }

    #[test]
    fn test_config_rejects_unknown_order() {
        let toml_str = r#"
[byte_order]
read = "middle"
"#;
        assert!(Config::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            tileset: TilesetConfig {
                unit_dir: Some(PathBuf::from("units")),
            },
            byte_order: ByteOrderConfig {
                read: Endian::Big,
                write: Endian::Big,
            },
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_missing_or_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(Config::load_from(&missing), Config::default());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[byte_order\nread = ").unwrap();
        assert_eq!(Config::load_from(&broken), Config::default());
    }

    #[test]
    fn test_config_dir_names_the_project() {
        // None only when no home directory is known
        if let Some(dir) = config_dir() {
            let dir = dir.to_string_lossy().to_lowercase();
            assert!(dir.contains("coursekit"), "{}", dir);
        }
    }
}
