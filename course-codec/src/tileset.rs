//! Tileset lookup at the level boundary
//!
//! Course blobs only name their tilesets. The archives themselves live next
//! to the game's other units and are fetched through a [`TilesetResolver`];
//! their bytes are never interpreted here.

use std::path::PathBuf;

use anyhow::Result;

use course_shared::Config;
use course_shared::fs::{MAX_TILESET_BYTES, read_file_with_limit};
use course_shared::ids::is_safe_tileset_name;

/// Extension of tileset archives in the unit directory
pub const TILESET_EXTENSION: &str = "szs";

/// Fetches tileset archives by name.
///
/// Implementations decide where tilesets come from (a directory, an
/// archive, a cache); the codec only asks by name.
pub trait TilesetResolver {
    /// Returns the tileset's bytes, or `None` if it does not exist.
    fn resolve(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

/// Resolves `<unit_dir>/<name>.szs`.
#[derive(Debug, Clone)]
pub struct UnitDirResolver {
    unit_dir: PathBuf,
}

impl UnitDirResolver {
    pub fn new(unit_dir: impl Into<PathBuf>) -> Self {
        Self {
            unit_dir: unit_dir.into(),
        }
    }

    /// Resolver for the configured unit directory, if one is set.
    pub fn from_config(config: &Config) -> Option<Self> {
        config.tileset.unit_dir.as_deref().map(Self::new)
    }

    /// Path a tileset would be read from
    pub fn tileset_path(&self, name: &str) -> Result<PathBuf> {
        if !is_safe_tileset_name(name) {
            anyhow::bail!("Invalid tileset name: {:?}", name);
        }
        Ok(self
            .unit_dir
            .join(format!("{}.{}", name, TILESET_EXTENSION)))
    }
}

impl TilesetResolver for UnitDirResolver {
    fn resolve(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.tileset_path(name)?;
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "Tileset not found");
            return Ok(None);
        }
        read_file_with_limit(&path, MAX_TILESET_BYTES).map(Some)
    }
}
