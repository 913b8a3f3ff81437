//! Level assembly
//!
//! A level is the set of areas stored in one archive as `course<N>.bin`
//! plus `course<N>_bgdatL{0,1,2}.bin`. Areas are numbered from 1 and must be
//! contiguous: discovery stops at the first missing course entry.

use anyhow::{Context, Result};

use course_shared::{Archive, ArchiveBuilder, COURSE_FORMAT, Endian};

use crate::area::{Area, LAYER_COUNT};
use crate::tileset::TilesetResolver;

/// All areas of one level.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Level name, the entry name of the course archive in the outer package
    pub name: String,
    /// Areas in number order; area `i` is saved as `course<i + 1>.bin`
    pub areas: Vec<Area>,
}

impl Level {
    /// A level with one default area.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            areas: vec![Area::new(1)],
        }
    }

    /// Load every area found in `archive`.
    pub fn load(name: &str, archive: &dyn Archive, endian: Endian) -> Result<Self> {
        let mut areas = Vec::new();

        for number in 1..=COURSE_FORMAT.max_areas {
            let course_name = COURSE_FORMAT.course_name(number);
            let Some(course) = archive.lookup(&course_name) else {
                break;
            };

            let layer_names: [String; LAYER_COUNT] =
                std::array::from_fn(|layer| COURSE_FORMAT.layer_name(number, layer));
            let layers = layer_names.each_ref().map(|name| archive.lookup(name));

            let area = Area::load(number, course, layers, endian)
                .with_context(|| format!("Failed to load {} of level {}", course_name, name))?;
            areas.push(area);
        }

        if areas.is_empty() {
            anyhow::bail!(
                "Level {} has no {}",
                name,
                COURSE_FORMAT.course_name(1)
            );
        }

        tracing::info!(level = name, areas = areas.len(), "Loaded level");

        Ok(Self {
            name: name.to_string(),
            areas,
        })
    }

    /// Encode every area into named archive entries: each course blob
    /// followed by its non-empty layers.
    pub fn save_entries(&self, endian: Endian) -> Result<Vec<(String, Vec<u8>)>> {
        if self.areas.len() > usize::from(COURSE_FORMAT.max_areas) {
            anyhow::bail!(
                "Level {} has {} areas (max {})",
                self.name,
                self.areas.len(),
                COURSE_FORMAT.max_areas
            );
        }

        let mut entries = Vec::new();
        for (number, area) in (1u8..).zip(&self.areas) {
            let saved = area
                .save(endian)
                .with_context(|| format!("Failed to save area {} of level {}", number, self.name))?;

            entries.push((COURSE_FORMAT.course_name(number), saved.course));
            for (layer, data) in saved.layers.into_iter().enumerate() {
                if let Some(data) = data {
                    entries.push((COURSE_FORMAT.layer_name(number, layer), data));
                }
            }
        }
        Ok(entries)
    }

    /// Encode the level and pack it with `builder`.
    pub fn save(&self, builder: &dyn ArchiveBuilder, endian: Endian) -> Result<Vec<u8>> {
        let entries = self.save_entries(endian)?;
        builder
            .build(&entries)
            .with_context(|| format!("Failed to build archive for level {}", self.name))
    }

    /// Distinct tileset names used by any area, in first-use order.
    pub fn tileset_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.areas.iter().flat_map(|area| area.tilesets.used()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Fetch every used tileset through `resolver`, named as in the outer
    /// package. Tilesets the resolver does not have are skipped with a warning.
    pub fn tileset_entries(&self, resolver: &dyn TilesetResolver) -> Result<Vec<(String, Vec<u8>)>> {
        let mut entries = Vec::new();
        for name in self.tileset_names() {
            match resolver
                .resolve(&name)
                .with_context(|| format!("Failed to resolve tileset {}", name))?
            {
                Some(data) => entries.push((name, data)),
                None => tracing::warn!(tileset = %name, level = %self.name, "Tileset not found"),
            }
        }
        Ok(entries)
    }

    /// Build the outer package: the used tilesets, then the course archive
    /// under the level's name.
    pub fn save_package(
        &self,
        builder: &dyn ArchiveBuilder,
        resolver: &dyn TilesetResolver,
        endian: Endian,
    ) -> Result<Vec<u8>> {
        let course_archive = self.save(builder, endian)?;
        let mut entries = self.tileset_entries(resolver)?;
        entries.push((self.name.clone(), course_archive));
        builder
            .build(&entries)
            .with_context(|| format!("Failed to build package for level {}", self.name))
    }
}
