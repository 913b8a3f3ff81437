use std::collections::BTreeMap;

use course_shared::Endian;

use super::{Area, LAYER_COUNT};
use crate::block_table;
use crate::error::FormatError;
use crate::metadata::MetadataStore;
use crate::records::{BlockData, Zone, decode_block, decode_layer};

impl Area {
    /// Decode an area from its course blob and up to three layer blobs.
    ///
    /// A missing layer is an empty layer. Zone references are resolved
    /// against the decoded registries: an unknown bounding id becomes `None`,
    /// an unknown background id becomes `None` with a warning. Each zone's id
    /// is replaced by its index in the zone block.
    pub fn load(
        number: u8,
        course: &[u8],
        layers: [Option<&[u8]>; LAYER_COUNT],
        endian: Endian,
    ) -> Result<Self, FormatError> {
        let table = block_table::decode(course, endian)?;

        let mut area = Area {
            number,
            backgrounds: BTreeMap::new(),
            ..Area::default()
        };
        let mut raw_zones = Vec::new();

        for (index, buf) in table.blocks.iter().enumerate() {
            match decode_block(index, buf, endian)? {
                BlockData::TilesetNames(names) => area.tilesets = names,
                BlockData::Options(options) => area.options = options,
                BlockData::Bounding(bounding) => area.bounding = bounding,
                BlockData::Backgrounds(backgrounds) => {
                    area.backgrounds = backgrounds.into_iter().map(|bg| (bg.id, bg)).collect();
                }
                BlockData::Entrances(entrances) => area.entrances = entrances,
                BlockData::Sprites(sprites) => area.sprites = sprites,
                // rebuilt from the sprite list on save
                BlockData::LoadedSprites(_) => {}
                BlockData::Zones(zones) => raw_zones = zones,
                BlockData::Locations(locations) => area.locations = locations,
                BlockData::Paths(paths) => area.paths = paths,
                BlockData::PathNodes(nodes) => area.path_nodes = nodes,
                BlockData::Opaque(bytes) => {
                    if !bytes.is_empty() {
                        area.opaque.insert(index, bytes);
                    }
                }
            }
        }

        area.zones = area.resolve_zones(raw_zones)?;

        for path in &area.paths {
            path.nodes(&area.path_nodes)?;
        }

        area.metadata = MetadataStore::decode(table.metadata);

        for (layer, buf) in layers.iter().enumerate() {
            if let Some(buf) = buf {
                area.layers[layer] = decode_layer(layer, buf, endian)?;
            }
        }

        tracing::info!(
            area = number,
            zones = area.zones.len(),
            sprites = area.sprites.len(),
            objects = area.object_count(),
            "Loaded area"
        );

        Ok(area)
    }

    fn resolve_zones(&self, raw: Vec<Zone>) -> Result<Vec<Zone>, FormatError> {
        raw.into_iter()
            .enumerate()
            .map(|(index, mut zone)| {
                zone.id = u8::try_from(index).map_err(|_| FormatError::OutOfRange {
                    field: "zone index",
                    value: index as i64,
                })?;

                zone.bounding_id = zone
                    .bounding_id
                    .filter(|&id| self.bounding_for(id).is_some());

                if let Some(bg) = zone.background_id {
                    if !self.backgrounds.contains_key(&bg) {
                        tracing::warn!(zone = zone.id, background = bg, "Zone has an invalid background block");
                        zone.background_id = None;
                    }
                }

                Ok(zone)
            })
            .collect()
    }
}
