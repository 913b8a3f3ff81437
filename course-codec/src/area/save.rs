use course_shared::Endian;

use super::{Area, LAYER_COUNT};
use crate::block_table::{self, BLOCK_COUNT};
use crate::error::FormatError;
use crate::optimizer::optimize;
use crate::records::{
    BLOCK_CODECS, BlockData, BlockKind, encode_block, encode_layer, repack_paths,
    summarize_sprites,
};

/// Encoded form of an area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArea {
    /// `course<N>.bin`
    pub course: Vec<u8>,
    /// `course<N>_bgdatL{0,1,2}.bin`; `None` for a layer without objects
    pub layers: [Option<Vec<u8>>; LAYER_COUNT],
}

impl Area {
    /// Encode this area. The area itself is left untouched.
    ///
    /// Zone references are canonicalized first (see [`crate::optimizer`]),
    /// paths are repacked contiguously and the loaded-sprite summary is
    /// rebuilt from the sprites.
    pub fn save(&self, endian: Endian) -> Result<SavedArea, FormatError> {
        let layout = optimize(&self.zones, &self.bounding, &self.backgrounds)?;
        let (paths, path_nodes) = repack_paths(&self.paths, &self.path_nodes)?;

        let mut blocks: [Vec<u8>; BLOCK_COUNT] = Default::default();
        for (index, block) in blocks.iter_mut().enumerate() {
            let data = match BLOCK_CODECS[index].kind {
                BlockKind::TilesetNames => BlockData::TilesetNames(self.tilesets.clone()),
                BlockKind::Options => BlockData::Options(self.options.clone()),
                BlockKind::Bounding => BlockData::Bounding(layout.bounding.clone()),
                BlockKind::Backgrounds => {
                    BlockData::Backgrounds(layout.backgrounds.values().copied().collect())
                }
                BlockKind::Entrances => BlockData::Entrances(self.entrances.clone()),
                BlockKind::Sprites => BlockData::Sprites(self.sprites.clone()),
                BlockKind::LoadedSprites => {
                    BlockData::LoadedSprites(summarize_sprites(&self.sprites))
                }
                BlockKind::Zones => BlockData::Zones(layout.zones.clone()),
                BlockKind::Locations => BlockData::Locations(self.locations.clone()),
                BlockKind::Paths => BlockData::Paths(paths.clone()),
                BlockKind::PathNodes => BlockData::PathNodes(path_nodes.clone()),
                BlockKind::Opaque => {
                    BlockData::Opaque(self.opaque.get(&index).cloned().unwrap_or_default())
                }
            };
            *block = encode_block(index, &data, endian)?;
        }

        let metadata = self.metadata.encode()?;
        let course = block_table::encode(&blocks, &metadata, endian)?;

        let mut layers: [Option<Vec<u8>>; LAYER_COUNT] = Default::default();
        for (layer, objects) in layers.iter_mut().zip(&self.layers) {
            *layer = encode_layer(objects, endian)?;
        }

        tracing::debug!(
            area = self.number,
            course_len = course.len(),
            bounding = layout.bounding.len(),
            backgrounds = layout.backgrounds.len(),
            "Saved area"
        );

        Ok(SavedArea { course, layers })
    }
}
