//! Area assembly
//!
//! An [`Area`] is one playable sub-level: the decoded contents of a
//! `course<N>.bin` blob plus its three object layers. Loading and saving are
//! both driven through [`BLOCK_CODECS`](crate::records::BLOCK_CODECS), so the
//! per-block work lives in the record codecs and this module only handles
//! ordering and the cross-block links (zone references, path node ranges,
//! the loaded-sprite summary).
//!
//! ```text
//! load: blob -> block table -> blocks 0..14 -> zone refs -> metadata -> layers
//! save: optimizer -> blocks 0..14 -> metadata -> block table -> blob (+ layers)
//! ```

mod load;
mod save;


use std::collections::BTreeMap;

pub use save::SavedArea;

use crate::metadata::MetadataStore;
use crate::records::{
    AreaOptions, Background, Bounding, Entrance, LevelObject, Location, Path, PathNode, Sprite,
    TilesetNames, Zone,
};

/// Number of object layers per area
pub const LAYER_COUNT: usize = course_shared::COURSE_FORMAT.layer_count;

/// Directory slots carried as raw bytes
pub const OPAQUE_BLOCKS: [usize; 4] = [3, 5, 11, 12];

/// One area of a level.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    /// 1-based area number
    pub number: u8,
    pub tilesets: TilesetNames,
    pub options: AreaOptions,
    pub entrances: Vec<Entrance>,
    pub sprites: Vec<Sprite>,
    /// Bounding records in block order; ids may repeat, the last one wins
    pub bounding: Vec<Bounding>,
    /// Background registry keyed by record id
    pub backgrounds: BTreeMap<u16, Background>,
    pub zones: Vec<Zone>,
    pub locations: Vec<Location>,
    pub paths: Vec<Path>,
    /// Node pool shared by every path
    pub path_nodes: Vec<PathNode>,
    /// Object layers 0..=2
    pub layers: [Vec<LevelObject>; LAYER_COUNT],
    pub metadata: MetadataStore,
    /// Uninterpreted blocks by directory slot; a missing slot is empty
    pub opaque: BTreeMap<usize, Vec<u8>>,
}

impl Default for Area {
    fn default() -> Self {
        Self {
            number: 1,
            tilesets: TilesetNames::default(),
            options: AreaOptions::default(),
            entrances: Vec::new(),
            sprites: Vec::new(),
            bounding: Vec::new(),
            backgrounds: BTreeMap::from([(0, Background::black(0))]),
            zones: Vec::new(),
            locations: Vec::new(),
            paths: Vec::new(),
            path_nodes: Vec::new(),
            layers: Default::default(),
            metadata: MetadataStore::default(),
            opaque: BTreeMap::new(),
        }
    }
}

impl Area {
    /// A new, empty area with engine defaults.
    pub fn new(number: u8) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// Bounding record a zone reference resolves to (last record with the id).
    pub fn bounding_for(&self, id: u16) -> Option<&Bounding> {
        self.bounding.iter().rev().find(|b| b.id == id)
    }

    /// Total number of placed objects over all layers
    pub fn object_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }
}
