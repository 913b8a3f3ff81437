//! Record codecs and the registered block table
//!
//! Every block of a course blob is a run of fixed-size records (or a single
//! fixed-size record, or opaque bytes). Each record type implements
//! [`Record`]; [`BLOCK_CODECS`] maps directory slots to their codec so the
//! area assembly can drive load and save through one table.

mod background;
mod bounding;
mod entrance;
mod loaded_sprite;
mod location;
mod object;
mod options;
mod path;
mod sprite;
mod tileset_names;
mod zone;


pub use background::Background;
pub use bounding::Bounding;
pub use entrance::Entrance;
pub use loaded_sprite::{LoadedSprite, summarize_sprites};
pub use location::Location;
pub use object::{LAYER_SENTINEL, LevelObject, decode_layer, encode_layer, remap_item_block};
pub use options::{AreaOptions, WrapFlags};
pub use path::{Path, PathNode, repack_paths};
pub use sprite::{SPRITE_SENTINEL, Sprite};
pub use tileset_names::{DEFAULT_TILESET, TilesetNames};
pub use zone::Zone;

use course_shared::Endian;

use crate::block_table::BLOCK_COUNT;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

/// A fixed-size on-disk record.
pub trait Record: Sized {
    /// Size of one record in bytes.
    const SIZE: usize;

    /// Read one record. The reader holds exactly [`Self::SIZE`] bytes.
    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError>;

    /// Append one record of exactly [`Self::SIZE`] bytes.
    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError>;
}

/// Split `buf` into `buf.len() / T::SIZE` records. Trailing bytes are ignored.
pub fn decode_records<T: Record>(buf: &[u8], endian: Endian) -> Result<Vec<T>, FormatError> {
    buf.chunks_exact(T::SIZE)
        .map(|chunk| T::read(&mut ByteReader::new(chunk, endian)))
        .collect()
}

/// Encode `records` back to back, followed by `sentinel`.
pub fn encode_records<T: Record>(
    records: &[T],
    sentinel: &[u8],
    endian: Endian,
) -> Result<Vec<u8>, FormatError> {
    let mut w = ByteWriter::with_capacity(records.len() * T::SIZE + sentinel.len(), endian);
    for record in records {
        record.write(&mut w)?;
    }
    w.bytes(sentinel);
    Ok(w.into_inner())
}

/// What a directory slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    TilesetNames,
    Options,
    Bounding,
    Backgrounds,
    Entrances,
    Sprites,
    LoadedSprites,
    Zones,
    Locations,
    Paths,
    PathNodes,
    /// Not interpreted; carried verbatim
    Opaque,
}

/// Decoded contents of one block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    TilesetNames(TilesetNames),
    Options(AreaOptions),
    Bounding(Vec<Bounding>),
    Backgrounds(Vec<Background>),
    Entrances(Vec<Entrance>),
    Sprites(Vec<Sprite>),
    LoadedSprites(Vec<LoadedSprite>),
    Zones(Vec<Zone>),
    Locations(Vec<Location>),
    Paths(Vec<Path>),
    PathNodes(Vec<PathNode>),
    Opaque(Vec<u8>),
}

impl BlockData {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::TilesetNames(_) => BlockKind::TilesetNames,
            Self::Options(_) => BlockKind::Options,
            Self::Bounding(_) => BlockKind::Bounding,
            Self::Backgrounds(_) => BlockKind::Backgrounds,
            Self::Entrances(_) => BlockKind::Entrances,
            Self::Sprites(_) => BlockKind::Sprites,
            Self::LoadedSprites(_) => BlockKind::LoadedSprites,
            Self::Zones(_) => BlockKind::Zones,
            Self::Locations(_) => BlockKind::Locations,
            Self::Paths(_) => BlockKind::Paths,
            Self::PathNodes(_) => BlockKind::PathNodes,
            Self::Opaque(_) => BlockKind::Opaque,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind() {
            BlockKind::TilesetNames => "tileset names",
            BlockKind::Options => "options",
            BlockKind::Bounding => "bounding",
            BlockKind::Backgrounds => "background",
            BlockKind::Entrances => "entrance",
            BlockKind::Sprites => "sprite",
            BlockKind::LoadedSprites => "loaded sprite",
            BlockKind::Zones => "zone",
            BlockKind::Locations => "location",
            BlockKind::Paths => "path",
            BlockKind::PathNodes => "path node",
            BlockKind::Opaque => "opaque",
        }
    }
}

/// How a block's length is validated before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockShape {
    /// One record; empty means defaults
    Single,
    /// Any number of records, optionally followed by a sentinel
    Stride,
    /// Any bytes
    Raw,
}

type DecodeFn = fn(&[u8], Endian) -> Result<BlockData, FormatError>;
type EncodeFn = fn(&BlockData, Endian) -> Result<Option<Vec<u8>>, FormatError>;

/// Codec entry of one directory slot.
pub struct BlockCodec {
    pub kind: BlockKind,
    pub shape: BlockShape,
    pub record_size: usize,
    pub sentinel: &'static [u8],
    decode: DecodeFn,
    /// `None` result means "kind mismatch"
    encode: EncodeFn,
}

impl BlockCodec {
    const fn single<T: Record>(kind: BlockKind, decode: DecodeFn, encode: EncodeFn) -> Self {
        Self {
            kind,
            shape: BlockShape::Single,
            record_size: T::SIZE,
            sentinel: &[],
            decode,
            encode,
        }
    }

    const fn stride<T: Record>(
        kind: BlockKind,
        sentinel: &'static [u8],
        decode: DecodeFn,
        encode: EncodeFn,
    ) -> Self {
        Self {
            kind,
            shape: BlockShape::Stride,
            record_size: T::SIZE,
            sentinel,
            decode,
            encode,
        }
    }

    const fn opaque() -> Self {
        Self {
            kind: BlockKind::Opaque,
            shape: BlockShape::Raw,
            record_size: 0,
            sentinel: &[],
            decode: decode_opaque,
            encode: encode_opaque,
        }
    }

    fn check_size(&self, block: usize, len: usize) -> Result<(), FormatError> {
        match self.shape {
            BlockShape::Raw => Ok(()),
            BlockShape::Single => {
                if len == 0 || len >= self.record_size {
                    Ok(())
                } else {
                    Err(FormatError::BlockSize {
                        block,
                        expected: self.record_size,
                        actual: len,
                    })
                }
            }
            BlockShape::Stride => {
                check_stride(len, self.record_size, self.sentinel.len()).map_err(|expected| {
                    FormatError::BlockSize {
                        block,
                        expected,
                        actual: len,
                    }
                })
            }
        }
    }
}

/// A stride stream may end in a partial record only if it is the sentinel.
/// On failure returns the nearest valid length.
pub(crate) fn check_stride(len: usize, size: usize, sentinel: usize) -> Result<(), usize> {
    let rem = len % size;
    if rem == 0 || rem == sentinel {
        Ok(())
    } else {
        Err(len - rem + sentinel)
    }
}

macro_rules! stride_codec {
    ($decode:ident, $encode:ident, $variant:ident, $ty:ty, $sentinel:expr) => {
        fn $decode(buf: &[u8], endian: Endian) -> Result<BlockData, FormatError> {
            Ok(BlockData::$variant(decode_records::<$ty>(buf, endian)?))
        }

        fn $encode(data: &BlockData, endian: Endian) -> Result<Option<Vec<u8>>, FormatError> {
            match data {
                BlockData::$variant(records) => encode_records(records, $sentinel, endian).map(Some),
                _ => Ok(None),
            }
        }
    };
}

stride_codec!(decode_bounding, encode_bounding, Bounding, Bounding, &[]);
stride_codec!(decode_backgrounds, encode_backgrounds, Backgrounds, Background, &[]);
stride_codec!(decode_entrances, encode_entrances, Entrances, Entrance, &[]);
stride_codec!(decode_sprites, encode_sprites, Sprites, Sprite, SPRITE_SENTINEL);
stride_codec!(decode_loaded, encode_loaded, LoadedSprites, LoadedSprite, &[]);
stride_codec!(decode_zones, encode_zones, Zones, Zone, &[]);
stride_codec!(decode_locations, encode_locations, Locations, Location, &[]);
stride_codec!(decode_paths, encode_paths, Paths, Path, &[]);
stride_codec!(decode_nodes, encode_nodes, PathNodes, PathNode, &[]);

fn decode_tilesets(buf: &[u8], endian: Endian) -> Result<BlockData, FormatError> {
    if buf.is_empty() {
        return Ok(BlockData::TilesetNames(TilesetNames::default()));
    }
    let names = TilesetNames::read(&mut ByteReader::new(buf, endian))?;
    Ok(BlockData::TilesetNames(names))
}

fn encode_tilesets(data: &BlockData, endian: Endian) -> Result<Option<Vec<u8>>, FormatError> {
    match data {
        BlockData::TilesetNames(names) => {
            encode_records(std::slice::from_ref(names), &[], endian).map(Some)
        }
        _ => Ok(None),
    }
}

fn decode_options(buf: &[u8], endian: Endian) -> Result<BlockData, FormatError> {
    if buf.is_empty() {
        return Ok(BlockData::Options(AreaOptions::default()));
    }
    let options = AreaOptions::read(&mut ByteReader::new(buf, endian))?;
    Ok(BlockData::Options(options))
}

fn encode_options(data: &BlockData, endian: Endian) -> Result<Option<Vec<u8>>, FormatError> {
    match data {
        BlockData::Options(options) => {
            encode_records(std::slice::from_ref(options), &[], endian).map(Some)
        }
        _ => Ok(None),
    }
}

fn decode_opaque(buf: &[u8], _endian: Endian) -> Result<BlockData, FormatError> {
    Ok(BlockData::Opaque(buf.to_vec()))
}

fn encode_opaque(data: &BlockData, _endian: Endian) -> Result<Option<Vec<u8>>, FormatError> {
    match data {
        BlockData::Opaque(bytes) => Ok(Some(bytes.clone())),
        _ => Ok(None),
    }
}

/// Codec of every directory slot, indexed by block number.
pub static BLOCK_CODECS: [BlockCodec; BLOCK_COUNT] = [
    BlockCodec::single::<TilesetNames>(BlockKind::TilesetNames, decode_tilesets, encode_tilesets),
    BlockCodec::single::<AreaOptions>(BlockKind::Options, decode_options, encode_options),
    BlockCodec::stride::<Bounding>(BlockKind::Bounding, &[], decode_bounding, encode_bounding),
    BlockCodec::opaque(),
    BlockCodec::stride::<Background>(
        BlockKind::Backgrounds,
        &[],
        decode_backgrounds,
        encode_backgrounds,
    ),
    BlockCodec::opaque(),
    BlockCodec::stride::<Entrance>(BlockKind::Entrances, &[], decode_entrances, encode_entrances),
    BlockCodec::stride::<Sprite>(
        BlockKind::Sprites,
        SPRITE_SENTINEL,
        decode_sprites,
        encode_sprites,
    ),
    BlockCodec::stride::<LoadedSprite>(BlockKind::LoadedSprites, &[], decode_loaded, encode_loaded),
    BlockCodec::stride::<Zone>(BlockKind::Zones, &[], decode_zones, encode_zones),
    BlockCodec::stride::<Location>(BlockKind::Locations, &[], decode_locations, encode_locations),
    BlockCodec::opaque(),
    BlockCodec::opaque(),
    BlockCodec::stride::<Path>(BlockKind::Paths, &[], decode_paths, encode_paths),
    BlockCodec::stride::<PathNode>(BlockKind::PathNodes, &[], decode_nodes, encode_nodes),
];

/// Decode block `index` after validating its length.
pub fn decode_block(index: usize, buf: &[u8], endian: Endian) -> Result<BlockData, FormatError> {
    let codec = &BLOCK_CODECS[index];
    codec.check_size(index, buf.len())?;
    (codec.decode)(buf, endian)
}

/// Encode `data` as block `index`.
pub fn encode_block(index: usize, data: &BlockData, endian: Endian) -> Result<Vec<u8>, FormatError> {
    let codec = &BLOCK_CODECS[index];
    (codec.encode)(data, endian)?.ok_or(FormatError::KindMismatch {
        block: index,
        found: data.kind_name(),
    })
}
