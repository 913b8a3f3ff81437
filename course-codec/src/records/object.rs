//! Object layers (`course<N>_bgdatL{0,1,2}.bin`)
//!
//! Layers live outside the course blob's directory, one file per layer.
//!
//! # Layout
//! ```text
//! 0x00: packed u16 (bits 12-13 = tileset slot, bits 0-7 = object type)
//! 0x02: x i16, y i16
//! 0x06: width u16, height u16
//! 0x0A: data u8
//! 0x0B: padding (5 bytes)
//! ```
//!
//! The stream ends with `FF FF`. An empty layer is not written at all.

use course_shared::Endian;

use super::{Record, check_stride, decode_records, encode_records};
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

/// Terminator of an object layer stream
pub const LAYER_SENTINEL: &[u8] = &[0xFF; 2];

/// Draw-order stride between layers
const LAYER_Z_STRIDE: u32 = 8192;

/// Object type every item-containing block is folded into
const ITEM_BLOCK: u8 = 28;
const ITEM_TYPES: std::ops::RangeInclusive<u8> = 16..=39;
/// Item data of a plain item block
const DEFAULT_ITEM_DATA: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelObject {
    /// Tileset slot 0..=3
    pub tileset: u8,
    pub object_type: u8,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub data: u8,
    /// Draw order, assigned on decode and not stored
    pub z: u32,
}

impl Record for LevelObject {
    const SIZE: usize = 16;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let packed = r.u16()?;
        let object = Self {
            tileset: ((packed >> 12) & 3) as u8,
            object_type: (packed & 0xFF) as u8,
            x: r.i16()?,
            y: r.i16()?,
            width: r.u16()?,
            height: r.u16()?,
            data: r.u8()?,
            z: 0,
        };
        r.skip(5)?;
        Ok(object)
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        if self.tileset > 3 {
            return Err(FormatError::OutOfRange {
                field: "object tileset slot",
                value: i64::from(self.tileset),
            });
        }
        w.u16((u16::from(self.tileset) << 12) | u16::from(self.object_type));
        w.i16(self.x);
        w.i16(self.y);
        w.u16(self.width);
        w.u16(self.height);
        w.u8(self.data);
        w.pad(5);
        Ok(())
    }
}

/// Fold item-containing blocks of tileset 0 into the item block type.
///
/// Types 16..=39 become type 28 with data `type - 15`; type 28 keeps its
/// own data, with 0 replaced by 13. Every other object gets data 0.
pub fn remap_item_block(object: &mut LevelObject) {
    if object.tileset == 0 && ITEM_TYPES.contains(&object.object_type) {
        if object.object_type != ITEM_BLOCK {
            object.data = object.object_type - 15;
            object.object_type = ITEM_BLOCK;
        }
        if object.data == 0 {
            object.data = DEFAULT_ITEM_DATA;
        }
    } else {
        object.data = 0;
    }
}

/// Decode layer `layer` (0..=2), assigning draw order and remapping item blocks.
pub fn decode_layer(
    layer: usize,
    buf: &[u8],
    endian: Endian,
) -> Result<Vec<LevelObject>, FormatError> {
    check_stride(buf.len(), LevelObject::SIZE, LAYER_SENTINEL.len()).map_err(|expected| {
        FormatError::LayerSize {
            layer,
            expected,
            actual: buf.len(),
        }
    })?;

    let base = (2 - layer.min(2) as u32) * LAYER_Z_STRIDE;
    let mut objects = decode_records::<LevelObject>(buf, endian)?;
    for (i, object) in objects.iter_mut().enumerate() {
        object.z = base + i as u32;
        remap_item_block(object);
    }
    Ok(objects)
}

/// Encode a layer; `None` for an empty layer so the caller skips the entry.
pub fn encode_layer(
    objects: &[LevelObject],
    endian: Endian,
) -> Result<Option<Vec<u8>>, FormatError> {
    if objects.is_empty() {
        return Ok(None);
    }
    encode_records(objects, LAYER_SENTINEL, endian).map(Some)
}
