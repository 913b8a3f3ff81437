//! Blocks 13 and 14: paths and the shared path node pool
//!
//! # Layout
//! ```text
//! Path (12 bytes):
//! 0x00: id u8
//! 0x01: unknown i8
//! 0x02: node_start u16
//! 0x04: node_count u16
//! 0x06: loop flag u16 (2 = loops)
//! 0x08: padding (4 bytes)
//!
//! Node (20 bytes):
//! 0x00: x u16, y u16
//! 0x04: speed f32
//! 0x08: accel f32
//! 0x0C: delay i16
//! 0x0E: unknown u16
//! 0x10: extra (3 bytes)
//! 0x13: padding (1 byte)
//! ```

use super::Record;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

const LOOP_FLAG: u16 = 2;

/// A path owning `node_count` nodes of the pool starting at `node_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Path {
    pub id: u8,
    pub unknown: i8,
    pub node_start: u16,
    pub node_count: u16,
    pub loops: bool,
}

impl Path {
    /// This path's nodes inside `pool`.
    pub fn nodes<'a>(&self, pool: &'a [PathNode]) -> Result<&'a [PathNode], FormatError> {
        let start = usize::from(self.node_start);
        let end = start + usize::from(self.node_count);
        pool.get(start..end).ok_or(FormatError::PathRange {
            path: self.id,
            start,
            end,
            pool: pool.len(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathNode {
    pub x: u16,
    pub y: u16,
    pub speed: f32,
    pub accel: f32,
    pub delay: i16,
    pub unknown: u16,
    pub extra: [u8; 3],
}

/// Rebuild paths and pool for saving: paths without nodes are dropped and
/// the remaining node ranges are laid out back to back in path order.
pub fn repack_paths(
    paths: &[Path],
    pool: &[PathNode],
) -> Result<(Vec<Path>, Vec<PathNode>), FormatError> {
    let mut packed_paths = Vec::with_capacity(paths.len());
    let mut packed_nodes = Vec::new();

    for path in paths.iter().filter(|p| p.node_count > 0) {
        let nodes = path.nodes(pool)?;
        let node_start =
            u16::try_from(packed_nodes.len()).map_err(|_| FormatError::OutOfRange {
                field: "path node start",
                value: packed_nodes.len() as i64,
            })?;
        packed_nodes.extend_from_slice(nodes);
        packed_paths.push(Path {
            node_start,
            ..*path
        });
    }

    Ok((packed_paths, packed_nodes))
}

impl Record for Path {
    const SIZE: usize = 12;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let path = Self {
            id: r.u8()?,
            unknown: r.i8()?,
            node_start: r.u16()?,
            node_count: r.u16()?,
            loops: r.u16()? == LOOP_FLAG,
        };
        r.skip(4)?;
        Ok(path)
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        w.u8(self.id);
        w.i8(self.unknown);
        w.u16(self.node_start);
        w.u16(self.node_count);
        w.u16(if self.loops { LOOP_FLAG } else { 0 });
        w.pad(4);
        Ok(())
    }
}

impl Record for PathNode {
    const SIZE: usize = 20;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let node = Self {
            x: r.u16()?,
            y: r.u16()?,
            speed: r.f32()?,
            accel: r.f32()?,
            delay: r.i16()?,
            unknown: r.u16()?,
            extra: r.bytes::<3>()?,
        };
        r.skip(1)?;
        Ok(node)
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        w.u16(self.x);
        w.u16(self.y);
        w.f32(self.speed);
        w.f32(self.accel);
        w.i16(self.delay);
        w.u16(self.unknown);
        w.bytes(&self.extra);
        w.pad(1);
        Ok(())
    }
}
