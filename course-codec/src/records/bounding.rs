//! Block 2: bounding records (vertical scroll bounds shared by zones)
//!
//! # Layout
//! ```text
//! 0x00: upper i32
//! 0x04: lower i32
//! 0x08: upper_2 i32
//! 0x0C: lower_2 i32
//! 0x10: id u16
//! 0x12: flags u16
//! 0x14: padding (8 bytes)
//! ```

use super::Record;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounding {
    pub upper: i32,
    pub lower: i32,
    pub upper_2: i32,
    pub lower_2: i32,
    pub id: u16,
    pub flags: u16,
}

impl Bounding {
    /// Copy of this record under another id
    pub fn with_id(self, id: u16) -> Self {
        Self { id, ..self }
    }
}

impl Record for Bounding {
    const SIZE: usize = 28;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let bounding = Self {
            upper: r.i32()?,
            lower: r.i32()?,
            upper_2: r.i32()?,
            lower_2: r.i32()?,
            id: r.u16()?,
            flags: r.u16()?,
        };
        r.skip(8)?;
        Ok(bounding)
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        w.i32(self.upper);
        w.i32(self.lower);
        w.i32(self.upper_2);
        w.i32(self.lower_2);
        w.u16(self.id);
        w.u16(self.flags);
        w.pad(8);
        Ok(())
    }
}
