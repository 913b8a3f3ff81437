//! Block 10: locations
//!
//! `x u16, y u16, width u16, height u16, id u8` + 3 bytes padding.

use super::Record;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub id: u8,
}

impl Record for Location {
    const SIZE: usize = 12;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let location = Self {
            x: r.u16()?,
            y: r.u16()?,
            width: r.u16()?,
            height: r.u16()?,
            id: r.u8()?,
        };
        r.skip(3)?;
        Ok(location)
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        w.u16(self.x);
        w.u16(self.y);
        w.u16(self.width);
        w.u16(self.height);
        w.u8(self.id);
        w.pad(3);
        Ok(())
    }
}
