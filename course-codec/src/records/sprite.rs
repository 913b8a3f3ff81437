//! Block 7: sprites
//!
//! # Layout
//! ```text
//! 0x00: sprite_type u16
//! 0x02: x u16, y u16
//! 0x06: settings, stored as u16 + u32 + u32
//! 0x10: zone_id u8, layer u8
//! 0x12: reserved (2 bytes, kept verbatim)
//! 0x14: initial_state u8
//! 0x15: padding (3 bytes)
//! ```
//!
//! The stream ends with `FF FF FF FF`.

use super::Record;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

/// Terminator of the sprite stream
pub const SPRITE_SENTINEL: &[u8] = &[0xFF; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sprite {
    pub sprite_type: u16,
    pub x: u16,
    pub y: u16,
    /// Settings as one big-endian byte string, whatever the file's byte order
    pub settings: [u8; 10],
    pub zone_id: u8,
    pub layer: u8,
    pub reserved: [u8; 2],
    pub initial_state: u8,
}

impl Record for Sprite {
    const SIZE: usize = 24;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let sprite_type = r.u16()?;
        let x = r.u16()?;
        let y = r.u16()?;

        let mut settings = [0u8; 10];
        settings[0..2].copy_from_slice(&r.u16()?.to_be_bytes());
        settings[2..6].copy_from_slice(&r.u32()?.to_be_bytes());
        settings[6..10].copy_from_slice(&r.u32()?.to_be_bytes());

        let sprite = Self {
            sprite_type,
            x,
            y,
            settings,
            zone_id: r.u8()?,
            layer: r.u8()?,
            reserved: r.bytes::<2>()?,
            initial_state: r.u8()?,
        };
        r.skip(3)?;
        Ok(sprite)
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        let s = &self.settings;
        w.u16(self.sprite_type);
        w.u16(self.x);
        w.u16(self.y);
        w.u16(u16::from_be_bytes([s[0], s[1]]));
        w.u32(u32::from_be_bytes([s[2], s[3], s[4], s[5]]));
        w.u32(u32::from_be_bytes([s[6], s[7], s[8], s[9]]));
        w.u8(self.zone_id);
        w.u8(self.layer);
        w.bytes(&self.reserved);
        w.u8(self.initial_state);
        w.pad(3);
        Ok(())
    }
}
