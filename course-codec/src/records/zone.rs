//! Block 9: zones
//!
//! # Layout
//! ```text
//! 0x00: x u16, y u16, width u16, height u16
//! 0x08: model_dark u16, terrain_dark u16
//! 0x0C: id, bounding_id, cam_mode, cam_zoom (u8 each)
//! 0x10: padding (1 byte)
//! 0x11: visibility u8, background_id u8
//! 0x13: padding (1 byte)
//! 0x14: cam_track u8
//! 0x15: padding (1 byte)
//! 0x16: music u8, sfx_mod u8
//! 0x18: padding (1 byte)
//! 0x19: zone_type u8
//! 0x1A: padding (2 bytes)
//! ```

use super::Record;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Zone {
    /// Signed in memory so edits may go negative; clamped to 0 on save
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
    pub model_dark: u16,
    pub terrain_dark: u16,
    /// Source-order id (the zone's index in the block after load)
    pub id: u8,
    /// Reference to a bounding record by its id, `None` if unresolved
    pub bounding_id: Option<u16>,
    pub cam_mode: u8,
    pub cam_zoom: u8,
    pub visibility: u8,
    /// Reference to a background record by its id, `None` if unresolved
    pub background_id: Option<u16>,
    pub cam_track: u8,
    pub music: u8,
    pub sfx_mod: u8,
    pub zone_type: u8,
}

impl Record for Zone {
    const SIZE: usize = 28;

    /// References are read raw; the area resolves them against its registries.
    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let x = i32::from(r.u16()?);
        let y = i32::from(r.u16()?);
        let width = r.u16()?;
        let height = r.u16()?;
        let model_dark = r.u16()?;
        let terrain_dark = r.u16()?;
        let id = r.u8()?;
        let bounding_id = Some(u16::from(r.u8()?));
        let cam_mode = r.u8()?;
        let cam_zoom = r.u8()?;
        r.skip(1)?;
        let visibility = r.u8()?;
        let background_id = Some(u16::from(r.u8()?));
        r.skip(1)?;
        let cam_track = r.u8()?;
        r.skip(1)?;
        let music = r.u8()?;
        let sfx_mod = r.u8()?;
        r.skip(1)?;
        let zone_type = r.u8()?;
        r.skip(2)?;

        Ok(Self {
            x,
            y,
            width,
            height,
            model_dark,
            terrain_dark,
            id,
            bounding_id,
            cam_mode,
            cam_zoom,
            visibility,
            background_id,
            cam_track,
            music,
            sfx_mod,
            zone_type,
        })
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        w.u16(coordinate(self.x, "zone x")?);
        w.u16(coordinate(self.y, "zone y")?);
        w.u16(self.width);
        w.u16(self.height);
        w.u16(self.model_dark);
        w.u16(self.terrain_dark);
        w.u8(self.id);
        w.u8(reference(self.bounding_id, "zone bounding id")?);
        w.u8(self.cam_mode);
        w.u8(self.cam_zoom);
        w.pad(1);
        w.u8(self.visibility);
        w.u8(reference(self.background_id, "zone background id")?);
        w.pad(1);
        w.u8(self.cam_track);
        w.pad(1);
        w.u8(self.music);
        w.u8(self.sfx_mod);
        w.pad(1);
        w.u8(self.zone_type);
        w.pad(2);
        Ok(())
    }
}

fn coordinate(value: i32, field: &'static str) -> Result<u16, FormatError> {
    u16::try_from(value).map_err(|_| FormatError::OutOfRange {
        field,
        value: i64::from(value),
    })
}

/// Unresolved references are written as -1, which never fits the u8 field.
fn reference(id: Option<u16>, field: &'static str) -> Result<u8, FormatError> {
    let id = id.ok_or(FormatError::OutOfRange { field, value: -1 })?;
    u8::try_from(id).map_err(|_| FormatError::OutOfRange {
        field,
        value: i64::from(id),
    })
}
