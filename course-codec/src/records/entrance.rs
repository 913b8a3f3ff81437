//! Block 6: entrances
//!
//! # Layout
//! ```text
//! 0x00: x u16, y u16
//! 0x04: camera_x i16, camera_y i16
//! 0x08: id, dest_area, dest_entrance, entrance_type, players, zone (u8 each)
//! 0x0E: padding (1 byte)
//! 0x0F: player_distance u8
//! 0x10: settings u16
//! 0x12: other_id, coin_order, path_id, path_node_index, transition (u8 each)
//! 0x17: padding (1 byte)
//! ```

use super::Record;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Entrance {
    pub x: u16,
    pub y: u16,
    pub camera_x: i16,
    pub camera_y: i16,
    pub id: u8,
    pub dest_area: u8,
    pub dest_entrance: u8,
    pub entrance_type: u8,
    pub players: u8,
    pub zone: u8,
    pub player_distance: u8,
    pub settings: u16,
    pub other_id: u8,
    pub coin_order: u8,
    pub path_id: u8,
    pub path_node_index: u8,
    pub transition: u8,
}

impl Record for Entrance {
    const SIZE: usize = 24;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let x = r.u16()?;
        let y = r.u16()?;
        let camera_x = r.i16()?;
        let camera_y = r.i16()?;
        let id = r.u8()?;
        let dest_area = r.u8()?;
        let dest_entrance = r.u8()?;
        let entrance_type = r.u8()?;
        let players = r.u8()?;
        let zone = r.u8()?;
        r.skip(1)?;
        let player_distance = r.u8()?;
        let settings = r.u16()?;
        let entrance = Self {
            x,
            y,
            camera_x,
            camera_y,
            id,
            dest_area,
            dest_entrance,
            entrance_type,
            players,
            zone,
            player_distance,
            settings,
            other_id: r.u8()?,
            coin_order: r.u8()?,
            path_id: r.u8()?,
            path_node_index: r.u8()?,
            transition: r.u8()?,
        };
        r.skip(1)?;
        Ok(entrance)
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        w.u16(self.x);
        w.u16(self.y);
        w.i16(self.camera_x);
        w.i16(self.camera_y);
        w.u8(self.id);
        w.u8(self.dest_area);
        w.u8(self.dest_entrance);
        w.u8(self.entrance_type);
        w.u8(self.players);
        w.u8(self.zone);
        w.pad(1);
        w.u8(self.player_distance);
        w.u16(self.settings);
        w.u8(self.other_id);
        w.u8(self.coin_order);
        w.u8(self.path_id);
        w.u8(self.path_node_index);
        w.u8(self.transition);
        w.pad(1);
        Ok(())
    }
}
