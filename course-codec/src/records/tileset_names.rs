//! Block 0: tileset names
//!
//! # Layout
//! ```text
//! 0x00: slot 0 name, 32 bytes zero-terminated
//! 0x20: slot 1 name
//! 0x40: slot 2 name
//! 0x60: slot 3 name
//! ```

use super::Record;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter, read_fixed_str, write_fixed_str};

/// Tileset every new area starts with in slot 0
pub const DEFAULT_TILESET: &str = "Pa0_jyotyu";

const SLOTS: usize = 4;
const NAME_SIZE: usize = 32;

/// The four tileset slots of an area. Empty string means unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetNames {
    pub slots: [String; SLOTS],
}

impl Default for TilesetNames {
    fn default() -> Self {
        Self {
            slots: [
                DEFAULT_TILESET.to_string(),
                String::new(),
                String::new(),
                String::new(),
            ],
        }
    }
}

impl TilesetNames {
    /// Names of used slots, in slot order
    pub fn used(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str).filter(|s| !s.is_empty())
    }
}

impl Record for TilesetNames {
    const SIZE: usize = SLOTS * NAME_SIZE;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let mut slots: [String; SLOTS] = Default::default();
        for slot in slots.iter_mut() {
            *slot = read_fixed_str(&r.bytes::<NAME_SIZE>()?);
        }
        Ok(Self { slots })
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        for slot in &self.slots {
            write_fixed_str(w, slot, NAME_SIZE, "tileset name")?;
        }
        Ok(())
    }
}
