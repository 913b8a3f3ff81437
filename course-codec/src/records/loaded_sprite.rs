//! Block 8: loaded sprite summary
//!
//! Ascending, de-duplicated list of the sprite types an area uses, each
//! stored as `sprite_type u16` + 2 bytes padding. Always rebuilt from the
//! sprite list on save.

use super::{Record, Sprite};
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadedSprite {
    pub sprite_type: u16,
}

/// Summary entries for `sprites`
pub fn summarize_sprites(sprites: &[Sprite]) -> Vec<LoadedSprite> {
    let mut types: Vec<u16> = sprites.iter().map(|s| s.sprite_type).collect();
    types.sort_unstable();
    types.dedup();
    types
        .into_iter()
        .map(|sprite_type| LoadedSprite { sprite_type })
        .collect()
}

impl Record for LoadedSprite {
    const SIZE: usize = 4;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let sprite_type = r.u16()?;
        r.skip(2)?;
        Ok(Self { sprite_type })
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        w.u16(self.sprite_type);
        w.pad(2);
        Ok(())
    }
}
