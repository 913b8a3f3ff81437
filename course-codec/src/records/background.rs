//! Block 4: background records
//!
//! # Layout
//! ```text
//! 0x00: id u16
//! 0x02: params 3 x u16
//! 0x08: name, 16 bytes zero-padded
//! 0x18: padding (1 byte)
//! 0x19: flag u8
//! 0x1A: padding (2 bytes)
//! ```

use super::Record;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

const NAME_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Background {
    pub id: u16,
    pub params: [u16; 3],
    /// Raw name field, kept byte-exact
    pub name: [u8; NAME_SIZE],
    pub flag: u8,
}

impl Background {
    /// Plain black background, used for new areas and unresolved references.
    pub fn black(id: u16) -> Self {
        let mut name = [0u8; NAME_SIZE];
        name[..5].copy_from_slice(b"Black");
        Self {
            id,
            params: [0; 3],
            name,
            flag: 0,
        }
    }

    /// Copy of this record under another id
    pub fn with_id(self, id: u16) -> Self {
        Self { id, ..self }
    }
}

impl Record for Background {
    const SIZE: usize = 28;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let id = r.u16()?;
        let params = [r.u16()?, r.u16()?, r.u16()?];
        let name = r.bytes::<NAME_SIZE>()?;
        r.skip(1)?;
        let flag = r.u8()?;
        r.skip(2)?;
        Ok(Self {
            id,
            params,
            name,
            flag,
        })
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        w.u16(self.id);
        for &param in &self.params {
            w.u16(param);
        }
        w.bytes(&self.name);
        w.pad(1);
        w.u8(self.flag);
        w.pad(2);
        Ok(())
    }
}
