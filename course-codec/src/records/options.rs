//! Block 1: area options
//!
//! # Layout
//! ```text
//! 0x00: event_bits_a u32
//! 0x04: event_bits_b u32
//! 0x08: wrap flags u16 (bit 0 = wrap, any bit from 3 up = secondary)
//! 0x0A: time_limit u16
//! 0x0C: padding (1 byte)
//! 0x0D: 3 flag bytes, 100 = set
//! 0x10: start_entrance u8
//! 0x11: padding (2 bytes)
//! 0x13: start_entrance_coin_boost u8
//! 0x14: time_limit_2 u16
//! 0x16: time_limit_3 u16
//! ```

use super::Record;
use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

const FLAG_SET: u8 = 100;

bitflags::bitflags! {
    /// Level wrap flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WrapFlags: u16 {
        /// Horizontal wrap-around
        const WRAP = 1;
        /// Secondary wrap bit; any bit at or above this one reads as set
        const SECONDARY = 1 << 3;
    }
}

impl WrapFlags {
    fn from_raw(raw: u16) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::WRAP, raw & Self::WRAP.bits() != 0);
        flags.set(Self::SECONDARY, raw >> 3 != 0);
        flags
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaOptions {
    pub event_bits_a: u32,
    pub event_bits_b: u32,
    pub wrap: WrapFlags,
    pub time_limit: u16,
    /// Three flags stored as 0/100 bytes, meaning unknown
    pub unknown_flags: [bool; 3],
    pub start_entrance: u8,
    pub start_entrance_coin_boost: u8,
    pub time_limit_2: u16,
    pub time_limit_3: u16,
}

impl Default for AreaOptions {
    fn default() -> Self {
        Self {
            event_bits_a: 0,
            event_bits_b: 0,
            wrap: WrapFlags::empty(),
            time_limit: 400,
            unknown_flags: [true; 3],
            start_entrance: 0,
            start_entrance_coin_boost: 0,
            time_limit_2: 300,
            time_limit_3: 0,
        }
    }
}

impl Record for AreaOptions {
    const SIZE: usize = 24;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let event_bits_a = r.u32()?;
        let event_bits_b = r.u32()?;
        let wrap = WrapFlags::from_raw(r.u16()?);
        let time_limit = r.u16()?;
        r.skip(1)?;
        let mut unknown_flags = [false; 3];
        for flag in unknown_flags.iter_mut() {
            *flag = r.u8()? == FLAG_SET;
        }
        let start_entrance = r.u8()?;
        r.skip(2)?;
        let start_entrance_coin_boost = r.u8()?;

        Ok(Self {
            event_bits_a,
            event_bits_b,
            wrap,
            time_limit,
            unknown_flags,
            start_entrance,
            start_entrance_coin_boost,
            time_limit_2: r.u16()?,
            time_limit_3: r.u16()?,
        })
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), FormatError> {
        w.u32(self.event_bits_a);
        w.u32(self.event_bits_b);
        w.u16(self.wrap.bits());
        w.u16(self.time_limit);
        w.pad(1);
        for &flag in &self.unknown_flags {
            w.u8(if flag { FLAG_SET } else { 0 });
        }
        w.u8(self.start_entrance);
        w.pad(2);
        w.u8(self.start_entrance_coin_boost);
        w.u16(self.time_limit_2);
        w.u16(self.time_limit_3);
        Ok(())
    }
}
