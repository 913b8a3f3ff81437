//! Byte-order aware readers and writers for record codecs
//!
//! Every codec in this crate reads and writes through these two types so the
//! byte order is chosen once per call instead of being baked into layouts.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use course_shared::Endian;

use crate::error::FormatError;

macro_rules! read_ordered {
    ($name:ident, $ty:ty, $read:ident) => {
        pub fn $name(&mut self) -> Result<$ty, FormatError> {
            let value = match self.endian {
                Endian::Little => self.cursor.$read::<LittleEndian>(),
                Endian::Big => self.cursor.$read::<BigEndian>(),
            };
            value.map_err(|_| FormatError::UnexpectedEof)
        }
    };
}

macro_rules! write_ordered {
    ($name:ident, $ty:ty, $write:ident, $len:literal) => {
        pub fn $name(&mut self, value: $ty) {
            let mut scratch = [0u8; $len];
            match self.endian {
                Endian::Little => LittleEndian::$write(&mut scratch, value),
                Endian::Big => BigEndian::$write(&mut scratch, value),
            }
            self.buf.extend_from_slice(&scratch);
        }
    };
}

/// Cursor over a byte slice reading in a fixed byte order.
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            cursor: Cursor::new(data),
            endian,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    pub fn u8(&mut self) -> Result<u8, FormatError> {
        self.cursor.read_u8().map_err(|_| FormatError::UnexpectedEof)
    }

    pub fn i8(&mut self) -> Result<i8, FormatError> {
        self.cursor.read_i8().map_err(|_| FormatError::UnexpectedEof)
    }

    read_ordered!(u16, u16, read_u16);
    read_ordered!(i16, i16, read_i16);
    read_ordered!(u32, u32, read_u32);
    read_ordered!(i32, i32, read_i32);
    read_ordered!(f32, f32, read_f32);

    /// Read `N` raw bytes (not byte-order dependent)
    pub fn bytes<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut buf = [0u8; N];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| FormatError::UnexpectedEof)?;
        Ok(buf)
    }

    /// Skip padding
    pub fn skip(&mut self, count: usize) -> Result<(), FormatError> {
        if self.remaining() < count {
            return Err(FormatError::UnexpectedEof);
        }
        self.cursor.set_position((self.position() + count) as u64);
        Ok(())
    }
}

/// Growable buffer writing in a fixed byte order.
pub struct ByteWriter {
    buf: Vec<u8>,
    endian: Endian,
}

impl ByteWriter {
    pub fn new(endian: Endian) -> Self {
        Self::with_capacity(0, endian)
    }

    pub fn with_capacity(capacity: usize, endian: Endian) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            endian,
        }
    }

    pub fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    write_ordered!(u16, u16, write_u16, 2);
    write_ordered!(i16, i16, write_i16, 2);
    write_ordered!(u32, u32, write_u32, 4);
    write_ordered!(i32, i32, write_i32, 4);
    write_ordered!(f32, f32, write_f32, 4);

    /// Write raw bytes (not byte-order dependent)
    pub fn bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Write `count` zero bytes
    pub fn pad(&mut self, count: usize) {
        self.buf.resize(self.buf.len() + count, 0);
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Read a zero-terminated string from a fixed-size field.
///
/// Bytes are taken one per character, so any content round-trips through
/// [`write_fixed_str`].
pub fn read_fixed_str(bytes: &[u8]) -> String {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..len].iter().map(|&b| char::from(b)).collect()
}

/// Write `value` into a zero-padded field of `width` bytes.
pub fn write_fixed_str(
    w: &mut ByteWriter,
    value: &str,
    width: usize,
    field: &'static str,
) -> Result<(), FormatError> {
    let bytes = latin1_bytes(value).ok_or(FormatError::OutOfRange {
        field,
        value: value.chars().count() as i64,
    })?;
    if bytes.len() > width {
        return Err(FormatError::OutOfRange {
            field,
            value: bytes.len() as i64,
        });
    }
    w.bytes(&bytes);
    w.pad(width - bytes.len());
    Ok(())
}

/// Encode a string one byte per character, `None` if a character is above U+00FF.
pub fn latin1_bytes(value: &str) -> Option<Vec<u8>> {
    value.chars().map(|c| u8::try_from(c).ok()).collect()
}
