//! Block table codec
//!
//! A course blob starts with a fixed directory of 15 (offset, length) pairs.
//! Free-form metadata may sit in the gap between the directory and the first
//! block's data.
//!
//! # Layout
//! ```text
//! 0x00: directory, 15 x { offset u32, length u32 }
//! 0x78: metadata (zero-padded to 4 bytes), may be empty
//! var:  block 0 data, block 1 data, ... block 14 data
//! ```
//!
//! Offsets are absolute. A zero-length entry is an empty block whatever its
//! offset says.

use course_shared::{COURSE_FORMAT, Endian};

use crate::error::FormatError;
use crate::io::{ByteReader, ByteWriter};

/// Number of directory slots
pub const BLOCK_COUNT: usize = COURSE_FORMAT.block_count;

/// Directory size in bytes
pub const DIRECTORY_SIZE: usize = COURSE_FORMAT.directory_size();

/// One raw directory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockEntry {
    pub offset: u32,
    pub length: u32,
}

impl BlockEntry {
    fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.length as usize
    }
}

/// A split course blob, borrowing from the input.
#[derive(Debug, Clone)]
pub struct BlockTable<'a> {
    /// Data of each block; empty slices for zero-length entries
    pub blocks: [&'a [u8]; BLOCK_COUNT],
    /// Raw first directory entry, which bounds the metadata gap
    pub first_entry: BlockEntry,
    /// Bytes between the directory and block 0's offset
    pub metadata: &'a [u8],
}

/// Split `blob` into its 15 blocks and the metadata gap.
pub fn decode(blob: &[u8], endian: Endian) -> Result<BlockTable<'_>, FormatError> {
    if blob.len() < DIRECTORY_SIZE {
        return Err(FormatError::TooSmall {
            expected: DIRECTORY_SIZE,
            actual: blob.len(),
        });
    }

    let mut reader = ByteReader::new(&blob[..DIRECTORY_SIZE], endian);
    let mut entries = [BlockEntry::default(); BLOCK_COUNT];
    for entry in entries.iter_mut() {
        entry.offset = reader.u32()?;
        entry.length = reader.u32()?;
    }

    for (block, entry) in entries.iter().enumerate() {
        if entry.length == 0 {
            continue;
        }
        if (entry.offset as usize) < DIRECTORY_SIZE {
            return Err(FormatError::InsideDirectory {
                block,
                offset: entry.offset,
            });
        }
        if entry.range().end > blob.len() {
            return Err(FormatError::BlockOutOfRange {
                block,
                offset: entry.offset,
                length: entry.length,
                blob_len: blob.len(),
            });
        }
    }

    check_overlaps(&entries)?;

    let first_entry = entries[0];
    let metadata = metadata_gap(blob, &entries)?;

    let empty: &[u8] = &[];
    let mut blocks = [empty; BLOCK_COUNT];
    for (block, entry) in entries.iter().enumerate() {
        if entry.length > 0 {
            blocks[block] = &blob[entry.range()];
        }
    }

    tracing::debug!(
        blob_len = blob.len(),
        metadata_len = metadata.len(),
        "Split course blob: {:?}",
        blocks.iter().map(|b| b.len()).collect::<Vec<_>>()
    );

    Ok(BlockTable {
        blocks,
        first_entry,
        metadata,
    })
}

fn check_overlaps(entries: &[BlockEntry; BLOCK_COUNT]) -> Result<(), FormatError> {
    let mut used: Vec<(usize, std::ops::Range<usize>)> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.length > 0)
        .map(|(i, e)| (i, e.range()))
        .collect();
    used.sort_by_key(|(_, r)| r.start);

    for pair in used.windows(2) {
        let (a, ra) = &pair[0];
        let (b, rb) = &pair[1];
        if rb.start < ra.end {
            return Err(FormatError::Overlap {
                first: (*a).min(*b),
                second: (*a).max(*b),
            });
        }
    }
    Ok(())
}

/// The metadata gap runs from the end of the directory to block 0's offset.
/// An offset at or before the directory end means there is no metadata.
fn metadata_gap<'a>(
    blob: &'a [u8],
    entries: &[BlockEntry; BLOCK_COUNT],
) -> Result<&'a [u8], FormatError> {
    let end = entries[0].offset as usize;
    if end <= DIRECTORY_SIZE {
        return Ok(&[]);
    }
    if end > blob.len() {
        return Err(FormatError::MetadataOverflow { end, block: 0 });
    }

    for (block, entry) in entries.iter().enumerate().skip(1) {
        if entry.length > 0 && (entry.offset as usize) < end {
            return Err(FormatError::MetadataOverflow { end, block });
        }
    }

    Ok(&blob[DIRECTORY_SIZE..end])
}

/// Assemble a course blob: directory, 4-byte aligned metadata, then every
/// block in slot order with recomputed offsets.
pub fn encode(
    blocks: &[Vec<u8>; BLOCK_COUNT],
    metadata: &[u8],
    endian: Endian,
) -> Result<Vec<u8>, FormatError> {
    let metadata_len = metadata.len().next_multiple_of(4);
    let data_start = DIRECTORY_SIZE + metadata_len;
    let total = data_start + blocks.iter().map(Vec::len).sum::<usize>();

    let mut w = ByteWriter::with_capacity(total, endian);
    let mut offset = data_start;
    for block in blocks {
        w.u32(to_u32(offset, "block offset")?);
        w.u32(to_u32(block.len(), "block length")?);
        offset += block.len();
    }

    w.bytes(metadata);
    w.pad(metadata_len - metadata.len());

    for block in blocks {
        w.bytes(block);
    }

    Ok(w.into_inner())
}

fn to_u32(value: usize, field: &'static str) -> Result<u32, FormatError> {
    u32::try_from(value).map_err(|_| FormatError::OutOfRange {
        field,
        value: value as i64,
    })
}
