//! Named-entry archive abstraction
//!
//! A level lives inside an outer archive of named entries
//! (`course1.bin`, `course1_bgdatL0.bin`, tileset archives, ...). The codec
//! never parses that container itself; it talks to it through these traits
//! so any archive format can be plugged in.

use std::collections::BTreeMap;

use anyhow::Result;
use bitcode::{Decode, Encode};

/// Read side of an archive: look up an entry's bytes by name.
pub trait Archive {
    /// Returns the bytes of entry `name`, or `None` if the archive has no such entry.
    fn lookup(&self, name: &str) -> Option<&[u8]>;
}

/// Write side of an archive: pack named entries into one blob.
///
/// # Example
///
/// ```ignore
/// pub struct SarcBuilder;
///
/// impl ArchiveBuilder for SarcBuilder {
///     fn build(&self, entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
///         // ...
///     }
/// }
/// ```
pub trait ArchiveBuilder {
    /// Packs `entries` (in the given order) into a new archive blob.
    fn build(&self, entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>>;
}

/// Magic bytes of the `MemoryArchive` packing
pub const MEMORY_ARCHIVE_MAGIC: &[u8; 4] = b"CARC";

#[derive(Encode, Decode)]
struct PackedEntries {
    entries: Vec<(String, Vec<u8>)>,
}

/// In-memory archive keyed by entry name.
///
/// Implements both [`Archive`] and [`ArchiveBuilder`]; the packing is
/// `CARC` magic followed by the bitcode-encoded entry list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.entries.insert(name.into(), data);
    }

    /// Entry names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unpacks bytes produced by [`ArchiveBuilder::build`].
    ///
    /// Later duplicates of a name replace earlier ones.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 || &bytes[0..4] != MEMORY_ARCHIVE_MAGIC {
            anyhow::bail!("Invalid CARC magic bytes");
        }

        let packed: PackedEntries = bitcode::decode(&bytes[4..])
            .map_err(|e| anyhow::anyhow!("Failed to decode CARC archive: {}", e))?;

        Ok(packed.entries.into_iter().collect())
    }
}

impl FromIterator<(String, Vec<u8>)> for MemoryArchive {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u8>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Archive for MemoryArchive {
    fn lookup(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }
}

impl ArchiveBuilder for MemoryArchive {
    fn build(&self, entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        let packed = PackedEntries {
            entries: entries.to_vec(),
        };
        let mut bytes = MEMORY_ARCHIVE_MAGIC.to_vec();
        bytes.extend(bitcode::encode(&packed));
        Ok(bytes)
    }
}
