//! Area metadata store
//!
//! Free-form key/type/value data kept in the gap between the course blob's
//! directory and its first block. Unknown type tags are kept and written
//! back unchanged, so data added by newer tools survives a load/save cycle.
//!
//! # Layout
//! All integers are big-endian whatever the blob's byte order.
//! ```text
//! 0x00: "MD2_"
//! then, per key:
//!   key_len u32, key (one byte per character)
//!   type_count u32
//!   per type: tag u32, value_len u32, value
//! ```
//!
//! Tag 0 is binary, tag 1 is text (one byte per character), other tags are
//! reserved. Parsing stops once 4 or fewer bytes remain (alignment padding).

mod legacy;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use crate::error::MetadataError;
use crate::io::latin1_bytes;

/// Marker of the versioned format
pub const VERSION_MARKER: &[u8; 4] = b"MD2_";

/// Type tag of opaque binary values
pub const TYPE_BINARY: u32 = 0;
/// Type tag of text values
pub const TYPE_TEXT: u32 = 1;

/// Key -> type tag -> value bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataStore {
    entries: BTreeMap<String, BTreeMap<u32, Vec<u8>>>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn binary(&self, key: &str) -> Option<&[u8]> {
        self.other(key, TYPE_BINARY)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.other(key, TYPE_TEXT)
            .map(|bytes| bytes.iter().map(|&b| char::from(b)).collect())
    }

    /// Raw value of `key` under any type tag
    pub fn other(&self, key: &str, tag: u32) -> Option<&[u8]> {
        self.entries.get(key)?.get(&tag).map(Vec::as_slice)
    }

    pub fn set_binary(&mut self, key: &str, value: Vec<u8>) -> Result<(), MetadataError> {
        self.set_other(key, TYPE_BINARY, value)
    }

    /// Sets a text value. Only characters up to U+00FF can be stored.
    pub fn set_text(&mut self, key: &str, value: &str) -> Result<(), MetadataError> {
        let bytes = latin1_bytes(value).ok_or(MetadataError::NotLatin1 { what: "text value" })?;
        self.set_other(key, TYPE_TEXT, bytes)
    }

    /// Sets the value of `key` under `tag`, replacing any previous one.
    pub fn set_other(&mut self, key: &str, tag: u32, value: Vec<u8>) -> Result<(), MetadataError> {
        if latin1_bytes(key).is_none() {
            return Err(MetadataError::NotLatin1 { what: "key" });
        }
        self.entries
            .entry(key.to_string())
            .or_default()
            .insert(tag, value);
        Ok(())
    }

    /// Removes `key` with all its types. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Best-effort decode of a metadata gap.
    ///
    /// Versioned data that fails to parse, and legacy data that is not a
    /// plain string map, both give an empty store.
    pub fn decode(data: &[u8]) -> Self {
        if data.is_empty() {
            return Self::default();
        }

        if !data.starts_with(VERSION_MARKER) {
            return Self::from_legacy(data);
        }

        match Self::parse(data) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(len = data.len(), "Discarding unreadable metadata: {}", e);
                Self::default()
            }
        }
    }

    /// Strict parse of versioned data (must start with [`VERSION_MARKER`]).
    pub fn parse(data: &[u8]) -> Result<Self, MetadataError> {
        let mut cursor = Cursor {
            data,
            pos: VERSION_MARKER.len(),
        };
        let mut store = Self::default();

        while cursor.remaining() > 4 {
            let key_len = cursor.u32()? as usize;
            let key: String = cursor.take(key_len)?.iter().map(|&b| char::from(b)).collect();
            let type_count = cursor.u32()?;

            let mut types = BTreeMap::new();
            for _ in 0..type_count {
                let tag = cursor.u32()?;
                let value_len = cursor.u32()? as usize;
                types.insert(tag, cursor.take(value_len)?.to_vec());
            }
            // a key without types holds no data
            if !types.is_empty() {
                store.entries.entry(key).or_default().extend(types);
            }
        }

        Ok(store)
    }

    /// Encode the store; an empty store encodes to no bytes at all.
    ///
    /// Keys are written in ascending order, types in ascending tag order.
    pub fn encode(&self) -> Result<Vec<u8>, MetadataError> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = VERSION_MARKER.to_vec();
        for (key, types) in &self.entries {
            let key = latin1_bytes(key).ok_or(MetadataError::NotLatin1 { what: "key" })?;
            push_len(&mut out, key.len(), "key")?;
            out.extend_from_slice(&key);
            push_len(&mut out, types.len(), "type count")?;

            for (&tag, value) in types {
                out.extend_from_slice(&tag.to_be_bytes());
                push_len(&mut out, value.len(), "value")?;
                out.extend_from_slice(value);
            }
        }
        Ok(out)
    }

    fn from_legacy(data: &[u8]) -> Self {
        let map = match legacy::parse(data) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(len = data.len(), "Ignoring legacy metadata: {}", e);
                return Self::default();
            }
        };

        let mut store = Self::default();
        for (key, value) in &map {
            if let Err(e) = store.set_text(key, value) {
                tracing::warn!(key = %key, "Ignoring legacy metadata: {}", e);
                return Self::default();
            }
        }

        if !map.contains_key("Website") {
            if let Some(types) = store.entries.get("Webpage").cloned() {
                store.entries.insert("Website".to_string(), types);
            }
        }

        store
    }
}

fn push_len(out: &mut Vec<u8>, len: usize, what: &'static str) -> Result<(), MetadataError> {
    let len32 = u32::try_from(len).map_err(|_| MetadataError::TooLong { what, len })?;
    out.extend_from_slice(&len32.to_be_bytes());
    Ok(())
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], MetadataError> {
        if self.remaining() < len {
            return Err(MetadataError::Truncated {
                offset: self.pos,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn u32(&mut self) -> Result<u32, MetadataError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
