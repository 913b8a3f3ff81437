//! Byte order selection.
//!
//! Course blobs are read in the source platform's byte order and written in
//! the destination platform's, so every codec call takes an explicit
//! [`Endian`] instead of assuming one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Default order of the load path (source platform)
    pub const READ_DEFAULT: Endian = Endian::Little;

    /// Default order of the save path (destination platform)
    pub const WRITE_DEFAULT: Endian = Endian::Big;
}
