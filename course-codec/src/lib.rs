//! Course container codec
//!
//! Reads and writes the per-area course blobs of a level archive:
//!
//! - [`block_table`] - the 15-slot directory and the metadata gap
//! - [`records`] - fixed-size record codecs and the registered block table
//! - [`metadata`] - the versioned key/type/value store (with legacy fallback)
//! - [`optimizer`] - save-time canonicalization of zone references
//! - [`area`] - load/save of one area
//! - [`level`] - discovery and packing of all areas of a level
//! - [`tileset`] - lookup of the tileset archives a level uses
//!
//! Every decode and encode call takes an explicit [`Endian`]; see
//! [`course_shared::config::ByteOrderConfig`] for the defaults.

pub mod area;
pub mod block_table;
pub mod error;
pub mod io;
pub mod level;
pub mod metadata;
pub mod optimizer;
pub mod records;
pub mod tileset;

pub use area::{Area, SavedArea};
pub use error::{FormatError, LegacyError, MetadataError};
pub use level::Level;
pub use metadata::MetadataStore;
pub use optimizer::{ZoneLayout, optimize};
pub use tileset::{TilesetResolver, UnitDirResolver};

pub use course_shared::Endian;
