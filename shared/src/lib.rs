//! Shared types for the course container codec.
//!
//! This crate holds everything that is not the codec itself but that the
//! codec and its callers have to agree on:
//!
//! - [`course_format`] - entry naming and directory geometry (`COURSE_FORMAT`)
//! - [`endian`] - the byte-order switch threaded through every codec call
//! - [`config`] - TOML configuration (tileset unit directory, byte orders)
//! - [`archive`] - the named-entry archive collaborator traits
//! - [`ids`] / [`fs`] - path safety and capped file reads for tileset lookup

pub mod archive;
pub mod config;
pub mod course_format;
pub mod endian;
pub mod fs;
pub mod ids;

pub use archive::{Archive, ArchiveBuilder, MemoryArchive};
pub use config::{ByteOrderConfig, Config, TilesetConfig};
pub use course_format::{COURSE_FORMAT, CourseFormat};
pub use endian::Endian;
