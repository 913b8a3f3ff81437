//! Error types for course blob decoding and encoding

/// Fatal errors of the block table and record codecs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Blob cannot even hold the directory
    #[error("course blob too small: {actual} bytes (directory needs {expected})")]
    TooSmall { expected: usize, actual: usize },

    /// Non-empty directory entry pointing into the directory itself
    #[error("block {block} starts inside the directory (offset {offset:#x})")]
    InsideDirectory { block: usize, offset: u32 },

    /// Non-empty directory entry reaching past the end of the blob
    #[error("block {block} ({offset:#x}+{length}) extends past end of blob ({blob_len} bytes)")]
    BlockOutOfRange {
        block: usize,
        offset: u32,
        length: u32,
        blob_len: usize,
    },

    /// Two non-empty directory entries share bytes
    #[error("blocks {first} and {second} overlap")]
    Overlap { first: usize, second: usize },

    /// Metadata gap runs past the first block's offset or into another block
    #[error("metadata region ends at {end:#x}, past the data of block {block}")]
    MetadataOverflow { end: usize, block: usize },

    /// Block length is not a valid size for its record layout
    #[error("block {block} has invalid size: expected {expected} bytes, got {actual}")]
    BlockSize {
        block: usize,
        expected: usize,
        actual: usize,
    },

    /// Object layer length is not a valid size for its record layout
    #[error("layer {layer} has invalid size: expected {expected} bytes, got {actual}")]
    LayerSize {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    /// A record codec got block data of another kind
    #[error("block {block} was given {found} data")]
    KindMismatch { block: usize, found: &'static str },

    /// Ran out of bytes inside a record
    #[error("unexpected end of data")]
    UnexpectedEof,

    /// A model value does not fit its on-disk field
    #[error("{field} value {value} does not fit its on-disk field")]
    OutOfRange { field: &'static str, value: i64 },

    /// A path's node range is not inside the node pool
    #[error("path {path} node range {start}..{end} exceeds pool of {pool} nodes")]
    PathRange {
        path: u8,
        start: usize,
        end: usize,
        pool: usize,
    },

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Errors of the versioned metadata store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    /// An entry claims more bytes than remain
    #[error("metadata truncated at offset {offset}: need {needed} bytes, {remaining} left")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// Keys and text values hold one byte per character
    #[error("{what} contains a character above U+00FF")]
    NotLatin1 { what: &'static str },

    /// A key, value or count is too long for its u32 length field
    #[error("metadata {what} too long: {len} bytes")]
    TooLong { what: &'static str, len: usize },
}

/// Errors of the legacy (pre-versioned) metadata reader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LegacyError {
    #[error("legacy metadata ended before STOP")]
    UnexpectedEof,

    #[error("unsupported legacy opcode {0:#04x} at offset {1}")]
    UnsupportedOpcode(u8, usize),

    #[error("malformed legacy {0} argument")]
    BadArgument(&'static str),

    #[error("legacy stack underflow")]
    StackUnderflow,

    #[error("legacy memo slot {0} is empty")]
    MissingMemo(u32),

    #[error("legacy data is not a string map")]
    NotAStringMap,

    #[error("legacy value contains a character above U+00FF")]
    NotLatin1,

    #[error("legacy data expands past {0} bytes")]
    TooLarge(usize),
}
