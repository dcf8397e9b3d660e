//! GLB format types and constants.

use serde::{Deserialize, Serialize};

/// Magic bytes `glTF` (little-endian).
pub const GLB_MAGIC: u32 = 0x4654_6C67;

/// The only container version we accept.
pub const GLB_VERSION: u32 = 2;

/// Chunk type tag `JSON` (little-endian).
pub const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;

/// Chunk type tag `BIN\0` (little-endian).
pub const CHUNK_TYPE_BIN: u32 = 0x004E_4942;

/// Magic + version + total length.
pub const HEADER_SIZE: u64 = 12;

/// Chunk length + chunk type.
pub const CHUNK_HEADER_SIZE: u64 = 8;

//  Header

/// The two fields following the magic at the start of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerHeader {
    pub version: u32,
    /// Declared byte length of the whole container, header included.
    pub total_length: u32,
}

//  Chunks

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkKind {
    Json,
    Binary,
    /// Any other tag. Skipped, never an error.
    Unknown(u32),
}

impl ChunkKind {
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            CHUNK_TYPE_JSON => Self::Json,
            CHUNK_TYPE_BIN => Self::Binary,
            other => Self::Unknown(other),
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            Self::Json => CHUNK_TYPE_JSON,
            Self::Binary => CHUNK_TYPE_BIN,
            Self::Unknown(tag) => tag,
        }
    }

    /// Short printable name: `JSON`, `BIN` or the hex tag.
    pub fn name(self) -> String {
        match self {
            Self::Json => "JSON".into(),
            Self::Binary => "BIN".into(),
            Self::Unknown(tag) => format!("0x{tag:08X}"),
        }
    }
}

/// Where a chunk lives inside its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLocation {
    /// Absolute offset of the chunk's 8-byte sub-header.
    pub start_offset: u64,
    pub payload_length: u32,
    pub kind: ChunkKind,
}

impl ChunkLocation {
    /// Absolute offset of the first payload byte.
    pub fn payload_offset(&self) -> u64 {
        self.start_offset + CHUNK_HEADER_SIZE
    }

    /// Absolute offset one past the last payload byte.
    pub fn end_offset(&self) -> u64 {
        self.payload_offset() + u64::from(self.payload_length)
    }
}

//  Error

#[derive(Debug, thiserror::Error)]
pub enum GlbError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Malformed GLB header: {0}")]
    MalformedHeader(String),

    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    #[error("Unexpected chunk type: expected {expected}, found {found}")]
    UnexpectedChunkType { expected: String, found: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON text is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

impl GlbError {
    pub(crate) fn unexpected_chunk(expected: ChunkKind, found: u32) -> Self {
        Self::UnexpectedChunkType {
            expected: expected.name(),
            found: ChunkKind::from_tag(found).name(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GlbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_constants_spell_their_ascii_names() {
        assert_eq!(&GLB_MAGIC.to_le_bytes(), b"glTF");
        assert_eq!(&CHUNK_TYPE_JSON.to_le_bytes(), b"JSON");
        assert_eq!(&CHUNK_TYPE_BIN.to_le_bytes(), b"BIN\0");
    }

    #[test]
    fn unknown_tags_keep_their_value() {
        let kind = ChunkKind::from_tag(0xDEAD_BEEF);
        assert_eq!(kind, ChunkKind::Unknown(0xDEAD_BEEF));
        assert_eq!(kind.tag(), 0xDEAD_BEEF);
        assert_eq!(kind.name(), "0xDEADBEEF");
    }

    #[test]
    fn location_offsets_skip_the_sub_header() {
        let loc = ChunkLocation {
            start_offset: 12,
            payload_length: 4,
            kind: ChunkKind::Json,
        };
        assert_eq!(loc.payload_offset(), 20);
        assert_eq!(loc.end_offset(), 24);
    }
}
