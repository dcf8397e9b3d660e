//! Pure-Rust GLB (binary glTF) container parser.
//!
//! Works purely at the container layer: recognises the format, validates
//! the 12-byte header and the chunk table against the declared lengths, and
//! hands back byte ranges or owned copies of the JSON chunk and of any
//! requested BIN chunk.  What the JSON describes is left to `serde_json`
//! and the caller's document type.
//!
//! Two input shapes share one algorithm:
//!
//! * **in-memory buffers** — [`parse_slice`], [`extract_binary_chunk`]
//! * **seekable streams** — [`parse_reader`], [`read_binary_chunk`],
//!   [`seek_reader_to_binary_chunk`]
//!
//! Both are thin wrappers over the generic operations in [`reader`], which
//! run against any [`ByteSource`].

pub mod reader;
pub mod source;
pub mod types;

pub use reader::{
    InspectReport, JsonText, ParsedDocument, enumerate_chunks, extract_binary_chunk, find_chunks,
    inspect_file, is_glb, locate_json_chunk, parse_json, parse_reader, parse_slice,
    read_binary_chunk, read_chunk_header, read_chunk_payload, read_header, read_json_text,
    seek_reader_to_binary_chunk, seek_to_binary_chunk,
};
pub use source::{ByteSource, SliceSource, StreamSource};
pub use types::{
    CHUNK_HEADER_SIZE, CHUNK_TYPE_BIN, CHUNK_TYPE_JSON, ChunkKind, ChunkLocation, ContainerHeader,
    GLB_MAGIC, GLB_VERSION, GlbError, HEADER_SIZE, Result,
};
