//! GLB container reader: format detection, header validation, chunk-table
//! walking and payload extraction.
//!
//! Every operation is written once against [`ByteSource`] and exposed for
//! in-memory buffers and seekable streams through thin façades at the
//! bottom of this module.

use std::fs;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::source::{ByteSource, SliceSource, StreamSource};
use crate::types::*;

//  Public result types

/// Raw JSON text pulled out of a source, before any deserialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonText {
    pub text: String,
    /// `true` when the text came from a GLB JSON chunk, which means a
    /// binary chunk may be available as well.
    pub is_glb: bool,
}

/// A deserialised JSON document plus where it came from.
#[derive(Debug, Clone)]
pub struct ParsedDocument<T = serde_json::Value> {
    pub document: T,
    pub is_glb: bool,
}

/// Outcome of [`inspect_file`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectReport {
    pub file_path: PathBuf,
    pub file_size: u64,
    pub start_offset: u64,
    pub is_glb: bool,
    pub header: Option<ContainerHeader>,
    /// Every chunk in table order, unknown types included.
    pub chunks: Vec<ChunkLocation>,
}

//  Format detection

/// Whether the bytes at `start` carry the GLB magic.
///
/// Fewer than four remaining bytes means "not a container" rather than an
/// error: a bare `{}` is a perfectly good JSON document.
pub fn is_glb<S: ByteSource + ?Sized>(src: &mut S, start: u64) -> Result<bool> {
    let len = src.total_length()?;
    if len.saturating_sub(start) < 4 {
        return Ok(false);
    }
    Ok(src.read_u32_at(start)? == GLB_MAGIC)
}

//  Header / first chunk validation

/// Decode the 12-byte container header at `start`.
///
/// The magic and version are checked here; the declared total length is
/// only compared against the source in [`locate_json_chunk`].
pub fn read_header<S: ByteSource + ?Sized>(src: &mut S, start: u64) -> Result<ContainerHeader> {
    let magic = src.read_u32_at(start)?;
    if magic != GLB_MAGIC {
        return Err(GlbError::MalformedHeader(format!(
            "invalid magic 0x{magic:08X}"
        )));
    }

    let version = src.read_u32_at(start + 4)?;
    if version != GLB_VERSION {
        return Err(GlbError::MalformedHeader(format!(
            "unsupported glTF version {version}"
        )));
    }

    let total_length = src.read_u32_at(start + 8)?;
    Ok(ContainerHeader {
        version,
        total_length,
    })
}

/// Read the 8-byte chunk sub-header at `offset`.
pub fn read_chunk_header<S: ByteSource + ?Sized>(
    src: &mut S,
    offset: u64,
) -> Result<ChunkLocation> {
    let payload_length = src.read_u32_at(offset)?;
    let tag = src.read_u32_at(offset + 4)?;
    Ok(ChunkLocation {
        start_offset: offset,
        payload_length,
        kind: ChunkKind::from_tag(tag),
    })
}

/// Validate the container header and return the location of the JSON
/// chunk, which must come first.
pub fn locate_json_chunk<S: ByteSource + ?Sized>(
    src: &mut S,
    start: u64,
) -> Result<ChunkLocation> {
    let header = read_header(src, start)?;

    let actual = src.total_length()?.saturating_sub(start);
    if u64::from(header.total_length) != actual {
        return Err(GlbError::LengthMismatch(format!(
            "header declares {} bytes but the container holds {actual}",
            header.total_length
        )));
    }

    let chunk = read_chunk_header(src, start + HEADER_SIZE)?;
    if chunk.kind != ChunkKind::Json {
        return Err(GlbError::unexpected_chunk(ChunkKind::Json, chunk.kind.tag()));
    }

    if chunk.end_offset() - start > u64::from(header.total_length) {
        return Err(GlbError::LengthMismatch(format!(
            "JSON chunk of {} bytes runs past the end of the container",
            chunk.payload_length
        )));
    }

    debug!(start, json_length = chunk.payload_length, "located JSON chunk");
    Ok(chunk)
}

//  Chunk table walking

/// List the first two chunks of the table (JSON, then BIN if present).
///
/// Stops early at end of input. Chunks past the second are never visited
/// and unknown chunk types are reported, not rejected.
pub fn find_chunks<S: ByteSource + ?Sized>(
    src: &mut S,
    start: u64,
) -> Result<Vec<ChunkLocation>> {
    walk_chunks(src, start, Some(2))
}

/// List every chunk in the table, in order.
pub fn enumerate_chunks<S: ByteSource + ?Sized>(
    src: &mut S,
    start: u64,
) -> Result<Vec<ChunkLocation>> {
    walk_chunks(src, start, None)
}

fn walk_chunks<S: ByteSource + ?Sized>(
    src: &mut S,
    start: u64,
    limit: Option<usize>,
) -> Result<Vec<ChunkLocation>> {
    let header = read_header(src, start)?;
    let len = src.total_length()?;
    // A full walk stays inside the declared container so bytes trailing an
    // embedded container are never read as chunk headers.
    let end = match limit {
        Some(_) => len,
        None => len.min(start + u64::from(header.total_length)),
    };

    let mut chunks = Vec::with_capacity(limit.unwrap_or(2));
    let mut cursor = start + HEADER_SIZE;
    while cursor < end && limit.is_none_or(|max| chunks.len() < max) {
        let chunk = read_chunk_header(src, cursor)?;
        trace!(offset = cursor, length = chunk.payload_length, kind = ?chunk.kind, "chunk");
        cursor = chunk.end_offset();
        chunks.push(chunk);
    }
    Ok(chunks)
}

/// Locate the `index`-th chunk after the JSON chunk and require it to be a
/// BIN chunk.
///
/// The chunk table has no index, so this reads each chunk's length field in
/// turn and advances by `length + 8`, for `index + 2` length reads in
/// total. No alignment padding is assumed between chunks: a chunk whose
/// declared length excludes trailing pad bytes derails the walk.
pub fn seek_to_binary_chunk<S: ByteSource + ?Sized>(
    src: &mut S,
    index: usize,
    start: u64,
) -> Result<ChunkLocation> {
    let header = read_header(src, start)?;

    let mut offset = start + HEADER_SIZE;
    let mut length = src.read_u32_at(offset)?;
    for _ in 0..=index {
        offset += CHUNK_HEADER_SIZE + u64::from(length);
        length = src.read_u32_at(offset)?;
        trace!(offset, length, "walked chunk");
    }

    let chunk = ChunkLocation {
        start_offset: offset,
        payload_length: length,
        kind: ChunkKind::Binary,
    };
    if chunk.end_offset() - start > u64::from(header.total_length) {
        return Err(GlbError::LengthMismatch(format!(
            "binary chunk {index} ends at {} but the header declares {} bytes",
            chunk.end_offset() - start,
            header.total_length
        )));
    }

    let tag = src.read_u32_at(offset + 4)?;
    if tag != CHUNK_TYPE_BIN {
        return Err(GlbError::unexpected_chunk(ChunkKind::Binary, tag));
    }

    debug!(index, offset, length, "located binary chunk");
    Ok(chunk)
}

//  Payload extraction

/// Copy exactly the declared payload of `chunk` into a fresh buffer.
pub fn read_chunk_payload<S: ByteSource + ?Sized>(
    src: &mut S,
    chunk: &ChunkLocation,
) -> Result<Vec<u8>> {
    let available = src.total_length()?;
    if chunk.end_offset() > available {
        return Err(GlbError::LengthMismatch(format!(
            "chunk payload ends at {} but the source holds {available} bytes",
            chunk.end_offset()
        )));
    }
    let mut buf = vec![0u8; chunk.payload_length as usize];
    src.read_at(chunk.payload_offset(), &mut buf)?;
    Ok(buf)
}

//  JSON dispatch

/// Produce the JSON text held by `src`, whether it is a GLB container or a
/// bare JSON document starting at `start`.
pub fn read_json_text<S: ByteSource + ?Sized>(src: &mut S, start: u64) -> Result<JsonText> {
    let len = src.total_length()?;
    if len <= start {
        return Err(GlbError::EmptyInput);
    }

    let is_glb = is_glb(src, start)?;
    let bytes = if is_glb {
        let chunk = locate_json_chunk(src, start)?;
        read_chunk_payload(src, &chunk)?
    } else {
        let remaining = usize::try_from(len - start).map_err(|_| {
            GlbError::LengthMismatch(format!("{} bytes do not fit in memory", len - start))
        })?;
        let mut buf = vec![0u8; remaining];
        src.read_at(start, &mut buf)?;
        buf
    };

    Ok(JsonText {
        text: String::from_utf8(bytes)?,
        is_glb,
    })
}

/// Read the JSON text from `src` and hand it to `serde_json`.
pub fn parse_json<T, S>(src: &mut S, start: u64) -> Result<ParsedDocument<T>>
where
    T: DeserializeOwned,
    S: ByteSource + ?Sized,
{
    let JsonText { text, is_glb } = read_json_text(src, start)?;
    let document = serde_json::from_str(&text)?;
    Ok(ParsedDocument { document, is_glb })
}

//  Buffer façades

pub fn parse_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<ParsedDocument<T>> {
    parse_json(&mut SliceSource::new(bytes), 0)
}

/// Copy out the payload of the `index`-th binary chunk of an in-memory
/// container.
pub fn extract_binary_chunk(bytes: &[u8], index: usize) -> Result<Vec<u8>> {
    let mut src = SliceSource::new(bytes);
    let chunk = seek_to_binary_chunk(&mut src, index, 0)?;
    read_chunk_payload(&mut src, &chunk)
}

//  Stream façades

pub fn parse_reader<T, R>(reader: &mut R, start: u64) -> Result<ParsedDocument<T>>
where
    T: DeserializeOwned,
    R: Read + Seek,
{
    parse_json(&mut StreamSource::new(reader), start)
}

/// Locate the `index`-th binary chunk and leave `reader` positioned at its
/// first payload byte.
pub fn seek_reader_to_binary_chunk<R: Read + Seek>(
    reader: &mut R,
    index: usize,
    start: u64,
) -> Result<ChunkLocation> {
    let mut src = StreamSource::new(reader);
    let chunk = seek_to_binary_chunk(&mut src, index, start)?;
    src.seek_to(chunk.payload_offset())?;
    Ok(chunk)
}

pub fn read_binary_chunk<R: Read + Seek>(
    reader: &mut R,
    index: usize,
    start: u64,
) -> Result<Vec<u8>> {
    let mut src = StreamSource::new(reader);
    let chunk = seek_to_binary_chunk(&mut src, index, start)?;
    read_chunk_payload(&mut src, &chunk)
}

//  File inspection

/// Open `path` and describe the container starting at `start` without
/// reading any payloads.
pub fn inspect_file(path: &Path, start: u64) -> Result<InspectReport> {
    let file = fs::File::open(path)?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let mut src = StreamSource::new(&mut reader);

    let is_glb = is_glb(&mut src, start)?;
    let (header, chunks) = if is_glb {
        (
            Some(read_header(&mut src, start)?),
            enumerate_chunks(&mut src, start)?,
        )
    } else {
        (None, Vec::new())
    };

    debug!(path = %path.display(), is_glb, chunks = chunks.len(), "inspection complete");

    Ok(InspectReport {
        file_path: path.to_path_buf(),
        file_size,
        start_offset: start,
        is_glb,
        header,
        chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(tag);
        out.extend_from_slice(payload);
        out
    }

    fn container(chunks: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = chunks.concat();
        let mut out = b"glTF".to_vec();
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(12 + body.len() as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn detects_magic_without_consuming_it() {
        let glb = container(&[chunk(b"JSON", b"{}")]);
        let mut src = SliceSource::new(&glb);
        assert!(is_glb(&mut src, 0).unwrap());
        assert!(is_glb(&mut src, 0).unwrap());
        assert!(!is_glb(&mut SliceSource::new(b"{}"), 0).unwrap());
        assert!(!is_glb(&mut SliceSource::new(b""), 0).unwrap());
    }

    #[test]
    fn header_rejects_wrong_magic() {
        let mut bytes = container(&[chunk(b"JSON", b"{}")]);
        bytes[0] = b'G';
        let err = read_header(&mut SliceSource::new(&bytes), 0).unwrap_err();
        assert!(matches!(err, GlbError::MalformedHeader(_)));
    }

    #[test]
    fn json_chunk_must_fit_in_container() {
        let mut bytes = container(&[chunk(b"JSON", b"{}")]);
        // Claim a 64-byte JSON payload while keeping the header length honest.
        bytes[12..16].copy_from_slice(&64u32.to_le_bytes());
        let err = locate_json_chunk(&mut SliceSource::new(&bytes), 0).unwrap_err();
        assert!(matches!(err, GlbError::LengthMismatch(_)));
    }

    #[test]
    fn enumerate_reports_every_chunk() {
        let bytes = container(&[
            chunk(b"JSON", b"{}  "),
            chunk(b"BIN\0", &[1, 2, 3, 4]),
            chunk(b"EXT1", &[0; 8]),
        ]);
        let chunks = enumerate_chunks(&mut SliceSource::new(&bytes), 0).unwrap();
        let kinds: Vec<_> = chunks.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChunkKind::Json,
                ChunkKind::Binary,
                ChunkKind::from_tag(u32::from_le_bytes(*b"EXT1"))
            ]
        );
        assert_eq!(chunks[2].end_offset(), bytes.len() as u64);
    }

    #[test]
    fn read_chunk_payload_ignores_trailing_bytes() {
        let mut bytes = container(&[chunk(b"JSON", b"{}"), chunk(b"BIN\0", &[7, 8])]);
        bytes.extend_from_slice(&[0xFF; 5]);
        let mut src = SliceSource::new(&bytes);
        let loc = read_chunk_header(&mut src, 22).unwrap();
        assert_eq!(read_chunk_payload(&mut src, &loc).unwrap(), vec![7, 8]);
    }

    #[test]
    fn oversized_payload_is_rejected_before_reading() {
        let bytes = container(&[chunk(b"JSON", b"{}")]);
        let loc = ChunkLocation {
            start_offset: 12,
            payload_length: u32::MAX,
            kind: ChunkKind::Binary,
        };
        let err = read_chunk_payload(&mut SliceSource::new(&bytes), &loc).unwrap_err();
        assert!(matches!(err, GlbError::LengthMismatch(_)));
    }

    #[test]
    fn full_walk_stops_at_declared_container_end() {
        let mut bytes = container(&[chunk(b"JSON", b"{}")]);
        bytes.extend_from_slice(&[0xEE; 5]);
        let chunks = enumerate_chunks(&mut SliceSource::new(&bytes), 0).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].kind, ChunkKind::Json);
    }

    #[test]
    fn empty_after_start_offset_is_empty_input() {
        let bytes = b"{}";
        let err = read_json_text(&mut SliceSource::new(bytes), 2).unwrap_err();
        assert!(matches!(err, GlbError::EmptyInput));
    }

    #[test]
    fn invalid_utf8_in_bare_json_is_reported() {
        let bytes = [b'"', 0xFF, b'"'];
        let err = read_json_text(&mut SliceSource::new(&bytes), 0).unwrap_err();
        assert!(matches!(err, GlbError::Utf8(_)));
    }
}
