//! Random-access byte sources the scanner reads from.
//!
//! The container walk only ever needs two things from its input: the total
//! byte length and the ability to read a few bytes at an absolute offset.
//! [`ByteSource`] captures exactly that, so the same walk runs over an
//! in-memory buffer ([`SliceSource`]) and over a seekable stream
//! ([`StreamSource`]).

use std::io::{self, Read, Seek, SeekFrom};

use crate::types::{GlbError, Result};

pub trait ByteSource {
    /// Total number of bytes in the source, independent of any start offset.
    fn total_length(&mut self) -> Result<u64>;

    /// Fill `buf` with the bytes at `offset`.
    ///
    /// Fails with [`GlbError::LengthMismatch`] when fewer than `buf.len()`
    /// bytes are available.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()>;

    fn read_u32_at(&mut self, offset: u64) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_at(offset, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }
}

fn short_read(offset: u64, wanted: usize, available: u64) -> GlbError {
    GlbError::LengthMismatch(format!(
        "read of {wanted} bytes at offset {offset} exceeds source length {available}"
    ))
}

//  In-memory buffer

#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl ByteSource for SliceSource<'_> {
    fn total_length(&mut self) -> Result<u64> {
        Ok(self.bytes.len() as u64)
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let available = self.bytes.len() as u64;
        let end = offset
            .checked_add(buf.len() as u64)
            .filter(|&end| end <= available)
            .ok_or_else(|| short_read(offset, buf.len(), available))?;
        // Both bounds are <= bytes.len(), so they fit in usize.
        buf.copy_from_slice(&self.bytes[offset as usize..end as usize]);
        Ok(())
    }
}

//  Seekable stream

/// Borrows a stream for the duration of one parse.
///
/// Every read seeks to an absolute offset first, so nothing read during
/// format detection is lost to a later pass over the same bytes.
pub struct StreamSource<'a, R> {
    inner: &'a mut R,
    len: Option<u64>,
}

impl<'a, R: Read + Seek> StreamSource<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self { inner, len: None }
    }

    /// Leave the underlying stream positioned at `offset`.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }
}

impl<R: Read + Seek> ByteSource for StreamSource<'_, R> {
    fn total_length(&mut self) -> Result<u64> {
        if let Some(len) = self.len {
            return Ok(len);
        }
        let pos = self.inner.stream_position()?;
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(pos))?;
        self.len = Some(len);
        Ok(len)
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let available = self.total_length()?;
        if offset
            .checked_add(buf.len() as u64)
            .is_none_or(|end| end > available)
        {
            return Err(short_read(offset, buf.len(), available));
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => short_read(offset, buf.len(), available),
            _ => GlbError::Io(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn slice_reads_little_endian_u32() {
        let bytes = [0x67, 0x6C, 0x54, 0x46, 0x02, 0x00, 0x00, 0x00];
        let mut src = SliceSource::new(&bytes);
        assert_eq!(src.read_u32_at(0).unwrap(), 0x4654_6C67);
        assert_eq!(src.read_u32_at(4).unwrap(), 2);
        assert_eq!(src.total_length().unwrap(), 8);
    }

    #[test]
    fn slice_rejects_reads_past_the_end() {
        let bytes = [0u8; 6];
        let mut src = SliceSource::new(&bytes);
        assert!(matches!(
            src.read_u32_at(4),
            Err(GlbError::LengthMismatch(_))
        ));
        assert!(matches!(
            src.read_u32_at(u64::MAX - 1),
            Err(GlbError::LengthMismatch(_))
        ));
    }

    #[test]
    fn stream_length_does_not_move_the_cursor() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3, 4, 5]);
        cursor.set_position(3);
        let mut src = StreamSource::new(&mut cursor);
        assert_eq!(src.total_length().unwrap(), 5);
        drop(src);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn stream_reads_are_absolute_and_repeatable() {
        let mut cursor = Cursor::new(vec![9u8, 0, 0, 0, 7, 0, 0, 0]);
        let mut src = StreamSource::new(&mut cursor);
        assert_eq!(src.read_u32_at(4).unwrap(), 7);
        assert_eq!(src.read_u32_at(0).unwrap(), 9);
        assert_eq!(src.read_u32_at(0).unwrap(), 9);
        assert!(matches!(
            src.read_u32_at(5),
            Err(GlbError::LengthMismatch(_))
        ));
    }
}
