/*!
reader: bounds-checked sequential byte reader over a borrowed slice.

Purpose
- Give every resource parser (directory codec, resource framing, script
  loader, view parser) a single cursor type instead of hand-rolled index
  arithmetic scattered through each parser.
- Every read that would cross the end of the slice fails with
  `AgiError::TruncatedResource` rather than panicking; `seek` fails with
  `AgiError::InvalidOffset`.

This mirrors the bounds-checked cursor style used elsewhere in this crate
for reading a fixed memory map, but is generic over any borrowed byte
slice, since AGI resources are parsed out of volume buffers, not a fixed
address space.
*/

use crate::error::{AgiError, Result};

/// A read-only cursor over a borrowed byte slice with a monotonic offset.
#[derive(Clone, Copy, Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// The full underlying slice, independent of cursor position.
    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    fn require(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(AgiError::TruncatedResource {
                wanted: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read a single byte and advance the cursor.
    pub fn u8(&mut self) -> Result<u8> {
        self.require(1)?;
        let b = self.data[self.cursor];
        self.cursor += 1;
        Ok(b)
    }

    /// Read a little-endian 16-bit word and advance the cursor.
    pub fn u16_le(&mut self) -> Result<u16> {
        self.require(2)?;
        let lo = self.data[self.cursor] as u16;
        let hi = self.data[self.cursor + 1] as u16;
        self.cursor += 2;
        Ok((hi << 8) | lo)
    }

    /// Read a big-endian 16-bit word and advance the cursor.
    pub fn u16_be(&mut self) -> Result<u16> {
        self.require(2)?;
        let hi = self.data[self.cursor] as u16;
        let lo = self.data[self.cursor + 1] as u16;
        self.cursor += 2;
        Ok((hi << 8) | lo)
    }

    /// Peek at the next byte without advancing the cursor.
    pub fn peek(&self) -> Result<u8> {
        self.require(1)?;
        Ok(self.data[self.cursor])
    }

    /// Whether the cursor has reached the end of the slice.
    pub fn at_end(&self) -> bool {
        self.cursor >= self.data.len()
    }

    /// Move the cursor to an absolute offset within the slice.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(AgiError::InvalidOffset {
                target: offset,
                len: self.data.len(),
            });
        }
        self.cursor = offset;
        Ok(())
    }

    /// Take an independent reader over `[cursor, cursor+len)`, without
    /// advancing this reader's own cursor.
    pub fn sub(&self, len: usize) -> Result<ByteReader<'a>> {
        self.require(len)?;
        Ok(ByteReader::new(&self.data[self.cursor..self.cursor + len]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_reads_advance_cursor() {
        let mut r = ByteReader::new(&[0x12, 0x34, 0x01, 0x00]);
        assert_eq!(r.u16_be().unwrap(), 0x1234);
        assert_eq!(r.u16_le().unwrap(), 0x0001);
        assert!(r.at_end());
    }

    #[test]
    fn truncated_read_errors() {
        let mut r = ByteReader::new(&[0x01]);
        assert!(matches!(
            r.u16_le(),
            Err(AgiError::TruncatedResource { wanted: 2, available: 1 })
        ));
    }

    #[test]
    fn seek_past_end_is_invalid_offset() {
        let mut r = ByteReader::new(&[0u8; 4]);
        assert!(matches!(r.seek(5), Err(AgiError::InvalidOffset { .. })));
        assert!(r.seek(4).is_ok());
    }

    #[test]
    fn sub_reader_is_independent() {
        let r = ByteReader::new(&[1, 2, 3, 4, 5]);
        let sub = r.sub(3).unwrap();
        assert_eq!(sub.bytes(), &[1, 2, 3]);
        assert_eq!(r.position(), 0);
    }
}
