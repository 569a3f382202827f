//! Binary slice reader with cursor tracking.

use std::io;

use crate::ByteSource;

/// A bounds-checked reader over a byte slice.
///
/// Reads past the end fail with [`io::ErrorKind::UnexpectedEof`] and leave
/// the cursor where it was.
///
/// # Example
///
/// ```
/// use msgpack_buffers::{ByteSource, Reader};
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.read_byte().unwrap(), 0x01);
/// assert_eq!(reader.buf(2).unwrap(), &[0x02, 0x03]);
/// assert!(reader.read_byte().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Resets the reader with a new byte slice.
    pub fn reset(&mut self, uint8: &'a [u8]) {
        self.x = 0;
        self.uint8 = uint8;
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    /// Bytes not consumed yet.
    pub fn rest(&self) -> &'a [u8] {
        &self.uint8[self.x..]
    }

    #[inline]
    fn check(&self, n: usize) -> io::Result<()> {
        if n > self.size() {
            Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "needed {n} bytes at offset {}, {} available",
                    self.x,
                    self.size()
                ),
            ))
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> io::Result<u8> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Returns a subslice of `size` bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> io::Result<&'a [u8]> {
        self.check(size)?;
        let x = self.x;
        let end = x + size;
        self.x = end;
        Ok(&self.uint8[x..end])
    }
}

impl ByteSource for Reader<'_> {
    #[inline]
    fn read_byte(&mut self) -> io::Result<u8> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let src = self.buf(buf.len())?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn read_vec(&mut self, len: usize) -> io::Result<Vec<u8>> {
        self.buf(len).map(<[u8]>::to_vec)
    }

    fn skip(&mut self, len: usize) -> io::Result<()> {
        self.check(len)?;
        self.x += len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_byte_sequence() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.read_byte().unwrap(), 0x01);
        assert_eq!(reader.read_byte().unwrap(), 0x02);
        assert_eq!(reader.size(), 1);
    }

    #[test]
    fn test_read_exact_be_u32() {
        let data = [0x00, 0x10, 0x00, 0x00];
        let mut reader = Reader::new(&data);
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(u32::from_be_bytes(buf), 0x0010_0000);
    }

    #[test]
    fn test_short_read_keeps_cursor() {
        let data = [0xd9, 0x0a, b'a', b'b', b'c'];
        let mut reader = Reader::new(&data);
        reader.skip(2).unwrap();
        let err = reader.read_vec(10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(reader.x, 2);
        assert_eq!(reader.rest(), b"abc");
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0xc0];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.peek().unwrap(), 0xc0);
        assert_eq!(reader.read_byte().unwrap(), 0xc0);
        assert!(reader.peek().is_err());
    }

    #[test]
    fn test_reset() {
        let mut reader = Reader::new(&[1, 2]);
        reader.skip(2).unwrap();
        reader.reset(&[7]);
        assert_eq!(reader.read_byte().unwrap(), 7);
    }
}
