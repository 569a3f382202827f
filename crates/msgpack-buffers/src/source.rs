//! [`ByteSource`] — the read side of the byte-stream capability.

use std::io;

/// Largest block read at once by [`ByteSource::read_vec`].
///
/// A declared payload length is only trusted as far as the stream actually
/// delivers bytes, so buffers grow chunk by chunk rather than being
/// allocated up front.
pub const READ_CHUNK_SIZE: usize = 8 * 1024;

/// A blocking source of bytes.
///
/// Implementations must fail with [`io::ErrorKind::UnexpectedEof`] when
/// fewer bytes remain than requested; a short read is never reported as
/// success.
pub trait ByteSource {
    /// Reads exactly one byte.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Fills `buf` completely.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Reads exactly `len` bytes into a new vector.
    fn read_vec(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(len.min(READ_CHUNK_SIZE));
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(READ_CHUNK_SIZE);
            self.read_exact(&mut chunk[..n])?;
            out.extend_from_slice(&chunk[..n]);
            remaining -= n;
        }
        Ok(out)
    }

    /// Discards exactly `len` bytes.
    fn skip(&mut self, len: usize) -> io::Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(READ_CHUNK_SIZE);
            self.read_exact(&mut chunk[..n])?;
            remaining -= n;
        }
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn read_byte(&mut self) -> io::Result<u8> {
        (**self).read_byte()
    }

    #[inline]
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_exact(buf)
    }

    fn read_vec(&mut self, len: usize) -> io::Result<Vec<u8>> {
        (**self).read_vec(len)
    }

    fn skip(&mut self, len: usize) -> io::Result<()> {
        (**self).skip(len)
    }
}

/// Adapts any [`io::Read`] into a [`ByteSource`].
///
/// No read-ahead is performed: each call reads exactly the bytes asked for,
/// so the wrapped reader is left positioned right after the last decoded
/// value. Wrap the reader in [`io::BufReader`] first when the underlying
/// stream is expensive to call.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: io::Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> ByteSource for IoSource<R> {
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.inner.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most one byte per `read` call.
    struct Trickle<'a>(&'a [u8]);

    impl io::Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn io_source_reads_across_short_reads() {
        let mut source = IoSource::new(Trickle(&[1, 2, 3, 4, 5]));
        assert_eq!(source.read_byte().unwrap(), 1);
        let mut buf = [0u8; 3];
        source.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [2, 3, 4]);
        assert_eq!(source.read_vec(1).unwrap(), vec![5]);
    }

    #[test]
    fn io_source_reports_eof_on_truncated_input() {
        let mut source = IoSource::new(Trickle(&[1, 2, 3]));
        let err = source.read_vec(10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn read_vec_spans_multiple_chunks() {
        let data: Vec<u8> = (0..READ_CHUNK_SIZE * 2 + 17).map(|i| i as u8).collect();
        let mut source = IoSource::new(&data[..]);
        let out = source.read_vec(data.len()).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn skip_consumes_exact_length() {
        let mut source = IoSource::new(&[9u8, 8, 7, 6][..]);
        source.skip(3).unwrap();
        assert_eq!(source.read_byte().unwrap(), 6);
        assert_eq!(
            source.skip(1).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}
