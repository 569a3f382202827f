//! `Encoder` — writes MessagePack tokens to a [`ByteSink`].
//!
//! The primitive writers pick the most compact representation the format
//! allows: fixnums for `-32..=127`, otherwise the smallest integer width
//! holding the value, and the smallest length tier for strings, blobs and
//! container headers. All multi-byte payloads are big-endian.

use msgpack_buffers::ByteSink;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::tier::{TierTable, ARRAY_TIERS, BIN_TIERS, MAP_TIERS, STR_TIERS};
use crate::Encodable;

/// Streaming MessagePack encoder.
///
/// Owns its sink for as long as it lives; composite values are written by
/// [`Encodable`] implementations calling back into the primitive writers.
#[derive(Debug)]
pub struct Encoder<W> {
    sink: W,
}

impl<W: ByteSink> Encoder<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Encodes any [`Encodable`] value.
    pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }

    pub fn encode_nil(&mut self) -> Result<()> {
        self.sink.write_byte(NIL)?;
        Ok(())
    }

    pub fn encode_bool(&mut self, value: bool) -> Result<()> {
        self.sink.write_byte(if value { TRUE } else { FALSE })?;
        Ok(())
    }

    /// Encodes a signed integer.
    ///
    /// `bit_width` is the declared width of the source type (8, 16, 32 or
    /// 64). It does not influence the chosen envelope; a value that does not
    /// fit it is rejected.
    pub fn encode_signed(&mut self, value: i64, bit_width: u32) -> Result<()> {
        check_declared_width(value as i128, bit_width, true)?;
        if (FIXINT_MIN..=FIXNUM_MAX).contains(&value) {
            // Two's complement truncation yields 0xe0..=0xff for -32..=-1.
            self.sink.write_byte(value as u8)?;
            return Ok(());
        }
        if let Ok(v) = i8::try_from(value) {
            self.write_marked(INT8, &v.to_be_bytes())
        } else if let Ok(v) = i16::try_from(value) {
            self.write_marked(INT16, &v.to_be_bytes())
        } else if let Ok(v) = i32::try_from(value) {
            self.write_marked(INT32, &v.to_be_bytes())
        } else {
            self.write_marked(INT64, &value.to_be_bytes())
        }
    }

    /// Encodes an unsigned integer. See [`Encoder::encode_signed`] for the
    /// meaning of `bit_width`.
    pub fn encode_unsigned(&mut self, value: u64, bit_width: u32) -> Result<()> {
        check_declared_width(value as i128, bit_width, false)?;
        if value <= FIXNUM_MAX as u64 {
            self.sink.write_byte(value as u8)?;
            return Ok(());
        }
        if let Ok(v) = u8::try_from(value) {
            self.write_marked(UINT8, &v.to_be_bytes())
        } else if let Ok(v) = u16::try_from(value) {
            self.write_marked(UINT16, &v.to_be_bytes())
        } else if let Ok(v) = u32::try_from(value) {
            self.write_marked(UINT32, &v.to_be_bytes())
        } else {
            self.write_marked(UINT64, &value.to_be_bytes())
        }
    }

    pub fn encode_f32(&mut self, value: f32) -> Result<()> {
        self.write_marked(FLOAT32, &value.to_be_bytes())
    }

    pub fn encode_f64(&mut self, value: f64) -> Result<()> {
        self.write_marked(FLOAT64, &value.to_be_bytes())
    }

    pub fn encode_str(&mut self, value: &str) -> Result<()> {
        self.write_header(&STR_TIERS, value.len())?;
        self.sink.write_all(value.as_bytes())?;
        Ok(())
    }

    pub fn encode_bin(&mut self, value: &[u8]) -> Result<()> {
        self.write_header(&BIN_TIERS, value.len())?;
        self.sink.write_all(value)?;
        Ok(())
    }

    /// Announces an array of `len` elements; the caller writes them next.
    pub fn encode_array_header(&mut self, len: usize) -> Result<()> {
        self.write_header(&ARRAY_TIERS, len)
    }

    /// Announces a map of `len` pairs; the caller writes key, value, key, ...
    pub fn encode_map_header(&mut self, len: usize) -> Result<()> {
        self.write_header(&MAP_TIERS, len)
    }

    fn write_header(&mut self, table: &TierTable, len: usize) -> Result<()> {
        let header = table.header(len)?;
        self.sink.write_all(header.as_bytes())?;
        Ok(())
    }

    /// Writes a control byte and its payload (at most 8 bytes) in one call.
    fn write_marked(&mut self, marker: u8, payload: &[u8]) -> Result<()> {
        let mut buf = [0u8; 9];
        buf[0] = marker;
        buf[1..=payload.len()].copy_from_slice(payload);
        self.sink.write_all(&buf[..=payload.len()])?;
        Ok(())
    }
}

fn check_declared_width(value: i128, bit_width: u32, signed: bool) -> Result<()> {
    let range = match bit_width {
        8 | 16 | 32 | 64 if signed => {
            let half = 1i128 << (bit_width - 1);
            Some((-half, half - 1))
        }
        8 | 16 | 32 | 64 => Some((0, (1i128 << bit_width) - 1)),
        _ => None,
    };
    match range {
        Some((min, max)) if (min..=max).contains(&value) => Ok(()),
        _ => Err(Error::IntegerWidth { value, bit_width }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(f: impl FnOnce(&mut Encoder<Vec<u8>>) -> Result<()>) -> Vec<u8> {
        let mut encoder = Encoder::new(Vec::new());
        f(&mut encoder).unwrap();
        encoder.into_inner()
    }

    #[test]
    fn signed_fixnum_boundaries() {
        assert_eq!(encoded(|e| e.encode_signed(-33, 64)), [0xd0, 0xdf]);
        assert_eq!(encoded(|e| e.encode_signed(-32, 64)), [0xe0]);
        assert_eq!(encoded(|e| e.encode_signed(-1, 8)), [0xff]);
        assert_eq!(encoded(|e| e.encode_signed(0, 8)), [0x00]);
        assert_eq!(encoded(|e| e.encode_signed(127, 8)), [0x7f]);
        assert_eq!(encoded(|e| e.encode_signed(128, 16)), [0xd1, 0x00, 0x80]);
    }

    #[test]
    fn signed_width_selection() {
        assert_eq!(encoded(|e| e.encode_signed(-128, 8)), [0xd0, 0x80]);
        assert_eq!(encoded(|e| e.encode_signed(-129, 16)), [0xd1, 0xff, 0x7f]);
        assert_eq!(encoded(|e| e.encode_signed(16500, 16)), [0xd1, 0x40, 0x74]);
        assert_eq!(
            encoded(|e| e.encode_signed(1 << 20, 32)),
            [0xd2, 0x00, 0x10, 0x00, 0x00]
        );
        assert_eq!(
            encoded(|e| e.encode_signed(i64::MIN, 64)),
            [0xd3, 0x80, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn unsigned_width_selection() {
        assert_eq!(encoded(|e| e.encode_unsigned(127, 8)), [0x7f]);
        assert_eq!(encoded(|e| e.encode_unsigned(128, 8)), [0xcc, 0x80]);
        assert_eq!(encoded(|e| e.encode_unsigned(255, 64)), [0xcc, 0xff]);
        assert_eq!(encoded(|e| e.encode_unsigned(256, 16)), [0xcd, 0x01, 0x00]);
        assert_eq!(
            encoded(|e| e.encode_unsigned(u64::MAX, 64)),
            [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn declared_width_is_checked() {
        let mut encoder = Encoder::new(Vec::new());
        assert!(matches!(
            encoder.encode_signed(300, 8),
            Err(Error::IntegerWidth { value: 300, bit_width: 8 })
        ));
        assert!(matches!(
            encoder.encode_unsigned(1, 12),
            Err(Error::IntegerWidth { bit_width: 12, .. })
        ));
        assert!(encoder.into_inner().is_empty());
    }

    #[test]
    fn floats_use_distinct_markers() {
        assert_eq!(
            encoded(|e| e.encode_f32(1.5)),
            [0xca, 0x3f, 0xc0, 0x00, 0x00]
        );
        assert_eq!(
            encoded(|e| e.encode_f64(1.5)),
            [0xcb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn fixed_shape_scalars() {
        assert_eq!(encoded(|e| e.encode_nil()), [0xc0]);
        assert_eq!(encoded(|e| e.encode_bool(false)), [0xc2]);
        assert_eq!(encoded(|e| e.encode_bool(true)), [0xc3]);
    }

    #[test]
    fn headers() {
        assert_eq!(encoded(|e| e.encode_array_header(0)), [0x90]);
        assert_eq!(encoded(|e| e.encode_map_header(1)), [0x81]);
        assert_eq!(encoded(|e| e.encode_str("foo")), [0xa3, b'f', b'o', b'o']);
        assert_eq!(encoded(|e| e.encode_bin(&[])), [0xc4, 0x00]);
    }
}
