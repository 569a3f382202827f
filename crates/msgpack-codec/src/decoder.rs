//! `Decoder` — reads MessagePack tokens from a [`ByteSource`].
//!
//! Every kind of the wire format has a decode path. The decoder reads
//! exactly one token's bytes at a time and keeps at most one control byte of
//! lookahead (for [`Decoder::peek_kind`]), so a decoder over an
//! [`IoSource`](msgpack_buffers::IoSource) leaves the stream positioned right
//! after the last value it returned.

use msgpack_buffers::ByteSource;
use tracing::debug;

use crate::config::DecoderConfig;
use crate::constants::*;
use crate::error::{Error, Result};
use crate::{Decodable, Kind, WireValue};

/// Streaming MessagePack decoder.
#[derive(Debug)]
pub struct Decoder<R> {
    source: R,
    config: DecoderConfig,
    peeked: Option<u8>,
    last_kind: Option<Kind>,
    depth: usize,
}

impl<R: ByteSource> Decoder<R> {
    pub fn new(source: R) -> Self {
        Self::with_config(source, DecoderConfig::default())
    }

    pub fn with_config(source: R, config: DecoderConfig) -> Self {
        Self {
            source,
            config,
            peeked: None,
            last_kind: None,
            depth: 0,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Returns the source. A control byte read by [`Decoder::peek_kind`]
    /// and not consumed yet is lost.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Kind of the most recently consumed token, i.e. the width metadata the
    /// value itself does not keep.
    pub fn last_kind(&self) -> Option<Kind> {
        self.last_kind
    }

    /// Decodes a new `T` starting from its default value.
    pub fn decode<T: Decodable + Default>(&mut self) -> Result<T> {
        let mut value = T::default();
        value.decode_into(self)?;
        Ok(value)
    }

    /// Decodes into an existing value. Records keep fields the input does
    /// not mention.
    pub fn decode_into<T: Decodable + ?Sized>(&mut self, dest: &mut T) -> Result<()> {
        dest.decode_into(self)
    }

    /// Classifies the next control byte without consuming it.
    pub fn peek_kind(&mut self) -> Result<Kind> {
        let byte = match self.peeked {
            Some(byte) => byte,
            None => {
                let byte = self.source.read_byte()?;
                self.peeked = Some(byte);
                byte
            }
        };
        Ok(Kind::classify(byte))
    }

    fn next_kind(&mut self) -> Result<Kind> {
        let byte = match self.peeked.take() {
            Some(byte) => byte,
            None => self.source.read_byte()?,
        };
        let kind = Kind::classify(byte);
        self.last_kind = Some(kind);
        Ok(kind)
    }

    /// Reads the next token.
    ///
    /// Scalars, strings and blobs are returned whole. Arrays and maps only
    /// return their declared count; the nested values are read by further
    /// calls.
    pub fn token(&mut self) -> Result<WireValue> {
        let kind = self.next_kind()?;
        self.read_payload(kind)
    }

    fn read_payload(&mut self, kind: Kind) -> Result<WireValue> {
        let value = match kind {
            Kind::Nil => WireValue::Nil,
            Kind::Bool(b) => WireValue::Bool(b),
            Kind::FixUint(v) => WireValue::Uint(v as u64),
            Kind::FixInt(v) => WireValue::Int(v as i64),
            Kind::Uint8 => WireValue::Uint(u8::from_be_bytes(self.array()?) as u64),
            Kind::Uint16 => WireValue::Uint(u16::from_be_bytes(self.array()?) as u64),
            Kind::Uint32 => WireValue::Uint(u32::from_be_bytes(self.array()?) as u64),
            Kind::Uint64 => WireValue::Uint(u64::from_be_bytes(self.array()?)),
            Kind::Int8 => WireValue::Int(i8::from_be_bytes(self.array()?) as i64),
            Kind::Int16 => WireValue::Int(i16::from_be_bytes(self.array()?) as i64),
            Kind::Int32 => WireValue::Int(i32::from_be_bytes(self.array()?) as i64),
            Kind::Int64 => WireValue::Int(i64::from_be_bytes(self.array()?)),
            Kind::Float32 => WireValue::Float32(f32::from_be_bytes(self.array()?)),
            Kind::Float64 => WireValue::Float64(f64::from_be_bytes(self.array()?)),
            Kind::FixStr(_) | Kind::Str8 | Kind::Str16 | Kind::Str32 => {
                let len = self.read_len(kind)?;
                WireValue::Str(self.read_utf8(len)?)
            }
            Kind::Bin8 | Kind::Bin16 | Kind::Bin32 => {
                let len = self.read_len(kind)?;
                WireValue::Bin(self.source.read_vec(len)?)
            }
            Kind::FixArray(_) | Kind::Array16 | Kind::Array32 => {
                WireValue::Array(self.read_len(kind)? as u32)
            }
            Kind::FixMap(_) | Kind::Map16 | Kind::Map32 => {
                WireValue::Map(self.read_len(kind)? as u32)
            }
            Kind::Extension(byte) => return Err(unsupported_extension(byte)),
            Kind::Unknown(byte) => {
                debug!(byte, "unknown control byte");
                return Err(Error::UnknownControlByte(byte));
            }
        };
        Ok(value)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.source.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads the (possibly embedded) length announced by a tiered kind.
    fn read_len(&mut self, kind: Kind) -> Result<usize> {
        let len = match kind {
            Kind::FixStr(n) | Kind::FixArray(n) | Kind::FixMap(n) => n as usize,
            Kind::Str8 | Kind::Bin8 => u8::from_be_bytes(self.array()?) as usize,
            Kind::Str16 | Kind::Bin16 | Kind::Array16 | Kind::Map16 => {
                u16::from_be_bytes(self.array()?) as usize
            }
            Kind::Str32 | Kind::Bin32 | Kind::Array32 | Kind::Map32 => {
                u32::from_be_bytes(self.array()?) as usize
            }
            other => return Err(Error::mismatch("length-prefixed value", other)),
        };
        Ok(len)
    }

    fn read_utf8(&mut self, len: usize) -> Result<String> {
        let bytes = self.source.read_vec(len)?;
        String::from_utf8(bytes).map_err(|e| Error::InvalidUtf8(e.utf8_error()))
    }

    /// Reads a token and fails with [`Error::TypeMismatch`] unless `accept`
    /// extracts a value from it.
    fn read_as<T>(
        &mut self,
        expected: &'static str,
        accept: impl FnOnce(WireValue) -> Option<T>,
    ) -> Result<T> {
        let kind = self.next_kind()?;
        let value = self.read_payload(kind)?;
        accept(value).ok_or(Error::mismatch(expected, kind))
    }

    pub fn read_nil(&mut self) -> Result<()> {
        self.read_as("nil", |v| matches!(v, WireValue::Nil).then_some(()))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_as("bool", |v| match v {
            WireValue::Bool(b) => Some(b),
            _ => None,
        })
    }

    /// Reads any integer width, widened.
    pub fn read_integer(&mut self, expected: &'static str) -> Result<i128> {
        self.read_as(expected, |v| v.as_i128())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_as("float32", |v| match v {
            WireValue::Float32(f) => Some(f),
            _ => None,
        })
    }

    /// Reads a float32 or float64.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_as("float", |v| match v {
            WireValue::Float32(f) => Some(f as f64),
            WireValue::Float64(f) => Some(f),
            _ => None,
        })
    }

    pub fn read_str(&mut self) -> Result<String> {
        self.read_as("string", |v| match v {
            WireValue::Str(s) => Some(s),
            _ => None,
        })
    }

    pub fn read_bin(&mut self) -> Result<Vec<u8>> {
        self.read_as("binary", |v| match v {
            WireValue::Bin(b) => Some(b),
            _ => None,
        })
    }

    /// Reads an array header and returns the element count.
    pub fn read_array_header(&mut self) -> Result<usize> {
        let kind = self.next_kind()?;
        if !kind.is_array() {
            return Err(self.reject_container("array", kind));
        }
        self.read_len(kind)
    }

    /// Reads a map header and returns the pair count.
    pub fn read_map_header(&mut self) -> Result<usize> {
        let kind = self.next_kind()?;
        if !kind.is_map() {
            return Err(self.reject_container("map", kind));
        }
        self.read_len(kind)
    }

    fn reject_container(&self, expected: &'static str, found: Kind) -> Error {
        match found {
            Kind::Unknown(byte) => Error::UnknownControlByte(byte),
            Kind::Extension(byte) => unsupported_extension(byte),
            _ => Error::mismatch(expected, found),
        }
    }

    /// Consumes one complete value, nested containers included, without
    /// materializing it. Extension values are skipped too.
    pub fn skip_value(&mut self) -> Result<()> {
        let kind = self.next_kind()?;
        if let Some(width) = kind.payload_width() {
            self.source.skip(width)?;
            return Ok(());
        }
        match kind {
            _ if kind.is_str() || kind.is_bin() => {
                let len = self.read_len(kind)?;
                self.source.skip(len)?;
            }
            Kind::FixArray(_) | Kind::Array16 | Kind::Array32 => {
                let len = self.read_len(kind)?;
                self.nested(|dec| (0..len).try_for_each(|_| dec.skip_value()))?;
            }
            Kind::FixMap(_) | Kind::Map16 | Kind::Map32 => {
                let len = self.read_len(kind)?;
                self.nested(|dec| {
                    (0..len).try_for_each(|_| {
                        dec.skip_value()?;
                        dec.skip_value()
                    })
                })?;
            }
            Kind::Extension(byte) => {
                let data_len = match byte {
                    EXT8 => u8::from_be_bytes(self.array()?) as usize,
                    EXT16 => u16::from_be_bytes(self.array()?) as usize,
                    EXT32 => u32::from_be_bytes(self.array()?) as usize,
                    // fixext1..fixext16 carry 1, 2, 4, 8 or 16 bytes.
                    _ => 1usize << (byte - FIXEXT1),
                };
                // One type byte precedes the data.
                self.source.skip(data_len + 1)?;
            }
            Kind::Unknown(byte) => {
                debug!(byte, "unknown control byte");
                return Err(Error::UnknownControlByte(byte));
            }
            _ => {}
        }
        Ok(())
    }

    /// Runs `f` one container level deeper, enforcing
    /// [`DecoderConfig::max_depth`].
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.config.max_depth {
            debug!(
                max_depth = self.config.max_depth,
                "nesting limit reached"
            );
            return Err(Error::DepthLimitExceeded(self.config.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Capacity to reserve for a declared element count.
    pub fn prealloc(&self, declared: usize) -> usize {
        declared.min(self.config.max_prealloc)
    }
}

fn unsupported_extension(byte: u8) -> Error {
    Error::UnsupportedType(format!("extension type (control byte 0x{byte:02x})"))
}
