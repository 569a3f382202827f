//! Streaming MessagePack codec.
//!
//! Values are written through an [`Encoder`] and read back through a
//! [`Decoder`]. What a Rust type looks like on the wire is decided by its
//! [`Encodable`] and [`Decodable`] implementations:
//!
//! | Rust | wire |
//! |---|---|
//! | `()`, `None` | nil |
//! | `bool` | bool |
//! | `i8..i64`, `isize`, `u8..u64`, `usize` | smallest integer family that holds the value |
//! | `f32` / `f64` | float32 / float64 |
//! | `str`, `String`, `char` | str |
//! | [`Bytes`] | bin |
//! | `[T]`, `[T; N]`, `Vec<T>`, `VecDeque<T>`, tuples | array |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | map |
//! | [`record!`] structs | map keyed by field name |
//! | [`Value`] | whatever it holds |
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! let map = BTreeMap::from([("test", 4u8), ("gogo", 4u8)]);
//! let bytes = msgpack_codec::to_vec(&map).unwrap();
//! assert_eq!(bytes[0], 0x82);
//!
//! let back: BTreeMap<String, u8> = msgpack_codec::from_slice(&bytes).unwrap();
//! assert_eq!(back["gogo"], 4);
//! ```

mod bytes;
pub mod config;
pub mod constants;
mod decode;
mod decoder;
mod encode;
mod encoder;
mod error;
mod kind;
mod record;
mod tag;
pub mod tier;
mod value;
mod wire;

use std::io;

pub use bytes::Bytes;
pub use config::DecoderConfig;
pub use decode::Decodable;
pub use decoder::Decoder;
pub use encode::Encodable;
pub use encoder::Encoder;
pub use error::{Error, ErrorCategory, Result};
pub use kind::Kind;
pub use msgpack_buffers::{ByteSink, ByteSource, IoSink, IoSource, Reader, Writer};
pub use record::{decode_named, decode_record, encode_record, FieldVisitor, Record};
pub use tag::{FieldTag, ResolvedField};
pub use value::Value;
pub use wire::WireValue;

use tracing::trace;

/// Encodes `value` into a new buffer.
pub fn to_vec<T: Encodable + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut enc = Encoder::new(Writer::new());
    enc.encode(value)?;
    let bytes = enc.into_inner().flush();
    trace!(len = bytes.len(), "encoded");
    Ok(bytes)
}

/// Encodes `value` into `writer`. The writer is not flushed.
pub fn to_writer<W: io::Write, T: Encodable + ?Sized>(writer: W, value: &T) -> Result<()> {
    let mut enc = Encoder::new(IoSink::new(writer));
    enc.encode(value)
}

/// Decodes one value from the start of `bytes`. Trailing bytes are ignored.
pub fn from_slice<T: Decodable + Default>(bytes: &[u8]) -> Result<T> {
    let mut value = T::default();
    from_slice_into(bytes, &mut value)?;
    Ok(value)
}

/// Decodes one value from the start of `bytes` into `dest`. Record fields
/// the input does not mention keep their current values.
pub fn from_slice_into<T: Decodable + ?Sized>(bytes: &[u8], dest: &mut T) -> Result<()> {
    let mut dec = Decoder::new(Reader::new(bytes));
    dec.decode_into(dest)?;
    let consumed = dec.get_ref().x;
    trace!(consumed, trailing = bytes.len() - consumed, "decoded");
    Ok(())
}

/// Decodes one value from `reader`, reading no further than its last byte.
pub fn from_reader<R: io::Read, T: Decodable + Default>(reader: R) -> Result<T> {
    let mut dec = Decoder::new(IoSource::new(reader));
    let value = dec.decode()?;
    trace!(kind = ?dec.last_kind(), "decoded from reader");
    Ok(value)
}
