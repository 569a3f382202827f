//! Byte-stream capabilities consumed by the MessagePack codec.
//!
//! The codec never touches files, sockets or buffers directly. It reads
//! through a [`ByteSource`] and writes through a [`ByteSink`]; this crate
//! defines both traits and ships the implementations the codec and its
//! callers need:
//!
//! - [`Reader`]: zero-copy, bounds-checked cursor over a byte slice.
//! - [`Writer`]: growable in-memory output buffer.
//! - [`IoSource`] / [`IoSink`]: adapters over any [`std::io::Read`] /
//!   [`std::io::Write`].
//! - `Vec<u8>` is a sink on its own.

mod reader;
mod sink;
mod source;
mod writer;

pub use reader::Reader;
pub use sink::{ByteSink, IoSink};
pub use source::{ByteSource, IoSource, READ_CHUNK_SIZE};
pub use writer::Writer;
