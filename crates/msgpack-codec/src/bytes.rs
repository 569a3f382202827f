use std::ops::{Deref, DerefMut};

use msgpack_buffers::{ByteSink, ByteSource};

use crate::error::Result;
use crate::{Decodable, Decoder, Encodable, Encoder};

/// A binary blob, written with the bin family.
///
/// A bare `Vec<u8>` is a sequence of integers; wrap it in `Bytes` to get
/// `0xc4`/`0xc5`/`0xc6` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(bytes: Bytes) -> Self {
        bytes.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Encodable for Bytes {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_bin(&self.0)
    }

    fn is_empty_value(&self) -> bool {
        self.0.is_empty()
    }
}

impl Decodable for Bytes {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        self.0 = dec.read_bin()?;
        Ok(())
    }
}
