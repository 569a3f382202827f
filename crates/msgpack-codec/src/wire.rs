//! [`WireValue`] — one decoded token.

/// The decoded content of a single token.
///
/// Integers are widened to 64 bits; the width they were encoded with is
/// reported separately by [`Decoder::last_kind`](crate::Decoder::last_kind).
/// Array and map tokens only open the container: the caller must consume
/// the announced number of values (arrays) or key/value pairs (maps).
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Nil,
    Bool(bool),
    /// Signed families, including the negative fixnum.
    Int(i64),
    /// Unsigned families, including the positive fixnum.
    Uint(u64),
    Float32(f32),
    Float64(f64),
    Str(String),
    Bin(Vec<u8>),
    /// Opens an array of this many elements.
    Array(u32),
    /// Opens a map of this many key/value pairs.
    Map(u32),
}

impl WireValue {
    /// The integer carried by an `Int` or `Uint` token.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            WireValue::Int(v) => Some(v as i128),
            WireValue::Uint(v) => Some(v as i128),
            _ => None,
        }
    }

    /// Element or pair count of a container-open token.
    pub fn container_len(&self) -> Option<usize> {
        match *self {
            WireValue::Array(n) | WireValue::Map(n) => Some(n as usize),
            _ => None,
        }
    }
}
