//! Control-byte registry: classifies every byte value into a [`Kind`].
//!
//! Classification is pure and total. Each of the 256 byte values maps to
//! exactly one `Kind`, and [`Kind::control_byte`] is its exact inverse, so
//! the embedded-value families carry the bits they pack (fixnum value,
//! fixstr/fixarray/fixmap length).

use std::fmt;

use crate::constants::*;

/// Semantic classification of a MessagePack control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool(bool),
    /// Positive fixnum, `0x00..=0x7f`; the value is the byte itself.
    FixUint(u8),
    /// Negative fixnum, `0xe0..=0xff`; the value is in `-32..=-1`.
    FixInt(i8),
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// String whose byte length (`0..=31`) is embedded in the control byte.
    FixStr(u8),
    Str8,
    Str16,
    Str32,
    Bin8,
    Bin16,
    Bin32,
    /// Array whose element count (`0..=15`) is embedded in the control byte.
    FixArray(u8),
    Array16,
    Array32,
    /// Map whose pair count (`0..=15`) is embedded in the control byte.
    FixMap(u8),
    Map16,
    Map32,
    /// Extension family (`fixext*`, `ext8/16/32`); carries the raw byte.
    Extension(u8),
    /// Byte not assigned by the format (`0xc1`).
    Unknown(u8),
}

impl Kind {
    /// Classifies a control byte.
    pub const fn classify(byte: u8) -> Kind {
        match byte {
            0x00..=FIXUINT_MAX => Kind::FixUint(byte),
            0x80..=0x8f => Kind::FixMap(byte & FIXMAP_MASK),
            0x90..=0x9f => Kind::FixArray(byte & FIXARRAY_MASK),
            0xa0..=0xbf => Kind::FixStr(byte & FIXSTR_MASK),
            NIL => Kind::Nil,
            FALSE => Kind::Bool(false),
            TRUE => Kind::Bool(true),
            BIN8 => Kind::Bin8,
            BIN16 => Kind::Bin16,
            BIN32 => Kind::Bin32,
            EXT8..=EXT32 | FIXEXT1..=FIXEXT16 => Kind::Extension(byte),
            FLOAT32 => Kind::Float32,
            FLOAT64 => Kind::Float64,
            UINT8 => Kind::Uint8,
            UINT16 => Kind::Uint16,
            UINT32 => Kind::Uint32,
            UINT64 => Kind::Uint64,
            INT8 => Kind::Int8,
            INT16 => Kind::Int16,
            INT32 => Kind::Int32,
            INT64 => Kind::Int64,
            STR8 => Kind::Str8,
            STR16 => Kind::Str16,
            STR32 => Kind::Str32,
            ARRAY16 => Kind::Array16,
            ARRAY32 => Kind::Array32,
            MAP16 => Kind::Map16,
            MAP32 => Kind::Map32,
            FIXINT..=0xff => Kind::FixInt(byte as i8),
            // Only NEVER_USED is left.
            _ => Kind::Unknown(byte),
        }
    }

    /// The control byte this kind was classified from.
    pub const fn control_byte(self) -> u8 {
        match self {
            Kind::Nil => NIL,
            Kind::Bool(false) => FALSE,
            Kind::Bool(true) => TRUE,
            Kind::FixUint(v) => v & FIXUINT_MAX,
            Kind::FixInt(v) => FIXINT | (v as u8 & 0x1f),
            Kind::Uint8 => UINT8,
            Kind::Uint16 => UINT16,
            Kind::Uint32 => UINT32,
            Kind::Uint64 => UINT64,
            Kind::Int8 => INT8,
            Kind::Int16 => INT16,
            Kind::Int32 => INT32,
            Kind::Int64 => INT64,
            Kind::Float32 => FLOAT32,
            Kind::Float64 => FLOAT64,
            Kind::FixStr(len) => FIXSTR | (len & FIXSTR_MASK),
            Kind::Str8 => STR8,
            Kind::Str16 => STR16,
            Kind::Str32 => STR32,
            Kind::Bin8 => BIN8,
            Kind::Bin16 => BIN16,
            Kind::Bin32 => BIN32,
            Kind::FixArray(len) => FIXARRAY | (len & FIXARRAY_MASK),
            Kind::Array16 => ARRAY16,
            Kind::Array32 => ARRAY32,
            Kind::FixMap(len) => FIXMAP | (len & FIXMAP_MASK),
            Kind::Map16 => MAP16,
            Kind::Map32 => MAP32,
            Kind::Extension(byte) | Kind::Unknown(byte) => byte,
        }
    }

    /// Size of the fixed payload following the control byte, for scalar
    /// kinds. `None` for length-prefixed and unsupported kinds.
    pub const fn payload_width(self) -> Option<usize> {
        match self {
            Kind::Nil | Kind::Bool(_) | Kind::FixUint(_) | Kind::FixInt(_) => Some(0),
            Kind::Uint8 | Kind::Int8 => Some(1),
            Kind::Uint16 | Kind::Int16 => Some(2),
            Kind::Uint32 | Kind::Int32 | Kind::Float32 => Some(4),
            Kind::Uint64 | Kind::Int64 | Kind::Float64 => Some(8),
            _ => None,
        }
    }

    /// Width of the big-endian length prefix for string, binary, array and
    /// map kinds. Embedded-length kinds report `Some(0)`.
    pub const fn length_width(self) -> Option<usize> {
        match self {
            Kind::FixStr(_) | Kind::FixArray(_) | Kind::FixMap(_) => Some(0),
            Kind::Str8 | Kind::Bin8 => Some(1),
            Kind::Str16 | Kind::Bin16 | Kind::Array16 | Kind::Map16 => Some(2),
            Kind::Str32 | Kind::Bin32 | Kind::Array32 | Kind::Map32 => Some(4),
            _ => None,
        }
    }

    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Kind::FixUint(_)
                | Kind::FixInt(_)
                | Kind::Uint8
                | Kind::Uint16
                | Kind::Uint32
                | Kind::Uint64
                | Kind::Int8
                | Kind::Int16
                | Kind::Int32
                | Kind::Int64
        )
    }

    pub const fn is_str(self) -> bool {
        matches!(self, Kind::FixStr(_) | Kind::Str8 | Kind::Str16 | Kind::Str32)
    }

    pub const fn is_bin(self) -> bool {
        matches!(self, Kind::Bin8 | Kind::Bin16 | Kind::Bin32)
    }

    pub const fn is_array(self) -> bool {
        matches!(self, Kind::FixArray(_) | Kind::Array16 | Kind::Array32)
    }

    pub const fn is_map(self) -> bool {
        matches!(self, Kind::FixMap(_) | Kind::Map16 | Kind::Map32)
    }

    /// Human-readable family name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Bool(_) => "bool",
            Kind::FixUint(_) => "positive fixnum",
            Kind::FixInt(_) => "negative fixnum",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::FixStr(_) => "fixstr",
            Kind::Str8 => "str8",
            Kind::Str16 => "str16",
            Kind::Str32 => "str32",
            Kind::Bin8 => "bin8",
            Kind::Bin16 => "bin16",
            Kind::Bin32 => "bin32",
            Kind::FixArray(_) => "fixarray",
            Kind::Array16 => "array16",
            Kind::Array32 => "array32",
            Kind::FixMap(_) => "fixmap",
            Kind::Map16 => "map16",
            Kind::Map32 => "map32",
            Kind::Extension(_) => "extension",
            Kind::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.control_byte())
    }
}
