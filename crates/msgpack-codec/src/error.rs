use std::io;
use std::str::Utf8Error;

use thiserror::Error;

use crate::Kind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can abort an encode or decode call.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying stream failed, including running out of input.
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("unknown control byte 0x{0:02x}")]
    UnknownControlByte(u8),
    #[error("string payload is not valid utf-8: {0}")]
    InvalidUtf8(#[source] Utf8Error),
    #[error("container nesting exceeds the limit of {0}")]
    DepthLimitExceeded(usize),

    #[error("{what} length {len} exceeds the 32-bit tier limit")]
    LengthOverflow { what: &'static str, len: usize },
    #[error("value {value} does not fit a declared {bit_width}-bit integer")]
    IntegerWidth { value: i128, bit_width: u32 },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: Kind },
    #[error("integer {value} out of range for {target}")]
    IntegerOverflow { value: i128, target: &'static str },
    #[error("length mismatch: expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("invalid field tag {tag:?}: {reason}")]
    InvalidFieldTag { tag: String, reason: &'static str },
}

/// Coarse classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Format,
    Range,
    TypeMismatch,
    UnsupportedType,
    FieldTag,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Io(_) => ErrorCategory::Io,
            Error::UnknownControlByte(_) | Error::InvalidUtf8(_) | Error::DepthLimitExceeded(_) => {
                ErrorCategory::Format
            }
            Error::LengthOverflow { .. } | Error::IntegerWidth { .. } => ErrorCategory::Range,
            Error::TypeMismatch { .. }
            | Error::IntegerOverflow { .. }
            | Error::LengthMismatch { .. } => ErrorCategory::TypeMismatch,
            Error::UnsupportedType(_) => ErrorCategory::UnsupportedType,
            Error::InvalidFieldTag { .. } => ErrorCategory::FieldTag,
        }
    }

    /// True when the stream ended before a value was complete.
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }

    pub(crate) fn mismatch(expected: &'static str, found: Kind) -> Self {
        Error::TypeMismatch { expected, found }
    }
}
