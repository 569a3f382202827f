//! [`Encodable`] and its implementations for scalars, sequences, mappings,
//! optionals and smart pointers.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use msgpack_buffers::ByteSink;

use crate::error::Result;
use crate::Encoder;

/// A value that knows how to write itself as MessagePack.
pub trait Encodable {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()>;

    /// Whether the value counts as empty for `omitempty` record fields.
    fn is_empty_value(&self) -> bool {
        false
    }
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {
        $(
            impl Encodable for $ty {
                #[inline]
                fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
                    enc.encode_signed(*self as i64, <$ty>::BITS)
                }

                fn is_empty_value(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Encodable for $ty {
                #[inline]
                fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
                    enc.encode_unsigned(*self as u64, <$ty>::BITS)
                }

                fn is_empty_value(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl Encodable for bool {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_bool(*self)
    }

    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl Encodable for f32 {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_f32(*self)
    }

    fn is_empty_value(&self) -> bool {
        self.to_bits() == 0
    }
}

impl Encodable for f64 {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_f64(*self)
    }

    fn is_empty_value(&self) -> bool {
        self.to_bits() == 0
    }
}

impl Encodable for str {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_str(self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Encodable for String {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_str(self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

/// Written as a one-character string.
impl Encodable for char {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        let mut buf = [0u8; 4];
        enc.encode_str(self.encode_utf8(&mut buf))
    }

    fn is_empty_value(&self) -> bool {
        *self == '\0'
    }
}

/// `()` is nil.
impl Encodable for () {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_nil()
    }

    fn is_empty_value(&self) -> bool {
        true
    }
}

fn encode_seq<'a, W, T, I>(enc: &mut Encoder<W>, len: usize, items: I) -> Result<()>
where
    W: ByteSink,
    T: Encodable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    enc.encode_array_header(len)?;
    items.into_iter().try_for_each(|item| item.encode(enc))
}

impl<T: Encodable> Encodable for [T] {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        encode_seq(enc, self.len(), self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Encodable, const N: usize> Encodable for [T; N] {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        encode_seq(enc, N, self)
    }

    fn is_empty_value(&self) -> bool {
        N == 0
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        encode_seq(enc, self.len(), self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Encodable> Encodable for VecDeque<T> {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        encode_seq(enc, self.len(), self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! impl_tuple {
    ($($len:literal => ($($idx:tt $name:ident)+))+) => {
        $(
            impl<$($name: Encodable),+> Encodable for ($($name,)+) {
                fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
                    enc.encode_array_header($len)?;
                    $(self.$idx.encode(enc)?;)+
                    Ok(())
                }
            }
        )+
    };
}

impl_tuple! {
    1 => (0 A)
    2 => (0 A 1 B)
    3 => (0 A 1 B 2 C)
    4 => (0 A 1 B 2 C 3 D)
    5 => (0 A 1 B 2 C 3 D 4 E)
    6 => (0 A 1 B 2 C 3 D 4 E 5 F)
}

fn encode_pairs<'a, W, K, V, I>(enc: &mut Encoder<W>, len: usize, pairs: I) -> Result<()>
where
    W: ByteSink,
    K: Encodable + 'a,
    V: Encodable + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    enc.encode_map_header(len)?;
    pairs.into_iter().try_for_each(|(key, value)| {
        key.encode(enc)?;
        value.encode(enc)
    })
}

/// Pairs are written in iteration order, which is unspecified.
impl<K: Encodable, V: Encodable, S: BuildHasher> Encodable for HashMap<K, V, S> {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        encode_pairs(enc, self.len(), self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K: Encodable, V: Encodable> Encodable for BTreeMap<K, V> {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        encode_pairs(enc, self.len(), self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            Some(value) => value.encode(enc),
            None => enc.encode_nil(),
        }
    }

    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

macro_rules! impl_deref {
    ($($ty:ty),*) => {
        $(
            impl<T: Encodable + ?Sized> Encodable for $ty {
                #[inline]
                fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
                    (**self).encode(enc)
                }

                fn is_empty_value(&self) -> bool {
                    (**self).is_empty_value()
                }
            }
        )*
    };
}

impl_deref!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);
