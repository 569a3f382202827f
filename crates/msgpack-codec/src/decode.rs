//! [`Decodable`] and its implementations.
//!
//! Decoding is destination driven: the target type decides which kinds it
//! accepts. Integers of any width land in any integer target whose range
//! holds the value; `f64` also accepts float32; containers must be the
//! matching container kind and exactly the declared count is consumed.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};

use msgpack_buffers::ByteSource;

use crate::error::{Error, Result};
use crate::{Decoder, Kind};

/// A value that can be overwritten from MessagePack input.
pub trait Decodable {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()>;
}

macro_rules! impl_integer {
    ($($ty:ident),*) => {
        $(
            impl Decodable for $ty {
                fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
                    let value = dec.read_integer(stringify!($ty))?;
                    *self = $ty::try_from(value).map_err(|_| Error::IntegerOverflow {
                        value,
                        target: stringify!($ty),
                    })?;
                    Ok(())
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Decodable for bool {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = dec.read_bool()?;
        Ok(())
    }
}

impl Decodable for f32 {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = dec.read_f32()?;
        Ok(())
    }
}

impl Decodable for f64 {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = dec.read_f64()?;
        Ok(())
    }
}

impl Decodable for String {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = dec.read_str()?;
        Ok(())
    }
}

impl Decodable for char {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let s = dec.read_str()?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                *self = c;
                Ok(())
            }
            _ => Err(Error::LengthMismatch {
                expected: 1,
                found: s.chars().count(),
            }),
        }
    }
}

impl Decodable for () {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        dec.read_nil()
    }
}

impl<T: Decodable + Default> Decodable for Vec<T> {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let len = dec.read_array_header()?;
        dec.nested(|dec| {
            self.clear();
            self.reserve(dec.prealloc(len));
            for _ in 0..len {
                self.push(dec.decode()?);
            }
            Ok(())
        })
    }
}

impl<T: Decodable + Default> Decodable for VecDeque<T> {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let len = dec.read_array_header()?;
        dec.nested(|dec| {
            self.clear();
            self.reserve(dec.prealloc(len));
            for _ in 0..len {
                self.push_back(dec.decode()?);
            }
            Ok(())
        })
    }
}

/// The declared count must equal `N`. Elements are decoded in place.
impl<T: Decodable, const N: usize> Decodable for [T; N] {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let len = dec.read_array_header()?;
        if len != N {
            return Err(Error::LengthMismatch {
                expected: N,
                found: len,
            });
        }
        dec.nested(|dec| self.iter_mut().try_for_each(|slot| slot.decode_into(dec)))
    }
}

macro_rules! impl_tuple {
    ($($len:literal => ($($idx:tt $name:ident)+))+) => {
        $(
            impl<$($name: Decodable),+> Decodable for ($($name,)+) {
                fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
                    let len = dec.read_array_header()?;
                    if len != $len {
                        return Err(Error::LengthMismatch { expected: $len, found: len });
                    }
                    dec.nested(|dec| {
                        $(self.$idx.decode_into(dec)?;)+
                        Ok(())
                    })
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

/// Replaces the map contents with the decoded pairs. A repeated key keeps
/// the last value.
impl<K, V, S> Decodable for HashMap<K, V, S>
where
    K: Decodable + Default + Eq + Hash,
    V: Decodable + Default,
    S: BuildHasher,
{
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let len = dec.read_map_header()?;
        dec.nested(|dec| {
            self.clear();
            self.reserve(dec.prealloc(len));
            for _ in 0..len {
                let key: K = dec.decode()?;
                let value: V = dec.decode()?;
                self.insert(key, value);
            }
            Ok(())
        })
    }
}

impl<K, V> Decodable for BTreeMap<K, V>
where
    K: Decodable + Default + Ord,
    V: Decodable + Default,
{
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let len = dec.read_map_header()?;
        dec.nested(|dec| {
            self.clear();
            for _ in 0..len {
                let key: K = dec.decode()?;
                let value: V = dec.decode()?;
                self.insert(key, value);
            }
            Ok(())
        })
    }
}

/// Nil yields `None`; anything else decodes into the (possibly new) inner
/// value.
impl<T: Decodable + Default> Decodable for Option<T> {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        if dec.peek_kind()? == Kind::Nil {
            dec.read_nil()?;
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).decode_into(dec)
    }
}

impl<T: Decodable + ?Sized> Decodable for Box<T> {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        (**self).decode_into(dec)
    }
}
