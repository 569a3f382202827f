//! Records: fixed-shape values with named fields, written as maps.
//!
//! Implement [`Record`] by hand, or declare the struct through the
//! [`record!`](crate::record!) macro which also derives [`Encodable`] and
//! [`Decodable`].

use msgpack_buffers::{ByteSink, ByteSource};
use tracing::debug;

use crate::error::Result;
use crate::{Decodable, Decoder, Encodable, Encoder, FieldTag};

/// A value whose fields are visited by name, in declaration order.
pub trait Record {
    /// Calls [`FieldVisitor::field`] once per field.
    fn visit_fields<V: FieldVisitor>(&self, visitor: &mut V) -> Result<()>;

    /// Decodes the value for wire key `key` into the matching field.
    /// Returns `false`, without consuming anything, when no field matches.
    fn decode_field<R: ByteSource>(&mut self, key: &str, dec: &mut Decoder<R>) -> Result<bool>;
}

pub trait FieldVisitor {
    /// `tag` is the raw `name[,omitempty]` tag of the field, if any.
    fn field<T: Encodable + ?Sized>(
        &mut self,
        declared: &str,
        tag: Option<&str>,
        value: &T,
    ) -> Result<()>;
}

/// Counts the fields that survive `omitempty`.
struct CountFields(usize);

impl FieldVisitor for CountFields {
    fn field<T: Encodable + ?Sized>(
        &mut self,
        declared: &str,
        tag: Option<&str>,
        value: &T,
    ) -> Result<()> {
        let field = FieldTag::resolve(declared, tag)?;
        if !(field.omit_if_empty && value.is_empty_value()) {
            self.0 += 1;
        }
        Ok(())
    }
}

struct WriteFields<'a, W> {
    enc: &'a mut Encoder<W>,
}

impl<W: ByteSink> FieldVisitor for WriteFields<'_, W> {
    fn field<T: Encodable + ?Sized>(
        &mut self,
        declared: &str,
        tag: Option<&str>,
        value: &T,
    ) -> Result<()> {
        let field = FieldTag::resolve(declared, tag)?;
        if field.omit_if_empty && value.is_empty_value() {
            return Ok(());
        }
        self.enc.encode_str(field.name)?;
        value.encode(self.enc)
    }
}

/// Writes `record` as a map of its non-omitted fields.
pub fn encode_record<T, W>(record: &T, enc: &mut Encoder<W>) -> Result<()>
where
    T: Record + ?Sized,
    W: ByteSink,
{
    let mut count = CountFields(0);
    record.visit_fields(&mut count)?;
    enc.encode_map_header(count.0)?;
    record.visit_fields(&mut WriteFields { enc })
}

/// Reads a map into `record`. Keys without a matching field, and keys that
/// are not strings, are skipped together with their values.
pub fn decode_record<T, R>(record: &mut T, dec: &mut Decoder<R>) -> Result<()>
where
    T: Record + ?Sized,
    R: ByteSource,
{
    let len = dec.read_map_header()?;
    dec.nested(|dec| {
        for _ in 0..len {
            let kind = dec.peek_kind()?;
            if !kind.is_str() {
                debug!(%kind, "skipping non-string record key");
                dec.skip_value()?;
                dec.skip_value()?;
                continue;
            }
            let key = dec.read_str()?;
            if !record.decode_field(&key, dec)? {
                debug!(key = key.as_str(), "skipping unmatched record key");
                dec.skip_value()?;
            }
        }
        Ok(())
    })
}

/// Decodes into `field` when `key` names it. Used by [`record!`](crate::record!).
#[doc(hidden)]
pub fn decode_named<T, R>(
    field: &mut T,
    declared: &str,
    tag: Option<&str>,
    key: &str,
    dec: &mut Decoder<R>,
) -> Result<bool>
where
    T: Decodable + ?Sized,
    R: ByteSource,
{
    if FieldTag::resolve(declared, tag)?.name != key {
        return Ok(false);
    }
    field.decode_into(dec)?;
    Ok(true)
}

/// Declares a struct and implements [`Record`], [`Encodable`] and
/// [`Decodable`] for it.
///
/// A field may carry a tag after its type: `=> "name,omitempty"`.
///
/// ```
/// msgpack_codec::record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Car {
///         pub make: String => "brand",
///         pub year: u16 => ",omitempty",
///         pub model: String,
///     }
/// }
///
/// let car = Car { make: "Audi".into(), year: 0, model: "A4".into() };
/// let bytes = msgpack_codec::to_vec(&car).unwrap();
/// assert_eq!(bytes[0], 0x82);
/// let back: Car = msgpack_codec::from_slice(&bytes).unwrap();
/// assert_eq!(back, car);
/// ```
#[macro_export]
macro_rules! record {
    (@tag) => { ::core::option::Option::None };
    (@tag $tag:literal) => { ::core::option::Option::Some($tag) };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn visit_fields<V: $crate::FieldVisitor>(&self, visitor: &mut V) -> $crate::Result<()> {
                $(
                    visitor.field(
                        ::core::stringify!($field),
                        $crate::record!(@tag $($tag)?),
                        &self.$field,
                    )?;
                )*
                let _ = visitor;
                ::core::result::Result::Ok(())
            }

            fn decode_field<R: $crate::ByteSource>(
                &mut self,
                key: &str,
                dec: &mut $crate::Decoder<R>,
            ) -> $crate::Result<bool> {
                $(
                    if $crate::decode_named(
                        &mut self.$field,
                        ::core::stringify!($field),
                        $crate::record!(@tag $($tag)?),
                        key,
                        dec,
                    )? {
                        return ::core::result::Result::Ok(true);
                    }
                )*
                let _ = (key, dec);
                ::core::result::Result::Ok(false)
            }
        }

        impl $crate::Encodable for $name {
            fn encode<W: $crate::ByteSink>(&self, enc: &mut $crate::Encoder<W>) -> $crate::Result<()> {
                $crate::encode_record(self, enc)
            }

            fn is_empty_value(&self) -> bool {
                true $(&& $crate::Encodable::is_empty_value(&self.$field))*
            }
        }

        impl $crate::Decodable for $name {
            fn decode_into<R: $crate::ByteSource>(
                &mut self,
                dec: &mut $crate::Decoder<R>,
            ) -> $crate::Result<()> {
                $crate::decode_record(self, dec)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_slice, to_vec, Error};

    crate::record! {
        #[derive(Debug, Default, PartialEq)]
        struct Point {
            x: i32,
            y: i32 => "Y",
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Empty {}
    }

    /// Hand-written record with a broken tag.
    struct BadTag;

    impl Record for BadTag {
        fn visit_fields<V: FieldVisitor>(&self, visitor: &mut V) -> Result<()> {
            visitor.field("a", Some("a,bogus"), &1u8)
        }

        fn decode_field<R: ByteSource>(&mut self, _: &str, _: &mut Decoder<R>) -> Result<bool> {
            Ok(false)
        }
    }

    impl Encodable for BadTag {
        fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
            encode_record(self, enc)
        }
    }

    #[test]
    fn fields_in_declaration_order() {
        let bytes = to_vec(&Point { x: 1, y: -1 }).unwrap();
        assert_eq!(bytes, [0x82, 0xa1, b'x', 0x01, 0xa1, b'Y', 0xff]);
        assert_eq!(from_slice::<Point>(&bytes).unwrap(), Point { x: 1, y: -1 });
    }

    #[test]
    fn empty_record_is_an_empty_map() {
        assert_eq!(to_vec(&Empty {}).unwrap(), [0x80]);
        from_slice::<Empty>(&[0x81, 0xa1, b'z', 0x01]).unwrap();
    }

    #[test]
    fn non_string_keys_are_skipped() {
        // {1: [true], "x": 5}
        let bytes = [0x82, 0x01, 0x91, 0xc3, 0xa1, b'x', 0x05];
        assert_eq!(from_slice::<Point>(&bytes).unwrap(), Point { x: 5, y: 0 });
    }

    #[test]
    fn invalid_tag_aborts_encoding() {
        let err = to_vec(&BadTag).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldTag { .. }));
    }

    #[test]
    fn record_rejects_non_map_input() {
        let err = from_slice::<Point>(&[0x92, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: "map", .. }));
    }
}
