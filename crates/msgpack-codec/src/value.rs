//! [`Value`] — a dynamically typed MessagePack tree.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use msgpack_buffers::{ByteSink, ByteSource};

use crate::error::Result;
use crate::{Decodable, Decoder, Encodable, Encoder, WireValue};

const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Any value the wire format can carry, extension types aside.
///
/// `Int` and `Uint` compare equal when they hold the same integer, so a tree
/// survives a round trip even though small non-negative integers always come
/// back as `Uint`.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    /// Pairs in wire order. Keys may be any value.
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Value::Int(v) => Some(v as i128),
            Value::Uint(v) => Some(v as i128),
            _ => None,
        }
    }

    /// Looks up a string key in a map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(pairs) => pairs
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (
                Value::Int(_) | Value::Uint(_),
                Value::Int(_) | Value::Uint(_),
            ) => self.as_i128() == other.as_i128(),
            (Value::Float32(a), Value::Float32(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bin(a), Value::Bin(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Encodable for Value {
    fn encode<W: ByteSink>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            Value::Nil => enc.encode_nil(),
            Value::Bool(b) => enc.encode_bool(*b),
            Value::Int(v) => enc.encode_signed(*v, 64),
            Value::Uint(v) => enc.encode_unsigned(*v, 64),
            Value::Float32(f) => enc.encode_f32(*f),
            Value::Float64(f) => enc.encode_f64(*f),
            Value::Str(s) => enc.encode_str(s),
            Value::Bin(b) => enc.encode_bin(b),
            Value::Array(items) => {
                enc.encode_array_header(items.len())?;
                items.iter().try_for_each(|item| item.encode(enc))
            }
            Value::Map(pairs) => {
                enc.encode_map_header(pairs.len())?;
                pairs.iter().try_for_each(|(key, value)| {
                    key.encode(enc)?;
                    value.encode(enc)
                })
            }
        }
    }

    fn is_empty_value(&self) -> bool {
        self.is_nil()
    }
}

impl Decodable for Value {
    fn decode_into<R: ByteSource>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = read_value(dec)?;
        Ok(())
    }
}

fn read_value<R: ByteSource>(dec: &mut Decoder<R>) -> Result<Value> {
    let value = match dec.token()? {
        WireValue::Nil => Value::Nil,
        WireValue::Bool(b) => Value::Bool(b),
        WireValue::Int(v) => Value::Int(v),
        WireValue::Uint(v) => Value::Uint(v),
        WireValue::Float32(f) => Value::Float32(f),
        WireValue::Float64(f) => Value::Float64(f),
        WireValue::Str(s) => Value::Str(s),
        WireValue::Bin(b) => Value::Bin(b),
        WireValue::Array(len) => dec.nested(|dec| {
            let len = len as usize;
            let mut items = Vec::with_capacity(dec.prealloc(len));
            for _ in 0..len {
                items.push(read_value(dec)?);
            }
            Ok(Value::Array(items))
        })?,
        WireValue::Map(len) => dec.nested(|dec| {
            let len = len as usize;
            let mut pairs = Vec::with_capacity(dec.prealloc(len));
            for _ in 0..len {
                let key = read_value(dec)?;
                let value = read_value(dec)?;
                pairs.push((key, value));
            }
            Ok(Value::Map(pairs))
        })?,
    };
    Ok(value)
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float64(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Blobs become `data:` URIs; non-string map keys become their JSON text.
impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::json!(i),
            Value::Uint(u) => serde_json::json!(u),
            Value::Float32(f) => serde_json::json!(f),
            Value::Float64(f) => serde_json::json!(f),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Bin(b) => {
                serde_json::Value::String(format!("{DATA_URI_PREFIX}{}", STANDARD.encode(b)))
            }
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(pairs) => serde_json::Value::Object(
                pairs
                    .into_iter()
                    .map(|(k, v)| {
                        let key = match k {
                            Value::Str(s) => s,
                            other => serde_json::Value::from(other).to_string(),
                        };
                        (key, serde_json::Value::from(v))
                    })
                    .collect(),
            ),
        }
    }
}
