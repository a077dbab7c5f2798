//! The JSON text boundary.
//!
//! Canonical values serialize to and deserialize from JSON through
//! serde, so the grammar, number handling and error positions are
//! serde_json's. Nil containers render as `null`; array element order
//! is preserved; object key order is unspecified; duplicate keys in
//! input silently keep the last occurrence.

use std::fmt;
use std::io;

use ahash::AHashMap;
use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::Error;
use crate::value::{Array, Object, Value};

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(a) => match &a.0 {
                None => serializer.serialize_unit(),
                Some(cell) => {
                    let items = cell.borrow();
                    let mut seq = serializer.serialize_seq(Some(items.len()))?;
                    for item in items.iter() {
                        seq.serialize_element(item)?;
                    }
                    seq.end()
                }
            },
            Value::Object(o) => match &o.0 {
                None => serializer.serialize_unit(),
                Some(cell) => {
                    let members = cell.borrow();
                    let mut map = serializer.serialize_map(Some(members.len()))?;
                    for (k, v) in members.iter() {
                        map.serialize_entry(k, v)?;
                    }
                    map.end()
                }
            },
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(Array::from_vec(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut members = AHashMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            // Duplicate keys keep the last occurrence.
            members.insert(key, value);
        }
        Ok(Value::Object(Object::from_map(members)))
    }
}

/// Streaming decoder: one canonical value per [`Decoder::decode`]
/// call, consuming only that value's bytes, so a concatenated stream
/// of JSON documents decodes with repeated calls.
///
/// ```
/// use dotson::{Decoder, Value};
///
/// let mut decoder = Decoder::new(&b"1 [2] {\"a\": 3}"[..]);
/// assert_eq!(decoder.decode().unwrap(), Value::Number(1.0));
/// assert!(matches!(decoder.decode().unwrap(), Value::Array(_)));
/// assert!(matches!(decoder.decode().unwrap(), Value::Object(_)));
/// assert!(decoder.decode().is_err()); // stream exhausted
/// ```
pub struct Decoder<R: io::Read> {
    inner: serde_json::Deserializer<serde_json::de::IoRead<R>>,
}

impl<R: io::Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Decoder {
            inner: serde_json::Deserializer::from_reader(reader),
        }
    }

    /// Decodes the next value from the stream. Exhaustion and
    /// malformed input both surface as [`Error::Decode`] with
    /// position context.
    pub fn decode(&mut self) -> Result<Value, Error> {
        Ok(Value::deserialize(&mut self.inner)?)
    }
}

/// Decodes one value from a string of JSON text.
pub fn from_str(s: &str) -> Result<Value, Error> {
    Ok(serde_json::from_str(s)?)
}

/// Decodes one value from a byte slice of JSON text.
pub fn from_slice(bytes: &[u8]) -> Result<Value, Error> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Renders a value as JSON text.
pub fn to_string(v: &Value) -> Result<String, Error> {
    Ok(serde_json::to_string(v)?)
}

/// Renders a value as JSON text into a writer.
pub fn to_writer<W: io::Write>(writer: W, v: &Value) -> Result<(), Error> {
    Ok(serde_json::to_writer(writer, v)?)
}
