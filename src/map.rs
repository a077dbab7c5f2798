//! Composable value transforms.
//!
//! A [`Mapper`] turns one value into another. Mappers compose
//! sequentially with [`MapSeq`] and structurally with the object,
//! array and remapping mappers. A mapper handed a kind it does not
//! apply to passes the input through unchanged.

use ahash::AHashMap;

use crate::extract::extract;
use crate::path::Segment;
use crate::value::{Array, Object, Value};

pub trait Mapper {
    fn map(&self, v: Value) -> Value;
}

/// The identity transform.
pub struct Ident;

impl Mapper for Ident {
    fn map(&self, v: Value) -> Value {
        v
    }
}

/// Applies each inner mapper in order, feeding one's output to the
/// next.
pub struct MapSeq(pub Vec<Box<dyn Mapper>>);

impl Mapper for MapSeq {
    fn map(&self, v: Value) -> Value {
        self.0.iter().fold(v, |v, m| m.map(v))
    }
}

/// Multiplies a `Number` by a constant.
pub struct MulScalar(pub f64);

impl Mapper for MulScalar {
    fn map(&self, v: Value) -> Value {
        match v {
            Value::Number(n) => Value::Number(n * self.0),
            other => other,
        }
    }
}

/// Adds a constant: numeric addition on `Number`, concatenation on
/// `String`.
pub struct AddScalar(pub Value);

impl Mapper for AddScalar {
    fn map(&self, v: Value) -> Value {
        match (v, &self.0) {
            (Value::Number(n), Value::Number(c)) => Value::Number(n + c),
            (Value::String(s), Value::String(c)) => Value::String(s + c),
            (other, _) => other,
        }
    }
}

/// Applies a unary numeric function to a `Number`.
pub struct MathMapper(pub fn(f64) -> f64);

impl Mapper for MathMapper {
    fn map(&self, v: Value) -> Value {
        match v {
            Value::Number(n) => Value::Number((self.0)(n)),
            other => other,
        }
    }
}

/// Applies a binary numeric function to the first two `Number`
/// elements of an array.
pub struct Math2Mapper(pub fn(f64, f64) -> f64);

impl Mapper for Math2Mapper {
    fn map(&self, v: Value) -> Value {
        let operands = (
            v.get(&Segment::Index(0)).and_then(|e| e.as_number()),
            v.get(&Segment::Index(1)).and_then(|e| e.as_number()),
        );
        match operands {
            (Some(a), Some(b)) => Value::Number((self.0)(a, b)),
            _ => v,
        }
    }
}

/// Rewrites object fields in place through per-field mappers; fields
/// without a mapper, and mappers without a field, are left alone.
#[derive(Default)]
pub struct ObjectMapper {
    fields: AHashMap<String, Box<dyn Mapper>>,
}

impl ObjectMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, mapper: Box<dyn Mapper>) -> Self {
        self.fields.insert(name.into(), mapper);
        self
    }
}

impl Mapper for ObjectMapper {
    fn map(&self, v: Value) -> Value {
        if !matches!(v, Value::Object(_)) {
            return v;
        }
        for (name, mapper) in &self.fields {
            let key = Segment::from(name.as_str());
            if let Some(member) = v.get(&key) {
                v.put(&key, mapper.map(member));
            }
        }
        v
    }
}

/// Rewrites array elements in place through positional mappers;
/// positions past the end of the input are skipped.
pub struct ArrayMapper(pub Vec<Box<dyn Mapper>>);

impl Mapper for ArrayMapper {
    fn map(&self, v: Value) -> Value {
        if !matches!(v, Value::Array(_)) {
            return v;
        }
        for (i, mapper) in self.0.iter().enumerate() {
            let key = Segment::from(i);
            if let Some(element) = v.get(&key) {
                v.put(&key, mapper.map(element));
            }
        }
        v
    }
}

/// One entry of a remapping specification.
pub enum Remap {
    /// Insert this value verbatim.
    Literal(Value),
    /// Apply this mapper to the matching element/field of the input.
    Nested(Box<dyn Mapper>),
    /// Extract this path from the whole input.
    Path(String),
}

/// Builds a fresh array from a positional [`Remap`] specification.
pub struct ArrayRemapper(pub Vec<Remap>);

impl Mapper for ArrayRemapper {
    fn map(&self, v: Value) -> Value {
        let out = Array::with_len(self.0.len());
        for (i, entry) in self.0.iter().enumerate() {
            let mapped = match entry {
                Remap::Literal(lit) => lit.clone(),
                Remap::Nested(mapper) => {
                    mapper.map(v.get(&Segment::from(i)).unwrap_or(Value::Null))
                }
                Remap::Path(path) => extract(&v, path).unwrap_or(Value::Null),
            };
            out.put(i as u64, mapped);
        }
        Value::Array(out)
    }
}

/// Builds a fresh object from a by-name [`Remap`] specification.
#[derive(Default)]
pub struct ObjectRemapper {
    entries: AHashMap<String, Remap>,
}

impl ObjectRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, name: impl Into<String>, remap: Remap) -> Self {
        self.entries.insert(name.into(), remap);
        self
    }
}

impl Mapper for ObjectRemapper {
    fn map(&self, v: Value) -> Value {
        let out = Object::new();
        for (name, entry) in &self.entries {
            let mapped = match entry {
                Remap::Literal(lit) => lit.clone(),
                Remap::Nested(mapper) => {
                    mapper.map(v.get(&Segment::from(name.as_str())).unwrap_or(Value::Null))
                }
                Remap::Path(path) => extract(&v, path).unwrap_or(Value::Null),
            };
            out.put(name.clone(), mapped);
        }
        Value::Object(out)
    }
}
