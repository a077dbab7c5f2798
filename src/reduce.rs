//! Streaming folds over values.
//!
//! A [`Reducer`] accumulates many inputs into one aggregate. `add`
//! folds one input into mutable state; `value` reports the current
//! aggregate and may be called repeatedly, interleaved with further
//! adds. `None` from `value` is the "no value" sentinel — an
//! aggregate that has seen nothing it can report on.

use std::hash::Hash;

use ahash::AHashMap;
use log::debug;

use crate::extract::extract;
use crate::path::Segment;
use crate::value::{Array, Object, Value};

pub trait Reducer {
    fn add(&mut self, v: &Value);
    fn value(&self) -> Option<Value>;
}

/// Numeric fold operations for [`NumericReducer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReduceOp {
    #[default]
    Sum,
    Min,
    Max,
    /// Keep the first number seen.
    Any,
    Mean,
}

/// Folds `Number` inputs with one of [`ReduceOp`]. Non-numeric inputs
/// are ignored. With zero additions every op reports the "no value"
/// sentinel; mean divides by the count of numbers actually folded.
#[derive(Debug, Default)]
pub struct NumericReducer {
    op: ReduceOp,
    val: f64,
    count: usize,
    set: bool,
}

impl NumericReducer {
    pub fn new(op: ReduceOp) -> Self {
        NumericReducer {
            op,
            ..Default::default()
        }
    }
}

impl Reducer for NumericReducer {
    fn add(&mut self, v: &Value) {
        let Some(n) = v.as_number() else {
            debug!("numeric reducer: ignoring {} input", v.kind());
            return;
        };
        match self.op {
            ReduceOp::Sum => {
                self.set = true;
                self.val += n;
            }
            ReduceOp::Min => {
                if !self.set || n < self.val {
                    self.set = true;
                    self.val = n;
                }
            }
            ReduceOp::Max => {
                if !self.set || n > self.val {
                    self.set = true;
                    self.val = n;
                }
            }
            ReduceOp::Any => {
                if !self.set {
                    self.set = true;
                    self.val = n;
                }
            }
            ReduceOp::Mean => {
                self.set = true;
                self.val += n;
                self.count += 1;
            }
        }
    }

    fn value(&self) -> Option<Value> {
        if !self.set {
            return None;
        }
        match self.op {
            ReduceOp::Mean => Some(Value::Number(self.val / self.count as f64)),
            _ => Some(Value::Number(self.val)),
        }
    }
}

/// Partitions inputs by a caller-supplied key function, one lazily
/// created child reducer per distinct key. `value` collects the child
/// aggregates into an array in unspecified order.
pub struct HashReducer<K: Eq + Hash> {
    new_child: Box<dyn Fn() -> Box<dyn Reducer>>,
    key: Box<dyn Fn(&Value) -> K>,
    partitions: AHashMap<K, Box<dyn Reducer>>,
}

impl<K: Eq + Hash> HashReducer<K> {
    pub fn new(
        key: impl Fn(&Value) -> K + 'static,
        new_child: impl Fn() -> Box<dyn Reducer> + 'static,
    ) -> Self {
        HashReducer {
            new_child: Box::new(new_child),
            key: Box::new(key),
            partitions: AHashMap::new(),
        }
    }

    pub fn partitions(&self) -> usize {
        self.partitions.len()
    }
}

impl<K: Eq + Hash> Reducer for HashReducer<K> {
    fn add(&mut self, v: &Value) {
        let k = (self.key)(v);
        self.partitions
            .entry(k)
            .or_insert_with(|| (self.new_child)())
            .add(v);
    }

    fn value(&self) -> Option<Value> {
        let out = Array::new();
        for child in self.partitions.values() {
            out.push(child.value().unwrap_or(Value::Null));
        }
        Some(Value::Array(out))
    }
}

/// Partitions inputs by the value extracted at a configured path; an
/// extraction miss partitions under `Null`. Child aggregates are
/// collected into an array in unspecified order.
pub struct PartitionReducer {
    new_child: Box<dyn Fn() -> Box<dyn Reducer>>,
    key: String,
    partitions: AHashMap<String, Box<dyn Reducer>>,
}

impl PartitionReducer {
    pub fn new(key: impl Into<String>, new_child: impl Fn() -> Box<dyn Reducer> + 'static) -> Self {
        PartitionReducer {
            new_child: Box::new(new_child),
            key: key.into(),
            partitions: AHashMap::new(),
        }
    }

    pub fn partitions(&self) -> usize {
        self.partitions.len()
    }
}

impl Reducer for PartitionReducer {
    fn add(&mut self, v: &Value) {
        let key = extract(v, &self.key).unwrap_or(Value::Null);
        self.partitions
            .entry(partition_key(&key))
            .or_insert_with(|| (self.new_child)())
            .add(v);
    }

    fn value(&self) -> Option<Value> {
        let out = Array::new();
        for child in self.partitions.values() {
            out.push(child.value().unwrap_or(Value::Null));
        }
        Some(Value::Array(out))
    }
}

/// A canonical rendering of a key value, stable across runs: object
/// members are emitted in sorted key order and zeroes normalize, so
/// values that compare equal land in the same partition.
fn partition_key(v: &Value) -> String {
    match v {
        Value::Null => "z".to_string(),
        Value::Bool(b) => format!("b:{b}"),
        Value::Number(n) => {
            let n = if *n == 0.0 { 0.0 } else { *n };
            format!("n:{:x}", n.to_bits())
        }
        Value::String(s) => format!("s:{s}"),
        Value::Array(a) => match &a.0 {
            None => "a:nil".to_string(),
            Some(cell) => {
                let parts: Vec<String> = cell.borrow().iter().map(partition_key).collect();
                format!("a:[{}]", parts.join(","))
            }
        },
        Value::Object(o) => match &o.0 {
            None => "o:nil".to_string(),
            Some(cell) => {
                let members = cell.borrow();
                let mut parts: Vec<String> = members
                    .iter()
                    .map(|(k, v)| format!("{k}={}", partition_key(v)))
                    .collect();
                parts.sort_unstable();
                format!("o:{{{}}}", parts.join(","))
            }
        },
    }
}

/// Fans each input object's fields out to child reducers by name (a
/// missing field feeds `Null`) and reassembles the child aggregates
/// into an object of the same shape.
#[derive(Default)]
pub struct ObjectReducer {
    fields: AHashMap<String, Box<dyn Reducer>>,
}

impl ObjectReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, child: Box<dyn Reducer>) -> Self {
        self.fields.insert(name.into(), child);
        self
    }
}

impl Reducer for ObjectReducer {
    fn add(&mut self, v: &Value) {
        if !matches!(v, Value::Object(_)) {
            debug!("object reducer: ignoring {} input", v.kind());
            return;
        }
        for (name, child) in self.fields.iter_mut() {
            let member = v.get(&Segment::from(name.as_str())).unwrap_or(Value::Null);
            child.add(&member);
        }
    }

    fn value(&self) -> Option<Value> {
        let out = Object::new();
        for (name, child) in &self.fields {
            out.put(name.clone(), child.value().unwrap_or(Value::Null));
        }
        Some(Value::Object(out))
    }
}

/// Fans each input array's elements out to child reducers by position
/// (a missing element feeds `Null`) and reassembles the child
/// aggregates into an array of the same length.
#[derive(Default)]
pub struct ArrayReducer {
    elements: Vec<Box<dyn Reducer>>,
}

impl ArrayReducer {
    pub fn new(elements: Vec<Box<dyn Reducer>>) -> Self {
        ArrayReducer { elements }
    }
}

impl Reducer for ArrayReducer {
    fn add(&mut self, v: &Value) {
        if !matches!(v, Value::Array(_)) {
            debug!("array reducer: ignoring {} input", v.kind());
            return;
        }
        for (i, child) in self.elements.iter_mut().enumerate() {
            let element = v.get(&Segment::from(i)).unwrap_or(Value::Null);
            child.add(&element);
        }
    }

    fn value(&self) -> Option<Value> {
        let out = Array::new();
        for child in &self.elements {
            out.push(child.value().unwrap_or(Value::Null));
        }
        Some(Value::Array(out))
    }
}

/// Concatenates `String` inputs; other kinds are ignored.
#[derive(Debug, Default)]
pub struct StringAgg {
    buf: String,
}

impl StringAgg {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reducer for StringAgg {
    fn add(&mut self, v: &Value) {
        if let Some(s) = v.as_str() {
            self.buf.push_str(s);
        }
    }

    fn value(&self) -> Option<Value> {
        Some(Value::String(self.buf.clone()))
    }
}

/// Sums `Number` inputs, starting from zero.
#[derive(Debug, Default)]
pub struct SumReducer {
    sum: f64,
}

impl SumReducer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reducer for SumReducer {
    fn add(&mut self, v: &Value) {
        if let Some(n) = v.as_number() {
            self.sum += n;
        }
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Number(self.sum))
    }
}

/// Counts `true` inputs.
#[derive(Debug, Default)]
pub struct TrueCounter {
    count: usize,
}

impl TrueCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reducer for TrueCounter {
    fn add(&mut self, v: &Value) {
        if v.as_bool() == Some(true) {
            self.count += 1;
        }
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Number(self.count as f64))
    }
}

/// Keeps the first input, whatever its kind.
#[derive(Debug, Default)]
pub struct FirstReducer {
    first: Option<Value>,
}

impl FirstReducer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reducer for FirstReducer {
    fn add(&mut self, v: &Value) {
        if self.first.is_none() {
            self.first = Some(v.clone());
        }
    }

    fn value(&self) -> Option<Value> {
        self.first.clone()
    }
}

/// Discards everything and reports nothing.
#[derive(Debug, Default)]
pub struct NullReducer;

impl Reducer for NullReducer {
    fn add(&mut self, _: &Value) {}

    fn value(&self) -> Option<Value> {
        None
    }
}
