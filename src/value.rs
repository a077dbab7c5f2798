use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::Error;
use crate::path::Segment;

/// Recursion depth after which container addresses on the active path
/// are tracked (or, where addresses are unavailable, the walk is cut
/// off) to turn cyclic input into an error instead of a hang.
pub(crate) const CYCLE_LIMIT: usize = 100;

/// A canonical JSON-like value.
///
/// `Value` is a closed set of six variants. Scalars are leaves; `Array`
/// and `Object` are cheap *handles* to shared storage: cloning a
/// container value aliases it, and mutation through any handle is
/// visible through every alias. Use [`Value::deep_clone`] when an
/// independent copy is needed.
///
/// Both container kinds distinguish **nil** (absent storage, the
/// ingestion of a missing collection) from **empty** (present storage
/// with no members). Nil sorts before empty, which sorts before any
/// populated container of the same kind.
///
/// ```
/// use dotson::{extract, Value};
///
/// let v = dotson::from_str(r#"{"a": [1, 2, 3]}"#).unwrap();
/// assert_eq!(extract(&v, "a.1"), Some(Value::Number(2.0)));
/// assert_eq!(extract(&v, "a.7"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Object),
}

/// Handle to shared array storage. `Array::default()` is the nil array.
#[derive(Clone, Debug, Default)]
pub struct Array(pub(crate) Option<Rc<RefCell<Vec<Value>>>>);

/// Handle to shared object storage. `Object::default()` is the nil
/// object.
#[derive(Clone, Debug, Default)]
pub struct Object(pub(crate) Option<Rc<RefCell<AHashMap<String, Value>>>>);

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Looks up a direct child. Scalars have no children; a
    /// kind-mismatched segment (an index into an object, a field on an
    /// array) misses. The returned value aliases the stored child.
    pub fn get(&self, key: &Segment<'_>) -> Option<Value> {
        match (self, key) {
            (Value::Array(a), Segment::Index(i)) => a.get(*i),
            (Value::Object(o), Segment::Field(f)) => o.get(f),
            _ => None,
        }
    }

    /// Stores a direct child. No-op on scalars and on kind-mismatched
    /// segments. Storing past the end of an array is a programmer
    /// error and panics; callers size containers up front.
    pub fn put(&self, key: &Segment<'_>, child: Value) {
        match (self, key) {
            (Value::Array(a), Segment::Index(i)) => a.put(*i, child),
            (Value::Object(o), Segment::Field(f)) => o.put(f.as_ref(), child),
            _ => {}
        }
    }

    /// Removes a direct child. An array slot in range is set to `Null`
    /// (length and sibling indices preserved); an object entry is
    /// removed. Everything else, including out-of-range indices, is a
    /// no-op.
    pub fn delete(&self, key: &Segment<'_>) {
        match (self, key) {
            (Value::Array(a), Segment::Index(i)) => a.delete(*i),
            (Value::Object(o), Segment::Field(f)) => o.delete(f),
            _ => {}
        }
    }

    /// Iterates direct children. Array children are visited in index
    /// order, object children in unspecified order; the callback
    /// returning `false` stops early. Scalars visit nothing.
    ///
    /// The container is borrowed for the duration of the iteration:
    /// mutating it (through any alias) from inside the callback panics.
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(Segment<'_>, &Value) -> bool,
    {
        match self {
            Value::Array(a) => {
                let Some(cell) = &a.0 else { return };
                let items = cell.borrow();
                for (i, v) in items.iter().enumerate() {
                    if !f(Segment::Index(i as u64), v) {
                        break;
                    }
                }
            }
            Value::Object(o) => {
                let Some(cell) = &o.0 else { return };
                let members = cell.borrow();
                for (k, v) in members.iter() {
                    if !f(Segment::from(k.as_str()), v) {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    /// Address of the container storage, for cycle tracking. Scalars
    /// and nil containers have none.
    pub(crate) fn storage_addr(&self) -> Option<usize> {
        match self {
            Value::Array(a) => a.0.as_ref().map(|cell| Rc::as_ptr(cell) as usize),
            Value::Object(o) => o.0.as_ref().map(|cell| Rc::as_ptr(cell) as usize),
            _ => None,
        }
    }

    /// Copies the whole tree into independent storage.
    ///
    /// Fails with [`Error::CycleDetected`] on self-referential input:
    /// once the recursion passes the cycle threshold, container
    /// addresses on the active path are tracked and a revisit aborts.
    pub fn deep_clone(&self) -> Result<Value, Error> {
        let mut seen = Vec::new();
        self.deep_clone_rec(0, &mut seen)
    }

    fn deep_clone_rec(&self, depth: usize, seen: &mut Vec<usize>) -> Result<Value, Error> {
        match self {
            Value::Array(a) => {
                let Some(cell) = &a.0 else {
                    return Ok(Value::Array(Array::nil()));
                };
                let entered = enter(depth, Rc::as_ptr(cell) as usize, seen)?;
                let items = cell.borrow();
                let mut out = Vec::with_capacity(items.len());
                for v in items.iter() {
                    out.push(v.deep_clone_rec(depth + 1, seen)?);
                }
                drop(items);
                if entered {
                    seen.pop();
                }
                Ok(Value::Array(Array::from_vec(out)))
            }
            Value::Object(o) => {
                let Some(cell) = &o.0 else {
                    return Ok(Value::Object(Object::nil()));
                };
                let entered = enter(depth, Rc::as_ptr(cell) as usize, seen)?;
                let members = cell.borrow();
                let mut out = AHashMap::with_capacity(members.len());
                for (k, v) in members.iter() {
                    out.insert(k.clone(), v.deep_clone_rec(depth + 1, seen)?);
                }
                drop(members);
                if entered {
                    seen.pop();
                }
                Ok(Value::Object(Object::from_map(out)))
            }
            other => Ok(other.clone()),
        }
    }
}

fn enter(depth: usize, addr: usize, seen: &mut Vec<usize>) -> Result<bool, Error> {
    if depth < CYCLE_LIMIT {
        return Ok(false);
    }
    if seen.contains(&addr) {
        return Err(Error::CycleDetected { depth });
    }
    seen.push(addr);
    Ok(true)
}

impl Array {
    /// A fresh empty array.
    pub fn new() -> Self {
        Array(Some(Rc::new(RefCell::new(Vec::new()))))
    }

    /// The nil array: present as a value, absent as storage.
    pub fn nil() -> Self {
        Array(None)
    }

    /// A fresh array of `len` `Null` slots.
    pub fn with_len(len: usize) -> Self {
        Array::from_vec(vec![Value::Null; len])
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Array(Some(Rc::new(RefCell::new(items))))
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_none()
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |cell| cell.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `i`, aliasing the stored value. Out of range (and any
    /// lookup on nil) misses.
    pub fn get(&self, i: u64) -> Option<Value> {
        let cell = self.0.as_ref()?;
        let items = cell.borrow();
        items.get(usize::try_from(i).ok()?).cloned()
    }

    /// Replaces the element at `i`.
    ///
    /// # Panics
    ///
    /// Panics when `i` is out of range; merging and ingestion size
    /// arrays before storing into them, and callers must do the same.
    pub fn put(&self, i: u64, child: Value) {
        let len = self.len();
        let idx = usize::try_from(i)
            .ok()
            .filter(|&ix| ix < len)
            .unwrap_or_else(|| panic!("array put: index {i} out of range for length {len}"));
        let cell = self.0.as_ref().expect("array put: nil array");
        cell.borrow_mut()[idx] = child;
    }

    /// Clears the slot at `i` to `Null`, keeping length and sibling
    /// indices intact. Out of range is a no-op.
    pub fn delete(&self, i: u64) {
        let Some(cell) = &self.0 else { return };
        let mut items = cell.borrow_mut();
        if let Some(slot) = usize::try_from(i).ok().and_then(|ix| items.get_mut(ix)) {
            *slot = Value::Null;
        }
    }

    /// Appends to the end.
    ///
    /// # Panics
    ///
    /// Panics on a nil array, which has no storage to grow.
    pub fn push(&self, child: Value) {
        let cell = self.0.as_ref().expect("array push: nil array");
        cell.borrow_mut().push(child);
    }

    /// Whether two handles share the same storage.
    pub fn ptr_eq(&self, other: &Array) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Object {
    /// A fresh empty object.
    pub fn new() -> Self {
        Object(Some(Rc::new(RefCell::new(AHashMap::new()))))
    }

    /// The nil object: present as a value, absent as storage.
    pub fn nil() -> Self {
        Object(None)
    }

    pub fn from_map(members: AHashMap<String, Value>) -> Self {
        Object(Some(Rc::new(RefCell::new(members))))
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_none()
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |cell| cell.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member under `key`, aliasing the stored value.
    pub fn get(&self, key: &str) -> Option<Value> {
        let cell = self.0.as_ref()?;
        let members = cell.borrow();
        members.get(key).cloned()
    }

    /// Inserts or overwrites the member under `key`.
    ///
    /// # Panics
    ///
    /// Panics on a nil object, which has no storage to insert into.
    pub fn put(&self, key: impl Into<String>, child: Value) {
        let cell = self.0.as_ref().expect("object put: nil object");
        cell.borrow_mut().insert(key.into(), child);
    }

    /// Removes the member under `key`; absent keys (and nil) are a
    /// no-op.
    pub fn delete(&self, key: &str) {
        let Some(cell) = &self.0 else { return };
        cell.borrow_mut().remove(key);
    }

    /// Member names, in unspecified order.
    pub fn keys(&self) -> Vec<String> {
        self.0.as_ref().map_or_else(Vec::new, |cell| {
            cell.borrow().keys().cloned().collect()
        })
    }

    /// Copies every member of `other` into `self`, overwriting on
    /// collision. Extending an object with itself is a no-op.
    pub fn extend_from(&self, other: &Object) {
        let Some(src) = &other.0 else { return };
        let dst = self.0.as_ref().expect("object extend: nil object");
        if Rc::ptr_eq(dst, src) {
            return;
        }
        let mut members = dst.borrow_mut();
        for (k, v) in src.borrow().iter() {
            members.insert(k.clone(), v.clone());
        }
    }

    /// Removes every member.
    pub fn clear(&self) {
        let Some(cell) = &self.0 else { return };
        cell.borrow_mut().clear();
    }

    /// Whether two handles share the same storage.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// Structural equality. Aliased handles short-circuit; nil and empty
// containers are unequal; numbers use IEEE comparison. Undefined on
// cyclic values, like every other deep operation.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => match (&a.0, &b.0) {
                (None, None) => true,
                (Some(x), Some(y)) => {
                    Rc::ptr_eq(x, y) || {
                        let (x, y) = (x.borrow(), y.borrow());
                        x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| a == b)
                    }
                }
                _ => false,
            },
            (Value::Object(a), Value::Object(b)) => match (&a.0, &b.0) {
                (None, None) => true,
                (Some(x), Some(y)) => {
                    Rc::ptr_eq(x, y) || {
                        let (x, y) = (x.borrow(), y.borrow());
                        x.len() == y.len()
                            && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| v == w))
                    }
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

macro_rules! from_number {
    ($($ty:ty),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Value {
                Value::Number(v as f64)
            }
        })*
    };
}

from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Value {
        Value::Array(Array::from_vec(items.into_iter().map(Into::into).collect()))
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Value {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Value {
        Value::Object(o)
    }
}

impl<T: Into<Value>, S> From<std::collections::HashMap<String, T, S>> for Value {
    fn from(members: std::collections::HashMap<String, T, S>) -> Value {
        Value::Object(Object::from_map(
            members.into_iter().map(|(k, v)| (k, v.into())).collect(),
        ))
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(members: BTreeMap<String, T>) -> Value {
        Value::Object(Object::from_map(
            members.into_iter().map(|(k, v)| (k, v.into())).collect(),
        ))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Value {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(Array::from_vec(items.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(members) => Value::Object(Object::from_map(
                members.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            )),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> serde_json::Value {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(a) => match &a.0 {
                None => serde_json::Value::Null,
                Some(cell) => serde_json::Value::Array(
                    cell.borrow().iter().map(serde_json::Value::from).collect(),
                ),
            },
            Value::Object(o) => match &o.0 {
                None => serde_json::Value::Null,
                Some(cell) => serde_json::Value::Object(
                    cell.borrow()
                        .iter()
                        .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                        .collect(),
                ),
            },
        }
    }
}
