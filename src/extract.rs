use crate::path::{cut, Segment};
use crate::value::Value;

/// Resolves `path` against `v`, segment by segment.
///
/// The empty path yields the whole value. Any failed step — missing
/// key, out-of-range index, a lookup on a scalar, an empty segment or
/// a trailing separator — yields `None`, which is distinct from a
/// present `Null`. The returned value aliases the stored subtree.
///
/// ```
/// use dotson::{extract, Value};
///
/// let v = dotson::from_str(r#"{"a": {"b": [null]}}"#).unwrap();
/// assert_eq!(extract(&v, "a.b.0"), Some(Value::Null));
/// assert_eq!(extract(&v, "a.b.1"), None);
/// assert_eq!(extract(&v, "a.c"), None);
/// ```
pub fn extract(v: &Value, path: &str) -> Option<Value> {
    let mut current = v.clone();
    let mut rest = path;
    loop {
        if rest.is_empty() {
            return Some(current);
        }
        let (head, tail, last) = cut(rest);
        if matches!(&head, Segment::Field(f) if f.is_empty()) {
            return None;
        }
        if !last && tail.is_empty() {
            return None;
        }
        current = current.get(&head)?;
        if last {
            return Some(current);
        }
        rest = tail;
    }
}
