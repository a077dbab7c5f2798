use log::trace;

use crate::extract::extract;
use crate::path::{cut, Segment};
use crate::value::{Array, Object, Value};

/// Reads `src` at `src_path` and grafts it into `dst` at `dst_path`,
/// returning the (possibly replaced) root of `dst`. `None` when the
/// source path misses.
///
/// The graft walks `dst_path` and repairs the tree as it goes:
///
/// - a `Null` on the way is promoted to a container typed by the next
///   segment — an index `i` makes an array of `i + 1` `Null` slots, a
///   field makes an empty object;
/// - an object missing the next field gets a fresh empty object
///   grafted in before the descent continues;
/// - a concrete array is never grown: an out-of-range index stops the
///   graft and the root comes back unchanged;
/// - a scalar in the way also stops the graft.
///
/// The final segment is a whole-value replacement, not a structural
/// merge. The grafted subtree is aliased, not copied.
///
/// ```
/// use dotson::{extract, merge, Value};
///
/// let src = dotson::from_str(r#"{"a": 1, "b": 2}"#).unwrap();
/// let merged = merge(&Value::Null, &src, "", "").unwrap();
/// assert_eq!(extract(&merged, "b"), Some(Value::Number(2.0)));
///
/// let merged = merge(&Value::Null, &src, "nested.deep", "a").unwrap();
/// assert_eq!(extract(&merged, "nested.deep"), Some(Value::Number(1.0)));
/// ```
pub fn merge(dst: &Value, src: &Value, dst_path: &str, src_path: &str) -> Option<Value> {
    let src = extract(src, src_path)?;
    trace!("merge: graft {} at {dst_path:?}", src.kind());
    Some(merge_rec(dst.clone(), src, dst_path))
}

fn merge_rec(dst: Value, src: Value, path: &str) -> Value {
    if path.is_empty() {
        return src;
    }
    let (head, tail, last) = cut(path);
    if matches!(&head, Segment::Field(f) if f.is_empty()) {
        return dst;
    }
    if !last && tail.is_empty() {
        return dst;
    }
    match (&dst, &head) {
        (Value::Null, Segment::Index(i)) => {
            let fresh = Value::Array(Array::with_len(*i as usize + 1));
            merge_rec(fresh, src, path)
        }
        (Value::Null, Segment::Field(_)) => merge_rec(Value::Object(Object::new()), src, path),
        (Value::Array(a), Segment::Index(i)) => {
            if *i >= a.len() as u64 {
                return dst;
            }
            if last {
                dst.put(&head, src);
                return dst;
            }
            let child = dst.get(&head).expect("in-range array index");
            let merged = merge_rec(child, src, tail);
            dst.put(&head, merged);
            dst
        }
        (Value::Object(_), Segment::Field(_)) => {
            if last {
                dst.put(&head, src);
                return dst;
            }
            let child = dst
                .get(&head)
                .unwrap_or_else(|| Value::Object(Object::new()));
            let merged = merge_rec(child, src, tail);
            dst.put(&head, merged);
            dst
        }
        // Scalars and kind-mismatched segments stop the graft.
        _ => dst,
    }
}
