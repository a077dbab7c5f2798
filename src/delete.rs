use crate::path::cut;
use crate::value::Value;

/// Deletes the slot addressed by `path` and returns the root.
///
/// The walk resolves to the parent of the final segment and invokes
/// its delete: an array slot becomes `Null` in place, an object entry
/// is removed. The empty path, a missing intermediate segment and a
/// malformed path are all no-ops — there is nothing to delete. The
/// mutation is destructive and visible through every alias of the
/// tree.
///
/// ```
/// use dotson::{delete, to_string};
///
/// let v = dotson::from_str(r#"{"a": [1, 2, 3]}"#).unwrap();
/// let v = delete(&v, "a.1");
/// assert_eq!(to_string(&v).unwrap(), r#"{"a":[1.0,null,3.0]}"#);
/// ```
pub fn delete(v: &Value, path: &str) -> Value {
    if path.is_empty() {
        return v.clone();
    }
    let mut current = v.clone();
    let mut rest = path;
    loop {
        let (head, tail, last) = cut(rest);
        if !last && tail.is_empty() {
            break;
        }
        if last {
            current.delete(&head);
            break;
        }
        match current.get(&head) {
            Some(next) => current = next,
            None => break,
        }
        rest = tail;
    }
    v.clone()
}
