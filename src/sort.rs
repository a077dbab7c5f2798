use std::cmp::Ordering;

use crate::compare::try_compare;
use crate::error::Error;
use crate::extract::extract;
use crate::value::Value;

/// Sorts an array in place by [`try_compare`] and returns it; any
/// other value (including the nil array) comes back unchanged.
/// Stability is not guaranteed. The reordering is visible through
/// every alias of the array.
pub fn sort(vs: &Value) -> Result<Value, Error> {
    let Value::Array(a) = vs else {
        return Ok(vs.clone());
    };
    let Some(cell) = &a.0 else {
        return Ok(vs.clone());
    };
    let mut failure = None;
    cell.borrow_mut().sort_unstable_by(|x, y| {
        try_compare(x, y).unwrap_or_else(|e| {
            failure.get_or_insert(e);
            Ordering::Equal
        })
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(vs.clone()),
    }
}

/// Sorts an array in place by the value extracted at `path` from each
/// element. An element whose extraction misses ranks below every
/// element with a present key — the "no value" minimal rank. The
/// empty path falls back to [`sort`].
///
/// ```
/// use dotson::{sort_by_key, to_string};
///
/// let v = dotson::from_str(r#"[{"v": "b"}, {"v": "a"}]"#).unwrap();
/// let sorted = sort_by_key(&v, "v").unwrap();
/// assert_eq!(to_string(&sorted).unwrap(), r#"[{"v":"a"},{"v":"b"}]"#);
/// ```
pub fn sort_by_key(vs: &Value, path: &str) -> Result<Value, Error> {
    if path.is_empty() {
        return sort(vs);
    }
    let Value::Array(a) = vs else {
        return Ok(vs.clone());
    };
    let Some(cell) = &a.0 else {
        return Ok(vs.clone());
    };
    let mut failure = None;
    cell.borrow_mut().sort_unstable_by(|x, y| {
        match (extract(x, path), extract(y, path)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(kx), Some(ky)) => try_compare(&kx, &ky).unwrap_or_else(|e| {
                failure.get_or_insert(e);
                Ordering::Equal
            }),
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(vs.clone()),
    }
}
