use std::cmp::Ordering;
use std::rc::Rc;

use crate::error::Error;
use crate::value::{Value, CYCLE_LIMIT};

/// Totally orders two values.
///
/// Kinds rank `Null < Bool < Number < String < Array < Object`.
/// Within a kind: `false < true`; numbers by `f64::total_cmp`; strings
/// lexicographically by byte. Containers rank nil before empty before
/// populated; non-nil arrays compare by length first and only then
/// element-wise, so arrays of different lengths never inspect
/// elements. Non-nil objects compare by cardinality, then by sorted
/// key sequence, then by values taken in sorted-key order,
/// short-circuiting on the first difference.
///
/// Two handles to the same storage, and a value compared with itself,
/// are equal without recursing. Cyclic values are undefined input:
/// past the cycle threshold, storage addresses on the active path are
/// tracked and a revisit fails fast with [`Error::CycleDetected`].
///
/// ```
/// use std::cmp::Ordering;
///
/// use dotson::{try_compare, Array, Value};
///
/// let nil = Value::Array(Array::nil());
/// let empty = Value::Array(Array::new());
/// assert_eq!(try_compare(&empty, &nil).unwrap(), Ordering::Greater);
/// ```
pub fn try_compare(a: &Value, b: &Value) -> Result<Ordering, Error> {
    let mut seen = Vec::new();
    compare_rec(a, b, 0, &mut seen)
}

/// Infallible [`try_compare`].
///
/// # Panics
///
/// Panics on the cyclic input that `try_compare` rejects.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    try_compare(a, b).expect("compare: cyclic value")
}

fn kind_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_rec(
    a: &Value,
    b: &Value,
    depth: usize,
    seen: &mut Vec<(usize, usize)>,
) -> Result<Ordering, Error> {
    let ranks = (kind_rank(a), kind_rank(b));
    if ranks.0 != ranks.1 {
        return Ok(ranks.0.cmp(&ranks.1));
    }
    match (a, b) {
        (Value::Null, Value::Null) => Ok(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => Ok(x.total_cmp(y)),
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::Array(x), Value::Array(y)) => match (&x.0, &y.0) {
            (None, None) => Ok(Ordering::Equal),
            (None, Some(_)) => Ok(Ordering::Less),
            (Some(_), None) => Ok(Ordering::Greater),
            (Some(x), Some(y)) => {
                if Rc::ptr_eq(x, y) {
                    return Ok(Ordering::Equal);
                }
                let pair = (Rc::as_ptr(x) as usize, Rc::as_ptr(y) as usize);
                let entered = enter(depth, pair, seen)?;
                let (xs, ys) = (x.borrow(), y.borrow());
                let mut ordering = xs.len().cmp(&ys.len());
                if ordering == Ordering::Equal {
                    for (xe, ye) in xs.iter().zip(ys.iter()) {
                        ordering = compare_rec(xe, ye, depth + 1, seen)?;
                        if ordering != Ordering::Equal {
                            break;
                        }
                    }
                }
                drop((xs, ys));
                if entered {
                    seen.pop();
                }
                Ok(ordering)
            }
        },
        (Value::Object(x), Value::Object(y)) => match (&x.0, &y.0) {
            (None, None) => Ok(Ordering::Equal),
            (None, Some(_)) => Ok(Ordering::Less),
            (Some(_), None) => Ok(Ordering::Greater),
            (Some(x), Some(y)) => {
                if Rc::ptr_eq(x, y) {
                    return Ok(Ordering::Equal);
                }
                let pair = (Rc::as_ptr(x) as usize, Rc::as_ptr(y) as usize);
                let entered = enter(depth, pair, seen)?;
                let (xs, ys) = (x.borrow(), y.borrow());
                let mut ordering = xs.len().cmp(&ys.len());
                if ordering == Ordering::Equal {
                    let mut xk: Vec<&String> = xs.keys().collect();
                    let mut yk: Vec<&String> = ys.keys().collect();
                    xk.sort_unstable();
                    yk.sort_unstable();
                    ordering = xk.cmp(&yk);
                    if ordering == Ordering::Equal {
                        for k in xk {
                            ordering = compare_rec(&xs[k], &ys[k], depth + 1, seen)?;
                            if ordering != Ordering::Equal {
                                break;
                            }
                        }
                    }
                }
                drop((xs, ys));
                if entered {
                    seen.pop();
                }
                Ok(ordering)
            }
        },
        _ => unreachable!("kind ranks matched"),
    }
}

fn enter(depth: usize, pair: (usize, usize), seen: &mut Vec<(usize, usize)>) -> Result<bool, Error> {
    if depth < CYCLE_LIMIT {
        return Ok(false);
    }
    if seen.contains(&pair) {
        return Err(Error::CycleDetected { depth });
    }
    seen.push(pair);
    Ok(true)
}
