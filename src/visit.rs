use crate::error::Error;
use crate::path::push_key;
use crate::value::{Value, CYCLE_LIMIT};

/// Visitor verdict for one node of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Descend into this value's children.
    #[default]
    Continue,
    /// Keep walking siblings, but do not descend here.
    Skip,
    /// End the whole traversal; reported to the caller as success.
    Stop,
}

/// Walks `v` depth-first in pre-order, starting at the root with path
/// `""`.
///
/// The callback receives each node's joined path and the node itself.
/// Array children are visited in index order, object children in
/// unspecified order. Returning an `Err` aborts the walk and
/// propagates; [`Flow::Stop`] ends it normally. A cyclic value fails
/// fast with [`Error::CycleDetected`] once the walk passes the cycle
/// threshold.
///
/// ```
/// use dotson::{visit, Flow};
///
/// let v = dotson::from_str(r#"{"a": {"b": 1}}"#).unwrap();
/// let mut paths = Vec::new();
/// visit(&v, |path, _| {
///     paths.push(path.to_string());
///     Ok(Flow::Continue)
/// })
/// .unwrap();
/// paths.sort();
/// assert_eq!(paths, ["", "a", "a.b"]);
/// ```
pub fn visit<F>(v: &Value, mut visit_fn: F) -> Result<(), Error>
where
    F: FnMut(&str, &Value) -> Result<Flow, Error>,
{
    let mut seen = Vec::new();
    visit_rec("", v, 0, &mut seen, &mut visit_fn).map(|_| ())
}

fn visit_rec<F>(
    path: &str,
    v: &Value,
    depth: usize,
    seen: &mut Vec<usize>,
    visit_fn: &mut F,
) -> Result<Flow, Error>
where
    F: FnMut(&str, &Value) -> Result<Flow, Error>,
{
    match visit_fn(path, v)? {
        Flow::Skip => return Ok(Flow::Continue),
        Flow::Stop => return Ok(Flow::Stop),
        Flow::Continue => {}
    }
    let entered = match v.storage_addr() {
        Some(addr) if depth >= CYCLE_LIMIT => {
            if seen.contains(&addr) {
                return Err(Error::CycleDetected { depth });
            }
            seen.push(addr);
            true
        }
        _ => false,
    };
    let mut result = Ok(Flow::Continue);
    v.each(|segment, child| {
        let mut child_path = String::with_capacity(path.len() + 8);
        child_path.push_str(path);
        push_key(&mut child_path, &segment);
        match visit_rec(&child_path, child, depth + 1, seen, visit_fn) {
            Ok(Flow::Continue) => true,
            stop_or_err => {
                result = stop_or_err;
                false
            }
        }
    });
    if entered {
        seen.pop();
    }
    result
}
