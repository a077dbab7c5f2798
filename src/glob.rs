use log::trace;

use crate::error::Error;
use crate::path::{cut_raw, push_key, segment_from_raw};
use crate::value::{Value, CYCLE_LIMIT};

/// One pending search step: the remaining pattern, the joined path so
/// far, the value there, its depth, and — past the cycle threshold —
/// the container addresses on its ancestor chain.
struct WorkItem<'p> {
    pattern: &'p str,
    path: String,
    value: Value,
    depth: usize,
    ancestors: Vec<usize>,
}

/// Searches `v` for every location matching the glob `pattern` and
/// reports each one to `visit_fn` as `(joined path, value)`.
///
/// The search runs an explicit worklist rather than a full tree walk:
/// a literal segment narrows to the one matching child, `*` fans out
/// one level over all children, and `**` matches any run of segments,
/// including the empty one — `glob(v, "**", …)` reports the root path
/// `""` and every descendant. Consecutive `**` segments collapse
/// before fanning out. Report order is unspecified.
///
/// A cyclic value under a `**` pattern fails fast with
/// [`Error::CycleDetected`] once the search passes the cycle
/// threshold.
///
/// ```
/// use dotson::glob_keys;
///
/// let v = dotson::from_str(r#"{"a": {"k1": [1, 2]}}"#).unwrap();
/// assert_eq!(glob_keys(&v, "**.0").unwrap(), ["a.k1.0"]);
/// ```
pub fn glob<F>(v: &Value, pattern: &str, mut visit_fn: F) -> Result<(), Error>
where
    F: FnMut(&str, &Value),
{
    let mut frontier = vec![WorkItem {
        pattern,
        path: String::new(),
        value: v.clone(),
        depth: 0,
        ancestors: Vec::new(),
    }];
    while let Some(item) = frontier.pop() {
        if item.pattern.is_empty() {
            trace!("glob: match at {:?}", item.path);
            visit_fn(&item.path, &item.value);
            continue;
        }
        let (raw, tail, _) = cut_raw(item.pattern);
        match raw {
            "**" => {
                // Collapse runs of recursive wildcards; they add
                // nothing but duplicate work items.
                let mut rest = tail;
                while !rest.is_empty() {
                    let (next, next_tail, _) = cut_raw(rest);
                    if next != "**" {
                        break;
                    }
                    rest = next_tail;
                }
                // Zero segments consumed here...
                frontier.push(WorkItem {
                    pattern: rest,
                    path: item.path.clone(),
                    value: item.value.clone(),
                    depth: item.depth,
                    ancestors: item.ancestors.clone(),
                });
                // ...or one consumed, staying in recursive mode.
                fan_out(&mut frontier, &item, item.pattern)?;
            }
            "*" => fan_out(&mut frontier, &item, tail)?,
            _ => {
                let segment = segment_from_raw(raw);
                if let Some(child) = item.value.get(&segment) {
                    let mut child_path = item.path.clone();
                    push_key(&mut child_path, &segment);
                    frontier.push(WorkItem {
                        pattern: tail,
                        path: child_path,
                        value: child,
                        depth: item.depth + 1,
                        ancestors: item.ancestors.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Queues every child of `item` with `child_pattern`, carrying the
/// ancestor address chain once the search is deep enough for cycle
/// tracking.
fn fan_out<'p>(
    frontier: &mut Vec<WorkItem<'p>>,
    item: &WorkItem<'p>,
    child_pattern: &'p str,
) -> Result<(), Error> {
    let ancestors = match item.value.storage_addr() {
        Some(addr) if item.depth >= CYCLE_LIMIT => {
            if item.ancestors.contains(&addr) {
                return Err(Error::CycleDetected { depth: item.depth });
            }
            let mut chain = item.ancestors.clone();
            chain.push(addr);
            chain
        }
        _ => item.ancestors.clone(),
    };
    item.value.each(|segment, child| {
        let mut child_path = item.path.clone();
        push_key(&mut child_path, &segment);
        frontier.push(WorkItem {
            pattern: child_pattern,
            path: child_path,
            value: child.clone(),
            depth: item.depth + 1,
            ancestors: ancestors.clone(),
        });
        true
    });
    Ok(())
}

/// Collects the joined paths matching `pattern`, in unspecified order.
pub fn glob_keys(v: &Value, pattern: &str) -> Result<Vec<String>, Error> {
    let mut keys = Vec::new();
    glob(v, pattern, |key, _| keys.push(key.to_string()))?;
    Ok(keys)
}

/// Collects the values matching `pattern`, in unspecified order.
pub fn glob_values(v: &Value, pattern: &str) -> Result<Vec<Value>, Error> {
    let mut values = Vec::new();
    glob(v, pattern, |_, val| values.push(val.clone()))?;
    Ok(values)
}
