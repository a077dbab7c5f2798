use crate::glob::glob;
use crate::path::Segment;
use crate::value::Value;

/// A predicate over values.
pub trait Filter {
    fn matches(&self, v: &Value) -> bool;
}

/// Matches objects carrying every configured field.
pub struct ObjectFieldFilter(Vec<String>);

impl ObjectFieldFilter {
    pub fn new<I>(fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        ObjectFieldFilter(fields.into_iter().map(Into::into).collect())
    }
}

impl Filter for ObjectFieldFilter {
    fn matches(&self, v: &Value) -> bool {
        if !matches!(v, Value::Object(_)) {
            return false;
        }
        self.0
            .iter()
            .all(|name| v.get(&Segment::from(name.as_str())).is_some())
    }
}

/// Matches values in which a glob pattern finds at least one location.
pub struct GlobFilter(pub String);

impl Filter for GlobFilter {
    fn matches(&self, v: &Value) -> bool {
        let mut found = false;
        match glob(v, &self.0, |_, _| found = true) {
            Ok(()) => found,
            Err(_) => false,
        }
    }
}
