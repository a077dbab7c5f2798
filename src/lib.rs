//! # dotson
//!
//! A small embeddable engine for JSON-like data: a canonical in-memory
//! value model plus a dotted/glob path language for reading, writing,
//! deleting, comparing, sorting, merging and aggregating values — a
//! minimal `jq`-like core used as a library rather than a shell tool.
//!
//! ## Features
//!
//! - **Canonical values:** the closed set `{Null, Boolean, Number,
//!   String, Array, Object}`, with nil containers distinct from empty
//!   ones and cheap aliasing handles (mutation through one handle is
//!   visible through every alias).
//! - **Dotted paths:** `a.b.0` addresses nested fields and indices;
//!   quoting (`"weird.key"`) makes any field addressable; `*` and `**`
//!   glob over one or many segments.
//! - **Operations:** [`extract`], [`delete`], [`merge`], [`glob`],
//!   [`visit`], a total-order [`compare`], [`sort`]/[`sort_by_key`],
//!   streaming [`Reducer`]s and composable [`Mapper`]s.
//! - **Boundaries:** JSON text in and out through serde_json
//!   ([`from_str`], [`to_string`], a re-invocable [`Decoder`]), and
//!   ingestion of any `serde::Serialize` host value via [`to_value`].
//!
//! ## Examples
//!
//! ### Reading and writing through paths
//!
//! ```rust
//! use dotson::{delete, extract, merge, Value};
//!
//! let v = dotson::from_str(r#"{"a": [1, 2, 3]}"#).unwrap();
//! assert_eq!(extract(&v, "a.1"), Some(Value::Number(2.0)));
//!
//! // Deleting an array slot nulls it in place, keeping siblings put.
//! let v = delete(&v, "a.1");
//! assert_eq!(extract(&v, "a.1"), Some(Value::Null));
//!
//! // Merging grafts a subtree, materializing containers on the way.
//! let src = dotson::from_str("42").unwrap();
//! let v = merge(&v, &src, "b.deep", "").unwrap();
//! assert_eq!(extract(&v, "b.deep"), Some(Value::Number(42.0)));
//! ```
//!
//! ### Globbing
//!
//! ```rust
//! let v = dotson::from_str(r#"{"a": {"k1": [1, 2]}}"#).unwrap();
//!
//! let mut keys = dotson::glob_keys(&v, "**.0").unwrap();
//! keys.sort();
//! assert_eq!(keys, ["a.k1.0"]);
//! ```
//!
//! ### Sorting and aggregating
//!
//! ```rust
//! use dotson::{extract, sort_by_key, NumericReducer, ReduceOp, Reducer, Value};
//!
//! let v = dotson::from_str(r#"[{"v": 2}, {"v": 1}]"#).unwrap();
//! let v = sort_by_key(&v, "v").unwrap();
//! assert_eq!(extract(&v, "0.v"), Some(Value::Number(1.0)));
//!
//! let mut mean = NumericReducer::new(ReduceOp::Mean);
//! mean.add(&Value::Number(1.0));
//! mean.add(&Value::Number(3.0));
//! assert_eq!(mean.value(), Some(Value::Number(2.0)));
//! ```
//!
//! ## Aliasing and mutation
//!
//! Mutating operations (`put`, `delete`, `merge`, `sort`) are
//! destructive and run in place; cloning a `Value` aliases container
//! storage rather than copying it. Use [`Value::deep_clone`] for an
//! independent copy. Handles are single-threaded by construction;
//! sharing across threads means moving deep clones.

mod codec;
mod compare;
mod delete;
mod error;
mod extract;
mod filter;
mod glob;
mod ingest;
mod map;
mod merge;
mod path;
mod reduce;
mod sort;
mod value;
mod visit;

pub use codec::{from_slice, from_str, to_string, to_writer, Decoder};
pub use compare::{compare, try_compare};
pub use delete::delete;
pub use error::Error;
pub use extract::extract;
pub use filter::{Filter, GlobFilter, ObjectFieldFilter};
pub use glob::{glob, glob_keys, glob_values};
pub use ingest::to_value;
pub use map::{
    AddScalar, ArrayMapper, ArrayRemapper, Ident, MapSeq, Mapper, Math2Mapper, MathMapper,
    MulScalar, ObjectMapper, ObjectRemapper, Remap,
};
pub use merge::merge;
pub use path::{
    cut, each_segment, is_leaf, join_key, push_key, KeyMatcher, Limits, Segment, GLOB, SEP,
};
pub use reduce::{
    ArrayReducer, FirstReducer, HashReducer, NullReducer, NumericReducer, ObjectReducer,
    PartitionReducer, ReduceOp, Reducer, StringAgg, SumReducer, TrueCounter,
};
pub use sort::{sort, sort_by_key};
pub use value::{Array, Object, Value};
pub use visit::{visit, Flow};
