use std::collections::HashMap;

use dotson::{extract, to_value, try_compare, Array, Decoder, Error, Object, Segment, Value};
use serde::Serialize;
use yare::parameterized;

fn fixture() -> Value {
    dotson::from_str(r#"{"a": [1, 2, 3], "b": {"c": true}}"#).unwrap()
}

#[test]
fn test_get_hits_and_misses() {
    let v = fixture();
    assert_eq!(extract(&v, "a.0"), Some(Value::Number(1.0)));
    assert_eq!(extract(&v, "b.c"), Some(Value::Bool(true)));
    // Out-of-range index and scalar lookups miss rather than fail.
    assert_eq!(v.get(&Segment::from("missing")), None);
    assert_eq!(Value::Number(1.0).get(&Segment::Index(0)), None);
    // A field segment never addresses an array, nor an index an object.
    assert_eq!(v.get(&Segment::Index(0)), None);
    assert_eq!(extract(&v, "a.c"), None);
}

#[test]
fn test_array_delete_nulls_slot_in_place() {
    let v = dotson::from_str("[1, 2, 3]").unwrap();
    v.delete(&Segment::Index(1));
    assert_eq!(extract(&v, "1"), Some(Value::Null));
    assert_eq!(extract(&v, "2"), Some(Value::Number(3.0)));
    assert_eq!(v.as_array().unwrap().len(), 3);

    // Out of range: nothing to do.
    v.delete(&Segment::Index(9));
    assert_eq!(v.as_array().unwrap().len(), 3);
}

#[test]
fn test_object_delete_removes_entry() {
    let v = fixture();
    v.delete(&Segment::from("a"));
    assert_eq!(extract(&v, "a"), None);
    assert_eq!(v.as_object().unwrap().len(), 1);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_array_put_out_of_range_panics() {
    let a = Array::with_len(2);
    a.put(2, Value::Null);
}

#[test]
fn test_object_put_overwrites() {
    let o = Object::new();
    o.put("k", Value::Number(1.0));
    o.put("k", Value::Number(2.0));
    assert_eq!(o.len(), 1);
    assert_eq!(o.get("k"), Some(Value::Number(2.0)));
}

#[test]
fn test_aliases_observe_mutation() {
    let v = fixture();
    let alias = v.clone();
    v.put(&Segment::from("b"), Value::Number(9.0));
    assert_eq!(extract(&alias, "b"), Some(Value::Number(9.0)));

    let inner = extract(&v, "a").unwrap();
    inner.put(&Segment::Index(0), Value::String("x".to_string()));
    assert_eq!(extract(&alias, "a.0"), Some(Value::String("x".to_string())));
}

#[test]
fn test_deep_clone_is_independent() {
    let v = fixture();
    let copy = v.deep_clone().unwrap();
    assert_eq!(copy, v);
    v.put(&Segment::from("b"), Value::Null);
    assert_ne!(copy, v);
    assert_eq!(extract(&copy, "b.c"), Some(Value::Bool(true)));
}

#[test]
fn test_nil_and_empty_are_distinct() {
    let nil = Value::Array(Array::nil());
    let empty = Value::Array(Array::new());
    assert_ne!(nil, empty);
    assert!(Array::nil().is_nil());
    assert_eq!(Array::nil().len(), 0);
    assert_eq!(Object::nil().get("k"), None);
}

fn cyclic() -> Value {
    let a = Array::with_len(1);
    let v = Value::Array(a.clone());
    a.put(0, v.clone());
    v
}

#[test]
fn test_cyclic_value_fails_fast() {
    let v = cyclic();
    assert!(matches!(to_value(&v), Err(Error::CycleDetected { .. })));
    assert!(matches!(v.deep_clone(), Err(Error::CycleDetected { .. })));
    assert!(matches!(
        try_compare(&v, &cyclic()),
        Err(Error::CycleDetected { .. })
    ));
    // A value is always equal to itself without recursing.
    assert_eq!(try_compare(&v, &v).unwrap(), std::cmp::Ordering::Equal);
}

#[parameterized(
    boolean = { Value::from(true), Value::Bool(true) },
    integer = { Value::from(7u8), Value::Number(7.0) },
    float = { Value::from(1.5f64), Value::Number(1.5) },
    text = { Value::from("hi"), Value::String("hi".to_string()) },
    none = { Value::from(None::<i32>), Value::Null },
    some = { Value::from(Some(3)), Value::Number(3.0) },
)]
fn test_from_primitives(got: Value, want: Value) {
    assert_eq!(got, want);
}

#[test]
fn test_from_collections() {
    let v = Value::from(vec![1, 2]);
    assert_eq!(extract(&v, "1"), Some(Value::Number(2.0)));

    let mut m = HashMap::new();
    m.insert("k".to_string(), "v");
    let v = Value::from(m);
    assert_eq!(extract(&v, "k"), Some(Value::String("v".to_string())));
}

#[test]
fn test_to_value_is_idempotent_on_canonical_values() {
    let v = fixture();
    let again = to_value(&v).unwrap();
    assert_eq!(again, v);
    assert_eq!(
        try_compare(&again, &v).unwrap(),
        std::cmp::Ordering::Equal
    );
}

#[derive(Serialize)]
struct Inner {
    c: bool,
}

#[derive(Serialize)]
struct Record {
    a: u32,
    b: Option<String>,
    #[serde(flatten)]
    inner: Inner,
}

#[test]
fn test_to_value_struct() {
    let v = to_value(&Record {
        a: 1,
        b: None,
        inner: Inner { c: true },
    })
    .unwrap();
    assert_eq!(extract(&v, "a"), Some(Value::Number(1.0)));
    assert_eq!(extract(&v, "b"), Some(Value::Null));
    // Flattened fields land on the record itself.
    assert_eq!(extract(&v, "c"), Some(Value::Bool(true)));
}

#[test]
fn test_to_value_integer_map_keys_become_strings() {
    let mut m = HashMap::new();
    m.insert(1u32, "one");
    let v = to_value(&m).unwrap();
    assert_eq!(extract(&v, "\"1\""), Some(Value::String("one".to_string())));
}

#[test]
fn test_to_value_rejects_non_string_map_keys() {
    let mut m = HashMap::new();
    m.insert(true, 1);
    assert!(matches!(to_value(&m), Err(Error::UnsupportedType(_))));
}

struct Blob(Vec<u8>);

impl Serialize for Blob {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

#[test]
fn test_to_value_bytes_become_string() {
    let v = to_value(&Blob(b"hi".to_vec())).unwrap();
    assert_eq!(v, Value::String("hi".to_string()));
}

#[test]
fn test_decode_structure() {
    let v = dotson::from_str(r#"{"a": [1, 2, 3]}"#).unwrap();
    let a = extract(&v, "a").unwrap();
    assert_eq!(a.as_array().unwrap().len(), 3);
    assert_eq!(extract(&v, "a.1"), Some(Value::Number(2.0)));
}

#[test]
fn test_decode_duplicate_keys_keep_last() {
    let v = dotson::from_str(r#"{"a": 1, "a": 2}"#).unwrap();
    assert_eq!(extract(&v, "a"), Some(Value::Number(2.0)));
    assert_eq!(v.as_object().unwrap().len(), 1);
}

#[test]
fn test_decode_concatenated_stream() {
    let mut decoder = Decoder::new(&br#"1 "two" [3] {"four": 4}"#[..]);
    assert_eq!(decoder.decode().unwrap(), Value::Number(1.0));
    assert_eq!(decoder.decode().unwrap(), Value::String("two".to_string()));
    assert_eq!(extract(&decoder.decode().unwrap(), "0"), Some(Value::Number(3.0)));
    assert_eq!(
        extract(&decoder.decode().unwrap(), "four"),
        Some(Value::Number(4.0))
    );
    assert!(decoder.decode().is_err());
}

#[test]
fn test_decode_error_carries_position() {
    let err = dotson::from_str("{nope}").unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(err.to_string().contains("line"));
}

#[test]
fn test_encode_preserves_array_order_and_null() {
    let v = dotson::from_str("[1, null, 3]").unwrap();
    assert_eq!(dotson::to_string(&v).unwrap(), "[1.0,null,3.0]");
}

#[test]
fn test_encode_nil_containers_as_null() {
    assert_eq!(dotson::to_string(&Value::Array(Array::nil())).unwrap(), "null");
    assert_eq!(dotson::to_string(&Value::Object(Object::nil())).unwrap(), "null");
}

#[test]
fn test_serde_json_round_trip() {
    let v = fixture();
    let js = serde_json::Value::from(&v);
    assert_eq!(Value::from(js), v);
}
