use dotson::{
    delete, extract, glob_keys, glob_values, merge, visit, Error, Filter, Flow, GlobFilter,
    ObjectFieldFilter, Segment, Value,
};
use yare::parameterized;

fn nested() -> Value {
    dotson::from_str(r#"{"a": {"k1": ["a", "b", "c"], "k2": ["a", "b", "c"], "k3": ["a", "b", "c"]}}"#)
        .unwrap()
}

#[parameterized(
    array_index = { r#"{"a": [1, 2, 3]}"#, "a.1", Some(Value::Number(2.0)) },
    nested_field = { r#"{"a": {"b": null}}"#, "a.b", Some(Value::Null) },
    missing_field = { r#"{"a": 1}"#, "b", None },
    out_of_range = { r#"{"a": [1]}"#, "a.3", None },
    scalar_lookup = { r#"{"a": 1}"#, "a.b", None },
    empty_segment = { r#"{"a": 1}"#, "a..b", None },
    trailing_separator = { r#"{"a": 1}"#, "a.", None },
    quoted_field = { r#"{"weird.key": 1}"#, "\"weird.key\"", Some(Value::Number(1.0)) },
    quoted_digit_field = { r#"{"1": "one"}"#, "\"1\"", Some(Value::String("one".to_string())) },
    unquoted_digit_misses_object = { r#"{"1": "one"}"#, "1", None },
)]
fn test_extract(json: &str, path: &str, want: Option<Value>) {
    let v = dotson::from_str(json).unwrap();
    assert_eq!(extract(&v, path), want);
}

#[test]
fn test_extract_empty_path_returns_whole_value() {
    let v = nested();
    let whole = extract(&v, "").unwrap();
    assert_eq!(whole, v);
}

#[test]
fn test_delete_map_entry() {
    let v = dotson::from_str(r#"{"a": 1, "b": 2, "c": 3}"#).unwrap();
    let v = delete(&v, "a");
    assert_eq!(extract(&v, "a"), None);
    assert_eq!(v.as_object().unwrap().len(), 2);
}

#[test]
fn test_delete_array_slot() {
    let v = dotson::from_str("[1, 2, 3]").unwrap();
    let v = delete(&v, "1");
    assert_eq!(dotson::to_string(&v).unwrap(), "[1.0,null,3.0]");
}

#[test]
fn test_delete_nested_path() {
    let v = dotson::from_str(r#"{"a": [null, {"b": null}, null]}"#).unwrap();
    let v = delete(&v, "a.1.b");
    assert_eq!(extract(&v, "a.1.b"), None);
    assert_eq!(extract(&v, "a.1").unwrap().as_object().unwrap().len(), 0);
    assert_eq!(extract(&v, "a").unwrap().as_array().unwrap().len(), 3);
}

#[parameterized(
    empty_path = { "" },
    missing_intermediate = { "x.y" },
    out_of_range = { "a.9.z" },
    trailing_separator = { "a." },
)]
fn test_delete_no_ops(path: &str) {
    let v = dotson::from_str(r#"{"a": [1, 2, 3]}"#).unwrap();
    let got = delete(&v, path);
    assert_eq!(got, dotson::from_str(r#"{"a": [1, 2, 3]}"#).unwrap());
}

#[test]
fn test_merge_into_null_replaces_root() {
    let src = dotson::from_str(r#"{"a": 1, "b": 2}"#).unwrap();
    let got = merge(&Value::Null, &src, "", "").unwrap();
    assert_eq!(got, src);
}

#[test]
fn test_merge_promotes_null_by_segment_kind() {
    let src = dotson::from_str("7").unwrap();

    // An index segment makes an array sized to hold it.
    let got = merge(&Value::Null, &src, "2", "").unwrap();
    assert_eq!(extract(&got, "2"), Some(Value::Number(7.0)));
    assert_eq!(got.as_array().unwrap().len(), 3);
    assert_eq!(extract(&got, "0"), Some(Value::Null));

    // A field segment makes an object.
    let got = merge(&Value::Null, &src, "x.y", "").unwrap();
    assert_eq!(extract(&got, "x.y"), Some(Value::Number(7.0)));
}

#[test]
fn test_merge_never_grows_arrays() {
    let dst = dotson::from_str(r#"{"a": [1]}"#).unwrap();
    let src = dotson::from_str("9").unwrap();
    let got = merge(&dst, &src, "a.5", "").unwrap();
    assert_eq!(extract(&got, "a.5"), None);
    assert_eq!(extract(&got, "a").unwrap().as_array().unwrap().len(), 1);
}

#[test]
fn test_merge_terminal_is_whole_value_replacement() {
    let dst = dotson::from_str(r#"{"a": {"x": 1}}"#).unwrap();
    let src = dotson::from_str(r#"{"wrap": {"y": 2}}"#).unwrap();
    let got = merge(&dst, &src, "a", "wrap").unwrap();
    assert_eq!(extract(&got, "a.x"), None);
    assert_eq!(extract(&got, "a.y"), Some(Value::Number(2.0)));
}

#[test]
fn test_merge_missing_source_path() {
    let dst = dotson::from_str(r#"{"a": 1}"#).unwrap();
    let src = dotson::from_str(r#"{"b": 2}"#).unwrap();
    assert!(merge(&dst, &src, "a", "nope").is_none());
}

#[test]
fn test_merge_scalar_in_the_way_stops_the_graft() {
    let dst = dotson::from_str(r#"{"a": 1}"#).unwrap();
    let src = dotson::from_str("9").unwrap();
    let got = merge(&dst, &src, "a.b.c", "").unwrap();
    assert_eq!(got, dotson::from_str(r#"{"a": 1}"#).unwrap());
}

#[parameterized(
    object_leaf = { "a.b" },
    array_slot = { "list.1" },
    deep = { "a.b.c.d" },
)]
fn test_merge_extract_round_trip(path: &str) {
    let dst = dotson::from_str(r#"{"list": [0, 0, 0]}"#).unwrap();
    let src = dotson::from_str(r#"{"k": [true, false]}"#).unwrap();
    let got = merge(&dst, &src, path, "").unwrap();
    assert_eq!(extract(&got, path), Some(src.clone()));
}

#[test]
fn test_delete_after_merge_leaves_slot_absent() {
    let v = dotson::from_str(r#"{"list": [0, 0]}"#).unwrap();
    let x = dotson::from_str("5").unwrap();

    let merged = merge(&v, &x, "k.deep", "").unwrap();
    let pruned = delete(&merged, "k.deep");
    assert_eq!(extract(&pruned, "k.deep"), None);

    let merged = merge(&v, &x, "list.1", "").unwrap();
    let pruned = delete(&merged, "list.1");
    assert_eq!(extract(&pruned, "list.1"), Some(Value::Null));
}

#[test]
fn test_merge_grafts_aliases() {
    let dst = dotson::from_str(r#"{"d": null}"#).unwrap();
    let src = dotson::from_str(r#"{"s": {"k": 1}}"#).unwrap();
    let got = merge(&dst, &src, "d", "s").unwrap();

    // The grafted subtree is shared with the source.
    let grafted = extract(&got, "d").unwrap();
    grafted.put(&Segment::from("k"), Value::Number(2.0));
    assert_eq!(extract(&src, "s.k"), Some(Value::Number(2.0)));
}

fn sorted(mut keys: Vec<String>) -> Vec<String> {
    keys.sort();
    keys
}

#[test]
fn test_glob_one_level() {
    let got = sorted(glob_keys(&nested(), "a.*").unwrap());
    assert_eq!(got, ["a.k1", "a.k2", "a.k3"]);
}

#[test]
fn test_glob_two_levels() {
    let got = sorted(glob_keys(&nested(), "a.*.*").unwrap());
    assert_eq!(
        got,
        [
            "a.k1.0", "a.k1.1", "a.k1.2", "a.k2.0", "a.k2.1", "a.k2.2", "a.k3.0", "a.k3.1",
            "a.k3.2",
        ]
    );
}

#[test]
fn test_glob_double_star_reports_every_path_once() {
    let got = sorted(glob_keys(&nested(), "**").unwrap());
    assert_eq!(
        got,
        [
            "", "a", "a.k1", "a.k1.0", "a.k1.1", "a.k1.2", "a.k2", "a.k2.0", "a.k2.1", "a.k2.2",
            "a.k3", "a.k3.0", "a.k3.1", "a.k3.2",
        ]
    );
}

#[test]
fn test_glob_double_star_suffix() {
    let v = dotson::from_str(r#"{"a": {"k1": [1, 2]}}"#).unwrap();
    assert_eq!(glob_keys(&v, "**.0").unwrap(), ["a.k1.0"]);
}

#[test]
fn test_glob_collapses_consecutive_double_stars() {
    let got = sorted(glob_keys(&nested(), "**.**").unwrap());
    assert_eq!(got, sorted(glob_keys(&nested(), "**").unwrap()));
}

#[test]
fn test_glob_double_star_matches_visit() {
    let v = nested();
    let mut walked = Vec::new();
    visit(&v, |path, _| {
        walked.push(path.to_string());
        Ok(Flow::Continue)
    })
    .unwrap();
    assert_eq!(sorted(glob_keys(&v, "**").unwrap()), sorted(walked));
}

#[test]
fn test_glob_values() {
    let v = dotson::from_str(r#"{"a": {"k1": [10, 20]}}"#).unwrap();
    let got = glob_values(&v, "a.k1.*").unwrap();
    let mut nums: Vec<f64> = got.iter().filter_map(Value::as_number).collect();
    nums.sort_by(f64::total_cmp);
    assert_eq!(nums, [10.0, 20.0]);
}

#[test]
fn test_glob_quoted_star_is_literal() {
    let v = dotson::from_str(r#"{"*": 1, "b": 2}"#).unwrap();
    let got = glob_keys(&v, "\"*\"").unwrap();
    assert_eq!(got, [r#""*""#]);
}

#[test]
fn test_glob_empty_pattern_reports_root() {
    let v = nested();
    assert_eq!(glob_keys(&v, "").unwrap(), [""]);
}

#[test]
fn test_visit_preorder_paths() {
    let v = dotson::from_str(r#"{"a": 1, "b": 2, "c": [false, true, {"d": false}]}"#).unwrap();
    let mut got = Vec::new();
    visit(&v, |path, _| {
        got.push(path.to_string());
        Ok(Flow::Continue)
    })
    .unwrap();
    got.sort();
    assert_eq!(got, ["", "a", "b", "c", "c.0", "c.1", "c.2", "c.2.d"]);
}

#[test]
fn test_visit_skip_prunes_children() {
    let v = dotson::from_str(r#"{"c": [1, 2]}"#).unwrap();
    let mut got = Vec::new();
    visit(&v, |path, value| {
        got.push(path.to_string());
        if matches!(value, Value::Array(_)) {
            Ok(Flow::Skip)
        } else {
            Ok(Flow::Continue)
        }
    })
    .unwrap();
    got.sort();
    assert_eq!(got, ["", "c"]);
}

#[test]
fn test_visit_stop_is_success() {
    let v = nested();
    let mut count = 0;
    visit(&v, |_, _| {
        count += 1;
        Ok(Flow::Stop)
    })
    .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_visit_error_propagates() {
    let v = nested();
    let err = visit(&v, |_, _| Err(Error::Message("boom".to_string()))).unwrap_err();
    assert!(matches!(err, Error::Message(_)));
}

#[test]
fn test_object_field_filter() {
    let filter = ObjectFieldFilter::new(["a", "b"]);
    assert!(filter.matches(&dotson::from_str(r#"{"a": 1, "b": 2, "c": 3}"#).unwrap()));
    assert!(!filter.matches(&dotson::from_str(r#"{"a": 1}"#).unwrap()));
    assert!(!filter.matches(&Value::Number(1.0)));
}

#[test]
fn test_glob_filter() {
    let filter = GlobFilter("**.k".to_string());
    assert!(filter.matches(&dotson::from_str(r#"{"a": {"k": 1}}"#).unwrap()));
    assert!(!filter.matches(&dotson::from_str(r#"{"a": {"x": 1}}"#).unwrap()));
}
