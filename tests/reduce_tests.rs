use dotson::{
    extract, ArrayReducer, FirstReducer, HashReducer, NullReducer, NumericReducer, ObjectReducer,
    PartitionReducer, ReduceOp, Reducer, StringAgg, SumReducer, TrueCounter, Value,
};
use yare::parameterized;

fn add_numbers(r: &mut dyn Reducer, numbers: &[f64]) {
    for n in numbers {
        r.add(&Value::Number(*n));
    }
}

#[parameterized(
    sum = { ReduceOp::Sum, &[1.0, 2.0, 3.0], 6.0 },
    min = { ReduceOp::Min, &[3.0, 1.0, 2.0], 1.0 },
    max = { ReduceOp::Max, &[3.0, 1.0, 2.0], 3.0 },
    any_keeps_first = { ReduceOp::Any, &[7.0, 1.0, 2.0], 7.0 },
    mean = { ReduceOp::Mean, &[1.0, 2.0, 3.0], 2.0 },
    min_negative = { ReduceOp::Min, &[1.0, -4.0], -4.0 },
)]
fn test_numeric_reducer(op: ReduceOp, inputs: &[f64], want: f64) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut r = NumericReducer::new(op);
    add_numbers(&mut r, inputs);
    assert_eq!(r.value(), Some(Value::Number(want)));
}

#[parameterized(
    sum = { ReduceOp::Sum },
    min = { ReduceOp::Min },
    max = { ReduceOp::Max },
    any = { ReduceOp::Any },
    mean = { ReduceOp::Mean },
)]
fn test_numeric_reducer_without_additions_has_no_value(op: ReduceOp) {
    let r = NumericReducer::new(op);
    assert_eq!(r.value(), None);
}

#[test]
fn test_numeric_reducer_ignores_non_numbers() {
    let mut r = NumericReducer::new(ReduceOp::Sum);
    r.add(&Value::String("nope".to_string()));
    assert_eq!(r.value(), None);
    r.add(&Value::Number(2.0));
    r.add(&Value::Bool(true));
    assert_eq!(r.value(), Some(Value::Number(2.0)));
}

#[test]
fn test_value_interleaves_with_add() {
    let mut r = NumericReducer::new(ReduceOp::Sum);
    r.add(&Value::Number(1.0));
    assert_eq!(r.value(), Some(Value::Number(1.0)));
    r.add(&Value::Number(2.0));
    assert_eq!(r.value(), Some(Value::Number(3.0)));
}

#[test]
fn test_sum_reducer_starts_at_zero() {
    let r = SumReducer::new();
    assert_eq!(r.value(), Some(Value::Number(0.0)));
}

#[test]
fn test_true_counter() {
    let mut r = TrueCounter::new();
    for v in [
        Value::Bool(true),
        Value::Bool(false),
        Value::Bool(true),
        Value::Number(1.0),
    ] {
        r.add(&v);
    }
    assert_eq!(r.value(), Some(Value::Number(2.0)));
}

#[test]
fn test_string_agg() {
    let mut r = StringAgg::new();
    r.add(&Value::String("foo".to_string()));
    r.add(&Value::Number(3.0));
    r.add(&Value::String("bar".to_string()));
    assert_eq!(r.value(), Some(Value::String("foobar".to_string())));
}

#[test]
fn test_first_reducer() {
    let mut r = FirstReducer::new();
    assert_eq!(r.value(), None);
    r.add(&Value::Number(1.0));
    r.add(&Value::Number(2.0));
    assert_eq!(r.value(), Some(Value::Number(1.0)));
}

#[test]
fn test_null_reducer() {
    let mut r = NullReducer;
    r.add(&Value::Number(1.0));
    assert_eq!(r.value(), None);
}

#[test]
fn test_hash_reducer_partitions_by_key_fn() {
    let mut r = HashReducer::new(
        |v: &Value| extract(v, "k").and_then(|k| k.as_str().map(str::to_string)),
        || Box::new(SumReducer::new()) as Box<dyn Reducer>,
    );
    for (k, n) in [("a", 1.0), ("a", 2.0), ("b", 40.0)] {
        let v = dotson::from_str(&format!(r#"{{"k": "{k}", "n": {n}}}"#)).unwrap();
        r.add(&v);
    }
    assert_eq!(r.partitions(), 2);

    // Each partition's child saw only whole objects; its sum ignores
    // them, so use the count of collected aggregates instead.
    let Some(Value::Array(out)) = r.value() else {
        panic!("hash reducer reports an array");
    };
    assert_eq!(out.len(), 2);
}

#[test]
fn test_partition_reducer_groups_by_path() {
    let mut r = PartitionReducer::new("k", || Box::new(FirstReducer::new()) as Box<dyn Reducer>);
    for json in [
        r#"{"k": "a", "n": 1}"#,
        r#"{"k": "a", "n": 2}"#,
        r#"{"k": "b", "n": 3}"#,
    ] {
        r.add(&dotson::from_str(json).unwrap());
    }
    assert_eq!(r.partitions(), 2);

    let Some(value) = r.value() else {
        panic!("partition reducer reports a value");
    };
    let mut firsts: Vec<f64> = Vec::new();
    value.each(|_, member| {
        firsts.push(extract(member, "n").and_then(|n| n.as_number()).unwrap());
        true
    });
    firsts.sort_by(f64::total_cmp);
    // The first input of partition "a" and the only input of "b".
    assert_eq!(firsts, [1.0, 3.0]);
}

#[test]
fn test_partition_reducer_misses_group_under_null() {
    let mut r = PartitionReducer::new("k", || Box::new(FirstReducer::new()) as Box<dyn Reducer>);
    r.add(&dotson::from_str(r#"{"k": "a"}"#).unwrap());
    r.add(&dotson::from_str(r#"{"other": 1}"#).unwrap());
    r.add(&dotson::from_str(r#"{"another": 2}"#).unwrap());
    assert_eq!(r.partitions(), 2);
}

#[test]
fn test_object_reducer_fans_out_by_field() {
    let mut r = ObjectReducer::new()
        .field("n", Box::new(NumericReducer::new(ReduceOp::Sum)))
        .field("ok", Box::new(TrueCounter::new()));
    for json in [
        r#"{"n": 1, "ok": true}"#,
        r#"{"n": 2, "ok": false}"#,
        r#"{"ok": true}"#,
    ] {
        r.add(&dotson::from_str(json).unwrap());
    }
    let got = r.value().unwrap();
    assert_eq!(extract(&got, "n"), Some(Value::Number(3.0)));
    assert_eq!(extract(&got, "ok"), Some(Value::Number(2.0)));
}

#[test]
fn test_array_reducer_fans_out_by_position() {
    let mut r = ArrayReducer::new(vec![
        Box::new(NumericReducer::new(ReduceOp::Sum)) as Box<dyn Reducer>,
        Box::new(NumericReducer::new(ReduceOp::Max)) as Box<dyn Reducer>,
    ]);
    for json in ["[1, 10]", "[2, 20]"] {
        r.add(&dotson::from_str(json).unwrap());
    }
    let got = r.value().unwrap();
    assert_eq!(extract(&got, "0"), Some(Value::Number(3.0)));
    assert_eq!(extract(&got, "1"), Some(Value::Number(20.0)));
}

#[test]
fn test_structural_reducer_reports_sentinel_as_null() {
    let r = ObjectReducer::new().field("n", Box::new(NumericReducer::new(ReduceOp::Mean)));
    let got = r.value().unwrap();
    assert_eq!(extract(&got, "n"), Some(Value::Null));
}
