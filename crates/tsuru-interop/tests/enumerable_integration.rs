//! Sequence-adapter properties against the fake foreign environment
//!
//! Pins the enumeration contract: ascending index order, restartability,
//! fresh size on every query, and failure (not emptiness) for unsizable
//! foreign values.

use tsuru_core::{InteropError, Value};
use tsuru_interop::{enumerable, to_array};
use tsuru_testkit::FakeRuntime;

fn int_list(world: &FakeRuntime, len: i64) -> tsuru_core::ForeignHandle {
    world.list((0..len).map(Value::Int).collect())
}

#[test]
fn test_yields_exactly_size_elements_in_index_order() {
    let world = FakeRuntime::new();
    for len in [0i64, 1, 2, 7, 32] {
        let list = int_list(&world, len);
        let elements = enumerable(&world, list).to_vec().unwrap();
        let expected: Vec<Value> = (0..len).map(Value::Int).collect();
        assert_eq!(elements, expected);
    }
}

#[test]
fn test_reiteration_yields_the_same_sequence() {
    let world = FakeRuntime::new();
    let list = int_list(&world, 5);
    let view = enumerable(&world, list);

    let first = view.to_vec().unwrap();
    let second = view.to_vec().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_foreign_growth_is_observed_on_the_next_pass() {
    let world = FakeRuntime::new();
    let list = int_list(&world, 2);
    let view = enumerable(&world, list);

    let mut pass = view.iter().unwrap();
    assert_eq!(pass.next().unwrap().unwrap(), Value::Int(0));

    // The foreign side grows mid-pass: the running pass keeps its fixed
    // bound, the next pass sees the new length.
    world.push(list, Value::Int(2));
    assert_eq!(pass.count(), 1);
    assert_eq!(view.size().unwrap(), 3);
    assert_eq!(view.to_vec().unwrap().len(), 3);
}

#[test]
fn test_unsizable_is_a_failure_not_an_empty_sequence() {
    let world = FakeRuntime::new();
    let record = world.record(&[("length", Value::Int(3))]);
    let text = world.text("abc");

    for handle in [record, text] {
        let view = enumerable(&world, handle);
        assert!(matches!(view.iter(), Err(InteropError::NotSizable(_))));
    }
}

#[test]
fn test_to_array_matches_enumeration() {
    let world = FakeRuntime::new();
    let list = world.list(vec![
        Value::Str("a".to_string()),
        Value::Str("b".to_string()),
    ]);

    assert_eq!(
        to_array(&world, list).unwrap(),
        enumerable(&world, list).to_vec().unwrap()
    );
}

#[test]
fn test_derived_operations_need_only_size_and_read() {
    let world = FakeRuntime::new();
    let list = int_list(&world, 6);
    let view = enumerable(&world, list);

    let evens: Vec<i64> = view
        .iter()
        .unwrap()
        .filter_map(|item| match item {
            Ok(Value::Int(n)) if n % 2 == 0 => Some(n),
            _ => None,
        })
        .collect();
    assert_eq!(evens, vec![0, 2, 4]);

    let total = view
        .iter()
        .unwrap()
        .try_fold(0i64, |acc, item| {
            item.map(|v| match v {
                Value::Int(n) => acc + n,
                _ => acc,
            })
        })
        .unwrap();
    assert_eq!(total, 15);
}
