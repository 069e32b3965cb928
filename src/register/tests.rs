use super::*;
use crate::valuenode::{MethodCall, Primitive};
use crate::common::types::MethodSignature;

fn sig(name: &str) -> MethodSignature {
    MethodSignature::new("Lcom/example/Foo;", name, "()V")
}

#[test]
fn bears_object_true_when_no_type_hint() {
    let obj = RegisterObject::new(Primitive::new("0", None::<String>), None);
    assert!(obj.bears_object());
}

#[test]
fn bears_object_true_for_reference_type() {
    let obj = RegisterObject::new(
        Primitive::new("0", None::<String>),
        Some("Lcom/example/Bar;".to_string()),
    );
    assert!(obj.bears_object());
}

#[test]
fn bears_object_false_for_primitive_type() {
    let obj = RegisterObject::new(Primitive::new("5", Some("I")), Some("I".to_string()));
    assert!(!obj.bears_object());
}

#[test]
fn record_call_appends_rather_than_replaces() {
    let mut obj = RegisterObject::new(Primitive::new("0", None::<String>), None);
    let call_a = MethodCall::new(sig("a"), vec![]);
    let call_b = MethodCall::new(sig("b"), vec![]);
    obj.record_call(call_a.clone());
    obj.record_call(call_b.clone());
    assert_eq!(obj.called_by().len(), 2);
    assert!(obj.called_by()[0].is_same_node(&call_a));
    assert!(obj.called_by()[1].is_same_node(&call_b));
}

#[test]
fn iterate_involved_calls_flattens_every_called_by_entry() {
    let value = Primitive::new("0", None::<String>);
    let inner = MethodCall::new(sig("inner"), vec![value.clone()]);
    let outer = MethodCall::new(sig("outer"), vec![inner.clone()]);
    let mut obj = RegisterObject::new(value, None);
    obj.record_call(inner.clone());
    obj.record_call(outer.clone());
    let calls = obj.iterate_involved_calls();
    assert!(calls.iter().any(|c| c.is_same_node(&inner)));
    assert!(calls.iter().any(|c| c.is_same_node(&outer)));
}

#[test]
fn sized_table_drops_out_of_range_writes() {
    let mut table = RegisterTable::sized(2);
    table.insert(5, RegisterObject::new(Primitive::new("0", None::<String>), None));
    assert!(table.get_values(5).is_empty());
    assert_eq!(table.capacity(), Some(2));
}

#[test]
fn sized_table_returns_empty_for_unwritten_register() {
    let table = RegisterTable::sized(4);
    assert!(table.get_values(3).is_empty());
    assert!(table.get_latest(3).is_none());
}

#[test]
fn get_latest_returns_most_recent_write() {
    let mut table = RegisterTable::sized(1);
    table.insert(0, RegisterObject::new(Primitive::new("1", Some("I")), Some("I".to_string())));
    table.insert(0, RegisterObject::new(Primitive::new("2", Some("I")), Some("I".to_string())));
    let latest = table.get_latest(0).expect("written");
    assert_eq!(latest.value().resolve(true), "2");
}

#[test]
fn record_call_on_latest_updates_most_recent_observation_only() {
    let mut table = RegisterTable::sized(1);
    table.insert(0, RegisterObject::new(Primitive::new("1", Some("I")), Some("I".to_string())));
    table.insert(0, RegisterObject::new(Primitive::new("2", Some("I")), Some("I".to_string())));
    let call = MethodCall::new(sig("use"), vec![]);
    table.record_call_on_latest(0, call.clone());

    assert!(table.get_values(0)[0].called_by().is_empty());
    assert_eq!(table.get_latest(0).unwrap().called_by().len(), 1);
}

#[test]
fn unsized_table_accepts_any_index() {
    let mut table = RegisterTable::unsized_table();
    table.insert(999, RegisterObject::new(Primitive::new("0", None::<String>), None));
    assert_eq!(table.get_values(999).len(), 1);
    assert_eq!(table.capacity(), None);
}
