use super::*;
use crate::common::types::MethodSignature;

fn sig(name: &str) -> MethodSignature {
    MethodSignature::new("Lcom/example/Foo;", name, "()V")
}

#[test]
fn primitive_resolves_raw_without_evaluate_args() {
    let node = Primitive::new("5", Some("I"));
    assert_eq!(node.resolve(false), "5");
    assert_eq!(node.resolve(true), "5");
}

#[test]
fn primitive_resolves_bool_hint() {
    let node = Primitive::new("0", Some("Z"));
    assert_eq!(node.resolve(true), "false");
    assert_eq!(node.resolve(false), "0");
}

#[test]
fn method_call_joins_arguments_without_spaces() {
    let a = Primitive::new("1", Some("I"));
    let b = Primitive::new("2", Some("I"));
    let call = MethodCall::new(sig("bar"), vec![a, b]);
    assert_eq!(call.resolve(true), "Lcom/example/Foo;->bar()V(1,2)");
}

#[test]
fn method_call_with_no_arguments() {
    let call = MethodCall::new(sig("baz"), vec![]);
    assert_eq!(call.resolve(true), "Lcom/example/Foo;->baz()V()");
}

#[test]
fn bytecode_ops_interpolates_operands_and_data() {
    let src0 = Primitive::new("v1", None::<String>);
    let node = BytecodeOps::new("{src0}[{data}]", vec![src0], "5");
    assert_eq!(node.resolve(true), "v1[5]");
}

#[test]
fn identity_equality_not_structural() {
    let a = Primitive::new("1", Some("I"));
    let b = Primitive::new("1", Some("I"));
    assert_ne!(a, b);
    assert!(a.is_same_node(&a.clone()));
}

#[test]
fn shared_child_is_resolved_once_via_cache() {
    let shared = Primitive::new("7", Some("I"));
    let call_a = MethodCall::new(sig("useA"), vec![shared.clone()]);
    let call_b = MethodCall::new(sig("useB"), vec![shared.clone(), call_a.clone()]);
    assert_eq!(call_b.resolve(true), "Lcom/example/Foo;->useB()V(7,Lcom/example/Foo;->useA()V(7))");
}

#[test]
fn iterate_prior_calls_finds_nested_calls() {
    let inner = MethodCall::new(sig("inner"), vec![]);
    let outer = MethodCall::new(sig("outer"), vec![inner.clone()]);
    let calls = iterate_prior_calls(&outer);
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().any(|c| c.is_same_node(&inner)));
    assert!(calls.iter().any(|c| c.is_same_node(&outer)));
}

#[test]
fn iterate_prior_primitives_deduplicates_shared_node() {
    let shared = Primitive::new("1", Some("I"));
    let call = MethodCall::new(sig("use"), vec![shared.clone(), shared.clone()]);
    let prims = iterate_prior_primitives(&call);
    assert_eq!(prims.len(), 1);
}

#[test]
fn does_not_recurse_infinitely_on_deep_chain() {
    let mut node = Primitive::new("0", Some("I"));
    for i in 1..2000 {
        node = BytecodeOps::new("{src0}", vec![node], i.to_string());
    }
    let resolved = node.resolve(true);
    assert_eq!(resolved, "0");
}
