use crate::apkinfo::{MethodObject, StaticApkInfo};
use crate::common::config::InterpreterConfig;
use crate::common::types::{Instruction, MethodSignature};

use super::{run_method, Interpreter};

fn sig(name: &str, descriptor: &str) -> MethodSignature {
    MethodSignature::new("Lcom/example/Target;", name, descriptor)
}

/// A straight-line trace spanning constants, arithmetic, a cast, and an
/// array store, checked end to end against the final provenance string held
/// by the array register.
#[test]
fn full_trace_across_families_produces_expected_provenance() {
    let info = StaticApkInfo::new();
    let mut interpreter = Interpreter::new(&info, Some(5), InterpreterConfig::default());

    let program = vec![
        Instruction::new("const/4", vec![0], Some("2".to_string())), // v0 = 2
        Instruction::new("const/4", vec![1], Some("3".to_string())), // v1 = 3
        Instruction::new("add-int", vec![2, 0, 1], None),            // v2 = binop(2, 3)
        Instruction::new("int-to-long", vec![3, 2], None),           // (v3,v4) = casting(v2)
        Instruction::new("new-array", vec![4, 0], Some("[I".to_string())),
    ];

    for instr in &program {
        interpreter.step(instr).expect("every step in this trace succeeds");
    }

    let binop = interpreter.table().get_latest(2).unwrap().value().resolve(true);
    assert_eq!(binop, "binop(2, 3)");

    let cast = interpreter.table().get_latest(3).unwrap().value().resolve(true);
    assert_eq!(cast, "casting(binop(2, 3))");
    assert!(interpreter
        .table()
        .get_latest(3)
        .unwrap()
        .value()
        .is_same_node(interpreter.table().get_latest(4).unwrap().value()));

    let array = interpreter.table().get_latest(4).unwrap().value().resolve(true);
    assert_eq!(array, "new-array()[I(2)");
}

/// `aget-object` picks up its destination's type from the array register's
/// own element type rather than leaving it unset.
#[test]
fn aget_object_sets_destination_type_from_array_element_type() {
    let info = StaticApkInfo::new();
    let mut interpreter = Interpreter::new(&info, Some(4), InterpreterConfig::default());

    let program = vec![
        Instruction::new("const/4", vec![0], Some("1".to_string())), // v0 = array size
        Instruction::new("new-array", vec![1, 0], Some("[Ljava/lang/Integer;".to_string())), // v1 = array
        Instruction::new("const/4", vec![2], Some("0".to_string())), // v2 = index
        Instruction::new("aget-object", vec![3, 1, 2], None),        // v3 = array[0]
    ];
    for instr in &program {
        interpreter.step(instr).expect("every step in this trace succeeds");
    }

    assert_eq!(
        interpreter.table().get_latest(3).unwrap().current_type(),
        Some("Ljava/lang/Integer;")
    );
}

/// `run_method` pulls bytecode from the [`crate::apkinfo::ApkInfo`] backend
/// and threads an invoke's result into a later instruction via
/// `move-result`, across a method boundary it never had to be told about
/// directly.
#[test]
fn run_method_resolves_invoke_target_through_superclass_and_threads_result() {
    let mut info = StaticApkInfo::new();
    info.set_superclass("Lcom/example/Child;", "Lcom/example/Base;");
    info.add_method(MethodObject::new(sig("greet", "(Ljava/lang/String;)Ljava/lang/String;"), None));

    let caller = sig("run", "()V");
    info.set_bytecode(
        caller.clone(),
        vec![
            Instruction::new("const-string", vec![0], Some("hi".to_string())),
            Instruction::new(
                "invoke-virtual",
                vec![1, 0],
                Some("Lcom/example/Child;->greet(Ljava/lang/String;)Ljava/lang/String;".to_string()),
            ),
            Instruction::new("move-result-object", vec![2], None),
        ],
    );

    let (table, errors) = run_method(&info, &caller, Some(3), InterpreterConfig::default());
    assert!(errors.is_empty());

    let resolved = table.get_latest(2).unwrap().value().resolve(true);
    assert_eq!(resolved, "Lcom/example/Base;->greet(Ljava/lang/String;)Ljava/lang/String;(hi)");
}

/// An uninitialized-register read is a hard error by default but becomes a
/// placeholder value under the tolerant interpreter configuration, matching
/// the two modes `InterpreterConfig::tolerate_uninitialized_registers` is
/// meant to select between.
#[test]
fn tolerant_config_substitutes_a_placeholder_for_an_unread_register() {
    let info = StaticApkInfo::new();
    let strict = InterpreterConfig::default();
    let tolerant = InterpreterConfig {
        tolerate_uninitialized_registers: true,
        ..InterpreterConfig::default()
    };

    let instr = Instruction::new(
        "invoke-static",
        vec![5],
        Some("Lcom/example/Target;->consume(I)V".to_string()),
    );

    let mut strict_interp = Interpreter::new(&info, Some(6), strict);
    assert!(strict_interp.step(&instr).is_err());

    let mut tolerant_interp = Interpreter::new(&info, Some(6), tolerant);
    assert!(tolerant_interp.step(&instr).is_ok());
}

/// A method with no bytecode reported by the backend (e.g. an external API
/// stub) yields an untouched, empty register table and no errors rather
/// than panicking or failing.
#[test]
fn run_method_on_unknown_bytecode_yields_empty_table_without_error() {
    let info = StaticApkInfo::new();
    let method = sig("external", "()V");
    let (table, errors) = run_method(&info, &method, Some(2), InterpreterConfig::default());
    assert!(errors.is_empty());
    assert!(table.get_latest(0).is_none());
}
