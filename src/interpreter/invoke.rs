use tracing::debug;

use crate::apkinfo::ApkInfo;
use crate::common::errors::InterpreterError;
use crate::common::types::{Instruction, MethodSignature};
use crate::register::RegisterTable;
use crate::valuenode::{MethodCall, Primitive, ValueNode};

use super::dispatch::InvokeKind;

/// The pending result of the most recently executed `invoke-*`, waiting to
/// be claimed by a following `move-result*`. `None` once claimed or if the
/// invoked method returns `V` (void).
pub(super) struct PendingResult {
    pub node: ValueNode,
}

fn parse_method_signature(operand: &str) -> Result<MethodSignature, InterpreterError> {
    let (class_name, rest) = operand
        .split_once("->")
        .ok_or_else(|| InterpreterError::MethodLookupFailed { descriptor: operand.to_string() })?;
    let paren = rest
        .find('(')
        .ok_or_else(|| InterpreterError::MethodLookupFailed { descriptor: operand.to_string() })?;
    let name = &rest[..paren];
    let descriptor = &rest[paren..];
    Ok(MethodSignature::new(class_name, name, descriptor))
}

/// Resolves `declared` against the invocation's dispatch rule: `Direct`,
/// `Static`, `Polymorphic`, and `Custom` invocations use the declared
/// signature as-is; `Virtual` and `Interface` look up the concrete
/// implementer starting at the declared class; `Super` skips the declared
/// class itself and starts the walk at its superclass. A failed lookup
/// falls back to the declared signature rather than aborting the trace —
/// straight-line evaluation has no way to recover control flow on a hard
/// error, so best-effort provenance beats none.
fn resolve_dispatch_target(
    apkinfo: &dyn ApkInfo,
    kind: InvokeKind,
    declared: &MethodSignature,
) -> MethodSignature {
    let resolved = match kind {
        InvokeKind::Direct | InvokeKind::Static | InvokeKind::Polymorphic | InvokeKind::Custom => {
            return declared.clone();
        }
        InvokeKind::Virtual | InvokeKind::Interface => apkinfo.resolve_implementer(
            &declared.class_name,
            &declared.name,
            &declared.descriptor,
        ),
        InvokeKind::Super => match apkinfo.superclass(&declared.class_name) {
            Some(parent) => apkinfo.resolve_implementer(&parent, &declared.name, &declared.descriptor),
            None => {
                debug!(class = %declared.class_name, "super invocation on a class with no recorded superclass");
                return declared.clone();
            }
        },
    };

    resolved.unwrap_or_else(|err| {
        debug!(%err, declared = %declared, "could not resolve dispatch target, using declared signature");
        declared.clone()
    })
}

pub(super) fn eval_invoke(
    apkinfo: &dyn ApkInfo,
    table: &mut RegisterTable,
    instr: &Instruction,
    kind: InvokeKind,
    tolerate_uninitialized: bool,
) -> Result<Option<PendingResult>, InterpreterError> {
    let operand = instr.operand.as_deref().unwrap_or_default();
    let declared = parse_method_signature(operand)?;
    let target = resolve_dispatch_target(apkinfo, kind, &declared);

    let has_receiver = !matches!(kind, InvokeKind::Static | InvokeKind::Custom);
    let parameter_types = target.parameter_types();

    let mut arguments = Vec::with_capacity(instr.registers.len());
    for (i, &reg) in instr.registers.iter().enumerate() {
        let value = match table.get_latest(reg) {
            Some(obj) => obj.value().clone(),
            None if tolerate_uninitialized => Primitive::new(format!("v{reg}"), None::<String>),
            None => return Err(InterpreterError::RegisterUninitialized { index: reg }),
        };
        arguments.push(value);

        if has_receiver && i == 0 {
            table.set_type_on_latest_if_missing(reg, target.class_name.clone());
        } else {
            let param_index = if has_receiver { i - 1 } else { i };
            if let Some(&param_type) = parameter_types.get(param_index) {
                table.set_type_on_latest_if_missing(reg, param_type.to_string());
            }
        }
    }

    let call_node = MethodCall::new(target.clone(), arguments);
    for &reg in &instr.registers {
        table.record_call_on_latest(reg, call_node.clone());
    }

    if target.return_type() == "V" {
        Ok(None)
    } else {
        Ok(Some(PendingResult { node: call_node }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apkinfo::StaticApkInfo;
    use crate::register::RegisterObject;

    fn sig(class: &str, name: &str, desc: &str) -> MethodSignature {
        MethodSignature::new(class, name, desc)
    }

    #[test]
    fn parses_canonical_method_signature_operand() {
        let parsed = parse_method_signature("Lcom/example/Foo;->bar(I)V").expect("parses");
        assert_eq!(parsed.class_name, "Lcom/example/Foo;");
        assert_eq!(parsed.name, "bar");
        assert_eq!(parsed.descriptor, "(I)V");
    }

    #[test]
    fn static_invoke_uses_declared_signature_directly() {
        let info = StaticApkInfo::new();
        let mut table = RegisterTable::sized(2);
        table.insert(0, RegisterObject::new(Primitive::new("5", Some("I")), Some("I".to_string())));

        let instr = Instruction::new(
            "invoke-static",
            vec![0],
            Some("Lc;->m(I)I".to_string()),
        );
        let pending = eval_invoke(&info, &mut table, &instr, InvokeKind::Static, false)
            .expect("ok")
            .expect("non-void result");
        assert_eq!(pending.node.resolve(true), "Lc;->m(I)I(5)");
    }

    #[test]
    fn virtual_invoke_resolves_to_superclass_implementer() {
        let mut info = StaticApkInfo::new();
        info.set_superclass("Lchild;", "Lparent;");
        info.add_method(crate::apkinfo::MethodObject::new(sig("Lparent;", "m", "()V"), None));

        let mut table = RegisterTable::sized(1);
        table.insert(0, RegisterObject::new(Primitive::new("obj", None::<String>), None));

        let instr = Instruction::new("invoke-virtual", vec![0], Some("Lchild;->m()V".to_string()));
        let pending = eval_invoke(&info, &mut table, &instr, InvokeKind::Virtual, false).expect("ok");
        assert!(pending.is_none(), "void return yields no pending result");

        let called = table.get_latest(0).unwrap().called_by();
        assert_eq!(called.len(), 1);
        assert!(called[0].resolve(true).starts_with("Lparent;->m()V"));
    }

    #[test]
    fn static_invoke_backfills_missing_argument_types_from_signature() {
        let info = StaticApkInfo::new();
        let mut table = RegisterTable::sized(2);
        table.insert(0, RegisterObject::new(Primitive::new("5", None::<String>), None));

        let instr = Instruction::new(
            "invoke-static",
            vec![0],
            Some("Lc;->m(I)I".to_string()),
        );
        eval_invoke(&info, &mut table, &instr, InvokeKind::Static, false).expect("ok");
        assert_eq!(table.get_latest(0).unwrap().current_type(), Some("I"));
    }

    #[test]
    fn virtual_invoke_backfills_receiver_type_to_declared_class() {
        let info = StaticApkInfo::new();
        let mut table = RegisterTable::sized(2);
        table.insert(0, RegisterObject::new(Primitive::new("obj", None::<String>), None));
        table.insert(1, RegisterObject::new(Primitive::new("5", None::<String>), None));

        let instr = Instruction::new("invoke-virtual", vec![0, 1], Some("Lc;->m(I)V".to_string()));
        eval_invoke(&info, &mut table, &instr, InvokeKind::Virtual, false).expect("ok");
        assert_eq!(table.get_latest(0).unwrap().current_type(), Some("Lc;"));
        assert_eq!(table.get_latest(1).unwrap().current_type(), Some("I"));
    }

    #[test]
    fn uninitialized_register_errors_when_intolerant() {
        let info = StaticApkInfo::new();
        let mut table = RegisterTable::sized(2);
        let instr = Instruction::new("invoke-static", vec![1], Some("Lc;->m(I)V".to_string()));
        let result = eval_invoke(&info, &mut table, &instr, InvokeKind::Static, false);
        assert!(matches!(result, Err(InterpreterError::RegisterUninitialized { index: 1 })));
    }
}
