use crate::common::types::Instruction;
use crate::register::{RegisterObject, RegisterTable};
use crate::valuenode::Primitive;

/// `move-exception`: writes a bare placeholder node for the exception
/// object caught by the active handler into `dest`, matching the
/// original's `Primitive("Exception", value_type)` construction — the
/// interpreter has no actual exception to inspect, only the handler's
/// declared catch type.
pub(super) fn eval_move_exception(table: &mut RegisterTable, instr: &Instruction) {
    let dest = instr.registers[0];
    let exception_type = instr.operand.clone();
    let node = Primitive::new("Exception", exception_type.clone());
    table.insert(dest, RegisterObject::new(node, exception_type));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_exception_writes_bare_placeholder() {
        let mut table = RegisterTable::sized(1);
        let instr = Instruction::new("move-exception", vec![0], Some("Ljava/lang/Exception;".to_string()));
        eval_move_exception(&mut table, &instr);
        assert_eq!(table.get_latest(0).unwrap().value().resolve(false), "Exception");
    }

    #[test]
    fn move_exception_with_no_declared_type_still_writes_placeholder() {
        let mut table = RegisterTable::sized(1);
        let instr = Instruction::new("move-exception", vec![0], None);
        eval_move_exception(&mut table, &instr);
        assert!(table.get_latest(0).unwrap().current_type().is_none());
    }
}
