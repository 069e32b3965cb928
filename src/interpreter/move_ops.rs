use crate::common::errors::InterpreterError;
use crate::common::types::Instruction;
use crate::register::{RegisterObject, RegisterTable};
use crate::valuenode::Primitive;

use super::invoke::PendingResult;

fn read_source(table: &RegisterTable, index: usize) -> Result<RegisterObject, InterpreterError> {
    table
        .get_latest(index)
        .cloned()
        .ok_or(InterpreterError::RegisterUninitialized { index })
}

/// `move`/`move-wide`/`move-object`: copies a register's current
/// observation into `dest`, sharing the *same* value node — a later
/// `resolve()` of `dest` and `src` are identity-equal, matching the
/// original's register-sharing semantics (`id(latest(dest)) == id(latest(src))`).
/// For the wide forms the pair `(dest, dest+1)` both receive the same
/// sharing treatment from `(src, src+1)`.
pub(super) fn eval_move(
    table: &mut RegisterTable,
    instr: &Instruction,
    wide: bool,
) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let src = instr.registers[1];

    let source = read_source(table, src)?;
    table.insert(dest, source.clone());

    if wide {
        let source_hi = read_source(table, src + 1)?;
        table.insert(dest + 1, source_hi);
    }

    Ok(())
}

/// `move-result`/`move-result-wide`/`move-result-object`: claims the value
/// node stashed by the immediately preceding `invoke-*` and writes it into
/// `dest` (and `dest+1` for the wide form, both halves sharing the node).
pub(super) fn eval_move_result(
    table: &mut RegisterTable,
    instr: &Instruction,
    wide: bool,
    pending: Option<PendingResult>,
) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let node = pending
        .map(|p| p.node)
        .unwrap_or_else(|| Primitive::new("<no-result>", None::<String>));

    table.insert(dest, RegisterObject::new(node.clone(), None));
    if wide {
        table.insert(dest + 1, RegisterObject::new(node, None));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::invoke::PendingResult;

    #[test]
    fn move_shares_identity_with_source() {
        let mut table = RegisterTable::sized(2);
        table.insert(0, RegisterObject::new(Primitive::new("5", Some("I")), Some("I".to_string())));

        let instr = Instruction::new("move", vec![1, 0], None);
        eval_move(&mut table, &instr, false).expect("ok");

        let src_node = table.get_latest(0).unwrap().value().clone();
        let dest_node = table.get_latest(1).unwrap().value().clone();
        assert!(src_node.is_same_node(&dest_node));
    }

    #[test]
    fn move_wide_copies_both_halves() {
        let mut table = RegisterTable::sized(4);
        table.insert(0, RegisterObject::new(Primitive::new("1", Some("J")), Some("J".to_string())));
        table.insert(1, RegisterObject::new(Primitive::new("2", Some("J")), Some("J".to_string())));

        let instr = Instruction::new("move-wide", vec![2, 0], None);
        eval_move(&mut table, &instr, true).expect("ok");

        assert!(table.get_latest(2).unwrap().value().is_same_node(table.get_latest(0).unwrap().value()));
        assert!(table.get_latest(3).unwrap().value().is_same_node(table.get_latest(1).unwrap().value()));
    }

    #[test]
    fn move_result_claims_pending_invoke_result() {
        let mut table = RegisterTable::sized(1);
        let node = Primitive::new("42", Some("I"));
        let instr = Instruction::new("move-result", vec![0], None);
        eval_move_result(&mut table, &instr, false, Some(PendingResult { node: node.clone() }))
            .expect("ok");
        assert!(table.get_latest(0).unwrap().value().is_same_node(&node));
    }

}
