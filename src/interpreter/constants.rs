use crate::common::errors::InterpreterError;
use crate::common::types::Instruction;
use crate::register::{RegisterObject, RegisterTable};
use crate::valuenode::Primitive;

fn literal_operand(instr: &Instruction) -> Result<&str, InterpreterError> {
    instr.operand.as_deref().ok_or(InterpreterError::OperandCountMismatch {
        mnemonic: instr.mnemonic.clone(),
        expected: 1,
        actual: 0,
    })
}

/// `const-string`/`const-string/jumbo`: writes the literal string payload
/// as an untyped [`Primitive`].
pub(super) fn eval_const_string(table: &mut RegisterTable, instr: &Instruction) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let value = literal_operand(instr)?;
    table.insert(dest, RegisterObject::new(Primitive::new(value, None::<String>), None));
    Ok(())
}

/// `const-class`: writes the referenced type descriptor as an untyped
/// [`Primitive`].
pub(super) fn eval_const_class(table: &mut RegisterTable, instr: &Instruction) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let value = literal_operand(instr)?;
    table.insert(dest, RegisterObject::new(Primitive::new(value, None::<String>), None));
    Ok(())
}

/// `const*`/`const-wide*`: writes a numeric literal. The wide forms write
/// the same value and type into both `dest` and `dest+1`.
pub(super) fn eval_const(table: &mut RegisterTable, instr: &Instruction, wide: bool) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let value = literal_operand(instr)?;
    let value_type = if wide { "J" } else { "I" };
    let node = Primitive::new(value, Some(value_type));
    table.insert(dest, RegisterObject::new(node.clone(), Some(value_type.to_string())));
    if wide {
        table.insert(dest + 1, RegisterObject::new(node, Some(value_type.to_string())));
    }
    Ok(())
}

/// `new-instance`: writes a fresh node representing the newly allocated
/// object. A later `new-instance` into the same register simply pushes
/// another observation onto that register's stack — the previous instance
/// is still reachable through anything that already captured it.
pub(super) fn eval_new_instance(table: &mut RegisterTable, instr: &Instruction) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let type_name = literal_operand(instr)?.to_string();
    let node = Primitive::new(type_name.clone(), Some(type_name.clone()));
    table.insert(dest, RegisterObject::new(node, Some(type_name)));
    Ok(())
}
