use crate::common::errors::InterpreterError;
use crate::common::types::Instruction;
use crate::register::{RegisterObject, RegisterTable};
use crate::valuenode::{BytecodeOps, Primitive, ValueNode};

use super::dispatch::BinaryForm;
use super::type_mapping::descriptor_for_postfix;

fn latest_value(table: &RegisterTable, index: usize) -> Result<ValueNode, InterpreterError> {
    table
        .get_latest(index)
        .map(|obj| obj.value().clone())
        .ok_or(InterpreterError::RegisterUninitialized { index })
}

fn binary_node(src1: ValueNode, src2: ValueNode) -> ValueNode {
    BytecodeOps::new("binop({src0}, {src1})", vec![src1, src2], "")
}

/// `neg-*`/`not-*`: a pass-through node over the source register's current
/// value, written back identically into the `dest`/`dest+1` pair for the
/// wide forms.
pub(super) fn eval_unary(
    table: &mut RegisterTable,
    instr: &Instruction,
    wide: bool,
    type_token: &str,
) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let src = instr.registers[1];
    let value = latest_value(table, src)?;
    let node = BytecodeOps::new("{src0}", vec![value], "");
    let dest_type = descriptor_for_postfix(type_token).map(str::to_string);
    table.insert(dest, RegisterObject::new(node.clone(), dest_type.clone()));
    if wide {
        table.insert(dest + 1, RegisterObject::new(node, dest_type));
    }
    Ok(())
}

/// Binary arithmetic/logic ops (`add-*`, `sub-*`, ... in all of their
/// `/2addr`, `/lit8`, `/lit16` forms). All share the same symbolic template
/// `binop(a, b)` regardless of the actual opcode — the interpreter never
/// evaluates the operation, only records that one occurred and over what.
pub(super) fn eval_binary(
    table: &mut RegisterTable,
    instr: &Instruction,
    wide: bool,
    form: BinaryForm,
    type_token: &str,
) -> Result<(), InterpreterError> {
    let dest_type = descriptor_for_postfix(type_token).map(str::to_string);
    match form {
        BinaryForm::Normal => {
            let dest = instr.registers[0];
            let src1 = instr.registers[1];
            let src2 = instr.registers[2];

            let lo = binary_node(latest_value(table, src1)?, latest_value(table, src2)?);
            table.insert(dest, RegisterObject::new(lo, dest_type.clone()));

            if wide {
                let hi = binary_node(latest_value(table, src1 + 1)?, latest_value(table, src2 + 1)?);
                table.insert(dest + 1, RegisterObject::new(hi, dest_type));
            }
        }
        BinaryForm::TwoAddr => {
            let dest = instr.registers[0];
            let src = instr.registers[1];

            let dest_before = latest_value(table, dest)?;
            let src_value = latest_value(table, src)?;
            let lo = binary_node(dest_before, src_value);

            if wide {
                let dest_before_hi = latest_value(table, dest + 1)?;
                let src_value_hi = latest_value(table, src + 1)?;
                let hi = binary_node(dest_before_hi, src_value_hi);
                table.insert(dest, RegisterObject::new(lo, dest_type.clone()));
                table.insert(dest + 1, RegisterObject::new(hi, dest_type));
            } else {
                table.insert(dest, RegisterObject::new(lo, dest_type));
            }
        }
        BinaryForm::Lit8 | BinaryForm::Lit16 => {
            let dest = instr.registers[0];
            let src = instr.registers[1];
            let literal = instr.operand.as_deref().unwrap_or("0");

            let src_value = latest_value(table, src)?;
            let literal_node = Primitive::new(literal, Some("I"));
            let node = binary_node(src_value, literal_node);
            table.insert(dest, RegisterObject::new(node, dest_type));
        }
    }
    Ok(())
}
