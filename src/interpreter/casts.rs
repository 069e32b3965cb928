use crate::common::errors::InterpreterError;
use crate::common::types::Instruction;
use crate::register::{RegisterObject, RegisterTable};
use crate::valuenode::{BytecodeOps, ValueNode};

use super::type_mapping::descriptor_for_postfix;

fn latest_value(table: &RegisterTable, index: usize) -> Result<ValueNode, InterpreterError> {
    table
        .get_latest(index)
        .map(|obj| obj.value().clone())
        .ok_or(InterpreterError::RegisterUninitialized { index })
}

/// `*-to-*` primitive casts. A wide source is consumed as its `(src,
/// src+1)` pair (`casting(a, b)`); a non-wide source is a single-operand
/// cast (`casting(a)`). A wide destination receives the resulting node in
/// both `dest` and `dest+1`.
pub(super) fn eval_cast(
    table: &mut RegisterTable,
    instr: &Instruction,
    from_wide: bool,
    to_wide: bool,
    to_token: &str,
) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let src = instr.registers[1];

    let node = if from_wide {
        let lo = latest_value(table, src)?;
        let hi = latest_value(table, src + 1)?;
        BytecodeOps::new("casting({src0}, {src1})", vec![lo, hi], "")
    } else {
        let value = latest_value(table, src)?;
        BytecodeOps::new("casting({src0})", vec![value], "")
    };

    let dest_type = descriptor_for_postfix(to_token).map(str::to_string);
    table.insert(dest, RegisterObject::new(node.clone(), dest_type.clone()));
    if to_wide {
        table.insert(dest + 1, RegisterObject::new(node, dest_type));
    }
    Ok(())
}
