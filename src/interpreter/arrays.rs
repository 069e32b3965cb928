use crate::common::errors::InterpreterError;
use crate::common::types::Instruction;
use crate::register::{RegisterObject, RegisterTable};
use crate::valuenode::{BytecodeOps, ValueNode};

use super::type_mapping::descriptor_for_postfix;

fn strip_array_marker(type_descriptor: &str) -> &str {
    type_descriptor.strip_prefix('[').unwrap_or(type_descriptor)
}

/// Builds the `new-array()[<type>(<elements>)` node shared by `new-array`
/// and `filled-new-array(/range)`. The element count varies (zero for a
/// bare `new-array`'s size operand treated as one synthetic element, one
/// `{srcN}` placeholder per initializer for `filled-new-array`), so the
/// template is assembled with as many placeholders as `elements` has
/// entries.
fn new_array_node(type_descriptor: &str, elements: Vec<ValueNode>) -> ValueNode {
    let placeholders: Vec<String> = (0..elements.len()).map(|i| format!("{{src{i}}}")).collect();
    let template = format!("new-array()[{{data}}({})", placeholders.join(","));
    BytecodeOps::new(template, elements, strip_array_marker(type_descriptor))
}

fn latest_value(table: &RegisterTable, index: usize) -> Result<ValueNode, InterpreterError> {
    table
        .get_latest(index)
        .map(|obj| obj.value().clone())
        .ok_or(InterpreterError::RegisterUninitialized { index })
}

/// `new-array`: `registers = [dest, size]`, `operand` is the array's
/// element type descriptor (with its leading `[`).
pub(super) fn eval_new_array(table: &mut RegisterTable, instr: &Instruction) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let size_reg = instr.registers[1];
    let type_descriptor = instr.operand.as_deref().unwrap_or_default();

    let size_value = latest_value(table, size_reg)?;
    let node = new_array_node(type_descriptor, vec![size_value]);
    table.insert(dest, RegisterObject::new(node, Some(type_descriptor.to_string())));
    Ok(())
}

/// `filled-new-array(/range)`: `registers` are the initializer values (no
/// destination register of its own — the result is claimed by a following
/// `move-result-object`, same as an `invoke-*`).
pub(super) fn eval_filled_new_array(
    table: &RegisterTable,
    instr: &Instruction,
) -> Result<ValueNode, InterpreterError> {
    let type_descriptor = instr.operand.as_deref().unwrap_or_default();
    let mut elements = Vec::with_capacity(instr.registers.len());
    for &reg in &instr.registers {
        elements.push(latest_value(table, reg)?);
    }
    Ok(new_array_node(type_descriptor, elements))
}

/// `fill-array-data`: bulk-initializes the array already held by
/// `registers[0]`, replacing its latest observation with one whose node
/// carries the prior array node as its sole operand. The resolved string is
/// the literal `"Embedded-array-data()[]"`, matching the original exactly —
/// the payload table itself isn't part of the provenance text.
pub(super) fn eval_fill_array_data(table: &mut RegisterTable, instr: &Instruction) -> Result<(), InterpreterError> {
    let array_reg = instr.registers[0];
    let prior = latest_value(table, array_reg)?;
    let node = BytecodeOps::new("Embedded-array-data()[]", vec![prior], "");
    let value_type = table.get_latest(array_reg).and_then(|o| o.current_type()).map(str::to_string);
    table.insert(array_reg, RegisterObject::new(node, value_type));
    Ok(())
}

/// `aget*`: reads `array[index]` into `dest`. The wide form writes the same
/// node into `dest` and `dest+1`. The destination's type comes from the
/// postfix->descriptor table for every postfix except `object`, where
/// `aget-object` instead inherits the array register's own element type.
pub(super) fn eval_aget(
    table: &mut RegisterTable,
    instr: &Instruction,
    wide: bool,
    postfix: &str,
) -> Result<(), InterpreterError> {
    let dest = instr.registers[0];
    let array_reg = instr.registers[1];
    let index_reg = instr.registers[2];

    let array_value = latest_value(table, array_reg)?;
    let index_value = latest_value(table, index_reg)?;
    let node = BytecodeOps::new("{src0}[{src1}]", vec![array_value, index_value], "");

    let element_type = if postfix == "object" {
        table
            .get_latest(array_reg)
            .and_then(|o| o.current_type())
            .map(|t| strip_array_marker(t).to_string())
    } else {
        descriptor_for_postfix(postfix).map(str::to_string)
    };

    table.insert(dest, RegisterObject::new(node.clone(), element_type.clone()));
    if wide {
        table.insert(dest + 1, RegisterObject::new(node, element_type));
    }
    Ok(())
}

/// `aput*`: writes `value` into `array[index]`. This mutates the *array*
/// register's observation stack, not a separate destination — matching the
/// original, where `aput` is recorded as a new value held by the array
/// register itself. The wide form reads the value from the `(value,
/// value+1)` pair regardless of what register token the index occupies.
pub(super) fn eval_aput(table: &mut RegisterTable, instr: &Instruction, wide: bool) -> Result<(), InterpreterError> {
    let value_reg = instr.registers[0];
    let array_reg = instr.registers[1];
    let index_reg = instr.registers[2];

    let array_value = latest_value(table, array_reg)?;
    let index_value = latest_value(table, index_reg)?;

    let node = if wide {
        let value_lo = latest_value(table, value_reg)?;
        let value_hi = latest_value(table, value_reg + 1)?;
        BytecodeOps::new(
            "{src0}[{src1}]:({src2},{src3})",
            vec![array_value, index_value, value_lo, value_hi],
            "",
        )
    } else {
        let value = latest_value(table, value_reg)?;
        BytecodeOps::new("{src0}[{src1}]:{src2}", vec![array_value, index_value, value], "")
    };

    let value_type = table.get_latest(array_reg).and_then(|o| o.current_type()).map(str::to_string);
    table.insert(array_reg, RegisterObject::new(node, value_type));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuenode::Primitive;

    #[test]
    fn new_array_strips_leading_bracket_from_type() {
        let mut table = RegisterTable::sized(2);
        table.insert(1, RegisterObject::new(Primitive::new("5", Some("I")), Some("I".to_string())));
        let instr = Instruction::new("new-array", vec![0, 1], Some("[Ljava/lang/String;".to_string()));
        eval_new_array(&mut table, &instr).expect("ok");
        assert_eq!(
            table.get_latest(0).unwrap().value().resolve(true),
            "new-array()[Ljava/lang/String;(5)"
        );
    }

    #[test]
    fn filled_new_array_with_no_elements_matches_empty_parens() {
        let table = RegisterTable::sized(1);
        let instr = Instruction::new("filled-new-array", vec![], Some("[I".to_string()));
        let node = eval_filled_new_array(&table, &instr).expect("ok");
        assert_eq!(node.resolve(true), "new-array()[I()");
    }

    #[test]
    fn aget_wide_shares_node_across_register_pair() {
        let mut table = RegisterTable::sized(4);
        table.insert(1, RegisterObject::new(Primitive::new("arr", None::<String>), None));
        table.insert(2, RegisterObject::new(Primitive::new("0", Some("I")), Some("I".to_string())));
        let instr = Instruction::new("aget-wide", vec![0, 1, 2], None);
        eval_aget(&mut table, &instr, true, "wide").expect("ok");
        assert!(table.get_latest(0).unwrap().value().is_same_node(table.get_latest(3).unwrap().value()));
    }

    #[test]
    fn aget_object_inherits_array_element_type() {
        let mut table = RegisterTable::sized(3);
        table.insert(
            1,
            RegisterObject::new(Primitive::new("arr", None::<String>), Some("[Ljava/lang/Integer;".to_string())),
        );
        table.insert(2, RegisterObject::new(Primitive::new("0", Some("I")), Some("I".to_string())));
        let instr = Instruction::new("aget-object", vec![0, 1, 2], None);
        eval_aget(&mut table, &instr, false, "object").expect("ok");
        assert_eq!(table.get_latest(0).unwrap().current_type(), Some("Ljava/lang/Integer;"));
    }

    #[test]
    fn aget_boolean_sets_type_from_postfix_table() {
        let mut table = RegisterTable::sized(3);
        table.insert(1, RegisterObject::new(Primitive::new("arr", None::<String>), Some("[Z".to_string())));
        table.insert(2, RegisterObject::new(Primitive::new("0", Some("I")), Some("I".to_string())));
        let instr = Instruction::new("aget-boolean", vec![0, 1, 2], None);
        eval_aget(&mut table, &instr, false, "boolean").expect("ok");
        assert_eq!(table.get_latest(0).unwrap().current_type(), Some("Z"));
    }

    #[test]
    fn aget_bare_postfix_has_no_table_entry() {
        let mut table = RegisterTable::sized(3);
        table.insert(1, RegisterObject::new(Primitive::new("arr", None::<String>), Some("[I".to_string())));
        table.insert(2, RegisterObject::new(Primitive::new("0", Some("I")), Some("I".to_string())));
        let instr = Instruction::new("aget", vec![0, 1, 2], None);
        eval_aget(&mut table, &instr, false, "").expect("ok");
        assert_eq!(table.get_latest(0).unwrap().current_type(), None);
    }

    #[test]
    fn aput_mutates_array_register_not_a_destination() {
        let mut table = RegisterTable::sized(3);
        table.insert(1, RegisterObject::new(Primitive::new("arr", None::<String>), None));
        table.insert(2, RegisterObject::new(Primitive::new("0", Some("I")), Some("I".to_string())));
        table.insert(0, RegisterObject::new(Primitive::new("9", Some("I")), Some("I".to_string())));
        let instr = Instruction::new("aput", vec![0, 1, 2], None);
        eval_aput(&mut table, &instr, false).expect("ok");
        assert_eq!(table.get_latest(1).unwrap().value().resolve(true), "arr[0]:9");
    }
}
