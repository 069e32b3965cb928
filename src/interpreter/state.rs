use tracing::warn;

use crate::apkinfo::ApkInfo;
use crate::common::config::InterpreterConfig;
use crate::common::errors::InterpreterError;
use crate::common::types::{Instruction, MethodSignature};
use crate::register::RegisterTable;

use super::arithmetic::{eval_binary, eval_unary};
use super::arrays::{eval_aget, eval_aput, eval_fill_array_data, eval_filled_new_array, eval_new_array};
use super::casts::eval_cast;
use super::constants::{eval_const, eval_const_class, eval_const_string, eval_new_instance};
use super::dispatch::{classify_mnemonic, MnemonicKind};
use super::exceptions::eval_move_exception;
use super::invoke::{eval_invoke, PendingResult};
use super::move_ops::{eval_move, eval_move_result};

/// A single method's straight-line symbolic evaluation state: the register
/// table being built up, plus whatever `invoke-*`/`filled-new-array*`
/// result is pending a `move-result*` to claim it.
pub struct Interpreter<'a> {
    apkinfo: &'a dyn ApkInfo,
    config: InterpreterConfig,
    table: RegisterTable,
    pending_result: Option<PendingResult>,
}

impl<'a> Interpreter<'a> {
    #[must_use]
    pub fn new(apkinfo: &'a dyn ApkInfo, register_count: Option<usize>, config: InterpreterConfig) -> Self {
        let table = match register_count {
            Some(n) => RegisterTable::sized(n),
            None => RegisterTable::unsized_table(),
        };
        Interpreter {
            apkinfo,
            config,
            table,
            pending_result: None,
        }
    }

    #[must_use]
    pub fn table(&self) -> &RegisterTable {
        &self.table
    }

    pub fn into_table(self) -> RegisterTable {
        self.table
    }

    /// Evaluates one instruction, updating the register table and any
    /// pending invocation result in place.
    pub fn step(&mut self, instr: &Instruction) -> Result<(), InterpreterError> {
        let kind = classify_mnemonic(&instr.mnemonic);
        let tolerate = self.config.tolerate_uninitialized_registers;

        match kind {
            MnemonicKind::Invoke { kind, .. } => {
                self.pending_result = eval_invoke(self.apkinfo, &mut self.table, instr, kind, tolerate)?;
            }
            MnemonicKind::MoveResult { wide, .. } => {
                let pending = self.pending_result.take();
                eval_move_result(&mut self.table, instr, wide, pending)?;
            }
            MnemonicKind::Move { wide, .. } => eval_move(&mut self.table, instr, wide)?,
            MnemonicKind::MoveException => eval_move_exception(&mut self.table, instr),
            MnemonicKind::ConstString { .. } => eval_const_string(&mut self.table, instr)?,
            MnemonicKind::ConstClass => eval_const_class(&mut self.table, instr)?,
            MnemonicKind::Const { wide } => eval_const(&mut self.table, instr, wide)?,
            MnemonicKind::NewInstance => eval_new_instance(&mut self.table, instr)?,
            MnemonicKind::NewArray => eval_new_array(&mut self.table, instr)?,
            MnemonicKind::FilledNewArray { .. } => {
                let node = eval_filled_new_array(&self.table, instr)?;
                self.pending_result = Some(PendingResult { node });
            }
            MnemonicKind::FillArrayData => eval_fill_array_data(&mut self.table, instr)?,
            MnemonicKind::ArrayGet { wide, postfix } => eval_aget(&mut self.table, instr, wide, postfix)?,
            MnemonicKind::ArrayPut { wide } => eval_aput(&mut self.table, instr, wide)?,
            MnemonicKind::Unary { wide, type_token } => eval_unary(&mut self.table, instr, wide, type_token)?,
            MnemonicKind::Cast { from_wide, to_wide, to_token } => {
                eval_cast(&mut self.table, instr, from_wide, to_wide, to_token)?
            }
            MnemonicKind::Binary { wide, form, type_token } => {
                eval_binary(&mut self.table, instr, wide, form, type_token)?
            }
            MnemonicKind::Unsupported => {
                warn!(mnemonic = %instr.mnemonic, "skipping unsupported or non-value-producing mnemonic");
            }
        }

        Ok(())
    }
}

/// Evaluates every instruction of `method`'s bytecode, skipping past any
/// instruction that fails (after recording its error) rather than aborting
/// the whole method — the straight-line trace has no control flow to break
/// by doing so, and a downstream rule engine can still use whatever
/// provenance was recovered for the registers that did succeed.
///
/// This is the failure-boundary primitive an outer detection pass (out of
/// scope for this crate) needs in place of the original's
/// `log.exception`-and-continue pattern around each method's evaluation.
#[must_use]
pub fn run_method(
    apkinfo: &dyn ApkInfo,
    method: &MethodSignature,
    register_count: Option<usize>,
    config: InterpreterConfig,
) -> (RegisterTable, Vec<InterpreterError>) {
    let mut interpreter = Interpreter::new(apkinfo, register_count, config);
    let mut errors = Vec::new();

    if let Some(instructions) = apkinfo.method_bytecode(method) {
        for instr in instructions {
            if let Err(err) = interpreter.step(instr) {
                warn!(%method, %err, "instruction evaluation failed, continuing");
                errors.push(err);
            }
        }
    }

    (interpreter.into_table(), errors)
}
