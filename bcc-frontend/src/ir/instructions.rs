//! IR instructions

use bcc_common::{LabelId, TempId};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::ir::{IrBinaryOp, IrType, IrUnaryOp, Joined, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// result = op lhs, rhs
    Binary {
        result: TempId,
        op: IrBinaryOp,
        lhs: Value,
        rhs: Value,
        operand_type: IrType,
    },

    /// result = op operand; conversions go from `operand_type` to `result_type`
    Unary {
        result: TempId,
        op: IrUnaryOp,
        operand: Value,
        operand_type: IrType,
        result_type: IrType,
    },

    /// result = load ptr
    Load {
        result: TempId,
        ptr: Value,
        result_type: IrType,
    },

    /// store value, ptr
    Store {
        value: Value,
        ptr: Value,
        value_type: IrType,
    },

    /// result = getelementptr ptr, indices...
    GetElementPtr {
        result: TempId,
        ptr: Value,
        indices: Vec<Value>,
        result_type: IrType,
    },

    /// result = alloca type
    Alloca {
        result: TempId,
        alloc_type: IrType,
    },

    /// result = call func(args...)
    Call {
        result: Option<TempId>,
        function: Value,
        args: Vec<Value>,
        result_type: IrType,
    },

    /// ret value or ret void
    Return(Option<Value>),

    /// br label
    Branch(LabelId),

    /// br condition, true_label, false_label
    BranchCond {
        condition: Value,
        true_label: LabelId,
        false_label: LabelId,
    },

    /// result = phi [val1, label1], [val2, label2], ...
    Phi {
        result: TempId,
        incoming: Vec<(Value, LabelId)>,
        result_type: IrType,
    },
}

impl Instruction {
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instruction::Return(_) | Instruction::Branch(_) | Instruction::BranchCond { .. }
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Binary { result, op, lhs, rhs, operand_type } => {
                write!(f, "%{result} = {op} {operand_type} {lhs}, {rhs}")
            }
            Instruction::Unary { result, op, operand, operand_type, result_type } => {
                if operand_type == result_type {
                    write!(f, "%{result} = {op} {operand_type} {operand}")
                } else {
                    write!(f, "%{result} = {op} {operand_type} {operand} to {result_type}")
                }
            }
            Instruction::Load { result, ptr, result_type } => {
                write!(f, "%{result} = load {result_type}, {result_type}* {ptr}")
            }
            Instruction::Store { value, ptr, value_type } => {
                write!(f, "store {value_type} {value}, {value_type}* {ptr}")
            }
            Instruction::GetElementPtr { result, ptr, indices, result_type } => {
                write!(f, "%{result} = getelementptr {result_type} {ptr}, {}", Joined(indices))
            }
            Instruction::Alloca { result, alloc_type } => {
                write!(f, "%{result} = alloca {alloc_type}")
            }
            Instruction::Call { result, function, args, result_type } => {
                if let Some(result) = result {
                    write!(f, "%{result} = ")?;
                }
                write!(f, "call {result_type} {function}({})", Joined(args))
            }
            Instruction::Return(Some(value)) => write!(f, "ret {value}"),
            Instruction::Return(None) => write!(f, "ret void"),
            Instruction::Branch(label) => write!(f, "br label %L{label}"),
            Instruction::BranchCond { condition, true_label, false_label } => {
                write!(f, "br i1 {condition}, label %L{true_label}, label %L{false_label}")
            }
            Instruction::Phi { result, incoming, result_type } => {
                let edges: Vec<String> = incoming.iter().map(|(value, label)| format!("[{value}, %L{label}]")).collect();
                write!(f, "%{result} = phi {result_type} {}", Joined(&edges))
            }
        }
    }
}
