//! IR operations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operations in IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrBinaryOp {
    // Integer arithmetic
    Add, Sub, Mul, SDiv, SRem,

    // Floating point arithmetic
    FAdd, FSub, FMul, FDiv,

    // Integer comparison (return i1)
    Eq, Ne, Slt, Sle, Sgt, Sge,

    // Ordered floating point comparison (return i1)
    FEq, FNe, FLt, FLe, FGt, FGe,
}

impl fmt::Display for IrBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            IrBinaryOp::Add => "add",
            IrBinaryOp::Sub => "sub",
            IrBinaryOp::Mul => "mul",
            IrBinaryOp::SDiv => "sdiv",
            IrBinaryOp::SRem => "srem",
            IrBinaryOp::FAdd => "fadd",
            IrBinaryOp::FSub => "fsub",
            IrBinaryOp::FMul => "fmul",
            IrBinaryOp::FDiv => "fdiv",
            IrBinaryOp::Eq => "icmp eq",
            IrBinaryOp::Ne => "icmp ne",
            IrBinaryOp::Slt => "icmp slt",
            IrBinaryOp::Sle => "icmp sle",
            IrBinaryOp::Sgt => "icmp sgt",
            IrBinaryOp::Sge => "icmp sge",
            IrBinaryOp::FEq => "fcmp oeq",
            IrBinaryOp::FNe => "fcmp one",
            IrBinaryOp::FLt => "fcmp olt",
            IrBinaryOp::FLe => "fcmp ole",
            IrBinaryOp::FGt => "fcmp ogt",
            IrBinaryOp::FGe => "fcmp oge",
        };
        write!(f, "{op_str}")
    }
}

/// Unary operations and conversions in IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrUnaryOp {
    Neg,
    FNeg,
    ZExt,
    SExt,
    Trunc,
    FpToSi,
    SiToFp,
    Bitcast,
}

impl fmt::Display for IrUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            IrUnaryOp::Neg => "neg",
            IrUnaryOp::FNeg => "fneg",
            IrUnaryOp::ZExt => "zext",
            IrUnaryOp::SExt => "sext",
            IrUnaryOp::Trunc => "trunc",
            IrUnaryOp::FpToSi => "fptosi",
            IrUnaryOp::SiToFp => "sitofp",
            IrUnaryOp::Bitcast => "bitcast",
        };
        write!(f, "{op_str}")
    }
}
