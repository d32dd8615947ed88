//! Operator definitions
//!
//! Binary and increment/decrement operators used in expressions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add, Sub, Mul, Div, Mod,

    // Comparison
    Less, Greater, LessEqual, GreaterEqual, Equal, NotEqual,

    // Logical
    LogicalAnd, LogicalOr,
}

impl BinaryOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less
                | BinaryOp::Greater
                | BinaryOp::LessEqual
                | BinaryOp::GreaterEqual
                | BinaryOp::Equal
                | BinaryOp::NotEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        };
        write!(f, "{op_str}")
    }
}

/// Increment and decrement, prefix or postfix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XcrementOp {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl XcrementOp {
    pub fn is_increment(&self) -> bool {
        matches!(self, XcrementOp::PreIncrement | XcrementOp::PostIncrement)
    }

    /// Prefix forms yield the updated value, postfix forms the old one
    pub fn is_prefix(&self) -> bool {
        matches!(self, XcrementOp::PreIncrement | XcrementOp::PreDecrement)
    }

    fn symbol(&self) -> &'static str {
        if self.is_increment() {
            "++"
        } else {
            "--"
        }
    }
}

impl fmt::Display for XcrementOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
