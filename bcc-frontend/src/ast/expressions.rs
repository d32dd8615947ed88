//! Expression AST nodes
//!
//! Nodes are immutable once built. Their type is fixed by the checked
//! constructors in [`crate::semantic`] and trusted by every later pass.

use super::ops::{BinaryOp, XcrementOp};
use crate::symbol::SymbolRef;
use crate::types::Type;
use std::fmt;

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Integer { value: i64, ty: Type },
    Float(f64),
    Bool(bool),
}

impl Constant {
    /// Integer literal of type `int`
    pub fn int(value: i64) -> Self {
        Constant::Integer { value, ty: Type::int() }
    }

    pub fn long(value: i64) -> Self {
        Constant::Integer { value, ty: Type::long() }
    }

    pub fn ty(&self) -> Type {
        match self {
            Constant::Integer { ty, .. } => ty.clone(),
            Constant::Float(_) => Type::float(),
            Constant::Bool(_) => Type::bool(),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Integer { value, .. } => write!(f, "{value}"),
            Constant::Float(value) => write!(f, "{value:?}"),
            Constant::Bool(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// No value; the operand of `return;` and the body of empty statements
    Void,
    Symbol(SymbolRef),
    Constant(Constant),
    Funcall {
        callee: SymbolRef,
        args: Vec<Expression>,
    },
    ArrayIndex {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    Sizeof(Type),
    UnaryMinus(Box<Expression>),
    Assignment {
        target: Box<Expression>,
        value: Box<Expression>,
    },
    /// Conversion between floating point and integer
    FpSiCast(Box<Expression>),
    /// Reinterpretation without changing the bits
    Bitcast(Box<Expression>),
    SignExtend(Box<Expression>),
    ZeroExtend(Box<Expression>),
    Trunc(Box<Expression>),
    Xcrement {
        op: XcrementOp,
        operand: Box<Expression>,
    },
    BinaryOp {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub(crate) kind: ExpressionKind,
    pub(crate) ty: Type,
}

impl Expression {
    pub(crate) fn new(kind: ExpressionKind, ty: Type) -> Self {
        Self { kind, ty }
    }

    /// The canonical "no value" expression
    pub fn void() -> Self {
        Self::new(ExpressionKind::Void, Type::void())
    }

    /// A literal. Literals cannot be ill-typed, so this needs no checking.
    pub fn constant(value: Constant) -> Self {
        let ty = value.ty();
        Self::new(ExpressionKind::Constant(value), ty)
    }

    /// A reference to an already resolved symbol, typed as the symbol
    pub fn symbol(symbol: SymbolRef) -> Self {
        let ty = symbol.ty.clone();
        Self::new(ExpressionKind::Symbol(symbol), ty)
    }

    pub fn kind(&self) -> &ExpressionKind {
        &self.kind
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, ExpressionKind::Void)
    }

    /// Already usable as a condition without coercion
    pub fn is_boolean(&self) -> bool {
        self.ty.is_bool()
    }

    /// Whether the expression designates storage that can be assigned
    pub fn is_lvalue(&self) -> bool {
        match &self.kind {
            ExpressionKind::Symbol(symbol) => !symbol.is_function() && !symbol.ty.is_array(),
            ExpressionKind::ArrayIndex { .. } => !self.ty.is_array(),
            _ => false,
        }
    }

    /// Integer value of a literal, if this is one
    pub fn constant_value(&self) -> Option<i64> {
        match &self.kind {
            ExpressionKind::Constant(Constant::Integer { value, .. }) => Some(*value),
            ExpressionKind::Constant(Constant::Bool(value)) => Some(i64::from(*value)),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Void => Ok(()),
            ExpressionKind::Symbol(symbol) => write!(f, "{}", symbol.name),
            ExpressionKind::Constant(constant) => write!(f, "{constant}"),
            ExpressionKind::Funcall { callee, args } => {
                write!(f, "{}(", callee.name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            ExpressionKind::ArrayIndex { array, index } => write!(f, "{array}[{index}]"),
            ExpressionKind::Sizeof(ty) => write!(f, "sizeof({ty})"),
            ExpressionKind::UnaryMinus(operand) => write!(f, "-{operand}"),
            ExpressionKind::Assignment { target, value } => write!(f, "{target} = {value}"),
            ExpressionKind::FpSiCast(operand)
            | ExpressionKind::Bitcast(operand)
            | ExpressionKind::SignExtend(operand)
            | ExpressionKind::ZeroExtend(operand)
            | ExpressionKind::Trunc(operand) => write!(f, "({}){}", self.ty, operand),
            ExpressionKind::Xcrement { op, operand } => {
                if op.is_prefix() {
                    write!(f, "{op}{operand}")
                } else {
                    write!(f, "{operand}{op}")
                }
            }
            ExpressionKind::BinaryOp { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}
