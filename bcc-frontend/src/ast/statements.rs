//! Statement AST nodes and function definitions
//!
//! There is no `for` node: counting loops are rewritten into `While`
//! when they are built.

use super::expressions::Expression;
use crate::symbol::SymbolRef;

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub(crate) kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// Expression statement; a void expression makes the empty statement
    Expression(Expression),

    /// Compound statement (block), executed in order
    Compound(Vec<Statement>),

    /// Local declarations
    Declaration(Vec<SymbolRef>),

    /// `condition` is always boolean typed
    If {
        condition: Expression,
        then_stmt: Box<Statement>,
    },

    IfElse {
        condition: Expression,
        then_stmt: Box<Statement>,
        else_stmt: Box<Statement>,
    },

    While {
        condition: Expression,
        body: Box<Statement>,
    },

    DoWhile {
        body: Box<Statement>,
        condition: Expression,
    },

    /// `None` for `return;`
    Return(Option<Expression>),
}

impl Statement {
    pub(crate) fn new(kind: StatementKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &StatementKind {
        &self.kind
    }

    /// True for the canonical empty statement
    pub fn is_empty(&self) -> bool {
        matches!(&self.kind, StatementKind::Expression(expr) if expr.is_void())
    }
}

/// A function body together with the symbols it was declared with
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub symbol: SymbolRef,
    pub parameters: Vec<SymbolRef>,
    pub body: Statement,
}

impl FunctionDefinition {
    pub fn name(&self) -> &str {
        &self.symbol.name
    }
}

/// Items at file scope, in source order
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevelItem {
    Function(FunctionDefinition),
    Declaration(Vec<SymbolRef>),
}
