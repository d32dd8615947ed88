//! Statement constructors

use super::context::FunctionContext;
use super::conversions::{cast, to_boolean};
use super::errors::{SemanticError, SemanticWarning};
use super::AstBuilder;
use crate::ast::{Expression, Statement, StatementKind};
use crate::symbol::SymbolRef;

impl<'a> AstBuilder<'a> {
    pub fn expression_statement(&mut self, expr: Expression) -> Statement {
        Statement::new(StatementKind::Expression(expr))
    }

    /// The canonical empty statement
    pub fn void_statement(&mut self) -> Statement {
        self.expression_statement(Expression::void())
    }

    pub fn compound(&mut self, statements: Vec<Statement>) -> Statement {
        Statement::new(StatementKind::Compound(statements))
    }

    pub fn declaration(&mut self, symbols: Vec<SymbolRef>) -> Statement {
        Statement::new(StatementKind::Declaration(symbols))
    }

    pub fn if_stmt(&mut self, condition: Expression, then_stmt: Statement) -> Statement {
        Statement::new(StatementKind::If {
            condition: to_boolean(condition),
            then_stmt: Box::new(then_stmt),
        })
    }

    pub fn if_else(&mut self, condition: Expression, then_stmt: Statement, else_stmt: Statement) -> Statement {
        Statement::new(StatementKind::IfElse {
            condition: to_boolean(condition),
            then_stmt: Box::new(then_stmt),
            else_stmt: Box::new(else_stmt),
        })
    }

    pub fn while_loop(&mut self, condition: Expression, body: Statement) -> Statement {
        Statement::new(StatementKind::While {
            condition: to_boolean(condition),
            body: Box::new(body),
        })
    }

    pub fn do_while(&mut self, condition: Expression, body: Statement) -> Statement {
        Statement::new(StatementKind::DoWhile {
            body: Box::new(body),
            condition: to_boolean(condition),
        })
    }

    /// `for (init; cond; next) body` becomes
    /// `{ init; while (cond) { body; next; } }`
    pub fn for_loop(&mut self, init: Expression, condition: Expression, next: Expression, body: Statement) -> Statement {
        log::debug!("Desugaring for loop on '{}' into while", condition);
        let next = self.expression_statement(next);
        let loop_body = self.compound(vec![body, next]);
        let init = self.expression_statement(init);
        let looping = self.while_loop(condition, loop_body);
        self.compound(vec![init, looping])
    }

    /// `return;`
    pub fn return_void(&mut self, function: &FunctionContext) -> Statement {
        if !function.return_type.is_void() {
            self.diagnostics.error(SemanticError::VoidMismatch {
                expected: function.return_type.clone(),
                found: crate::types::Type::void(),
            });
        }
        Statement::new(StatementKind::Return(None))
    }

    /// `return expr;`
    ///
    /// A value whose type differs from the declared return type is cast
    /// to it with a warning when both are basic types. Any other mismatch
    /// is an error and the value is kept unconverted.
    pub fn return_stmt(&mut self, function: &FunctionContext, expr: Expression) -> Statement {
        if expr.is_void() {
            return self.return_void(function);
        }

        let expected = &function.return_type;
        let found = expr.ty().clone();
        let expr = if expected.is_void() {
            self.diagnostics.error(SemanticError::VoidMismatch {
                expected: expected.clone(),
                found,
            });
            expr
        } else if *expected == found {
            expr
        } else if expected.is_basic() && found.is_basic() {
            self.diagnostics.warning(SemanticWarning::ImplicitCast {
                context: "return statement",
                from: found,
                to: expected.clone(),
            });
            cast(expr, expected)
        } else {
            self.diagnostics.error(SemanticError::TypeMismatch {
                context: "return statement",
                expected: expected.clone(),
                found,
            });
            expr
        };

        Statement::new(StatementKind::Return(Some(expr)))
    }

    // The constructors below belong to a control flow surface the
    // language does not implement yet; each one yields the empty
    // statement and drops its operands.

    pub fn continue_stmt(&mut self) -> Statement {
        self.void_statement()
    }

    pub fn break_stmt(&mut self) -> Statement {
        self.void_statement()
    }

    pub fn goto_stmt(&mut self, _label: &str) -> Statement {
        self.void_statement()
    }

    pub fn switch_stmt(&mut self, _test: Expression, _body: Statement) -> Statement {
        self.void_statement()
    }

    pub fn label(&mut self, _statement: Statement, _name: &str) -> Statement {
        self.void_statement()
    }

    pub fn case(&mut self, _statement: Statement, _value: Expression) -> Statement {
        self.void_statement()
    }

    pub fn default_case(&mut self, _statement: Statement) -> Statement {
        self.void_statement()
    }
}
