//! Expression constructors
//!
//! Operands that already carry an unresolved type (`generic` or `undef`)
//! were reported when they were built; they are accepted here without a
//! second diagnostic.

use super::conversions::{cast, to_boolean};
use super::errors::SemanticError;
use super::AstBuilder;
use crate::ast::{BinaryOp, Constant, Expression, ExpressionKind, XcrementOp};
use crate::symbol::{Symbol, SymbolRef, SymbolTable};
use crate::types::Type;
use std::sync::Arc;

impl<'a> AstBuilder<'a> {
    /// The "no value" expression
    pub fn void_expression(&mut self) -> Expression {
        Expression::void()
    }

    pub fn constant(&mut self, value: Constant) -> Expression {
        Expression::constant(value)
    }

    pub fn symbol(&mut self, symbol: SymbolRef) -> Expression {
        Expression::symbol(symbol)
    }

    /// Resolve `name` in the current scopes. An undeclared name is reported
    /// and stands in as a `generic` symbol so checking can go on.
    pub fn symbol_named(&mut self, symbols: &SymbolTable, name: &str) -> Expression {
        match symbols.search(name) {
            Some(symbol) => Expression::symbol(symbol),
            None => {
                self.diagnostics.error(SemanticError::UndefinedSymbol { name: name.to_string() });
                Expression::symbol(Arc::new(Symbol::new(name, Type::generic())))
            }
        }
    }

    pub fn funcall(&mut self, callee: SymbolRef, args: Vec<Expression>) -> Expression {
        let (return_type, params) = match (callee.ty.function_return(), callee.ty.function_params()) {
            (Some(return_type), Some(params)) => (return_type.clone(), params.to_vec()),
            _ => {
                if !callee.ty.is_unresolved() {
                    self.diagnostics.error(SemanticError::NotCallable {
                        name: callee.name.clone(),
                        ty: callee.ty.clone(),
                    });
                }
                let ty = if callee.ty.is_unresolved() { Type::generic() } else { Type::undef() };
                return Expression::new(ExpressionKind::Funcall { callee, args }, ty);
            }
        };

        if params.len() != args.len() {
            self.diagnostics.error(SemanticError::ArgumentCountMismatch {
                name: callee.name.clone(),
                expected: params.len(),
                found: args.len(),
            });
        }

        let mut converted = Vec::with_capacity(args.len());
        let mut args = args.into_iter();
        for param in &params {
            match args.next() {
                Some(arg) => converted.push(self.coerce(arg, param, "function argument")),
                None => break,
            }
        }
        converted.extend(args);

        Expression::new(ExpressionKind::Funcall { callee, args: converted }, return_type)
    }

    /// `array[index]`. The index is widened to `long`.
    pub fn array_index(&mut self, array: Expression, index: Expression) -> Expression {
        let array_ty = array.ty();
        let ty = if let Some(element) = array_ty.array_element() {
            element.clone()
        } else if let Some(pointee) = array_ty.pointee() {
            pointee.clone()
        } else if array_ty.is_unresolved() {
            Type::generic()
        } else {
            self.diagnostics.error(SemanticError::NotIndexable { ty: array_ty.clone() });
            Type::undef()
        };

        let index_ty = index.ty().clone();
        let index = if index_ty.is_integer() || index_ty.is_bool() {
            cast(index, &Type::long())
        } else {
            if !index_ty.is_unresolved() {
                self.diagnostics.error(SemanticError::InvalidOperand {
                    operator: "[]".to_string(),
                    ty: index_ty,
                });
            }
            index
        };

        Expression::new(
            ExpressionKind::ArrayIndex {
                array: Box::new(array),
                index: Box::new(index),
            },
            ty,
        )
    }

    pub fn sizeof_type(&mut self, ty: &Type) -> Expression {
        Expression::new(ExpressionKind::Sizeof(ty.clone()), Type::long())
    }

    /// `sizeof expr`; the operand is only used for its type
    pub fn sizeof_expr(&mut self, expr: &Expression) -> Expression {
        let ty = expr.ty().clone();
        self.sizeof_type(&ty)
    }

    pub fn unary_minus(&mut self, operand: Expression) -> Expression {
        let ty = operand.ty().clone();
        if ty.is_unresolved() {
            return Expression::new(ExpressionKind::UnaryMinus(Box::new(operand)), ty);
        }
        if !ty.is_arithmetic() {
            self.diagnostics.error(SemanticError::InvalidOperand {
                operator: "-".to_string(),
                ty,
            });
            return Expression::new(ExpressionKind::UnaryMinus(Box::new(operand)), Type::undef());
        }

        let operand = if ty.is_bool() { cast(operand, &Type::int()) } else { operand };
        let ty = operand.ty().clone();
        Expression::new(ExpressionKind::UnaryMinus(Box::new(operand)), ty)
    }

    /// `target = value`, typed as the target
    pub fn assignment(&mut self, target: Expression, value: Expression) -> Expression {
        let ty = target.ty().clone();
        if !target.is_lvalue() && !ty.is_unresolved() {
            self.diagnostics.error(SemanticError::NotAnLvalue { expression: target.to_string() });
        }
        let value = self.coerce(value, &ty, "assignment");
        Expression::new(
            ExpressionKind::Assignment {
                target: Box::new(target),
                value: Box::new(value),
            },
            ty,
        )
    }

    /// `++x`, `x++`, `--x`, `x--`
    pub fn xcrement(&mut self, op: XcrementOp, operand: Expression) -> Expression {
        let ty = operand.ty().clone();
        if !ty.is_unresolved() {
            if !operand.is_lvalue() {
                self.diagnostics.error(SemanticError::NotAnLvalue { expression: operand.to_string() });
            } else if !(ty.is_integer() || ty.is_float() || ty.is_pointer()) {
                self.diagnostics.error(SemanticError::InvalidOperand {
                    operator: op.to_string(),
                    ty: ty.clone(),
                });
            }
        }
        Expression::new(
            ExpressionKind::Xcrement {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    /// Binary operators.
    ///
    /// Arithmetic and comparison operands are brought to a common type,
    /// the more precise of the two and at least `int`. Comparisons and
    /// logical operators yield `bool`; logical operands are coerced like
    /// conditions.
    pub fn binary(&mut self, op: BinaryOp, left: Expression, right: Expression) -> Expression {
        if op.is_logical() {
            return binary_node(op, to_boolean(left), to_boolean(right), Type::bool());
        }

        let result_for = |common: Type| if op.is_comparison() { Type::bool() } else { common };

        let (lt, rt) = (left.ty().clone(), right.ty().clone());
        if lt.is_unresolved() || rt.is_unresolved() {
            return binary_node(op, left, right, result_for(Type::generic()));
        }

        let mut valid = true;
        for ty in [&lt, &rt] {
            let acceptable = ty.is_arithmetic() && !(op == BinaryOp::Mod && ty.is_float());
            if !acceptable {
                self.diagnostics.error(SemanticError::InvalidOperand {
                    operator: op.to_string(),
                    ty: ty.clone(),
                });
                valid = false;
            }
        }
        if !valid {
            let ty = if op.is_comparison() { Type::bool() } else { Type::undef() };
            return binary_node(op, left, right, ty);
        }

        let common = [&lt, &rt, &Type::int()]
            .into_iter()
            .max_by_key(|ty| ty.precision())
            .cloned()
            .unwrap_or_else(Type::int)
            .unqualified();
        let left = cast(left, &common);
        let right = cast(right, &common);
        binary_node(op, left, right, result_for(common))
    }
}

fn binary_node(op: BinaryOp, left: Expression, right: Expression, ty: Type) -> Expression {
    Expression::new(
        ExpressionKind::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        ty,
    )
}
