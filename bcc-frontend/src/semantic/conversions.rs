//! Implicit and explicit conversions between types

use super::errors::{SemanticError, SemanticWarning};
use super::AstBuilder;
use crate::ast::{BinaryOp, Constant, Expression, ExpressionKind};
use crate::types::Type;

/// Make `cond` usable as a branch condition: boolean expressions are kept
/// as they are, anything else becomes `cond != 0` against an `int` zero.
pub(crate) fn to_boolean(cond: Expression) -> Expression {
    if cond.is_boolean() {
        return cond;
    }
    let zero = Expression::constant(Constant::int(0));
    log::debug!("Coercing condition '{}' of type {} to boolean", cond, cond.ty());
    Expression::new(
        ExpressionKind::BinaryOp {
            op: BinaryOp::NotEqual,
            left: Box::new(cond),
            right: Box::new(zero),
        },
        Type::bool(),
    )
}

/// Convert `expr` to `target`, picking the conversion node from the two
/// types. Never fails; conversions between unrelated types are bitcasts.
pub(crate) fn cast(expr: Expression, target: &Type) -> Expression {
    let source = expr.ty().clone();
    if source == *target {
        return expr;
    }

    if source.is_unresolved() || target.is_unresolved() {
        return wrap(ExpressionKind::Bitcast(Box::new(expr)), target);
    }

    if target.is_bool() && source.is_arithmetic() {
        return to_boolean(expr);
    }

    if source.is_arithmetic() && target.is_arithmetic() && source.is_float() != target.is_float() {
        return wrap(ExpressionKind::FpSiCast(Box::new(expr)), target);
    }

    if source.is_arithmetic() && target.is_arithmetic() && !source.is_float() {
        let kind = match source.precision().cmp(&target.precision()) {
            std::cmp::Ordering::Less if source.is_bool() => ExpressionKind::ZeroExtend(Box::new(expr)),
            std::cmp::Ordering::Less => ExpressionKind::SignExtend(Box::new(expr)),
            std::cmp::Ordering::Greater => ExpressionKind::Trunc(Box::new(expr)),
            std::cmp::Ordering::Equal => ExpressionKind::Bitcast(Box::new(expr)),
        };
        return wrap(kind, target);
    }

    wrap(ExpressionKind::Bitcast(Box::new(expr)), target)
}

fn wrap(kind: ExpressionKind, target: &Type) -> Expression {
    Expression::new(kind, target.clone())
}

impl<'a> AstBuilder<'a> {
    /// Explicit conversion of `expr` to `target`
    pub fn cast(&mut self, expr: Expression, target: &Type) -> Expression {
        cast(expr, target)
    }

    /// Boolean coercion of a condition
    pub fn to_boolean(&mut self, cond: Expression) -> Expression {
        to_boolean(cond)
    }

    /// Implicit conversion of `expr` to `target` on behalf of `context`.
    ///
    /// Equal types pass through. An array decays silently to a pointer to
    /// its element. Other basic-to-basic conversions warn and cast.
    /// Anything else is a type mismatch and `expr` is returned as is.
    pub(crate) fn coerce(&mut self, expr: Expression, target: &Type, context: &'static str) -> Expression {
        let source = expr.ty().clone();
        if source == *target || source.is_unresolved() || target.is_unresolved() {
            return expr;
        }

        if let (Some(element), Some(pointee)) = (source.array_element(), target.pointee()) {
            if element == pointee {
                log::debug!("Array '{}' decays to {}", expr, target);
                return wrap(ExpressionKind::Bitcast(Box::new(expr)), target);
            }
        }

        if source.is_basic() && target.is_basic() && !source.is_void() && !target.is_void() {
            self.diagnostics.warning(SemanticWarning::ImplicitCast {
                context,
                from: source,
                to: target.clone(),
            });
            return cast(expr, target);
        }

        self.diagnostics.error(SemanticError::TypeMismatch {
            context,
            expected: target.clone(),
            found: source,
        });
        expr
    }
}
