//! Tests for checked statement construction

use bcc_frontend::ast::{BinaryOp, Constant, Expression, ExpressionKind, Statement, StatementKind};
use bcc_frontend::semantic::{AstBuilder, Diagnostics, FunctionContext, SemanticError, SemanticWarning};
use bcc_frontend::symbol::Symbol;
use bcc_frontend::types::{Type, TypeTable};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn var(name: &str, ty: Type) -> Expression {
    Expression::symbol(Arc::new(Symbol::new(name, ty)))
}

fn int(value: i64) -> Expression {
    Expression::constant(Constant::int(value))
}

fn compound_parts(stmt: &Statement) -> &[Statement] {
    match stmt.kind() {
        StatementKind::Compound(statements) => statements,
        other => panic!("expected a compound statement, got {other:?}"),
    }
}

#[test]
fn test_for_desugars_into_while() {
    let mut diagnostics = Diagnostics::new("loop.c");
    let mut builder = AstBuilder::new(&mut diagnostics);

    let i = var("i", Type::int());
    let init = builder.assignment(i.clone(), int(0));
    let cond = builder.binary(BinaryOp::Less, i.clone(), int(10));
    let next = builder.assignment(i.clone(), int(1));
    let body = builder.void_statement();
    let stmt = builder.for_loop(init.clone(), cond.clone(), next.clone(), body);

    let parts = compound_parts(&stmt);
    assert_eq!(parts.len(), 2);
    assert!(matches!(parts[0].kind(), StatementKind::Expression(e) if *e == init));

    let StatementKind::While { condition, body } = parts[1].kind() else {
        panic!("expected a while loop, got {:?}", parts[1].kind());
    };
    assert_eq!(condition, &cond);

    let loop_body = compound_parts(body);
    assert_eq!(loop_body.len(), 2);
    assert!(loop_body[0].is_empty());
    assert!(matches!(loop_body[1].kind(), StatementKind::Expression(e) if *e == next));
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_for_coerces_its_condition() {
    let mut diagnostics = Diagnostics::new("loop.c");
    let mut builder = AstBuilder::new(&mut diagnostics);

    // for (; n; ) ;
    let n = var("n", Type::short());
    let init = builder.void_expression();
    let next = builder.void_expression();
    let body = builder.void_statement();
    let stmt = builder.for_loop(init, n.clone(), next, body);

    let parts = compound_parts(&stmt);
    let StatementKind::While { condition, .. } = parts[1].kind() else {
        panic!("expected a while loop, got {:?}", parts[1].kind());
    };
    assert_eq!(condition.ty(), &Type::bool());
    assert_eq!(
        condition.kind(),
        &ExpressionKind::BinaryOp {
            op: BinaryOp::NotEqual,
            left: Box::new(n),
            right: Box::new(int(0)),
        }
    );
}

#[test]
fn test_conditions_are_coerced_to_bool() {
    let mut diagnostics = Diagnostics::new("cond.c");
    let mut builder = AstBuilder::new(&mut diagnostics);

    let body = builder.void_statement();
    let stmt = builder.while_loop(var("n", Type::long()), body);
    let StatementKind::While { condition, .. } = stmt.kind() else {
        panic!("expected a while loop");
    };
    assert_eq!(condition.ty(), &Type::bool());
    match condition.kind() {
        ExpressionKind::BinaryOp { op, left, right } => {
            assert_eq!(*op, BinaryOp::NotEqual);
            assert_eq!(left.ty(), &Type::long());
            assert_eq!(right.constant_value(), Some(0));
        }
        other => panic!("expected a comparison against zero, got {other:?}"),
    }

    // Float conditions are compared against the same int zero
    let x = var("x", Type::float());
    let then_stmt = builder.void_statement();
    let stmt = builder.if_stmt(x.clone(), then_stmt);
    let StatementKind::If { condition, .. } = stmt.kind() else {
        panic!("expected an if statement");
    };
    assert_eq!(
        condition.kind(),
        &ExpressionKind::BinaryOp {
            op: BinaryOp::NotEqual,
            left: Box::new(x),
            right: Box::new(int(0)),
        }
    );

    // Already boolean conditions are kept as they are
    let flag = var("flag", Type::bool());
    let then_stmt = builder.void_statement();
    let stmt = builder.if_stmt(flag.clone(), then_stmt);
    assert!(matches!(stmt.kind(), StatementKind::If { condition, .. } if *condition == flag));
}

#[test]
fn test_return_policy() {
    let mut diagnostics = Diagnostics::new("ret.c");
    let float_fn = FunctionContext::new("f", Type::float());
    let void_fn = FunctionContext::new("g", Type::void());

    {
        let mut builder = AstBuilder::new(&mut diagnostics);
        let stmt = builder.return_stmt(&float_fn, int(1));
        let StatementKind::Return(Some(value)) = stmt.kind() else {
            panic!("expected a return with a value");
        };
        assert_eq!(value.ty(), &Type::float());
        assert!(matches!(value.kind(), ExpressionKind::FpSiCast(_)));
    }
    assert!(!diagnostics.has_errors());
    assert_eq!(
        diagnostics.warnings(),
        &[SemanticWarning::ImplicitCast {
            context: "return statement",
            from: Type::int(),
            to: Type::float(),
        }]
    );

    {
        let mut builder = AstBuilder::new(&mut diagnostics);
        builder.return_void(&float_fn);
        builder.return_stmt(&void_fn, int(2));
        let stmt = builder.return_void(&void_fn);
        assert!(matches!(stmt.kind(), StatementKind::Return(None)));
    }
    assert_eq!(
        diagnostics.errors(),
        &[
            SemanticError::VoidMismatch { expected: Type::float(), found: Type::void() },
            SemanticError::VoidMismatch { expected: Type::void(), found: Type::int() },
        ]
    );
    assert_eq!(diagnostics.errors()[0].to_string(), "return value can't be void. expected float");
    assert_eq!(diagnostics.errors()[1].to_string(), "returning non void value");
}

#[test]
fn test_return_of_matching_type_is_unchanged() {
    let mut diagnostics = Diagnostics::new("ret.c");
    let mut builder = AstBuilder::new(&mut diagnostics);
    let function = FunctionContext::new("f", Type::float());
    let value = var("y", Type::float());
    let stmt = builder.return_stmt(&function, value.clone());
    assert_eq!(stmt.kind(), &StatementKind::Return(Some(value)));
    assert!(diagnostics.warnings().is_empty());
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_return_of_composite_mismatch_is_an_error() {
    let mut types = TypeTable::new();
    let pointer = types.make_pointer_type(&Type::int());

    let mut diagnostics = Diagnostics::new("ret.c");
    let mut builder = AstBuilder::new(&mut diagnostics);
    let function = FunctionContext::new("h", Type::int());
    let stmt = builder.return_stmt(&function, var("p", pointer.clone()));
    assert!(matches!(stmt.kind(), StatementKind::Return(Some(value)) if *value.ty() == pointer));
    assert_eq!(
        diagnostics.errors(),
        &[SemanticError::TypeMismatch {
            context: "return statement",
            expected: Type::int(),
            found: pointer,
        }]
    );
}

#[test]
fn test_unimplemented_control_flow_is_empty() {
    let mut diagnostics = Diagnostics::new("flow.c");
    let mut builder = AstBuilder::new(&mut diagnostics);

    let inner = builder.expression_statement(int(3));
    let statements = vec![
        builder.continue_stmt(),
        builder.break_stmt(),
        builder.goto_stmt("out"),
        builder.switch_stmt(int(1), inner.clone()),
        builder.label(inner.clone(), "out"),
        builder.case(inner.clone(), int(1)),
        builder.default_case(inner),
    ];
    for stmt in &statements {
        assert!(stmt.is_empty(), "{stmt:?} is not the empty statement");
    }
    assert!(!diagnostics.has_errors());
    assert!(diagnostics.warnings().is_empty());
}
