//! End-to-end tests: build a unit through `CompilationUnit` and lower it

use bcc_common::{CompilerError, StorageClass};
use bcc_frontend::ast::{BinaryOp, Constant, Expression, TopLevelItem, XcrementOp};
use bcc_frontend::ir::{Function, Instruction, IrBinaryOp, IrType, IrUnaryOp, Linkage, Module, Value};
use bcc_frontend::semantic::AstBuilder;
use bcc_frontend::{CompilationUnit, DeclarationContext, Declarator, FrontendConfig, Symbol, SymbolTable, Type};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// ```c
/// int counter;
/// static float scale;
///
/// int add(int a, int b) { return a + b; }
///
/// int main() {
///     int x;
///     x = add(1, 2);
///     if (x) counter = x;
///     return x;
/// }
/// ```
fn build_program(unit: &mut CompilationUnit) -> Vec<TopLevelItem> {
    let int_decl = DeclarationContext::new(Type::int());
    let mut items = Vec::new();

    let counter = unit.declare(Declarator::identifier("counter"), &int_decl).unwrap();
    let scale = unit
        .declare(
            Declarator::identifier("scale"),
            &DeclarationContext::new(Type::float()).with_storage_class(StorageClass::Static),
        )
        .unwrap();
    items.push(TopLevelItem::Declaration(vec![counter, scale]));

    let add = Declarator::identifier("add")
        .function(vec![Symbol::new("a", Type::int()), Symbol::new("b", Type::int())]);
    let header = unit.function_begin(add, &int_decl);
    let body = {
        let mut builder = AstBuilder::new(&mut unit.diagnostics);
        let a = builder.symbol_named(&unit.symbols, "a");
        let b = builder.symbol_named(&unit.symbols, "b");
        let sum = builder.binary(BinaryOp::Add, a, b);
        let ret = builder.return_stmt(&header.context, sum);
        builder.compound(vec![ret])
    };
    items.push(TopLevelItem::Function(unit.function_end(header, body).unwrap()));

    let header = unit.function_begin(Declarator::identifier("main").function(vec![]), &int_decl);
    let x = unit.declare(Declarator::identifier("x"), &int_decl).unwrap();
    let body = {
        let mut builder = AstBuilder::new(&mut unit.diagnostics);
        let decl = builder.declaration(vec![x]);

        let add = unit.symbols.search("add").unwrap();
        let one = builder.constant(Constant::int(1));
        let two = builder.constant(Constant::int(2));
        let call = builder.funcall(add, vec![one, two]);
        let x_ref = builder.symbol_named(&unit.symbols, "x");
        let assign = builder.assignment(x_ref.clone(), call);
        let assign = builder.expression_statement(assign);

        let counter_ref = builder.symbol_named(&unit.symbols, "counter");
        let store = builder.assignment(counter_ref, x_ref.clone());
        let store = builder.expression_statement(store);
        let branch = builder.if_stmt(x_ref.clone(), store);

        let ret = builder.return_stmt(&header.context, x_ref);
        builder.compound(vec![decl, assign, branch, ret])
    };
    items.push(TopLevelItem::Function(unit.function_end(header, body).unwrap()));

    items
}

fn compile() -> Module {
    init_logging();
    let mut unit = CompilationUnit::new(FrontendConfig::new("program.c"));
    let items = build_program(&mut unit);
    assert!(!unit.diagnostics.has_errors(), "{}", unit.diagnostics.reporter().summary());
    unit.finish(&items).unwrap()
}

#[test]
fn test_module_layout() {
    let module = compile();
    assert_eq!(module.name, "program.c");

    let globals: Vec<_> = module.globals.iter().map(|g| (g.name.as_str(), g.linkage)).collect();
    assert_eq!(globals, vec![("counter", Linkage::External), ("scale", Linkage::Internal)]);
    assert_eq!(module.get_global("scale").unwrap().var_type, IrType::F32);

    let add = module.get_function("add").unwrap();
    assert_eq!(add.return_type, IrType::I32);
    assert_eq!(add.parameters.len(), 2);
    assert!(module.get_function("main").unwrap().parameters.is_empty());
}

#[test]
fn test_every_block_is_terminated() {
    let module = compile();
    for function in &module.functions {
        assert!(!function.blocks.is_empty());
        for block in &function.blocks {
            assert!(block.has_terminator(), "L{} of {} falls through", block.id, function.name);
        }
    }
}

#[test]
fn test_call_and_branch_are_emitted() {
    let module = compile();
    let main = module.get_function("main").unwrap();
    let instructions: Vec<&Instruction> = main.blocks.iter().flat_map(|b| &b.instructions).collect();

    assert!(instructions.iter().any(|i| matches!(i, Instruction::Call { .. })));
    assert!(instructions.iter().any(|i| matches!(i, Instruction::BranchCond { .. })));
    assert!(instructions.iter().any(|i| matches!(i, Instruction::Alloca { .. })));
}

#[test]
fn test_json_round_trip() {
    let module = compile();
    let json = module.to_json().unwrap();
    let restored = Module::from_json(&json).unwrap();
    assert_eq!(restored, module);
}

#[test]
fn test_unit_with_errors_is_rejected() {
    init_logging();
    let mut unit = CompilationUnit::new(FrontendConfig::new("broken.c"));
    let int_decl = DeclarationContext::new(Type::int());

    let header = unit.function_begin(Declarator::identifier("f").function(vec![]), &int_decl);
    let body = {
        let mut builder = AstBuilder::new(&mut unit.diagnostics);
        let missing = builder.symbol_named(&unit.symbols, "missing");
        let ret = builder.return_stmt(&header.context, missing);
        builder.compound(vec![ret])
    };
    let items = vec![TopLevelItem::Function(unit.function_end(header, body).unwrap())];

    match unit.finish(&items) {
        Err(CompilerError::UnitRejected { unit, summary }) => {
            assert_eq!(unit, "broken.c");
            assert_eq!(summary, "1 error");
        }
        other => panic!("expected the unit to be rejected, got {other:?}"),
    }
}

#[test]
fn test_warnings_as_errors_rejects_unit() {
    let config = FrontendConfig::new("strict.c").with_warnings_as_errors(true);
    let mut unit = CompilationUnit::new(config);
    let header = unit.function_begin(
        Declarator::identifier("f").function(vec![]),
        &DeclarationContext::new(Type::float()),
    );
    let body = {
        let mut builder = AstBuilder::new(&mut unit.diagnostics);
        let one = builder.constant(Constant::int(1));
        builder.return_stmt(&header.context, one)
    };
    let items = vec![TopLevelItem::Function(unit.function_end(header, body).unwrap())];

    assert!(matches!(unit.finish(&items), Err(CompilerError::UnitRejected { .. })));

    // The same unit compiles once warnings are tolerated
    let mut unit = CompilationUnit::new(FrontendConfig::new("lenient.c"));
    let header = unit.function_begin(
        Declarator::identifier("f").function(vec![]),
        &DeclarationContext::new(Type::float()),
    );
    let body = {
        let mut builder = AstBuilder::new(&mut unit.diagnostics);
        let one = builder.constant(Constant::int(1));
        builder.return_stmt(&header.context, one)
    };
    let items = vec![TopLevelItem::Function(unit.function_end(header, body).unwrap())];
    let module = unit.finish(&items).unwrap();
    assert_eq!(module.get_function("f").unwrap().return_type, IrType::F32);
    assert_eq!(unit.diagnostics.warnings().len(), 1);
}

/// ```c
/// float scaled(int n) {
///     int a[4]; int i; float f; long wide; byte narrow; int flag;
///     wide = n; narrow = n; flag = n < 4;
///     for (i = 0; i < n && i < 4; i++) a[i] = i;
///     do i--; while (i);
///     f = a[1];
///     if (f) return f;
///     return f;
/// }
/// ```
fn build_loops(unit: &mut CompilationUnit) -> Vec<TopLevelItem> {
    let int_decl = DeclarationContext::new(Type::int());
    let declarator = Declarator::identifier("scaled").function(vec![Symbol::new("n", Type::int())]);
    let header = unit.function_begin(declarator, &DeclarationContext::new(Type::float()));

    let four = Expression::constant(Constant::int(4));
    let mut locals = vec![unit.declare(Declarator::identifier("a").array(four), &int_decl).unwrap()];
    for (name, ty) in [
        ("i", Type::int()),
        ("f", Type::float()),
        ("wide", Type::long()),
        ("narrow", Type::byte()),
        ("flag", Type::int()),
    ] {
        locals.push(unit.declare(Declarator::identifier(name), &DeclarationContext::new(ty)).unwrap());
    }

    let body = {
        let mut builder = AstBuilder::new(&mut unit.diagnostics);
        let symbols = &unit.symbols;
        let mut statements = vec![builder.declaration(locals)];

        for target in ["wide", "narrow"] {
            let target = lookup(&mut builder, symbols, target);
            let n = lookup(&mut builder, symbols, "n");
            let assign = builder.assignment(target, n);
            statements.push(builder.expression_statement(assign));
        }
        let (flag, n) = (lookup(&mut builder, symbols, "flag"), lookup(&mut builder, symbols, "n"));
        let four = builder.constant(Constant::int(4));
        let less = builder.binary(BinaryOp::Less, n, four);
        let assign = builder.assignment(flag, less);
        statements.push(builder.expression_statement(assign));

        let i = lookup(&mut builder, symbols, "i");
        let zero = builder.constant(Constant::int(0));
        let init = builder.assignment(i.clone(), zero);
        let n = lookup(&mut builder, symbols, "n");
        let below_n = builder.binary(BinaryOp::Less, i.clone(), n);
        let four = builder.constant(Constant::int(4));
        let below_four = builder.binary(BinaryOp::Less, i.clone(), four);
        let cond = builder.binary(BinaryOp::LogicalAnd, below_n, below_four);
        let next = builder.xcrement(XcrementOp::PostIncrement, i.clone());
        let a = lookup(&mut builder, symbols, "a");
        let slot = builder.array_index(a, i.clone());
        let store = builder.assignment(slot, i.clone());
        let store = builder.expression_statement(store);
        statements.push(builder.for_loop(init, cond, next, store));

        let step = builder.xcrement(XcrementOp::PostDecrement, i.clone());
        let step = builder.expression_statement(step);
        statements.push(builder.do_while(i, step));

        let (f, a) = (lookup(&mut builder, symbols, "f"), lookup(&mut builder, symbols, "a"));
        let one = builder.constant(Constant::int(1));
        let element = builder.array_index(a, one);
        let assign = builder.assignment(f.clone(), element);
        statements.push(builder.expression_statement(assign));

        let early = builder.return_stmt(&header.context, f.clone());
        statements.push(builder.if_stmt(f.clone(), early));
        statements.push(builder.return_stmt(&header.context, f));
        builder.compound(statements)
    };
    vec![TopLevelItem::Function(unit.function_end(header, body).unwrap())]
}

fn lookup(builder: &mut AstBuilder<'_>, symbols: &SymbolTable, name: &str) -> Expression {
    builder.symbol_named(symbols, name)
}

fn compile_loops() -> (Module, usize) {
    init_logging();
    let mut unit = CompilationUnit::new(FrontendConfig::new("loops.c"));
    let items = build_loops(&mut unit);
    assert!(!unit.diagnostics.has_errors(), "{}", unit.diagnostics.reporter().summary());
    let warnings = unit.diagnostics.warnings().len();
    (unit.finish(&items).unwrap(), warnings)
}

fn instructions(function: &Function) -> Vec<&Instruction> {
    function.blocks.iter().flat_map(|b| &b.instructions).collect()
}

fn unary_ops(function: &Function) -> Vec<IrUnaryOp> {
    instructions(function)
        .into_iter()
        .filter_map(|i| match i {
            Instruction::Unary { op, .. } => Some(*op),
            _ => None,
        })
        .collect()
}

#[test]
fn test_loops_are_lowered_into_terminated_blocks() {
    let (module, warnings) = compile_loops();
    // wide = n, narrow = n, flag = n < 4 and f = a[1]
    assert_eq!(warnings, 4);

    let scaled = module.get_function("scaled").unwrap();
    for block in &scaled.blocks {
        assert!(block.has_terminator(), "L{} falls through", block.id);
    }

    // The while body and the do/while condition both jump back
    let back_edges = scaled
        .blocks
        .iter()
        .filter_map(|b| b.instructions.last().map(|last| (b.id, last)))
        .filter(|(id, last)| match last {
            Instruction::Branch(target) => target < id,
            Instruction::BranchCond { true_label, .. } => true_label < id,
            _ => false,
        })
        .count();
    assert!(back_edges >= 2, "expected loops in\n{scaled}");
}

#[test]
fn test_logical_and_merges_through_phi() {
    let (module, _) = compile_loops();
    let scaled = module.get_function("scaled").unwrap();

    let merge = scaled
        .blocks
        .iter()
        .find(|b| matches!(b.instructions.first(), Some(Instruction::Phi { .. })))
        .expect("a block opening with a phi");
    let Some(Instruction::Phi { incoming, result_type, .. }) = merge.instructions.first() else {
        unreachable!()
    };
    assert_eq!(result_type, &IrType::I1);
    assert_eq!(incoming.len(), 2);
    assert_eq!(incoming[0].0, Value::Constant(0));

    for (_, label) in incoming {
        let pred = scaled.get_block(*label).unwrap();
        let reaches_merge = match pred.instructions.last() {
            Some(Instruction::Branch(target)) => *target == merge.id,
            Some(Instruction::BranchCond { true_label, false_label, .. }) => {
                *true_label == merge.id || *false_label == merge.id
            }
            _ => false,
        };
        assert!(reaches_merge, "L{label} does not reach L{}", merge.id);
    }
}

#[test]
fn test_indexing_and_increments() {
    let (module, _) = compile_loops();
    let scaled = module.get_function("scaled").unwrap();
    let instructions = instructions(scaled);

    let geps: Vec<_> = instructions
        .iter()
        .filter_map(|i| match i {
            Instruction::GetElementPtr { indices, result_type, .. } => Some((indices.len(), result_type)),
            _ => None,
        })
        .collect();
    let element_pointer = IrType::I32.pointer_to();
    assert_eq!(geps, vec![(1, &element_pointer), (1, &element_pointer)]);

    let steps: Vec<_> = instructions
        .iter()
        .filter_map(|i| match i {
            Instruction::Binary { op, rhs: Value::Constant(1), operand_type: IrType::I32, .. } => Some(*op),
            _ => None,
        })
        .collect();
    assert_eq!(steps, vec![IrBinaryOp::Add, IrBinaryOp::Sub]);
}

#[test]
fn test_conversions_are_emitted() {
    let (module, _) = compile_loops();
    let scaled = module.get_function("scaled").unwrap();
    let ops = unary_ops(scaled);

    for op in [IrUnaryOp::SExt, IrUnaryOp::Trunc, IrUnaryOp::ZExt, IrUnaryOp::SiToFp] {
        assert!(ops.contains(&op), "no {op} in {ops:?}");
    }
    // wide = n, then both indices are widened to long
    assert_eq!(ops.iter().filter(|op| **op == IrUnaryOp::SExt).count(), 3);

    // if (f) compares against a float zero
    assert!(instructions(scaled).iter().any(|i| matches!(
        i,
        Instruction::Binary { op: IrBinaryOp::FNe, rhs: Value::FloatConstant(z), operand_type: IrType::F32, .. } if *z == 0.0
    )));
}

#[test]
fn test_compound_children_are_lowered_in_order() {
    let (module, _) = compile_loops();
    let scaled = module.get_function("scaled").unwrap();
    let entry = &scaled.blocks[0];

    let stored: Vec<&IrType> = entry
        .instructions
        .iter()
        .filter_map(|i| match i {
            Instruction::Store { value_type, .. } => Some(value_type),
            _ => None,
        })
        .collect();
    // spilled n, wide, narrow, flag, then the loop's i = 0
    assert_eq!(stored, vec![&IrType::I32, &IrType::I64, &IrType::I8, &IrType::I32, &IrType::I32]);
    assert!(matches!(entry.instructions.last(), Some(Instruction::Branch(_))));
}
