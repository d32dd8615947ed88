//! Statement lowering

use super::expressions::ExpressionGenerator;
use super::types::convert_type;
use super::VarInfo;
use crate::ast::{Expression, Statement, StatementKind};
use crate::ir::{IrBuilder, IrType, Value};
use crate::symbol::SymbolRef;
use bcc_common::{CompilerError, SymbolId};
use rustc_hash::FxHashMap;

pub(super) struct StatementGenerator<'a> {
    pub builder: &'a mut IrBuilder,
    pub globals: &'a FxHashMap<SymbolId, VarInfo>,
    pub locals: &'a mut FxHashMap<SymbolId, VarInfo>,
    pub return_type: &'a IrType,
}

impl<'a> StatementGenerator<'a> {
    pub fn generate(&mut self, stmt: &Statement) -> Result<(), CompilerError> {
        match stmt.kind() {
            StatementKind::Expression(expr) => {
                self.expression(expr)?;
                Ok(())
            }

            StatementKind::Compound(statements) => {
                for stmt in statements {
                    self.generate(stmt)?;
                }
                Ok(())
            }

            StatementKind::Declaration(symbols) => {
                for symbol in symbols {
                    self.generate_local(symbol)?;
                }
                Ok(())
            }

            StatementKind::If { condition, then_stmt } => self.generate_if(condition, then_stmt, None),

            StatementKind::IfElse { condition, then_stmt, else_stmt } => {
                self.generate_if(condition, then_stmt, Some(else_stmt))
            }

            StatementKind::While { condition, body } => self.generate_while(condition, body),

            StatementKind::DoWhile { body, condition } => self.generate_do_while(body, condition),

            StatementKind::Return(expr) => self.generate_return(expr.as_ref()),
        }
    }

    /// Close the function: a body that can fall off its end returns
    /// implicitly, with zero for non-void functions
    pub fn finish_function(&mut self) -> Result<(), CompilerError> {
        if self.builder.current_block_has_terminator() {
            return Ok(());
        }
        let value = match self.return_type {
            IrType::Void => None,
            IrType::F32 => Some(Value::FloatConstant(0.0)),
            _ => Some(Value::Constant(0)),
        };
        self.builder.build_return(value)?;
        Ok(())
    }

    fn expression(&mut self, expr: &Expression) -> Result<Value, CompilerError> {
        let mut expr_gen = ExpressionGenerator {
            builder: self.builder,
            globals: self.globals,
            locals: self.locals,
        };
        expr_gen.generate(expr)
    }

    fn generate_local(&mut self, symbol: &SymbolRef) -> Result<(), CompilerError> {
        // Local prototypes produce nothing
        if symbol.ty.is_function() {
            return Ok(());
        }
        let ir_type = convert_type(&symbol.ty)?;
        let address = self.builder.build_alloca(ir_type.clone())?;
        self.locals.insert(
            symbol.id,
            VarInfo {
                address,
                ir_type,
                holds_reference: false,
            },
        );
        Ok(())
    }

    /// Branch to `label` unless the current block already ended
    fn branch_if_open(&mut self, label: bcc_common::LabelId) -> Result<(), CompilerError> {
        if !self.builder.current_block_has_terminator() {
            self.builder.build_branch(label)?;
        }
        Ok(())
    }

    fn generate_if(
        &mut self,
        condition: &Expression,
        then_stmt: &Statement,
        else_stmt: Option<&Statement>,
    ) -> Result<(), CompilerError> {
        let cond_val = self.expression(condition)?;

        let then_label = self.builder.new_label();
        let else_label = else_stmt.map(|_| self.builder.new_label());
        let end_label = self.builder.new_label();

        self.builder.build_branch_cond(cond_val, then_label, else_label.unwrap_or(end_label))?;

        self.builder.create_block(then_label)?;
        self.generate(then_stmt)?;
        self.branch_if_open(end_label)?;

        if let (Some(else_stmt), Some(else_label)) = (else_stmt, else_label) {
            self.builder.create_block(else_label)?;
            self.generate(else_stmt)?;
            self.branch_if_open(end_label)?;
        }

        self.builder.create_block(end_label)?;
        Ok(())
    }

    fn generate_while(&mut self, condition: &Expression, body: &Statement) -> Result<(), CompilerError> {
        let cond_label = self.builder.new_label();
        let body_label = self.builder.new_label();
        let end_label = self.builder.new_label();

        self.builder.build_branch(cond_label)?;

        self.builder.create_block(cond_label)?;
        let cond_val = self.expression(condition)?;
        self.builder.build_branch_cond(cond_val, body_label, end_label)?;

        self.builder.create_block(body_label)?;
        self.generate(body)?;
        self.branch_if_open(cond_label)?;

        self.builder.create_block(end_label)?;
        Ok(())
    }

    fn generate_do_while(&mut self, body: &Statement, condition: &Expression) -> Result<(), CompilerError> {
        let body_label = self.builder.new_label();
        let cond_label = self.builder.new_label();
        let end_label = self.builder.new_label();

        self.builder.build_branch(body_label)?;

        self.builder.create_block(body_label)?;
        self.generate(body)?;
        self.branch_if_open(cond_label)?;

        self.builder.create_block(cond_label)?;
        let cond_val = self.expression(condition)?;
        self.builder.build_branch_cond(cond_val, body_label, end_label)?;

        self.builder.create_block(end_label)?;
        Ok(())
    }

    fn generate_return(&mut self, expr: Option<&Expression>) -> Result<(), CompilerError> {
        let value = match expr {
            Some(expr) => Some(self.expression(expr)?),
            None => None,
        };
        self.builder.build_return(value)?;

        // Anything after a return still needs a block to land in
        let unreachable = self.builder.new_label();
        self.builder.create_block(unreachable)?;
        Ok(())
    }
}
