//! Expression lowering
//!
//! `generate` yields the value of an expression; `generate_address` the
//! address of the storage an lvalue designates. Arrays evaluate to the
//! address of their first element.

use super::errors::CodegenError;
use super::types::convert_type;
use super::VarInfo;
use crate::ast::{BinaryOp, Constant, Expression, ExpressionKind, XcrementOp};
use crate::ir::{IrBinaryOp, IrBuilder, IrType, IrUnaryOp, Value};
use crate::symbol::SymbolRef;
use crate::types::Type;
use bcc_common::{CompilerError, SymbolId};
use rustc_hash::FxHashMap;

pub(super) struct ExpressionGenerator<'a> {
    pub builder: &'a mut IrBuilder,
    pub globals: &'a FxHashMap<SymbolId, VarInfo>,
    pub locals: &'a FxHashMap<SymbolId, VarInfo>,
}

impl<'a> ExpressionGenerator<'a> {
    pub fn generate(&mut self, expr: &Expression) -> Result<Value, CompilerError> {
        match expr.kind() {
            ExpressionKind::Void => Ok(Value::Undef),

            ExpressionKind::Symbol(symbol) => self.generate_symbol(symbol),

            ExpressionKind::Constant(constant) => Ok(match constant {
                Constant::Integer { value, .. } => Value::Constant(*value),
                Constant::Float(value) => Value::FloatConstant(*value),
                Constant::Bool(value) => Value::Constant(i64::from(*value)),
            }),

            ExpressionKind::Funcall { callee, args } => {
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.generate(arg)?);
                }
                let result_type = convert_type(expr.ty())?;
                let result = self.builder.build_call(
                    Value::Function(callee.name.clone()),
                    arg_values,
                    result_type,
                )?;
                Ok(result.map_or(Value::Undef, Value::Temp))
            }

            ExpressionKind::ArrayIndex { .. } => {
                let address = self.generate_address(expr)?;
                if expr.ty().is_array() {
                    Ok(address)
                } else {
                    let result = self.builder.build_load(address, convert_type(expr.ty())?)?;
                    Ok(Value::Temp(result))
                }
            }

            ExpressionKind::Sizeof(ty) => Ok(Value::Constant(ty.size() as i64)),

            ExpressionKind::UnaryMinus(operand) => {
                let value = self.generate(operand)?;
                let ir_type = convert_type(expr.ty())?;
                let op = if ir_type.is_float() { IrUnaryOp::FNeg } else { IrUnaryOp::Neg };
                let result = self.builder.build_unary(op, value, ir_type.clone(), ir_type)?;
                Ok(Value::Temp(result))
            }

            ExpressionKind::Assignment { target, value } => {
                let address = self.generate_address(target)?;
                let value = self.generate(value)?;
                let value_type = convert_type(target.ty())?;
                self.builder.build_store(value.clone(), address, value_type)?;
                Ok(value)
            }

            ExpressionKind::FpSiCast(operand) => {
                let op = if operand.ty().is_float() { IrUnaryOp::FpToSi } else { IrUnaryOp::SiToFp };
                self.generate_conversion(op, operand, expr.ty())
            }

            ExpressionKind::Bitcast(operand) => {
                let source = self.operand_type(operand)?;
                let target = convert_type(expr.ty())?;
                if source == target {
                    self.generate(operand)
                } else {
                    self.generate_conversion(IrUnaryOp::Bitcast, operand, expr.ty())
                }
            }

            ExpressionKind::SignExtend(operand) => self.generate_conversion(IrUnaryOp::SExt, operand, expr.ty()),

            ExpressionKind::ZeroExtend(operand) => self.generate_conversion(IrUnaryOp::ZExt, operand, expr.ty()),

            ExpressionKind::Trunc(operand) => self.generate_conversion(IrUnaryOp::Trunc, operand, expr.ty()),

            ExpressionKind::Xcrement { op, operand } => self.generate_xcrement(*op, operand),

            ExpressionKind::BinaryOp { op, left, right } => {
                if op.is_logical() {
                    self.generate_logical(*op, left, right)
                } else {
                    self.generate_binary(*op, left, right)
                }
            }
        }
    }

    pub fn generate_address(&mut self, expr: &Expression) -> Result<Value, CompilerError> {
        match expr.kind() {
            ExpressionKind::Symbol(symbol) => Ok(self.lookup(symbol)?.address.clone()),

            ExpressionKind::ArrayIndex { array, index } => {
                let base = self.generate(array)?;
                let index = self.generate(index)?;
                let element_type = convert_type(expr.ty())?;
                let address = self.builder.build_gep(base, vec![index], element_type.pointer_to())?;
                Ok(address)
            }

            _ => Err(CodegenError::InvalidLvalue { expression: expr.to_string() }.into()),
        }
    }

    fn lookup(&self, symbol: &SymbolRef) -> Result<&VarInfo, CodegenError> {
        self.locals
            .get(&symbol.id)
            .or_else(|| self.globals.get(&symbol.id))
            .ok_or_else(|| CodegenError::UndefinedVariable { name: symbol.name.clone() })
    }

    fn generate_symbol(&mut self, symbol: &SymbolRef) -> Result<Value, CompilerError> {
        if symbol.is_function() {
            return Ok(Value::Function(symbol.name.clone()));
        }

        let info = self.lookup(symbol)?.clone();
        if symbol.ty.is_array() && !info.holds_reference {
            // Decay: the storage itself is the value
            return Ok(info.address);
        }
        let result = self.builder.build_load(info.address, info.ir_type)?;
        Ok(Value::Temp(result))
    }

    fn operand_type(&self, operand: &Expression) -> Result<IrType, CodegenError> {
        match operand.ty().array_element() {
            Some(element) => Ok(convert_type(element)?.pointer_to()),
            None => convert_type(operand.ty()),
        }
    }

    fn generate_conversion(&mut self, op: IrUnaryOp, operand: &Expression, target: &Type) -> Result<Value, CompilerError> {
        let operand_type = self.operand_type(operand)?;
        let value = self.generate(operand)?;
        let result = self.builder.build_unary(op, value, operand_type, convert_type(target)?)?;
        Ok(Value::Temp(result))
    }

    fn generate_xcrement(&mut self, op: XcrementOp, operand: &Expression) -> Result<Value, CompilerError> {
        let address = self.generate_address(operand)?;
        let ir_type = convert_type(operand.ty())?;
        let old = Value::Temp(self.builder.build_load(address.clone(), ir_type.clone())?);

        let new = if ir_type.is_pointer() {
            let step = if op.is_increment() { 1 } else { -1 };
            self.builder.build_gep(old.clone(), vec![Value::Constant(step)], ir_type.clone())?
        } else {
            let (ir_op, one) = match (ir_type.is_float(), op.is_increment()) {
                (true, true) => (IrBinaryOp::FAdd, Value::FloatConstant(1.0)),
                (true, false) => (IrBinaryOp::FSub, Value::FloatConstant(1.0)),
                (false, true) => (IrBinaryOp::Add, Value::Constant(1)),
                (false, false) => (IrBinaryOp::Sub, Value::Constant(1)),
            };
            Value::Temp(self.builder.build_binary(ir_op, old.clone(), one, ir_type.clone())?)
        };

        self.builder.build_store(new.clone(), address, ir_type)?;
        Ok(if op.is_prefix() { new } else { old })
    }

    fn generate_binary(&mut self, op: BinaryOp, left: &Expression, right: &Expression) -> Result<Value, CompilerError> {
        let operand_type = convert_type(left.ty())?;
        let is_float = operand_type.is_float();
        let lhs = self.generate(left)?;
        let rhs = self.generate(right)?;
        // `x != 0` conditions on floats carry an int zero
        let (lhs, rhs) = if is_float { (as_float(lhs), as_float(rhs)) } else { (lhs, rhs) };

        let ir_op = match (op, is_float) {
            (BinaryOp::Add, false) => IrBinaryOp::Add,
            (BinaryOp::Sub, false) => IrBinaryOp::Sub,
            (BinaryOp::Mul, false) => IrBinaryOp::Mul,
            (BinaryOp::Div, false) => IrBinaryOp::SDiv,
            (BinaryOp::Mod, _) => IrBinaryOp::SRem,
            (BinaryOp::Add, true) => IrBinaryOp::FAdd,
            (BinaryOp::Sub, true) => IrBinaryOp::FSub,
            (BinaryOp::Mul, true) => IrBinaryOp::FMul,
            (BinaryOp::Div, true) => IrBinaryOp::FDiv,
            (BinaryOp::Less, false) => IrBinaryOp::Slt,
            (BinaryOp::Greater, false) => IrBinaryOp::Sgt,
            (BinaryOp::LessEqual, false) => IrBinaryOp::Sle,
            (BinaryOp::GreaterEqual, false) => IrBinaryOp::Sge,
            (BinaryOp::Equal, false) => IrBinaryOp::Eq,
            (BinaryOp::NotEqual, false) => IrBinaryOp::Ne,
            (BinaryOp::Less, true) => IrBinaryOp::FLt,
            (BinaryOp::Greater, true) => IrBinaryOp::FGt,
            (BinaryOp::LessEqual, true) => IrBinaryOp::FLe,
            (BinaryOp::GreaterEqual, true) => IrBinaryOp::FGe,
            (BinaryOp::Equal, true) => IrBinaryOp::FEq,
            (BinaryOp::NotEqual, true) => IrBinaryOp::FNe,
            (BinaryOp::LogicalAnd | BinaryOp::LogicalOr, _) => {
                return self.generate_logical(op, left, right);
            }
        };

        let result = self.builder.build_binary(ir_op, lhs, rhs, operand_type)?;
        Ok(Value::Temp(result))
    }

    /// `&&` and `||` only evaluate their right operand when the left one
    /// does not decide the result
    fn generate_logical(&mut self, op: BinaryOp, left: &Expression, right: &Expression) -> Result<Value, CompilerError> {
        let lhs = self.generate(left)?;
        let left_end = self.builder.current_block().ok_or_else(|| CompilerError::internal("No current block"))?;

        let rhs_label = self.builder.new_label();
        let end_label = self.builder.new_label();
        let short_circuit = if op == BinaryOp::LogicalAnd {
            self.builder.build_branch_cond(lhs, rhs_label, end_label)?;
            Value::Constant(0)
        } else {
            self.builder.build_branch_cond(lhs, end_label, rhs_label)?;
            Value::Constant(1)
        };

        self.builder.create_block(rhs_label)?;
        let rhs = self.generate(right)?;
        let right_end = self.builder.current_block().ok_or_else(|| CompilerError::internal("No current block"))?;
        self.builder.build_branch(end_label)?;

        self.builder.create_block(end_label)?;
        let result = self.builder.build_phi(vec![(short_circuit, left_end), (rhs, right_end)], IrType::I1)?;
        Ok(Value::Temp(result))
    }
}

fn as_float(value: Value) -> Value {
    match value {
        Value::Constant(value) => Value::FloatConstant(value as f64),
        other => other,
    }
}
