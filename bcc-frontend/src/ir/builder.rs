//! IR builder
//!
//! Appends instructions to the current block of the function under
//! construction. Every `build_*` call fails if there is no such block.

use bcc_common::{IdGenerator, LabelId, TempId};
use crate::ir::{BasicBlock, Function, Instruction, IrBinaryOp, IrType, IrUnaryOp, Value};

#[derive(Debug, Default)]
pub struct IrBuilder {
    current_function: Option<Function>,
    current_block: Option<LabelId>,
    temps: IdGenerator,
    labels: IdGenerator,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_temp(&mut self) -> TempId {
        self.temps.next_id()
    }

    pub fn new_label(&mut self) -> LabelId {
        self.labels.next_id()
    }

    /// Start a new function. Temps and labels are numbered per function.
    pub fn create_function(&mut self, name: String, return_type: IrType) -> &mut Function {
        self.temps.reset();
        self.labels.reset();
        self.current_block = None;
        self.current_function.insert(Function::new(name, return_type))
    }

    /// Declare the next parameter of the current function and return the
    /// temp holding its value
    pub fn add_parameter(&mut self, param_type: IrType) -> Result<TempId, String> {
        let param_id = self.temps.next_id();
        let function = self.current_function.as_mut().ok_or("No current function")?;
        function.add_parameter(param_id, param_type);
        Ok(param_id)
    }

    /// Append a block and make it current
    pub fn create_block(&mut self, label_id: LabelId) -> Result<(), String> {
        let function = self.current_function.as_mut().ok_or("No current function")?;
        function.add_block(BasicBlock::new(label_id));
        self.current_block = Some(label_id);
        Ok(())
    }

    pub fn current_block(&self) -> Option<LabelId> {
        self.current_block
    }

    pub fn build_binary(&mut self, op: IrBinaryOp, lhs: Value, rhs: Value, operand_type: IrType) -> Result<TempId, String> {
        let result = self.new_temp();
        self.add_instruction(Instruction::Binary { result, op, lhs, rhs, operand_type })?;
        Ok(result)
    }

    pub fn build_unary(&mut self, op: IrUnaryOp, operand: Value, operand_type: IrType, result_type: IrType) -> Result<TempId, String> {
        let result = self.new_temp();
        self.add_instruction(Instruction::Unary { result, op, operand, operand_type, result_type })?;
        Ok(result)
    }

    pub fn build_load(&mut self, ptr: Value, result_type: IrType) -> Result<TempId, String> {
        let result = self.new_temp();
        self.add_instruction(Instruction::Load { result, ptr, result_type })?;
        Ok(result)
    }

    pub fn build_store(&mut self, value: Value, ptr: Value, value_type: IrType) -> Result<(), String> {
        self.add_instruction(Instruction::Store { value, ptr, value_type })
    }

    /// Reserve a stack slot; the returned value is its address
    pub fn build_alloca(&mut self, alloc_type: IrType) -> Result<Value, String> {
        let result = self.new_temp();
        self.add_instruction(Instruction::Alloca { result, alloc_type })?;
        Ok(Value::Temp(result))
    }

    pub fn build_gep(&mut self, ptr: Value, indices: Vec<Value>, result_type: IrType) -> Result<Value, String> {
        let result = self.new_temp();
        self.add_instruction(Instruction::GetElementPtr { result, ptr, indices, result_type })?;
        Ok(Value::Temp(result))
    }

    pub fn build_call(&mut self, function: Value, args: Vec<Value>, result_type: IrType) -> Result<Option<TempId>, String> {
        let result = if result_type.is_void() {
            None
        } else {
            Some(self.new_temp())
        };
        self.add_instruction(Instruction::Call { result, function, args, result_type })?;
        Ok(result)
    }

    pub fn build_phi(&mut self, incoming: Vec<(Value, LabelId)>, result_type: IrType) -> Result<TempId, String> {
        let result = self.new_temp();
        self.add_instruction(Instruction::Phi { result, incoming, result_type })?;
        Ok(result)
    }

    pub fn build_return(&mut self, value: Option<Value>) -> Result<(), String> {
        self.add_instruction(Instruction::Return(value))
    }

    pub fn build_branch(&mut self, label: LabelId) -> Result<(), String> {
        self.add_instruction(Instruction::Branch(label))
    }

    pub fn build_branch_cond(&mut self, condition: Value, true_label: LabelId, false_label: LabelId) -> Result<(), String> {
        self.add_instruction(Instruction::BranchCond { condition, true_label, false_label })
    }

    fn add_instruction(&mut self, instr: Instruction) -> Result<(), String> {
        let function = self.current_function.as_mut().ok_or("No current function")?;
        let block_id = self.current_block.ok_or("No current block")?;
        let block = function
            .get_block_mut(block_id)
            .ok_or_else(|| format!("Current block L{block_id} not found"))?;
        log::trace!("L{block_id}: {instr}");
        block.add_instruction(instr);
        Ok(())
    }

    pub fn current_block_has_terminator(&self) -> bool {
        match (&self.current_function, self.current_block) {
            (Some(function), Some(block_id)) => function
                .get_block(block_id)
                .is_some_and(BasicBlock::has_terminator),
            _ => false,
        }
    }

    pub fn finish_function(&mut self) -> Option<Function> {
        self.current_block = None;
        let function = self.current_function.take()?;
        log::debug!(
            "Finished '{}': {} block(s), {} temp(s)",
            function.name,
            function.blocks.len(),
            self.temps.issued()
        );
        Some(function)
    }
}
