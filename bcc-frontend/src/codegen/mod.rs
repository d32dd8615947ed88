//! AST to IR lowering
//!
//! Every statement and expression kind maps to exactly one lowering
//! routine, selected by an exhaustive `match` on the node's kind. Adding a
//! node kind without a lowering is a compile error.
//!
//! Locals live in stack slots created with `alloca`; globals are module
//! level variables. Both are addressed through [`VarInfo`].

mod errors;
mod expressions;
mod statements;
mod types;

pub use errors::CodegenError;
pub use types::{convert_param_type, convert_type};

use self::statements::StatementGenerator;
use crate::ast::{FunctionDefinition, TopLevelItem};
use crate::ir::{GlobalVariable, IrBuilder, IrType, Linkage, Module, Value};
use crate::symbol::SymbolRef;
use bcc_common::{CompilerError, StorageClass, SymbolId};
use rustc_hash::FxHashMap;

/// Storage of a variable
#[derive(Debug, Clone, PartialEq)]
pub struct VarInfo {
    /// Address of the storage
    pub address: Value,
    /// Type of the value held at `address`
    pub ir_type: IrType,
    /// The storage holds a reference to an array rather than the array
    pub holds_reference: bool,
}

pub struct CodeGenerator {
    module: Module,
    builder: IrBuilder,
    variables: FxHashMap<SymbolId, VarInfo>,
}

impl CodeGenerator {
    pub fn new(module_name: String) -> Self {
        Self {
            module: Module::new(module_name),
            builder: IrBuilder::new(),
            variables: FxHashMap::default(),
        }
    }

    /// Lower every item, in order, and hand back the module
    pub fn generate(mut self, items: &[TopLevelItem]) -> Result<Module, CompilerError> {
        for item in items {
            self.generate_top_level_item(item)?;
        }
        Ok(self.module)
    }

    pub fn generate_top_level_item(&mut self, item: &TopLevelItem) -> Result<(), CompilerError> {
        match item {
            TopLevelItem::Function(function) => self.generate_function(function),
            TopLevelItem::Declaration(symbols) => {
                for symbol in symbols {
                    self.generate_global(symbol)?;
                }
                Ok(())
            }
        }
    }

    fn generate_global(&mut self, symbol: &SymbolRef) -> Result<(), CompilerError> {
        // Prototypes produce nothing
        if symbol.ty.is_function() {
            return Ok(());
        }

        let var_type = convert_type(&symbol.ty)?;
        let linkage = match symbol.storage_class {
            StorageClass::Static => Linkage::Internal,
            StorageClass::Extern => Linkage::Import,
            StorageClass::Auto | StorageClass::Register => Linkage::External,
        };
        log::debug!("Global '{}' as {} ({})", symbol.name, var_type, linkage);

        self.variables.insert(
            symbol.id,
            VarInfo {
                address: Value::Global(symbol.name.clone()),
                ir_type: var_type.clone(),
                holds_reference: false,
            },
        );
        self.module.add_global(GlobalVariable {
            name: symbol.name.clone(),
            var_type,
            initializer: None,
            linkage,
            symbol_id: Some(symbol.id),
        });
        Ok(())
    }

    fn generate_function(&mut self, definition: &FunctionDefinition) -> Result<(), CompilerError> {
        let return_type = definition
            .symbol
            .ty
            .function_return()
            .map(convert_type)
            .transpose()?
            .unwrap_or(IrType::Void);
        log::debug!("Lowering function '{}'", definition.name());

        let function = self.builder.create_function(definition.name().to_string(), return_type.clone());
        function.is_internal = definition.symbol.storage_class == StorageClass::Static;
        function.symbol_id = Some(definition.symbol.id);

        let mut parameter_temps = Vec::with_capacity(definition.parameters.len());
        for parameter in &definition.parameters {
            let ir_type = convert_param_type(&parameter.ty)?;
            let temp = self.builder.add_parameter(ir_type.clone())?;
            parameter_temps.push((parameter, temp, ir_type));
        }

        let entry = self.builder.new_label();
        self.builder.create_block(entry)?;

        // Parameters are spilled so they can be assigned like any local
        let mut locals = FxHashMap::default();
        for (parameter, temp, ir_type) in parameter_temps {
            let slot = self.builder.build_alloca(ir_type.clone())?;
            self.builder.build_store(Value::Temp(temp), slot.clone(), ir_type.clone())?;
            locals.insert(
                parameter.id,
                VarInfo {
                    address: slot,
                    ir_type,
                    holds_reference: parameter.ty.is_array(),
                },
            );
        }

        let mut statements = StatementGenerator {
            builder: &mut self.builder,
            globals: &self.variables,
            locals: &mut locals,
            return_type: &return_type,
        };
        statements.generate(&definition.body)?;
        statements.finish_function()?;

        if let Some(function) = self.builder.finish_function() {
            self.module.add_function(function);
        }
        Ok(())
    }
}
