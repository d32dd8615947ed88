//! bcc compiler - Frontend
//!
//! This crate provides the frontend core of the bcc C compiler:
//! - Types: the type algebra, with shared basic types and interned composites
//! - Symbols: the scoped symbol table
//! - Declarators: turning parsed declarators into types and symbols
//! - Semantic: checked AST construction with implicit conversions
//! - Codegen: lowering of a finished unit to IR
//!
//! The parser drives a [`CompilationUnit`], calling its construction
//! operations as it reduces productions, and finally asks it for the IR
//! module.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod declarator;
pub mod ir;
pub mod semantic;
pub mod symbol;
pub mod types;

pub use ast::{
    BinaryOp, Constant, Expression, ExpressionKind, FunctionDefinition, Statement, StatementKind,
    TopLevelItem, XcrementOp,
};
pub use codegen::{CodeGenerator, CodegenError};
pub use config::FrontendConfig;
pub use declarator::{Declarator, Derivation};
pub use semantic::{
    AstBuilder, DeclarationContext, Diagnostics, FunctionContext, FunctionHeader, SemanticError,
    SemanticWarning,
};
pub use symbol::{Symbol, SymbolKind, SymbolRef, SymbolTable};
pub use types::{Qualifiers, Type, TypeKind, TypeTable, TypeTag};

use crate::ir::Module;
use bcc_common::{CompilerError, SymbolId};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Compilation state of one translation unit.
///
/// Owns the type table, the symbol table and the diagnostics. Nothing is
/// shared between units; [`CompilationUnit::reset`] prepares the value
/// for the next one.
#[derive(Debug)]
pub struct CompilationUnit {
    pub types: TypeTable,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
    /// Functions that already have a body
    defined: FxHashSet<SymbolId>,
    config: FrontendConfig,
}

impl CompilationUnit {
    pub fn new(config: FrontendConfig) -> Self {
        let diagnostics = Diagnostics::new(&config.module_name).with_warnings_as_errors(config.warnings_as_errors);
        Self {
            types: TypeTable::new(),
            symbols: SymbolTable::new(),
            diagnostics,
            defined: FxHashSet::default(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.module_name
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    pub fn builder(&mut self) -> AstBuilder<'_> {
        AstBuilder::new(&mut self.diagnostics)
    }

    /// Resolve `declarator` and declare it in the innermost scope.
    ///
    /// A clash with a declaration of the same scope is recorded and the
    /// declarator is dropped.
    pub fn declare(&mut self, declarator: Declarator, context: &DeclarationContext) -> Option<SymbolRef> {
        let symbol = declarator.into_symbol(context, &mut self.types, &mut self.diagnostics);
        match self.symbols.add(symbol) {
            Ok(symbol) => Some(symbol),
            Err(err) => {
                self.diagnostics.error(err);
                None
            }
        }
    }

    /// Declare a function about to be defined and open its body scope
    /// with the parameters in it.
    ///
    /// A prototype of the same type declared earlier in the global scope
    /// is reused as the function's symbol. Defining a function a second
    /// time is a redeclaration.
    pub fn function_begin(&mut self, declarator: Declarator, context: &DeclarationContext) -> FunctionHeader {
        let parameters = declarator.parameters().map(<[Symbol]>::to_vec).unwrap_or_default();
        let symbol = declarator.into_symbol(context, &mut self.types, &mut self.diagnostics);
        let return_type = symbol.ty.function_return().cloned().unwrap_or_else(Type::undef);

        let symbol = match self.symbols.search(&symbol.name) {
            Some(existing) if existing.is_global() && existing.is_function() && existing.ty == symbol.ty => {
                if self.defined.contains(&existing.id) {
                    self.diagnostics.error(SemanticError::Redeclaration { name: existing.name.clone() });
                    Arc::new(symbol)
                } else {
                    existing
                }
            }
            _ => match self.symbols.add(symbol.clone()) {
                Ok(symbol) => symbol,
                Err(err) => {
                    self.diagnostics.error(err);
                    Arc::new(symbol)
                }
            },
        };
        if symbol.id != 0 {
            self.defined.insert(symbol.id);
        }
        log::debug!("Function '{}' begins, returning {}", symbol.name, return_type);

        self.symbols.push();
        let parameters = match self.symbols.set_parameters(parameters) {
            Ok(parameters) => parameters,
            Err(err) => {
                self.diagnostics.error(err);
                self.symbols.current_scope_symbols().to_vec()
            }
        };

        let context = FunctionContext::new(symbol.name.clone(), return_type);
        FunctionHeader {
            symbol,
            parameters,
            context,
        }
    }

    /// Close the body scope opened by [`CompilationUnit::function_begin`]
    pub fn function_end(&mut self, header: FunctionHeader, body: Statement) -> Result<FunctionDefinition, CompilerError> {
        self.symbols.pop()?;
        Ok(FunctionDefinition {
            symbol: header.symbol,
            parameters: header.parameters,
            body,
        })
    }

    /// Lower the finished unit to IR.
    ///
    /// A unit with errors produces no module at all.
    pub fn finish(&self, items: &[TopLevelItem]) -> Result<Module, CompilerError> {
        if self.diagnostics.has_errors() {
            let summary = self.diagnostics.reporter().summary();
            log::info!("Unit '{}' rejected: {}", self.name(), summary);
            return Err(CompilerError::UnitRejected {
                unit: self.name().to_string(),
                summary,
            });
        }

        let module = CodeGenerator::new(self.name().to_string()).generate(items)?;
        log::info!(
            "Unit '{}' lowered: {} function(s), {} global(s)",
            self.name(),
            module.functions.len(),
            module.globals.len()
        );
        Ok(module)
    }

    /// Forget the current unit, keeping the configuration
    pub fn reset(&mut self) {
        self.types = TypeTable::new();
        self.symbols.init();
        self.diagnostics.reset();
        self.defined.clear();
    }
}
