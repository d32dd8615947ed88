//! Scoped symbol table
//!
//! A stack of scopes, level 0 being the global one. Lookups walk from the
//! innermost scope outwards, so inner declarations shadow outer ones.

use super::{Symbol, SymbolRef};
use crate::semantic::SemanticError;
use bcc_common::{CompilerError, SymbolId};
use rustc_hash::FxHashMap;
use std::fmt::Write;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Scope {
    /// Declaration order
    symbols: Vec<SymbolRef>,
    by_name: FxHashMap<String, usize>,
}

impl Scope {
    fn get(&self, name: &str) -> Option<&SymbolRef> {
        self.by_name.get(name).map(|&index| &self.symbols[index])
    }
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    next_id: SymbolId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding a single, empty global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            next_id: 1,
        }
    }

    /// Reset to a single empty global scope, ready for the next unit
    pub fn init(&mut self) {
        self.scopes.clear();
        self.scopes.push(Scope::default());
        self.next_id = 1;
    }

    /// Enter a nested scope
    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
        log::trace!("Entered scope level {}", self.level());
    }

    /// Leave the innermost scope.
    ///
    /// Popping the global scope means push/pop got unbalanced somewhere in
    /// the compiler; the table is left untouched.
    pub fn pop(&mut self) -> Result<(), CompilerError> {
        if self.global_context() {
            return Err(CompilerError::internal(
                "symbol table scope underflow: pop from the global scope",
            ));
        }
        self.scopes.pop();
        log::trace!("Left scope, now at level {}", self.level());
        Ok(())
    }

    /// Current nesting depth
    pub fn level(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    pub fn global_context(&self) -> bool {
        self.level() == 0
    }

    /// Declare `symbol` in the innermost scope, assigning its id and level
    pub fn add(&mut self, mut symbol: Symbol) -> Result<SymbolRef, SemanticError> {
        let level = self.level();
        let id = self.next_id;
        let scope = self.current_scope_mut();

        if scope.get(&symbol.name).is_some() {
            return Err(SemanticError::Redeclaration { name: symbol.name });
        }

        symbol.id = id;
        symbol.level = level;
        let symbol = Arc::new(symbol);
        scope.by_name.insert(symbol.name.clone(), scope.symbols.len());
        scope.symbols.push(Arc::clone(&symbol));
        self.next_id += 1;

        log::debug!("Declared '{}' ({}) at level {}", symbol.name, symbol.ty, level);
        Ok(symbol)
    }

    /// Find the innermost visible declaration of `name`
    pub fn search(&self, name: &str) -> Option<SymbolRef> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
    }

    /// Whether `name` is declared in the innermost scope itself
    pub fn exists_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .map(|scope| scope.by_name.contains_key(name))
            .unwrap_or(false)
    }

    /// Register the parameters of a function into the already pushed
    /// body scope. Every parameter is attempted; the first clash is
    /// returned after the rest have been declared.
    pub fn set_parameters(&mut self, parameters: Vec<Symbol>) -> Result<Vec<SymbolRef>, SemanticError> {
        let mut declared = Vec::with_capacity(parameters.len());
        let mut first_error = None;

        for parameter in parameters {
            match self.add(parameter.as_parameter()) {
                Ok(symbol) => declared.push(symbol),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(declared),
        }
    }

    /// Symbols of the innermost scope, in declaration order
    pub fn current_scope_symbols(&self) -> &[SymbolRef] {
        self.scopes
            .last()
            .map(|scope| scope.symbols.as_slice())
            .unwrap_or_default()
    }

    /// Human readable view of the scope stack, outermost first
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (level, scope) in self.scopes.iter().enumerate() {
            let _ = writeln!(out, "scope {level}:");
            for symbol in &scope.symbols {
                let _ = writeln!(
                    out,
                    "  #{} {}: {} [{:?}, {}]",
                    symbol.id, symbol.name, symbol.ty, symbol.kind, symbol.storage_class
                );
            }
        }
        out
    }

    /// `new` and `init` create the global scope and `pop` never removes
    /// it, so there is always an innermost scope.
    fn current_scope_mut(&mut self) -> &mut Scope {
        let innermost = self.level();
        &mut self.scopes[innermost]
    }
}
