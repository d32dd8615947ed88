//! Symbols and the scoped symbol table

mod table;

pub use table::SymbolTable;

use crate::types::Type;
use bcc_common::{StorageClass, SymbolId};
use std::sync::Arc;

/// Shared handle on a declared symbol. Expressions and declarations keep
/// these alive after their scope has been popped.
pub type SymbolRef = Arc<Symbol>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub ty: Type,
    pub kind: SymbolKind,
    pub storage_class: StorageClass,
    /// Scope level the symbol was declared at; 0 is global
    pub level: usize,
}

impl Symbol {
    /// A variable declaration, not yet registered in any scope
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            id: 0,
            name: name.into(),
            ty,
            kind: SymbolKind::Variable,
            storage_class: StorageClass::Auto,
            level: 0,
        }
    }

    pub fn as_parameter(mut self) -> Self {
        self.kind = SymbolKind::Parameter;
        self
    }

    pub fn as_function(mut self) -> Self {
        self.kind = SymbolKind::Function;
        self
    }

    pub fn with_storage_class(mut self, storage_class: StorageClass) -> Self {
        self.storage_class = storage_class;
        self
    }

    pub fn is_global(&self) -> bool {
        self.level == 0
    }

    pub fn is_parameter(&self) -> bool {
        self.kind == SymbolKind::Parameter
    }

    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function || self.ty.is_function()
    }
}
