//! Context values threaded through construction calls
//!
//! The producer of construction calls sets these up before building the
//! nodes that depend on them: a declaration context before resolving the
//! declarators of one declaration, a function context before building
//! the statements of a function body.

use crate::symbol::SymbolRef;
use crate::types::Type;
use bcc_common::StorageClass;

/// Base type and storage class shared by all declarators of one
/// declaration, e.g. `static int` in `static int a, *b, c[4];`
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationContext {
    pub base_type: Type,
    pub storage_class: StorageClass,
}

impl DeclarationContext {
    pub fn new(base_type: Type) -> Self {
        Self {
            base_type,
            storage_class: StorageClass::Auto,
        }
    }

    pub fn with_storage_class(mut self, storage_class: StorageClass) -> Self {
        self.storage_class = storage_class;
        self
    }
}

/// The function whose body is being built
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

impl FunctionContext {
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            return_type,
        }
    }
}

/// Everything `function_begin` established, handed back to `function_end`
#[derive(Debug, Clone)]
pub struct FunctionHeader {
    pub symbol: SymbolRef,
    pub parameters: Vec<SymbolRef>,
    pub context: FunctionContext,
}
