//! Checked AST construction
//!
//! Every node is built through [`AstBuilder`]. Constructors validate their
//! operands, insert implicit conversions, desugar compound constructs and
//! record problems in [`Diagnostics`]. A constructor that finds an error
//! still returns a usable node, so the surrounding tree can be finished
//! and further errors surfaced; the unit is rejected later on the error
//! count.

pub mod errors;
pub mod diagnostics;
pub mod context;
mod conversions;
mod expressions;
mod statements;

pub use errors::{SemanticError, SemanticWarning};
pub use diagnostics::Diagnostics;
pub use context::{DeclarationContext, FunctionContext, FunctionHeader};

/// Smart constructors for statements and expressions
pub struct AstBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
}

impl<'a> AstBuilder<'a> {
    pub fn new(diagnostics: &'a mut Diagnostics) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.diagnostics
    }
}
