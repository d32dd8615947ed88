//! Semantic error and warning definitions
//!
//! Errors block output for the unit they occur in; warnings never do.
//! Neither carries a position: [`super::Diagnostics`] stamps them with the
//! current location when they are recorded.

use crate::types::Type;
use bcc_common::{CompilerError, SourceLocation};
use thiserror::Error;

/// Semantic analysis errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("redeclaration of '{name}'")]
    Redeclaration { name: String },

    /// A value where none is allowed, or no value where one is required
    #[error("{}", describe_void_mismatch(.expected))]
    VoidMismatch { expected: Type, found: Type },

    #[error("{context}: found type '{found}' while '{expected}' was expected")]
    TypeMismatch {
        context: &'static str,
        expected: Type,
        found: Type,
    },

    #[error("'{name}' has type '{ty}' and cannot be called")]
    NotCallable { name: String, ty: Type },

    #[error("call to '{name}' with {found} argument(s), {expected} expected")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("subscripted value has type '{ty}', which is neither array nor pointer")]
    NotIndexable { ty: Type },

    #[error("'{expression}' cannot be assigned to")]
    NotAnLvalue { expression: String },

    #[error("invalid operand of type '{ty}' to '{operator}'")]
    InvalidOperand { operator: String, ty: Type },

    #[error("'{name}' undeclared")]
    UndefinedSymbol { name: String },

    #[error("'{name}' declared as {reason}")]
    InvalidDeclarator { name: String, reason: &'static str },
}

fn describe_void_mismatch(expected: &Type) -> String {
    if expected.is_void() {
        "returning non void value".to_string()
    } else {
        format!("return value can't be void. expected {expected}")
    }
}

impl SemanticError {
    /// Attach a position, producing a compiler-wide error
    pub fn at(self, location: SourceLocation) -> CompilerError {
        CompilerError::semantic_error(self.to_string(), location)
    }
}

impl From<SemanticError> for CompilerError {
    fn from(err: SemanticError) -> Self {
        err.at(SourceLocation::unknown("<unknown>"))
    }
}

/// Semantic warnings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticWarning {
    #[error("{context} makes an implicit cast from '{from}' to '{to}'")]
    ImplicitCast {
        context: &'static str,
        from: Type,
        to: Type,
    },
}
