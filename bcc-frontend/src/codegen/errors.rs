//! Code generation error types

use bcc_common::{CompilerError, SourceLocation};
use thiserror::Error;

/// Conditions the generator cannot lower. A unit that passed checking
/// without errors never produces these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodegenError {
    #[error("Type '{ty}' has no IR representation")]
    UnresolvedType { ty: String },

    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("'{expression}' has no address")]
    InvalidLvalue { expression: String },
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        CompilerError::codegen_error(err.to_string(), SourceLocation::unknown("<codegen>"))
    }
}
