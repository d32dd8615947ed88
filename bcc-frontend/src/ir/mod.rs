//! Intermediate representation sink
//!
//! The module every unit is lowered into. It is serializable so the
//! surrounding driver can flush it per input file.
//!
//! ## Architecture
//!
//! - `types` - IR types
//! - `values` - operand values
//! - `ops` - binary and unary operations
//! - `instructions` - IR instructions
//! - `blocks` - basic blocks
//! - `function` - function definitions
//! - `module` - module and global variables
//! - `builder` - IR construction utilities

pub use self::types::IrType;
pub use self::values::Value;
pub use self::ops::{IrBinaryOp, IrUnaryOp};
pub use self::instructions::Instruction;
pub use self::blocks::BasicBlock;
pub use self::function::Function;
pub use self::module::{GlobalVariable, Linkage, Module};
pub use self::builder::IrBuilder;

mod types;
mod values;
mod ops;
mod instructions;
mod blocks;
mod function;
mod module;
mod builder;


use std::fmt;

/// Displays its items separated by `", "`
pub(crate) struct Joined<'a, T>(pub &'a [T]);

impl<T: fmt::Display> fmt::Display for Joined<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}
