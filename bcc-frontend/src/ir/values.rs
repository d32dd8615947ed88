//! IR value representations
//!
//! Operands of IR instructions: temporaries, constants, and references
//! to globals and functions.

use bcc_common::TempId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Temporary variable
    Temp(TempId),

    /// Constant integer
    Constant(i64),

    FloatConstant(f64),

    /// Global variable reference
    Global(String),

    /// Function reference
    Function(String),

    /// Undefined value
    Undef,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Temp(id) => write!(f, "%{id}"),
            Value::Constant(val) => write!(f, "{val}"),
            Value::FloatConstant(val) => write!(f, "{val:?}"),
            Value::Global(name) | Value::Function(name) => write!(f, "@{name}"),
            Value::Undef => write!(f, "undef"),
        }
    }
}
