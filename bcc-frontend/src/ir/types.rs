//! IR type system

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IrType {
    Void,

    /// Integer types with bit width
    I1,
    I8,
    I16,
    I32,
    I64,

    F32,

    Ptr(Box<IrType>),

    /// `[size x element]`; `None` when the length is only known at run time
    Array {
        size: Option<u64>,
        element_type: Box<IrType>,
    },

    /// `<lanes x element>`
    Vector {
        lanes: u32,
        element_type: Box<IrType>,
    },

    Function {
        return_type: Box<IrType>,
        param_types: Vec<IrType>,
    },
}

impl IrType {
    pub fn is_float(&self) -> bool {
        matches!(self, IrType::F32)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, IrType::Ptr(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, IrType::Void)
    }

    /// Pointer to this type
    pub fn pointer_to(self) -> IrType {
        IrType::Ptr(Box::new(self))
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::I1 => write!(f, "i1"),
            IrType::I8 => write!(f, "i8"),
            IrType::I16 => write!(f, "i16"),
            IrType::I32 => write!(f, "i32"),
            IrType::I64 => write!(f, "i64"),
            IrType::F32 => write!(f, "float"),
            IrType::Ptr(target) => write!(f, "{target}*"),
            IrType::Array { size: Some(size), element_type } => write!(f, "[{size} x {element_type}]"),
            IrType::Array { size: None, element_type } => write!(f, "[? x {element_type}]"),
            IrType::Vector { lanes, element_type } => write!(f, "<{lanes} x {element_type}>"),
            IrType::Function { return_type, param_types } => {
                write!(f, "{return_type} ({})", super::Joined(param_types))
            }
        }
    }
}
