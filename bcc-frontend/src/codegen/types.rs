//! Type conversion utilities

use super::errors::CodegenError;
use crate::ir::IrType;
use crate::types::{Type, TypeKind, VECTOR_LANES};

/// Convert a checked type to its IR counterpart
pub fn convert_type(ty: &Type) -> Result<IrType, CodegenError> {
    let scalar = match ty.kind() {
        TypeKind::Undef | TypeKind::Generic => {
            return Err(CodegenError::UnresolvedType { ty: ty.to_string() });
        }
        TypeKind::Void => IrType::Void,
        TypeKind::Bool => IrType::I1,
        TypeKind::Byte => IrType::I8,
        TypeKind::Short => IrType::I16,
        TypeKind::Int => IrType::I32,
        TypeKind::Long => IrType::I64,
        TypeKind::Float => IrType::F32,
        TypeKind::Pointer { pointee } => return Ok(convert_type(pointee)?.pointer_to()),
        TypeKind::Array { element, size } => {
            return Ok(IrType::Array {
                size: size.constant_value().and_then(|n| u64::try_from(n).ok()),
                element_type: Box::new(convert_type(element)?),
            });
        }
        TypeKind::Function { return_type, params } => {
            return Ok(IrType::Function {
                return_type: Box::new(convert_type(return_type)?),
                param_types: params.iter().map(convert_param_type).collect::<Result<_, _>>()?,
            });
        }
    };

    if ty.is_vector() {
        Ok(IrType::Vector {
            lanes: VECTOR_LANES as u32,
            element_type: Box::new(scalar),
        })
    } else {
        Ok(scalar)
    }
}

/// Arrays are passed by reference, as a pointer to their first element
pub fn convert_param_type(ty: &Type) -> Result<IrType, CodegenError> {
    match ty.array_element() {
        Some(element) => Ok(convert_type(element)?.pointer_to()),
        None => convert_type(ty),
    }
}
