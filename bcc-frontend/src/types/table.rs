//! Composite type construction
//!
//! Owns the intern table of one compilation unit. Structurally equal
//! composites handed back by the table may share a single instance, but
//! nothing downstream relies on it.

use super::{Type, TypeKind, VECTOR_LANES, ADDRESS_SIZE};
use crate::ast::Expression;
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};

#[derive(Debug, Default)]
pub struct TypeTable {
    interned: FxHashMap<u64, Vec<Type>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct composite instances held by the table
    pub fn len(&self) -> usize {
        self.interned.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn make_function_type(&mut self, return_type: &Type, params: Vec<Type>) -> Type {
        let ty = Type::from_kind(
            TypeKind::Function {
                return_type: return_type.clone(),
                params,
            },
            ADDRESS_SIZE,
            false,
        );
        self.intern(ty)
    }

    /// `element[size]`, wrapping `element` as the inner type
    pub fn make_array_type(&mut self, element: &Type, size: Expression) -> Type {
        let ty = Type::from_kind(
            TypeKind::Array {
                element: element.clone(),
                size: Box::new(size),
            },
            ADDRESS_SIZE,
            false,
        );
        self.intern(ty)
    }

    /// Add `size` as the innermost dimension of `element`.
    ///
    /// Declarators see dimensions left to right, but the leftmost one is
    /// the outermost array. Folding `int a[2][3]` as
    /// `reversed(reversed(int, 2), 3)` yields `(int[3])[2]`, the same
    /// type as `make_array_type(make_array_type(int, 3), 2)`.
    pub fn make_array_type_reversed(&mut self, element: &Type, size: Expression) -> Type {
        match element.kind() {
            TypeKind::Array { element: inner, size: outer } => {
                let inner = self.make_array_type_reversed(inner, size);
                let rebuilt = Type::from_kind(
                    TypeKind::Array {
                        element: inner,
                        size: outer.clone(),
                    },
                    ADDRESS_SIZE,
                    element.is_vector(),
                )
                .qualified(element.qualifiers());
                self.intern(rebuilt)
            }
            _ => self.make_array_type(element, size),
        }
    }

    pub fn make_pointer_type(&mut self, pointee: &Type) -> Type {
        let ty = Type::from_kind(
            TypeKind::Pointer {
                pointee: pointee.clone(),
            },
            ADDRESS_SIZE,
            false,
        );
        self.intern(ty)
    }

    /// Vector of `VECTOR_LANES` scalars. Non-scalar inputs are returned
    /// unchanged.
    pub fn make_vector_type(&mut self, scalar: &Type) -> Type {
        if !scalar.is_arithmetic() || scalar.is_vector() {
            return scalar.clone();
        }
        let kind = match scalar.kind() {
            TypeKind::Bool => TypeKind::Bool,
            TypeKind::Byte => TypeKind::Byte,
            TypeKind::Short => TypeKind::Short,
            TypeKind::Int => TypeKind::Int,
            TypeKind::Long => TypeKind::Long,
            TypeKind::Float => TypeKind::Float,
            _ => return scalar.clone(),
        };
        let ty = Type::from_kind(kind, scalar.size() * VECTOR_LANES, true);
        self.intern(ty)
    }

    fn intern(&mut self, ty: Type) -> Type {
        // Qualifiers are invisible to equality, so a qualified type must
        // never stand in for an unqualified one.
        if ty.has_qualifiers_deep() {
            return ty;
        }

        let mut hasher = FxHasher::default();
        ty.hash(&mut hasher);
        let bucket = self.interned.entry(hasher.finish()).or_default();

        if let Some(existing) = bucket.iter().find(|candidate| **candidate == ty) {
            log::debug!("Reusing interned type {}", existing);
            return existing.clone();
        }

        bucket.push(ty.clone());
        ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Constant, Expression};
    use crate::types::Qualifiers;

    fn dim(n: i64) -> Expression {
        Expression::constant(Constant::int(n))
    }

    #[test]
    fn test_structurally_equal_composites_share_instance() {
        let mut table = TypeTable::new();
        assert!(table.is_empty());
        let a = table.make_array_type(&Type::int(), dim(10));
        let b = table.make_array_type(&Type::int(), dim(10));
        assert_eq!(a, b);
        assert!(Type::same_instance(&a, &b));
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());

        let c = table.make_array_type(&Type::int(), dim(11));
        assert_ne!(a, c);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_qualified_types_are_not_interned() {
        let mut table = TypeTable::new();
        let const_int = Type::int().qualified(Qualifiers::CONST);
        let p1 = table.make_pointer_type(&const_int);
        assert!(table.is_empty());
        let p2 = table.make_pointer_type(&Type::int());
        assert_eq!(p1, p2);
        assert!(!Type::same_instance(&p1, &p2));
        assert_eq!(p1.to_string(), "const int*");
    }

    #[test]
    fn test_array_size_is_address_size() {
        let mut table = TypeTable::new();
        let big = table.make_array_type(&Type::long(), dim(1000));
        let nested = table.make_array_type(&big, dim(3));
        assert_eq!(big.size(), ADDRESS_SIZE);
        assert_eq!(nested.size(), ADDRESS_SIZE);
    }

    #[test]
    fn test_reversed_constructor_nests_innermost() {
        let mut table = TypeTable::new();
        let first = table.make_array_type_reversed(&Type::int(), dim(2));
        let folded = table.make_array_type_reversed(&first, dim(3));

        let inner = table.make_array_type(&Type::int(), dim(3));
        let expected = table.make_array_type(&inner, dim(2));
        assert_eq!(folded, expected);
        assert_eq!(folded.to_string(), "int[2][3]");
    }

    #[test]
    fn test_vector_type() {
        let mut table = TypeTable::new();
        let v = table.make_vector_type(&Type::int());
        assert!(v.is_vector());
        assert_eq!(v.size(), Type::int().size() * VECTOR_LANES);
        assert_ne!(v, Type::int());
        assert_eq!(v.to_string(), "vector int");
        assert_eq!(table.make_vector_type(&Type::void()), Type::void());
    }
}
