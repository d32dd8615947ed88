//! Type algebra
//!
//! Basic types (`void`, `bool`, the sized integers, `float` and the two
//! sentinels `undef`/`generic`) are process-wide singletons: every call to
//! [`Type::int`] hands out the same shared instance. Composite types
//! (arrays, functions, pointers) are built on demand through a
//! [`TypeTable`], which may share structurally identical instances.
//!
//! Equality is always structural. Sharing is only a memory optimization
//! and is never consulted by [`PartialEq`].

mod table;

pub use table::TypeTable;

use crate::ast::Expression;
use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Size of an address on the host platform, in bytes
pub const ADDRESS_SIZE: usize = std::mem::size_of::<usize>();

/// Number of scalar lanes packed into a vector type
pub const VECTOR_LANES: usize = 4;

bitflags::bitflags! {
    /// Qualifiers attached to a type. They never take part in equality.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Qualifiers: u8 {
        const CONST = 1;
        const VOLATILE = 1 << 1;
    }
}

/// Discriminant of a type, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Undef,
    Void,
    Generic,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Array,
    Function,
    Pointer,
}

/// Shape of a type
#[derive(Debug)]
pub enum TypeKind {
    /// Error placeholder
    Undef,
    /// Cannot be applied on a variable
    Void,
    /// Stands in for an unresolved symbol so checking can continue
    Generic,
    Bool,
    Byte,
    Short,
    Int,
    /// Only produced indirectly, e.g. for array indexing and `sizeof`
    Long,
    Float,
    Array {
        element: Type,
        size: Box<Expression>,
    },
    Function {
        return_type: Type,
        params: Vec<Type>,
    },
    Pointer {
        pointee: Type,
    },
}

impl TypeKind {
    pub fn tag(&self) -> TypeTag {
        match self {
            TypeKind::Undef => TypeTag::Undef,
            TypeKind::Void => TypeTag::Void,
            TypeKind::Generic => TypeTag::Generic,
            TypeKind::Bool => TypeTag::Bool,
            TypeKind::Byte => TypeTag::Byte,
            TypeKind::Short => TypeTag::Short,
            TypeKind::Int => TypeTag::Int,
            TypeKind::Long => TypeTag::Long,
            TypeKind::Float => TypeTag::Float,
            TypeKind::Array { .. } => TypeTag::Array,
            TypeKind::Function { .. } => TypeTag::Function,
            TypeKind::Pointer { .. } => TypeTag::Pointer,
        }
    }
}

#[derive(Debug)]
struct TypeData {
    kind: TypeKind,
    size: usize,
    is_vector: bool,
}

/// Immutable, cheaply clonable handle on a type
#[derive(Clone)]
pub struct Type {
    data: Arc<TypeData>,
    qualifiers: Qualifiers,
}

static UNDEF: Lazy<Type> = Lazy::new(|| Type::from_kind(TypeKind::Undef, 0, false));
static VOID: Lazy<Type> = Lazy::new(|| Type::from_kind(TypeKind::Void, 0, false));
static GENERIC: Lazy<Type> = Lazy::new(|| Type::from_kind(TypeKind::Generic, 0, false));
static BOOL: Lazy<Type> = Lazy::new(|| Type::from_kind(TypeKind::Bool, 1, false));
static BYTE: Lazy<Type> = Lazy::new(|| Type::from_kind(TypeKind::Byte, 1, false));
static SHORT: Lazy<Type> = Lazy::new(|| Type::from_kind(TypeKind::Short, 2, false));
static INT: Lazy<Type> = Lazy::new(|| Type::from_kind(TypeKind::Int, 4, false));
static LONG: Lazy<Type> = Lazy::new(|| Type::from_kind(TypeKind::Long, 8, false));
static FLOAT: Lazy<Type> = Lazy::new(|| Type::from_kind(TypeKind::Float, 4, false));

impl Type {
    fn from_kind(kind: TypeKind, size: usize, is_vector: bool) -> Self {
        Self {
            data: Arc::new(TypeData { kind, size, is_vector }),
            qualifiers: Qualifiers::empty(),
        }
    }

    pub fn undef() -> Type {
        UNDEF.clone()
    }

    pub fn void() -> Type {
        VOID.clone()
    }

    pub fn generic() -> Type {
        GENERIC.clone()
    }

    pub fn bool() -> Type {
        BOOL.clone()
    }

    pub fn byte() -> Type {
        BYTE.clone()
    }

    pub fn short() -> Type {
        SHORT.clone()
    }

    pub fn int() -> Type {
        INT.clone()
    }

    pub fn long() -> Type {
        LONG.clone()
    }

    pub fn float() -> Type {
        FLOAT.clone()
    }

    /// Look up a basic type by its keyword
    pub fn by_name(name: &str) -> Option<Type> {
        let ty = match name {
            "void" => Type::void(),
            "bool" => Type::bool(),
            "byte" | "char" => Type::byte(),
            "short" => Type::short(),
            "int" => Type::int(),
            "long" => Type::long(),
            "float" => Type::float(),
            _ => return None,
        };
        Some(ty)
    }

    pub fn kind(&self) -> &TypeKind {
        &self.data.kind
    }

    pub fn tag(&self) -> TypeTag {
        self.data.kind.tag()
    }

    pub fn qualifiers(&self) -> Qualifiers {
        self.qualifiers
    }

    /// Same type with `qualifiers` added; the underlying instance is shared
    pub fn qualified(&self, qualifiers: Qualifiers) -> Type {
        Type {
            data: Arc::clone(&self.data),
            qualifiers: self.qualifiers | qualifiers,
        }
    }

    /// Same type with every qualifier removed
    pub fn unqualified(&self) -> Type {
        Type {
            data: Arc::clone(&self.data),
            qualifiers: Qualifiers::empty(),
        }
    }

    /// True when both handles point at the very same instance
    pub fn same_instance(a: &Type, b: &Type) -> bool {
        Arc::ptr_eq(&a.data, &b.data)
    }

    /// Storage footprint in bytes. Arrays are held by reference, so an
    /// array reports the size of an address whatever its dimensions.
    pub fn size(&self) -> usize {
        self.data.size
    }

    /// Arbitrary but fixed rank over basic types, used to pick the
    /// direction of implicit conversions. Composite types rank lowest.
    pub fn precision(&self) -> u8 {
        match self.tag() {
            TypeTag::Undef => 0,
            TypeTag::Void => 1,
            TypeTag::Generic => 2,
            TypeTag::Bool => 3,
            TypeTag::Byte => 4,
            TypeTag::Short => 5,
            TypeTag::Int => 6,
            TypeTag::Long => 7,
            TypeTag::Float => 8,
            TypeTag::Array | TypeTag::Function | TypeTag::Pointer => 0,
        }
    }

    pub fn is_basic(&self) -> bool {
        !matches!(self.tag(), TypeTag::Array | TypeTag::Function | TypeTag::Pointer)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.tag(),
            TypeTag::Byte | TypeTag::Short | TypeTag::Int | TypeTag::Long
        )
    }

    pub fn is_bool(&self) -> bool {
        self.tag() == TypeTag::Bool
    }

    pub fn is_float(&self) -> bool {
        self.tag() == TypeTag::Float
    }

    /// Integers, `bool` and `float`
    pub fn is_arithmetic(&self) -> bool {
        self.is_integer() || self.is_bool() || self.is_float()
    }

    pub fn is_void(&self) -> bool {
        self.tag() == TypeTag::Void
    }

    /// `undef` or `generic`: a previous error already covers this type
    pub fn is_unresolved(&self) -> bool {
        matches!(self.tag(), TypeTag::Undef | TypeTag::Generic)
    }

    pub fn is_array(&self) -> bool {
        self.tag() == TypeTag::Array
    }

    pub fn is_function(&self) -> bool {
        self.tag() == TypeTag::Function
    }

    pub fn is_pointer(&self) -> bool {
        self.tag() == TypeTag::Pointer
    }

    pub fn is_vector(&self) -> bool {
        self.data.is_vector
    }

    pub fn function_return(&self) -> Option<&Type> {
        match self.kind() {
            TypeKind::Function { return_type, .. } => Some(return_type),
            _ => None,
        }
    }

    pub fn function_params(&self) -> Option<&[Type]> {
        match self.kind() {
            TypeKind::Function { params, .. } => Some(params),
            _ => None,
        }
    }

    pub fn function_argc(&self) -> Option<usize> {
        self.function_params().map(<[Type]>::len)
    }

    pub fn array_element(&self) -> Option<&Type> {
        match self.kind() {
            TypeKind::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn array_size(&self) -> Option<&Expression> {
        match self.kind() {
            TypeKind::Array { size, .. } => Some(size),
            _ => None,
        }
    }

    pub fn pointee(&self) -> Option<&Type> {
        match self.kind() {
            TypeKind::Pointer { pointee } => Some(pointee),
            _ => None,
        }
    }

    /// Deterministic rendering for diagnostics
    pub fn printable(&self) -> String {
        self.to_string()
    }

    fn has_qualifiers_deep(&self) -> bool {
        if !self.qualifiers.is_empty() {
            return true;
        }
        match self.kind() {
            TypeKind::Array { element, .. } => element.has_qualifiers_deep(),
            TypeKind::Function { return_type, params } => {
                return_type.has_qualifiers_deep() || params.iter().any(Type::has_qualifiers_deep)
            }
            TypeKind::Pointer { pointee } => pointee.has_qualifiers_deep(),
            _ => false,
        }
    }

    fn basic_name(&self) -> &'static str {
        match self.tag() {
            TypeTag::Undef => "undef",
            TypeTag::Void => "void",
            TypeTag::Generic => "generic",
            TypeTag::Bool => "bool",
            TypeTag::Byte => "byte",
            TypeTag::Short => "short",
            TypeTag::Int => "int",
            TypeTag::Long => "long",
            TypeTag::Float => "float",
            TypeTag::Array => "array",
            TypeTag::Function => "function",
            TypeTag::Pointer => "pointer",
        }
    }
}

/// Two array dimensions match when they fold to the same constant, or
/// when neither is constant and both are written identically.
fn array_sizes_match(a: &Expression, b: &Expression) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    match (a.constant_value(), b.constant_value()) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a == b,
        _ => false,
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        if Type::same_instance(self, other) {
            return true;
        }
        if self.data.is_vector != other.data.is_vector {
            return false;
        }
        match (self.kind(), other.kind()) {
            (
                TypeKind::Array { element: e1, size: s1 },
                TypeKind::Array { element: e2, size: s2 },
            ) => e1 == e2 && array_sizes_match(s1, s2),
            (
                TypeKind::Function { return_type: r1, params: p1 },
                TypeKind::Function { return_type: r2, params: p2 },
            ) => r1 == r2 && p1 == p2,
            (TypeKind::Pointer { pointee: p1 }, TypeKind::Pointer { pointee: p2 }) => p1 == p2,
            (k1, k2) => k1.tag() == k2.tag() && self.is_basic(),
        }
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        self.data.is_vector.hash(state);
        match self.kind() {
            TypeKind::Array { element, size } => {
                element.hash(state);
                size.constant_value().hash(state);
            }
            TypeKind::Function { return_type, params } => {
                return_type.hash(state);
                params.hash(state);
            }
            TypeKind::Pointer { pointee } => pointee.hash(state),
            _ => {}
        }
    }
}

/// Element types that bind looser than a `[]` or `()` suffix get
/// parenthesized, e.g. an array of functions renders as `(float())[10]`.
fn needs_parens(ty: &Type) -> bool {
    ty.is_function() || ty.is_array()
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qualifiers = self.qualifiers;
        if !self.is_pointer() {
            if qualifiers.contains(Qualifiers::CONST) {
                write!(f, "const ")?;
            }
            if qualifiers.contains(Qualifiers::VOLATILE) {
                write!(f, "volatile ")?;
            }
        }
        match self.kind() {
            TypeKind::Array { .. } => {
                let mut dims = Vec::new();
                let mut base = self;
                while let TypeKind::Array { element, size } = base.kind() {
                    dims.push(size);
                    base = element;
                }
                if needs_parens(base) {
                    write!(f, "({base})")?;
                } else {
                    write!(f, "{base}")?;
                }
                for size in dims {
                    write!(f, "[{size}]")?;
                }
                Ok(())
            }
            TypeKind::Function { return_type, params } => {
                if needs_parens(return_type) {
                    write!(f, "({return_type})(")?;
                } else {
                    write!(f, "{return_type}(")?;
                }
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
            TypeKind::Pointer { pointee } => {
                if needs_parens(pointee) {
                    write!(f, "({pointee})*")?;
                } else {
                    write!(f, "{pointee}*")?;
                }
                if qualifiers.contains(Qualifiers::CONST) {
                    write!(f, " const")?;
                }
                if qualifiers.contains(Qualifiers::VOLATILE) {
                    write!(f, " volatile")?;
                }
                Ok(())
            }
            _ => {
                if self.is_vector() {
                    write!(f, "vector ")?;
                }
                write!(f, "{}", self.basic_name())
            }
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}
