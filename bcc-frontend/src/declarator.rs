//! Declarators
//!
//! A declarator records the pointer, array and function suffixes the parser
//! reduced around a name, in the order it reduced them, and turns them into
//! a type once the base type of the declaration is known.
//!
//! For `int *a[3]` the parser reduces `a[3]` before the `*`, so the
//! derivations are `[Array(3), Pointer]` and the resolved type is an array
//! of three `int*`.

use crate::ast::Expression;
use crate::semantic::{DeclarationContext, Diagnostics, SemanticError};
use crate::symbol::Symbol;
use crate::types::{Qualifiers, Type, TypeTable};

#[derive(Debug, Clone, PartialEq)]
pub enum Derivation {
    Pointer(Qualifiers),
    Array(Expression),
    Function(Vec<Symbol>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    name: Option<String>,
    derivations: Vec<Derivation>,
}

impl Declarator {
    pub fn identifier(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            derivations: Vec::new(),
        }
    }

    /// A declarator without a name, as in `sizeof(int*)` or `f(int[4])`
    pub fn anonymous() -> Self {
        Self {
            name: None,
            derivations: Vec::new(),
        }
    }

    pub fn pointer(mut self, qualifiers: Qualifiers) -> Self {
        self.derivations.push(Derivation::Pointer(qualifiers));
        self
    }

    pub fn array(mut self, size: Expression) -> Self {
        self.derivations.push(Derivation::Array(size));
        self
    }

    pub fn function(mut self, parameters: Vec<Symbol>) -> Self {
        self.derivations.push(Derivation::Function(parameters));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_abstract(&self) -> bool {
        self.name.is_none()
    }

    pub fn derivations(&self) -> &[Derivation] {
        &self.derivations
    }

    /// Parameters of the function this declarator declares, if any
    pub fn parameters(&self) -> Option<&[Symbol]> {
        match self.derivations.first() {
            Some(Derivation::Function(parameters)) => Some(parameters),
            _ => None,
        }
    }

    /// Build the declared type on top of the declaration's base type.
    ///
    /// Derivations apply from the last reduced to the first. A run of
    /// array suffixes is folded in source order with the reversed array
    /// constructor so that the first dimension ends up outermost.
    /// Combinations C forbids are reported and resolve to `undef`.
    pub fn resolve(&self, context: &DeclarationContext, types: &mut TypeTable, diagnostics: &mut Diagnostics) -> Type {
        let display_name = self.name.as_deref().unwrap_or("<abstract>");
        let mut ty = context.base_type.clone();
        let mut index = self.derivations.len();

        while index > 0 {
            if ty.is_unresolved() {
                return ty;
            }

            match &self.derivations[index - 1] {
                Derivation::Pointer(qualifiers) => {
                    ty = types.make_pointer_type(&ty).qualified(*qualifiers);
                    index -= 1;
                }
                Derivation::Function(parameters) => {
                    if let Some(reason) = invalid_return(&ty) {
                        diagnostics.error(invalid(display_name, reason));
                        return Type::undef();
                    }
                    let params = parameters.iter().map(|p| p.ty.clone()).collect();
                    ty = types.make_function_type(&ty, params);
                    index -= 1;
                }
                Derivation::Array(_) => {
                    if let Some(reason) = invalid_element(&ty) {
                        diagnostics.error(invalid(display_name, reason));
                        return Type::undef();
                    }
                    let start = self.derivations[..index]
                        .iter()
                        .rposition(|d| !matches!(d, Derivation::Array(_)))
                        .map_or(0, |position| position + 1);
                    let sizes = self.derivations[start..index].iter().filter_map(|d| match d {
                        Derivation::Array(size) => Some(size.clone()),
                        _ => None,
                    });

                    if ty.is_array() {
                        for size in sizes.rev() {
                            ty = types.make_array_type(&ty, size);
                        }
                    } else {
                        let base = ty.clone();
                        let mut folded: Option<Type> = None;
                        for size in sizes {
                            let inner = folded.as_ref().unwrap_or(&base).clone();
                            folded = Some(types.make_array_type_reversed(&inner, size));
                        }
                        ty = folded.unwrap_or(base);
                    }
                    index = start;
                }
            }
        }

        ty
    }

    /// Resolve into a symbol named after the declarator, not yet declared
    /// in any scope
    pub fn into_symbol(self, context: &DeclarationContext, types: &mut TypeTable, diagnostics: &mut Diagnostics) -> Symbol {
        let ty = self.resolve(context, types, diagnostics);
        let name = self.name.unwrap_or_default();

        let ty = if ty.is_void() && !name.is_empty() {
            diagnostics.error(invalid(&name, "a variable of type void"));
            Type::undef()
        } else {
            ty
        };

        let is_function = ty.is_function();
        let symbol = Symbol::new(name, ty).with_storage_class(context.storage_class);
        if is_function {
            symbol.as_function()
        } else {
            symbol
        }
    }
}

fn invalid(name: &str, reason: &'static str) -> SemanticError {
    SemanticError::InvalidDeclarator {
        name: name.to_string(),
        reason,
    }
}

fn invalid_element(element: &Type) -> Option<&'static str> {
    if element.is_void() {
        Some("an array of void")
    } else if element.is_function() {
        Some("an array of functions")
    } else {
        None
    }
}

fn invalid_return(return_type: &Type) -> Option<&'static str> {
    if return_type.is_array() {
        Some("a function returning an array")
    } else if return_type.is_function() {
        Some("a function returning a function")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Constant;
    use bcc_common::StorageClass;
    use pretty_assertions::assert_eq;

    fn dim(n: i64) -> Expression {
        Expression::constant(Constant::int(n))
    }

    fn resolve(declarator: &Declarator, base: Type) -> (Type, Diagnostics) {
        let mut types = TypeTable::new();
        let mut diagnostics = Diagnostics::new("t.c");
        let ty = declarator.resolve(&DeclarationContext::new(base), &mut types, &mut diagnostics);
        (ty, diagnostics)
    }

    #[test]
    fn test_array_of_pointers() {
        let declarator = Declarator::identifier("a").array(dim(3)).pointer(Qualifiers::empty());
        let (ty, _) = resolve(&declarator, Type::int());
        assert_eq!(ty.to_string(), "int*[3]");
        assert!(ty.array_element().unwrap().is_pointer());
    }

    #[test]
    fn test_multi_dimensional_array() {
        let declarator = Declarator::identifier("m").array(dim(2)).array(dim(10));
        let (ty, _) = resolve(&declarator, Type::float());

        let mut types = TypeTable::new();
        let inner = types.make_array_type(&Type::float(), dim(10));
        let expected = types.make_array_type(&inner, dim(2));
        assert_eq!(ty, expected);
        assert_eq!(ty.to_string(), "float[2][10]");
    }

    #[test]
    fn test_function_declarator() {
        let declarator = Declarator::identifier("f")
            .function(vec![Symbol::new("x", Type::int()), Symbol::new("y", Type::float())]);
        assert_eq!(declarator.parameters().map(<[Symbol]>::len), Some(2));

        let mut types = TypeTable::new();
        let mut diagnostics = Diagnostics::new("t.c");
        let context = DeclarationContext::new(Type::void()).with_storage_class(StorageClass::Static);
        let symbol = declarator.into_symbol(&context, &mut types, &mut diagnostics);
        assert!(symbol.is_function());
        assert_eq!(symbol.storage_class, StorageClass::Static);
        assert_eq!(symbol.ty.to_string(), "void(int, float)");
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_pointer_to_array() {
        // int (*p)[4]: the parser reduces `*p` first, then `[4]`
        let declarator = Declarator::identifier("p").pointer(Qualifiers::CONST).array(dim(4));
        let (ty, _) = resolve(&declarator, Type::int());
        assert!(ty.is_pointer());
        assert_eq!(ty.to_string(), "(int[4])* const");
    }

    #[test]
    fn test_invalid_combinations() {
        let (ty, diagnostics) = resolve(&Declarator::identifier("v").array(dim(2)), Type::void());
        assert_eq!(ty, Type::undef());
        assert_eq!(
            diagnostics.errors(),
            &[SemanticError::InvalidDeclarator { name: "v".to_string(), reason: "an array of void" }]
        );

        let returns_array = Declarator::identifier("g").function(vec![]).array(dim(3));
        let (ty, diagnostics) = resolve(&returns_array, Type::int());
        assert_eq!(ty, Type::undef());
        assert_eq!(diagnostics.errors().len(), 1);
    }

    #[test]
    fn test_void_variable() {
        let mut types = TypeTable::new();
        let mut diagnostics = Diagnostics::new("t.c");
        let symbol = Declarator::identifier("nothing").into_symbol(
            &DeclarationContext::new(Type::void()),
            &mut types,
            &mut diagnostics,
        );
        assert_eq!(symbol.ty, Type::undef());
        assert!(diagnostics.has_errors());

        let abstract_void = Declarator::anonymous();
        assert!(abstract_void.is_abstract());
    }
}
