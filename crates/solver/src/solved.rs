//! Results of type solving.

use indexmap::IndexMap;
use javalens_core::model::{EntityRef, PackageScope, PrimitiveType, ScopeRef};
use smol_str::SmolStr;
use std::fmt;

/// Type-parameter name to the type it stands for, in declaration order
/// (outermost declarer first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolvedTypeParameters<'m> {
    bindings: IndexMap<SmolStr, SolvedType<'m>>,
}

impl<'m> SolvedTypeParameters<'m> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SolvedType<'m>> {
        self.bindings.get(name)
    }

    /// Later bindings of the same name replace earlier ones.
    pub fn insert(&mut self, name: impl Into<SmolStr>, solved: SolvedType<'m>) {
        self.bindings.insert(name.into(), solved);
    }

    pub fn extend(&mut self, other: &SolvedTypeParameters<'m>) {
        for (name, solved) in &other.bindings {
            self.bindings.insert(name.clone(), solved.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &SolvedType<'m>)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A class, interface, enum or annotation with its type arguments substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedEntityType<'m> {
    entity: EntityRef<'m>,
    type_parameters: SolvedTypeParameters<'m>,
}

impl<'m> SolvedEntityType<'m> {
    pub fn new(entity: EntityRef<'m>, type_parameters: SolvedTypeParameters<'m>) -> Self {
        Self {
            entity,
            type_parameters,
        }
    }

    pub fn entity(&self) -> EntityRef<'m> {
        self.entity
    }

    pub fn type_parameters(&self) -> &SolvedTypeParameters<'m> {
        &self.type_parameters
    }

    pub fn qualified_name(&self) -> Vec<SmolStr> {
        self.entity.qualified_name()
    }

    /// Primitive a `java.lang` wrapper class unboxes to.
    pub fn unboxed(&self) -> Option<PrimitiveType> {
        let name = self.qualified_name();
        let segments: Vec<&str> = name.iter().map(SmolStr::as_str).collect();
        PrimitiveType::from_boxed_class(&segments)
    }
}

#[derive(Debug, Clone)]
pub enum SolvedType<'m> {
    Entity(SolvedEntityType<'m>),
    Primitive(PrimitiveType),
    Package(&'m PackageScope),
    Array(Box<SolvedType<'m>>),
    Null,
}

impl<'m> SolvedType<'m> {
    pub fn entity_type(entity: EntityRef<'m>, type_parameters: SolvedTypeParameters<'m>) -> Self {
        SolvedType::Entity(SolvedEntityType::new(entity, type_parameters))
    }

    /// Wrap in `dimensions` array levels.
    pub fn array_of(self, dimensions: usize) -> Self {
        (0..dimensions).fold(self, |element, _| SolvedType::Array(Box::new(element)))
    }

    /// Backing entity; `None` for arrays.
    pub fn entity(&self) -> Option<EntityRef<'m>> {
        match self {
            SolvedType::Entity(solved) => Some(solved.entity),
            SolvedType::Primitive(primitive) => Some(EntityRef::Primitive(*primitive)),
            SolvedType::Package(package) => Some(EntityRef::Package(*package)),
            SolvedType::Null => Some(EntityRef::Null),
            SolvedType::Array(_) => None,
        }
    }

    pub fn as_entity_type(&self) -> Option<&SolvedEntityType<'m>> {
        match self {
            SolvedType::Entity(solved) => Some(solved),
            _ => None,
        }
    }

    pub fn type_parameters(&self) -> Option<&SolvedTypeParameters<'m>> {
        self.as_entity_type().map(SolvedEntityType::type_parameters)
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            SolvedType::Primitive(primitive) => Some(*primitive),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, SolvedType::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SolvedType::Array(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SolvedType::Null)
    }

    /// Component type of an array.
    pub fn element_type(&self) -> Option<&SolvedType<'m>> {
        match self {
            SolvedType::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn qualified_name(&self) -> Option<Vec<SmolStr>> {
        self.entity().map(EntityRef::qualified_name)
    }

    /// Scope a member access on this type looks into.
    pub fn child_scope(&self) -> ScopeRef<'m> {
        self.entity()
            .map(EntityRef::child_scope)
            .unwrap_or(ScopeRef::Empty)
    }
}

impl PartialEq for SolvedType<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SolvedType::Entity(a), SolvedType::Entity(b)) => a == b,
            (SolvedType::Primitive(a), SolvedType::Primitive(b)) => a == b,
            (SolvedType::Package(a), SolvedType::Package(b)) => std::ptr::eq(*a, *b),
            (SolvedType::Array(a), SolvedType::Array(b)) => a == b,
            (SolvedType::Null, SolvedType::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SolvedType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolvedType::Entity(solved) => {
                write!(f, "{}", solved.qualified_name().join("."))?;
                if !solved.type_parameters.is_empty() {
                    write!(f, "<")?;
                    for (i, (name, bound)) in solved.type_parameters.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}={}", name, bound)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            SolvedType::Primitive(primitive) => write!(f, "{}", primitive),
            SolvedType::Package(package) => write!(f, "package {}", package.qualifiers().join(".")),
            SolvedType::Array(element) => write!(f, "{}[]", element),
            SolvedType::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_of_nests_and_unwraps() {
        let solved = SolvedType::Primitive(PrimitiveType::Int).array_of(2);
        assert_eq!(solved.to_string(), "int[][]");
        let element = solved.element_type().unwrap();
        assert_eq!(element.to_string(), "int[]");
        assert_eq!(element.element_type(), Some(&SolvedType::Primitive(PrimitiveType::Int)));
        assert!(solved.entity().is_none());
    }

    #[test]
    fn test_later_binding_replaces_earlier() {
        let mut bindings = SolvedTypeParameters::new();
        bindings.insert("T", SolvedType::Primitive(PrimitiveType::Int));
        bindings.insert("T", SolvedType::Null);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get("T"), Some(&SolvedType::Null));
    }
}
