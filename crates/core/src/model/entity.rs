//! Declared program elements stored in a file's arena.

use super::{Range, ScopeId, TypeReference};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Class,
    Interface,
    Annotation,
    Enum,
    Method,
    Variable,
    Field,
    /// A package segment.
    Qualifier,
    Primitive,
    /// Placeholder for a name that could not be resolved.
    Reference,
    Null,
}

impl EntityKind {
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            EntityKind::Class | EntityKind::Interface | EntityKind::Annotation | EntityKind::Enum
        )
    }

    pub fn is_variable_like(self) -> bool {
        matches!(self, EntityKind::Variable | EntityKind::Field)
    }
}

/// Index of an entity inside its owning file scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: SmolStr,
    pub bounds: Vec<TypeReference>,
}

impl TypeParameter {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn with_bound(mut self, bound: TypeReference) -> Self {
        self.bounds.push(bound);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) name: SmolStr,
    pub(crate) qualifiers: Vec<SmolStr>,
    pub(crate) kind: EntityKind,
    pub(crate) range: Range,
    pub(crate) is_static: bool,
    pub(crate) parent_scope: ScopeId,
    pub(crate) child_scope: ScopeId,
    pub(crate) detail: EntityDetail,
}

#[derive(Debug, Clone)]
pub enum EntityDetail {
    Class(ClassDetail),
    Method(MethodDetail),
    Variable(VariableDetail),
}

#[derive(Debug, Clone, Default)]
pub struct ClassDetail {
    pub superclass: Option<TypeReference>,
    pub interfaces: Vec<TypeReference>,
    pub type_parameters: Vec<TypeParameter>,
}

#[derive(Debug, Clone)]
pub struct MethodDetail {
    pub return_type: TypeReference,
    pub parameters: Vec<EntityId>,
    pub type_parameters: Vec<TypeParameter>,
    pub owner: EntityId,
}

#[derive(Debug, Clone)]
pub struct VariableDetail {
    pub type_ref: TypeReference,
}

impl Entity {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualifiers(&self) -> &[SmolStr] {
        &self.qualifiers
    }

    /// Qualifiers followed by the simple name.
    pub fn qualified_name(&self) -> Vec<SmolStr> {
        let mut name = self.qualifiers.clone();
        name.push(self.name.clone());
        name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Scope the entity is declared in.
    pub fn parent_scope(&self) -> ScopeId {
        self.parent_scope
    }

    /// Scope visible to code nested inside the entity; the empty scope for leaves.
    pub fn child_scope(&self) -> ScopeId {
        self.child_scope
    }

    pub fn detail(&self) -> &EntityDetail {
        &self.detail
    }

    pub fn as_class(&self) -> Option<&ClassDetail> {
        match &self.detail {
            EntityDetail::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodDetail> {
        match &self.detail {
            EntityDetail::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableDetail> {
        match &self.detail {
            EntityDetail::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn type_parameters(&self) -> &[TypeParameter] {
        match &self.detail {
            EntityDetail::Class(class) => &class.type_parameters,
            EntityDetail::Method(method) => &method.type_parameters,
            EntityDetail::Variable(_) => &[],
        }
    }
}
