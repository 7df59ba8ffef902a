//! Scopes stored in a file's arena.

use super::{EntityId, Range};
use indexmap::IndexMap;
use smol_str::SmolStr;

/// Index of a scope inside its owning file scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    /// The file's own scope.
    pub const FILE: ScopeId = ScopeId(0);
    /// Shared terminal scope of leaf entities.
    pub const EMPTY: ScopeId = ScopeId(1);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub(crate) parent: Option<ScopeId>,
    pub(crate) range: Range,
    pub(crate) kind: ScopeKind,
}

#[derive(Debug, Clone)]
pub enum ScopeKind {
    /// Top-level type declarations of the file.
    File(Members),
    /// Statement-list scope; owns its local declarations.
    Block(Members),
    /// Parameters and body locals of a method.
    Method { method: EntityId, locals: Members },
    Class { class: EntityId, members: ClassMembers },
    Empty,
}

impl Scope {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }

    /// Entity whose child scope this is, for class and method scopes.
    pub fn owner(&self) -> Option<EntityId> {
        match &self.kind {
            ScopeKind::Method { method, .. } => Some(*method),
            ScopeKind::Class { class, .. } => Some(*class),
            ScopeKind::File(_) | ScopeKind::Block(_) | ScopeKind::Empty => None,
        }
    }
}

/// Name to entities multimap in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Members {
    entries: IndexMap<SmolStr, Vec<EntityId>>,
}

impl Members {
    pub(crate) fn insert(&mut self, name: SmolStr, id: EntityId) {
        self.entries.entry(name).or_default().push(id);
    }

    pub fn get(&self, name: &str) -> &[EntityId] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &[EntityId])> {
        self.entries.iter().map(|(name, ids)| (name, ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Members of a class: fields and inner classes are unique per name, methods are not.
#[derive(Debug, Clone, Default)]
pub struct ClassMembers {
    pub(crate) fields: IndexMap<SmolStr, EntityId>,
    pub(crate) methods: IndexMap<SmolStr, Vec<EntityId>>,
    pub(crate) classes: IndexMap<SmolStr, EntityId>,
}

impl ClassMembers {
    pub fn field(&self, name: &str) -> Option<EntityId> {
        self.fields.get(name).copied()
    }

    pub fn inner_class(&self, name: &str) -> Option<EntityId> {
        self.classes.get(name).copied()
    }

    /// Every overload with this name.
    pub fn methods(&self, name: &str) -> &[EntityId] {
        self.methods.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.fields.values().copied()
    }

    pub fn inner_classes(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.classes.values().copied()
    }

    pub fn all_methods(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.methods.values().flatten().copied()
    }
}
