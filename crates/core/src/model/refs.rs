//! Borrowed handles into a module snapshot.
//!
//! Entities live in per-file arenas, package segments in the module's package tree, and
//! primitives/null nowhere at all. `EntityRef` and `ScopeRef` give the solvers one uniform,
//! `Copy` view over all of them for the lifetime of a module borrow.

use super::{
    ClassMembers, Entity, EntityId, EntityKind, FileScope, PackageScope, PrimitiveType, Range,
    Scope, ScopeId, ScopeKind, TypeParameter, TypeReference,
};
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'m> {
    Declared { file: &'m FileScope, id: EntityId },
    Package(&'m PackageScope),
    Primitive(PrimitiveType),
    Null,
}

/// Identity of an entity, stable while the module snapshot is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Declared { file: usize, id: EntityId },
    Package(usize),
    Primitive(PrimitiveType),
    Null,
}

impl<'m> EntityRef<'m> {
    pub fn declared(file: &'m FileScope, id: EntityId) -> Self {
        EntityRef::Declared { file, id }
    }

    pub fn key(self) -> EntityKey {
        match self {
            EntityRef::Declared { file, id } => EntityKey::Declared {
                file: file as *const FileScope as usize,
                id,
            },
            EntityRef::Package(package) => EntityKey::Package(package as *const PackageScope as usize),
            EntityRef::Primitive(primitive) => EntityKey::Primitive(primitive),
            EntityRef::Null => EntityKey::Null,
        }
    }

    pub fn entity(self) -> Option<&'m Entity> {
        match self {
            EntityRef::Declared { file, id } => Some(file.entity(id)),
            _ => None,
        }
    }

    pub fn file(self) -> Option<&'m FileScope> {
        match self {
            EntityRef::Declared { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn name(self) -> &'m str {
        match self {
            EntityRef::Declared { file, id } => file.entity(id).name(),
            EntityRef::Package(package) => package.name().unwrap_or(""),
            EntityRef::Primitive(primitive) => primitive.name(),
            EntityRef::Null => "null",
        }
    }

    pub fn kind(self) -> EntityKind {
        match self {
            EntityRef::Declared { file, id } => file.entity(id).kind(),
            EntityRef::Package(_) => EntityKind::Qualifier,
            EntityRef::Primitive(_) => EntityKind::Primitive,
            EntityRef::Null => EntityKind::Null,
        }
    }

    pub fn qualifiers(self) -> &'m [SmolStr] {
        match self {
            EntityRef::Declared { file, id } => file.entity(id).qualifiers(),
            EntityRef::Package(package) => match package.qualifiers().split_last() {
                Some((_, qualifiers)) => qualifiers,
                None => &[],
            },
            EntityRef::Primitive(_) | EntityRef::Null => &[],
        }
    }

    pub fn qualified_name(self) -> Vec<SmolStr> {
        match self {
            EntityRef::Package(package) => package.qualifiers().to_vec(),
            _ => {
                let mut name = self.qualifiers().to_vec();
                name.push(SmolStr::new(self.name()));
                name
            }
        }
    }

    pub fn range(self) -> Option<Range> {
        self.entity().map(Entity::range)
    }

    pub fn is_static(self) -> bool {
        self.entity().is_some_and(Entity::is_static)
    }

    pub fn is_method(self) -> bool {
        self.kind() == EntityKind::Method
    }

    pub fn is_class_like(self) -> bool {
        self.kind().is_class_like()
    }

    pub fn type_parameters(self) -> &'m [TypeParameter] {
        self.entity().map(Entity::type_parameters).unwrap_or(&[])
    }

    /// Scope visible to code nested inside this entity.
    pub fn child_scope(self) -> ScopeRef<'m> {
        match self {
            EntityRef::Declared { file, id } => ScopeRef::local(file, file.entity(id).child_scope()),
            EntityRef::Package(package) => ScopeRef::Package(package),
            EntityRef::Primitive(_) | EntityRef::Null => ScopeRef::Empty,
        }
    }

    /// Scope the entity is declared in; `None` for packages, primitives and null.
    pub fn parent_scope(self) -> Option<ScopeRef<'m>> {
        match self {
            EntityRef::Declared { file, id } => {
                Some(ScopeRef::local(file, file.entity(id).parent_scope()))
            }
            _ => None,
        }
    }

    /// Fields, methods and inner classes of a class-like entity.
    pub fn class_members(self) -> Option<&'m ClassMembers> {
        match self.child_scope().data()?.kind() {
            ScopeKind::Class { members, .. } => Some(members),
            _ => None,
        }
    }

    /// Declared type of a field, parameter or local variable.
    pub fn variable_type(self) -> Option<&'m TypeReference> {
        self.entity()?.as_variable().map(|variable| &variable.type_ref)
    }

    pub fn return_type(self) -> Option<&'m TypeReference> {
        self.entity()?.as_method().map(|method| &method.return_type)
    }

    /// Parameters of a method in declaration order.
    pub fn parameters(self) -> Vec<EntityRef<'m>> {
        let EntityRef::Declared { file, id } = self else {
            return Vec::new();
        };
        file.entity(id)
            .as_method()
            .map(|method| {
                method
                    .parameters
                    .iter()
                    .map(|parameter| EntityRef::declared(file, *parameter))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Owning class of a method.
    pub fn owner(self) -> Option<EntityRef<'m>> {
        let EntityRef::Declared { file, id } = self else {
            return None;
        };
        file.entity(id)
            .as_method()
            .map(|method| EntityRef::declared(file, method.owner))
    }
}

impl PartialEq for EntityRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for EntityRef<'_> {}

impl Hash for EntityRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ScopeRef<'m> {
    Local { file: &'m FileScope, id: ScopeId },
    Package(&'m PackageScope),
    Empty,
}

impl<'m> ScopeRef<'m> {
    pub fn local(file: &'m FileScope, id: ScopeId) -> Self {
        if id == ScopeId::EMPTY {
            ScopeRef::Empty
        } else {
            ScopeRef::Local { file, id }
        }
    }

    pub fn file_root(file: &'m FileScope) -> Self {
        ScopeRef::Local {
            file,
            id: ScopeId::FILE,
        }
    }

    pub fn data(self) -> Option<&'m Scope> {
        match self {
            ScopeRef::Local { file, id } => Some(file.scope(id)),
            _ => None,
        }
    }

    pub fn file(self) -> Option<&'m FileScope> {
        match self {
            ScopeRef::Local { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn range(self) -> Option<Range> {
        self.data().map(Scope::range)
    }

    pub fn is_file(self) -> bool {
        matches!(self.data().map(Scope::kind), Some(ScopeKind::File(_)))
    }

    /// Enclosing scope. File scopes have none: global lookups go through packages.
    pub fn parent(self) -> Option<ScopeRef<'m>> {
        match self {
            ScopeRef::Local { file, id } => file
                .scope(id)
                .parent()
                .map(|parent| ScopeRef::local(file, parent)),
            ScopeRef::Package(_) | ScopeRef::Empty => None,
        }
    }

    /// Class or method whose child scope this is.
    pub fn owner(self) -> Option<EntityRef<'m>> {
        let ScopeRef::Local { file, id } = self else {
            return None;
        };
        file.scope(id)
            .owner()
            .map(|owner| EntityRef::declared(file, owner))
    }

    /// Nearest class scope owner, starting at this scope.
    pub fn enclosing_class(self) -> Option<EntityRef<'m>> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(owner) = scope.owner().filter(|owner| owner.is_class_like()) {
                return Some(owner);
            }
            current = scope.parent();
        }
        None
    }

    /// Entities named `name` declared directly in this scope.
    ///
    /// In block and method scopes, variables declared after `position` are skipped;
    /// `None` disables the filter.
    pub fn own_entities(self, name: &str, position: Option<usize>) -> Vec<EntityRef<'m>> {
        match self {
            ScopeRef::Local { file, id } => match file.scope(id).kind() {
                ScopeKind::File(members) => members
                    .get(name)
                    .iter()
                    .map(|id| EntityRef::declared(file, *id))
                    .collect(),
                ScopeKind::Block(members) | ScopeKind::Method { locals: members, .. } => members
                    .get(name)
                    .iter()
                    .filter(|id| declared_before(file.entity(**id), position))
                    .map(|id| EntityRef::declared(file, *id))
                    .collect(),
                ScopeKind::Class { members, .. } => members
                    .field(name)
                    .into_iter()
                    .chain(members.inner_class(name))
                    .chain(members.methods(name).iter().copied())
                    .map(|id| EntityRef::declared(file, id))
                    .collect(),
                ScopeKind::Empty => Vec::new(),
            },
            ScopeRef::Package(package) => package
                .child(name)
                .map(EntityRef::Package)
                .into_iter()
                .chain(
                    package
                        .files()
                        .filter_map(|file| {
                            file.top_level_class(name)
                                .map(|id| EntityRef::declared(file.as_ref(), id))
                        }),
                )
                .collect(),
            ScopeRef::Empty => Vec::new(),
        }
    }

    /// All overloads named `name` of a class scope; empty for every other scope.
    pub fn methods_named(self, name: &str) -> Vec<EntityRef<'m>> {
        match self {
            ScopeRef::Local { file, id } => match file.scope(id).kind() {
                ScopeKind::Class { members, .. } => members
                    .methods(name)
                    .iter()
                    .map(|id| EntityRef::declared(file, *id))
                    .collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Every entity declared directly in this scope, in declaration order.
    pub fn own_members(self, position: Option<usize>) -> Vec<EntityRef<'m>> {
        match self {
            ScopeRef::Local { file, id } => {
                let ids: Vec<EntityId> = match file.scope(id).kind() {
                    ScopeKind::File(members) => {
                        members.iter().flat_map(|(_, ids)| ids.iter().copied()).collect()
                    }
                    ScopeKind::Block(members) | ScopeKind::Method { locals: members, .. } => {
                        members
                            .iter()
                            .flat_map(|(_, ids)| ids.iter().copied())
                            .filter(|id| declared_before(file.entity(*id), position))
                            .collect()
                    }
                    ScopeKind::Class { members, .. } => members
                        .fields()
                        .chain(members.all_methods())
                        .chain(members.inner_classes())
                        .collect(),
                    ScopeKind::Empty => Vec::new(),
                };
                ids.into_iter()
                    .map(|id| EntityRef::declared(file, id))
                    .collect()
            }
            ScopeRef::Package(package) => package
                .children()
                .map(EntityRef::Package)
                .chain(package.files().flat_map(|file| {
                    let file: &'m FileScope = file.as_ref();
                    file.top_level_classes()
                        .map(move |id| EntityRef::declared(file, id))
                }))
                .collect(),
            ScopeRef::Empty => Vec::new(),
        }
    }

    /// Entities visible from this scope through the parent chain, grouped by name.
    ///
    /// A name found in a nearer scope hides every same-named entity farther out.
    pub fn visible_entities(self, position: Option<usize>) -> IndexMap<SmolStr, Vec<EntityRef<'m>>> {
        let mut visible: IndexMap<SmolStr, Vec<EntityRef<'m>>> = IndexMap::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            let mut layer: IndexMap<SmolStr, Vec<EntityRef<'m>>> = IndexMap::new();
            for entity in scope.own_members(position) {
                layer.entry(SmolStr::new(entity.name())).or_default().push(entity);
            }
            for (name, entities) in layer {
                visible.entry(name).or_insert(entities);
            }
            current = scope.parent();
        }
        visible
    }
}

fn declared_before(entity: &Entity, position: Option<usize>) -> bool {
    if !entity.kind().is_variable_like() {
        return true;
    }
    position.is_none_or(|position| entity.range().start <= position)
}
