//! Construction interface used by the parser front-end.

use super::{
    ClassDetail, ClassMembers, Entity, EntityDetail, EntityId, EntityKind, FileScope, ImportTable,
    Members, MethodDetail, Range, Scope, ScopeId, ScopeKind, TypeParameter, TypeReference,
    VariableDetail,
};
use crate::error::{Result, SemanticError};
use smol_str::SmolStr;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

/// Populates one file's arena. Entities and scopes are addressed by the ids it hands out.
#[derive(Debug)]
pub struct FileScopeBuilder {
    path: PathBuf,
    package: Vec<SmolStr>,
    imports: ImportTable,
    entities: Vec<Entity>,
    scopes: Vec<Scope>,
}

impl FileScopeBuilder {
    pub fn new(path: impl Into<PathBuf>, package: &[&str]) -> Self {
        Self {
            path: path.into(),
            package: package.iter().copied().map(SmolStr::new).collect(),
            imports: ImportTable::default(),
            entities: Vec::new(),
            scopes: vec![
                Scope {
                    parent: None,
                    range: Range::new(0, usize::MAX),
                    kind: ScopeKind::File(Members::default()),
                },
                Scope {
                    parent: None,
                    range: Range::default(),
                    kind: ScopeKind::Empty,
                },
            ],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::FILE
    }

    /// `import a.b.C;`
    pub fn import(&mut self, qualified_name: &[&str]) -> &mut Self {
        if let Some(simple) = qualified_name.last() {
            self.imports
                .classes
                .insert(SmolStr::new(simple), to_segments(qualified_name));
        }
        self
    }

    /// `import a.b.*;`
    pub fn import_on_demand(&mut self, qualifiers: &[&str]) -> &mut Self {
        self.imports.on_demand.push(to_segments(qualifiers));
        self
    }

    /// `import static a.b.C.member;`
    pub fn import_static(&mut self, qualified_member: &[&str]) -> &mut Self {
        if let Some((member, class)) = qualified_member.split_last() {
            self.imports
                .static_members
                .insert(SmolStr::new(member), to_segments(class));
        }
        self
    }

    /// `import static a.b.C.*;`
    pub fn import_static_on_demand(&mut self, class: &[&str]) -> &mut Self {
        self.imports.static_on_demand.push(to_segments(class));
        self
    }

    /// Declare a class, interface, enum or annotation in `scope`.
    ///
    /// A file scope makes it top-level, a class scope an inner class, a method or block
    /// scope a local class.
    pub fn add_class(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: EntityKind,
        range: Range,
    ) -> Result<EntityId> {
        if !kind.is_class_like() {
            return Err(SemanticError::wrong_kind("class-like kind", kind));
        }
        let entity = self.new_entity(
            scope,
            name,
            kind,
            range,
            EntityDetail::Class(ClassDetail::default()),
        );
        let id = self.insert(scope, entity)?;
        self.open_child_scope(
            id,
            ScopeKind::Class {
                class: id,
                members: ClassMembers::default(),
            },
        );
        Ok(id)
    }

    pub fn add_method(
        &mut self,
        class: EntityId,
        name: &str,
        return_type: TypeReference,
        range: Range,
    ) -> Result<EntityId> {
        let scope = self.class_scope(class)?;
        let entity = self.new_entity(
            scope,
            name,
            EntityKind::Method,
            range,
            EntityDetail::Method(MethodDetail {
                return_type,
                parameters: Vec::new(),
                type_parameters: Vec::new(),
                owner: class,
            }),
        );
        let id = self.insert(scope, entity)?;
        self.open_child_scope(
            id,
            ScopeKind::Method {
                method: id,
                locals: Members::default(),
            },
        );
        Ok(id)
    }

    pub fn add_parameter(
        &mut self,
        method: EntityId,
        name: &str,
        type_ref: TypeReference,
        range: Range,
    ) -> Result<EntityId> {
        let scope = self.entity_ref(method)?.child_scope;
        if self.entity_ref(method)?.kind != EntityKind::Method {
            return Err(SemanticError::wrong_kind(
                "method",
                self.entity_ref(method)?.kind,
            ));
        }
        let id = self.add_variable(scope, name, type_ref, range)?;
        if let EntityDetail::Method(detail) = &mut self.entity_mut(method)?.detail {
            detail.parameters.push(id);
        }
        Ok(id)
    }

    pub fn add_field(
        &mut self,
        class: EntityId,
        name: &str,
        type_ref: TypeReference,
        range: Range,
    ) -> Result<EntityId> {
        let scope = self.class_scope(class)?;
        let entity = self.new_entity(
            scope,
            name,
            EntityKind::Field,
            range,
            EntityDetail::Variable(VariableDetail { type_ref }),
        );
        self.insert(scope, entity)
    }

    /// Declare a local variable in a method or block scope.
    pub fn add_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        type_ref: TypeReference,
        range: Range,
    ) -> Result<EntityId> {
        let entity = self.new_entity(
            scope,
            name,
            EntityKind::Variable,
            range,
            EntityDetail::Variable(VariableDetail { type_ref }),
        );
        self.insert(scope, entity)
    }

    /// Open a statement-list scope (if/while/for/switch bodies, anonymous class bodies).
    pub fn add_block(&mut self, parent: ScopeId, range: Range) -> Result<ScopeId> {
        match self.scope_ref(parent)?.kind {
            ScopeKind::Empty => Err(SemanticError::InvalidOperation(
                "cannot open a block inside an empty scope".to_string(),
            )),
            _ => {
                let id = ScopeId(self.scopes.len() as u32);
                self.scopes.push(Scope {
                    parent: Some(parent),
                    range,
                    kind: ScopeKind::Block(Members::default()),
                });
                Ok(id)
            }
        }
    }

    pub fn add_type_parameter(&mut self, owner: EntityId, parameter: TypeParameter) -> Result<()> {
        let entity = self.entity_mut(owner)?;
        match &mut entity.detail {
            EntityDetail::Class(class) => class.type_parameters.push(parameter),
            EntityDetail::Method(method) => method.type_parameters.push(parameter),
            EntityDetail::Variable(_) => {
                return Err(SemanticError::wrong_kind("class or method", entity.kind));
            }
        }
        Ok(())
    }

    pub fn set_superclass(&mut self, class: EntityId, superclass: TypeReference) -> Result<()> {
        self.class_detail_mut(class)?.superclass = Some(superclass);
        Ok(())
    }

    pub fn add_interface(&mut self, class: EntityId, interface: TypeReference) -> Result<()> {
        self.class_detail_mut(class)?.interfaces.push(interface);
        Ok(())
    }

    pub fn set_static(&mut self, entity: EntityId, is_static: bool) -> Result<()> {
        self.entity_mut(entity)?.is_static = is_static;
        Ok(())
    }

    /// Child scope of an entity; the empty scope for variables and fields.
    pub fn scope_of(&self, entity: EntityId) -> Result<ScopeId> {
        Ok(self.entity_ref(entity)?.child_scope)
    }

    pub fn build(self) -> FileScope {
        debug!(
            path = %self.path.display(),
            entities = self.entities.len(),
            scopes = self.scopes.len(),
            "built file scope"
        );
        FileScope {
            path: self.path,
            package: self.package,
            imports: self.imports,
            entities: self.entities,
            scopes: self.scopes,
            scope_index: OnceLock::new(),
            line_map: OnceLock::new(),
        }
    }

    fn new_entity(
        &self,
        scope: ScopeId,
        name: &str,
        kind: EntityKind,
        range: Range,
        detail: EntityDetail,
    ) -> Entity {
        Entity {
            name: SmolStr::new(name),
            qualifiers: self.scope_path(scope),
            kind,
            range,
            is_static: false,
            parent_scope: scope,
            child_scope: ScopeId::EMPTY,
            detail,
        }
    }

    fn insert(&mut self, scope: ScopeId, entity: Entity) -> Result<EntityId> {
        let id = EntityId(self.entities.len() as u32);
        let name = entity.name.clone();
        let kind = entity.kind;
        let target = self
            .scopes
            .get_mut(scope.index())
            .ok_or_else(|| SemanticError::InvalidOperation(format!("unknown scope {:?}", scope)))?;

        match &mut target.kind {
            ScopeKind::Empty => {
                return Err(SemanticError::InvalidOperation(format!(
                    "cannot add `{}` to an empty scope",
                    name
                )));
            }
            ScopeKind::File(members) => {
                if !kind.is_class_like() {
                    return Err(SemanticError::wrong_kind("class-like kind", kind));
                }
                members.insert(name, id);
            }
            ScopeKind::Block(members) | ScopeKind::Method { locals: members, .. } => {
                members.insert(name, id);
            }
            ScopeKind::Class { members, .. } => match kind {
                EntityKind::Method => members.methods.entry(name).or_default().push(id),
                EntityKind::Field => {
                    if members.fields.contains_key(&name) {
                        debug!(field = %name, "duplicate field declaration ignored");
                    } else {
                        members.fields.insert(name, id);
                    }
                }
                kind if kind.is_class_like() => {
                    if members.classes.contains_key(&name) {
                        debug!(class = %name, "duplicate inner class declaration ignored");
                    } else {
                        members.classes.insert(name, id);
                    }
                }
                kind => return Err(SemanticError::wrong_kind("class member", kind)),
            },
        }

        self.entities.push(entity);
        Ok(id)
    }

    fn open_child_scope(&mut self, owner: EntityId, kind: ScopeKind) {
        let entity = &mut self.entities[owner.index()];
        let scope = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(entity.parent_scope),
            range: entity.range,
            kind,
        });
        entity.child_scope = scope;
    }

    fn scope_path(&self, scope: ScopeId) -> Vec<SmolStr> {
        let Some(data) = self.scopes.get(scope.index()) else {
            return Vec::new();
        };
        match &data.kind {
            ScopeKind::File(_) => self.package.clone(),
            ScopeKind::Class { class: owner, .. } | ScopeKind::Method { method: owner, .. } => {
                self.entities[owner.index()].qualified_name()
            }
            ScopeKind::Block(_) => data
                .parent
                .map(|parent| self.scope_path(parent))
                .unwrap_or_default(),
            ScopeKind::Empty => Vec::new(),
        }
    }

    fn class_scope(&self, class: EntityId) -> Result<ScopeId> {
        let entity = self.entity_ref(class)?;
        if !entity.kind.is_class_like() {
            return Err(SemanticError::wrong_kind("class-like kind", entity.kind));
        }
        Ok(entity.child_scope)
    }

    fn class_detail_mut(&mut self, class: EntityId) -> Result<&mut ClassDetail> {
        let entity = self.entity_mut(class)?;
        let kind = entity.kind;
        match &mut entity.detail {
            EntityDetail::Class(detail) => Ok(detail),
            _ => Err(SemanticError::wrong_kind("class-like kind", kind)),
        }
    }

    fn entity_ref(&self, id: EntityId) -> Result<&Entity> {
        self.entities
            .get(id.index())
            .ok_or_else(|| SemanticError::InvalidOperation(format!("unknown entity {:?}", id)))
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities
            .get_mut(id.index())
            .ok_or_else(|| SemanticError::InvalidOperation(format!("unknown entity {:?}", id)))
    }

    fn scope_ref(&self, id: ScopeId) -> Result<&Scope> {
        self.scopes
            .get(id.index())
            .ok_or_else(|| SemanticError::InvalidOperation(format!("unknown scope {:?}", id)))
    }
}

fn to_segments(names: &[&str]) -> Vec<SmolStr> {
    names.iter().copied().map(SmolStr::new).collect()
}
