//! Per-file scope: the arena every declaration of one source file lives in.

use super::{Entity, EntityId, LineMap, Range, Scope, ScopeId, ScopeKind};
use crate::error::{Result, SemanticError};
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Import declarations of a compilation unit.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    pub(crate) classes: IndexMap<SmolStr, Vec<SmolStr>>,
    pub(crate) on_demand: Vec<Vec<SmolStr>>,
    pub(crate) static_members: IndexMap<SmolStr, Vec<SmolStr>>,
    pub(crate) static_on_demand: Vec<Vec<SmolStr>>,
}

impl ImportTable {
    /// Fully qualified name imported under `simple_name` (`import a.b.C;`).
    pub fn class_import(&self, simple_name: &str) -> Option<&[SmolStr]> {
        self.classes.get(simple_name).map(Vec::as_slice)
    }

    /// Packages or classes imported with `.*`.
    pub fn on_demand(&self) -> &[Vec<SmolStr>] {
        &self.on_demand
    }

    /// Class a single static import of `member` refers to (`import static a.b.C.member;`).
    pub fn static_import(&self, member: &str) -> Option<&[SmolStr]> {
        self.static_members.get(member).map(Vec::as_slice)
    }

    /// Classes imported with `import static a.b.C.*;`.
    pub fn static_on_demand(&self) -> &[Vec<SmolStr>] {
        &self.static_on_demand
    }
}

#[derive(Debug)]
pub struct FileScope {
    pub(crate) path: PathBuf,
    pub(crate) package: Vec<SmolStr>,
    pub(crate) imports: ImportTable,
    pub(crate) entities: Vec<Entity>,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) scope_index: OnceLock<Vec<(Range, ScopeId)>>,
    pub(crate) line_map: OnceLock<LineMap>,
}

impl FileScope {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn package_qualifiers(&self) -> &[SmolStr] {
        &self.package
    }

    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn top_level_classes(&self) -> impl Iterator<Item = EntityId> + '_ {
        let members = match &self.scope(ScopeId::FILE).kind {
            ScopeKind::File(members) => Some(members),
            _ => None,
        };
        members
            .into_iter()
            .flat_map(|members| members.iter().flat_map(|(_, ids)| ids.iter().copied()))
            .filter(|id| self.entity(*id).kind().is_class_like())
    }

    pub fn top_level_class(&self, name: &str) -> Option<EntityId> {
        self.top_level_classes()
            .find(|id| self.entity(*id).name() == name)
    }

    /// Resolve `Outer.Inner.Deeper` against this file's declarations only.
    pub fn find_nested_class(&self, path: &[SmolStr]) -> Option<EntityId> {
        let (first, rest) = path.split_first()?;
        let mut current = self.top_level_class(first)?;
        for segment in rest {
            let class_scope = self.scope(self.entity(current).child_scope());
            current = match &class_scope.kind {
                ScopeKind::Class { members, .. } => members.inner_class(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Install the position to scope index. Can only happen once.
    pub fn set_scope_index(&self, ranges: Vec<(Range, ScopeId)>) -> Result<()> {
        self.scope_index.set(ranges).map_err(|_| {
            SemanticError::InvalidOperation(format!(
                "scope index of {} already set",
                self.path.display()
            ))
        })
    }

    /// Innermost scope whose range contains `offset`, falling back to the file scope.
    ///
    /// Without an explicitly installed index, one is derived from the scopes' own ranges.
    pub fn scope_at(&self, offset: usize) -> ScopeId {
        let index = self.scope_index.get_or_init(|| self.derive_scope_index());
        index
            .iter()
            .filter(|(range, _)| range.contains(offset))
            .min_by_key(|(range, _)| range.len())
            .map(|(_, id)| *id)
            .unwrap_or(ScopeId::FILE)
    }

    pub fn set_line_map(&self, line_map: LineMap) -> Result<()> {
        self.line_map.set(line_map).map_err(|_| {
            SemanticError::InvalidOperation(format!(
                "line map of {} already set",
                self.path.display()
            ))
        })
    }

    pub fn line_map(&self) -> Option<&LineMap> {
        self.line_map.get()
    }

    /// Same as [`scope_at`](Self::scope_at) for a line/column; needs a line map.
    pub fn scope_at_position(&self, line: usize, col: usize) -> Option<ScopeId> {
        let offset = self.line_map()?.offset(line, col)?;
        Some(self.scope_at(offset))
    }

    fn derive_scope_index(&self) -> Vec<(Range, ScopeId)> {
        self.scopes
            .iter()
            .enumerate()
            .filter(|(_, scope)| {
                matches!(
                    scope.kind,
                    ScopeKind::Block(_) | ScopeKind::Method { .. } | ScopeKind::Class { .. }
                )
            })
            .map(|(i, scope)| (scope.range, ScopeId(i as u32)))
            .collect()
    }
}
