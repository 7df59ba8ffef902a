//! Copy-on-write access to a module shared between queries and one writer.

use crate::error::{Result, SemanticError};
use crate::model::FileScope;
use crate::module::Module;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Queries take an `Arc<Module>` snapshot and never see a half-applied mutation.
/// Writers are serialized by the lock and publish a new version in place, cloning
/// only when a snapshot is still alive.
#[derive(Debug, Default)]
pub struct ModuleHandle {
    current: RwLock<Arc<Module>>,
}

impl ModuleHandle {
    pub fn new(module: Module) -> Self {
        Self {
            current: RwLock::new(Arc::new(module)),
        }
    }

    pub fn snapshot(&self) -> Result<Arc<Module>> {
        let current = self.current.read().map_err(|_| SemanticError::Poisoned)?;
        Ok(Arc::clone(&current))
    }

    pub fn update<R>(&self, mutate: impl FnOnce(&mut Module) -> R) -> Result<R> {
        let mut current = self.current.write().map_err(|_| SemanticError::Poisoned)?;
        let module = Arc::make_mut(&mut current);
        Ok(mutate(module))
    }

    pub fn add_or_replace_file_scope(
        &self,
        file: impl Into<Arc<FileScope>>,
    ) -> Result<Option<Arc<FileScope>>> {
        let file = file.into();
        self.update(|module| module.add_or_replace_file_scope(file))
    }

    pub fn remove_file(&self, path: &Path) -> Result<Option<Arc<FileScope>>> {
        self.update(|module| module.remove_file(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityKind, FileScopeBuilder, Range, ScopeId};
    use smol_str::SmolStr;

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let handle = ModuleHandle::new(Module::new("app"));
        let before = handle.snapshot().unwrap();

        let mut builder = FileScopeBuilder::new("A.java", &["p"]);
        builder
            .add_class(ScopeId::FILE, "A", EntityKind::Class, Range::new(0, 1))
            .unwrap();
        handle.add_or_replace_file_scope(builder.build()).unwrap();

        let after = handle.snapshot().unwrap();
        let name = [SmolStr::new("p"), SmolStr::new("A")];
        assert!(before.find_class(&name).is_none());
        assert!(after.find_class(&name).is_some());
        assert_eq!(after.version(), before.version() + 1);
    }
}
