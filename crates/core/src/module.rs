//! Whole-project container: files, the package tree and the global name index.

use crate::model::{EntityRef, FileScope, PackageScope};
use smol_str::SmolStr;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    version: u64,
    files: HashMap<PathBuf, Arc<FileScope>>,
    /// Dotted top-level class name to every file declaring it, oldest first
    global_names: HashMap<String, Vec<Arc<FileScope>>>,
    root_package: PackageScope,
    depending: Vec<Arc<Module>>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bumped by every structural mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn root_package(&self) -> &PackageScope {
        &self.root_package
    }

    pub fn file_scope(&self, path: &Path) -> Option<&Arc<FileScope>> {
        self.files.get(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &Arc<FileScope>> {
        self.files.values()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn add_depending_module(&mut self, module: Arc<Module>) {
        self.depending.push(module);
    }

    pub fn depending_modules(&self) -> &[Arc<Module>] {
        &self.depending
    }

    /// Insert a file, replacing any file previously registered under the same path.
    ///
    /// The new file joins its package before the old one leaves, so a package shared by
    /// both is never empty in between. Returns the replaced file.
    pub fn add_or_replace_file_scope(
        &mut self,
        file: impl Into<Arc<FileScope>>,
    ) -> Option<Arc<FileScope>> {
        let file = file.into();
        let path = file.path().to_path_buf();

        self.root_package
            .add_file(file.package_qualifiers(), file.clone());
        let old = self.files.insert(path.clone(), file.clone());

        if let Some(old) = &old {
            if old.package_qualifiers() != file.package_qualifiers() {
                self.root_package
                    .remove_file(old.package_qualifiers(), &path);
            }
            self.unindex_names(old);
        }
        self.index_names(&file);
        self.version += 1;

        debug!(
            module = %self.name,
            path = %path.display(),
            replaced = old.is_some(),
            "file scope registered"
        );
        old
    }

    /// Drop a file and prune packages it leaves empty.
    pub fn remove_file(&mut self, path: &Path) -> Option<Arc<FileScope>> {
        let old = self.files.remove(path)?;
        self.root_package
            .remove_file(old.package_qualifiers(), path);
        self.unindex_names(&old);
        self.version += 1;
        debug!(module = %self.name, path = %path.display(), "file scope removed");
        Some(old)
    }

    /// This module followed by every module it depends on, transitively, each once.
    pub fn modules(&self) -> Vec<&Module> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        let mut stack = vec![self];
        while let Some(module) = stack.pop() {
            if !seen.insert(module as *const Module) {
                continue;
            }
            ordered.push(module);
            stack.extend(module.depending.iter().rev().map(Arc::as_ref));
        }
        ordered
    }

    /// Class with the given fully qualified name, nested classes included.
    pub fn find_class(&self, qualified_name: &[SmolStr]) -> Option<EntityRef<'_>> {
        self.modules()
            .into_iter()
            .find_map(|module| module.find_own_class(qualified_name))
    }

    /// First package with this path in this module or its dependencies.
    pub fn find_package(&self, qualifiers: &[SmolStr]) -> Option<&PackageScope> {
        self.modules()
            .into_iter()
            .find_map(|module| module.root_package.find(qualifiers))
    }

    fn find_own_class(&self, qualified_name: &[SmolStr]) -> Option<EntityRef<'_>> {
        // Longest declared top-level prefix first; the rest are inner classes.
        for split in (1..=qualified_name.len()).rev() {
            let key = join(&qualified_name[..split]);
            let Some(owners) = self.global_names.get(&key) else {
                continue;
            };
            // Duplicate declarations: the latest file wins.
            let file = owners.last()?;
            let id = file.find_nested_class(&qualified_name[split - 1..])?;
            return Some(EntityRef::declared(file.as_ref(), id));
        }
        None
    }

    fn index_names(&mut self, file: &Arc<FileScope>) {
        for id in file.top_level_classes() {
            let entity = file.entity(id);
            self.global_names
                .entry(join(&entity.qualified_name()))
                .or_default()
                .push(file.clone());
        }
    }

    fn unindex_names(&mut self, file: &Arc<FileScope>) {
        self.global_names.retain(|_, owners| {
            owners.retain(|owner| !Arc::ptr_eq(owner, file));
            !owners.is_empty()
        });
    }
}

fn join(segments: &[SmolStr]) -> String {
    segments
        .iter()
        .map(SmolStr::as_str)
        .collect::<Vec<_>>()
        .join(".")
}
