//! Package tree of a module.

use super::{EntityId, FileScope};
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One package segment: its sub-packages and the files declared in it.
#[derive(Debug, Clone, Default)]
pub struct PackageScope {
    qualifiers: Vec<SmolStr>,
    children: BTreeMap<SmolStr, PackageScope>,
    files: IndexMap<PathBuf, Arc<FileScope>>,
}

impl PackageScope {
    pub fn root() -> Self {
        Self::default()
    }

    /// Last segment; `None` for the root package.
    pub fn name(&self) -> Option<&str> {
        self.qualifiers.last().map(SmolStr::as_str)
    }

    /// Full dotted path of this package, one segment per element.
    pub fn qualifiers(&self) -> &[SmolStr] {
        &self.qualifiers
    }

    pub fn is_root(&self) -> bool {
        self.qualifiers.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&PackageScope> {
        self.children.get(name)
    }

    pub fn children(&self) -> impl Iterator<Item = &PackageScope> {
        self.children.values()
    }

    pub fn files(&self) -> impl Iterator<Item = &Arc<FileScope>> {
        self.files.values()
    }

    pub fn has_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.files.is_empty()
    }

    pub fn find(&self, qualifiers: &[SmolStr]) -> Option<&PackageScope> {
        qualifiers
            .iter()
            .try_fold(self, |package, segment| package.child(segment))
    }

    /// Top-level class `name` declared by any file of this package.
    pub fn find_class(&self, name: &str) -> Option<(&Arc<FileScope>, EntityId)> {
        self.files
            .values()
            .find_map(|file| file.top_level_class(name).map(|id| (file, id)))
    }

    /// Register `file` under `package`, creating missing intermediate packages.
    pub(crate) fn add_file(&mut self, package: &[SmolStr], file: Arc<FileScope>) {
        match package.split_first() {
            None => {
                self.files.insert(file.path().to_path_buf(), file);
            }
            Some((segment, rest)) => {
                let qualifiers = &self.qualifiers;
                let child = self.children.entry(segment.clone()).or_insert_with(|| {
                    let mut child_qualifiers = qualifiers.clone();
                    child_qualifiers.push(segment.clone());
                    PackageScope {
                        qualifiers: child_qualifiers,
                        ..PackageScope::default()
                    }
                });
                child.add_file(rest, file);
            }
        }
    }

    /// Unregister the file at `path` from `package` and detach packages left empty.
    ///
    /// Returns whether a file was removed.
    pub(crate) fn remove_file(&mut self, package: &[SmolStr], path: &Path) -> bool {
        match package.split_first() {
            None => self.files.shift_remove(path).is_some(),
            Some((segment, rest)) => {
                let Some(child) = self.children.get_mut(segment.as_str()) else {
                    return false;
                };
                let removed = child.remove_file(rest, path);
                if child.is_empty() {
                    self.children.remove(segment.as_str());
                }
                removed
            }
        }
    }
}
