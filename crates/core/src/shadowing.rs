//! Name-based dedup when merging entities visible from several layers.

use crate::model::EntityRef;
use smol_str::SmolStr;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowGroup {
    Method,
    NonMethod,
}

pub trait Shadowable {
    fn shadow_name(&self) -> &str;
    fn shadow_group(&self) -> ShadowGroup;
}

impl Shadowable for EntityRef<'_> {
    fn shadow_name(&self) -> &str {
        self.name()
    }

    fn shadow_group(&self) -> ShadowGroup {
        if self.is_method() {
            ShadowGroup::Method
        } else {
            ShadowGroup::NonMethod
        }
    }
}

/// Keeps the first non-method seen for each name and every distinct method.
///
/// Methods and non-methods never shadow each other. Same-named methods are kept as
/// siblings, since a method only shadows another it overrides and overriding is not
/// tracked. The same method reached twice is kept once.
#[derive(Debug)]
pub struct ShadowingListBuilder<T> {
    items: Vec<T>,
    seen: HashSet<(ShadowGroup, SmolStr)>,
}

impl<T> Default for ShadowingListBuilder<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T: Shadowable + PartialEq> ShadowingListBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the item was kept.
    pub fn add(&mut self, item: T) -> bool {
        let key = (item.shadow_group(), SmolStr::new(item.shadow_name()));
        let shadowed = match key.0 {
            ShadowGroup::NonMethod => !self.seen.insert(key),
            ShadowGroup::Method => !self.seen.insert(key) && self.items.contains(&item),
        };
        if shadowed {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) -> &mut Self {
        for item in items {
            self.add(item);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn build(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityKind, FileScopeBuilder, Range, ScopeId, TypeReference};
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    struct Named(&'static str, ShadowGroup);

    impl Shadowable for Named {
        fn shadow_name(&self) -> &str {
            self.0
        }
        fn shadow_group(&self) -> ShadowGroup {
            self.1
        }
    }

    #[test]
    fn test_groups_are_exclusive() {
        let mut builder = ShadowingListBuilder::new();
        assert!(builder.add(Named("size", ShadowGroup::Method)));
        assert!(!builder.add(Named("size", ShadowGroup::Method)));
        assert!(builder.add(Named("size", ShadowGroup::NonMethod)));
        assert!(!builder.add(Named("size", ShadowGroup::NonMethod)));
        assert_eq!(
            builder.build(),
            vec![
                Named("size", ShadowGroup::Method),
                Named("size", ShadowGroup::NonMethod)
            ]
        );
    }

    #[test]
    fn test_entity_refs_dedup_by_kind() {
        let int = || TypeReference::named(["int"]);
        let mut file = FileScopeBuilder::new("A.java", &[]);
        let a = file
            .add_class(ScopeId::FILE, "A", EntityKind::Class, Range::new(0, 100))
            .unwrap();
        let b = file
            .add_class(ScopeId::FILE, "B", EntityKind::Class, Range::new(101, 200))
            .unwrap();
        let method = file.add_method(a, "count", int(), Range::new(1, 5)).unwrap();
        let field_a = file.add_field(a, "count", int(), Range::new(6, 9)).unwrap();
        let field_b = file.add_field(b, "count", int(), Range::new(102, 110)).unwrap();
        let file = file.build();

        let kept = ShadowingListBuilder::new()
            .add_all([
                EntityRef::declared(&file, method),
                EntityRef::declared(&file, field_a),
                EntityRef::declared(&file, field_b),
            ])
            .len();
        assert_eq!(kept, 2);

        let mut builder = ShadowingListBuilder::new();
        builder.add(EntityRef::declared(&file, field_b));
        builder.add(EntityRef::declared(&file, field_a));
        assert_eq!(builder.build(), vec![EntityRef::declared(&file, field_b)]);
    }

    #[test]
    fn test_overloads_are_kept_as_siblings() {
        let int = || TypeReference::named(["int"]);
        let mut file = FileScopeBuilder::new("A.java", &[]);
        let a = file
            .add_class(ScopeId::FILE, "A", EntityKind::Class, Range::new(0, 100))
            .unwrap();
        let nullary = file.add_method(a, "f", int(), Range::new(1, 10)).unwrap();
        let unary = file.add_method(a, "f", int(), Range::new(11, 20)).unwrap();
        file.add_parameter(unary, "x", int(), Range::new(13, 18)).unwrap();
        let file = file.build();

        let mut builder = ShadowingListBuilder::new();
        builder.add_all([
            EntityRef::declared(&file, nullary),
            EntityRef::declared(&file, unary),
            EntityRef::declared(&file, nullary),
        ]);
        assert_eq!(
            builder.build(),
            vec![
                EntityRef::declared(&file, nullary),
                EntityRef::declared(&file, unary)
            ]
        );
    }
}
