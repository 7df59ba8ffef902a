//! Breadth-first walk over a class and its ancestors.

use crate::solved::SolvedEntityType;
use crate::type_solver::{ResolutionGuard, TypeSolver};
use javalens_core::model::EntityKey;
use javalens_core::Module;
use std::collections::{HashSet, VecDeque};
use std::iter::FusedIterator;
use tracing::trace;

/// Yields the class itself, then its superclass, then its interfaces, level by level,
/// with type arguments substituted at every step.
///
/// Each ancestor is yielded at most once, so cyclic declarations terminate. The
/// configured `Object` class always comes last, synthesized if no declared path reaches
/// it. Supertypes are solved lazily, one class per call to `next`.
pub struct ClassHierarchy<'s, 'm> {
    solver: &'s TypeSolver,
    module: &'m Module,
    queue: VecDeque<SolvedEntityType<'m>>,
    visited: HashSet<EntityKey>,
    guard: ResolutionGuard,
    root_pending: bool,
}

impl<'s, 'm> ClassHierarchy<'s, 'm> {
    pub(crate) fn with_guard(
        solver: &'s TypeSolver,
        start: SolvedEntityType<'m>,
        module: &'m Module,
        guard: ResolutionGuard,
    ) -> Self {
        Self {
            solver,
            module,
            queue: VecDeque::from([start]),
            visited: HashSet::new(),
            guard,
            root_pending: true,
        }
    }
}

impl<'m> Iterator for ClassHierarchy<'_, 'm> {
    type Item = SolvedEntityType<'m>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(class) = self.queue.pop_front() {
            if !self.visited.insert(class.entity().key()) {
                trace!(name = class.entity().name(), "ancestor already visited");
                continue;
            }
            let supertypes = self
                .solver
                .direct_supertypes(&class, self.module, &mut self.guard);
            self.queue.extend(
                supertypes
                    .into_iter()
                    .filter(|supertype| !self.visited.contains(&supertype.entity().key())),
            );
            return Some(class);
        }

        if std::mem::take(&mut self.root_pending) {
            let root = self.solver.object_type(self.module)?;
            if self.visited.insert(root.entity().key()) {
                return Some(root);
            }
        }
        None
    }
}

impl FusedIterator for ClassHierarchy<'_, '_> {}
