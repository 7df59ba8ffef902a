//! Member lookup on solved types.

use crate::hierarchy::ClassHierarchy;
use crate::overload::OverloadSolver;
use crate::solved::{SolvedEntityType, SolvedType, SolvedTypeParameters};
use crate::type_solver::TypeSolver;
use javalens_core::error::Result;
use javalens_core::model::{EntityRef, PrimitiveType};
use javalens_core::{Module, ShadowingListBuilder};

/// A member together with the type-parameter bindings its declared type is read with:
/// those of the class it was found in, or of the scope a local lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberMatch<'m> {
    entity: EntityRef<'m>,
    type_parameters: SolvedTypeParameters<'m>,
}

impl<'m> MemberMatch<'m> {
    pub fn new(entity: EntityRef<'m>, type_parameters: SolvedTypeParameters<'m>) -> Self {
        Self {
            entity,
            type_parameters,
        }
    }

    pub fn entity(&self) -> EntityRef<'m> {
        self.entity
    }

    pub fn type_parameters(&self) -> &SolvedTypeParameters<'m> {
        &self.type_parameters
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemberSolver {
    type_solver: TypeSolver,
    overload_solver: OverloadSolver,
}

impl MemberSolver {
    pub fn new(type_solver: TypeSolver) -> Self {
        Self {
            overload_solver: OverloadSolver::new(type_solver.clone()),
            type_solver,
        }
    }

    /// Field or inner class `name` of `base`, most derived declaration first.
    ///
    /// `this` on a class is the class itself (`Outer.this`), `length` on an array is an
    /// `int`, and on a package `name` is a sub-package or class.
    pub fn find_non_method_member<'m>(
        &self,
        name: &str,
        base: &SolvedType<'m>,
        module: &'m Module,
    ) -> Result<Option<MemberMatch<'m>>> {
        match base {
            SolvedType::Array(_) => Ok((name == "length").then(|| {
                MemberMatch::new(
                    EntityRef::Primitive(PrimitiveType::Int),
                    SolvedTypeParameters::new(),
                )
            })),
            SolvedType::Entity(class) if name == "this" => Ok(Some(MemberMatch::new(
                class.entity(),
                class.type_parameters().clone(),
            ))),
            SolvedType::Entity(_) => {
                for ancestor in self.type_solver.class_hierarchy(base, module)? {
                    if let Some(member) = declared_field_or_class(ancestor.entity(), name) {
                        return Ok(Some(MemberMatch::new(
                            member,
                            ancestor.type_parameters().clone(),
                        )));
                    }
                }
                Ok(None)
            }
            SolvedType::Package(package) => Ok(self
                .type_solver
                .find_in_package(package, name, module)
                .map(|entity| MemberMatch::new(entity, SolvedTypeParameters::new()))),
            SolvedType::Primitive(_) | SolvedType::Null => Ok(None),
        }
    }

    /// Every method named `name` across the hierarchy of `base`, most derived first.
    /// Arrays have the methods of `Object`.
    pub fn find_methods<'m>(
        &self,
        name: &str,
        base: &SolvedType<'m>,
        module: &'m Module,
    ) -> Result<Vec<MemberMatch<'m>>> {
        let Some(hierarchy) = self.member_hierarchy(base, module)? else {
            return Ok(Vec::new());
        };
        Ok(hierarchy
            .flat_map(|ancestor| declared_methods(&ancestor, name))
            .collect())
    }

    /// The overload of `name` on `base` best matching `arguments`.
    pub fn find_method_member<'m>(
        &self,
        name: &str,
        base: &SolvedType<'m>,
        arguments: &[Option<SolvedType<'m>>],
        module: &'m Module,
    ) -> Result<Option<MemberMatch<'m>>> {
        let candidates = self.find_methods(name, base, module)?;
        if candidates.is_empty() {
            return Ok(None);
        }
        self.overload_solver
            .solve(&candidates, arguments, module)
            .map(Some)
    }

    /// Members of `base` for completion, most derived first. Fields and inner classes are
    /// shadowed by name; every overload is kept.
    pub fn members<'m>(
        &self,
        base: &SolvedType<'m>,
        module: &'m Module,
    ) -> Result<Vec<EntityRef<'m>>> {
        let mut builder = ShadowingListBuilder::new();
        if let SolvedType::Package(package) = base {
            builder.add_all(EntityRef::Package(*package).child_scope().own_members(None));
            return Ok(builder.build());
        }
        if let Some(hierarchy) = self.member_hierarchy(base, module)? {
            for ancestor in hierarchy {
                builder.add_all(ancestor.entity().child_scope().own_members(None));
            }
        }
        Ok(builder.build())
    }

    /// Classes searched for members of `base`; arrays search `Object`.
    fn member_hierarchy<'s, 'm>(
        &'s self,
        base: &SolvedType<'m>,
        module: &'m Module,
    ) -> Result<Option<ClassHierarchy<'s, 'm>>> {
        match base {
            SolvedType::Entity(_) => self.type_solver.class_hierarchy(base, module).map(Some),
            SolvedType::Array(_) => match self.type_solver.object_type(module) {
                Some(object) => self
                    .type_solver
                    .class_hierarchy(&SolvedType::Entity(object), module)
                    .map(Some),
                None => Ok(None),
            },
            SolvedType::Package(_) | SolvedType::Primitive(_) | SolvedType::Null => Ok(None),
        }
    }
}

fn declared_field_or_class<'m>(class: EntityRef<'m>, name: &str) -> Option<EntityRef<'m>> {
    let file = class.file()?;
    let members = class.class_members()?;
    members
        .field(name)
        .or_else(|| members.inner_class(name))
        .map(|id| EntityRef::declared(file, id))
}

fn declared_methods<'m>(ancestor: &SolvedEntityType<'m>, name: &str) -> Vec<MemberMatch<'m>> {
    let entity = ancestor.entity();
    let (Some(file), Some(members)) = (entity.file(), entity.class_members()) else {
        return Vec::new();
    };
    members
        .methods(name)
        .iter()
        .map(|id| MemberMatch::new(EntityRef::declared(file, *id), ancestor.type_parameters().clone()))
        .collect()
}
