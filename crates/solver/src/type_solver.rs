//! Resolution of syntactic type references against scopes.

use crate::hierarchy::ClassHierarchy;
use crate::solved::{SolvedEntityType, SolvedType, SolvedTypeParameters};
use javalens_core::builtin::find_builtin_class;
use javalens_core::config::SolverConfig;
use javalens_core::error::{Result, SemanticError};
use javalens_core::model::{
    BoundKind, Entity, EntityKey, EntityKind, EntityRef, FileScope, PackageScope, ScopeKind,
    ScopeRef, TypeArgument, TypeParameter, TypeReference,
};
use javalens_core::Module;
use smol_str::SmolStr;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expansion {
    TypeParameters,
    Supertypes,
}

/// Declarations being expanded further up the call stack.
///
/// Malformed code can make a class its own ancestor or a type parameter its own bound;
/// a declaration already being expanded is not expanded again.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolutionGuard {
    active: Vec<(Expansion, EntityKey)>,
}

impl ResolutionGuard {
    fn guarded<T>(
        &mut self,
        expansion: Expansion,
        entity: EntityRef<'_>,
        expand: impl FnOnce(&mut Self) -> T,
    ) -> Option<T> {
        let key = (expansion, entity.key());
        if self.active.contains(&key) {
            debug!(name = entity.name(), ?expansion, "cyclic declaration, expansion skipped");
            return None;
        }
        self.active.push(key);
        let result = expand(self);
        self.active.pop();
        Some(result)
    }
}

#[derive(Debug, Clone)]
pub struct TypeSolver {
    implicit_import: Vec<SmolStr>,
    object_class: Vec<SmolStr>,
    enum_class: Vec<SmolStr>,
}

impl Default for TypeSolver {
    fn default() -> Self {
        Self::new(&SolverConfig::default())
    }
}

impl TypeSolver {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            implicit_import: segments(&config.implicit_import),
            object_class: segments(&config.object_class),
            enum_class: segments(&config.enum_class),
        }
    }

    /// Solve `type_ref` as written inside `scope`.
    ///
    /// `generic_context` binds the type parameters visible at the reference site; a bound
    /// name hides any class with the same simple name. Unresolvable references give `None`.
    pub fn solve<'m>(
        &self,
        type_ref: &TypeReference,
        generic_context: &SolvedTypeParameters<'m>,
        scope: ScopeRef<'m>,
        module: &'m Module,
    ) -> Option<SolvedType<'m>> {
        let solved = self.solve_guarded(
            type_ref,
            generic_context,
            scope,
            module,
            &mut ResolutionGuard::default(),
        );
        if solved.is_none() {
            trace!(type_ref = %type_ref, "unresolved type reference");
        }
        solved
    }

    pub(crate) fn solve_guarded<'m>(
        &self,
        type_ref: &TypeReference,
        context: &SolvedTypeParameters<'m>,
        scope: ScopeRef<'m>,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> Option<SolvedType<'m>> {
        if type_ref.is_empty() {
            return None;
        }
        let base = if let Some(primitive) = type_ref.as_primitive() {
            SolvedType::Primitive(primitive)
        } else if let Some(bound) = type_variable(type_ref, context) {
            bound.clone()
        } else {
            match self.find_entity_guarded(type_ref.full_name(), scope, module, guard)? {
                EntityRef::Package(package) => SolvedType::Package(package),
                entity if entity.is_class_like() => {
                    let arguments = self.solve_type_arguments(
                        type_ref.type_arguments(),
                        context,
                        scope,
                        module,
                        guard,
                    );
                    SolvedType::Entity(
                        self.class_type_guarded(entity, &arguments, context, module, guard),
                    )
                }
                _ => return None,
            }
        };
        Some(base.array_of(type_ref.array_dimensions()))
    }

    fn solve_type_arguments<'m>(
        &self,
        arguments: &[TypeArgument],
        context: &SolvedTypeParameters<'m>,
        scope: ScopeRef<'m>,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> Vec<Option<SolvedType<'m>>> {
        arguments
            .iter()
            .map(|argument| match argument {
                TypeArgument::Type(type_ref) => {
                    self.solve_guarded(type_ref, context, scope, module, guard)
                }
                TypeArgument::Wildcard(Some(bound)) if bound.kind == BoundKind::Extends => {
                    self.solve_guarded(&bound.bound, context, scope, module, guard)
                }
                // Lower bounds are not tracked: `? super T` and `?` both read as Object.
                TypeArgument::Wildcard(_) => self.object_type(module).map(SolvedType::Entity),
            })
            .collect()
    }

    /// `class` instantiated with `arguments`.
    ///
    /// Parameters are bound outermost declarer first. A parameter takes its supplied
    /// argument, else its first bound, else `Object`. Parameters of enclosing declarers
    /// are taken from `context` when bound there.
    pub fn class_type<'m>(
        &self,
        class: EntityRef<'m>,
        arguments: &[Option<SolvedType<'m>>],
        context: &SolvedTypeParameters<'m>,
        module: &'m Module,
    ) -> SolvedEntityType<'m> {
        self.class_type_guarded(
            class,
            arguments,
            context,
            module,
            &mut ResolutionGuard::default(),
        )
    }

    /// `class` as written without type arguments.
    pub fn declared_type<'m>(&self, class: EntityRef<'m>, module: &'m Module) -> SolvedType<'m> {
        SolvedType::Entity(self.class_type(class, &[], &SolvedTypeParameters::new(), module))
    }

    fn class_type_guarded<'m>(
        &self,
        class: EntityRef<'m>,
        arguments: &[Option<SolvedType<'m>>],
        context: &SolvedTypeParameters<'m>,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> SolvedEntityType<'m> {
        let mut bindings = SolvedTypeParameters::new();
        for declarer in enclosing_declarers(class) {
            for parameter in declarer.type_parameters() {
                let solved = match context.get(&parameter.name) {
                    Some(bound) => Some(bound.clone()),
                    None => self.default_type_parameter(declarer, parameter, &bindings, module, guard),
                };
                if let Some(solved) = solved {
                    bindings.insert(parameter.name.clone(), solved);
                }
            }
        }
        for (index, parameter) in class.type_parameters().iter().enumerate() {
            let supplied = arguments.get(index).cloned().flatten();
            let solved = match supplied {
                Some(solved) => Some(solved),
                None => self.default_type_parameter(class, parameter, &bindings, module, guard),
            };
            if let Some(solved) = solved {
                bindings.insert(parameter.name.clone(), solved);
            }
        }
        SolvedEntityType::new(class, bindings)
    }

    fn default_type_parameter<'m>(
        &self,
        declarer: EntityRef<'m>,
        parameter: &TypeParameter,
        bindings: &SolvedTypeParameters<'m>,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> Option<SolvedType<'m>> {
        let bound = guard
            .guarded(Expansion::TypeParameters, declarer, |guard| {
                let first = parameter.bounds.first()?;
                let scope = declarer.parent_scope().unwrap_or(ScopeRef::Empty);
                self.solve_guarded(first, bindings, scope, module, guard)
            })
            .flatten();
        bound.or_else(|| self.object_type(module).map(SolvedType::Entity))
    }

    /// `receiver` bindings plus `method`'s own type parameters at their defaults.
    pub fn method_type_parameters<'m>(
        &self,
        method: EntityRef<'m>,
        receiver: &SolvedTypeParameters<'m>,
        module: &'m Module,
    ) -> SolvedTypeParameters<'m> {
        let mut bindings = receiver.clone();
        let mut guard = ResolutionGuard::default();
        for parameter in method.type_parameters() {
            if let Some(solved) =
                self.default_type_parameter(method, parameter, &bindings, module, &mut guard)
            {
                bindings.insert(parameter.name.clone(), solved);
            }
        }
        bindings
    }

    /// Type parameters of every class and method enclosing `scope`, at their defaults.
    pub fn scope_type_parameters<'m>(
        &self,
        scope: ScopeRef<'m>,
        module: &'m Module,
    ) -> SolvedTypeParameters<'m> {
        let mut bindings = SolvedTypeParameters::new();
        let Some(owner) = innermost_owner(scope) else {
            return bindings;
        };
        let mut guard = ResolutionGuard::default();
        let mut declarers = enclosing_declarers(owner);
        declarers.push(owner);
        for declarer in declarers {
            for parameter in declarer.type_parameters() {
                if let Some(solved) =
                    self.default_type_parameter(declarer, parameter, &bindings, module, &mut guard)
                {
                    bindings.insert(parameter.name.clone(), solved);
                }
            }
        }
        bindings
    }

    /// Entity named by a possibly qualified name, as seen from `scope`.
    ///
    /// The first segment is looked up through the scope chain; each further segment
    /// descends into the inner classes or sub-packages of what was found.
    pub fn find_entity<'m>(
        &self,
        full_name: &[SmolStr],
        scope: ScopeRef<'m>,
        module: &'m Module,
    ) -> Option<EntityRef<'m>> {
        self.find_entity_guarded(full_name, scope, module, &mut ResolutionGuard::default())
    }

    fn find_entity_guarded<'m>(
        &self,
        full_name: &[SmolStr],
        scope: ScopeRef<'m>,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> Option<EntityRef<'m>> {
        let (first, rest) = full_name.split_first()?;
        let mut current = self.find_class_or_package_guarded(first, scope, module, guard)?;
        for segment in rest {
            current = match current {
                EntityRef::Package(package) => self.find_in_package(package, segment, module)?,
                class if class.is_class_like() => {
                    self.find_inner_class(class, segment, module, guard)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Class or package a simple name denotes at `scope`.
    ///
    /// Search order: local classes, inner classes of enclosing classes and their ancestors,
    /// the file's own types, explicit imports, on-demand imports, the same package, the
    /// module root, and finally the implicitly imported package.
    pub fn find_class_or_package<'m>(
        &self,
        name: &str,
        scope: ScopeRef<'m>,
        module: &'m Module,
    ) -> Option<EntityRef<'m>> {
        self.find_class_or_package_guarded(name, scope, module, &mut ResolutionGuard::default())
    }

    fn find_class_or_package_guarded<'m>(
        &self,
        name: &str,
        scope: ScopeRef<'m>,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> Option<EntityRef<'m>> {
        let mut file = None;
        let mut current = Some(scope);
        while let Some(scope) = current {
            match scope {
                ScopeRef::Local { file: owner, id } => {
                    file = Some(owner);
                    let found = match owner.scope(id).kind() {
                        ScopeKind::Block(_) | ScopeKind::Method { .. } => scope
                            .own_entities(name, None)
                            .into_iter()
                            .find(|entity| entity.is_class_like()),
                        ScopeKind::Class { .. } => scope
                            .owner()
                            .and_then(|class| self.find_inner_class(class, name, module, guard)),
                        ScopeKind::File(_) | ScopeKind::Empty => None,
                    };
                    if found.is_some() {
                        return found;
                    }
                }
                ScopeRef::Package(package) => {
                    if let Some(found) = self.find_in_package(package, name, module) {
                        return Some(found);
                    }
                }
                ScopeRef::Empty => {}
            }
            current = scope.parent();
        }
        file.and_then(|file| self.find_in_file(name, file, module))
            .or_else(|| self.find_global(name, module))
    }

    /// Class named `name` visible at file level: declared here, imported, or in the same package.
    pub fn find_in_file<'m>(
        &self,
        name: &str,
        file: &'m FileScope,
        module: &'m Module,
    ) -> Option<EntityRef<'m>> {
        if let Some(id) = file.top_level_class(name) {
            return Some(EntityRef::declared(file, id));
        }
        let imports = file.imports();
        if let Some(found) = imports
            .class_import(name)
            .and_then(|qualified| self.find_qualified_class(qualified, module))
        {
            return Some(found);
        }
        imports
            .on_demand()
            .iter()
            .map(Vec::as_slice)
            .chain(std::iter::once(file.package_qualifiers()))
            .find_map(|prefix| self.find_qualified_class(&qualified(prefix, name), module))
    }

    /// Default-package class, top-level package, or implicitly imported class.
    pub fn find_global<'m>(&self, name: &str, module: &'m Module) -> Option<EntityRef<'m>> {
        let single = [SmolStr::new(name)];
        module
            .find_class(&single)
            .or_else(|| module.find_package(&single).map(EntityRef::Package))
            .or_else(|| {
                self.find_qualified_class(&qualified(&self.implicit_import, name), module)
            })
    }

    /// Class or sub-package `name` of `package`, across this module and its dependencies.
    pub fn find_in_package<'m>(
        &self,
        package: &'m PackageScope,
        name: &str,
        module: &'m Module,
    ) -> Option<EntityRef<'m>> {
        let qualified = qualified(package.qualifiers(), name);
        self.find_qualified_class(&qualified, module)
            .or_else(|| module.find_package(&qualified).map(EntityRef::Package))
    }

    /// Class by fully qualified name, falling back to the builtin declarations.
    pub fn find_qualified_class<'m>(
        &self,
        qualified_name: &[SmolStr],
        module: &'m Module,
    ) -> Option<EntityRef<'m>> {
        module
            .find_class(qualified_name)
            .or_else(|| find_builtin_class(qualified_name))
    }

    fn find_inner_class<'m>(
        &self,
        class: EntityRef<'m>,
        name: &str,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> Option<EntityRef<'m>> {
        if let Some(inner) = declared_inner_class(class, name) {
            return Some(inner);
        }
        let start = SolvedEntityType::new(class, SolvedTypeParameters::new());
        ClassHierarchy::with_guard(self, start, module, guard.clone())
            .skip(1)
            .find_map(|ancestor| declared_inner_class(ancestor.entity(), name))
    }

    pub fn object_type<'m>(&self, module: &'m Module) -> Option<SolvedEntityType<'m>> {
        self.find_qualified_class(&self.object_class, module)
            .map(|object| SolvedEntityType::new(object, SolvedTypeParameters::new()))
    }

    pub fn is_object(&self, entity: EntityRef<'_>) -> bool {
        entity.is_class_like() && entity.qualified_name() == self.object_class
    }

    /// Lazy breadth-first walk of `class` and its ancestors.
    pub fn class_hierarchy<'s, 'm>(
        &'s self,
        class: &SolvedType<'m>,
        module: &'m Module,
    ) -> Result<ClassHierarchy<'s, 'm>> {
        match class {
            SolvedType::Entity(solved) if solved.entity().is_class_like() => Ok(
                ClassHierarchy::with_guard(self, solved.clone(), module, ResolutionGuard::default()),
            ),
            other => Err(SemanticError::wrong_kind(
                "class-like type",
                other.entity().map_or(EntityKind::Reference, EntityRef::kind),
            )),
        }
    }

    /// Declared superclass with `class`'s bindings substituted.
    ///
    /// Enums without one extend the configured enum class, parameterized by themselves.
    pub fn superclass<'m>(
        &self,
        class: &SolvedEntityType<'m>,
        module: &'m Module,
    ) -> Option<SolvedEntityType<'m>> {
        self.superclass_guarded(class, module, &mut ResolutionGuard::default())
    }

    fn superclass_guarded<'m>(
        &self,
        class: &SolvedEntityType<'m>,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> Option<SolvedEntityType<'m>> {
        let detail = class.entity().entity()?.as_class()?;
        match &detail.superclass {
            Some(superclass) => self.solve_supertype(superclass, class, module, guard),
            None if class.entity().kind() == EntityKind::Enum => {
                let enum_class = self.find_qualified_class(&self.enum_class, module)?;
                let arguments: Vec<_> = enum_class
                    .type_parameters()
                    .iter()
                    .map(|_| Some(SolvedType::Entity(class.clone())))
                    .collect();
                Some(self.class_type_guarded(
                    enum_class,
                    &arguments,
                    &SolvedTypeParameters::new(),
                    module,
                    guard,
                ))
            }
            None => None,
        }
    }

    /// Superclass then interfaces; empty while `class` is already being expanded.
    pub(crate) fn direct_supertypes<'m>(
        &self,
        class: &SolvedEntityType<'m>,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> Vec<SolvedEntityType<'m>> {
        let entity = class.entity();
        let Some(detail) = entity.entity().and_then(Entity::as_class) else {
            return Vec::new();
        };
        guard
            .guarded(Expansion::Supertypes, entity, |guard| {
                let mut supertypes: Vec<_> =
                    self.superclass_guarded(class, module, guard).into_iter().collect();
                for interface in &detail.interfaces {
                    supertypes.extend(self.solve_supertype(interface, class, module, guard));
                }
                supertypes
            })
            .unwrap_or_default()
    }

    /// Supertypes are written in the scope enclosing the class, with its own
    /// type parameters in effect.
    fn solve_supertype<'m>(
        &self,
        type_ref: &TypeReference,
        class: &SolvedEntityType<'m>,
        module: &'m Module,
        guard: &mut ResolutionGuard,
    ) -> Option<SolvedEntityType<'m>> {
        let scope = class.entity().parent_scope().unwrap_or(ScopeRef::Empty);
        match self.solve_guarded(type_ref, class.type_parameters(), scope, module, guard) {
            Some(SolvedType::Entity(solved)) => Some(solved),
            _ => {
                trace!(
                    class = class.entity().name(),
                    supertype = %type_ref,
                    "unresolved supertype"
                );
                None
            }
        }
    }
}

fn segments(names: &[String]) -> Vec<SmolStr> {
    names.iter().map(SmolStr::new).collect()
}

fn type_variable<'a, 'm>(
    type_ref: &TypeReference,
    context: &'a SolvedTypeParameters<'m>,
) -> Option<&'a SolvedType<'m>> {
    match type_ref.full_name() {
        [name] => context.get(name),
        _ => None,
    }
}

fn qualified(prefix: &[SmolStr], name: &str) -> Vec<SmolStr> {
    let mut qualified = prefix.to_vec();
    qualified.push(SmolStr::new(name));
    qualified
}

fn declared_inner_class<'m>(class: EntityRef<'m>, name: &str) -> Option<EntityRef<'m>> {
    let file = class.file()?;
    class
        .class_members()?
        .inner_class(name)
        .map(|id| EntityRef::declared(file, id))
}

/// Classes and methods enclosing `entity` whose type parameters it can see,
/// outermost first. Nothing outside a static member is visible.
fn enclosing_declarers(entity: EntityRef<'_>) -> Vec<EntityRef<'_>> {
    let mut declarers = Vec::new();
    let mut inner = entity;
    let mut scope = entity.parent_scope();
    while let Some(current) = scope {
        if inner.is_static() {
            break;
        }
        if let Some(owner) = current.owner() {
            declarers.push(owner);
            inner = owner;
        }
        scope = current.parent();
    }
    declarers.reverse();
    declarers
}

fn innermost_owner(scope: ScopeRef<'_>) -> Option<EntityRef<'_>> {
    let mut current = Some(scope);
    while let Some(scope) = current {
        if let Some(owner) = scope.owner() {
            return Some(owner);
        }
        current = scope.parent();
    }
    None
}
