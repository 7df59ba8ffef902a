//! Static types of expressions and the entities they refer to.

use crate::member::{MemberMatch, MemberSolver};
use crate::overload::OverloadSolver;
use crate::solved::{SolvedEntityType, SolvedType, SolvedTypeParameters};
use crate::type_solver::TypeSolver;
use javalens_core::config::SolverConfig;
use javalens_core::error::Result;
use javalens_core::model::{
    BinaryOp, EntityRef, Expr, FileScope, Literal, PrimitiveType, ScopeKind, ScopeRef,
    TypeReference, UnaryOp,
};
use javalens_core::Module;
use smol_str::SmolStr;

const STRING_CLASS: [&str; 3] = ["java", "lang", "String"];

/// Where an expression is being solved.
#[derive(Clone, Copy)]
struct Site<'m> {
    module: &'m Module,
    scope: ScopeRef<'m>,
    /// Locals declared after this offset are invisible; `None` sees them all.
    position: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ExpressionSolver {
    type_solver: TypeSolver,
    member_solver: MemberSolver,
    overload_solver: OverloadSolver,
    filter_locals_by_position: bool,
}

impl Default for ExpressionSolver {
    fn default() -> Self {
        Self::new(&SolverConfig::default())
    }
}

impl ExpressionSolver {
    pub fn new(config: &SolverConfig) -> Self {
        let type_solver = TypeSolver::new(config);
        Self {
            member_solver: MemberSolver::new(type_solver.clone()),
            overload_solver: OverloadSolver::new(type_solver.clone()),
            type_solver,
            filter_locals_by_position: config.filter_locals_by_position,
        }
    }

    /// Static type of `expr` written inside `scope` at `position`.
    ///
    /// Anything that cannot be resolved yields `Ok(None)`; errors are reserved for
    /// inconsistent models.
    pub fn solve<'m>(
        &self,
        expr: &Expr,
        module: &'m Module,
        scope: ScopeRef<'m>,
        position: Option<usize>,
    ) -> Result<Option<SolvedType<'m>>> {
        self.solve_expr(expr, self.site(module, scope, position))
    }

    /// Entities `expr` refers to. For a method call every same-named candidate is
    /// returned, the best overload first.
    pub fn solve_definitions<'m>(
        &self,
        expr: &Expr,
        module: &'m Module,
        scope: ScopeRef<'m>,
        position: Option<usize>,
    ) -> Result<Vec<EntityRef<'m>>> {
        self.definitions(expr, self.site(module, scope, position))
    }

    /// Type of the entity a member match refers to; `None` for methods.
    pub fn entity_type<'m>(
        &self,
        member: &MemberMatch<'m>,
        module: &'m Module,
    ) -> Option<SolvedType<'m>> {
        let entity = member.entity();
        match entity {
            EntityRef::Primitive(primitive) => Some(SolvedType::Primitive(primitive)),
            EntityRef::Package(package) => Some(SolvedType::Package(package)),
            EntityRef::Null => Some(SolvedType::Null),
            EntityRef::Declared { .. } if entity.is_class_like() => Some(SolvedType::Entity(
                self.type_solver
                    .class_type(entity, &[], member.type_parameters(), module),
            )),
            EntityRef::Declared { .. } => {
                let type_ref = entity.variable_type()?;
                let scope = entity.parent_scope()?;
                self.type_solver
                    .solve(type_ref, member.type_parameters(), scope, module)
            }
        }
    }

    fn site<'m>(
        &self,
        module: &'m Module,
        scope: ScopeRef<'m>,
        position: Option<usize>,
    ) -> Site<'m> {
        Site {
            module,
            scope,
            position: position.filter(|_| self.filter_locals_by_position),
        }
    }

    fn solve_expr<'m>(&self, expr: &Expr, site: Site<'m>) -> Result<Option<SolvedType<'m>>> {
        match expr {
            Expr::Identifier(name) => self.solve_identifier(name, site),
            Expr::MemberSelect { target, name } => {
                let Some(base) = self.solve_expr(target, site)? else {
                    return Ok(None);
                };
                let member = self
                    .member_solver
                    .find_non_method_member(name, &base, site.module)?;
                Ok(member.and_then(|member| self.entity_type(&member, site.module)))
            }
            Expr::MethodInvocation { target, arguments } => {
                let method = self.invoked_method(target, arguments, site)?;
                Ok(method.and_then(|method| self.return_type(&method, site.module)))
            }
            Expr::ArrayAccess { array, .. } => Ok(self
                .solve_expr(array, site)?
                .and_then(|array| array.element_type().cloned())),
            Expr::Literal(literal) => Ok(self.literal_type(literal, site.module)),
            Expr::Parenthesized(inner) => self.solve_expr(inner, site),
            Expr::Cast { ty, .. } | Expr::NewClass { ty, .. } => Ok(self.solve_type(ty, site)),
            Expr::NewArray {
                element,
                dimensions,
            } => Ok(self
                .solve_type(element, site)
                .map(|element| element.array_of(*dimensions))),
            Expr::Conditional {
                then_branch,
                else_branch,
                ..
            } => match self.solve_expr(then_branch, site)? {
                Some(solved) if !solved.is_null() => Ok(Some(solved)),
                then_type => Ok(self.solve_expr(else_branch, site)?.or(then_type)),
            },
            Expr::Unary { op, operand } => self.solve_unary(*op, operand, site),
            Expr::Binary { op, left, right } => self.solve_binary(*op, left, right, site),
            Expr::Erroneous => Ok(None),
        }
    }

    fn solve_type<'m>(&self, type_ref: &TypeReference, site: Site<'m>) -> Option<SolvedType<'m>> {
        let context = self
            .type_solver
            .scope_type_parameters(site.scope, site.module);
        self.type_solver
            .solve(type_ref, &context, site.scope, site.module)
    }

    fn solve_identifier<'m>(&self, name: &str, site: Site<'m>) -> Result<Option<SolvedType<'m>>> {
        match name {
            "this" => Ok(self.this_type(site).map(SolvedType::Entity)),
            "super" => Ok(self.this_type(site).and_then(|this| {
                self.type_solver
                    .superclass(&this, site.module)
                    .or_else(|| self.type_solver.object_type(site.module))
                    .map(SolvedType::Entity)
            })),
            _ => Ok(self
                .find_identifier(name, site)?
                .and_then(|member| self.entity_type(&member, site.module))),
        }
    }

    /// Nearest enclosing class with the type parameters in effect at the site.
    fn this_type<'m>(&self, site: Site<'m>) -> Option<SolvedEntityType<'m>> {
        let class = site.scope.enclosing_class()?;
        let context = self
            .type_solver
            .scope_type_parameters(site.scope, site.module);
        Some(
            self.type_solver
                .class_type(class, &[], &context, site.module),
        )
    }

    /// Non-method entity a simple name denotes: locals, members of enclosing classes,
    /// static imports, file-level classes, then packages and implicit imports.
    fn find_identifier<'m>(&self, name: &str, site: Site<'m>) -> Result<Option<MemberMatch<'m>>> {
        let module = site.module;
        let mut file = None;
        let mut current = Some(site.scope);
        while let Some(scope) = current {
            file = file.or(scope.file());
            match scope.data().map(|data| data.kind()) {
                Some(ScopeKind::Block(_) | ScopeKind::Method { .. }) => {
                    if let Some(local) = scope
                        .own_entities(name, site.position)
                        .into_iter()
                        .find(|entity| !entity.is_method())
                    {
                        let context = self.type_solver.scope_type_parameters(scope, module);
                        return Ok(Some(MemberMatch::new(local, context)));
                    }
                }
                Some(ScopeKind::Class { .. }) => {
                    if let Some(class) = scope.owner() {
                        let class_type = self.type_solver.declared_type(class, module);
                        if let Some(member) =
                            self.member_solver
                                .find_non_method_member(name, &class_type, module)?
                        {
                            return Ok(Some(member));
                        }
                    }
                }
                _ => {}
            }
            current = scope.parent();
        }

        if let Some(file) = file {
            for class_type in self.static_import_classes(name, file, module) {
                if let Some(member) =
                    self.member_solver
                        .find_non_method_member(name, &class_type, module)?
                {
                    return Ok(Some(member));
                }
            }
            if let Some(class) = self.type_solver.find_in_file(name, file, module) {
                return Ok(Some(MemberMatch::new(class, SolvedTypeParameters::new())));
            }
        }
        Ok(self
            .type_solver
            .find_global(name, module)
            .map(|entity| MemberMatch::new(entity, SolvedTypeParameters::new())))
    }

    /// Classes a static import of `name` may bring members from, single imports first.
    fn static_import_classes<'m>(
        &self,
        name: &str,
        file: &'m FileScope,
        module: &'m Module,
    ) -> Vec<SolvedType<'m>> {
        let imports = file.imports();
        imports
            .static_import(name)
            .into_iter()
            .chain(imports.static_on_demand().iter().map(Vec::as_slice))
            .filter_map(|class| self.type_solver.find_qualified_class(class, module))
            .map(|class| self.type_solver.declared_type(class, module))
            .collect()
    }

    fn solve_arguments<'m>(
        &self,
        arguments: &[Expr],
        site: Site<'m>,
    ) -> Result<Vec<Option<SolvedType<'m>>>> {
        arguments
            .iter()
            .map(|argument| self.solve_expr(argument, site))
            .collect()
    }

    fn invoked_method<'m>(
        &self,
        target: &Expr,
        arguments: &[Expr],
        site: Site<'m>,
    ) -> Result<Option<MemberMatch<'m>>> {
        let argument_types = self.solve_arguments(arguments, site)?;
        let candidates = self.method_candidates(target, site)?;
        if candidates.is_empty() {
            return Ok(None);
        }
        self.overload_solver
            .solve(&candidates, &argument_types, site.module)
            .map(Some)
    }

    fn method_candidates<'m>(&self, target: &Expr, site: Site<'m>) -> Result<Vec<MemberMatch<'m>>> {
        match target {
            Expr::Identifier(name) => self.methods_in_scope(name, site),
            Expr::MemberSelect { target, name } => match self.solve_expr(target, site)? {
                Some(base) => self.member_solver.find_methods(name, &base, site.module),
                None => Ok(Vec::new()),
            },
            Expr::Parenthesized(inner) => self.method_candidates(inner, site),
            _ => Ok(Vec::new()),
        }
    }

    /// Methods named `name` of the innermost enclosing class declaring or inheriting
    /// any, else those brought in by static imports.
    fn methods_in_scope<'m>(&self, name: &str, site: Site<'m>) -> Result<Vec<MemberMatch<'m>>> {
        let module = site.module;
        let mut file = None;
        let mut current = Some(site.scope);
        while let Some(scope) = current {
            file = file.or(scope.file());
            if let Some(class) = scope.owner().filter(|owner| owner.is_class_like()) {
                let class_type = self.type_solver.declared_type(class, module);
                let methods = self.member_solver.find_methods(name, &class_type, module)?;
                if !methods.is_empty() {
                    return Ok(methods);
                }
            }
            current = scope.parent();
        }

        let mut methods = Vec::new();
        if let Some(file) = file {
            for class_type in self.static_import_classes(name, file, module) {
                methods.extend(self.member_solver.find_methods(name, &class_type, module)?);
            }
        }
        Ok(methods)
    }

    /// Declared return type read with the receiver's bindings and the method's own
    /// type parameters.
    fn return_type<'m>(&self, method: &MemberMatch<'m>, module: &'m Module) -> Option<SolvedType<'m>> {
        let entity = method.entity();
        let return_type = entity.return_type()?;
        let context =
            self.type_solver
                .method_type_parameters(entity, method.type_parameters(), module);
        let scope = entity.parent_scope().unwrap_or(ScopeRef::Empty);
        self.type_solver.solve(return_type, &context, scope, module)
    }

    fn literal_type<'m>(&self, literal: &Literal, module: &'m Module) -> Option<SolvedType<'m>> {
        let primitive = match literal {
            Literal::Int => PrimitiveType::Int,
            Literal::Long => PrimitiveType::Long,
            Literal::Float => PrimitiveType::Float,
            Literal::Double => PrimitiveType::Double,
            Literal::Char => PrimitiveType::Char,
            Literal::Boolean => PrimitiveType::Boolean,
            Literal::String => return self.string_type(module),
            Literal::Null => return Some(SolvedType::Null),
        };
        Some(SolvedType::Primitive(primitive))
    }

    fn string_type<'m>(&self, module: &'m Module) -> Option<SolvedType<'m>> {
        let name: Vec<SmolStr> = STRING_CLASS.into_iter().map(SmolStr::new).collect();
        self.type_solver
            .find_qualified_class(&name, module)
            .map(|string| self.type_solver.declared_type(string, module))
    }

    fn solve_unary<'m>(
        &self,
        op: UnaryOp,
        operand: &Expr,
        site: Site<'m>,
    ) -> Result<Option<SolvedType<'m>>> {
        let operand = self.solve_expr(operand, site)?;
        Ok(match op {
            UnaryOp::Not => Some(SolvedType::Primitive(PrimitiveType::Boolean)),
            UnaryOp::Increment | UnaryOp::Decrement => operand,
            UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitNot => operand
                .as_ref()
                .and_then(numeric)
                .and_then(|primitive| primitive.promote(PrimitiveType::Int))
                .map(SolvedType::Primitive),
        })
    }

    fn solve_binary<'m>(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        site: Site<'m>,
    ) -> Result<Option<SolvedType<'m>>> {
        let left = self.solve_expr(left, site)?;
        let right = self.solve_expr(right, site)?;
        if op.yields_boolean() {
            return Ok(Some(SolvedType::Primitive(PrimitiveType::Boolean)));
        }
        if op == BinaryOp::Add {
            if let Some(string) = [&left, &right]
                .into_iter()
                .flatten()
                .find(|operand| is_string(operand))
            {
                return Ok(Some(string.clone()));
            }
        }

        let Some(left) = left.as_ref().and_then(numeric) else {
            return Ok(None);
        };
        if op.is_shift() {
            return Ok(left.promote(PrimitiveType::Int).map(SolvedType::Primitive));
        }
        let Some(right) = right.as_ref().and_then(numeric) else {
            return Ok(None);
        };
        let solved = if left == PrimitiveType::Boolean && right == PrimitiveType::Boolean {
            Some(PrimitiveType::Boolean)
        } else {
            left.promote(right)
        };
        Ok(solved.map(SolvedType::Primitive))
    }

    fn definitions<'m>(&self, expr: &Expr, site: Site<'m>) -> Result<Vec<EntityRef<'m>>> {
        match expr {
            Expr::Identifier(name) if matches!(name.as_str(), "this" | "super") => Ok(self
                .solve_identifier(name, site)?
                .and_then(|solved| solved.entity())
                .into_iter()
                .collect()),
            Expr::Identifier(name) => Ok(self
                .find_identifier(name, site)?
                .map(|member| member.entity())
                .into_iter()
                .collect()),
            Expr::MemberSelect { target, name } => {
                let Some(base) = self.solve_expr(target, site)? else {
                    return Ok(Vec::new());
                };
                Ok(self
                    .member_solver
                    .find_non_method_member(name, &base, site.module)?
                    .map(|member| member.entity())
                    .into_iter()
                    .collect())
            }
            Expr::MethodInvocation { target, arguments } => {
                let argument_types = self.solve_arguments(arguments, site)?;
                let candidates = self.method_candidates(target, site)?;
                let ordered = self
                    .overload_solver
                    .reorder(candidates, &argument_types, site.module)?;
                Ok(ordered.iter().map(MemberMatch::entity).collect())
            }
            Expr::Parenthesized(inner) => self.definitions(inner, site),
            _ => Ok(Vec::new()),
        }
    }
}

/// Primitive an operand contributes to arithmetic, unboxing wrappers.
fn numeric(solved: &SolvedType<'_>) -> Option<PrimitiveType> {
    match solved {
        SolvedType::Primitive(primitive) => Some(*primitive),
        SolvedType::Entity(class) => class.unboxed(),
        _ => None,
    }
}

fn is_string(solved: &SolvedType<'_>) -> bool {
    solved
        .qualified_name()
        .is_some_and(|name| name.iter().map(SmolStr::as_str).eq(STRING_CLASS))
}
