//! Query entry points for completion, definition and hover layers.

use crate::expression::ExpressionSolver;
use crate::member::MemberSolver;
use crate::overload::OverloadSolver;
use crate::solved::SolvedType;
use crate::type_solver::TypeSolver;
use javalens_core::error::{Result, SemanticError};
use javalens_core::model::{EntityRef, Expr, ScopeRef, TypeReference};
use javalens_core::{EngineConfig, Module, ShadowingListBuilder};
use std::path::Path;
use tracing::debug;

/// The four solvers built from one configuration.
#[derive(Debug, Clone)]
pub struct JavaSemantics {
    type_solver: TypeSolver,
    overload_solver: OverloadSolver,
    member_solver: MemberSolver,
    expression_solver: ExpressionSolver,
    filter_locals_by_position: bool,
}

impl Default for JavaSemantics {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl JavaSemantics {
    pub fn new(config: &EngineConfig) -> Self {
        let type_solver = TypeSolver::new(&config.solver);
        Self {
            overload_solver: OverloadSolver::new(type_solver.clone()),
            member_solver: MemberSolver::new(type_solver.clone()),
            expression_solver: ExpressionSolver::new(&config.solver),
            type_solver,
            filter_locals_by_position: config.solver.filter_locals_by_position,
        }
    }

    pub fn type_solver(&self) -> &TypeSolver {
        &self.type_solver
    }

    pub fn overload_solver(&self) -> &OverloadSolver {
        &self.overload_solver
    }

    pub fn member_solver(&self) -> &MemberSolver {
        &self.member_solver
    }

    pub fn expression_solver(&self) -> &ExpressionSolver {
        &self.expression_solver
    }

    /// Innermost scope at `offset` in the file at `path`.
    pub fn scope_at<'m>(
        &self,
        module: &'m Module,
        path: &Path,
        offset: usize,
    ) -> Result<ScopeRef<'m>> {
        let file = module.file_scope(path).ok_or_else(|| {
            SemanticError::InvalidOperation(format!("{} is not part of the module", path.display()))
        })?;
        Ok(ScopeRef::local(file.as_ref(), file.scope_at(offset)))
    }

    /// Static type of `expr` written at `offset` in `path`.
    pub fn solve_expression_at<'m>(
        &self,
        expr: &Expr,
        module: &'m Module,
        path: &Path,
        offset: usize,
    ) -> Result<Option<SolvedType<'m>>> {
        let scope = self.scope_at(module, path, offset)?;
        self.expression_solver
            .solve(expr, module, scope, Some(offset))
    }

    /// Declarations `expr` at `offset` refers to, best candidate first.
    pub fn definitions_at<'m>(
        &self,
        expr: &Expr,
        module: &'m Module,
        path: &Path,
        offset: usize,
    ) -> Result<Vec<EntityRef<'m>>> {
        let scope = self.scope_at(module, path, offset)?;
        let definitions = self
            .expression_solver
            .solve_definitions(expr, module, scope, Some(offset))?;
        debug!(
            path = %path.display(),
            offset,
            count = definitions.len(),
            "definitions resolved"
        );
        Ok(definitions)
    }

    /// A type mention at `offset`, with the type parameters in scope there.
    pub fn solve_type_at<'m>(
        &self,
        type_ref: &TypeReference,
        module: &'m Module,
        path: &Path,
        offset: usize,
    ) -> Result<Option<SolvedType<'m>>> {
        let scope = self.scope_at(module, path, offset)?;
        let context = self.type_solver.scope_type_parameters(scope, module);
        Ok(self.type_solver.solve(type_ref, &context, scope, module))
    }

    /// Every entity a simple name could refer to at `offset`: locals and members of the
    /// enclosing declarations, then members inherited by each enclosing class.
    pub fn visible_entities_at<'m>(
        &self,
        module: &'m Module,
        path: &Path,
        offset: usize,
    ) -> Result<Vec<EntityRef<'m>>> {
        let scope = self.scope_at(module, path, offset)?;
        let position = Some(offset).filter(|_| self.filter_locals_by_position);

        let mut builder = ShadowingListBuilder::new();
        for entities in scope.visible_entities(position).into_values() {
            builder.add_all(entities);
        }

        let mut current = Some(scope);
        while let Some(scope) = current {
            if let Some(class) = scope.owner().filter(|owner| owner.is_class_like()) {
                let class_type = self.type_solver.declared_type(class, module);
                builder.add_all(self.member_solver.members(&class_type, module)?);
            }
            current = scope.parent();
        }
        Ok(builder.build())
    }
}
