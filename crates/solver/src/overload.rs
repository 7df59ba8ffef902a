//! Choosing among same-named methods for a list of argument types.
//!
//! Java's three applicability phases (strict, loose, variable arity) are folded into one
//! ranked level per candidate. Only candidates at the best level survive; among them the
//! most specific wins and ties go to the earliest candidate. Broken code never makes
//! resolution fail: unknown argument types match anything.

use crate::member::MemberMatch;
use crate::solved::{SolvedEntityType, SolvedType, SolvedTypeParameters};
use crate::type_solver::TypeSolver;
use javalens_core::error::{Result, SemanticError};
use javalens_core::model::{PrimitiveType, ScopeRef, TypeReference};
use javalens_core::Module;
use smol_str::SmolStr;
use tracing::debug;

/// How well a candidate fits the arguments, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchLevel {
    LengthMismatch,
    TypeMismatch,
    VarArityWithBoxing,
    BoxingWithoutArity,
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Conversion {
    Mismatch,
    Boxing,
    Exact,
}

struct Signature<'m> {
    parameters: Vec<Option<SolvedType<'m>>>,
    /// Last parameter is an array and may absorb any number of trailing arguments.
    variable_arity: bool,
}

impl<'m> Signature<'m> {
    fn fixed(&self) -> Vec<Option<&SolvedType<'m>>> {
        self.parameters.iter().map(Option::as_ref).collect()
    }

    /// Parameters lined up against `arg_count` arguments, the trailing array parameter
    /// repeated as its component type.
    fn expanded(&self, arg_count: usize) -> Option<Vec<Option<&SolvedType<'m>>>> {
        let (last, fixed) = self.parameters.split_last()?;
        if !self.variable_arity || arg_count < fixed.len() {
            return None;
        }
        let component = last.as_ref().and_then(SolvedType::element_type);
        Some(
            fixed
                .iter()
                .map(Option::as_ref)
                .chain(std::iter::repeat_n(component, arg_count - fixed.len()))
                .collect(),
        )
    }

    fn effective(&self, arg_count: usize, expand: bool) -> Option<Vec<Option<&SolvedType<'m>>>> {
        if expand && self.variable_arity {
            self.expanded(arg_count)
        } else {
            Some(self.fixed())
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverloadSolver {
    type_solver: TypeSolver,
}

impl OverloadSolver {
    pub fn new(type_solver: TypeSolver) -> Self {
        Self { type_solver }
    }

    /// Pick exactly one method for `arguments` (`None` marks an argument of unknown type).
    pub fn solve<'m>(
        &self,
        candidates: &[MemberMatch<'m>],
        arguments: &[Option<SolvedType<'m>>],
        module: &'m Module,
    ) -> Result<MemberMatch<'m>> {
        let best = self.select(candidates, arguments, module)?;
        candidates
            .get(best)
            .cloned()
            .ok_or(SemanticError::EmptyCandidates)
    }

    /// Move the best candidate to the front; the rest keep their relative order.
    pub fn reorder<'m>(
        &self,
        mut candidates: Vec<MemberMatch<'m>>,
        arguments: &[Option<SolvedType<'m>>],
        module: &'m Module,
    ) -> Result<Vec<MemberMatch<'m>>> {
        if candidates.len() > 1 {
            let best = self.select(&candidates, arguments, module)?;
            let chosen = candidates.remove(best);
            candidates.insert(0, chosen);
        }
        Ok(candidates)
    }

    pub fn match_level<'m>(
        &self,
        candidate: &MemberMatch<'m>,
        arguments: &[Option<SolvedType<'m>>],
        module: &'m Module,
    ) -> MatchLevel {
        let signature = self.signature(candidate, module);
        self.level(&signature, arguments, module)
    }

    fn select<'m>(
        &self,
        candidates: &[MemberMatch<'m>],
        arguments: &[Option<SolvedType<'m>>],
        module: &'m Module,
    ) -> Result<usize> {
        match candidates.len() {
            0 => return Err(SemanticError::EmptyCandidates),
            1 => return Ok(0),
            _ => {}
        }
        let signatures: Vec<_> = candidates
            .iter()
            .map(|candidate| self.signature(candidate, module))
            .collect();
        let levels: Vec<_> = signatures
            .iter()
            .map(|signature| self.level(signature, arguments, module))
            .collect();
        let best_level = levels
            .iter()
            .copied()
            .max()
            .unwrap_or(MatchLevel::LengthMismatch);
        let kept: Vec<usize> = (0..candidates.len())
            .filter(|&index| levels[index] == best_level)
            .collect();

        let expand = best_level == MatchLevel::VarArityWithBoxing;
        let best = self.most_specific(&kept, &signatures, arguments.len(), expand, module);
        debug!(
            name = candidates[best].entity().name(),
            candidates = candidates.len(),
            applicable = kept.len(),
            level = ?best_level,
            "overload selected"
        );
        Ok(best)
    }

    /// Candidate beating the most others pairwise; the earliest on a tie.
    fn most_specific<'m>(
        &self,
        kept: &[usize],
        signatures: &[Signature<'m>],
        arg_count: usize,
        expand: bool,
        module: &'m Module,
    ) -> usize {
        let mut best = kept[0];
        let mut best_score = i32::MIN;
        for &candidate in kept {
            let mut score = 0i32;
            for &other in kept {
                if other == candidate {
                    continue;
                }
                let left = &signatures[candidate];
                let right = &signatures[other];
                let candidate_wins = self.more_specific(left, right, arg_count, expand, module);
                let other_wins = self.more_specific(right, left, arg_count, expand, module);
                if candidate_wins && !other_wins {
                    score += 1;
                } else if other_wins && !candidate_wins {
                    score -= 1;
                }
            }
            if score > best_score {
                best_score = score;
                best = candidate;
            }
        }
        best
    }

    /// Every parameter of `left` converts to the matching parameter of `right` by
    /// boxing or better.
    fn more_specific<'m>(
        &self,
        left: &Signature<'m>,
        right: &Signature<'m>,
        arg_count: usize,
        expand: bool,
        module: &'m Module,
    ) -> bool {
        let (Some(left), Some(right)) = (
            left.effective(arg_count, expand),
            right.effective(arg_count, expand),
        ) else {
            return false;
        };
        left.len() == right.len()
            && left
                .iter()
                .zip(&right)
                .all(|(l, r)| self.conversion(*l, *r, module) >= Conversion::Boxing)
    }

    fn level<'m>(
        &self,
        signature: &Signature<'m>,
        arguments: &[Option<SolvedType<'m>>],
        module: &'m Module,
    ) -> MatchLevel {
        let arguments: Vec<Option<&SolvedType<'m>>> = arguments.iter().map(Option::as_ref).collect();
        let parameter_count = signature.parameters.len();

        if arguments.len() == parameter_count {
            match self.pairwise(&signature.fixed(), &arguments, module) {
                Conversion::Exact => return MatchLevel::Exact,
                Conversion::Boxing => return MatchLevel::BoxingWithoutArity,
                Conversion::Mismatch if !signature.variable_arity => {
                    return MatchLevel::TypeMismatch;
                }
                Conversion::Mismatch => {}
            }
        } else if !signature.variable_arity || arguments.len() + 1 < parameter_count {
            return MatchLevel::LengthMismatch;
        }

        match signature.expanded(arguments.len()) {
            Some(expanded) if self.pairwise(&expanded, &arguments, module) >= Conversion::Boxing => {
                MatchLevel::VarArityWithBoxing
            }
            _ => MatchLevel::TypeMismatch,
        }
    }

    fn pairwise<'m>(
        &self,
        parameters: &[Option<&SolvedType<'m>>],
        arguments: &[Option<&SolvedType<'m>>],
        module: &'m Module,
    ) -> Conversion {
        parameters
            .iter()
            .zip(arguments)
            .map(|(parameter, argument)| self.conversion(*argument, *parameter, module))
            .min()
            .unwrap_or(Conversion::Exact)
    }

    fn conversion<'m>(
        &self,
        argument: Option<&SolvedType<'m>>,
        parameter: Option<&SolvedType<'m>>,
        module: &'m Module,
    ) -> Conversion {
        let (Some(argument), Some(parameter)) = (argument, parameter) else {
            return Conversion::Exact;
        };
        if parameter
            .entity()
            .is_some_and(|entity| self.type_solver.is_object(entity))
        {
            return if argument.is_primitive() {
                Conversion::Boxing
            } else {
                Conversion::Exact
            };
        }

        match (argument, parameter) {
            (SolvedType::Null, parameter) if parameter.is_primitive() => Conversion::Mismatch,
            (SolvedType::Null, _) => Conversion::Exact,
            (SolvedType::Array(argument), SolvedType::Array(parameter)) => {
                // No widening or boxing between element types.
                let exact = if argument.is_primitive() || parameter.is_primitive() {
                    argument == parameter
                } else {
                    self.conversion(Some(&**argument), Some(&**parameter), module)
                        == Conversion::Exact
                };
                if exact {
                    Conversion::Exact
                } else {
                    Conversion::Mismatch
                }
            }
            (SolvedType::Array(_), _) | (_, SolvedType::Array(_)) => Conversion::Mismatch,
            (SolvedType::Primitive(argument), SolvedType::Primitive(parameter)) => {
                if argument.widens_to(*parameter) {
                    Conversion::Exact
                } else {
                    Conversion::Mismatch
                }
            }
            (SolvedType::Primitive(argument), SolvedType::Entity(parameter)) => {
                if self.boxes_to(*argument, parameter, module) {
                    Conversion::Boxing
                } else {
                    Conversion::Mismatch
                }
            }
            (SolvedType::Entity(argument), SolvedType::Primitive(parameter)) => {
                if argument
                    .unboxed()
                    .is_some_and(|unboxed| unboxed.widens_to(*parameter))
                {
                    Conversion::Boxing
                } else {
                    Conversion::Mismatch
                }
            }
            (SolvedType::Entity(argument), SolvedType::Entity(parameter)) => {
                if self.is_subclass(argument, parameter, module) {
                    Conversion::Exact
                } else {
                    Conversion::Mismatch
                }
            }
            _ => Conversion::Mismatch,
        }
    }

    /// `class` or one of its ancestors has the qualified name of `ancestor`.
    /// Type arguments are not compared.
    fn is_subclass<'m>(
        &self,
        class: &SolvedEntityType<'m>,
        ancestor: &SolvedEntityType<'m>,
        module: &'m Module,
    ) -> bool {
        let target = ancestor.qualified_name();
        if class.qualified_name() == target {
            return true;
        }
        self.type_solver
            .class_hierarchy(&SolvedType::Entity(class.clone()), module)
            .is_ok_and(|mut hierarchy| hierarchy.any(|found| found.qualified_name() == target))
    }

    fn boxes_to<'m>(
        &self,
        primitive: PrimitiveType,
        parameter: &SolvedEntityType<'m>,
        module: &'m Module,
    ) -> bool {
        let Some(simple) = primitive.boxed_class() else {
            return false;
        };
        let boxed_name: Vec<SmolStr> = ["java", "lang", simple]
            .into_iter()
            .map(SmolStr::new)
            .collect();
        if parameter.qualified_name() == boxed_name {
            return true;
        }
        // Boxing followed by widening reference conversion, e.g. int to Number.
        self.type_solver
            .find_qualified_class(&boxed_name, module)
            .is_some_and(|boxed| {
                let boxed =
                    self.type_solver
                        .class_type(boxed, &[], &SolvedTypeParameters::new(), module);
                self.is_subclass(&boxed, parameter, module)
            })
    }

    fn signature<'m>(&self, candidate: &MemberMatch<'m>, module: &'m Module) -> Signature<'m> {
        let method = candidate.entity();
        let context =
            self.type_solver
                .method_type_parameters(method, candidate.type_parameters(), module);
        let scope = method.parent_scope().unwrap_or(ScopeRef::Empty);
        let declared = method.parameters();
        let parameters = declared
            .iter()
            .map(|parameter| {
                parameter
                    .variable_type()
                    .and_then(|type_ref| self.type_solver.solve(type_ref, &context, scope, module))
            })
            .collect();
        let variable_arity = declared
            .last()
            .and_then(|parameter| parameter.variable_type())
            .is_some_and(TypeReference::is_array);
        Signature {
            parameters,
            variable_arity,
        }
    }
}
