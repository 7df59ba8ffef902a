//! Static semantics over a [`javalens_core::Module`]: type references, class hierarchies,
//! overload selection, member lookup and expression typing.

pub mod expression;
pub mod facade;
pub mod hierarchy;
pub mod member;
pub mod overload;
pub mod solved;
pub mod type_solver;

pub use expression::ExpressionSolver;
pub use facade::JavaSemantics;
pub use hierarchy::ClassHierarchy;
pub use member::{MemberMatch, MemberSolver};
pub use overload::{MatchLevel, OverloadSolver};
pub use solved::{SolvedEntityType, SolvedType, SolvedTypeParameters};
pub use type_solver::TypeSolver;
