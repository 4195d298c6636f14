//! Pseudo-boolean encoding of a dependency graph and the oracles solving it

mod branch_bound;
mod encoder;
mod literal;
mod oracle;

pub use branch_bound::BranchAndBound;
pub use encoder::{module_names_by_declared_name, ConstraintEncoder, Problem, Rule, SubProblem};
pub use literal::{Literal, ABSENT_PREFIX};
pub use oracle::{Outcome, SolverOracle};
