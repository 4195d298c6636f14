use indexmap::IndexMap;

use super::Literal;

/// Result of solving a pseudo-boolean problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Variable name to value for every variable the oracle knows
    Sat(IndexMap<String, bool>),
    /// No assignment exists; optionally the names of the constraints at
    /// fault
    Unsat(Option<Vec<String>>),
}

/// A pseudo-boolean satisfiability and optimization oracle.
///
/// Every constraint carries a name so an unsatisfiable problem can be
/// explained in terms of the constraints that caused it.
pub trait SolverOracle {
    /// At least one of `literals` holds
    fn add_clause(&mut self, name: &str, literals: &[Literal]);

    /// At least `k` of `literals` hold
    fn add_at_least(&mut self, name: &str, k: usize, literals: &[Literal]);

    /// Minimize the sum of weights of the literals that hold
    fn set_objective(&mut self, weights: &[(Literal, u64)]);

    fn solve(&mut self) -> Outcome;
}
