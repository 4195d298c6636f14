//! Constraint types for version matching

pub mod constraint;
mod multi_constraint;
mod operator;

pub use constraint::Constraint;
pub use multi_constraint::VersionQuery;
pub use operator::Operator;
