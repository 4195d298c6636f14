//! Version vocabulary for the modsat resolver
//!
//! This crate provides module versions, version constraints, version queries
//! and the `name@version` identifiers used to address modules in a catalog.

pub mod constraint;
mod error;
mod module_id;
mod version;

pub use constraint::{Constraint, Operator, VersionQuery};
pub use error::VersionParseError;
pub use module_id::{ModuleId, ModuleIdQuery};
pub use version::Version;
