//! Module resolution for versioned modules with views, aliases, permits,
//! optional dependences and services.
//!
//! Resolution walks the module graph reachable from a set of root queries,
//! encodes it as a pseudo-boolean problem and asks a solver oracle for the
//! cheapest assignment, newest versions being cheapest. Service providers
//! are pulled in by further optional phases until no new provider appears.
//!
//! ```
//! use modsat::{module, MemoryCatalog, ModuleIdQuery, Resolver};
//!
//! let mut catalog = MemoryCatalog::new();
//! catalog.add_module(module("app@1").requires("lib@>=2")).unwrap();
//! catalog.add_module(module("lib@2")).unwrap();
//! catalog.add_module(module("lib@3")).unwrap();
//!
//! let roots = [ModuleIdQuery::parse("app@1").unwrap()];
//! let result = Resolver::new(&catalog).resolve(&roots).unwrap();
//! assert_eq!(result.to_string(), "[app@1, lib@3]");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod module;
pub mod resolver;
pub mod services;
pub mod solver;

pub use catalog::{Catalog, MemoryCatalog};
pub use config::{ConfigLoader, ResolverConfig};
pub use error::{CatalogError, ConfigError, ResolverError, Result, TraversalError};
pub use module::{module, ModuleInfo, ModuleInfoBuilder};
pub use resolver::{OracleFactory, Resolver, ResolverResult};
pub use services::ServiceDependences;
pub use solver::{BranchAndBound, Outcome, SolverOracle};

pub use modsat_version::{ModuleId, ModuleIdQuery, Version, VersionQuery};
