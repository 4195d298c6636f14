use std::path::PathBuf;

use modsat_version::{ModuleId, VersionParseError};
use thiserror::Error;

/// Errors raised by a module catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Module not found: {0}")]
    NotFound(ModuleId),

    #[error("Failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid module declaration: {0}")]
    Parse(#[from] VersionParseError),

    #[error("Module id {0} is declared more than once")]
    Duplicate(ModuleId),
}

/// Errors aborting a walk of the module graph
#[derive(Error, Debug)]
pub enum TraversalError {
    #[error("Failed to look up modules named {name}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: CatalogError,
    },

    #[error("Failed to read module info for {id}: {source}")]
    ReadModule {
        id: ModuleId,
        #[source]
        source: CatalogError,
    },

    #[error("Module {module} has no view or alias {id}")]
    MissingView { id: ModuleId, module: ModuleId },
}

/// Errors returned by [`crate::Resolver`]
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Module graph traversal failed: {0}")]
    Traversal(#[from] TraversalError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Could not resolve modules: {}", .0.as_deref().unwrap_or("no solution"))]
    Unsatisfiable(Option<String>),

    #[error(
        "Service provider phase {phase} has no solution: {}",
        .explanation.as_deref().unwrap_or("no solution")
    )]
    OptionalPhaseUnsatisfiable {
        phase: usize,
        explanation: Option<String>,
    },
}

impl ResolverError {
    /// The solver explanation, when one was produced
    pub fn explanation(&self) -> Option<&str> {
        match self {
            ResolverError::Unsatisfiable(explanation)
            | ResolverError::OptionalPhaseUnsatisfiable { explanation, .. } => explanation.as_deref(),
            _ => None,
        }
    }
}

/// Errors raised while loading resolver configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value \"{value}\" for {var}")]
    InvalidValue { var: String, value: String },
}

pub type Result<T> = std::result::Result<T, ResolverError>;
