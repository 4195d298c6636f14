//! Resolver configuration
//!
//! Configuration is an explicit value handed to each resolution. It can be
//! built in code or loaded by [`ConfigLoader`] from, in priority order:
//!
//! 1. Environment variables (`MODSAT_TRACE`, `MODSAT_EXPLAIN`, `MODSAT_BASE_MODULE`)
//! 2. A JSON configuration file
//! 3. Built-in defaults

mod source;

use serde::{Deserialize, Serialize};

pub use source::{ConfigLoader, RawConfig};

/// Name of the module that every query on it matches regardless of version
pub const DEFAULT_BASE_MODULE: &str = "base";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Log traversal nodes and every emitted constraint at trace level
    pub trace: bool,

    /// Compute a minimal set of conflicting constraints on failure
    pub explain: bool,

    pub base_module: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            trace: false,
            explain: true,
            base_module: DEFAULT_BASE_MODULE.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    pub fn with_base_module(mut self, name: impl Into<String>) -> Self {
        self.base_module = name.into();
        self
    }

    /// Overlay the values present in a raw configuration
    pub fn merge_raw(&mut self, raw: &RawConfig) {
        if let Some(trace) = raw.trace {
            self.trace = trace;
        }
        if let Some(explain) = raw.explain {
            self.explain = explain;
        }
        if let Some(ref base_module) = raw.base_module {
            self.base_module = base_module.clone();
        }
    }
}
