//! Multi-phase module resolution
//!
//! Phase 0 resolves the root queries and must succeed. Every later phase
//! takes the providers of services required by the modules resolved so
//! far, offers each provider name as an optional root next to the already
//! resolved ids, and merges whatever could be added. Resolution stops once
//! no provider remains that was not already attempted.

use std::fmt;

use indexmap::IndexSet;
use log::{debug, info};
use modsat_version::{ModuleId, ModuleIdQuery};

use crate::catalog::Catalog;
use crate::config::ResolverConfig;
use crate::error::{ResolverError, Result};
use crate::graph::{ModuleGraphTraverser, ReifiedDependencies};
use crate::services::ServiceDependences;
use crate::solver::{BranchAndBound, ConstraintEncoder, Outcome, SolverOracle, SubProblem};

#[cfg(test)]
mod tests;

/// Creates a fresh oracle for every phase
pub type OracleFactory<'a> = Box<dyn Fn(&ResolverConfig) -> Box<dyn SolverOracle> + 'a>;

/// The outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverResult {
    ids: IndexSet<ModuleId>,
}

impl ResolverResult {
    /// Resolved canonical module ids in discovery order across all phases
    pub fn resolved_module_ids(&self) -> &IndexSet<ModuleId> {
        &self.ids
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_ids(self) -> IndexSet<ModuleId> {
        self.ids
    }
}

impl fmt::Display for ResolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.ids.iter().map(|id| id.to_string()).collect();
        write!(f, "[{}]", ids.join(", "))
    }
}

/// Resolves root queries against a catalog
pub struct Resolver<'a> {
    catalog: &'a dyn Catalog,
    oracle_factory: OracleFactory<'a>,
}

impl<'a> Resolver<'a> {
    /// A resolver solving with [`BranchAndBound`]
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Resolver {
            catalog,
            oracle_factory: Box::new(|config: &ResolverConfig| -> Box<dyn SolverOracle> {
                Box::new(BranchAndBound::from_config(config))
            }),
        }
    }

    /// Solve with oracles built by `factory`
    pub fn with_oracle<F>(mut self, factory: F) -> Self
    where
        F: Fn(&ResolverConfig) -> Box<dyn SolverOracle> + 'a,
    {
        self.oracle_factory = Box::new(factory);
        self
    }

    /// Resolve with the default configuration
    pub fn resolve(&self, queries: &[ModuleIdQuery]) -> Result<ResolverResult> {
        self.resolve_with(queries, &ResolverConfig::default())
    }

    pub fn resolve_with(&self, queries: &[ModuleIdQuery], config: &ResolverConfig) -> Result<ResolverResult> {
        let traverser = ModuleGraphTraverser::new(self.catalog, config);
        let encoder = ConstraintEncoder::new(config.trace);
        let services = ServiceDependences::new(self.catalog);
        let mut rds = ReifiedDependencies::new();

        debug!("Phase 0: resolving {}", join(queries));
        traverser.traverse(&mut rds, queries)?;
        let mut resolved: IndexSet<ModuleId> = self
            .solve(&rds, &encoder, &SubProblem::mandatory(), config)
            .map_err(ResolverError::Unsatisfiable)?
            .into_iter()
            .collect();
        debug!("Phase 0 resolved {} modules", resolved.len());

        // Everything resolved or ever offered as a provider
        let mut seen = resolved.clone();
        let mut candidates = next_candidates(&services, &resolved, &mut seen)?;
        let mut phase = 1;

        while !candidates.is_empty() {
            let optional_roots: IndexSet<String> =
                candidates.iter().map(|id| id.name().to_string()).collect();
            let mut roots: Vec<ModuleIdQuery> = resolved.iter().map(ModuleIdQuery::exact).collect();
            roots.extend(optional_roots.iter().map(|name| ModuleIdQuery::any(name.as_str())));
            debug!(
                "Phase {}: {} resolved modules, service providers {}",
                phase,
                resolved.len(),
                join(&candidates)
            );

            rds.reset();
            traverser.traverse(&mut rds, &roots)?;
            let sub = SubProblem::optional(resolved.clone(), optional_roots);
            let ids = self
                .solve(&rds, &encoder, &sub, config)
                .map_err(|explanation| ResolverError::OptionalPhaseUnsatisfiable { phase, explanation })?;

            let before = resolved.len();
            resolved.extend(ids);
            debug!("Phase {} added {} modules", phase, resolved.len() - before);

            candidates = next_candidates(&services, &resolved, &mut seen)?;
            phase += 1;
        }

        let result = ResolverResult { ids: resolved };
        info!("Resolved {} in {} phases: {}", join(queries), phase, result);
        Ok(result)
    }

    /// Encode and solve one phase; on failure the explanation if any
    fn solve(
        &self,
        rds: &ReifiedDependencies,
        encoder: &ConstraintEncoder,
        sub: &SubProblem,
        config: &ResolverConfig,
    ) -> std::result::Result<Vec<ModuleId>, Option<String>> {
        let problem = encoder.encode(rds, sub);
        let mut oracle = (self.oracle_factory)(config);
        problem.submit(oracle.as_mut());

        match oracle.solve() {
            Outcome::Sat(assignment) => Ok(encoder.decode(rds, &assignment)),
            Outcome::Unsat(core) => Err(core.map(|names| format!("[{}]", names.join(", ")))),
        }
    }
}

/// Providers for `resolved` that were never attempted; marks them seen
fn next_candidates(
    services: &ServiceDependences<'_>,
    resolved: &IndexSet<ModuleId>,
    seen: &mut IndexSet<ModuleId>,
) -> Result<IndexSet<ModuleId>> {
    let candidates: IndexSet<ModuleId> = services
        .provider_modules(resolved)?
        .into_iter()
        .filter(|id| !seen.contains(id))
        .collect();
    seen.extend(candidates.iter().cloned());
    Ok(candidates)
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
