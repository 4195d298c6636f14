//! Translation of a reified dependency graph into a pseudo-boolean problem.
//!
//! Each canonical module id becomes a literal. Choosing a view or alias
//! implies choosing its module, at most one version of a module name may
//! be chosen, and an optional dependence may instead be satisfied by the
//! absence literal `*name`. The objective prefers newer versions and only
//! falls back to absence when no version can be installed.
//!
//! A mandatory dependence with no match is encoded as the pair
//! `(-m v *name)` and `(-m v -*name)`, so an explanation of the failure
//! names the module `m` that cannot be installed.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use log::trace;
use modsat_version::ModuleId;

use super::{Literal, SolverOracle};
use crate::graph::ReifiedDependencies;

/// A named constraint of the problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// At least one literal holds
    Clause { name: String, literals: Vec<Literal> },
    /// At least `k` literals hold
    AtLeast {
        name: String,
        k: usize,
        literals: Vec<Literal>,
    },
}

impl Rule {
    pub fn name(&self) -> &str {
        match self {
            Rule::Clause { name, .. } | Rule::AtLeast { name, .. } => name,
        }
    }

    pub fn literals(&self) -> &[Literal] {
        match self {
            Rule::Clause { literals, .. } | Rule::AtLeast { literals, .. } => literals,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literals: Vec<String> = self.literals().iter().map(|l| l.to_string()).collect();
        match self {
            Rule::Clause { .. } => write!(f, "({})", literals.join(" v ")),
            Rule::AtLeast { k, .. } => write!(f, "({}) >= {}", literals.join(" v "), k),
        }
    }
}

/// The constraints and objective of one resolution phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problem {
    rules: Vec<Rule>,
    objective: Vec<(Literal, u64)>,
}

impl Problem {
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Literal weights to minimize
    pub fn objective(&self) -> &[(Literal, u64)] {
        &self.objective
    }

    /// Find a rule by name
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    /// Weight of a literal in the objective
    pub fn weight_of(&self, literal: &Literal) -> Option<u64> {
        self.objective
            .iter()
            .find(|(l, _)| l == literal)
            .map(|&(_, weight)| weight)
    }

    /// Hand every rule and the objective to an oracle
    pub fn submit(&self, oracle: &mut dyn SolverOracle) {
        for rule in &self.rules {
            match rule {
                Rule::Clause { name, literals } => oracle.add_clause(name, literals),
                Rule::AtLeast { name, k, literals } => oracle.add_at_least(name, *k, literals),
            }
        }
        oracle.set_objective(&self.objective);
    }
}

/// What a phase must and may leave out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubProblem {
    /// Ids fixed by earlier phases; their dependences are not re-encoded
    pub resolved: IndexSet<ModuleId>,
    /// Root module names that may be left unresolved
    pub optional_roots: IndexSet<String>,
}

impl SubProblem {
    /// Every root must be satisfied
    pub fn mandatory() -> Self {
        Self::default()
    }

    /// Roots named in `optional_roots` may be left unresolved
    pub fn optional(resolved: IndexSet<ModuleId>, optional_roots: IndexSet<String>) -> Self {
        SubProblem {
            resolved,
            optional_roots,
        }
    }

    pub fn is_optional(&self) -> bool {
        !self.optional_roots.is_empty()
    }
}

/// Map every module, view and alias name in the graph to the name of its
/// module. The first module in discovery order to claim a name keeps it.
pub fn module_names_by_declared_name(rds: &ReifiedDependencies) -> IndexMap<String, String> {
    let mut names = IndexMap::new();
    for id in rds.modules() {
        let Some(info) = rds.module_of(id) else {
            continue;
        };
        let module_name = id.name().to_string();

        names
            .entry(module_name.clone())
            .or_insert_with(|| module_name.clone());
        for view in info.views() {
            names
                .entry(view.id().name().to_string())
                .or_insert_with(|| module_name.clone());
            for alias in view.aliases() {
                names
                    .entry(alias.name().to_string())
                    .or_insert_with(|| module_name.clone());
            }
        }
    }
    names
}

fn join_ids<'i>(ids: impl IntoIterator<Item = &'i ModuleId>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the pseudo-boolean problem for a phase
#[derive(Debug, Clone, Default)]
pub struct ConstraintEncoder {
    trace: bool,
}

impl ConstraintEncoder {
    pub fn new(trace: bool) -> Self {
        Self { trace }
    }

    fn push(&self, rules: &mut Vec<Rule>, rule: Rule) {
        if self.trace {
            trace!("# {}", rule.name());
            trace!("{}", rule);
        }
        rules.push(rule);
    }

    fn clause(&self, rules: &mut Vec<Rule>, name: String, literals: Vec<Literal>) {
        self.push(rules, Rule::Clause { name, literals });
    }

    pub fn encode(&self, rds: &ReifiedDependencies, sub: &SubProblem) -> Problem {
        let names = module_names_by_declared_name(rds);
        let mut optionals: IndexSet<String> = sub.optional_roots.clone();
        let mut view_to_module: IndexMap<ModuleId, ModuleId> = IndexMap::new();
        let mut not_permitted: IndexMap<ModuleId, IndexSet<ModuleId>> = IndexMap::new();
        let mut rules = Vec::new();
        let no_matches = BTreeSet::new();

        // Module dependences
        for rmid in rds.modules() {
            if sub.resolved.contains(rmid) {
                continue;
            }
            let Some(rmi) = rds.module_of(rmid) else {
                continue;
            };
            let requiring = Literal::module(rmid).negate();

            for vd in rmi.requires() {
                let query = vd.query();
                let mids = rds.matching_ids(vd).unwrap_or(&no_matches);

                if !mids.is_empty() {
                    for mid in mids {
                        let Some(view) = rds.view_of(mid) else {
                            continue;
                        };
                        let module_id = view.module().id();
                        if module_id != mid {
                            view_to_module
                                .entry(mid.clone())
                                .or_insert_with(|| module_id.clone());
                        }
                        if !view.view().permits_module(rmi.id().name()) {
                            not_permitted
                                .entry(view.id().clone())
                                .or_default()
                                .insert(rmi.id().clone());
                        }
                    }

                    let mut literals = vec![requiring.clone()];
                    literals.extend(mids.iter().map(Literal::module));
                    let mut targets = join_ids(mids);

                    if vd.is_optional() {
                        // Absence is tracked for the module that owns the match
                        let module_name = mids
                            .iter()
                            .find_map(|mid| rds.view_of(mid))
                            .map(|view| view.module().id().name().to_string())
                            .unwrap_or_else(|| query.name().to_string());
                        let absent = Literal::absent(&module_name);
                        targets.push_str(&format!(", {}", absent));
                        literals.push(absent);
                        optionals.insert(module_name);
                    }

                    self.clause(
                        &mut rules,
                        format!("Module {} depends on [{}]", rmid, targets),
                        literals,
                    );
                } else {
                    // Nothing matched; the name may still be known through
                    // other versions in the graph
                    let known = names.get(query.name());
                    let module_name = known
                        .cloned()
                        .unwrap_or_else(|| query.name().to_string());
                    let absent = Literal::absent(&module_name);

                    if vd.is_optional() {
                        self.clause(
                            &mut rules,
                            format!(
                                "Module {} has an optional dependency {}, which matches no modules",
                                rmid, query
                            ),
                            vec![requiring.clone(), absent],
                        );
                        if known.is_some() {
                            optionals.insert(module_name);
                        }
                    } else {
                        self.clause(
                            &mut rules,
                            format!(
                                "Module {} has a dependency {}, which matches no modules",
                                rmid, query
                            ),
                            vec![requiring.clone(), absent.clone()],
                        );
                        self.clause(
                            &mut rules,
                            format!("Module {} cannot be installed", rmid),
                            vec![requiring.clone(), absent.negate()],
                        );
                    }
                }
            }
        }

        // Only one version of a module
        let module_names: IndexSet<&str> = rds.modules().iter().map(|id| id.name()).collect();
        for &module_name in &module_names {
            let Some(versions) = rds.versions_of(module_name) else {
                continue;
            };
            let optional = optionals.contains(module_name);
            if versions.len() > 1 || (!versions.is_empty() && optional) {
                let mut literals: Vec<Literal> =
                    versions.iter().map(|id| Literal::module(id).negate()).collect();
                if optional {
                    literals.push(Literal::absent(module_name).negate());
                }
                let k = literals.len() - 1;
                self.push(
                    &mut rules,
                    Rule::AtLeast {
                        name: format!("Only one version of module {}", module_name),
                        k,
                        literals,
                    },
                );
            }
        }

        // Previously resolved modules
        for mid in &sub.resolved {
            self.clause(
                &mut rules,
                format!("Module {} is resolved", mid),
                vec![Literal::module(mid)],
            );
        }

        // Root modules to be installed
        for (query, versions) in rds.roots() {
            let optional_root = sub.optional_roots.contains(query.name());

            if !versions.is_empty() {
                for mid in versions {
                    if let Some(info) = rds.module_of(mid) {
                        if info.id() != mid {
                            view_to_module
                                .entry(mid.clone())
                                .or_insert_with(|| info.id().clone());
                        }
                    }
                }

                let mut literals: Vec<Literal> = versions.iter().map(Literal::module).collect();
                if optional_root {
                    literals.push(Literal::absent(query.name()));
                }
                self.clause(
                    &mut rules,
                    format!("Module in query {} to be installed", query),
                    literals,
                );
            } else if !optional_root {
                log::warn!("Root dependency {} matches no modules", query);
                let absent = Literal::absent(query.name());
                self.clause(
                    &mut rules,
                    format!("Root dependency {} matches no modules", query),
                    vec![absent.clone()],
                );
                self.clause(
                    &mut rules,
                    format!("Root dependency {} failed to resolve", query),
                    vec![absent.negate()],
                );
            }
        }

        // Not permitted
        for (view_id, dependers) in &not_permitted {
            for mid in dependers {
                self.clause(
                    &mut rules,
                    format!("Module {} is not permitted to depend on {}", mid, view_id),
                    vec![Literal::module(view_id).negate(), Literal::module(mid).negate()],
                );
            }
        }

        // Views and aliases
        for (view_id, module_id) in &view_to_module {
            self.clause(
                &mut rules,
                format!("{} is a view or alias of module {}", view_id, module_id),
                vec![Literal::module(view_id).negate(), Literal::module(module_id)],
            );
        }

        // Objective: newest version is cheapest, absence costs more than
        // every version together
        let mut versions_total = 0u64;
        for &module_name in &module_names {
            if let Some(versions) = rds.versions_of(module_name) {
                let count = versions.len() as u64;
                versions_total += count * (count + 1) / 2;
            }
        }

        let mut objective = Vec::new();
        for &module_name in &module_names {
            let Some(versions) = rds.versions_of(module_name) else {
                continue;
            };
            if optionals.contains(module_name) {
                objective.push((Literal::absent(module_name), versions_total + 1));
            }
            let count = versions.len() as u64;
            for (rank, id) in versions.iter().enumerate() {
                objective.push((Literal::module(id), count - rank as u64));
            }
        }

        if self.trace {
            let weights: Vec<String> = objective
                .iter()
                .map(|(literal, weight)| format!("{}.{}", weight, literal))
                .collect();
            trace!("# Objective function");
            trace!("{}", weights.join(", "));
        }

        Problem { rules, objective }
    }

    /// Canonical module ids chosen by an assignment, in discovery order
    pub fn decode(&self, rds: &ReifiedDependencies, assignment: &IndexMap<String, bool>) -> Vec<ModuleId> {
        rds.modules()
            .iter()
            .filter(|id| assignment.get(&id.to_string()).copied().unwrap_or(false))
            .cloned()
            .collect()
    }
}
