//! Default solver oracle: DPLL search with branch and bound.
//!
//! Every constraint is an at-least-k constraint over literals, a clause
//! being at-least-1. Unit propagation works on at-least constraints
//! directly: a constraint with exactly `k` literals left that can still
//! hold forces all of them.
//!
//! Variables are partitioned into groups: the variables of an at-most-one
//! constraint, such as the versions of a module, form one group and every
//! other variable is a group of its own. A group is needed when every
//! completion of the current assignment must set one of its variables,
//! either because an open clause draws only on that group or because
//! every candidate of a needed group implies it.
//!
//! The objective is minimized by exhaustive search pruned with a lower
//! bound: the cost of the current partial assignment, the cheapest value
//! of each unassigned variable, and for each needed group the cheapest
//! extra cost of setting one of its candidates. Decisions set the cheapest
//! candidate of the first needed group. A solution replaces the incumbent
//! only when strictly cheaper, so among equal cost solutions the first one
//! found is kept.

use indexmap::{IndexMap, IndexSet};
use log::debug;

use super::{Literal, Outcome, SolverOracle};
use crate::config::ResolverConfig;

type Var = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Lit {
    var: Var,
    positive: bool,
}

impl Lit {
    fn negate(self) -> Self {
        Lit {
            var: self.var,
            positive: !self.positive,
        }
    }
}

#[derive(Debug, Clone)]
struct AtLeast {
    name: String,
    k: usize,
    lits: Vec<Lit>,
}

/// Status of a constraint under a partial assignment
enum Status {
    Satisfied,
    Conflict,
    /// Every unassigned literal must hold
    Forcing,
    Open,
}

/// Branch and bound pseudo-boolean oracle
#[derive(Debug, Clone)]
pub struct BranchAndBound {
    explain: bool,
    vars: IndexMap<String, Var>,
    constraints: Vec<AtLeast>,
    /// Per variable, the cost when true and the cost when false
    costs: Vec<(u64, u64)>,
}

impl BranchAndBound {
    pub fn new(explain: bool) -> Self {
        BranchAndBound {
            explain,
            vars: IndexMap::new(),
            constraints: Vec::new(),
            costs: Vec::new(),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.explain)
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn var(&mut self, name: &str) -> Var {
        if let Some(&var) = self.vars.get(name) {
            return var;
        }
        let var = self.vars.len();
        self.vars.insert(name.to_string(), var);
        self.costs.push((0, 0));
        var
    }

    fn lits(&mut self, literals: &[Literal]) -> Vec<Lit> {
        let mut lits = IndexSet::new();
        for literal in literals {
            lits.insert(Lit {
                var: self.var(literal.name()),
                positive: literal.is_positive(),
            });
        }
        lits.into_iter().collect()
    }

    /// Search over the constraints at `active`
    fn run(&self, active: &[usize], optimize: bool) -> Option<Vec<bool>> {
        let mut search = Search::new(self, active, optimize);
        if !search.start() {
            return None;
        }
        search.search();
        debug!(
            "Explored {} nodes over {} variables and {} constraints",
            search.nodes,
            self.vars.len(),
            active.len()
        );
        search.best.map(|(_, values)| values)
    }

    /// A deletion-minimal set of constraint names that cannot all hold
    fn explain(&self) -> Vec<String> {
        let mut core: Vec<usize> = (0..self.constraints.len()).collect();
        let mut i = 0;
        while i < core.len() {
            let mut candidate = core.clone();
            candidate.remove(i);
            if self.run(&candidate, false).is_none() {
                core = candidate;
            } else {
                i += 1;
            }
        }

        let names: IndexSet<&str> = core
            .iter()
            .map(|&ci| self.constraints[ci].name.as_str())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }
}

impl Default for BranchAndBound {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SolverOracle for BranchAndBound {
    fn add_clause(&mut self, name: &str, literals: &[Literal]) {
        self.add_at_least(name, 1, literals);
    }

    fn add_at_least(&mut self, name: &str, k: usize, literals: &[Literal]) {
        let lits = self.lits(literals);
        self.constraints.push(AtLeast {
            name: name.to_string(),
            k,
            lits,
        });
    }

    fn set_objective(&mut self, weights: &[(Literal, u64)]) {
        for cost in self.costs.iter_mut() {
            *cost = (0, 0);
        }
        for (literal, weight) in weights {
            let var = self.var(literal.name());
            if literal.is_positive() {
                self.costs[var].0 += weight;
            } else {
                self.costs[var].1 += weight;
            }
        }
    }

    fn solve(&mut self) -> Outcome {
        let all: Vec<usize> = (0..self.constraints.len()).collect();
        match self.run(&all, true) {
            Some(values) => Outcome::Sat(
                self.vars
                    .iter()
                    .map(|(name, &var)| (name.clone(), values[var]))
                    .collect(),
            ),
            None if self.explain => Outcome::Unsat(Some(self.explain())),
            None => Outcome::Unsat(None),
        }
    }
}

/// State of one search over a subset of the constraints
struct Search<'s> {
    oracle: &'s BranchAndBound,
    active: &'s [usize],
    /// Variable to positions in `active` of constraints mentioning it
    occurs: Vec<Vec<usize>>,
    groups: Vec<Vec<Var>>,
    group_of: Vec<usize>,
    /// Variable to positions of clauses containing its negation
    implied_by: Vec<Vec<usize>>,
    /// Positions of the at-least-1 constraints
    clauses: Vec<usize>,
    assignment: Vec<Option<bool>>,
    trail: Vec<Var>,
    optimize: bool,
    best: Option<(u64, Vec<bool>)>,
    nodes: usize,
}

impl<'s> Search<'s> {
    fn new(oracle: &'s BranchAndBound, active: &'s [usize], optimize: bool) -> Self {
        let n = oracle.vars.len();
        let mut occurs = vec![Vec::new(); n];
        let mut implied_by = vec![Vec::new(); n];
        let mut clauses = Vec::new();
        for (pos, &ci) in active.iter().enumerate() {
            let constraint = &oracle.constraints[ci];
            for lit in &constraint.lits {
                if occurs[lit.var].last() != Some(&pos) {
                    occurs[lit.var].push(pos);
                }
            }
            if constraint.k == 1 {
                clauses.push(pos);
                for lit in constraint.lits.iter().filter(|lit| !lit.positive) {
                    implied_by[lit.var].push(pos);
                }
            }
        }

        let mut groups: Vec<Vec<Var>> = Vec::new();
        let mut claimed: Vec<Option<usize>> = vec![None; n];
        for &ci in active {
            let lits = &oracle.constraints[ci].lits;
            let at_most_one = lits.len() >= 2
                && oracle.constraints[ci].k + 1 == lits.len()
                && lits.iter().all(|lit| !lit.positive);
            if at_most_one && lits.iter().all(|lit| claimed[lit.var].is_none()) {
                for lit in lits {
                    claimed[lit.var] = Some(groups.len());
                }
                groups.push(lits.iter().map(|lit| lit.var).collect());
            }
        }
        let mut group_of = Vec::with_capacity(n);
        for (var, group) in claimed.into_iter().enumerate() {
            let group = match group {
                Some(group) => group,
                None => {
                    groups.push(vec![var]);
                    groups.len() - 1
                }
            };
            group_of.push(group);
        }

        Search {
            oracle,
            active,
            occurs,
            groups,
            group_of,
            implied_by,
            clauses,
            assignment: vec![None; n],
            trail: Vec::new(),
            optimize,
            best: None,
            nodes: 0,
        }
    }

    fn constraint(&self, pos: usize) -> &'s AtLeast {
        let oracle: &'s BranchAndBound = self.oracle;
        &oracle.constraints[self.active[pos]]
    }

    fn value(&self, lit: Lit) -> Option<bool> {
        self.assignment[lit.var].map(|v| v == lit.positive)
    }

    fn status(&self, pos: usize) -> Status {
        let constraint = self.constraint(pos);
        let mut holding = 0;
        let mut unassigned = 0;
        for &lit in &constraint.lits {
            match self.value(lit) {
                Some(true) => holding += 1,
                Some(false) => {}
                None => unassigned += 1,
            }
        }

        if holding >= constraint.k {
            Status::Satisfied
        } else if holding + unassigned < constraint.k {
            Status::Conflict
        } else if holding + unassigned == constraint.k {
            Status::Forcing
        } else {
            Status::Open
        }
    }

    fn assign(&mut self, lit: Lit) {
        self.assignment[lit.var] = Some(lit.positive);
        self.trail.push(lit.var);
    }

    fn backtrack(&mut self, len: usize) {
        while self.trail.len() > len {
            if let Some(var) = self.trail.pop() {
                self.assignment[var] = None;
            }
        }
    }

    /// Apply a constraint, returning false on conflict
    fn enforce(&mut self, pos: usize) -> bool {
        match self.status(pos) {
            Status::Conflict => false,
            Status::Forcing => {
                let constraint = self.constraint(pos);
                for &lit in &constraint.lits {
                    if self.assignment[lit.var].is_none() {
                        self.assign(lit);
                    }
                }
                true
            }
            Status::Satisfied | Status::Open => true,
        }
    }

    /// Propagate the assignments on the trail from `head` onwards
    fn propagate(&mut self, mut head: usize) -> bool {
        while head < self.trail.len() {
            let var = self.trail[head];
            head += 1;
            for i in 0..self.occurs[var].len() {
                let pos = self.occurs[var][i];
                if !self.enforce(pos) {
                    return false;
                }
            }
        }
        true
    }

    /// Enforce every constraint once, then propagate
    fn start(&mut self) -> bool {
        for pos in 0..self.active.len() {
            if !self.enforce(pos) {
                return false;
            }
        }
        self.propagate(0)
    }

    fn cost_of(&self, lit: Lit) -> u64 {
        let (if_true, if_false) = self.oracle.costs[lit.var];
        if lit.positive {
            if_true
        } else {
            if_false
        }
    }

    /// The group an open clause must take a true variable from, treating
    /// `taken` as true. None unless every open literal of the clause is a
    /// positive member of that one group.
    fn drawn_group(&self, pos: usize, taken: Option<Var>) -> Option<usize> {
        let mut group = None;
        for &lit in &self.constraint(pos).lits {
            if Some(lit.var) == taken {
                if lit.positive {
                    return None;
                }
                continue;
            }
            match self.value(lit) {
                Some(true) => return None,
                Some(false) => {}
                None if !lit.positive => return None,
                None => {
                    let of = self.group_of[lit.var];
                    match group {
                        Some(current) if current != of => return None,
                        _ => group = Some(of),
                    }
                }
            }
        }
        group
    }

    fn has_true(&self, group: usize) -> bool {
        self.groups[group]
            .iter()
            .any(|&var| self.assignment[var] == Some(true))
    }

    /// Groups from which every completion must set a variable, in the
    /// order they were found
    fn needed_groups(&self) -> Vec<usize> {
        let mut needed = vec![false; self.groups.len()];
        let mut order = Vec::new();
        for &pos in &self.clauses {
            if let Some(group) = self.drawn_group(pos, None) {
                if !needed[group] {
                    needed[group] = true;
                    order.push(group);
                }
            }
        }

        let mut head = 0;
        while head < order.len() {
            let group = order[head];
            head += 1;

            // Groups implied by whichever candidate gets picked
            let mut common: Option<Vec<usize>> = None;
            for &var in &self.groups[group] {
                if self.assignment[var].is_some() {
                    continue;
                }
                let implied: Vec<usize> = self.implied_by[var]
                    .iter()
                    .filter_map(|&pos| self.drawn_group(pos, Some(var)))
                    .collect();
                let next: Vec<usize> = match common {
                    None => implied,
                    Some(common) => common.into_iter().filter(|g| implied.contains(g)).collect(),
                };
                let exhausted = next.is_empty();
                common = Some(next);
                if exhausted {
                    break;
                }
            }

            for implied in common.unwrap_or_default() {
                if !needed[implied] {
                    needed[implied] = true;
                    order.push(implied);
                }
            }
        }

        order
    }

    /// Cost of the assignment so far plus the cheapest value of the rest,
    /// raised by the cheapest candidate of each needed group
    fn lower_bound(&self, needed: &[usize]) -> u64 {
        let mut bound: u64 = self
            .assignment
            .iter()
            .zip(&self.oracle.costs)
            .map(|(value, &(if_true, if_false))| match value {
                Some(true) => if_true,
                Some(false) => if_false,
                None => if_true.min(if_false),
            })
            .sum();

        for &group in needed {
            if self.has_true(group) {
                continue;
            }
            let extra = self.groups[group]
                .iter()
                .filter(|&&var| self.assignment[var].is_none())
                .map(|&var| {
                    let (if_true, if_false) = self.oracle.costs[var];
                    if_true - if_true.min(if_false)
                })
                .min();
            bound += extra.unwrap_or(0);
        }
        bound
    }

    fn first_open(&self) -> Option<usize> {
        (0..self.active.len()).find(|&pos| !matches!(self.status(pos), Status::Satisfied))
    }

    /// The cheapest candidate of the first needed group without a true
    /// variable, else the cheapest open literal of the constraint at `pos`
    fn decide(&self, needed: &[usize], pos: usize) -> Option<Lit> {
        for &group in needed {
            if self.has_true(group) {
                continue;
            }
            let mut choice: Option<Lit> = None;
            for &var in &self.groups[group] {
                if self.assignment[var].is_some() {
                    continue;
                }
                let lit = Lit { var, positive: true };
                if choice.map_or(true, |c| self.cost_of(lit) < self.cost_of(c)) {
                    choice = Some(lit);
                }
            }
            if choice.is_some() {
                return choice;
            }
        }

        let mut choice: Option<Lit> = None;
        for &lit in &self.constraint(pos).lits {
            if self.assignment[lit.var].is_some() {
                continue;
            }
            if choice.map_or(true, |c| self.cost_of(lit) < self.cost_of(c)) {
                choice = Some(lit);
            }
        }
        choice
    }

    /// Returns true when the search should stop
    fn search(&mut self) -> bool {
        self.nodes += 1;

        let needed = self.needed_groups();
        let bound = self.lower_bound(&needed);
        if self.optimize {
            if let Some((best, _)) = &self.best {
                if bound >= *best {
                    return false;
                }
            }
        }

        let Some(pos) = self.first_open() else {
            // Unconstrained variables take their cheaper value, false on a tie
            let values: Vec<bool> = self
                .assignment
                .iter()
                .zip(&self.oracle.costs)
                .map(|(value, &(if_true, if_false))| match value {
                    Some(value) => *value,
                    None => if_true < if_false,
                })
                .collect();
            self.best = Some((bound, values));
            return !self.optimize;
        };

        let Some(lit) = self.decide(&needed, pos) else {
            return false;
        };

        for branch in [lit, lit.negate()] {
            let mark = self.trail.len();
            self.assign(branch);
            if self.propagate(mark) && self.search() {
                return true;
            }
            self.backtrack(mark);
        }

        false
    }
}
