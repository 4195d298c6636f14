use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use modsat_version::{ModuleId, ModuleIdQuery};

use super::ModuleGraphListener;
use crate::module::{ModuleInfo, ModuleViewRef, ViewDependence};

/// The dependency graph reached from a set of roots, reified into maps.
///
/// Built by listening to a traversal. Matching sets hold view ids: a match
/// through an alias records the view owning the alias.
#[derive(Debug, Default, Clone)]
pub struct ReifiedDependencies {
    /// Discovered module, view and alias ids to their view, first writer
    /// wins, in discovery order
    id_to_view: IndexMap<ModuleId, ModuleViewRef>,

    /// Canonical module ids grouped by name, ascending
    name_to_ids: IndexMap<String, BTreeSet<ModuleId>>,

    /// Root queries in declaration order to matching view ids
    roots: IndexMap<ModuleIdQuery, BTreeSet<ModuleId>>,

    /// Canonical module ids in depth first discovery order
    modules: IndexSet<ModuleId>,

    /// Dependences to matching view ids; an empty set means the dependence
    /// was evaluated and matched nothing
    dependence_to_matching_ids: IndexMap<ViewDependence, BTreeSet<ModuleId>>,
}

impl ReifiedDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all state so the snapshot can be filled by another traversal
    pub fn reset(&mut self) {
        self.id_to_view.clear();
        self.name_to_ids.clear();
        self.roots.clear();
        self.modules.clear();
        self.dependence_to_matching_ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.modules.is_empty()
    }

    pub fn id_to_view(&self) -> &IndexMap<ModuleId, ModuleViewRef> {
        &self.id_to_view
    }

    pub fn view_of(&self, id: &ModuleId) -> Option<&ModuleViewRef> {
        self.id_to_view.get(id)
    }

    /// The module declaring a discovered id
    pub fn module_of(&self, id: &ModuleId) -> Option<&Arc<ModuleInfo>> {
        self.id_to_view.get(id).map(|view| view.module())
    }

    pub fn name_to_ids(&self) -> &IndexMap<String, BTreeSet<ModuleId>> {
        &self.name_to_ids
    }

    pub fn versions_of(&self, name: &str) -> Option<&BTreeSet<ModuleId>> {
        self.name_to_ids.get(name)
    }

    pub fn roots(&self) -> &IndexMap<ModuleIdQuery, BTreeSet<ModuleId>> {
        &self.roots
    }

    pub fn modules(&self) -> &IndexSet<ModuleId> {
        &self.modules
    }

    pub fn dependence_to_matching_ids(&self) -> &IndexMap<ViewDependence, BTreeSet<ModuleId>> {
        &self.dependence_to_matching_ids
    }

    /// Ids matching a dependence, `None` if it was never evaluated
    pub fn matching_ids(&self, dependence: &ViewDependence) -> Option<&BTreeSet<ModuleId>> {
        self.dependence_to_matching_ids.get(dependence)
    }

    fn on_module_view(&mut self, id: &ModuleId, view: &ModuleViewRef) {
        self.on_module_info(view.module());

        self.id_to_view
            .entry(view.id().clone())
            .or_insert_with(|| view.clone());
        if id != view.id() {
            self.id_to_view.entry(id.clone()).or_insert_with(|| view.clone());
        }
    }

    fn on_module_info(&mut self, info: &Arc<ModuleInfo>) {
        let id = info.id();

        self.modules.insert(id.clone());
        self.name_to_ids
            .entry(id.name().to_string())
            .or_default()
            .insert(id.clone());
        self.id_to_view
            .entry(id.clone())
            .or_insert_with(|| ModuleViewRef::default_view(Arc::clone(info)));
    }
}

impl ModuleGraphListener for ReifiedDependencies {
    fn on_root_dependence(&mut self, _depth: usize, query: &ModuleIdQuery) {
        self.roots.entry(query.clone()).or_default();
    }

    fn on_matching_root_dependence(
        &mut self,
        _depth: usize,
        query: &ModuleIdQuery,
        id: &ModuleId,
        view: &ModuleViewRef,
    ) {
        self.roots
            .entry(query.clone())
            .or_default()
            .insert(view.id().clone());
        self.on_module_view(id, view);
    }

    fn on_view_dependence(&mut self, _depth: usize, _requiring: &ModuleInfo, dependence: &ViewDependence) {
        self.dependence_to_matching_ids
            .entry(dependence.clone())
            .or_default();
    }

    fn on_matching_view_dependence(
        &mut self,
        _depth: usize,
        _requiring: &ModuleInfo,
        dependence: &ViewDependence,
        id: &ModuleId,
        view: &ModuleViewRef,
    ) {
        self.dependence_to_matching_ids
            .entry(dependence.clone())
            .or_default()
            .insert(view.id().clone());
        self.on_module_view(id, view);
    }
}

fn write_ids(f: &mut fmt::Formatter<'_>, ids: Option<&BTreeSet<ModuleId>>) -> fmt::Result {
    write!(f, "[")?;
    for (i, id) in ids.into_iter().flatten().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", id)?;
    }
    write!(f, "]")
}

impl fmt::Display for ReifiedDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (query, ids) in &self.roots {
            write!(f, "{} -> ", query)?;
            write_ids(f, Some(ids))?;
            writeln!(f)?;
        }

        for id in &self.modules {
            writeln!(f, "{}", id)?;
            if let Some(info) = self.module_of(id) {
                for dependence in info.requires() {
                    write!(f, "  {} -> ", dependence)?;
                    write_ids(f, self.matching_ids(dependence))?;
                    writeln!(f)?;
                }
            }
        }

        Ok(())
    }
}
