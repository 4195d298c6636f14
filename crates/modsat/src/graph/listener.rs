use modsat_version::{ModuleId, ModuleIdQuery};

use crate::module::{ModuleInfo, ModuleViewRef, ViewDependence};

/// Receives discovery events from [`super::ModuleGraphTraverser`].
///
/// Events arrive in depth first order. A matching event is reported every
/// time a module is reached, even when its dependences were already
/// expanded.
pub trait ModuleGraphListener {
    /// A root query is about to be matched
    fn on_root_dependence(&mut self, depth: usize, query: &ModuleIdQuery);

    /// `id` matched a root query and resolves to `view`
    fn on_matching_root_dependence(
        &mut self,
        depth: usize,
        query: &ModuleIdQuery,
        id: &ModuleId,
        view: &ModuleViewRef,
    );

    /// A declared dependence of `requiring` is about to be matched
    fn on_view_dependence(&mut self, depth: usize, requiring: &ModuleInfo, dependence: &ViewDependence);

    /// `id` matched a dependence of `requiring` and resolves to `view`
    fn on_matching_view_dependence(
        &mut self,
        depth: usize,
        requiring: &ModuleInfo,
        dependence: &ViewDependence,
        id: &ModuleId,
        view: &ModuleViewRef,
    );
}
