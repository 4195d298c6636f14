use std::fmt;

use modsat_version::ModuleId;

use super::{ModuleView, ServiceDependence, ViewDependence};

/// A module declaration as read from a catalog.
///
/// `views[0]` is always the default view and carries the module id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub(crate) id: ModuleId,
    pub(crate) views: Vec<ModuleView>,
    pub(crate) requires: Vec<ViewDependence>,
    pub(crate) requires_services: Vec<ServiceDependence>,
}

impl ModuleInfo {
    /// A module with only its default view and no dependences
    pub fn new(id: ModuleId) -> Self {
        ModuleInfo {
            views: vec![ModuleView::new(id.clone())],
            id,
            requires: Vec::new(),
            requires_services: Vec::new(),
        }
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn default_view(&self) -> &ModuleView {
        &self.views[0]
    }

    pub fn views(&self) -> &[ModuleView] {
        &self.views
    }

    /// Declared module dependences, in declaration order
    pub fn requires(&self) -> &[ViewDependence] {
        &self.requires
    }

    pub fn requires_services(&self) -> &[ServiceDependence] {
        &self.requires_services
    }

    /// Every id under which this module can be addressed
    pub fn declared_ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.views
            .iter()
            .flat_map(|view| std::iter::once(view.id()).chain(view.aliases().iter()))
    }

    /// Check whether any view provides the service interface
    pub fn provides_service(&self, interface: &str) -> bool {
        self.views.iter().any(|view| view.provides_service(interface))
    }
}

impl fmt::Display for ModuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {}", self.id)?;
        for dependence in &self.requires {
            writeln!(f, "  {}", dependence)?;
        }
        for dependence in &self.requires_services {
            writeln!(f, "  {}", dependence)?;
        }
        for (index, view) in self.views.iter().enumerate() {
            if index > 0 {
                writeln!(f, "  view {}", view.id())?;
            }
            for alias in view.aliases() {
                writeln!(f, "    alias {}", alias)?;
            }
            if !view.permits().is_empty() {
                let permits: Vec<&str> = view.permits().iter().map(String::as_str).collect();
                writeln!(f, "    permits {}", permits.join(", "))?;
            }
            for (interface, implementations) in view.services() {
                for implementation in implementations {
                    writeln!(f, "    provides service {} with {}", interface, implementation)?;
                }
            }
        }
        Ok(())
    }
}
