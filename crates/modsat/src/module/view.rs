use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use modsat_version::ModuleId;

use super::ModuleInfo;

/// An addressable identity of a module.
///
/// The first view of every module carries the module's own id. Further
/// views have ids of their own and may be reached through alias ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleView {
    pub(crate) id: ModuleId,
    pub(crate) aliases: IndexSet<ModuleId>,
    /// Module names allowed to depend on this view, empty means anyone
    pub(crate) permits: IndexSet<String>,
    /// Service interface to implementation names
    pub(crate) services: IndexMap<String, IndexSet<String>>,
}

impl ModuleView {
    pub fn new(id: ModuleId) -> Self {
        ModuleView {
            id,
            aliases: IndexSet::new(),
            permits: IndexSet::new(),
            services: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn aliases(&self) -> &IndexSet<ModuleId> {
        &self.aliases
    }

    pub fn permits(&self) -> &IndexSet<String> {
        &self.permits
    }

    /// Check whether a module of the given name may depend on this view
    pub fn permits_module(&self, name: &str) -> bool {
        self.permits.is_empty() || self.permits.contains(name)
    }

    pub fn services(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.services
    }

    pub fn provides_service(&self, interface: &str) -> bool {
        self.services.contains_key(interface)
    }

    /// Check whether `id` addresses this view directly or through an alias
    pub fn answers_to(&self, id: &ModuleId) -> bool {
        &self.id == id || self.aliases.contains(id)
    }
}

/// Shared handle on one view of a module
#[derive(Debug, Clone)]
pub struct ModuleViewRef {
    module: Arc<ModuleInfo>,
    index: usize,
}

impl ModuleViewRef {
    /// The default view, whose id is the module id
    pub fn default_view(module: Arc<ModuleInfo>) -> Self {
        ModuleViewRef { module, index: 0 }
    }

    /// The view addressed by `id`, either its view id or one of its aliases
    pub fn for_id(module: Arc<ModuleInfo>, id: &ModuleId) -> Option<Self> {
        let index = module.views().iter().position(|v| v.answers_to(id))?;
        Some(ModuleViewRef { module, index })
    }

    pub fn view(&self) -> &ModuleView {
        &self.module.views()[self.index]
    }

    pub fn id(&self) -> &ModuleId {
        self.view().id()
    }

    pub fn module(&self) -> &Arc<ModuleInfo> {
        &self.module
    }
}

impl PartialEq for ModuleViewRef {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.module.id() == other.module.id()
    }
}

impl Eq for ModuleViewRef {}

impl fmt::Display for ModuleViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id() == self.module.id() {
            write!(f, "{}", self.id())
        } else {
            write!(f, "{} (view of {})", self.id(), self.module.id())
        }
    }
}
