use modsat_version::{ModuleId, ModuleIdQuery, VersionParseError};

use super::{Modifier, ModuleInfo, ModuleView, ServiceDependence, ViewDependence};

/// Start building a module declaration for `id` (`name@version`)
pub fn module(id: &str) -> ModuleInfoBuilder {
    ModuleInfoBuilder::new(id)
}

/// Fluent builder for [`ModuleInfo`].
///
/// Aliases, permits and provided services attach to the most recently
/// declared view, which is the default view until [`view`](Self::view) is
/// called. View ids take the module version. Parse errors are kept and
/// reported by [`build`](Self::build).
///
/// ```
/// use modsat::module::module;
///
/// let info = module("x@1")
///     .requires("y@>=2")
///     .requires_optional("z")
///     .view("xv")
///     .alias("xa@1")
///     .provides_service("si", "x.Impl")
///     .build()
///     .unwrap();
///
/// assert_eq!(info.views().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ModuleInfoBuilder {
    info: Option<ModuleInfo>,
    error: Option<VersionParseError>,
}

impl ModuleInfoBuilder {
    pub fn new(id: &str) -> Self {
        match ModuleId::parse(id) {
            Ok(id) => ModuleInfoBuilder {
                info: Some(ModuleInfo::new(id)),
                error: None,
            },
            Err(e) => ModuleInfoBuilder {
                info: None,
                error: Some(e),
            },
        }
    }

    fn record(&mut self, error: VersionParseError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn current_view(&mut self) -> Option<&mut ModuleView> {
        self.info.as_mut().and_then(|info| info.views.last_mut())
    }

    /// Add a dependence with the given modifiers
    pub fn requires_with(mut self, query: &str, modifiers: &[Modifier]) -> Self {
        match ModuleIdQuery::parse(query) {
            Ok(query) => {
                if let Some(info) = self.info.as_mut() {
                    info.requires
                        .push(ViewDependence::new(query, modifiers.iter().copied()));
                }
            }
            Err(e) => self.record(e),
        }
        self
    }

    pub fn requires(self, query: &str) -> Self {
        self.requires_with(query, &[])
    }

    pub fn requires_optional(self, query: &str) -> Self {
        self.requires_with(query, &[Modifier::Optional])
    }

    pub fn requires_service_with(mut self, service: &str, modifiers: &[Modifier]) -> Self {
        if let Some(info) = self.info.as_mut() {
            info.requires_services
                .push(ServiceDependence::new(service, modifiers.iter().copied()));
        }
        self
    }

    pub fn requires_service(self, service: &str) -> Self {
        self.requires_service_with(service, &[])
    }

    /// Declare a further view named `name`, carrying the module version
    pub fn view(mut self, name: &str) -> Self {
        if name.is_empty() {
            self.record(VersionParseError::InvalidModuleId {
                input: name.to_string(),
                reason: "empty view name".to_string(),
            });
            return self;
        }
        if let Some(info) = self.info.as_mut() {
            let id = ModuleId::new(name, info.id.version().clone());
            info.views.push(ModuleView::new(id));
        }
        self
    }

    /// Add an alias id (`name@version`) to the current view
    pub fn alias(mut self, id: &str) -> Self {
        match ModuleId::parse(id) {
            Ok(id) => {
                if let Some(view) = self.current_view() {
                    view.aliases.insert(id);
                }
            }
            Err(e) => self.record(e),
        }
        self
    }

    /// Restrict the current view to dependents named `name`
    pub fn permits(mut self, name: &str) -> Self {
        if let Some(view) = self.current_view() {
            view.permits.insert(name.to_string());
        }
        self
    }

    pub fn provides_service(mut self, interface: &str, implementation: &str) -> Self {
        if let Some(view) = self.current_view() {
            view.services
                .entry(interface.to_string())
                .or_default()
                .insert(implementation.to_string());
        }
        self
    }

    pub fn build(self) -> Result<ModuleInfo, VersionParseError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.info.ok_or_else(|| VersionParseError::InvalidModuleId {
            input: String::new(),
            reason: "no module id".to_string(),
        })
    }
}
