//! Service provider discovery
//!
//! A module requiring a service interface needs, in a later phase, every
//! module of the catalog providing that interface. Providers are looked up
//! across the whole catalog, not only the resolved graph.

use std::cell::RefCell;
use std::collections::HashMap;

use indexmap::IndexSet;
use log::debug;
use modsat_version::ModuleId;

use crate::catalog::Catalog;
use crate::error::CatalogError;

/// Finds provider modules for the services required by a set of modules
pub struct ServiceDependences<'a> {
    catalog: &'a dyn Catalog,

    /// Interface name to providing module ids
    providers: RefCell<HashMap<String, IndexSet<ModuleId>>>,
}

impl<'a> ServiceDependences<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        ServiceDependences {
            catalog,
            providers: RefCell::new(HashMap::new()),
        }
    }

    /// Every module of the catalog providing `interface` from any view
    pub fn provider_modules_for_interface(&self, interface: &str) -> Result<IndexSet<ModuleId>, CatalogError> {
        if let Some(cached) = self.providers.borrow().get(interface) {
            return Ok(cached.clone());
        }

        let mut providers = IndexSet::new();
        for id in self.catalog.all_declared_ids()? {
            let info = self.catalog.info_for(&id)?;
            if info.provides_service(interface) {
                providers.insert(info.id().clone());
            }
        }
        debug!("Service {} has {} provider modules", interface, providers.len());

        self.providers
            .borrow_mut()
            .insert(interface.to_string(), providers.clone());
        Ok(providers)
    }

    /// Providers of every service `id` requires.
    ///
    /// A consumer unknown to the catalog requires nothing.
    pub fn provider_modules_for(&self, id: &ModuleId) -> Result<IndexSet<ModuleId>, CatalogError> {
        let info = match self.catalog.info_for(id) {
            Ok(info) => info,
            Err(CatalogError::NotFound(_)) => return Ok(IndexSet::new()),
            Err(e) => return Err(e),
        };

        let mut providers = IndexSet::new();
        for dependence in info.requires_services() {
            providers.extend(self.provider_modules_for_interface(dependence.service())?);
        }
        Ok(providers)
    }

    /// Union of the providers for every consumer, in consumer order
    pub fn provider_modules<'i>(
        &self,
        ids: impl IntoIterator<Item = &'i ModuleId>,
    ) -> Result<IndexSet<ModuleId>, CatalogError> {
        let mut providers = IndexSet::new();
        for id in ids {
            providers.extend(self.provider_modules_for(id)?);
        }
        Ok(providers)
    }
}
