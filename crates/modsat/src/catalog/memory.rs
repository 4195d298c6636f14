use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use modsat_version::ModuleId;

use super::{Catalog, CatalogManifest};
use crate::error::CatalogError;
use crate::module::{ModuleInfo, ModuleInfoBuilder};

/// A catalog held entirely in memory.
///
/// Each module is indexed under its canonical id and under every view and
/// alias id it declares.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    /// Canonical id to module, in insertion order
    modules: IndexMap<ModuleId, Arc<ModuleInfo>>,

    /// Every declared id to its module
    by_id: HashMap<ModuleId, Arc<ModuleInfo>>,

    /// Declared ids grouped by name
    by_name: HashMap<String, BTreeSet<ModuleId>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module declaration.
    ///
    /// Fails without modifying the catalog if any id of the module is
    /// already declared.
    pub fn add(&mut self, info: ModuleInfo) -> Result<&mut Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for id in info.declared_ids() {
            if self.by_id.contains_key(id) || !seen.insert(id) {
                return Err(CatalogError::Duplicate(id.clone()));
            }
        }

        let info = Arc::new(info);
        for id in info.declared_ids() {
            self.by_id.insert(id.clone(), Arc::clone(&info));
            self.by_name
                .entry(id.name().to_string())
                .or_default()
                .insert(id.clone());
        }
        self.modules.insert(info.id().clone(), info);

        Ok(self)
    }

    /// Build and add a module declaration
    pub fn add_module(&mut self, builder: ModuleInfoBuilder) -> Result<&mut Self, CatalogError> {
        let info = builder.build()?;
        self.add(info)
    }

    /// Load a catalog from a JSON manifest string
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let manifest: CatalogManifest = serde_json::from_str(json)?;
        Self::from_manifest(&manifest)
    }

    /// Load a catalog from a JSON manifest file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_manifest(manifest: &CatalogManifest) -> Result<Self, CatalogError> {
        let mut catalog = MemoryCatalog::new();
        for entry in &manifest.modules {
            catalog.add_module(entry.to_builder())?;
        }
        log::debug!("Loaded catalog with {} modules", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules in insertion order
    pub fn modules(&self) -> impl Iterator<Item = &Arc<ModuleInfo>> {
        self.modules.values()
    }
}

impl Catalog for MemoryCatalog {
    fn ids_for_name(&self, name: &str) -> Result<Vec<ModuleId>, CatalogError> {
        Ok(self
            .by_name
            .get(name)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn info_for(&self, id: &ModuleId) -> Result<Arc<ModuleInfo>, CatalogError> {
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    fn all_declared_ids(&self) -> Result<Vec<ModuleId>, CatalogError> {
        Ok(self.modules.keys().cloned().collect())
    }
}
