//! Module catalogs
//!
//! A [`Catalog`] answers three questions: which ids exist for a name, what
//! module declares a given id, and which modules are declared at all. The
//! resolver only ever reads from a catalog.

mod manifest;
mod memory;

use std::sync::Arc;

use modsat_version::ModuleId;

use crate::error::CatalogError;
use crate::module::ModuleInfo;

pub use manifest::{CatalogManifest, ModuleEntry, RequireEntry, ServiceRequireEntry, ViewEntry};
pub use memory::MemoryCatalog;

/// Read-only lookup of module declarations
pub trait Catalog {
    /// Ids declared under `name`, canonical, view and alias ids alike, in
    /// ascending version order
    fn ids_for_name(&self, name: &str) -> Result<Vec<ModuleId>, CatalogError>;

    /// The module declaring `id` as its own id, a view id or an alias
    fn info_for(&self, id: &ModuleId) -> Result<Arc<ModuleInfo>, CatalogError>;

    /// Canonical ids of every declared module
    fn all_declared_ids(&self) -> Result<Vec<ModuleId>, CatalogError>;
}
