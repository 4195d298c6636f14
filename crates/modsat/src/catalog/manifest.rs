//! JSON catalog manifests
//!
//! ```json
//! {
//!   "modules": [
//!     {
//!       "id": "x@1",
//!       "requires": ["y@>=2", { "query": "z", "modifiers": ["optional"] }],
//!       "requires_services": ["si"],
//!       "permits": ["a"],
//!       "aliases": ["xa@1"],
//!       "provides": { "si": ["x.SiImpl"] },
//!       "views": [{ "name": "xv", "aliases": [], "permits": [], "provides": {} }]
//!     }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::module::{module, Modifier, ModuleInfoBuilder};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogManifest {
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

/// A dependence written either as a bare query string or with modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequireEntry {
    Query(String),
    Detailed {
        query: String,
        #[serde(default)]
        modifiers: Vec<Modifier>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceRequireEntry {
    Service(String),
    Detailed {
        service: String,
        #[serde(default)]
        modifiers: Vec<Modifier>,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<RequireEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires_services: Vec<ServiceRequireEntry>,

    /// Permits of the default view
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permits: Vec<String>,

    /// Aliases of the default view
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Services provided by the default view
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub provides: IndexMap<String, Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<ViewEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permits: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub provides: IndexMap<String, Vec<String>>,
}

fn attach_view_details(
    mut builder: ModuleInfoBuilder,
    aliases: &[String],
    permits: &[String],
    provides: &IndexMap<String, Vec<String>>,
) -> ModuleInfoBuilder {
    for alias in aliases {
        builder = builder.alias(alias);
    }
    for name in permits {
        builder = builder.permits(name);
    }
    for (interface, implementations) in provides {
        for implementation in implementations {
            builder = builder.provides_service(interface, implementation);
        }
    }
    builder
}

impl ModuleEntry {
    pub fn to_builder(&self) -> ModuleInfoBuilder {
        let mut builder = module(&self.id);

        for require in &self.requires {
            builder = match require {
                RequireEntry::Query(query) => builder.requires(query),
                RequireEntry::Detailed { query, modifiers } => builder.requires_with(query, modifiers),
            };
        }
        for require in &self.requires_services {
            builder = match require {
                ServiceRequireEntry::Service(service) => builder.requires_service(service),
                ServiceRequireEntry::Detailed { service, modifiers } => {
                    builder.requires_service_with(service, modifiers)
                }
            };
        }

        builder = attach_view_details(builder, &self.aliases, &self.permits, &self.provides);
        for view in &self.views {
            builder = attach_view_details(builder.view(&view.name), &view.aliases, &view.permits, &view.provides);
        }

        builder
    }
}
