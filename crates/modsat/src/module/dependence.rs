use std::collections::BTreeSet;
use std::fmt;

use modsat_version::ModuleIdQuery;
use serde::{Deserialize, Serialize};

/// Modifier flags on a declared dependence.
///
/// Only [`Modifier::Optional`] influences resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Optional,
    Public,
    Local,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Optional => "optional",
            Modifier::Public => "public",
            Modifier::Local => "local",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dependence on a module, view or alias matching a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewDependence {
    query: ModuleIdQuery,
    modifiers: BTreeSet<Modifier>,
}

impl ViewDependence {
    pub fn new(query: ModuleIdQuery, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        ViewDependence {
            query,
            modifiers: modifiers.into_iter().collect(),
        }
    }

    pub fn query(&self) -> &ModuleIdQuery {
        &self.query
    }

    pub fn modifiers(&self) -> &BTreeSet<Modifier> {
        &self.modifiers
    }

    pub fn is_optional(&self) -> bool {
        self.modifiers.contains(&Modifier::Optional)
    }
}

impl fmt::Display for ViewDependence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "requires ")?;
        for modifier in &self.modifiers {
            write!(f, "{} ", modifier)?;
        }
        write!(f, "{}", self.query)
    }
}

/// A dependence on some provider of a service interface
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceDependence {
    service: String,
    modifiers: BTreeSet<Modifier>,
}

impl ServiceDependence {
    pub fn new(service: impl Into<String>, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        ServiceDependence {
            service: service.into(),
            modifiers: modifiers.into_iter().collect(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn modifiers(&self) -> &BTreeSet<Modifier> {
        &self.modifiers
    }
}

impl fmt::Display for ServiceDependence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "requires ")?;
        for modifier in &self.modifiers {
            write!(f, "{} ", modifier)?;
        }
        write!(f, "service {}", self.service)
    }
}
