//! Module identifiers and module id queries

use std::fmt;
use std::str::FromStr;

use crate::{Version, VersionParseError, VersionQuery};

/// A concrete module identity, written `name@version`.
///
/// Ids are ordered by name, then by version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    name: String,
    version: Version,
}

impl ModuleId {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        ModuleId {
            name: name.into(),
            version,
        }
    }

    /// Parse a `name@version` string
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let trimmed = input.trim();
        let (name, version) = trimmed.split_once('@').ok_or_else(|| VersionParseError::InvalidModuleId {
            input: input.to_string(),
            reason: "missing '@version'".to_string(),
        })?;

        if name.is_empty() {
            return Err(VersionParseError::InvalidModuleId {
                input: input.to_string(),
                reason: "empty module name".to_string(),
            });
        }

        let version = Version::parse(version).map_err(|e| VersionParseError::InvalidModuleId {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        Ok(ModuleId::new(name, version))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Same name, another version
    pub fn with_version(&self, version: Version) -> Self {
        ModuleId::new(self.name.clone(), version)
    }
}

impl FromStr for ModuleId {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleId::parse(s)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A request for module ids of one name whose version satisfies a query.
///
/// Written `name` (any version) or `name@query`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdQuery {
    name: String,
    query: VersionQuery,
}

impl ModuleIdQuery {
    pub fn new(name: impl Into<String>, query: VersionQuery) -> Self {
        ModuleIdQuery {
            name: name.into(),
            query,
        }
    }

    /// Any version of `name`
    pub fn any(name: impl Into<String>) -> Self {
        ModuleIdQuery::new(name, VersionQuery::any())
    }

    /// Exactly the given id
    pub fn exact(id: &ModuleId) -> Self {
        ModuleIdQuery::new(id.name(), VersionQuery::exact(id.version().clone()))
    }

    /// Parse `name` or `name@query`
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let trimmed = input.trim();
        let (name, query) = match trimmed.split_once('@') {
            Some((name, query)) => (name, Some(query)),
            None => (trimmed, None),
        };

        if name.is_empty() {
            return Err(VersionParseError::InvalidModuleIdQuery {
                input: input.to_string(),
                reason: "empty module name".to_string(),
            });
        }

        let query = match query {
            Some(q) => VersionQuery::parse(q).map_err(|e| VersionParseError::InvalidModuleIdQuery {
                input: input.to_string(),
                reason: e.to_string(),
            })?,
            None => VersionQuery::any(),
        };

        Ok(ModuleIdQuery::new(name, query))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> &VersionQuery {
        &self.query
    }

    /// Check whether an id has this name and a matching version
    pub fn matches(&self, id: &ModuleId) -> bool {
        self.name == id.name() && self.query.matches(id.version())
    }
}

impl FromStr for ModuleIdQuery {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleIdQuery::parse(s)
    }
}

impl fmt::Display for ModuleIdQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_any() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}@{}", self.name, self.query)
        }
    }
}
