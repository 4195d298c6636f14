//! Module version type

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::VersionParseError;

lazy_static! {
    static ref VERSION_REGEX: Regex =
        Regex::new(r"^(\d+(?:\.\d+)*)(?:-([0-9A-Za-z][0-9A-Za-z.]*))?$").unwrap();
}

/// A module version such as `1`, `1.2.3` or `2.0-beta1`.
///
/// Trailing zero components are insignificant, so `1` and `1.0` compare
/// equal. A qualified version sorts before the same numeric version without
/// a qualifier (`2.0-beta1 < 2.0`), and qualifiers compare lexically.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
    qualifier: Option<String>,
    original: String,
}

impl Version {
    /// Parse a version string
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let trimmed = input.trim();
        let captures = VERSION_REGEX
            .captures(trimmed)
            .ok_or_else(|| VersionParseError::InvalidVersion(input.to_string()))?;

        let mut components = Vec::new();
        for part in captures[1].split('.') {
            let n = part
                .parse::<u64>()
                .map_err(|_| VersionParseError::InvalidVersion(input.to_string()))?;
            components.push(n);
        }

        Ok(Version {
            components,
            qualifier: captures.get(2).map(|m| m.as_str().to_string()),
            original: trimmed.to_string(),
        })
    }

    /// Numeric components as written, including trailing zeros
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Qualifier following the `-`, if any
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Components with trailing zeros removed, used for equality and hashing
    fn significant(&self) -> &[u64] {
        let mut end = self.components.len();
        while end > 0 && self.components[end - 1] == 0 {
            end -= 1;
        }
        &self.components[..end]
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
        self.qualifier.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }

        match (&self.qualifier, &other.qualifier) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
