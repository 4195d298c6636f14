//! Single version constraint implementation

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use super::Operator;
use crate::{Version, VersionParseError};

lazy_static! {
    static ref CONSTRAINT_REGEX: Regex = Regex::new(r"^(<=|>=|==|!=|<>|=|<|>)?(.+)$").unwrap();
}

/// A single version constraint (e.g., ">=1.0")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    operator: Operator,
    version: Version,
}

impl Constraint {
    /// Create a new constraint
    pub fn new(operator: Operator, version: Version) -> Self {
        Constraint { operator, version }
    }

    /// Parse a single constraint; a bare version means equality
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let trimmed = input.trim();
        let captures = CONSTRAINT_REGEX
            .captures(trimmed)
            .ok_or_else(|| VersionParseError::InvalidConstraint(input.to_string()))?;

        let operator = match captures.get(1) {
            Some(op) => op.as_str().parse()?,
            None => Operator::Equal,
        };
        let version = Version::parse(&captures[2])
            .map_err(|_| VersionParseError::InvalidConstraint(input.to_string()))?;

        Ok(Constraint { operator, version })
    }

    /// Get the operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Get the version
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Check whether a version satisfies this constraint
    pub fn matches(&self, version: &Version) -> bool {
        self.operator.accepts(version.cmp(&self.version))
    }
}

impl FromStr for Constraint {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Constraint::parse(s)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::Equal => write!(f, "{}", self.version),
            op => write!(f, "{}{}", op, self.version),
        }
    }
}
