//! Version queries combining several constraints

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use super::Constraint;
use crate::{Version, VersionParseError};

lazy_static! {
    static ref OPERATOR_SPACE_REGEX: Regex = Regex::new(r"(<=|>=|==|!=|<>|=|<|>)\s+").unwrap();
    static ref SEPARATOR_REGEX: Regex = Regex::new(r"[,\s]+").unwrap();
}

/// A version predicate: a disjunction of conjunctions of single constraints.
///
/// An empty disjunction matches every version (`*`).
///
/// ```text
/// *             any version
/// 1.2           exactly 1.2
/// >=1,<3        conjunction
/// <2 || >=4     disjunction
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VersionQuery {
    alternatives: Vec<Vec<Constraint>>,
}

impl VersionQuery {
    /// A query matching every version
    pub fn any() -> Self {
        VersionQuery::default()
    }

    /// A query matching exactly one version
    pub fn exact(version: Version) -> Self {
        VersionQuery {
            alternatives: vec![vec![Constraint::new(super::Operator::Equal, version)]],
        }
    }

    /// Parse a query string
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(VersionQuery::any());
        }

        let mut alternatives = Vec::new();
        for alternative in trimmed.split("||") {
            let normalized = OPERATOR_SPACE_REGEX.replace_all(alternative.trim(), "$1");
            let mut conjunction = Vec::new();
            for token in SEPARATOR_REGEX.split(&normalized) {
                if token.is_empty() {
                    continue;
                }
                conjunction.push(Constraint::parse(token)?);
            }
            if conjunction.is_empty() {
                return Err(VersionParseError::InvalidConstraint(input.to_string()));
            }
            alternatives.push(conjunction);
        }

        Ok(VersionQuery { alternatives })
    }

    /// Check if this query matches every version
    pub fn is_any(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// The conjunctions making up this query
    pub fn alternatives(&self) -> &[Vec<Constraint>] {
        &self.alternatives
    }

    /// Check whether a version satisfies this query
    pub fn matches(&self, version: &Version) -> bool {
        self.is_any()
            || self
                .alternatives
                .iter()
                .any(|conjunction| conjunction.iter().all(|c| c.matches(version)))
    }
}

impl FromStr for VersionQuery {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionQuery::parse(s)
    }
}

impl fmt::Display for VersionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return write!(f, "*");
        }

        let alternatives: Vec<String> = self
            .alternatives
            .iter()
            .map(|conjunction| {
                conjunction
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();
        write!(f, "{}", alternatives.join(" || "))
    }
}
