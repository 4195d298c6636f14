use std::fmt;

use modsat_version::ModuleId;

/// Prefix of the literal standing for "no version of this module"
pub const ABSENT_PREFIX: &str = "*";

/// A named boolean variable, possibly negated.
///
/// Module literals are named by the module id (`x@1`); absence literals by
/// `*` and the module name (`*x`). Negation displays as `-x@1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    name: String,
    positive: bool,
}

impl Literal {
    pub fn new(name: impl Into<String>, positive: bool) -> Self {
        Literal {
            name: name.into(),
            positive,
        }
    }

    /// The literal selecting a module id
    pub fn module(id: &ModuleId) -> Self {
        Literal::new(id.to_string(), true)
    }

    /// The literal standing for the absence of every version of `name`
    pub fn absent(name: &str) -> Self {
        Literal::new(format!("{}{}", ABSENT_PREFIX, name), true)
    }

    pub fn negate(&self) -> Self {
        Literal {
            name: self.name.clone(),
            positive: !self.positive,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// Evaluate under an assignment of the variable
    pub fn eval(&self, value: bool) -> bool {
        value == self.positive
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.name)
        } else {
            write!(f, "-{}", self.name)
        }
    }
}
