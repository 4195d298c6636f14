use thiserror::Error;

/// Errors raised while parsing versions, queries and module ids
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("Invalid version \"{0}\"")]
    InvalidVersion(String),

    #[error("Invalid operator \"{operator}\", expected one of: {expected}")]
    InvalidOperator { operator: String, expected: String },

    #[error("Invalid version constraint \"{0}\"")]
    InvalidConstraint(String),

    #[error("Invalid module id \"{input}\": {reason}")]
    InvalidModuleId { input: String, reason: String },

    #[error("Invalid module id query \"{input}\": {reason}")]
    InvalidModuleIdQuery { input: String, reason: String },
}
