//! Error types for pipecheck
//!
//! This module defines the error types used throughout the crate, following
//! a hierarchical structure: rule-level configuration faults, security
//! policy construction errors, and the top-level validation error.
//!
//! Field violations (a rule failing on bad data) are never errors; they
//! are carried as data inside [`ValidationResult`](crate::ValidationResult).
//! Errors here always indicate a broken rule declaration or policy, i.e. a
//! caller programming error.

use crate::types::ValidationResult;

/// Configuration faults raised while resolving or executing rules
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A rule name could not be resolved in the registry
    #[error("unknown validation rule: {0}")]
    UnknownRule(String),

    /// A rule could not be registered (blank or invalid name)
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// A rule that requires a parameter was declared without one
    #[error("rule `{rule}` requires a parameter (e.g. `{example}`)")]
    MissingParameter { rule: String, example: String },

    /// A rule parameter could not be parsed
    #[error("invalid parameter for rule `{rule}`: {message}")]
    InvalidParameter { rule: String, message: String },

    /// A sibling field reference failed the security policy's name pattern
    #[error("invalid field reference `{0}` in rule parameter")]
    InvalidFieldReference(String),

    /// A context-aware rule was used where no enclosing object exists
    #[error("rule `{0}` requires an enclosing object and cannot be used for single-value validation")]
    ContextRequired(String),

    /// An enum-constrained rule was used where no enumeration token exists
    #[error("rule `{0}` requires an enumeration token and cannot be used for single-value validation")]
    MembersRequired(String),
}

/// Errors building a [`SecurityPolicy`](crate::SecurityPolicy)
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The field-name pattern is not a valid regex
    #[error("invalid field name pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The traversal depth bound is unusable
    #[error("invalid traversal depth: {0}")]
    InvalidDepth(String),
}

/// Top-level error type for validation calls
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// Rule configuration fault
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Security policy error
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// A cascaded object graph loops back onto itself
    #[error("cyclic object graph detected at `{0}`")]
    CyclicGraph(String),

    /// Cascade recursion exceeded the policy's depth bound
    #[error("cascade depth exceeded at `{path}` (max {max})")]
    DepthExceeded { path: String, max: usize },

    /// Raised by `validate_or_fail` when the object is invalid
    #[error("validation failed with {} field error(s)", .0.errors().len())]
    Failed(ValidationResult),
}

impl ValidateError {
    /// Returns the carried validation result, if this is a `Failed` error.
    pub fn failure(&self) -> Option<&ValidationResult> {
        match self {
            ValidateError::Failed(result) => Some(result),
            _ => None,
        }
    }
}
