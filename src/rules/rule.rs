#![forbid(unsafe_code)]

//! Core Rule trait and related types for defining and executing rules

use crate::error::RuleError;
use crate::introspect::{FieldValue, Introspect, sibling_value};
use crate::policy::SecurityPolicy;
use crate::rules::Enumeration;
use std::fmt;

/// The capability a rule instance carries
///
/// Exactly one kind applies per rule; the dispatch engine branches on the
/// tag once per rule invocation and calls the matching entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Pure function of (field name, value, parameter)
    Plain,
    /// Additionally reads sibling fields on the root object
    ContextAware,
    /// Consumes a caller-supplied enumeration token instead of a string
    /// parameter
    EnumConstrained,
}

/// Outcome of one rule invocation
///
/// `Ok(None)` means the rule passed, `Ok(Some(message))` is a field
/// violation, and `Err` is a configuration fault (broken declaration, not
/// bad data).
pub type RuleOutcome = Result<Option<String>, RuleError>;

/// Execution context handed to context-aware rules
///
/// Bundles the root object being validated with the active security
/// policy, and exposes policy-checked sibling lookup.
pub struct RuleContext<'a> {
    root: &'a dyn Introspect,
    policy: &'a SecurityPolicy,
}

impl<'a> RuleContext<'a> {
    /// Creates a context over the root object.
    pub fn new(root: &'a dyn Introspect, policy: &'a SecurityPolicy) -> Self {
        RuleContext { root, policy }
    }

    /// Resolves a sibling field's value, validating the name against the
    /// security policy first. A missing sibling is `Ok(None)`.
    pub fn sibling(&self, name: &str) -> Result<Option<FieldValue<'a>>, RuleError> {
        sibling_value(self.root, name, self.policy)
    }

    /// The active security policy.
    pub fn policy(&self) -> &SecurityPolicy {
        self.policy
    }
}

/// Trait that all validation rules implement
///
/// Rules are leaf predicates: given a field name, its value, and an
/// optional parameter they either pass (`Ok(None)`) or produce an error
/// message. Rules must treat an absent value as passing ("is this
/// required" belongs to the dedicated presence rules) and are
/// `Send + Sync` so callers can validate concurrently.
pub trait Rule: Send + Sync {
    /// The registry name of this rule (e.g. `"required"`, `"min"`).
    fn name(&self) -> &str;

    /// The capability tag the dispatcher branches on.
    fn kind(&self) -> RuleKind {
        RuleKind::Plain
    }

    /// Plain entry point.
    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome;

    /// Context-aware entry point; only called when `kind()` is
    /// `ContextAware`.
    fn check_in_context(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameter: Option<&str>,
        _cx: &RuleContext<'_>,
    ) -> RuleOutcome {
        self.check(field, value, parameter)
    }

    /// Enum-constrained entry point; only called when `kind()` is
    /// `EnumConstrained`.
    fn check_membership(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        _members: &dyn Enumeration,
    ) -> RuleOutcome {
        self.check(field, value, None)
    }
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name()).finish()
    }
}
