#![forbid(unsafe_code)]

//! Enumeration tokens and the `enum` rule
//!
//! The `enum` rule does not take a string parameter; it consumes an
//! [`Enumeration`] token attached to the declaration itself. The token
//! carries the membership check and the allowed-name list, so the engine
//! never touches language-level type machinery.

use crate::introspect::FieldValue;
use crate::rules::{Rule, RuleKind, RuleOutcome};

/// A caller-supplied enumeration token
///
/// Typically implemented once per domain enum:
///
/// ```ignore
/// struct StatusMembers;
///
/// impl Enumeration for StatusMembers {
///     fn allowed_names(&self) -> &[&'static str] {
///         &["ACTIVE", "INACTIVE", "PENDING"]
///     }
/// }
/// ```
pub trait Enumeration: Send + Sync {
    /// The member names, in declaration order.
    fn allowed_names(&self) -> &[&'static str];

    /// Whether a string names a member.
    fn is_valid_member(&self, value: &str) -> bool {
        self.allowed_names().iter().any(|name| *name == value)
    }
}

/// `enum`: value must name a member of the attached enumeration
pub struct EnumRule;

impl Rule for EnumRule {
    fn name(&self) -> &str {
        "enum"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::EnumConstrained
    }

    fn check(&self, field: &str, _value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        // Never reached through dispatch; the dispatcher routes
        // EnumConstrained rules to check_membership.
        Ok(Some(format!(
            "The enum rule on {field} requires an enumeration token."
        )))
    }

    fn check_membership(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        members: &dyn Enumeration,
    ) -> RuleOutcome {
        if value.is_absent() {
            return Ok(None);
        }

        let Some(text) = value.as_str() else {
            return Ok(Some(format!("The {field} must be a string.")));
        };

        if members.is_valid_member(text) {
            return Ok(None);
        }

        Ok(Some(format!(
            "The {field} must be one of: {}.",
            members.allowed_names().join(", ")
        )))
    }
}
