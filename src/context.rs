#![forbid(unsafe_code)]

//! Validation context and top-level API
//!
//! A [`ValidationContext`] owns a rule registry (pre-loaded with the
//! built-ins) and the active security policy. Most callers use the
//! process-wide default context through the free functions at the bottom
//! of this module; isolated contexts exist for tests and for embedding
//! several independently configured validators in one process.

use crate::engine::{Walker, apply_declaration};
use crate::error::{RuleError, ValidateError};
use crate::expr::parse_expression;
use crate::introspect::{FieldValue, Introspect, RuleDeclaration};
use crate::policy::SecurityPolicy;
use crate::rules::{Rule, RuleKind, RuleRegistry, register_builtins};
use crate::types::{ValidationError, ValidationResult};
use std::sync::{Arc, LazyLock, RwLock};

/// An isolated validator: rule registry plus security policy
///
/// The policy is swapped wholesale and snapshotted once per validation
/// call, so a concurrent [`set_security_policy`](Self::set_security_policy)
/// never changes the rules mid-traversal.
pub struct ValidationContext {
    registry: RuleRegistry,
    policy: RwLock<Arc<SecurityPolicy>>,
}

impl ValidationContext {
    /// Creates a context with all built-in rules and the default policy.
    pub fn new() -> Self {
        let registry = RuleRegistry::new();
        register_builtins(&registry).expect("built-in rule names are valid");
        ValidationContext {
            registry,
            policy: RwLock::new(Arc::new(SecurityPolicy::defaults())),
        }
    }

    /// Creates a context with the built-ins and a specific policy.
    pub fn with_policy(policy: SecurityPolicy) -> Self {
        let context = ValidationContext::new();
        context.set_security_policy(policy);
        context
    }

    /// The rule registry, for registering custom rules.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Registers a custom rule, overwriting any built-in or custom rule
    /// with the same name.
    pub fn register_rule<R: Rule + 'static>(&self, rule: R) -> Result<(), RuleError> {
        self.registry.register(rule)
    }

    /// A snapshot of the active security policy.
    pub fn security_policy(&self) -> Arc<SecurityPolicy> {
        let guard = self.policy.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Replaces the security policy wholesale.
    pub fn set_security_policy(&self, policy: SecurityPolicy) {
        let mut guard = self.policy.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(policy);
    }

    /// Validates an object graph, collecting every field error.
    ///
    /// # Errors
    ///
    /// Fails on configuration faults only: unknown rules, hostile field
    /// references, cyclic graphs, exceeded cascade depth, and (under a
    /// strict policy) malformed rule parameters. Bad data is not an
    /// error; it is reported inside the returned [`ValidationResult`].
    pub fn validate(&self, object: &dyn Introspect) -> Result<ValidationResult, ValidateError> {
        let policy = self.security_policy();
        Walker::new(&self.registry, &policy).validate(object)
    }

    /// Validates an object graph, failing if it is invalid.
    ///
    /// # Errors
    ///
    /// Everything [`validate`](Self::validate) fails on, plus
    /// [`ValidateError::Failed`] carrying the result when the object has
    /// field errors.
    pub fn validate_or_fail(&self, object: &dyn Introspect) -> Result<(), ValidateError> {
        let result = self.validate(object)?;
        if result.valid() {
            Ok(())
        } else {
            Err(ValidateError::Failed(result))
        }
    }

    /// Validates a single standalone value against a rule expression.
    ///
    /// `field` names the value in error messages. A blank expression
    /// validates successfully. Context-aware and enum-constrained rules
    /// cannot run without an enclosing object and are rejected up front.
    pub fn validate_value<'a>(
        &self,
        value: impl Into<FieldValue<'a>>,
        expression: &str,
        field: &str,
    ) -> Result<ValidationResult, ValidateError> {
        for definition in parse_expression(expression) {
            let rule = self.registry.lookup_required(&definition.name)?;
            match rule.kind() {
                RuleKind::Plain => {}
                RuleKind::ContextAware => {
                    return Err(RuleError::ContextRequired(definition.name).into());
                }
                RuleKind::EnumConstrained => {
                    return Err(RuleError::MembersRequired(definition.name).into());
                }
            }
        }

        let policy = self.security_policy();
        let declaration = RuleDeclaration::new(expression);
        let messages = apply_declaration(
            &self.registry,
            &policy,
            field,
            &value.into(),
            &declaration,
            None,
        )?;

        if messages.is_empty() {
            Ok(ValidationResult::success())
        } else {
            Ok(ValidationResult::failure(vec![ValidationError::new(
                field, messages,
            )]))
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        ValidationContext::new()
    }
}

static DEFAULT_CONTEXT: LazyLock<ValidationContext> = LazyLock::new(ValidationContext::new);

/// The process-wide default context used by the free functions.
pub fn default_context() -> &'static ValidationContext {
    &DEFAULT_CONTEXT
}

/// Validates an object graph with the default context.
pub fn validate(object: &dyn Introspect) -> Result<ValidationResult, ValidateError> {
    DEFAULT_CONTEXT.validate(object)
}

/// Validates an object graph with the default context, failing if it is
/// invalid.
pub fn validate_or_fail(object: &dyn Introspect) -> Result<(), ValidateError> {
    DEFAULT_CONTEXT.validate_or_fail(object)
}

/// Validates a single value with the default context.
pub fn validate_value<'a>(
    value: impl Into<FieldValue<'a>>,
    expression: &str,
    field: &str,
) -> Result<ValidationResult, ValidateError> {
    DEFAULT_CONTEXT.validate_value(value, expression, field)
}

/// Registers a custom rule on the default context.
pub fn register_rule<R: Rule + 'static>(rule: R) -> Result<(), RuleError> {
    DEFAULT_CONTEXT.register_rule(rule)
}

/// A snapshot of the default context's security policy.
pub fn security_policy() -> Arc<SecurityPolicy> {
    DEFAULT_CONTEXT.security_policy()
}

/// Replaces the default context's security policy.
pub fn set_security_policy(policy: SecurityPolicy) {
    DEFAULT_CONTEXT.set_security_policy(policy)
}
