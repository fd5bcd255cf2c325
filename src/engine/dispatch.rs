#![forbid(unsafe_code)]

//! Rule dispatch for a single field declaration
//!
//! Dispatch resolves each segment of a rule expression against the
//! registry, branches once on the rule's capability tag, and applies the
//! fault policy: unknown rules and invalid field references always raise,
//! while declaration-shaped faults (missing or unparseable parameters, a
//! missing enumeration token) raise only under a strict policy and
//! otherwise degrade to a reported field message.

use crate::error::RuleError;
use crate::expr::{RuleDefinition, parse_expression};
use crate::introspect::{FieldValue, RuleDeclaration};
use crate::policy::SecurityPolicy;
use crate::rules::{RuleContext, RuleKind, RuleOutcome, RuleRegistry};

/// Applies every rule in one declaration to a field value.
///
/// Returns the reported messages in rule execution order. When the
/// declaration carries an override message, it stands in for each rule
/// failure message in turn; degraded misconfiguration messages keep
/// their place and are never overridden.
///
/// `cx` is present during object validation and absent for single-value
/// validation, where context-aware rules cannot run.
pub(crate) fn apply_declaration(
    registry: &RuleRegistry,
    policy: &SecurityPolicy,
    field: &str,
    value: &FieldValue<'_>,
    declaration: &RuleDeclaration,
    cx: Option<&RuleContext<'_>>,
) -> Result<Vec<String>, RuleError> {
    let mut messages = Vec::new();

    for definition in parse_expression(declaration.expression()) {
        let outcome = apply_definition(registry, field, value, declaration, &definition, cx);
        match outcome {
            Ok(None) => {}
            Ok(Some(found)) => match declaration.message() {
                Some(custom) => messages.push(custom.to_string()),
                None => messages.push(found),
            },
            Err(fault) => {
                if policy.strict_mode() || always_raises(&fault) {
                    return Err(fault);
                }
                messages.push(format!("rule misconfiguration: {fault}"));
            }
        }
    }

    Ok(messages)
}

/// Runs one parsed rule invocation through the entry point matching its
/// capability tag.
fn apply_definition(
    registry: &RuleRegistry,
    field: &str,
    value: &FieldValue<'_>,
    declaration: &RuleDeclaration,
    definition: &RuleDefinition,
    cx: Option<&RuleContext<'_>>,
) -> RuleOutcome {
    let rule = registry.lookup_required(&definition.name)?;
    let parameter = definition.parameter();

    match rule.kind() {
        RuleKind::Plain => rule.check(field, value, parameter),
        RuleKind::ContextAware => match cx {
            Some(cx) => rule.check_in_context(field, value, parameter, cx),
            None => Err(RuleError::ContextRequired(definition.name.clone())),
        },
        RuleKind::EnumConstrained => match declaration.members() {
            Some(members) => rule.check_membership(field, value, members),
            None => Err(RuleError::MembersRequired(definition.name.clone())),
        },
    }
}

/// Faults that raise regardless of strict mode.
///
/// These indicate a broken caller setup rather than a malformed
/// declaration parameter, so no policy may downgrade them to field
/// messages.
fn always_raises(fault: &RuleError) -> bool {
    matches!(
        fault,
        RuleError::UnknownRule(_)
            | RuleError::InvalidRule(_)
            | RuleError::InvalidFieldReference(_)
            | RuleError::ContextRequired(_)
    )
}
