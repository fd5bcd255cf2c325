#![forbid(unsafe_code)]

//! Context-aware built-in rules
//!
//! These rules read sibling fields on the root object through the
//! policy-checked lookup in [`RuleContext`]. A missing sibling never
//! raises (it simply compares as unset), but a sibling name failing the
//! security policy's pattern is an `InvalidFieldReference` fault.

use crate::error::RuleError;
use crate::introspect::FieldValue;
use crate::rules::{Rule, RuleContext, RuleKind, RuleOutcome};

fn context_only(rule: &str) -> RuleOutcome {
    Err(RuleError::ContextRequired(rule.to_string()))
}

fn is_blank(value: &FieldValue<'_>) -> bool {
    match value {
        FieldValue::Absent => true,
        FieldValue::Str(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Splits a `field,value` parameter for the required_if/required_unless
/// family.
fn split_condition<'p>(rule: &str, parameter: Option<&'p str>) -> Result<(&'p str, &'p str), RuleError> {
    let parameter = parameter.filter(|p| !p.is_empty()).ok_or_else(|| {
        RuleError::MissingParameter {
            rule: rule.to_string(),
            example: format!("{rule}:otherField,value"),
        }
    })?;
    let Some((field, expected)) = parameter.split_once(',') else {
        return Err(RuleError::InvalidParameter {
            rule: rule.to_string(),
            message: "expected two parameters: field,value".to_string(),
        });
    };
    Ok((field.trim(), expected.trim()))
}

/// Whether a sibling's value renders to the expected text.
fn sibling_matches(
    cx: &RuleContext<'_>,
    sibling: &str,
    expected: &str,
) -> Result<bool, RuleError> {
    let value = cx.sibling(sibling)?;
    Ok(value
        .and_then(|v| v.render())
        .is_some_and(|text| text == expected))
}

/// `required_if:field,value`: required when the other field has the value
pub struct RequiredIfRule;

impl Rule for RequiredIfRule {
    fn name(&self) -> &str {
        "required_if"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ContextAware
    }

    fn check(&self, _field: &str, _value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        context_only("required_if")
    }

    fn check_in_context(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameter: Option<&str>,
        cx: &RuleContext<'_>,
    ) -> RuleOutcome {
        let (sibling, expected) = split_condition("required_if", parameter)?;
        if sibling_matches(cx, sibling, expected)? && is_blank(value) {
            return Ok(Some(format!(
                "The {field} field is required when {sibling} is {expected}."
            )));
        }
        Ok(None)
    }
}

/// `required_unless:field,value`: required unless the other field has
/// the value
pub struct RequiredUnlessRule;

impl Rule for RequiredUnlessRule {
    fn name(&self) -> &str {
        "required_unless"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ContextAware
    }

    fn check(&self, _field: &str, _value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        context_only("required_unless")
    }

    fn check_in_context(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameter: Option<&str>,
        cx: &RuleContext<'_>,
    ) -> RuleOutcome {
        let (sibling, expected) = split_condition("required_unless", parameter)?;
        if !sibling_matches(cx, sibling, expected)? && is_blank(value) {
            return Ok(Some(format!(
                "The {field} field is required unless {sibling} is {expected}."
            )));
        }
        Ok(None)
    }
}

/// `same:field`: value must equal the other field's value
pub struct SameRule;

impl Rule for SameRule {
    fn name(&self) -> &str {
        "same"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ContextAware
    }

    fn check(&self, _field: &str, _value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        context_only("same")
    }

    fn check_in_context(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameter: Option<&str>,
        cx: &RuleContext<'_>,
    ) -> RuleOutcome {
        if value.is_absent() {
            return Ok(None);
        }
        let sibling = require_field_parameter("same", parameter)?;
        let other = cx.sibling(sibling)?;
        if other.as_ref() != Some(value) {
            return Ok(Some(format!("The {field} must match {sibling}.")));
        }
        Ok(None)
    }
}

/// `different:field`: value must differ from the other field's value
pub struct DifferentRule;

impl Rule for DifferentRule {
    fn name(&self) -> &str {
        "different"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ContextAware
    }

    fn check(&self, _field: &str, _value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        context_only("different")
    }

    fn check_in_context(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameter: Option<&str>,
        cx: &RuleContext<'_>,
    ) -> RuleOutcome {
        if value.is_absent() {
            return Ok(None);
        }
        let sibling = require_field_parameter("different", parameter)?;
        let other = cx.sibling(sibling)?;
        if other.as_ref() == Some(value) {
            return Ok(Some(format!("The {field} must be different from {sibling}.")));
        }
        Ok(None)
    }
}

/// `confirmed` / `confirmed:field`: value must match its confirmation
/// field (default sibling `<field>_confirmation`)
pub struct ConfirmedRule;

impl Rule for ConfirmedRule {
    fn name(&self) -> &str {
        "confirmed"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ContextAware
    }

    fn check(&self, _field: &str, _value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        context_only("confirmed")
    }

    fn check_in_context(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameter: Option<&str>,
        cx: &RuleContext<'_>,
    ) -> RuleOutcome {
        if value.is_absent() {
            return Ok(None);
        }
        let sibling = match parameter.map(str::trim).filter(|p| !p.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("{field}_confirmation"),
        };
        let other = cx.sibling(&sibling)?;
        if other.as_ref() != Some(value) {
            return Ok(Some(format!("The {field} confirmation does not match.")));
        }
        Ok(None)
    }
}

fn require_field_parameter<'p>(rule: &str, parameter: Option<&'p str>) -> Result<&'p str, RuleError> {
    match parameter.map(str::trim).filter(|p| !p.is_empty()) {
        Some(name) => Ok(name),
        None => Err(RuleError::MissingParameter {
            rule: rule.to_string(),
            example: format!("{rule}:otherField"),
        }),
    }
}
