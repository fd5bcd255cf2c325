#![forbid(unsafe_code)]

//! Built-in plain validation rules
//!
//! Each rule is a small leaf predicate over `(field, value, parameter)`.
//! All rules except the presence family treat an absent value as passing;
//! "is this required" is the `required` rule's job. Missing or
//! unparseable parameters are configuration faults; the dispatcher
//! decides (per security policy) whether they raise or degrade to a
//! reported field error.

use crate::error::RuleError;
use crate::introspect::FieldValue;
use crate::rules::conditional::{
    ConfirmedRule, DifferentRule, RequiredIfRule, RequiredUnlessRule, SameRule,
};
use crate::rules::enumeration::EnumRule;
use crate::rules::{Rule, RuleOutcome, RuleRegistry};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?|ftp)://[^\s/$.?#][^\s]*$").expect("url pattern compiles")
});

static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$")
        .expect("ipv4 pattern compiles")
});

static ALPHA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("alpha pattern compiles"));

static ALPHANUM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("alphanum pattern compiles"));

/// Compiled user patterns for the `regex` rule, keyed by pattern text.
static PATTERN_CACHE: LazyLock<RwLock<HashMap<String, Regex>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Registers every built-in rule with the registry.
///
/// Registration is idempotent: re-registering overwrites by name.
pub fn register_builtins(registry: &RuleRegistry) -> Result<(), RuleError> {
    // Basic rules
    registry.register(RequiredRule)?;
    registry.register(MinRule)?;
    registry.register(MaxRule)?;
    registry.register(EmailRule)?;
    registry.register(NumericRule)?;

    // Numeric comparisons
    registry.register(GtRule)?;
    registry.register(GteRule)?;
    registry.register(LtRule)?;
    registry.register(LteRule)?;
    registry.register(BetweenRule)?;

    // String patterns
    registry.register(RegexRule)?;
    registry.register(AlphaRule)?;
    registry.register(AlphaNumRule)?;

    // Formats
    registry.register(InRule)?;
    registry.register(UrlRule)?;
    registry.register(IpRule)?;
    registry.register(UuidRule)?;
    registry.register(JsonRule)?;

    // Dates
    registry.register(DateRule)?;
    registry.register(BeforeRule)?;
    registry.register(AfterRule)?;
    registry.register(FutureRule)?;
    registry.register(PastRule)?;

    // Sizing
    registry.register(SizeRule)?;
    registry.register(DigitsRule)?;
    registry.register(DistinctRule)?;

    // Control flow
    registry.register(NullableRule)?;

    // Context-aware rules
    registry.register(RequiredIfRule)?;
    registry.register(RequiredUnlessRule)?;
    registry.register(SameRule)?;
    registry.register(DifferentRule)?;
    registry.register(ConfirmedRule)?;

    // Enum-constrained rule
    registry.register(EnumRule)?;

    Ok(())
}

fn require_parameter<'p>(
    rule: &str,
    example: &str,
    parameter: Option<&'p str>,
) -> Result<&'p str, RuleError> {
    match parameter {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(RuleError::MissingParameter {
            rule: rule.to_string(),
            example: example.to_string(),
        }),
    }
}

fn parse_usize(rule: &str, parameter: &str) -> Result<usize, RuleError> {
    parameter
        .trim()
        .parse()
        .map_err(|_| RuleError::InvalidParameter {
            rule: rule.to_string(),
            message: format!("`{parameter}` is not a whole number"),
        })
}

fn parse_f64(rule: &str, parameter: &str) -> Result<f64, RuleError> {
    parameter
        .trim()
        .parse()
        .map_err(|_| RuleError::InvalidParameter {
            rule: rule.to_string(),
            message: format!("`{parameter}` is not a number"),
        })
}

/// Parses a date value: RFC 3339, `YYYY-MM-DDTHH:MM:SS`, or `YYYY-MM-DD`.
fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `required`: value must be present and, for strings, non-blank
pub struct RequiredRule;

impl Rule for RequiredRule {
    fn name(&self) -> &str {
        "required"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        let missing = match value {
            FieldValue::Absent => true,
            FieldValue::Str(s) => s.trim().is_empty(),
            _ => false,
        };
        if missing {
            return Ok(Some(format!("The {field} field is required.")));
        }
        Ok(None)
    }
}

/// `min:n`: string must have at least `n` characters
pub struct MinRule;

impl Rule for MinRule {
    fn name(&self) -> &str {
        "min"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        let min = parse_usize("min", require_parameter("min", "min:3", parameter)?)?;
        if let Some(s) = value.as_str() {
            if s.chars().count() < min {
                return Ok(Some(format!("The {field} must be at least {min} characters.")));
            }
        }
        Ok(None)
    }
}

/// `max:n`: string must not exceed `n` characters
pub struct MaxRule;

impl Rule for MaxRule {
    fn name(&self) -> &str {
        "max"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        let max = parse_usize("max", require_parameter("max", "max:20", parameter)?)?;
        if let Some(s) = value.as_str() {
            if s.chars().count() > max {
                return Ok(Some(format!("The {field} must not exceed {max} characters.")));
            }
        }
        Ok(None)
    }
}

/// `email`: string must look like an email address
pub struct EmailRule;

impl Rule for EmailRule {
    fn name(&self) -> &str {
        "email"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        if let Some(s) = value.as_str() {
            if !EMAIL_PATTERN.is_match(s) {
                return Ok(Some(format!("The {field} must be a valid email address.")));
            }
        }
        Ok(None)
    }
}

/// `numeric`: value must be a number or a string parseable as one
pub struct NumericRule;

impl Rule for NumericRule {
    fn name(&self) -> &str {
        "numeric"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        let ok = match value {
            FieldValue::Absent => true,
            FieldValue::Int(_) | FieldValue::Float(_) => true,
            FieldValue::Str(s) => s.trim().parse::<f64>().is_ok(),
            _ => false,
        };
        if !ok {
            return Ok(Some(format!("The {field} must be a number.")));
        }
        Ok(None)
    }
}

fn check_bound(
    rule: &'static str,
    example: &'static str,
    field: &str,
    value: &FieldValue<'_>,
    parameter: Option<&str>,
    accept: impl Fn(f64, f64) -> bool,
    describe: impl Fn(&str, f64) -> String,
) -> RuleOutcome {
    let bound = parse_f64(rule, require_parameter(rule, example, parameter)?)?;
    if let Some(n) = value.as_number() {
        if !accept(n, bound) {
            return Ok(Some(describe(field, bound)));
        }
    }
    Ok(None)
}

/// `gt:n`: number must be strictly greater than `n`
pub struct GtRule;

impl Rule for GtRule {
    fn name(&self) -> &str {
        "gt"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        check_bound("gt", "gt:0", field, value, parameter, |n, b| n > b, |f, b| {
            format!("The {f} must be greater than {b}.")
        })
    }
}

/// `gte:n`: number must be at least `n`
pub struct GteRule;

impl Rule for GteRule {
    fn name(&self) -> &str {
        "gte"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        check_bound("gte", "gte:18", field, value, parameter, |n, b| n >= b, |f, b| {
            format!("The {f} must be at least {b}.")
        })
    }
}

/// `lt:n`: number must be strictly less than `n`
pub struct LtRule;

impl Rule for LtRule {
    fn name(&self) -> &str {
        "lt"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        check_bound("lt", "lt:100", field, value, parameter, |n, b| n < b, |f, b| {
            format!("The {f} must be less than {b}.")
        })
    }
}

/// `lte:n`: number must be at most `n`
pub struct LteRule;

impl Rule for LteRule {
    fn name(&self) -> &str {
        "lte"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        check_bound("lte", "lte:65", field, value, parameter, |n, b| n <= b, |f, b| {
            format!("The {f} must be at most {b}.")
        })
    }
}

/// `between:min,max`: number must fall in the inclusive range
pub struct BetweenRule;

impl Rule for BetweenRule {
    fn name(&self) -> &str {
        "between"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        let parameter = require_parameter("between", "between:18,65", parameter)?;
        let Some((low, high)) = parameter.split_once(',') else {
            return Err(RuleError::InvalidParameter {
                rule: "between".to_string(),
                message: "expected two comma-separated bounds (min,max)".to_string(),
            });
        };
        let min = parse_f64("between", low)?;
        let max = parse_f64("between", high)?;

        match value {
            FieldValue::Absent => Ok(None),
            _ => match value.as_number() {
                Some(n) if n < min || n > max => {
                    Ok(Some(format!("The {field} must be between {min} and {max}.")))
                }
                Some(_) => Ok(None),
                None => Ok(Some(format!("The {field} must be a number."))),
            },
        }
    }
}

/// `regex:pattern`: string must match the pattern
///
/// Compiled patterns are cached per pattern text; an invalid pattern is a
/// configuration fault.
pub struct RegexRule;

impl Rule for RegexRule {
    fn name(&self) -> &str {
        "regex"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        let pattern = require_parameter("regex", "regex:^[A-Z]+$", parameter)?;
        let Some(s) = value.as_str() else {
            return Ok(None);
        };

        {
            let cache = PATTERN_CACHE.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(compiled) = cache.get(pattern) {
                return match_pattern(field, s, compiled);
            }
        }

        let compiled = Regex::new(pattern).map_err(|e| RuleError::InvalidParameter {
            rule: "regex".to_string(),
            message: e.to_string(),
        })?;
        let outcome = match_pattern(field, s, &compiled);
        let mut cache = PATTERN_CACHE.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(pattern.to_string(), compiled);
        outcome
    }
}

fn match_pattern(field: &str, s: &str, pattern: &Regex) -> RuleOutcome {
    if pattern.is_match(s) {
        Ok(None)
    } else {
        Ok(Some(format!("The {field} format is invalid.")))
    }
}

/// `alpha`: string must contain only letters
pub struct AlphaRule;

impl Rule for AlphaRule {
    fn name(&self) -> &str {
        "alpha"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        match value {
            FieldValue::Absent => Ok(None),
            FieldValue::Str(s) if ALPHA_PATTERN.is_match(s) => Ok(None),
            _ => Ok(Some(format!(
                "The {field} must contain only alphabetic characters."
            ))),
        }
    }
}

/// `alphanum`: string must contain only letters and digits
pub struct AlphaNumRule;

impl Rule for AlphaNumRule {
    fn name(&self) -> &str {
        "alphanum"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        match value {
            FieldValue::Absent => Ok(None),
            FieldValue::Str(s) if ALPHANUM_PATTERN.is_match(s) => Ok(None),
            _ => Ok(Some(format!(
                "The {field} must contain only alphanumeric characters."
            ))),
        }
    }
}

/// `in:a,b,c`: value's text must be one of the listed options
pub struct InRule;

impl Rule for InRule {
    fn name(&self) -> &str {
        "in"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        let parameter = require_parameter("in", "in:admin,user,guest", parameter)?;
        if value.is_absent() {
            return Ok(None);
        }

        let text = value.render().unwrap_or_default();
        if parameter.split(',').any(|allowed| allowed.trim() == text) {
            return Ok(None);
        }
        Ok(Some(format!("The {field} must be one of: {parameter}.")))
    }
}

/// `url`: string must look like an http(s)/ftp URL
pub struct UrlRule;

impl Rule for UrlRule {
    fn name(&self) -> &str {
        "url"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        if let Some(s) = value.as_str() {
            if !URL_PATTERN.is_match(s) {
                return Ok(Some(format!("The {field} must be a valid URL.")));
            }
        }
        Ok(None)
    }
}

/// `ip`: string must be a valid IPv4 address
pub struct IpRule;

impl Rule for IpRule {
    fn name(&self) -> &str {
        "ip"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        match value {
            FieldValue::Absent => Ok(None),
            FieldValue::Str(s) if IPV4_PATTERN.is_match(s) => Ok(None),
            _ => Ok(Some(format!("The {field} must be a valid IP address."))),
        }
    }
}

/// `uuid`: string must parse as a UUID
pub struct UuidRule;

impl Rule for UuidRule {
    fn name(&self) -> &str {
        "uuid"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        match value {
            FieldValue::Absent => Ok(None),
            FieldValue::Str(s) if uuid::Uuid::parse_str(s).is_ok() => Ok(None),
            _ => Ok(Some(format!("The {field} must be a valid UUID."))),
        }
    }
}

/// `json`: string must be well-formed JSON
pub struct JsonRule;

impl Rule for JsonRule {
    fn name(&self) -> &str {
        "json"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        if let Some(s) = value.as_str() {
            if serde_json::from_str::<serde_json::Value>(s).is_err() {
                return Ok(Some(format!("The {field} must be valid JSON.")));
            }
        }
        Ok(None)
    }
}

/// `date` / `date:format`: string must parse as a date
///
/// Without a parameter the value must be RFC 3339, `YYYY-MM-DDTHH:MM:SS`,
/// or `YYYY-MM-DD`. With a parameter the value must match that chrono
/// format string (date or datetime).
pub struct DateRule;

impl Rule for DateRule {
    fn name(&self) -> &str {
        "date"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        let Some(s) = value.as_str() else {
            return Ok(None);
        };

        match parameter.filter(|p| !p.is_empty()) {
            Some(format) => {
                let ok = NaiveDateTime::parse_from_str(s, format).is_ok()
                    || NaiveDate::parse_from_str(s, format).is_ok();
                if ok {
                    Ok(None)
                } else {
                    Ok(Some(format!(
                        "The {field} must be a valid date in format: {format}."
                    )))
                }
            }
            None => {
                if parse_date_text(s).is_some() {
                    Ok(None)
                } else {
                    Ok(Some(format!("The {field} must be a valid date.")))
                }
            }
        }
    }
}

fn check_date_order(
    rule: &'static str,
    example: &'static str,
    field: &str,
    value: &FieldValue<'_>,
    parameter: Option<&str>,
    accept: impl Fn(NaiveDateTime, NaiveDateTime) -> bool,
    describe: impl Fn(&str, &str) -> String,
) -> RuleOutcome {
    let parameter = require_parameter(rule, example, parameter)?;
    let bound = parse_date_text(parameter).ok_or_else(|| RuleError::InvalidParameter {
        rule: rule.to_string(),
        message: format!("`{parameter}` is not a recognizable date"),
    })?;

    let Some(s) = value.as_str() else {
        return Ok(None);
    };
    match parse_date_text(s) {
        Some(date) if accept(date, bound) => Ok(None),
        Some(_) => Ok(Some(describe(field, parameter))),
        None => Ok(Some(format!("The {field} must be a valid date."))),
    }
}

/// `before:date`: date must be strictly before the given date
pub struct BeforeRule;

impl Rule for BeforeRule {
    fn name(&self) -> &str {
        "before"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        check_date_order(
            "before",
            "before:2030-01-01",
            field,
            value,
            parameter,
            |date, bound| date < bound,
            |f, p| format!("The {f} must be a date before {p}."),
        )
    }
}

/// `after:date`: date must be strictly after the given date
pub struct AfterRule;

impl Rule for AfterRule {
    fn name(&self) -> &str {
        "after"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        check_date_order(
            "after",
            "after:2000-01-01",
            field,
            value,
            parameter,
            |date, bound| date > bound,
            |f, p| format!("The {f} must be a date after {p}."),
        )
    }
}

/// `future`: date must lie in the future
pub struct FutureRule;

impl Rule for FutureRule {
    fn name(&self) -> &str {
        "future"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        let Some(s) = value.as_str() else {
            return Ok(None);
        };
        match parse_date_text(s) {
            Some(date) if date > Utc::now().naive_utc() => Ok(None),
            Some(_) => Ok(Some(format!("The {field} must be a date in the future."))),
            None => Ok(Some(format!("The {field} must be a valid date."))),
        }
    }
}

/// `past`: date must lie in the past
pub struct PastRule;

impl Rule for PastRule {
    fn name(&self) -> &str {
        "past"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        let Some(s) = value.as_str() else {
            return Ok(None);
        };
        match parse_date_text(s) {
            Some(date) if date < Utc::now().naive_utc() => Ok(None),
            Some(_) => Ok(Some(format!("The {field} must be a date in the past."))),
            None => Ok(Some(format!("The {field} must be a valid date."))),
        }
    }
}

/// `size:n`: string must have exactly `n` characters, collections
/// exactly `n` items
pub struct SizeRule;

impl Rule for SizeRule {
    fn name(&self) -> &str {
        "size"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        let expected = parse_usize("size", require_parameter("size", "size:8", parameter)?)?;
        let actual = match value {
            FieldValue::Absent => return Ok(None),
            FieldValue::Str(s) => s.chars().count(),
            FieldValue::List(items) => items.len(),
            _ => {
                return Ok(Some(format!("The {field} size cannot be determined.")));
            }
        };
        if actual != expected {
            return Ok(Some(format!(
                "The {field} must be exactly {expected} characters/items."
            )));
        }
        Ok(None)
    }
}

/// `digits:n`: value must consist of exactly `n` digits
pub struct DigitsRule;

impl Rule for DigitsRule {
    fn name(&self) -> &str {
        "digits"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, parameter: Option<&str>) -> RuleOutcome {
        let expected = parse_usize("digits", require_parameter("digits", "digits:4", parameter)?)?;
        let ok = match value {
            FieldValue::Absent => return Ok(None),
            FieldValue::Str(s) => s.len() == expected && s.chars().all(|c| c.is_ascii_digit()),
            FieldValue::Int(i) => i.unsigned_abs().to_string().len() == expected,
            _ => false,
        };
        if !ok {
            return Ok(Some(format!("The {field} must have exactly {expected} digits.")));
        }
        Ok(None)
    }
}

/// `distinct`: collection elements must all be unique
pub struct DistinctRule;

impl Rule for DistinctRule {
    fn name(&self) -> &str {
        "distinct"
    }

    fn check(&self, field: &str, value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        let items = match value {
            FieldValue::Absent => return Ok(None),
            FieldValue::List(items) => items,
            _ => {
                return Ok(Some(format!(
                    "The {field} must be a collection to use the 'distinct' rule."
                )));
            }
        };

        for (i, item) in items.iter().enumerate() {
            if items[..i].contains(item) {
                return Ok(Some(format!("The {field} must contain only distinct values.")));
            }
        }
        Ok(None)
    }
}

/// `nullable`: always passes; documents that absence is intentional
pub struct NullableRule;

impl Rule for NullableRule {
    fn name(&self) -> &str {
        "nullable"
    }

    fn check(&self, _field: &str, _value: &FieldValue<'_>, _parameter: Option<&str>) -> RuleOutcome {
        Ok(None)
    }
}
