#![forbid(unsafe_code)]

//! Rule-expression parser
//!
//! Rule expressions are pipe-separated lists of rule invocations, e.g.
//! `"required|min:3|max:20"`. Each segment is split on the *first* colon
//! into a rule name and an optional parameter, so parameters may legally
//! contain colons (e.g. a time format string). Empty segments produced by
//! double pipes or leading/trailing pipes are silently skipped so that
//! expressions assembled by string concatenation at call sites do not
//! break.
//!
//! The parser never consults the rule registry; unknown names surface at
//! dispatch time.

/// A parsed rule invocation: name plus optional parameter
///
/// The parameter may itself contain commas for multi-argument rules
/// (e.g. `between:18,65`); splitting those is the rule's own business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    pub name: String,
    pub parameter: Option<String>,
}

impl RuleDefinition {
    /// Parses a single rule segment (e.g. `"min:3"` or `"required"`).
    pub fn parse(segment: &str) -> Self {
        match segment.split_once(':') {
            Some((name, parameter)) => RuleDefinition {
                name: name.to_string(),
                parameter: Some(parameter.to_string()),
            },
            None => RuleDefinition {
                name: segment.to_string(),
                parameter: None,
            },
        }
    }

    /// The parameter as a borrowed option.
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }
}

/// Parses a pipe-separated rule expression into ordered definitions.
pub fn parse_expression(expression: &str) -> Vec<RuleDefinition> {
    expression
        .split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(RuleDefinition::parse)
        .collect()
}
