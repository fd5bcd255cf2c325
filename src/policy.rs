#![forbid(unsafe_code)]

//! Security policy for validation traversal
//!
//! The policy bounds how far the engine will recurse into cascaded object
//! graphs and constrains which field names may be referenced by
//! context-aware rules. Field-name validation exists specifically to stop
//! a rule parameter from being used as an injection vector into the
//! introspection layer.
//!
//! A policy is constructed once and replaced wholesale; there is no
//! partial mutation.

use crate::error::PolicyError;
use regex::Regex;
use std::sync::LazyLock;

/// Default bound on cascade recursion depth.
const DEFAULT_MAX_TRAVERSAL_DEPTH: usize = 10;

/// Default pattern for acceptable sibling field names.
const DEFAULT_FIELD_NAME_PATTERN: &str = "^[a-zA-Z_][a-zA-Z0-9_]*$";

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_FIELD_NAME_PATTERN).expect("default field name pattern compiles")
});

/// Process-wide validation security settings
///
/// Presets:
/// - [`SecurityPolicy::defaults`]: balanced settings for production use
/// - [`SecurityPolicy::strict`]: all checks on, configuration faults raise
/// - [`SecurityPolicy::permissive`]: minimal checks for development
#[derive(Debug, Clone)]
pub struct SecurityPolicy {
    max_traversal_depth: usize,
    validate_field_names: bool,
    field_name_pattern: Regex,
    strict_mode: bool,
}

impl SecurityPolicy {
    /// Default policy: depth 10, field names validated, strict mode off.
    pub fn defaults() -> Self {
        SecurityPolicy {
            max_traversal_depth: DEFAULT_MAX_TRAVERSAL_DEPTH,
            validate_field_names: true,
            field_name_pattern: DEFAULT_PATTERN.clone(),
            strict_mode: false,
        }
    }

    /// Maximum-security policy: field names validated and strict mode on,
    /// so malformed rule parameters raise instead of degrading to field
    /// errors.
    pub fn strict() -> Self {
        SecurityPolicy {
            strict_mode: true,
            ..SecurityPolicy::defaults()
        }
    }

    /// Minimal-checks policy for development and testing.
    pub fn permissive() -> Self {
        SecurityPolicy {
            validate_field_names: false,
            ..SecurityPolicy::defaults()
        }
    }

    /// Starts building a custom policy.
    pub fn builder() -> SecurityPolicyBuilder {
        SecurityPolicyBuilder::default()
    }

    /// Bound on cascade recursion depth.
    pub fn max_traversal_depth(&self) -> usize {
        self.max_traversal_depth
    }

    /// Whether sibling field names referenced by rule parameters are
    /// checked against the name pattern.
    pub fn validate_field_names(&self) -> bool {
        self.validate_field_names
    }

    /// The field name pattern as written.
    pub fn field_name_pattern(&self) -> &str {
        self.field_name_pattern.as_str()
    }

    /// Whether malformed rule parameters raise (strict) or degrade to a
    /// reported field error.
    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Checks a sibling field name against the policy.
    ///
    /// Empty names are always rejected; otherwise the pattern applies only
    /// when field-name validation is enabled.
    pub fn is_valid_field_name(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        if !self.validate_field_names {
            return true;
        }
        self.field_name_pattern.is_match(name)
    }
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        SecurityPolicy::defaults()
    }
}

/// Builder for [`SecurityPolicy`]
#[derive(Debug, Clone)]
pub struct SecurityPolicyBuilder {
    max_traversal_depth: usize,
    validate_field_names: bool,
    field_name_pattern: String,
    strict_mode: bool,
}

impl Default for SecurityPolicyBuilder {
    fn default() -> Self {
        SecurityPolicyBuilder {
            max_traversal_depth: DEFAULT_MAX_TRAVERSAL_DEPTH,
            validate_field_names: true,
            field_name_pattern: DEFAULT_FIELD_NAME_PATTERN.to_string(),
            strict_mode: false,
        }
    }
}

impl SecurityPolicyBuilder {
    /// Sets the cascade recursion depth bound.
    pub fn max_traversal_depth(mut self, depth: usize) -> Self {
        self.max_traversal_depth = depth;
        self
    }

    /// Enables or disables sibling field-name validation.
    pub fn validate_field_names(mut self, validate: bool) -> Self {
        self.validate_field_names = validate;
        self
    }

    /// Sets the regex pattern for acceptable field names.
    pub fn field_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.field_name_pattern = pattern.into();
        self
    }

    /// Enables strict mode. Strict mode also turns field-name validation
    /// on, matching the original preset semantics.
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        if strict {
            self.validate_field_names = true;
        }
        self
    }

    /// Builds the policy, compiling the field-name pattern.
    pub fn build(self) -> Result<SecurityPolicy, PolicyError> {
        if self.max_traversal_depth == 0 {
            return Err(PolicyError::InvalidDepth(
                "max traversal depth must be at least 1".to_string(),
            ));
        }

        let field_name_pattern =
            Regex::new(&self.field_name_pattern).map_err(|e| PolicyError::InvalidPattern {
                pattern: self.field_name_pattern.clone(),
                message: e.to_string(),
            })?;

        Ok(SecurityPolicy {
            max_traversal_depth: self.max_traversal_depth,
            validate_field_names: self.validate_field_names,
            field_name_pattern,
            strict_mode: self.strict_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = SecurityPolicy::defaults();
        assert_eq!(policy.max_traversal_depth(), 10);
        assert!(policy.validate_field_names());
        assert!(!policy.strict_mode());
    }

    #[test]
    fn test_strict_enables_field_name_validation() {
        let policy = SecurityPolicy::builder()
            .validate_field_names(false)
            .strict_mode(true)
            .build()
            .unwrap();
        assert!(policy.validate_field_names());
        assert!(policy.strict_mode());
    }

    #[test]
    fn test_permissive_skips_name_check() {
        let policy = SecurityPolicy::permissive();
        assert!(policy.is_valid_field_name("anything-goes!"));
        assert!(!policy.is_valid_field_name(""));
    }

    #[test]
    fn test_field_name_pattern() {
        let policy = SecurityPolicy::defaults();
        assert!(policy.is_valid_field_name("username"));
        assert!(policy.is_valid_field_name("_internal"));
        assert!(policy.is_valid_field_name("field2"));
        assert!(!policy.is_valid_field_name("2field"));
        assert!(!policy.is_valid_field_name("a.b"));
        assert!(!policy.is_valid_field_name("drop table"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = SecurityPolicy::builder().field_name_pattern("[").build();
        assert!(matches!(result, Err(PolicyError::InvalidPattern { .. })));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let result = SecurityPolicy::builder().max_traversal_depth(0).build();
        assert!(matches!(result, Err(PolicyError::InvalidDepth(_))));
    }
}
