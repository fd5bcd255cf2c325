#![forbid(unsafe_code)]

//! Core domain types for pipecheck
//!
//! This module defines the validation outcome model and the field path
//! newtype used to address nested fields in error reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validation error for a single field
///
/// Multiple rule failures on the same field produce one `ValidationError`
/// with multiple messages, preserving rule execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted/indexed path of the field that failed (e.g. `address.street`,
    /// `phones[1].number`)
    pub field: String,

    /// Error messages in rule declaration order
    pub messages: Vec<String>,
}

impl ValidationError {
    /// Creates a new validation error for a field.
    pub fn new(field: impl Into<String>, messages: Vec<String>) -> Self {
        ValidationError {
            field: field.into(),
            messages,
        }
    }
}

/// The immutable outcome of a validation call
///
/// `valid()` is true exactly when the error list is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Creates a successful result with no errors.
    pub fn success() -> Self {
        ValidationResult {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Creates a result from the collected errors.
    ///
    /// An empty error list yields a successful result.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Whether validation passed.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// The ordered list of field errors (empty when valid).
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Looks up the error entry for a field path.
    pub fn error_for(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

/// A dotted/indexed path addressing a field inside an object graph
///
/// The root is the empty path; `child` appends `.name` segments and
/// `index` appends `[i]` to the last segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(String);

impl FieldPath {
    /// Creates the root (empty) path.
    pub fn root() -> Self {
        FieldPath(String::new())
    }

    /// Creates a path from a bare field name.
    pub fn new(name: impl Into<String>) -> Self {
        FieldPath(name.into())
    }

    /// Returns the path extended by a child field name.
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            FieldPath(name.to_string())
        } else {
            FieldPath(format!("{}.{}", self.0, name))
        }
    }

    /// Returns the path extended by a collection index.
    pub fn index(&self, i: usize) -> Self {
        FieldPath(format!("{}[{}]", self.0, i))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_success() {
        let result = ValidationResult::success();
        assert!(result.valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_result_failure() {
        let result = ValidationResult::failure(vec![ValidationError::new(
            "email",
            vec!["The email must be a valid email address.".to_string()],
        )]);
        assert!(!result.valid());
        assert_eq!(result.errors().len(), 1);
        assert!(result.error_for("email").is_some());
        assert!(result.error_for("username").is_none());
    }

    #[test]
    fn test_failure_with_empty_errors_is_valid() {
        let result = ValidationResult::failure(vec![]);
        assert!(result.valid());
    }

    #[test]
    fn test_field_path_building() {
        let root = FieldPath::root();
        assert_eq!(root.child("address").as_str(), "address");
        assert_eq!(root.child("address").child("street").as_str(), "address.street");
        assert_eq!(
            root.child("phones").index(1).child("number").as_str(),
            "phones[1].number"
        );
    }

    #[test]
    fn test_result_serializes() {
        let result = ValidationResult::failure(vec![ValidationError::new(
            "age",
            vec!["The age must be at least 18.".to_string()],
        )]);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"valid\":false"));
        assert!(json.contains("\"age\""));

        let back: ValidationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
