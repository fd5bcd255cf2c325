#![forbid(unsafe_code)]

//! Pipecheck: declarative, rule-based validation for object graphs
//!
//! Fields carry pipe-separated rule expressions such as
//! `"required|min:3|max:20"`. An object exposes its fields through the
//! [`Introspect`] trait and the engine runs every declared rule, collects
//! every failure, and cascades into nested objects and collections:
//!
//! ```
//! use pipecheck::{FieldDescriptor, Introspect, validate};
//!
//! struct User {
//!     username: String,
//!     email: String,
//! }
//!
//! impl Introspect for User {
//!     fn fields(&self) -> Vec<FieldDescriptor<'_>> {
//!         vec![
//!             FieldDescriptor::new("username", &self.username).rules("required|min:3|max:20"),
//!             FieldDescriptor::new("email", &self.email).rules("required|email"),
//!         ]
//!     }
//! }
//!
//! let user = User {
//!     username: "al".to_string(),
//!     email: "not-an-email".to_string(),
//! };
//! let result = validate(&user).unwrap();
//! assert!(!result.valid());
//! assert!(result.error_for("username").is_some());
//! ```
//!
//! Bad data is never an `Err`; configuration faults (unknown rules,
//! malformed declarations, cyclic graphs) are.

pub mod context;
mod engine;
pub mod error;
pub mod expr;
pub mod introspect;
pub mod policy;
pub mod rules;
pub mod types;

// Re-export the top-level API for convenient access
pub use context::{
    ValidationContext, default_context, register_rule, security_policy, set_security_policy,
    validate, validate_or_fail, validate_value,
};

// Re-export error types for convenient access
pub use error::{PolicyError, RuleError, ValidateError};

// Re-export core domain types for convenient access
pub use introspect::{FieldDescriptor, FieldValue, Introspect, RuleDeclaration, ScalarValue};
pub use policy::{SecurityPolicy, SecurityPolicyBuilder};
pub use rules::{Enumeration, Rule, RuleContext, RuleKind, RuleOutcome, RuleRegistry};
pub use types::{FieldPath, ValidationError, ValidationResult};
