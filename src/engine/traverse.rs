#![forbid(unsafe_code)]

//! Object-graph traversal and error aggregation
//!
//! The walker runs every declaration on every field of an object, then
//! cascades into nested objects and collections marked for it. Nested
//! failures become their own error entries addressed by a dotted/indexed
//! path, listed after the object's direct failures.
//!
//! Traversal is bounded two ways: an identity stack of the objects on the
//! current cascade path catches cyclic graphs, and the security policy
//! caps recursion depth.

use crate::engine::dispatch::apply_declaration;
use crate::error::ValidateError;
use crate::introspect::{FieldValue, Introspect};
use crate::policy::SecurityPolicy;
use crate::rules::{RuleContext, RuleRegistry};
use crate::types::{FieldPath, ValidationError, ValidationResult};

/// One validation pass over an object graph
pub(crate) struct Walker<'a> {
    registry: &'a RuleRegistry,
    policy: &'a SecurityPolicy,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(registry: &'a RuleRegistry, policy: &'a SecurityPolicy) -> Self {
        Walker { registry, policy }
    }

    /// Validates the full object graph rooted at `root`.
    pub(crate) fn validate(&self, root: &dyn Introspect) -> Result<ValidationResult, ValidateError> {
        let mut errors = Vec::new();
        let mut visiting = Vec::new();
        self.walk(root, &FieldPath::root(), 0, &mut visiting, &mut errors)?;
        Ok(ValidationResult::failure(errors))
    }

    fn walk(
        &self,
        object: &dyn Introspect,
        path: &FieldPath,
        depth: usize,
        visiting: &mut Vec<Identity>,
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), ValidateError> {
        if depth > self.policy.max_traversal_depth() {
            return Err(ValidateError::DepthExceeded {
                path: display_path(path),
                max: self.policy.max_traversal_depth(),
            });
        }

        let identity = identity_of(object);
        if visiting.contains(&identity) {
            return Err(ValidateError::CyclicGraph(display_path(path)));
        }
        visiting.push(identity);

        let cx = RuleContext::new(object, self.policy);
        let fields = object.fields();

        // Direct failures come before anything a cascade produces.
        for field in &fields {
            let field_path = path.child(field.name());
            let mut messages = Vec::new();
            for declaration in field.declarations() {
                let found = apply_declaration(
                    self.registry,
                    self.policy,
                    field.name(),
                    field.value(),
                    declaration,
                    Some(&cx),
                )?;
                messages.extend(found);
            }
            if !messages.is_empty() {
                errors.push(ValidationError::new(field_path.as_str(), messages));
            }
        }

        for field in &fields {
            if !field.is_cascade() {
                continue;
            }
            let field_path = path.child(field.name());
            match field.value() {
                FieldValue::Nested(inner) => {
                    self.walk(*inner, &field_path, depth + 1, visiting, errors)?;
                }
                FieldValue::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        if let FieldValue::Nested(inner) = item {
                            self.walk(*inner, &field_path.index(i), depth + 1, visiting, errors)?;
                        }
                    }
                }
                // Absent slots and scalars have nothing to cascade into.
                _ => {}
            }
        }

        visiting.pop();
        Ok(())
    }
}

/// An object's identity on the cascade path.
///
/// The address alone is not enough: a nested member stored inline at the
/// start of its parent shares the parent's address, so the type label
/// disambiguates. Only the same object revisited compares equal.
type Identity = (*const (), &'static str);

fn identity_of(object: &dyn Introspect) -> Identity {
    (
        object as *const dyn Introspect as *const (),
        object.type_label(),
    )
}

fn display_path(path: &FieldPath) -> String {
    if path.as_str().is_empty() {
        "<root>".to_string()
    } else {
        path.as_str().to_string()
    }
}
