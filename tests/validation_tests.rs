//! End-to-end object validation through an isolated context

mod common;

use common::User;
use pipecheck::{
    FieldDescriptor, Introspect, RuleError, ValidateError, ValidationContext,
};

#[test]
fn test_valid_object_passes() {
    let context = ValidationContext::new();
    let result = context.validate(&User::valid()).unwrap();
    assert!(result.valid());
    assert!(result.errors().is_empty());
}

#[test]
fn test_all_failures_collected() {
    let context = ValidationContext::new();
    let user = User {
        username: "ab".to_string(),
        email: "nope".to_string(),
        age: 12,
        website: Some("not a url".to_string()),
    };

    let result = context.validate(&user).unwrap();
    assert!(!result.valid());
    assert_eq!(result.errors().len(), 4);
}

#[test]
fn test_rule_order_preserved_within_field() {
    struct Form {
        code: String,
    }

    impl Introspect for Form {
        fn fields(&self) -> Vec<FieldDescriptor<'_>> {
            vec![FieldDescriptor::new("code", &self.code).rules("min:5|alpha|max:3")]
        }
    }

    let context = ValidationContext::new();
    let result = context
        .validate(&Form {
            code: "a1b2".to_string(),
        })
        .unwrap();

    let entry = result.error_for("code").unwrap();
    assert_eq!(
        entry.messages,
        vec![
            "The code must be at least 5 characters.".to_string(),
            "The code must contain only alphabetic characters.".to_string(),
            "The code must not exceed 3 characters.".to_string(),
        ]
    );
}

#[test]
fn test_no_short_circuit_after_required_failure() {
    struct Form {
        name: String,
    }

    impl Introspect for Form {
        fn fields(&self) -> Vec<FieldDescriptor<'_>> {
            vec![FieldDescriptor::new("name", &self.name).rules("required|min:3")]
        }
    }

    let context = ValidationContext::new();
    let result = context
        .validate(&Form {
            name: String::new(),
        })
        .unwrap();

    let entry = result.error_for("name").unwrap();
    assert_eq!(
        entry.messages,
        vec![
            "The name field is required.".to_string(),
            // min skips the empty-as-absent question: "" is a present
            // string of length 0, so min applies.
            "The name must be at least 3 characters.".to_string(),
        ]
    );
}

#[test]
fn test_override_message_substitution() {
    struct Form {
        nickname: String,
    }

    impl Introspect for Form {
        fn fields(&self) -> Vec<FieldDescriptor<'_>> {
            vec![
                FieldDescriptor::new("nickname", &self.nickname)
                    .rules_with_message("required|min:3", "Please pick a nickname."),
            ]
        }
    }

    let context = ValidationContext::new();

    // Both required and min fail on the empty string, and the override
    // stands in for each failure.
    let result = context
        .validate(&Form {
            nickname: String::new(),
        })
        .unwrap();
    let entry = result.error_for("nickname").unwrap();
    assert_eq!(
        entry.messages,
        vec![
            "Please pick a nickname.".to_string(),
            "Please pick a nickname.".to_string(),
        ]
    );

    // Only min fails here, so the override appears once.
    let result = context
        .validate(&Form {
            nickname: "al".to_string(),
        })
        .unwrap();
    let entry = result.error_for("nickname").unwrap();
    assert_eq!(entry.messages, vec!["Please pick a nickname.".to_string()]);
}

#[test]
fn test_unknown_rule_is_a_fault() {
    struct Form {
        x: String,
    }

    impl Introspect for Form {
        fn fields(&self) -> Vec<FieldDescriptor<'_>> {
            vec![FieldDescriptor::new("x", &self.x).rules("no_such_rule")]
        }
    }

    let context = ValidationContext::new();
    let err = context.validate(&Form { x: "v".to_string() }).unwrap_err();
    assert!(matches!(
        err,
        ValidateError::Rule(RuleError::UnknownRule(name)) if name == "no_such_rule"
    ));
}

#[test]
fn test_validate_or_fail_carries_result() {
    let context = ValidationContext::new();
    let user = User {
        username: String::new(),
        ..User::valid()
    };

    let err = context.validate_or_fail(&user).unwrap_err();
    let result = err.failure().unwrap();
    assert!(result.error_for("username").is_some());
    assert!(result.error_for("email").is_none());
}

#[test]
fn test_result_round_trips_as_json() {
    let context = ValidationContext::new();
    let user = User {
        email: "nope".to_string(),
        ..User::valid()
    };

    let result = context.validate(&user).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: pipecheck::ValidationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
