//! Built-in rule behavior through the single-value API

use pipecheck::{FieldValue, ValidationContext};

fn context() -> ValidationContext {
    ValidationContext::new()
}

fn first_message(context: &ValidationContext, value: FieldValue<'_>, expression: &str) -> Option<String> {
    let result = context.validate_value(value, expression, "field").unwrap();
    result
        .error_for("field")
        .and_then(|e| e.messages.first().cloned())
}

#[test]
fn test_string_length_rules() {
    let cx = context();
    assert!(cx.validate_value("alice", "min:3|max:20", "name").unwrap().valid());
    assert_eq!(
        first_message(&cx, FieldValue::Str("al"), "min:3"),
        Some("The field must be at least 3 characters.".to_string())
    );
    assert_eq!(
        first_message(&cx, FieldValue::Str("much too long"), "max:5"),
        Some("The field must not exceed 5 characters.".to_string())
    );
}

#[test]
fn test_min_counts_characters_not_bytes() {
    let cx = context();
    assert!(cx.validate_value("héllo", "min:5|max:5", "name").unwrap().valid());
}

#[test]
fn test_email_rule() {
    let cx = context();
    assert!(cx.validate_value("a.user+tag@example.co.uk", "email", "email").unwrap().valid());
    assert_eq!(
        first_message(&cx, FieldValue::Str("not-an-email"), "email"),
        Some("The field must be a valid email address.".to_string())
    );
}

#[test]
fn test_numeric_bounds() {
    let cx = context();
    assert!(cx.validate_value(25, "gt:18|lt:100", "age").unwrap().valid());
    assert_eq!(
        first_message(&cx, FieldValue::Int(18), "gt:18"),
        Some("The field must be greater than 18.".to_string())
    );
    assert!(cx.validate_value(18, "gte:18", "age").unwrap().valid());
    assert_eq!(
        first_message(&cx, FieldValue::Int(17), "gte:18"),
        Some("The field must be at least 18.".to_string())
    );
    assert_eq!(
        first_message(&cx, FieldValue::Float(4.5), "lte:4"),
        Some("The field must be at most 4.".to_string())
    );
}

#[test]
fn test_between_rule() {
    let cx = context();
    assert!(cx.validate_value(30, "between:18,65", "age").unwrap().valid());
    assert!(cx.validate_value(18, "between:18,65", "age").unwrap().valid());
    assert_eq!(
        first_message(&cx, FieldValue::Int(70), "between:18,65"),
        Some("The field must be between 18 and 65.".to_string())
    );
}

#[test]
fn test_regex_rule() {
    let cx = context();
    assert!(cx.validate_value("AB-1234", "regex:^[A-Z]{2}-\\d{4}$", "plate").unwrap().valid());
    assert_eq!(
        first_message(&cx, FieldValue::Str("nope"), "regex:^[A-Z]{2}-\\d{4}$"),
        Some("The field format is invalid.".to_string())
    );
}

#[test]
fn test_character_class_rules() {
    let cx = context();
    assert!(cx.validate_value("Letters", "alpha", "x").unwrap().valid());
    assert!(!cx.validate_value("letters2", "alpha", "x").unwrap().valid());
    assert!(cx.validate_value("letters2", "alphanum", "x").unwrap().valid());
    assert!(!cx.validate_value("spaced out", "alphanum", "x").unwrap().valid());
}

#[test]
fn test_in_rule() {
    let cx = context();
    assert!(cx.validate_value("admin", "in:admin,editor,viewer", "role").unwrap().valid());
    assert_eq!(
        first_message(&cx, FieldValue::Str("guest"), "in:admin,editor,viewer"),
        Some("The field must be one of: admin,editor,viewer.".to_string())
    );
}

#[test]
fn test_format_rules() {
    let cx = context();
    assert!(cx.validate_value("https://example.com/a", "url", "x").unwrap().valid());
    assert!(!cx.validate_value("example.com", "url", "x").unwrap().valid());

    assert!(cx.validate_value("192.168.0.1", "ip", "x").unwrap().valid());
    assert!(!cx.validate_value("999.0.0.1", "ip", "x").unwrap().valid());

    assert!(
        cx.validate_value("550e8400-e29b-41d4-a716-446655440000", "uuid", "x").unwrap().valid()
    );
    assert!(!cx.validate_value("550e8400", "uuid", "x").unwrap().valid());

    assert!(cx.validate_value(r#"{"ok": true}"#, "json", "x").unwrap().valid());
    assert!(!cx.validate_value("{broken", "json", "x").unwrap().valid());
}

#[test]
fn test_date_rules() {
    let cx = context();
    assert!(cx.validate_value("2024-06-01", "date", "x").unwrap().valid());
    assert!(cx.validate_value("2024-06-01T12:30:00", "date", "x").unwrap().valid());
    assert!(!cx.validate_value("June 1st", "date", "x").unwrap().valid());

    assert!(cx.validate_value("01/06/2024", "date:%d/%m/%Y", "x").unwrap().valid());
    assert!(!cx.validate_value("2024-06-01", "date:%d/%m/%Y", "x").unwrap().valid());

    assert!(cx.validate_value("2020-01-01", "before:2021-01-01", "x").unwrap().valid());
    assert!(!cx.validate_value("2022-01-01", "before:2021-01-01", "x").unwrap().valid());
    assert!(cx.validate_value("2022-01-01", "after:2021-01-01", "x").unwrap().valid());

    assert!(cx.validate_value("2999-01-01", "future", "x").unwrap().valid());
    assert!(cx.validate_value("1999-01-01", "past", "x").unwrap().valid());
    assert!(!cx.validate_value("2999-01-01", "past", "x").unwrap().valid());
}

#[test]
fn test_size_and_digits() {
    let cx = context();
    assert!(cx.validate_value("abcd", "size:4", "x").unwrap().valid());
    assert!(!cx.validate_value("abc", "size:4", "x").unwrap().valid());

    let items = FieldValue::List(vec![FieldValue::Int(1), FieldValue::Int(2)]);
    assert!(cx.validate_value(items, "size:2", "x").unwrap().valid());

    assert!(cx.validate_value("0456", "digits:4", "x").unwrap().valid());
    assert!(!cx.validate_value("04a6", "digits:4", "x").unwrap().valid());
    assert!(cx.validate_value(1234, "digits:4", "x").unwrap().valid());
}

#[test]
fn test_distinct_rule() {
    let cx = context();
    let unique = FieldValue::List(vec![
        FieldValue::Str("a"),
        FieldValue::Str("b"),
        FieldValue::Str("c"),
    ]);
    assert!(cx.validate_value(unique, "distinct", "tags").unwrap().valid());

    let duplicated = FieldValue::List(vec![
        FieldValue::Str("a"),
        FieldValue::Str("b"),
        FieldValue::Str("a"),
    ]);
    assert_eq!(
        first_message(&cx, duplicated, "distinct"),
        Some("The field must contain only distinct values.".to_string())
    );
}

#[test]
fn test_absent_values_skip_non_presence_rules() {
    let cx = context();
    for expression in [
        "min:3", "max:3", "email", "numeric", "gt:1", "between:1,2", "regex:^x$", "alpha",
        "alphanum", "in:a,b", "url", "ip", "uuid", "json", "date", "future", "past", "size:2",
        "digits:3", "distinct",
    ] {
        let result = cx.validate_value(FieldValue::Absent, expression, "x").unwrap();
        assert!(result.valid(), "absent value should pass `{expression}`");
    }

    assert!(!cx.validate_value(FieldValue::Absent, "required", "x").unwrap().valid());
}

#[test]
fn test_nullable_documents_optionality() {
    let cx = context();
    assert!(cx.validate_value(FieldValue::Absent, "nullable|email", "x").unwrap().valid());
    assert!(!cx.validate_value("nope", "nullable|email", "x").unwrap().valid());
}
