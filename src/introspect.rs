#![forbid(unsafe_code)]

//! Introspection seam between typed objects and the validation engine
//!
//! The engine never reflects over concrete types. Instead, a validatable
//! object implements [`Introspect`] and hands the engine a list of
//! [`FieldDescriptor`]s: one `(name, value, declarations, cascade)` tuple
//! per structural member. Descriptors are built fresh on every traversal
//! and never cached, so the engine stays stateless between calls.
//!
//! Field values are presented through the borrowed [`FieldValue`] view,
//! which covers scalars, ordered collections, and nested validatable
//! objects.

use crate::error::RuleError;
use crate::policy::SecurityPolicy;
use crate::rules::Enumeration;
use std::fmt;
use std::sync::Arc;

/// A dynamically-shaped, borrowed view of one field's value
pub enum FieldValue<'a> {
    /// No value present (`None`, null)
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    /// Ordered collection; `Absent` slots are legal and skipped by cascade
    List(Vec<FieldValue<'a>>),
    /// A nested validatable object
    Nested(&'a dyn Introspect),
}

impl<'a> FieldValue<'a> {
    /// Wraps a nested validatable object.
    pub fn nested<T: Introspect>(value: &'a T) -> Self {
        FieldValue::Nested(value)
    }

    /// Wraps an optional nested object.
    pub fn nested_opt<T: Introspect>(value: &'a Option<T>) -> Self {
        match value {
            Some(inner) => FieldValue::Nested(inner),
            None => FieldValue::Absent,
        }
    }

    /// Wraps a slice of nested objects as a list.
    pub fn nested_list<T: Introspect>(items: &'a [T]) -> Self {
        FieldValue::List(items.iter().map(|item| FieldValue::Nested(item)).collect())
    }

    /// Wraps a slice of optional nested objects; `None` slots become
    /// `Absent` and are skipped by the cascade engine.
    pub fn nested_opt_list<T: Introspect>(items: &'a [Option<T>]) -> Self {
        FieldValue::List(
            items
                .iter()
                .map(|slot| match slot {
                    Some(inner) => FieldValue::Nested(inner),
                    None => FieldValue::Absent,
                })
                .collect(),
        )
    }

    /// Whether no value is present.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// The scalar text of this value, used for parameter comparisons in
    /// conditional rules. Lists and nested objects have no text.
    pub fn render(&self) -> Option<String> {
        match self {
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Int(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Str(s) => Some((*s).to_string()),
            FieldValue::Absent | FieldValue::List(_) | FieldValue::Nested(_) => None,
        }
    }

    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The string value, if this is a string.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => write!(f, "Absent"),
            FieldValue::Bool(b) => write!(f, "Bool({b})"),
            FieldValue::Int(i) => write!(f, "Int({i})"),
            FieldValue::Float(x) => write!(f, "Float({x})"),
            FieldValue::Str(s) => write!(f, "Str({s:?})"),
            FieldValue::List(items) => f.debug_list().entries(items).finish(),
            FieldValue::Nested(_) => write!(f, "Nested(..)"),
        }
    }
}

/// Structural equality for sibling comparisons (`same`, `different`,
/// `confirmed`). Nested objects never compare equal; identity is not a
/// meaningful notion of field equality.
impl PartialEq for FieldValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Absent, FieldValue::Absent) => true,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (FieldValue::Int(a), FieldValue::Float(b)) | (FieldValue::Float(b), FieldValue::Int(a)) => {
                *a as f64 == *b
            }
            (FieldValue::Str(a), FieldValue::Str(b)) => a == b,
            (FieldValue::List(a), FieldValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        FieldValue::Str(s)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(s: &'a String) -> Self {
        FieldValue::Str(s)
    }
}

/// Scalar types with a canonical [`FieldValue`] view
///
/// The `Option`, `Vec`, and slice conversions below are written against
/// this trait rather than `Into<FieldValue>`, so containers lift one
/// level of scalars and never nest.
pub trait ScalarValue {
    /// The value as a borrowed [`FieldValue`].
    fn field_value(&self) -> FieldValue<'_>;
}

impl ScalarValue for String {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl ScalarValue for &str {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl ScalarValue for bool {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

macro_rules! scalar_field_value {
    ($($ty:ty => $variant:ident as $cast:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue<'_> {
                fn from(v: $ty) -> Self {
                    FieldValue::$variant(v as $cast)
                }
            }

            impl<'a> From<&'a $ty> for FieldValue<'a> {
                fn from(v: &'a $ty) -> Self {
                    FieldValue::$variant(*v as $cast)
                }
            }

            impl ScalarValue for $ty {
                fn field_value(&self) -> FieldValue<'_> {
                    FieldValue::$variant(*self as $cast)
                }
            }
        )*
    };
}

scalar_field_value! {
    i64 => Int as i64,
    i32 => Int as i64,
    i16 => Int as i64,
    u32 => Int as i64,
    u16 => Int as i64,
    u8 => Int as i64,
    f64 => Float as f64,
    f32 => Float as f64,
}

impl From<bool> for FieldValue<'_> {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<'a> From<&'a bool> for FieldValue<'a> {
    fn from(b: &'a bool) -> Self {
        FieldValue::Bool(*b)
    }
}

impl<'a, T: ScalarValue> From<&'a Option<T>> for FieldValue<'a> {
    fn from(opt: &'a Option<T>) -> Self {
        match opt {
            Some(v) => v.field_value(),
            None => FieldValue::Absent,
        }
    }
}

impl<'a, T: ScalarValue> From<&'a Vec<T>> for FieldValue<'a> {
    fn from(items: &'a Vec<T>) -> Self {
        FieldValue::List(items.iter().map(ScalarValue::field_value).collect())
    }
}

impl<'a, T: ScalarValue> From<&'a [T]> for FieldValue<'a> {
    fn from(items: &'a [T]) -> Self {
        FieldValue::List(items.iter().map(ScalarValue::field_value).collect())
    }
}

/// One rule expression attached to a field, with an optional override
/// message and optional enumeration token
#[derive(Clone)]
pub struct RuleDeclaration {
    expression: String,
    message: Option<String>,
    members: Option<Arc<dyn Enumeration>>,
}

impl RuleDeclaration {
    /// Creates a declaration from a rule expression.
    pub fn new(expression: impl Into<String>) -> Self {
        RuleDeclaration {
            expression: expression.into(),
            message: None,
            members: None,
        }
    }

    /// Sets the override message substituted for any failure in this
    /// declaration.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches the enumeration token consumed by the `enum` rule.
    pub fn with_members(mut self, members: Arc<dyn Enumeration>) -> Self {
        self.members = Some(members);
        self
    }

    /// The raw rule expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The override message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The enumeration token, if any.
    pub fn members(&self) -> Option<&dyn Enumeration> {
        self.members.as_deref()
    }
}

impl fmt::Debug for RuleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDeclaration")
            .field("expression", &self.expression)
            .field("message", &self.message)
            .field("members", &self.members.as_ref().map(|m| m.allowed_names()))
            .finish()
    }
}

/// One structural member of a validatable object
///
/// Built by [`Introspect::fields`] implementations through the builder
/// methods:
///
/// ```ignore
/// FieldDescriptor::new("username", &self.username).rules("required|min:3|max:20")
/// FieldDescriptor::new("address", FieldValue::nested(&self.address)).cascade()
/// ```
#[derive(Debug)]
pub struct FieldDescriptor<'a> {
    name: String,
    value: FieldValue<'a>,
    declarations: Vec<RuleDeclaration>,
    cascade: bool,
}

impl<'a> FieldDescriptor<'a> {
    /// Creates a descriptor with no declarations attached.
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue<'a>>) -> Self {
        FieldDescriptor {
            name: name.into(),
            value: value.into(),
            declarations: Vec::new(),
            cascade: false,
        }
    }

    /// Attaches a rule expression.
    pub fn rules(mut self, expression: impl Into<String>) -> Self {
        self.declarations.push(RuleDeclaration::new(expression));
        self
    }

    /// Attaches a rule expression with an override message.
    pub fn rules_with_message(
        mut self,
        expression: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.declarations
            .push(RuleDeclaration::new(expression).with_message(message));
        self
    }

    /// Attaches a rule expression carrying an enumeration token.
    pub fn rules_with_members(
        mut self,
        expression: impl Into<String>,
        members: Arc<dyn Enumeration>,
    ) -> Self {
        self.declarations
            .push(RuleDeclaration::new(expression).with_members(members));
        self
    }

    /// Attaches a pre-built declaration.
    pub fn declaration(mut self, declaration: RuleDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Marks this field for cascading validation into its value.
    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field value view.
    pub fn value(&self) -> &FieldValue<'a> {
        &self.value
    }

    /// Consumes the descriptor, returning its value.
    pub fn into_value(self) -> FieldValue<'a> {
        self.value
    }

    /// The attached declarations, in declaration order.
    pub fn declarations(&self) -> &[RuleDeclaration] {
        &self.declarations
    }

    /// Whether the field is marked for cascading.
    pub fn is_cascade(&self) -> bool {
        self.cascade
    }
}

/// Capability interface for objects the engine can validate
///
/// This is the one language-specific seam: however a caller surfaces
/// "attach this rule string to this field", the engine only ever sees the
/// descriptor list.
pub trait Introspect {
    /// Enumerates the object's structural members, in declaration order.
    fn fields(&self) -> Vec<FieldDescriptor<'_>>;

    /// A label identifying the implementing type.
    ///
    /// Traversal pairs it with the object address when tracking the
    /// cascade path; the address alone cannot tell an object apart from
    /// a member stored inline at its start.
    fn type_label(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Resolves a sibling field's current value on the root object.
///
/// The name is checked against the security policy first; a failing check
/// is an [`RuleError::InvalidFieldReference`] fault (this stops rule
/// parameters being used as an injection vector). A missing sibling is
/// `Ok(None)`, never an error; it simply compares as unset.
pub fn sibling_value<'a>(
    root: &'a dyn Introspect,
    name: &str,
    policy: &SecurityPolicy,
) -> Result<Option<FieldValue<'a>>, RuleError> {
    if !policy.is_valid_field_name(name) {
        return Err(RuleError::InvalidFieldReference(name.to_string()));
    }

    let mut fields = root.fields();
    match fields.iter().position(|field| field.name() == name) {
        Some(position) => Ok(Some(fields.swap_remove(position).into_value())),
        None => Ok(None),
    }
}
