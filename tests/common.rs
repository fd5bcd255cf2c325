//! Shared fixtures for pipecheck integration tests
#![allow(dead_code)]

use pipecheck::{Enumeration, FieldDescriptor, FieldValue, Introspect};

/// A flat registration form exercising plain rules.
pub struct User {
    pub username: String,
    pub email: String,
    pub age: i64,
    pub website: Option<String>,
}

impl User {
    pub fn valid() -> Self {
        User {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            age: 30,
            website: None,
        }
    }
}

impl Introspect for User {
    fn fields(&self) -> Vec<FieldDescriptor<'_>> {
        vec![
            FieldDescriptor::new("username", &self.username).rules("required|min:3|max:20"),
            FieldDescriptor::new("email", &self.email).rules("required|email"),
            FieldDescriptor::new("age", self.age).rules("gte:18|lte:120"),
            FieldDescriptor::new("website", &self.website).rules("nullable|url"),
        ]
    }
}

pub struct Address {
    pub street: String,
    pub city: String,
    pub zip: String,
}

impl Address {
    pub fn valid() -> Self {
        Address {
            street: "12 Rue Pasteur".to_string(),
            city: "Lyon".to_string(),
            zip: "69002".to_string(),
        }
    }
}

impl Introspect for Address {
    fn fields(&self) -> Vec<FieldDescriptor<'_>> {
        vec![
            FieldDescriptor::new("street", &self.street).rules("required"),
            FieldDescriptor::new("city", &self.city).rules("required|min:2"),
            FieldDescriptor::new("zip", &self.zip).rules("required|digits:5"),
        ]
    }
}

pub struct Phone {
    pub number: String,
}

impl Introspect for Phone {
    fn fields(&self) -> Vec<FieldDescriptor<'_>> {
        vec![FieldDescriptor::new("number", &self.number).rules("required|digits:10")]
    }
}

/// A nested graph: person -> address, person -> [phones].
pub struct Person {
    pub name: String,
    pub address: Address,
    pub phones: Vec<Phone>,
}

impl Person {
    pub fn valid() -> Self {
        Person {
            name: "ada".to_string(),
            address: Address::valid(),
            phones: vec![Phone {
                number: "0102030405".to_string(),
            }],
        }
    }
}

impl Introspect for Person {
    fn fields(&self) -> Vec<FieldDescriptor<'_>> {
        vec![
            FieldDescriptor::new("name", &self.name).rules("required|min:2"),
            FieldDescriptor::new("address", FieldValue::nested(&self.address)).cascade(),
            FieldDescriptor::new("phones", FieldValue::nested_list(&self.phones)).cascade(),
        ]
    }
}

/// Enumeration token for the `enum` rule tests.
pub struct OrderStatus;

impl Enumeration for OrderStatus {
    fn allowed_names(&self) -> &[&'static str] {
        &["PENDING", "SHIPPED", "DELIVERED"]
    }
}
