#![forbid(unsafe_code)]

//! Rule definitions, built-in rules, and the rule registry

mod builtin;
mod conditional;
mod enumeration;
mod registry;
mod rule;

pub use builtin::register_builtins;
pub use enumeration::Enumeration;
pub use registry::RuleRegistry;
pub use rule::{Rule, RuleContext, RuleKind, RuleOutcome};
