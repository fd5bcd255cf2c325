#![forbid(unsafe_code)]

//! Rule registry: a thread-safe mapping from rule name to rule instance
//!
//! Callers may validate concurrently while another thread registers a new
//! custom rule, so the map tolerates concurrent reads during writes.
//! Rules are stored as `Arc<dyn Rule>` so a dispatch holds its resolved
//! rule independent of later registry mutation.

use crate::error::RuleError;
use crate::rules::Rule;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry for storing and managing validation rules
///
/// Registration inserts or overwrites by rule name. Lookup during live
/// dispatch goes through [`RuleRegistry::lookup_required`]: an
/// unresolvable rule name is always a caller configuration error, never a
/// data error.
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, Arc<dyn Rule>>>,
}

impl RuleRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        RuleRegistry {
            rules: RwLock::new(HashMap::with_capacity(32)),
        }
    }

    /// Registers a rule, overwriting any rule with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidRule`] if the rule name is empty or
    /// blank.
    pub fn register<R: Rule + 'static>(&self, rule: R) -> Result<(), RuleError> {
        self.register_arc(Arc::new(rule))
    }

    /// Registers an already-shared rule instance.
    pub fn register_arc(&self, rule: Arc<dyn Rule>) -> Result<(), RuleError> {
        let name = rule.name().to_string();
        if name.trim().is_empty() {
            return Err(RuleError::InvalidRule(
                "rule name cannot be empty or blank".to_string(),
            ));
        }

        let mut rules = self.rules.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        rules.insert(name, rule);
        Ok(())
    }

    /// Registers several rules, stopping at the first invalid one.
    pub fn register_all(
        &self,
        rules: impl IntoIterator<Item = Arc<dyn Rule>>,
    ) -> Result<(), RuleError> {
        for rule in rules {
            self.register_arc(rule)?;
        }
        Ok(())
    }

    /// Looks up a rule by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Rule>> {
        if name.trim().is_empty() {
            return None;
        }
        let rules = self.rules.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        rules.get(name).cloned()
    }

    /// Looks up a rule by name, failing on unknown names.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownRule`] if no rule is registered under
    /// the name.
    pub fn lookup_required(&self, name: &str) -> Result<Arc<dyn Rule>, RuleError> {
        self.lookup(name)
            .ok_or_else(|| RuleError::UnknownRule(name.to_string()))
    }

    /// Whether a rule is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// The registered rule names, unordered.
    pub fn names(&self) -> Vec<String> {
        let rules = self.rules.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        rules.keys().cloned().collect()
    }

    /// The number of registered rules.
    pub fn len(&self) -> usize {
        let rules = self.rules.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        rules.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
