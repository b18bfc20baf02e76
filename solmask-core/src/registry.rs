//! registry.rs - The ordered, copy-on-write rule registry.
//!
//! Readers take a [`RuleSet`] snapshot without locking and keep using it for
//! the whole call, so a concurrent writer can never expose a half-applied
//! update. Writers are serialized, build a fresh `RuleSet` and swap it in.
//!
//! License: MIT OR APACHE 2.0

use arc_swap::{ArcSwap, Guard};
use log::{debug, info};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::builtin_rule_specs;
use crate::errors::MaskingError;
use crate::rule::{compile_rules, Rule};

/// An immutable, ordered list of rules. Registration order is application order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<Rule>>,
}

impl RuleSet {
    fn from_vec(rules: Vec<Arc<Rule>>) -> Self {
        Self { rules }
    }

    /// All rules, enabled or not, in order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Enabled rules in application order.
    pub fn enabled(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.iter().filter(|r| r.is_enabled())
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.iter().find(|r| r.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|r| r.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name() == name)
    }
}

/// Thread-safe registry of masking rules.
pub struct RuleRegistry {
    current: ArcSwap<RuleSet>,
    write_lock: Mutex<()>,
}

impl RuleRegistry {
    /// A registry with no rules at all.
    pub fn empty() -> Self {
        Self {
            current: ArcSwap::from_pointee(RuleSet::default()),
            write_lock: Mutex::new(()),
        }
    }

    /// Builds a registry from already compiled rules, keeping their order.
    ///
    /// # Errors
    ///
    /// [`MaskingError::DuplicateRuleName`] if two rules share a name.
    pub fn from_rules<I>(rules: I) -> Result<Self, MaskingError>
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for rule in rules {
            if !seen.insert(rule.name().to_string()) {
                return Err(MaskingError::DuplicateRuleName(rule.name().to_string()));
            }
            list.push(Arc::new(rule));
        }
        Ok(Self {
            current: ArcSwap::from_pointee(RuleSet::from_vec(list)),
            write_lock: Mutex::new(()),
        })
    }

    /// Builds a registry holding the embedded built-in rules.
    pub fn with_builtin_rules() -> Result<Self, MaskingError> {
        let specs = builtin_rule_specs()?;
        let registry = Self::from_rules(compile_rules(&specs)?)?;
        info!("Rule registry initialized with {} built-in rules.", registry.len());
        Ok(registry)
    }

    /// A consistent, owned view of the current rules.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        self.current.load_full()
    }

    /// A cheaper, short-lived view for hot paths.
    pub fn load(&self) -> Guard<Arc<RuleSet>> {
        self.current.load()
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    pub fn rule_names(&self) -> Vec<String> {
        self.current.load().names()
    }

    /// Appends `rule` to the end of the application order.
    ///
    /// # Errors
    ///
    /// [`MaskingError::DuplicateRuleName`] if a rule with the same name exists.
    pub fn add_rule(&self, rule: Rule) -> Result<(), MaskingError> {
        self.update(|rules| {
            if rules.iter().any(|r| r.name() == rule.name()) {
                return Err(MaskingError::DuplicateRuleName(rule.name().to_string()));
            }
            debug!("Adding rule '{}'.", rule.name());
            rules.push(Arc::new(rule));
            Ok(())
        })
    }

    /// Adds `rule`, removing any existing rule with the same name first.
    ///
    /// The new rule always lands at the end of the application order.
    /// Returns the rule it replaced, if any.
    pub fn replace_rule(&self, rule: Rule) -> Option<Arc<Rule>> {
        let result: Result<_, MaskingError> = self.update(|rules| {
            let old = rules
                .iter()
                .position(|r| r.name() == rule.name())
                .map(|idx| rules.remove(idx));
            debug!(
                "{} rule '{}'.",
                if old.is_some() { "Replacing" } else { "Adding" },
                rule.name()
            );
            rules.push(Arc::new(rule));
            Ok(old)
        });
        result.ok().flatten()
    }

    /// Removes a rule by name. Returns it if it was present.
    pub fn remove_rule(&self, name: &str) -> Option<Arc<Rule>> {
        let result: Result<_, MaskingError> = self.update(|rules| {
            let removed = rules
                .iter()
                .position(|r| r.name() == name)
                .map(|idx| rules.remove(idx));
            if removed.is_some() {
                debug!("Removed rule '{}'.", name);
            }
            Ok(removed)
        });
        result.ok().flatten()
    }

    /// Swaps in a copy of the named rule with its enabled flag set.
    ///
    /// The rule keeps its position. Returns false if no such rule exists.
    pub fn set_enabled(&self, name: &str, enabled: bool) -> bool {
        let result: Result<bool, MaskingError> = self.update(|rules| {
            let Some(idx) = rules.iter().position(|r| r.name() == name) else {
                return Ok(false);
            };
            if rules[idx].is_enabled() != enabled {
                let toggled = Rule::clone(&rules[idx]).with_enabled(enabled);
                rules[idx] = Arc::new(toggled);
                debug!(
                    "Rule '{}' {}.",
                    name,
                    if enabled { "enabled" } else { "disabled" }
                );
            }
            Ok(true)
        });
        result.unwrap_or(false)
    }

    pub fn enable_rule(&self, name: &str) -> bool {
        self.set_enabled(name, true)
    }

    pub fn disable_rule(&self, name: &str) -> bool {
        self.set_enabled(name, false)
    }

    /// Runs `edit` on a private copy of the rule list and publishes it on success.
    fn update<T, F>(&self, edit: F) -> Result<T, MaskingError>
    where
        F: FnOnce(&mut Vec<Arc<Rule>>) -> Result<T, MaskingError>,
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let current = self.current.load_full();
        let mut rules = current.rules.clone();
        let out = edit(&mut rules)?;
        if rules.len() != current.rules.len()
            || rules.iter().zip(&current.rules).any(|(a, b)| !Arc::ptr_eq(a, b))
        {
            self.current.store(Arc::new(RuleSet::from_vec(rules)));
        }
        Ok(out)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rule_names())
            .finish()
    }
}
