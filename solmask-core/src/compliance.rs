//! compliance.rs - Judges whether text satisfies named regulatory standards.
//!
//! A standard requires a set of rule categories to be unreadable. A text
//! complies when none of those categories is still detectable in it.
//!
//! The built-in catalog is derived from the `compliance` tags of the rules it
//! is built from, and custom standards can be registered on top. At check time
//! a standard's categories are its registered categories plus every rule of
//! the current snapshot tagged with it, so custom rules carrying a tag are
//! picked up automatically.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::MaskingLimits;
use crate::errors::MaskingError;
use crate::redactor;
use crate::registry::RuleSet;

/// A named standard and the rule categories it requires to be masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceStandard {
    pub name: String,
    pub required_categories: BTreeSet<String>,
}

impl ComplianceStandard {
    pub fn new<I, S>(name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            required_categories: categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// Registered standards, keyed by upper-cased name.
#[derive(Debug, Clone, Default)]
pub struct ComplianceCatalog {
    standards: BTreeMap<String, ComplianceStandard>,
}

fn key_of(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

impl ComplianceCatalog {
    /// Builds a catalog with one standard per distinct compliance tag in `rules`.
    pub fn from_rules(rules: &RuleSet) -> Self {
        let mut catalog = Self::default();
        for rule in rules.iter() {
            for tag in rule.compliance() {
                catalog
                    .standards
                    .entry(key_of(tag))
                    .or_insert_with(|| ComplianceStandard::new(key_of(tag), Vec::<String>::new()))
                    .required_categories
                    .insert(rule.name().to_string());
            }
        }
        debug!("Compliance catalog built with standards {:?}.", catalog.names());
        catalog
    }

    /// Adds or replaces a standard. Names are case-insensitive.
    pub fn register(&mut self, standard: ComplianceStandard) {
        debug!("Registering compliance standard '{}'.", standard.name);
        self.standards.insert(key_of(&standard.name), standard);
    }

    pub fn get(&self, name: &str) -> Option<&ComplianceStandard> {
        self.standards.get(&key_of(name))
    }

    pub fn names(&self) -> Vec<String> {
        self.standards.keys().cloned().collect()
    }

    /// Registered categories of `name` plus every rule in `rules` tagged with it.
    ///
    /// # Errors
    ///
    /// [`MaskingError::UnknownComplianceStandard`] when `name` is neither
    /// registered nor used as a tag by any rule.
    pub fn required_categories(
        &self,
        name: &str,
        rules: &RuleSet,
    ) -> Result<BTreeSet<String>, MaskingError> {
        let mut categories: BTreeSet<String> = rules
            .iter()
            .filter(|r| r.belongs_to(name.trim()))
            .map(|r| r.name().to_string())
            .collect();

        match self.get(name) {
            Some(standard) => categories.extend(standard.required_categories.iter().cloned()),
            None if categories.is_empty() => {
                return Err(MaskingError::UnknownComplianceStandard(name.to_string()))
            }
            None => {}
        }
        Ok(categories)
    }

    /// Checks one standard against `text`.
    ///
    /// A required category that has no rule in `rules` cannot be verified and
    /// makes the check fail.
    pub fn check(&self, name: &str, rules: &RuleSet, text: &str) -> Result<bool, MaskingError> {
        let categories = self.required_categories(name, rules)?;
        for category in &categories {
            match rules.get(category) {
                Some(rule) if redactor::detects(rule, text) => {
                    debug!("Standard '{}' violated by category '{}'.", name, category);
                    return Ok(false);
                }
                Some(_) => {}
                None => {
                    warn!(
                        "Standard '{}' requires category '{}' but no such rule is registered.",
                        name, category
                    );
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Checks every requested standard. Never fails: unknown standards and
    /// oversized text map to `false`.
    pub fn validate<S: AsRef<str>>(
        &self,
        rules: &RuleSet,
        text: &str,
        standards: &[S],
        limits: &MaskingLimits,
    ) -> BTreeMap<String, bool> {
        let too_large = text.len() > limits.max_input_bytes;
        if too_large {
            warn!(
                "Compliance check skipped: input of {} bytes exceeds the limit of {} bytes.",
                text.len(),
                limits.max_input_bytes
            );
        }

        standards
            .iter()
            .map(|s| {
                let name = s.as_ref();
                let verdict = if too_large {
                    false
                } else {
                    self.check(name, rules, text).unwrap_or_else(|e| {
                        debug!("{}", e);
                        false
                    })
                };
                (name.to_string(), verdict)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleRegistry;
    use crate::rule::Rule;

    fn builtins() -> std::sync::Arc<RuleSet> {
        RuleRegistry::with_builtin_rules().unwrap().snapshot()
    }

    #[test]
    fn catalog_from_builtin_tags() {
        let rules = builtins();
        let catalog = ComplianceCatalog::from_rules(&rules);
        assert_eq!(catalog.names(), vec!["GDPR", "LGPD", "PCI-DSS"]);
        let lgpd = catalog.get("lgpd").unwrap();
        assert!(lgpd.required_categories.contains("cpf"));
        assert!(lgpd.required_categories.contains("email"));
        assert!(!lgpd.required_categories.contains("credit_card"));
    }

    #[test]
    fn raw_and_masked_text() {
        let rules = builtins();
        let catalog = ComplianceCatalog::from_rules(&rules);
        let limits = MaskingLimits::default();

        let raw = catalog.validate(&rules, "CPF: 12345678909", &["LGPD", "PCI-DSS"], &limits);
        assert_eq!(raw["LGPD"], false);
        assert_eq!(raw["PCI-DSS"], true);

        let masked = catalog.validate(&rules, "CPF: 123.XXX.XXX-09", &["LGPD"], &limits);
        assert_eq!(masked["LGPD"], true);
    }

    #[test]
    fn unknown_standard_is_false() {
        let rules = builtins();
        let catalog = ComplianceCatalog::from_rules(&rules);
        let out = catalog.validate(&rules, "clean", &["UNKNOWN_STANDARD"], &MaskingLimits::default());
        assert_eq!(out.get("UNKNOWN_STANDARD"), Some(&false));
        assert!(matches!(
            catalog.check("UNKNOWN_STANDARD", &rules, "clean"),
            Err(MaskingError::UnknownComplianceStandard(_))
        ));
    }

    #[test]
    fn missing_category_cannot_be_verified() {
        let rules = builtins();
        let mut catalog = ComplianceCatalog::from_rules(&rules);
        catalog.register(ComplianceStandard::new("HIPAA", ["medical_record"]));
        assert_eq!(catalog.check("hipaa", &rules, "clean").unwrap(), false);
    }

    #[test]
    fn tagged_custom_rules_join_the_standard() {
        let registry = RuleRegistry::with_builtin_rules().unwrap();
        let catalog = ComplianceCatalog::from_rules(&registry.snapshot());
        registry
            .add_rule(
                Rule::new("matricula", r"MAT-\d{6}", "MAT-******")
                    .unwrap()
                    .with_compliance(["lgpd"]),
            )
            .unwrap();
        let rules = registry.snapshot();
        assert!(catalog.required_categories("LGPD", &rules).unwrap().contains("matricula"));
        assert_eq!(catalog.check("LGPD", &rules, "id MAT-123456").unwrap(), false);
    }

    #[test]
    fn oversized_text_fails() {
        let rules = builtins();
        let catalog = ComplianceCatalog::from_rules(&rules);
        let limits = MaskingLimits {
            max_input_bytes: 4,
            ..MaskingLimits::default()
        };
        let out = catalog.validate(&rules, "clean text", &["GDPR"], &limits);
        assert_eq!(out["GDPR"], false);
    }
}
