//! rule.rs - Compilation of masking rules.
//!
//! A [`Rule`] is the compiled, immutable form of a [`RuleSpec`]: the regex is
//! built with a size limit, the replacement template is validated against the
//! pattern's capture groups, and patterns able to match the empty string are
//! refused. Every error surfaces here, at registration time, never while
//! masking.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

use crate::config::{RuleSpec, MAX_PATTERN_LENGTH};
use crate::errors::MaskingError;
use crate::redactor;
use crate::template::ReplacementTemplate;
use crate::validators::MatchValidator;

/// Compiled regex size cap.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Probes used to reject patterns that can produce empty matches.
const EMPTY_MATCH_PROBES: [&str; 6] = ["", "a", "0", " ", "a b", "a-0"];

/// One detectable category: a compiled pattern, its replacement and metadata.
///
/// Rules are immutable. Builder-style methods consume the rule and return a
/// new value; registries replace rules wholesale.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    pattern: Regex,
    replacement: ReplacementTemplate,
    description: String,
    enabled: bool,
    compliance: Vec<String>,
    validator: Option<MatchValidator>,
}

impl Rule {
    /// Compiles a rule from its name, pattern and replacement template.
    ///
    /// # Errors
    ///
    /// [`MaskingError::InvalidPattern`] if the name is empty, the pattern is
    /// too long, fails to compile or can match the empty string, or the
    /// replacement references a group the pattern does not define.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        replacement: &str,
    ) -> Result<Self, MaskingError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MaskingError::invalid_pattern(name, "rule name is empty"));
        }
        if pattern.is_empty() {
            return Err(MaskingError::invalid_pattern(name, "pattern is empty"));
        }
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(MaskingError::invalid_pattern(
                name,
                format!(
                    "pattern length ({}) exceeds maximum allowed ({})",
                    pattern.len(),
                    MAX_PATTERN_LENGTH
                ),
            ));
        }

        let regex = RegexBuilder::new(pattern)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| MaskingError::invalid_pattern(name.as_str(), e))?;

        if EMPTY_MATCH_PROBES
            .iter()
            .any(|probe| regex.find_iter(probe).any(|m| m.start() == m.end()))
        {
            return Err(MaskingError::invalid_pattern(
                name,
                "pattern can match the empty string",
            ));
        }

        let replacement = ReplacementTemplate::compile(replacement, &regex)
            .map_err(|reason| MaskingError::invalid_pattern(name.as_str(), reason))?;

        debug!("Rule '{}' compiled successfully.", name);
        Ok(Self {
            name,
            pattern: regex,
            replacement,
            description: String::new(),
            enabled: true,
            compliance: Vec::new(),
            validator: None,
        })
    }

    /// Compiles a serializable rule definition.
    pub fn from_spec(spec: &RuleSpec) -> Result<Self, MaskingError> {
        let rule = Self::new(spec.name.as_str(), &spec.pattern, &spec.replacement)?
            .with_description(spec.description.as_str())
            .with_compliance(spec.compliance.iter().cloned())
            .with_enabled(spec.enabled);
        Ok(match spec.validator {
            Some(validator) => rule.with_validator(validator),
            None => rule,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_compliance<I, S>(mut self, standards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compliance = standards.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_validator(mut self, validator: MatchValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn replacement(&self) -> &ReplacementTemplate {
        &self.replacement
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn compliance(&self) -> &[String] {
        &self.compliance
    }

    pub fn validator(&self) -> Option<MatchValidator> {
        self.validator
    }

    /// True when this rule's category is tagged with `standard` (case-insensitive).
    pub fn belongs_to(&self, standard: &str) -> bool {
        self.compliance
            .iter()
            .any(|s| s.eq_ignore_ascii_case(standard))
    }

    /// Redacts every accepted match of this rule in `text`.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        redactor::apply(self, text)
    }

    /// Back to plain data, e.g. for listing or serialization.
    pub fn to_spec(&self) -> RuleSpec {
        RuleSpec {
            name: self.name.clone(),
            pattern: self.pattern.as_str().to_string(),
            replacement: self.replacement.as_str().to_string(),
            description: self.description.clone(),
            enabled: self.enabled,
            compliance: self.compliance.clone(),
            validator: self.validator,
        }
    }
}

/// Compiles a list of rule definitions, preserving their order.
///
/// Every failure is logged; the first one is returned.
pub fn compile_rules(specs: &[RuleSpec]) -> Result<Vec<Rule>, MaskingError> {
    debug!("Starting compilation of {} rules.", specs.len());
    let mut compiled = Vec::with_capacity(specs.len());
    let mut first_error = None;

    for spec in specs {
        match Rule::from_spec(spec) {
            Ok(rule) => compiled.push(rule),
            Err(e) => {
                log::warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => {
            debug!("Finished compiling rules. Total compiled: {}.", compiled.len());
            Ok(compiled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_applies() {
        let rule = Rule::new("contract_id", r"\b(\d{3})\d{4}(\d{3})\b", r"\1****\2").unwrap();
        assert_eq!(rule.apply("contract_id=1234567890"), "contract_id=123****890");
        assert!(rule.is_enabled());
        assert!(rule.replacement().as_str().contains("****"));
    }

    #[test]
    fn rejects_bad_definitions() {
        let err = Rule::new("broken", r"(\d+", "x").unwrap_err();
        assert!(matches!(err, MaskingError::InvalidPattern { ref rule, .. } if rule == "broken"));

        let err = Rule::new("groups", r"(\d)", r"\1-\2").unwrap_err();
        assert!(err.to_string().contains("capture group 2"));

        assert!(Rule::new("", r"\d", "x").is_err());
        assert!(Rule::new("empty", "", "x").is_err());
        assert!(Rule::new("long", &"a".repeat(MAX_PATTERN_LENGTH + 1), "x").is_err());
    }

    #[test]
    fn rejects_empty_matching_patterns() {
        assert!(Rule::new("star", r"\d*", "x").is_err());
        assert!(Rule::new("boundary", r"\b", "x").is_err());
        assert!(Rule::new("optional", r"(?:abc)?", "x").is_err());
    }

    #[test]
    fn spec_round_trip_keeps_metadata() {
        let mut spec = RuleSpec::new("doc", r"\b(\d{3})\d{6}(\d{2})\b");
        spec.replacement = r"\1.XXX.XXX-\2".to_string();
        spec.compliance = vec!["LGPD".to_string()];
        spec.validator = Some(MatchValidator::Cpf);
        spec.enabled = false;

        let rule = Rule::from_spec(&spec).unwrap();
        assert!(!rule.is_enabled());
        assert!(rule.belongs_to("lgpd"));
        assert_eq!(rule.validator(), Some(MatchValidator::Cpf));
        assert_eq!(rule.to_spec(), spec);
    }

    #[test]
    fn compile_rules_reports_failure() {
        let specs = vec![RuleSpec::new("ok", r"\d{4}"), RuleSpec::new("bad", r"[")];
        let err = compile_rules(&specs).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }
}
