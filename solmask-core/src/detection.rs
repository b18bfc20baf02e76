//! detection.rs - Read-only scan reporting which categories occur in a text.
//!
//! Detections carry counts only, never the matched content.
//!
//! License: MIT OR APACHE 2.0

use serde::Serialize;

use crate::redactor;
use crate::registry::RuleSet;

/// One category found in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub rule: String,
    pub occurrences: usize,
    pub compliance: Vec<String>,
}

/// Counts accepted matches of every enabled rule against the raw `text`.
///
/// Rules are evaluated independently, in registry order; rules without
/// matches are omitted.
pub fn detect(rules: &RuleSet, text: &str) -> Vec<Detection> {
    rules
        .enabled()
        .filter_map(|rule| {
            let occurrences = redactor::count_matches(rule, text);
            (occurrences > 0).then(|| Detection {
                rule: rule.name().to_string(),
                occurrences,
                compliance: rule.compliance().to_vec(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleRegistry;

    #[test]
    fn reports_counts_per_rule() {
        let rules = RuleRegistry::with_builtin_rules().unwrap().snapshot();
        let found = detect(&rules, "a@b.com and c@d.org, cpf 12345678909");
        let email = found.iter().find(|d| d.rule == "email").unwrap();
        assert_eq!(email.occurrences, 2);
        let cpf = found.iter().find(|d| d.rule == "cpf").unwrap();
        assert_eq!(cpf.occurrences, 1);
        assert_eq!(cpf.compliance, vec!["LGPD".to_string()]);
    }

    #[test]
    fn clean_text_has_no_detections() {
        let rules = RuleRegistry::with_builtin_rules().unwrap().snapshot();
        assert!(detect(&rules, "just words").is_empty());
    }
}
