//! Configuration management for `solmask-core`.
//!
//! This module defines the serializable rule definitions (`RuleSpec`), the
//! per-call-site `MaskingPolicy`, and the `MaskingLimits` safety budget. Built-in
//! rules ship as an embedded YAML document; policy and limits can be read from
//! `SOLMASK_*` environment variables.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::errors::MaskingError;
use crate::validators::MatchValidator;

/// Maximum allowed length for a rule's pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Marker written in place of fully redacted values.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Replacement used for rules declared without one (e.g. policy custom patterns).
pub const DEFAULT_REPLACEMENT: &str = "***MASKED***";

/// Text returned for content that could not be masked within the limits.
pub const DEFAULT_FALLBACK_TEXT: &str = "[unmaskable-content-redacted]";

pub const DEFAULT_MAX_INPUT_BYTES: usize = 1 << 20;
pub const DEFAULT_OPERATION_BUDGET: u64 = 64 << 20;

/// Environment variable names read by [`MaskingPolicy::from_env`] and
/// [`MaskingLimits::from_env`].
pub mod env_keys {
    pub const ENABLED: &str = "SOLMASK_ENABLED";
    pub const SENSITIVE_FIELDS: &str = "SOLMASK_SENSITIVE_FIELDS";
    pub const PII_FIELDS: &str = "SOLMASK_PII_FIELDS";
    pub const CUSTOM_PATTERNS: &str = "SOLMASK_CUSTOM_PATTERNS";
    pub const DISABLED_RULES: &str = "SOLMASK_DISABLED_RULES";
    pub const ENABLED_RULES: &str = "SOLMASK_ENABLED_RULES";
    pub const MAX_INPUT_BYTES: &str = "SOLMASK_MAX_INPUT_BYTES";
    pub const OPERATION_BUDGET: &str = "SOLMASK_OPERATION_BUDGET";
    pub const FALLBACK_TEXT: &str = "SOLMASK_FALLBACK_TEXT";
}

fn default_replacement() -> String {
    DEFAULT_REPLACEMENT.to_string()
}

fn default_true() -> bool {
    true
}

/// Serializable definition of a single masking rule.
///
/// A `RuleSpec` is plain data; [`crate::rule::Rule::from_spec`] compiles it and
/// validates the pattern and replacement template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleSpec {
    /// Unique identifier (e.g. "cpf").
    pub name: String,
    /// The regex pattern string.
    pub pattern: String,
    /// Replacement template, may reference capture groups (`\1`, `$1`, `${name}`).
    #[serde(default = "default_replacement")]
    pub replacement: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Compliance standards this category belongs to (e.g. "LGPD").
    #[serde(default)]
    pub compliance: Vec<String>,
    /// Optional check-digit validation applied to each match.
    #[serde(default)]
    pub validator: Option<MatchValidator>,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            replacement: default_replacement(),
            description: String::new(),
            enabled: true,
            compliance: Vec::new(),
            validator: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    rules: Vec<RuleSpec>,
}

static BUILTIN_SPECS: Lazy<Result<Vec<RuleSpec>, MaskingError>> = Lazy::new(|| {
    let yaml = include_str!("../config/builtin_rules.yaml");
    let file: RuleFile =
        serde_yml::from_str(yaml).map_err(|e| MaskingError::BuiltinRules(e.to_string()))?;
    debug!("Loaded {} built-in rule definitions.", file.rules.len());
    Ok(file.rules)
});

/// The embedded built-in rule set, in application order.
///
/// The YAML document is parsed once per process.
pub fn builtin_rule_specs() -> Result<Vec<RuleSpec>, MaskingError> {
    (*BUILTIN_SPECS).clone()
}

/// The partial-redaction function applied to a PII field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiFieldKind {
    Email,
    Phone,
    NationalId,
    OrganizationId,
    CardNumber,
    Secret,
}

impl FromStr for PiiFieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(PiiFieldKind::Email),
            "phone" | "telefone" => Ok(PiiFieldKind::Phone),
            "national_id" | "cpf" => Ok(PiiFieldKind::NationalId),
            "organization_id" | "cnpj" => Ok(PiiFieldKind::OrganizationId),
            "card_number" | "card" => Ok(PiiFieldKind::CardNumber),
            "secret" => Ok(PiiFieldKind::Secret),
            other => Err(format!("unknown PII field kind '{}'", other)),
        }
    }
}

impl fmt::Display for PiiFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PiiFieldKind::Email => "email",
            PiiFieldKind::Phone => "phone",
            PiiFieldKind::NationalId => "national_id",
            PiiFieldKind::OrganizationId => "organization_id",
            PiiFieldKind::CardNumber => "card_number",
            PiiFieldKind::Secret => "secret",
        };
        f.write_str(name)
    }
}

/// Per-call-site masking policy.
///
/// Field names are matched case-insensitively; [`MaskingPolicy::normalized`]
/// lowercases every configured name and is applied by the engine on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingPolicy {
    /// Whether collaborators should invoke the engine at all.
    pub enabled: bool,
    /// Fields whose value is always replaced by [`REDACTION_MARKER`].
    pub sensitive_fields: BTreeSet<String>,
    /// Fields whose string value receives a dedicated partial redaction.
    pub pii_fields: BTreeMap<String, PiiFieldKind>,
    /// Extra categories merged into the registry: name -> pattern.
    pub custom_patterns: BTreeMap<String, String>,
    /// Rules switched off when the engine is built.
    pub disabled_rules: Vec<String>,
    /// Rules switched on when the engine is built (e.g. the opt-in `ipv4`).
    pub enabled_rules: Vec<String>,
}

impl Default for MaskingPolicy {
    fn default() -> Self {
        let sensitive_fields = [
            "password",
            "passwd",
            "senha",
            "secret",
            "token",
            "access_token",
            "refresh_token",
            "api_key",
            "apikey",
            "authorization",
            "client_secret",
            "private_key",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let pii_fields = [
            ("cpf", PiiFieldKind::NationalId),
            ("cnpj", PiiFieldKind::OrganizationId),
            ("email", PiiFieldKind::Email),
            ("e-mail", PiiFieldKind::Email),
            ("telefone", PiiFieldKind::Phone),
            ("celular", PiiFieldKind::Phone),
            ("phone", PiiFieldKind::Phone),
            ("phone_number", PiiFieldKind::Phone),
            ("card_number", PiiFieldKind::CardNumber),
            ("credit_card", PiiFieldKind::CardNumber),
            ("cartao", PiiFieldKind::CardNumber),
            ("key", PiiFieldKind::Secret),
            ("secret_key", PiiFieldKind::Secret),
        ]
        .into_iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect();

        Self {
            enabled: true,
            sensitive_fields,
            pii_fields,
            custom_patterns: BTreeMap::new(),
            disabled_rules: Vec::new(),
            enabled_rules: Vec::new(),
        }
    }
}

impl MaskingPolicy {
    /// Builds the default policy extended with `SOLMASK_*` environment variables.
    pub fn from_env() -> Result<Self, MaskingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MaskingPolicy::from_env`] but reads values through `lookup`.
    ///
    /// Field lists extend the defaults rather than replacing them.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MaskingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut policy = Self::default();

        if let Some(raw) = lookup(env_keys::ENABLED) {
            policy.enabled = parse_bool(env_keys::ENABLED, &raw)?;
        }
        if let Some(raw) = lookup(env_keys::SENSITIVE_FIELDS) {
            policy.sensitive_fields.extend(split_list(&raw));
        }
        if let Some(raw) = lookup(env_keys::PII_FIELDS) {
            for entry in split_list(&raw) {
                let (field, kind) = entry.split_once('=').ok_or_else(|| MaskingError::Config {
                    key: env_keys::PII_FIELDS.to_string(),
                    reason: format!("expected 'field=kind', got '{}'", entry),
                })?;
                let kind = kind.parse::<PiiFieldKind>().map_err(|reason| MaskingError::Config {
                    key: env_keys::PII_FIELDS.to_string(),
                    reason,
                })?;
                policy.pii_fields.insert(field.trim().to_string(), kind);
            }
        }
        if let Some(raw) = lookup(env_keys::CUSTOM_PATTERNS) {
            let patterns: BTreeMap<String, String> =
                serde_json::from_str(&raw).map_err(|e| MaskingError::Config {
                    key: env_keys::CUSTOM_PATTERNS.to_string(),
                    reason: e.to_string(),
                })?;
            policy.custom_patterns.extend(patterns);
        }
        if let Some(raw) = lookup(env_keys::DISABLED_RULES) {
            policy.disabled_rules.extend(split_list(&raw));
        }
        if let Some(raw) = lookup(env_keys::ENABLED_RULES) {
            policy.enabled_rules.extend(split_list(&raw));
        }

        Ok(policy.normalized())
    }

    /// Returns the policy with every field name lowercased.
    pub fn normalized(mut self) -> Self {
        self.sensitive_fields = self
            .sensitive_fields
            .into_iter()
            .map(|f| f.to_lowercase())
            .collect();
        self.pii_fields = self
            .pii_fields
            .into_iter()
            .map(|(f, kind)| (f.to_lowercase(), kind))
            .collect();
        self
    }

    /// True when `key` names a fully redacted field.
    pub fn is_sensitive(&self, key: &str) -> bool {
        self.sensitive_fields.contains(&*lowercase(key))
    }

    /// The partial-redaction kind configured for `key`, if any.
    pub fn pii_kind(&self, key: &str) -> Option<PiiFieldKind> {
        self.pii_fields.get(&*lowercase(key)).copied()
    }
}

fn lowercase(key: &str) -> Cow<'_, str> {
    if key.chars().any(char::is_uppercase) {
        Cow::Owned(key.to_lowercase())
    } else {
        Cow::Borrowed(key)
    }
}

/// Deterministic safety limits applied to every masking call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingLimits {
    /// Inputs longer than this (in bytes) are not scanned.
    pub max_input_bytes: usize,
    /// Cost cap per call, see [`crate::redactor::OperationBudget`].
    pub operation_budget: u64,
    /// Text substituted for content that exceeded the limits.
    pub fallback_text: String,
}

impl Default for MaskingLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            operation_budget: DEFAULT_OPERATION_BUDGET,
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}

impl MaskingLimits {
    pub fn from_env() -> Result<Self, MaskingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, MaskingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut limits = Self::default();
        if let Some(raw) = lookup(env_keys::MAX_INPUT_BYTES) {
            limits.max_input_bytes = parse_positive(env_keys::MAX_INPUT_BYTES, &raw)?;
        }
        if let Some(raw) = lookup(env_keys::OPERATION_BUDGET) {
            limits.operation_budget = parse_positive(env_keys::OPERATION_BUDGET, &raw)?;
        }
        if let Some(raw) = lookup(env_keys::FALLBACK_TEXT) {
            limits.fallback_text = raw;
        }
        Ok(limits)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, MaskingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(MaskingError::Config {
            key: key.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

fn parse_positive<T>(key: &str, raw: &str) -> Result<T, MaskingError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: fmt::Display,
{
    let value = raw.trim().parse::<T>().map_err(|e| MaskingError::Config {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    if value <= T::default() {
        return Err(MaskingError::Config {
            key: key.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn builtin_specs_parse_in_order() {
        let specs = builtin_rule_specs().unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"jwt_token"));
        let cpf = names.iter().position(|n| *n == "cpf").unwrap();
        let phone = names.iter().position(|n| *n == "phone_br").unwrap();
        assert!(cpf < phone, "cpf must run before phone_br");
        let card = names.iter().position(|n| *n == "credit_card").unwrap();
        let email = names.iter().position(|n| *n == "email").unwrap();
        assert!(phone < card, "phone_br must run before credit_card");
        assert_eq!(email, names.len() - 2);
        let ipv4 = specs.iter().find(|s| s.name == "ipv4").unwrap();
        assert!(!ipv4.enabled);
    }

    #[test]
    fn default_policy_matches_case_insensitively() {
        let policy = MaskingPolicy::default();
        assert!(policy.enabled);
        assert!(policy.is_sensitive("Password"));
        assert_eq!(policy.pii_kind("CPF"), Some(PiiFieldKind::NationalId));
        assert_eq!(policy.pii_kind("nome"), None);
    }

    #[test]
    fn policy_from_lookup_extends_defaults() {
        let policy = MaskingPolicy::from_lookup(lookup_from(&[
            (env_keys::ENABLED, "off"),
            (env_keys::SENSITIVE_FIELDS, "X-Session, pin"),
            (env_keys::PII_FIELDS, "contato=email,doc=cpf"),
            (env_keys::CUSTOM_PATTERNS, r#"{"ticket": "TCK-\\d{6}"}"#),
            (env_keys::ENABLED_RULES, "ipv4"),
        ]))
        .unwrap();

        assert!(!policy.enabled);
        assert!(policy.is_sensitive("x-session"));
        assert!(policy.is_sensitive("password"));
        assert_eq!(policy.pii_kind("contato"), Some(PiiFieldKind::Email));
        assert_eq!(policy.pii_kind("doc"), Some(PiiFieldKind::NationalId));
        assert_eq!(policy.custom_patterns["ticket"], r"TCK-\d{6}");
        assert_eq!(policy.enabled_rules, vec!["ipv4".to_string()]);
    }

    #[test]
    fn policy_from_lookup_rejects_bad_values() {
        let err = MaskingPolicy::from_lookup(lookup_from(&[(env_keys::ENABLED, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, MaskingError::Config { .. }));

        let err = MaskingPolicy::from_lookup(lookup_from(&[(env_keys::PII_FIELDS, "doc=passport")]))
            .unwrap_err();
        assert!(err.to_string().contains("passport"));

        let err = MaskingPolicy::from_lookup(lookup_from(&[(env_keys::CUSTOM_PATTERNS, "[1,2]")]))
            .unwrap_err();
        assert!(err.to_string().contains(env_keys::CUSTOM_PATTERNS));
    }

    #[test]
    fn limits_from_lookup() {
        let limits = MaskingLimits::from_lookup(lookup_from(&[
            (env_keys::MAX_INPUT_BYTES, "2048"),
            (env_keys::FALLBACK_TEXT, "[dropped]"),
        ]))
        .unwrap();
        assert_eq!(limits.max_input_bytes, 2048);
        assert_eq!(limits.operation_budget, DEFAULT_OPERATION_BUDGET);
        assert_eq!(limits.fallback_text, "[dropped]");

        assert!(MaskingLimits::from_lookup(lookup_from(&[(env_keys::OPERATION_BUDGET, "0")])).is_err());
        assert!(MaskingLimits::from_lookup(lookup_from(&[(env_keys::MAX_INPUT_BYTES, "-1")])).is_err());
    }

    #[test]
    fn pii_kind_parsing() {
        assert_eq!("CNPJ".parse::<PiiFieldKind>(), Ok(PiiFieldKind::OrganizationId));
        assert_eq!(PiiFieldKind::CardNumber.to_string(), "card_number");
        assert!("ssn".parse::<PiiFieldKind>().is_err());
    }
}
