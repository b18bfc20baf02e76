// solmask-core/src/engine.rs
//! The `MaskingEngine` facade and the `Masker` trait.
//!
//! `MaskingEngine` owns the rule registry, the compliance catalog, the policy
//! and the limits. It is the only type collaborators need: every public
//! operation is synchronous, infallible at call time (limits are recovered to
//! the fallback text) and safe to call from many threads at once.
//!
//! License: MIT OR APACHE 2.0

use arc_swap::ArcSwap;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::compliance::{ComplianceCatalog, ComplianceStandard};
use crate::config::{MaskingLimits, MaskingPolicy, DEFAULT_REPLACEMENT};
use crate::correlation;
use crate::detection::{self, Detection};
use crate::errors::MaskingError;
use crate::pipeline;
use crate::registry::{RuleRegistry, RuleSet};
use crate::rule::Rule;
use crate::walker::StructuralWalker;

/// The seam collaborators (log sinks, trace exporters, body loggers) depend on.
///
/// Implementations must never fail and never return unmasked content.
pub trait Masker: Send + Sync {
    /// Masks every sensitive span in `text`.
    fn mask_text(&self, text: &str) -> String;

    /// Masks a nested value, preserving its shape.
    fn mask_value(&self, value: &Value) -> Value;
}

/// Diagnostic counters. Updated with relaxed atomics.
#[derive(Debug, Default)]
pub struct EngineStats {
    strings_masked: AtomicU64,
    values_masked: AtomicU64,
    fallbacks: AtomicU64,
    compliance_checks: AtomicU64,
}

/// A point-in-time copy of [`EngineStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    pub strings_masked: u64,
    pub values_masked: u64,
    pub fallbacks: u64,
    pub compliance_checks: u64,
}

impl EngineStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            strings_masked: self.strings_masked.load(Ordering::Relaxed),
            values_masked: self.values_masked.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            compliance_checks: self.compliance_checks.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Sensitive-data masking and compliance engine.
pub struct MaskingEngine {
    registry: RuleRegistry,
    catalog: ArcSwap<ComplianceCatalog>,
    catalog_lock: Mutex<()>,
    policy: MaskingPolicy,
    limits: MaskingLimits,
    stats: EngineStats,
}

impl MaskingEngine {
    /// Builds an engine from the built-in rules, then applies the policy:
    /// custom patterns are merged (overriding built-ins of the same name)
    /// and the named rules are disabled or enabled.
    ///
    /// # Errors
    ///
    /// [`MaskingError::InvalidPattern`] if a custom pattern does not compile,
    /// or [`MaskingError::BuiltinRules`] if the embedded rules are corrupt.
    pub fn new(policy: MaskingPolicy, limits: MaskingLimits) -> Result<Self, MaskingError> {
        let policy = policy.normalized();
        let registry = RuleRegistry::with_builtin_rules()?;
        let catalog = ComplianceCatalog::from_rules(&registry.snapshot());

        for (name, pattern) in &policy.custom_patterns {
            let rule = Rule::new(name.as_str(), pattern, DEFAULT_REPLACEMENT)?
                .with_description("Custom pattern from masking policy");
            if registry.replace_rule(rule).is_some() {
                info!("Custom pattern '{}' overrides the built-in rule.", name);
            }
        }
        for name in &policy.disabled_rules {
            if !registry.disable_rule(name) {
                warn!("Cannot disable unknown masking rule '{}'.", name);
            }
        }
        for name in &policy.enabled_rules {
            if !registry.enable_rule(name) {
                warn!("Cannot enable unknown masking rule '{}'.", name);
            }
        }

        info!(
            "Masking engine ready: {} rules ({} enabled), standards {:?}.",
            registry.len(),
            registry.load().enabled().count(),
            catalog.names()
        );

        Ok(Self {
            registry,
            catalog: ArcSwap::from_pointee(catalog),
            catalog_lock: Mutex::new(()),
            policy,
            limits,
            stats: EngineStats::default(),
        })
    }

    /// Engine with the default policy and limits.
    pub fn with_defaults() -> Result<Self, MaskingError> {
        Self::new(MaskingPolicy::default(), MaskingLimits::default())
    }

    /// Engine configured from `SOLMASK_*` environment variables.
    pub fn from_env() -> Result<Self, MaskingError> {
        Self::new(MaskingPolicy::from_env()?, MaskingLimits::from_env()?)
    }

    /// Masks `text` with every enabled rule.
    ///
    /// Input over the size limit, or masking that runs out of budget, yields
    /// the configured fallback text instead.
    pub fn mask_text(&self, text: &str) -> String {
        let rules = self.registry.load();
        self.mask_with(&rules, text)
    }

    /// Like [`MaskingEngine::mask_text`] but reports limit violations instead
    /// of recovering them.
    pub fn try_mask_text(&self, text: &str) -> Result<String, MaskingError> {
        EngineStats::bump(&self.stats.strings_masked);
        pipeline::mask_text(&self.registry.load(), text, &self.limits)
    }

    /// Masks a nested value. The whole walk uses a single rule snapshot.
    pub fn mask_value(&self, value: &Value) -> Value {
        EngineStats::bump(&self.stats.values_masked);
        let rules = self.registry.snapshot();
        let mask_leaf = |s: &str| self.mask_with(&rules, s);
        StructuralWalker::new(&self.policy, &mask_leaf).mask_value(value)
    }

    fn mask_with(&self, rules: &RuleSet, text: &str) -> String {
        EngineStats::bump(&self.stats.strings_masked);
        match pipeline::mask_text(rules, text, &self.limits) {
            Ok(masked) => masked,
            Err(e) => {
                EngineStats::bump(&self.stats.fallbacks);
                if e.is_recoverable() {
                    warn!("Masking fell back to placeholder text: {}", e);
                } else {
                    error!("Unexpected masking failure, placeholder text returned: {}", e);
                }
                self.limits.fallback_text.clone()
            }
        }
    }

    /// Registers a new rule at the end of the application order.
    pub fn add_rule(&self, rule: Rule) -> Result<(), MaskingError> {
        self.registry.add_rule(rule)
    }

    /// Adds a rule, replacing any rule of the same name.
    pub fn replace_rule(&self, rule: Rule) -> Option<Arc<Rule>> {
        self.registry.replace_rule(rule)
    }

    pub fn remove_rule(&self, name: &str) -> Option<Arc<Rule>> {
        self.registry.remove_rule(name)
    }

    pub fn enable_rule(&self, name: &str) -> bool {
        self.registry.enable_rule(name)
    }

    pub fn disable_rule(&self, name: &str) -> bool {
        self.registry.disable_rule(name)
    }

    /// Adds or replaces a compliance standard.
    pub fn register_standard(&self, standard: ComplianceStandard) {
        let _guard = self
            .catalog_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut catalog = ComplianceCatalog::clone(&self.catalog.load());
        catalog.register(standard);
        self.catalog.store(Arc::new(catalog));
    }

    /// Checks `text` against each named standard.
    ///
    /// Unknown standards map to `false`; this never fails.
    pub fn validate_compliance<S: AsRef<str>>(
        &self,
        text: &str,
        standards: &[S],
    ) -> BTreeMap<String, bool> {
        EngineStats::bump(&self.stats.compliance_checks);
        let rules = self.registry.load();
        self.catalog
            .load()
            .validate(&rules, text, standards, &self.limits)
    }

    /// The rule categories a standard requires.
    pub fn rules_for_standard(&self, name: &str) -> Result<BTreeSet<String>, MaskingError> {
        self.catalog
            .load()
            .required_categories(name, &self.registry.load())
    }

    /// Names of the registered compliance standards.
    pub fn standards(&self) -> Vec<String> {
        self.catalog.load().names()
    }

    /// Per-rule occurrence counts in the raw `text`.
    ///
    /// Input over the size limit is not scanned and reports nothing.
    pub fn detect(&self, text: &str) -> Vec<Detection> {
        if text.len() > self.limits.max_input_bytes {
            warn!(
                "Detection skipped: input of {} bytes exceeds the limit of {} bytes.",
                text.len(),
                self.limits.max_input_bytes
            );
            return Vec::new();
        }
        detection::detect(&self.registry.load(), text)
    }

    /// See [`correlation::hash_id`].
    pub fn hash_id(&self, data: &str, salt: &str) -> String {
        correlation::hash_id(data, salt)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn policy(&self) -> &MaskingPolicy {
        &self.policy
    }

    pub fn limits(&self) -> &MaskingLimits {
        &self.limits
    }

    /// Whether collaborators should route data through this engine at all.
    pub fn is_enabled(&self) -> bool {
        self.policy.enabled
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }
}

impl Masker for MaskingEngine {
    fn mask_text(&self, text: &str) -> String {
        MaskingEngine::mask_text(self, text)
    }

    fn mask_value(&self, value: &Value) -> Value {
        MaskingEngine::mask_value(self, value)
    }
}

impl fmt::Debug for MaskingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskingEngine")
            .field("registry", &self.registry)
            .field("standards", &self.standards())
            .field("limits", &self.limits)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
