// solmask-core/src/lib.rs
//! # Solmask Core Library
//!
//! `solmask-core` detects and redacts personally identifiable and regulated
//! information (national IDs, organization IDs, emails, phone numbers, card
//! numbers, bank accounts, credentials, tokens) in free text and in nested
//! JSON-like payloads, and judges whether a text satisfies named regulatory
//! standards such as LGPD, GDPR or PCI-DSS.
//!
//! Everything is synchronous and pure: collaborators hand the engine a raw
//! value and get a masked value back, inline, on their own thread.
//!
//! ## Modules
//!
//! * `config`: `RuleSpec`, `MaskingPolicy`, `MaskingLimits` and the embedded built-in rules.
//! * `rule`: the compiled, immutable `Rule`.
//! * `template`: replacement templates validated against capture groups.
//! * `validators`: check-digit validation (CPF, CNPJ, Luhn) for matches.
//! * `registry`: the copy-on-write `RuleRegistry`.
//! * `redactor`: one rule against one string, with a deterministic cost budget.
//! * `pipeline`: all enabled rules, in order, against one string.
//! * `partial`: field-specific partial redaction (email, phone, documents, cards).
//! * `walker`: shape-preserving masking of `serde_json::Value` trees.
//! * `compliance`: compliance standards and the validator.
//! * `detection`: read-only per-rule occurrence counts.
//! * `correlation`: salted hash identifiers.
//! * `engine`: the `MaskingEngine` facade and the `Masker` trait.
//!
//! ## Usage Example
//!
//! ```rust
//! use solmask_core::{MaskingEngine, MaskingError, Rule};
//! use serde_json::json;
//!
//! fn main() -> Result<(), MaskingError> {
//!     let engine = MaskingEngine::with_defaults()?;
//!
//!     let masked = engine.mask_text("CPF: 12345678909, email: joao@email.com");
//!     assert_eq!(masked, "CPF: 123.XXX.XXX-09, email: joa***@email.com");
//!
//!     let value = engine.mask_value(&json!({"password": 42, "dados": {"telefone": "11987654321"}}));
//!     assert_eq!(value, json!({"password": "[REDACTED]", "dados": {"telefone": "11*****4321"}}));
//!
//!     engine.add_rule(Rule::new("contract_id", r"\b(\d{3})\d{4}(\d{3})\b", r"\1****\2")?)?;
//!     assert_eq!(engine.mask_text("contract_id=1234567890"), "contract_id=123****890");
//!
//!     let report = engine.validate_compliance("CPF: 12345678909", &["LGPD"]);
//!     assert_eq!(report["LGPD"], false);
//!     Ok(())
//! }
//! ```
//!
//! License: MIT OR APACHE 2.0

pub mod compliance;
pub mod config;
pub mod correlation;
pub mod detection;
pub mod engine;
pub mod errors;
pub mod partial;
pub mod pipeline;
pub mod redactor;
pub mod registry;
pub mod rule;
pub mod template;
pub mod validators;
pub mod walker;

pub use compliance::{ComplianceCatalog, ComplianceStandard};
pub use config::{
    builtin_rule_specs, MaskingLimits, MaskingPolicy, PiiFieldKind, RuleSpec, REDACTION_MARKER,
};
pub use correlation::hash_id;
pub use detection::Detection;
pub use engine::{EngineStats, Masker, MaskingEngine, StatsSnapshot};
pub use errors::MaskingError;
pub use redactor::OperationBudget;
pub use registry::{RuleRegistry, RuleSet};
pub use rule::{compile_rules, Rule};
pub use template::ReplacementTemplate;
pub use validators::MatchValidator;
pub use walker::StructuralWalker;
