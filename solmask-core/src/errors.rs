//! errors.rs - Custom error types for the solmask-core library.
//!
//! Configuration-time failures (rule registration, environment parsing) are
//! surfaced to the caller. Call-time failures (`MaskingTimeout`, `InputTooLarge`)
//! are recovered inside the engine and never reach the logging pipeline.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error kinds produced by `solmask-core`.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MaskingError {
    #[error("Invalid masking rule '{rule}': {reason}")]
    InvalidPattern { rule: String, reason: String },

    #[error("A masking rule named '{0}' is already registered")]
    DuplicateRuleName(String),

    #[error("Unknown compliance standard '{0}'")]
    UnknownComplianceStandard(String),

    #[error("Masking exceeded its operation budget of {budget}")]
    MaskingTimeout { budget: u64 },

    #[error("Input of {len} bytes exceeds the masking limit of {max} bytes")]
    InputTooLarge { len: usize, max: usize },

    #[error("Failed to load built-in masking rules: {0}")]
    BuiltinRules(String),

    #[error("Invalid configuration value for {key}: {reason}")]
    Config { key: String, reason: String },
}

impl MaskingError {
    pub(crate) fn invalid_pattern(rule: impl Into<String>, reason: impl ToString) -> Self {
        MaskingError::InvalidPattern {
            rule: rule.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that the engine recovers locally with the fallback text.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MaskingError::MaskingTimeout { .. } | MaskingError::InputTooLarge { .. }
        )
    }
}
