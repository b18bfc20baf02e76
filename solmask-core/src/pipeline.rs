//! pipeline.rs - Sequential text masking over a rule snapshot.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use log::trace;

use crate::config::MaskingLimits;
use crate::errors::MaskingError;
use crate::redactor::{self, OperationBudget};
use crate::registry::RuleSet;

/// Applies every enabled rule of `rules`, in order, to `text`.
///
/// The output of each rule is the input of the next one. The whole call
/// shares one [`OperationBudget`].
///
/// # Errors
///
/// * [`MaskingError::InputTooLarge`] when `text` exceeds `limits.max_input_bytes`.
/// * [`MaskingError::MaskingTimeout`] when the operation budget runs out.
pub fn mask_text(rules: &RuleSet, text: &str, limits: &MaskingLimits) -> Result<String, MaskingError> {
    if text.len() > limits.max_input_bytes {
        return Err(MaskingError::InputTooLarge {
            len: text.len(),
            max: limits.max_input_bytes,
        });
    }

    let mut budget = OperationBudget::new(limits.operation_budget);
    let mut current: Cow<'_, str> = Cow::Borrowed(text);

    for rule in rules.enabled() {
        let replaced = match redactor::redact(rule, &current, &mut budget)? {
            Cow::Owned(s) => Some(s),
            Cow::Borrowed(_) => None,
        };
        if let Some(s) = replaced {
            trace!("Rule '{}' rewrote the input.", rule.name());
            current = Cow::Owned(s);
        }
    }

    trace!("Pipeline finished, {} operations spent.", budget.spent());
    Ok(current.into_owned())
}
