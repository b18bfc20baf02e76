//! redactor.rs - Applies a single rule to a single string.
//!
//! Matching is leftmost-first and non-overlapping (standard `regex` scanning).
//! Each accepted match is replaced by the rule's template instantiated
//! against that match. Matches rejected by the rule's validator stay verbatim.
//!
//! Cost is metered through [`CostMeter`] so that the pipeline can enforce a
//! deterministic [`OperationBudget`] while `Rule::apply` runs unmetered.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;
use std::convert::Infallible;

use crate::errors::MaskingError;
use crate::rule::Rule;

/// Something that can be charged for work done while redacting.
pub trait CostMeter {
    type Error;

    fn charge(&mut self, cost: u64) -> Result<(), Self::Error>;
}

/// A deterministic cost cap for one masking call.
///
/// Scanning a string with one rule costs its length in bytes; each
/// replacement costs one plus the length of the text it emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationBudget {
    limit: u64,
    spent: u64,
}

impl OperationBudget {
    pub fn new(limit: u64) -> Self {
        Self { limit, spent: 0 }
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.spent)
    }
}

impl CostMeter for OperationBudget {
    type Error = MaskingError;

    fn charge(&mut self, cost: u64) -> Result<(), MaskingError> {
        self.spent = self.spent.saturating_add(cost);
        if self.spent > self.limit {
            return Err(MaskingError::MaskingTimeout { budget: self.limit });
        }
        Ok(())
    }
}

/// Meter that never refuses work.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmetered;

impl CostMeter for Unmetered {
    type Error = Infallible;

    fn charge(&mut self, _cost: u64) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Redacts `text` with `rule`. Disabled rules return the input untouched.
pub fn apply<'t>(rule: &Rule, text: &'t str) -> Cow<'t, str> {
    match redact(rule, text, &mut Unmetered) {
        Ok(out) => out,
        Err(never) => match never {},
    }
}

/// Redacts `text` with `rule`, charging `meter` as it goes.
///
/// Returns `Cow::Borrowed` when nothing was replaced.
pub fn redact<'t, M: CostMeter>(
    rule: &Rule,
    text: &'t str,
    meter: &mut M,
) -> Result<Cow<'t, str>, M::Error> {
    if !rule.is_enabled() {
        return Ok(Cow::Borrowed(text));
    }
    meter.charge(text.len() as u64)?;

    let mut output: Option<String> = None;
    let mut last_end = 0usize;

    for caps in rule.pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if !accepted(rule, whole.as_str()) {
            continue;
        }

        let buf = output.get_or_insert_with(|| String::with_capacity(text.len()));
        buf.push_str(&text[last_end..whole.start()]);
        let before = buf.len();
        rule.replacement().expand(&caps, buf);
        meter.charge(1 + (buf.len() - before) as u64)?;
        last_end = whole.end();
    }

    Ok(match output {
        Some(mut buf) => {
            buf.push_str(&text[last_end..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(text),
    })
}

/// True when `text` still contains at least one accepted match of `rule`.
///
/// Ignores the enabled flag: a disabled rule still describes its category.
pub fn detects(rule: &Rule, text: &str) -> bool {
    rule.pattern()
        .find_iter(text)
        .any(|m| accepted(rule, m.as_str()))
}

/// Number of accepted matches of `rule` in `text`.
pub fn count_matches(rule: &Rule, text: &str) -> usize {
    rule.pattern()
        .find_iter(text)
        .filter(|m| accepted(rule, m.as_str()))
        .count()
}

fn accepted(rule: &Rule, candidate: &str) -> bool {
    rule.validator().map_or(true, |v| v.accepts(candidate))
}
