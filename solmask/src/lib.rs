// solmask/src/lib.rs
//! # Solmask CLI Application
//!
//! Command-line front end for `solmask-core`: masks files, stdin and JSON
//! documents, scans for sensitive categories, checks compliance and lists
//! the active rules.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

use anyhow::{Context, Result};
use log::debug;
use solmask_core::{MaskingEngine, MaskingLimits, MaskingPolicy};

/// Builds the engine from `SOLMASK_*` variables plus per-run rule toggles.
pub fn build_engine(enable: &[String], disable: &[String]) -> Result<MaskingEngine> {
    let mut policy = MaskingPolicy::from_env().context("Invalid masking policy in environment")?;
    let limits = MaskingLimits::from_env().context("Invalid masking limits in environment")?;
    policy.enabled_rules.extend(enable.iter().cloned());
    policy.disabled_rules.extend(disable.iter().cloned());
    debug!(
        "Building engine: {} custom patterns, enable {:?}, disable {:?}.",
        policy.custom_patterns.len(),
        policy.enabled_rules,
        policy.disabled_rules
    );
    MaskingEngine::new(policy, limits).context("Failed to initialize the masking engine")
}
