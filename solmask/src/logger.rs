// solmask/src/logger.rs
//! Logging setup for the solmask CLI.
//!
//! Logs always go to stderr so that masked output on stdout stays clean.
//! `RUST_LOG` is honored unless a level is forced by `--quiet` or `--debug`.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes `env_logger`. Safe to call more than once.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.target(Target::Stderr).format_timestamp(None);
    // A second initialization (tests, embedding) is not an error.
    let _ = builder.try_init();
}
