// solmask/src/main.rs
//! Solmask entry point.
//!
//! Loads `.env`, initializes logging, builds the masking engine and
//! dispatches to the selected subcommand.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

use solmask::cli::{Cli, Commands};
use solmask::commands::{check, hash, mask, rules, scan};
use solmask::{build_engine, logger};

fn main() -> Result<ExitCode> {
    // The logger is not up yet, so a broken .env is reported after init.
    let dotenv_error = match dotenvy::dotenv() {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    };
    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);
    if let Some(e) = dotenv_error {
        log::warn!("Ignoring unreadable .env file: {}", e);
    }

    let engine = build_engine(&args.enable_rule, &args.disable_rule)?;

    let passed = match &args.command {
        Commands::Mask(cmd) => {
            mask::run_mask(&engine, cmd)?;
            true
        }
        Commands::Scan(cmd) => scan::run_scan(&engine, cmd)?,
        Commands::Check(cmd) => check::run_check(&engine, cmd)?,
        Commands::Rules(cmd) => {
            rules::run_rules(&engine, cmd)?;
            true
        }
        Commands::Hash(cmd) => {
            hash::run_hash(&engine, cmd)?;
            true
        }
    };

    log::debug!("Engine stats: {:?}", engine.stats());
    Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
