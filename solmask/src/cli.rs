// solmask/src/cli.rs
//! This file defines the command-line interface (CLI) for the solmask application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "solmask",
    author = "Solview Team",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mask sensitive data and audit text against compliance standards",
    long_about = "Solmask detects and masks personal and regulated data (CPF, CNPJ, emails, phone numbers, card numbers, bank accounts, credentials, tokens) in plain text and JSON payloads, and checks whether a text satisfies standards such as LGPD, GDPR or PCI-DSS. Policy and limits are read from SOLMASK_* environment variables (a .env file is honored).",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all log output.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Rules to switch on for this run, in addition to SOLMASK_ENABLED_RULES.
    #[arg(long = "enable-rule", value_delimiter = ',', global = true, value_name = "NAME", help = "Enable these rule names (comma-separated), e.g. ipv4.")]
    pub enable_rule: Vec<String>,

    /// Rules to switch off for this run, in addition to SOLMASK_DISABLED_RULES.
    #[arg(long = "disable-rule", value_delimiter = ',', global = true, value_name = "NAME", help = "Disable these rule names (comma-separated).")]
    pub disable_rule: Vec<String>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `solmask` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Masks an input file or stdin.
    #[command(about = "Masks sensitive data in an input file or stdin.")]
    Mask(MaskCommand),

    /// Reports which categories occur in the input, without masking.
    #[command(about = "Reports which sensitive categories occur in the input without masking it.")]
    Scan(ScanCommand),

    /// Validates the input against compliance standards.
    #[command(about = "Checks the input against compliance standards (LGPD, GDPR, PCI-DSS, ...).")]
    Check(CheckCommand),

    /// Lists the active masking rules.
    #[command(about = "Lists the masking rules, or the categories a standard requires.")]
    Rules(RulesCommand),

    /// Prints a salted correlation id for a value.
    #[command(about = "Prints a deterministic, salted correlation id for a value.")]
    Hash(HashCommand),
}

/// Arguments for the `mask` command.
#[derive(Parser, Debug)]
pub struct MaskCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write masked output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Treat the input as a JSON document and mask it structurally.
    #[arg(long, conflicts_with = "line_buffered", help = "Parse the input as JSON and mask it field by field.")]
    pub json: bool,

    /// Flush the output after every masked line.
    #[arg(long = "line-buffered", help = "Flush the output after every line (useful for streaming data from pipes).")]
    pub line_buffered: bool,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Exit with a non-zero code if the total number of detections exceeds this threshold.
    #[arg(long = "fail-over-threshold", value_name = "N", help = "Exit with a non-zero code if the total number of detections exceeds this threshold.")]
    pub fail_over_threshold: Option<usize>,

    /// Print the scan summary as JSON to stdout.
    #[arg(long = "json-stdout", help = "Print the scan summary to stdout as JSON.")]
    pub json_stdout: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Standards to check (comma-separated). Defaults to every known standard.
    #[arg(long, short = 's', value_delimiter = ',', value_name = "NAME", help = "Standards to check (comma-separated). Defaults to all known standards.")]
    pub standards: Vec<String>,

    /// Exit with a non-zero code when any standard is not satisfied.
    #[arg(long, help = "Exit with a non-zero code when any standard is not satisfied.")]
    pub strict: bool,

    /// Print the verdicts as a JSON object to stdout.
    #[arg(long = "json-stdout", help = "Print the verdicts to stdout as JSON.")]
    pub json_stdout: bool,
}

/// Arguments for the `rules` command.
#[derive(Parser, Debug)]
pub struct RulesCommand {
    /// Only list the categories required by this standard.
    #[arg(long, short = 's', value_name = "NAME", help = "Only list the categories required by this standard.")]
    pub standard: Option<String>,

    /// Print the rule definitions as JSON to stdout.
    #[arg(long = "json-stdout", help = "Print the rule definitions to stdout as JSON.")]
    pub json_stdout: bool,
}

/// Arguments for the `hash` command.
#[derive(Parser, Debug)]
pub struct HashCommand {
    /// The value to hash.
    #[arg(value_name = "VALUE", help = "The value to derive a correlation id from.")]
    pub value: String,

    /// Salt appended to the value before hashing.
    #[arg(long, env = "SOLMASK_HASH_SALT", default_value = "", hide_env_values = true, help = "Salt appended to the value before hashing.")]
    pub salt: String,
}
