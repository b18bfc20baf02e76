// solmask/src/commands/check.rs
//! `solmask check`: compliance verdicts for the input.

use anyhow::Result;
use is_terminal::IsTerminal;
use std::collections::BTreeMap;
use std::io::{self, Write};

use solmask_core::MaskingEngine;

use crate::cli::CheckCommand;
use crate::commands::read_input;
use crate::ui::output_format;

/// Returns `false` when `--strict` is set and a standard is not satisfied.
pub fn run_check(engine: &MaskingEngine, cmd: &CheckCommand) -> Result<bool> {
    let input = read_input(cmd.input_file.as_deref())?;
    let standards = if cmd.standards.is_empty() {
        engine.standards()
    } else {
        cmd.standards.clone()
    };
    let verdicts = engine.validate_compliance(&input, &standards);

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut writer = stdout.lock();
    if cmd.json_stdout {
        writeln!(writer, "{}", serde_json::to_string_pretty(&verdicts)?)?;
    } else {
        print_verdicts(&mut writer, &verdicts, color)?;
    }

    let all_ok = verdicts.values().all(|ok| *ok);
    Ok(all_ok || !cmd.strict)
}

fn print_verdicts<W: Write>(
    writer: &mut W,
    verdicts: &BTreeMap<String, bool>,
    color: bool,
) -> io::Result<()> {
    for (standard, ok) in verdicts {
        let value = if *ok { "compliant" } else { "NOT compliant" };
        output_format::print_verdict(writer, standard, value, *ok, color)?;
    }
    Ok(())
}
