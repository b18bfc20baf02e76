// solmask/src/commands/scan.rs
//! `solmask scan`: per-rule occurrence counts, never the matched content.

use anyhow::Result;
use is_terminal::IsTerminal;
use log::info;
use std::io::{self, Write};

use solmask_core::{Detection, MaskingEngine};

use crate::cli::ScanCommand;
use crate::commands::read_input;
use crate::ui::output_format;

/// Runs the scan. Returns `false` when the fail-over threshold was exceeded.
pub fn run_scan(engine: &MaskingEngine, cmd: &ScanCommand) -> Result<bool> {
    let input = read_input(cmd.input_file.as_deref())?;
    let detections = engine.detect(&input);
    let total: usize = detections.iter().map(|d| d.occurrences).sum();
    info!("Scan found {} detections across {} rules.", total, detections.len());

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut writer = stdout.lock();
    if cmd.json_stdout {
        let summary = serde_json::json!({
            "total": total,
            "detections": detections,
        });
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        print_summary(&mut writer, &detections, total, color)?;
    }

    match cmd.fail_over_threshold {
        Some(limit) if total > limit => {
            output_format::print_warn_message(
                &format!("{} detections exceed the threshold of {}.", total, limit),
                io::stderr().is_terminal(),
            );
            Ok(false)
        }
        _ => Ok(true),
    }
}

fn print_summary<W: Write>(
    writer: &mut W,
    detections: &[Detection],
    total: usize,
    color: bool,
) -> io::Result<()> {
    output_format::print_header(writer, "Scan Summary", color)?;
    if detections.is_empty() {
        return writeln!(writer, "No sensitive data detected.");
    }
    for d in detections {
        let mut value = format!("{} occurrence(s)", d.occurrences);
        if !d.compliance.is_empty() {
            value.push_str(&format!(" [{}]", d.compliance.join(", ")));
        }
        output_format::print_verdict(writer, &d.rule, &value, false, color)?;
    }
    writeln!(writer, "Total: {}", total)
}
