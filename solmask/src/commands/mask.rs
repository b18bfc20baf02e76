// solmask/src/commands/mask.rs
//! `solmask mask`: masks text, JSON documents or a stream of lines.

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use solmask_core::MaskingEngine;

use crate::cli::MaskCommand;
use crate::commands::read_input;

pub fn run_mask(engine: &MaskingEngine, cmd: &MaskCommand) -> Result<()> {
    if cmd.json {
        let input = read_input(cmd.input_file.as_deref())?;
        let masked = mask_json(engine, &input)?;
        debug!(
            "JSON input masked. Original length: {}, masked length: {}",
            input.len(),
            masked.len()
        );
        return write_output(cmd.output.as_deref(), &masked);
    }

    // Plain text is masked line by line so the per-call input cap applies to
    // each line, not to the whole file.
    let reader: Box<dyn BufRead> = match &cmd.input_file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let writer: Box<dyn Write> = match &cmd.output {
        Some(path) => {
            info!("Writing masked content to file: {}", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };
    run_line_buffered(engine, reader, writer, cmd.line_buffered)
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            info!("Writing masked content to file: {}", path.display());
            fs::write(path, content)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Masks free text. A disabled policy passes the input through unchanged.
pub fn mask_plain(engine: &MaskingEngine, input: &str) -> String {
    if !engine.is_enabled() {
        return input.to_string();
    }
    engine.mask_text(input)
}

/// Parses `input` as JSON, masks it structurally and pretty-prints it.
pub fn mask_json(engine: &MaskingEngine, input: &str) -> Result<String> {
    let value: Value = serde_json::from_str(input).context("Input is not valid JSON")?;
    let masked = if engine.is_enabled() {
        engine.mask_value(&value)
    } else {
        info!("Masking disabled by policy; passing input through.");
        value
    };
    let mut out = serde_json::to_string_pretty(&masked)?;
    out.push('\n');
    Ok(out)
}

/// Masks `reader` one line at a time and writes the result to `writer`.
///
/// Line endings are copied as read, so a final line without a newline stays
/// without one. With `flush_each_line` every line is flushed as soon as it is
/// written, for streaming from pipes.
pub fn run_line_buffered<R: BufRead, W: Write>(
    engine: &MaskingEngine,
    mut reader: R,
    mut writer: W,
    flush_each_line: bool,
) -> Result<()> {
    if !engine.is_enabled() {
        info!("Masking disabled by policy; passing input through.");
    }

    let mut line = String::new();
    let mut count = 0usize;
    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .context("Failed to read line from input")?;
        if read == 0 {
            break;
        }
        let body = line.trim_end_matches(|c| c == '\n' || c == '\r');
        writer.write_all(mask_plain(engine, body).as_bytes())?;
        writer.write_all(line[body.len()..].as_bytes())?;
        if flush_each_line {
            writer.flush()?;
        }
        count += 1;
    }
    writer.flush().context("Failed to flush masked output")?;
    debug!("Masked {} line(s).", count);
    Ok(())
}
