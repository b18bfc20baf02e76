// solmask/src/ui/output_format.rs
//! Small helpers for styled terminal output.
//!
//! Color is only applied when the target stream is a terminal; redirected
//! output stays plain text.

use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Writes a bold section header.
pub fn print_header<W: Write>(writer: &mut W, text: &str, color: bool) -> io::Result<()> {
    if color {
        writeln!(writer, "{}", text.bold().underline())
    } else {
        writeln!(writer, "{}", text)
    }
}

/// Writes `label: value`, coloring the value green or red by `ok`.
pub fn print_verdict<W: Write>(
    writer: &mut W,
    label: &str,
    value: &str,
    ok: bool,
    color: bool,
) -> io::Result<()> {
    match (color, ok) {
        (true, true) => writeln!(writer, "{}: {}", label.cyan(), value.green()),
        (true, false) => writeln!(writer, "{}: {}", label.cyan(), value.red().bold()),
        (false, _) => writeln!(writer, "{}: {}", label, value),
    }
}

/// Writes a warning line to stderr.
pub fn print_warn_message(text: &str, color: bool) {
    let mut stderr = io::stderr();
    let _ = if color {
        writeln!(stderr, "{}", text.yellow())
    } else {
        writeln!(stderr, "{}", text)
    };
}
