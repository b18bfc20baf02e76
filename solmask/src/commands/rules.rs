// solmask/src/commands/rules.rs
//! `solmask rules`: lists rules, or the categories a standard requires.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::io::{self, Write};

use solmask_core::{MaskingEngine, RuleSpec};

use crate::cli::RulesCommand;
use crate::ui::output_format;

pub fn run_rules(engine: &MaskingEngine, cmd: &RulesCommand) -> Result<()> {
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut writer = stdout.lock();

    if let Some(standard) = &cmd.standard {
        let categories = engine
            .rules_for_standard(standard)
            .with_context(|| format!("Cannot list categories for '{}'", standard))?;
        if cmd.json_stdout {
            writeln!(writer, "{}", serde_json::to_string_pretty(&categories)?)?;
        } else {
            output_format::print_header(&mut writer, &standard.to_ascii_uppercase(), color)?;
            for category in categories {
                writeln!(writer, "{}", category)?;
            }
        }
        return Ok(());
    }

    let specs: Vec<RuleSpec> = engine.registry().snapshot().iter().map(|r| r.to_spec()).collect();
    if cmd.json_stdout {
        writeln!(writer, "{}", serde_json::to_string_pretty(&specs)?)?;
    } else {
        print_rules(&mut writer, &specs, color)?;
    }
    Ok(())
}

fn print_rules<W: Write>(writer: &mut W, specs: &[RuleSpec], color: bool) -> io::Result<()> {
    output_format::print_header(writer, "Masking Rules (application order)", color)?;
    for spec in specs {
        let mut value = if spec.enabled { "enabled" } else { "disabled" }.to_string();
        if !spec.compliance.is_empty() {
            value.push_str(&format!(" [{}]", spec.compliance.join(", ")));
        }
        if !spec.description.is_empty() {
            value.push_str(&format!(" - {}", spec.description));
        }
        output_format::print_verdict(writer, &spec.name, &value, spec.enabled, color)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_lines() {
        let mut spec = RuleSpec::new("cpf", r"\d{11}");
        spec.compliance = vec!["LGPD".to_string()];
        spec.description = "Brazilian CPF".to_string();
        let mut off = RuleSpec::new("ipv4", r"\d+\.\d+");
        off.enabled = false;

        let mut buf = Vec::new();
        print_rules(&mut buf, &[spec, off], false).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Masking Rules (application order)\ncpf: enabled [LGPD] - Brazilian CPF\nipv4: disabled\n"
        );
    }
}
