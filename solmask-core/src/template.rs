//! template.rs - Replacement templates bound to a rule's capture groups.
//!
//! A template is parsed once, when its rule is built, and every group it
//! references is checked against the compiled pattern. Expansion never fails.
//!
//! Supported references:
//!
//! * `\N`, `\g<N>`, `\g<name>` (backslash style)
//! * `$N`, `${N}`, `${name}` (dollar style)
//!
//! `\\` and `$$` produce a literal backslash or dollar sign. Any other
//! character is copied verbatim. Digits after `\` or `$` are read greedily, so
//! write `\g<1>0` for "group 1 followed by a literal zero".
//!
//! License: MIT OR APACHE 2.0

use regex::{Captures, Regex};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Index(usize),
    Named(String),
}

/// A parsed, validated replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementTemplate {
    source: String,
    parts: Vec<Part>,
}

impl ReplacementTemplate {
    /// Parses `source` and checks every group reference against `regex`.
    ///
    /// Returns a human-readable reason on failure; the caller attaches the
    /// rule name.
    pub fn compile(source: &str, regex: &Regex) -> Result<Self, String> {
        let parts = parse(source)?;
        for part in &parts {
            match part {
                Part::Index(idx) if *idx >= regex.captures_len() => {
                    return Err(format!(
                        "replacement references capture group {} but the pattern only has {}",
                        idx,
                        regex.captures_len() - 1
                    ));
                }
                Part::Named(name) if !regex.capture_names().flatten().any(|n| n == name) => {
                    return Err(format!(
                        "replacement references unknown named group '{}'",
                        name
                    ));
                }
                _ => {}
            }
        }
        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// The template as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the template contains no group references.
    pub fn is_literal(&self) -> bool {
        self.parts.iter().all(|p| matches!(p, Part::Literal(_)))
    }

    /// Appends the template instantiated against `caps` to `dst`.
    ///
    /// Groups that did not participate in the match expand to nothing.
    pub fn expand(&self, caps: &Captures<'_>, dst: &mut String) {
        for part in &self.parts {
            match part {
                Part::Literal(text) => dst.push_str(text),
                Part::Index(idx) => {
                    if let Some(m) = caps.get(*idx) {
                        dst.push_str(m.as_str());
                    }
                }
                Part::Named(name) => {
                    if let Some(m) = caps.name(name) {
                        dst.push_str(m.as_str());
                    }
                }
            }
        }
    }
}

fn parse(source: &str) -> Result<Vec<Part>, String> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        let reference = match (c, chars.peek().copied()) {
            ('\\', Some('\\')) | ('$', Some('$')) => {
                chars.next();
                literal.push(c);
                None
            }
            ('\\', Some(d)) | ('$', Some(d)) if d.is_ascii_digit() => {
                Some(Part::Index(take_index(&mut chars)?))
            }
            ('\\', Some('g')) => {
                chars.next();
                if chars.next() != Some('<') {
                    return Err("expected '<' after '\\g' in replacement".to_string());
                }
                Some(parse_reference(&take_until(&mut chars, '>')?)?)
            }
            ('$', Some('{')) => {
                chars.next();
                Some(parse_reference(&take_until(&mut chars, '}')?)?)
            }
            _ => {
                literal.push(c);
                None
            }
        };

        if let Some(part) = reference {
            if !literal.is_empty() {
                parts.push(Part::Literal(std::mem::take(&mut literal)));
            }
            parts.push(part);
        }
    }

    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    Ok(parts)
}

fn take_index(chars: &mut Peekable<Chars<'_>>) -> Result<usize, String> {
    let mut digits = String::new();
    while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(d);
        chars.next();
    }
    digits
        .parse::<usize>()
        .map_err(|e| format!("invalid group index '{}': {}", digits, e))
}

fn take_until(chars: &mut Peekable<Chars<'_>>, close: char) -> Result<String, String> {
    let mut name = String::new();
    for c in chars.by_ref() {
        if c == close {
            return Ok(name);
        }
        name.push(c);
    }
    Err(format!("unterminated group reference, missing '{}'", close))
}

fn parse_reference(name: &str) -> Result<Part, String> {
    if name.is_empty() {
        return Err("empty group reference in replacement".to_string());
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return name
            .parse::<usize>()
            .map(Part::Index)
            .map_err(|e| format!("invalid group index '{}': {}", name, e));
    }
    let valid_ident = name
        .chars()
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && name.chars().all(|c| c == '_' || c.is_alphanumeric());
    if !valid_ident {
        return Err(format!("invalid group name '{}' in replacement", name));
    }
    Ok(Part::Named(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(pattern: &str, template: &str, input: &str) -> String {
        let re = Regex::new(pattern).unwrap();
        let tpl = ReplacementTemplate::compile(template, &re).unwrap();
        let caps = re.captures(input).unwrap();
        let mut out = String::new();
        tpl.expand(&caps, &mut out);
        out
    }

    #[test]
    fn backslash_references_expand() {
        assert_eq!(
            render(r"(\d{3})\d{6}(\d{2})", r"\1.XXX.XXX-\2", "12345678909"),
            "123.XXX.XXX-09"
        );
    }

    #[test]
    fn dollar_and_named_references_expand() {
        assert_eq!(
            render(r"(?P<head>\d{2})\d+(\d{2})", "${head}--$2", "123456"),
            "12--56"
        );
        assert_eq!(render(r"(a)(b)", r"\g<2>\g<1>0", "ab"), "ba0");
    }

    #[test]
    fn escapes_produce_literals() {
        assert_eq!(render(r"(x)", r"$$\\$1", "x"), r"$\x");
        assert_eq!(render(r"x", r"cost: $ and \n", "x"), r"cost: $ and \n");
    }

    #[test]
    fn unmatched_optional_group_expands_empty() {
        assert_eq!(render(r"a(b)?c", r"[\1]", "ac"), "[]");
    }

    #[test]
    fn rejects_missing_groups() {
        let re = Regex::new(r"(\d)").unwrap();
        assert!(ReplacementTemplate::compile(r"\2", &re).is_err());
        assert!(ReplacementTemplate::compile("${missing}", &re).is_err());
        assert!(ReplacementTemplate::compile(r"\g<1", &re).is_err());
        assert!(ReplacementTemplate::compile("${}", &re).is_err());
        assert!(ReplacementTemplate::compile(r"\0\1", &re).is_ok());
    }

    #[test]
    fn literal_detection() {
        let re = Regex::new(r"(\d)").unwrap();
        assert!(ReplacementTemplate::compile("[REDACTED]", &re).unwrap().is_literal());
        assert!(!ReplacementTemplate::compile("#$1", &re).unwrap().is_literal());
    }
}
