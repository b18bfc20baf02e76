// File: solmask-core/src/validators.rs
//! Programmatic validation functions for matched candidates.
//!
//! Regex matching alone cannot tell an 11-digit national ID from an 11-digit
//! phone number. Rules that carry a [`MatchValidator`] only redact (and only
//! report as detected) the matches that pass the corresponding check digit
//! algorithm; rejected matches stay in the text for later rules to consider.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// A programmatic check applied to every match of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchValidator {
    /// Brazilian CPF check digits (11 digits).
    Cpf,
    /// Brazilian CNPJ check digits (14 digits).
    Cnpj,
    /// Luhn / mod 10 checksum, as used by payment cards.
    Luhn,
}

impl MatchValidator {
    /// Runs the check against the raw matched text. Non-digit characters are ignored.
    pub fn accepts(self, candidate: &str) -> bool {
        match self {
            MatchValidator::Cpf => is_valid_cpf(candidate),
            MatchValidator::Cnpj => is_valid_cnpj(candidate),
            MatchValidator::Luhn => is_valid_luhn(candidate),
        }
    }
}

impl fmt::Display for MatchValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchValidator::Cpf => "cpf",
            MatchValidator::Cnpj => "cnpj",
            MatchValidator::Luhn => "luhn",
        };
        f.write_str(name)
    }
}

fn digits_of(text: &str) -> Vec<u32> {
    text.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Computes one mod-11 check digit over `digits` using `weights`.
fn mod11_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        0 | 1 => 0,
        rem => 11 - rem,
    }
}

/// Validates a CPF number (punctuation is ignored).
///
/// Sequences of a single repeated digit (`111.111.111-11`) satisfy the check
/// digit formula but are not issued, so they are rejected.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits = digits_of(cpf);
    if digits.len() != 11 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let first = mod11_check_digit(&digits[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = mod11_check_digit(&digits[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);

    digits[9] == first && digits[10] == second
}

/// Validates a CNPJ number (punctuation is ignored).
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let digits = digits_of(cnpj);
    if digits.len() != 14 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let first = mod11_check_digit(&digits[..12], &FIRST_WEIGHTS);
    let second = mod11_check_digit(&digits[..13], &SECOND_WEIGHTS);

    digits[12] == first && digits[13] == second
}

/// Validates a number with the Luhn algorithm (spaces and dashes are ignored).
pub fn is_valid_luhn(number: &str) -> bool {
    let digits = digits_of(number);
    if digits.len() < 2 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| match (i % 2 == 1, d * 2) {
            (true, doubled) if doubled > 9 => doubled - 9,
            (true, doubled) => doubled,
            (false, _) => d,
        })
        .sum();

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_check_digits() {
        assert!(is_valid_cpf("12345678909"));
        assert!(is_valid_cpf("123.456.789-09"));
        assert!(!is_valid_cpf("12345678900"));
        // A mobile number, not a CPF.
        assert!(!is_valid_cpf("11987654321"));
        assert!(!is_valid_cpf("11111111111"));
        assert!(!is_valid_cpf("1234567890"));
    }

    #[test]
    fn cnpj_check_digits() {
        assert!(is_valid_cnpj("11.222.333/0001-81"));
        assert!(is_valid_cnpj("11222333000181"));
        assert!(!is_valid_cnpj("11222333000182"));
        assert!(!is_valid_cnpj("00000000000000"));
    }

    #[test]
    fn luhn_checksum() {
        assert!(is_valid_luhn("4111 1111 1111 1111"));
        assert!(is_valid_luhn("79927398713"));
        assert!(!is_valid_luhn("4111-1111-1111-1112"));
        assert!(!is_valid_luhn("7"));
    }

    #[test]
    fn validator_dispatch() {
        assert!(MatchValidator::Cpf.accepts("12345678909"));
        assert!(!MatchValidator::Cnpj.accepts("12345678909"));
        assert_eq!(MatchValidator::Luhn.to_string(), "luhn");
    }
}
