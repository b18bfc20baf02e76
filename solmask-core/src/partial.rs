// File: solmask-core/src/partial.rs
//! Field-specific partial redaction.
//!
//! When a structured payload names a field (`"email"`, `"cpf"`, ...), the value
//! is masked with a dedicated function that keeps a small, fixed part of it
//! readable. Values that do not have the expected shape become
//! [`REDACTION_MARKER`].
//!
//! License: MIT OR APACHE 2.0

use crate::config::{PiiFieldKind, REDACTION_MARKER};

/// Dispatches to the partial function for `kind`.
pub fn mask_field(kind: PiiFieldKind, value: &str) -> String {
    match kind {
        PiiFieldKind::Email => mask_email(value),
        PiiFieldKind::Phone => mask_phone(value),
        PiiFieldKind::NationalId => mask_national_id(value),
        PiiFieldKind::OrganizationId => mask_organization_id(value),
        PiiFieldKind::CardNumber => mask_card_number(value),
        PiiFieldKind::Secret => mask_secret(value),
    }
}

/// `joao@email.com` -> `joa***@email.com`.
///
/// Keeps up to three characters of the local part, always hiding at least one.
pub fn mask_email(value: &str) -> String {
    let Some((local, domain)) = value.trim().rsplit_once('@') else {
        return marker();
    };
    let local_len = local.chars().count();
    if local_len == 0 || domain.is_empty() {
        return marker();
    }
    let keep = local_len.saturating_sub(1).clamp(1, 3);
    let head: String = local.chars().take(keep).collect();
    format!("{}***@{}", head, domain)
}

/// `11987654321` or `(11) 98765-4321` -> `11*****4321`.
pub fn mask_phone(value: &str) -> String {
    let digits = digits_of(value);
    if digits.len() < 6 {
        return marker();
    }
    format!("{}*****{}", &digits[..2], &digits[digits.len() - 4..])
}

/// `12345678909` -> `123.XXX.XXX-09`.
pub fn mask_national_id(value: &str) -> String {
    let digits = digits_of(value);
    if digits.len() != 11 {
        return marker();
    }
    format!("{}.XXX.XXX-{}", &digits[..3], &digits[9..])
}

/// `12345678000199` -> `12.XXX.XXX/XXXX-99`.
pub fn mask_organization_id(value: &str) -> String {
    let digits = digits_of(value);
    if digits.len() != 14 {
        return marker();
    }
    format!("{}.XXX.XXX/XXXX-{}", &digits[..2], &digits[12..])
}

/// `4111 1111 1111 1234` -> `XXXX XXXX XXXX 1234`. Separators are kept.
pub fn mask_card_number(value: &str) -> String {
    let total = value.chars().filter(char::is_ascii_digit).count();
    let only_card_chars = value
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
    if !(12..=19).contains(&total) || !only_card_chars {
        return marker();
    }

    let mut seen = 0usize;
    value
        .chars()
        .map(|c| {
            if !c.is_ascii_digit() {
                return c;
            }
            seen += 1;
            if seen > total - 4 {
                c
            } else {
                'X'
            }
        })
        .collect()
}

pub fn mask_secret(_value: &str) -> String {
    marker()
}

fn digits_of(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn marker() -> String {
    REDACTION_MARKER.to_string()
}
