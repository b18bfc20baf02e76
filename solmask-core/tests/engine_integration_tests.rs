// solmask-core/tests/engine_integration_tests.rs
use anyhow::Result;
use serde_json::json;
use test_log::test; // For integrating with `env_logger` in tests

use solmask_core::partial::mask_email;
use solmask_core::{
    ComplianceStandard, MaskingEngine, MaskingError, MaskingLimits, MaskingPolicy, PiiFieldKind,
    Rule,
};

#[test]
fn test_mask_text_mixed_document() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    let masked = engine.mask_text("CPF: 12345678909, email: joao@email.com, tel: 11987654321");
    assert_eq!(
        masked,
        "CPF: 123.XXX.XXX-09, email: joa***@email.com, tel: 11*****4321"
    );
    Ok(())
}

#[test]
fn test_mask_value_nested_pii_fields() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    let input = json!({
        "cpf": "12345678909",
        "dados": {"telefone": "11987654321", "cnpj": "12345678000199"}
    });
    assert_eq!(
        engine.mask_value(&input),
        json!({
            "cpf": "123.XXX.XXX-09",
            "dados": {"telefone": "11*****4321", "cnpj": "12.XXX.XXX/XXXX-99"}
        })
    );
    Ok(())
}

#[test]
fn test_mask_value_sensitive_fields_any_type() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    let input = json!({
        "user": "ana",
        "password": 123456,
        "API_KEY": true,
        "token": null,
        "itens": [{"secret": {"deep": 1}}, "mail me at ana@corp.com", 7]
    });
    assert_eq!(
        engine.mask_value(&input),
        json!({
            "user": "ana",
            "password": "[REDACTED]",
            "API_KEY": "[REDACTED]",
            "token": "[REDACTED]",
            "itens": [{"secret": "[REDACTED]"}, "mail me at an***@corp.com", 7]
        })
    );
    Ok(())
}

#[test]
fn test_mask_text_is_stable_on_adjacent_values() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    let cases = [
        ("ref 4111 1111 1111 1111 2222 3333 4444", "ref XXXX XXXX XXXX 4444"),
        ("4111111111111111", "XXXX XXXX XXXX 1111"),
        ("99@4.179a@71.2.6", "99***@71.2.6"),
        (")3794+.4@9.3@3.4@1)2", ")379***@3.4@1)2"),
        ("ab@x.com@y.z", "ab***@y.z"),
        ("12.345.678/0001-11987654321", "12.XXX.XXX/XXXX-11*****4321"),
        ("11987654321 1111 2222 3333", "11*****XXXX XXXX XXXX 3333"),
        ("12345678909.123.456/0001-99", "123.XXX.XXX-09.XXX.XXX/XXXX-99"),
        ("bearer 4111 1111 1111 1111", "bearer XXXX XXXX XXXX 1111"),
        (
            r#"{"password": "a?token=x", "token": "b"}"#,
            r#"{"password": "***MASKED***", "token": "***MASKED***"}"#,
        ),
    ];
    for (input, expected) in cases {
        let once = engine.mask_text(input);
        assert_eq!(once, expected, "masking {:?}", input);
        assert_eq!(engine.mask_text(&once), once, "re-masking {:?}", once);
    }
    Ok(())
}

#[test]
fn test_email_in_text_matches_field_mask() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    for address in ["a@x.com", "ab@x.com", "abc@x.com", "joao@email.com"] {
        assert_eq!(engine.mask_text(address), mask_email(address));
    }
    assert_eq!(engine.mask_text("ab@x.com"), "a***@x.com");
    Ok(())
}

#[test]
fn test_custom_rule_runs_after_builtins() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    engine.add_rule(Rule::new(
        "contract_id",
        r"\b(\d{3})\d{4}(\d{3})\b",
        r"\1****\2",
    )?)?;
    assert_eq!(
        engine.mask_text("contract_id=1234567890"),
        "contract_id=123****890"
    );
    Ok(())
}

#[test]
fn test_duplicate_rule_name_is_rejected() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    let rule = || Rule::new("contract_id", r"\b\d{10}\b", "[CONTRACT]");
    engine.add_rule(rule()?)?;
    let err = engine.add_rule(rule()?).unwrap_err();
    assert_eq!(err, MaskingError::DuplicateRuleName("contract_id".to_string()));

    // Built-in names collide too.
    let err = engine.add_rule(Rule::new("email", "x@y", "[E]")?).unwrap_err();
    assert!(matches!(err, MaskingError::DuplicateRuleName(ref n) if n == "email"));

    // An explicit replace is fine.
    assert!(engine.replace_rule(rule()?).is_some());
    Ok(())
}

#[test]
fn test_compliance_before_and_after_masking() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    let raw = "CPF: 12345678909";

    let before = engine.validate_compliance(raw, &["LGPD"]);
    assert_eq!(before.get("LGPD"), Some(&false));

    let masked = engine.mask_text(raw);
    let after = engine.validate_compliance(&masked, &["LGPD"]);
    assert_eq!(after.get("LGPD"), Some(&true));
    Ok(())
}

#[test]
fn test_unknown_standard_is_not_an_error() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    let report = engine.validate_compliance("anything", &["UNKNOWN_STANDARD", "GDPR"]);
    assert_eq!(report.get("UNKNOWN_STANDARD"), Some(&false));
    assert_eq!(report.get("GDPR"), Some(&true));
    assert!(matches!(
        engine.rules_for_standard("UNKNOWN_STANDARD"),
        Err(MaskingError::UnknownComplianceStandard(_))
    ));
    Ok(())
}

#[test]
fn test_disabled_rule_still_counts_for_compliance() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    assert!(engine.disable_rule("cpf"));
    let text = "CPF: 12345678909";
    assert_eq!(engine.mask_text(text), text);
    assert_eq!(engine.validate_compliance(text, &["LGPD"])["LGPD"], false);
    Ok(())
}

#[test]
fn test_custom_standard_and_pci() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    engine.register_standard(ComplianceStandard::new("SOX", ["bank_account"]));

    let text = "pay 4111 1111 1111 1111 from 12345-61234567-8";
    let report = engine.validate_compliance(text, &["PCI-DSS", "SOX"]);
    assert_eq!(report["PCI-DSS"], false);
    assert_eq!(report["SOX"], false);

    let masked = engine.mask_text(text);
    assert_eq!(masked, "pay XXXX XXXX XXXX 1111 from 12345-6XXXXXX-8");
    let report = engine.validate_compliance(&masked, &["PCI-DSS", "SOX"]);
    assert_eq!(report["PCI-DSS"], true);
    assert_eq!(report["SOX"], true);
    Ok(())
}

#[test]
fn test_limits_fall_back_to_placeholder() -> Result<()> {
    let limits = MaskingLimits {
        operation_budget: 32,
        fallback_text: "[dropped]".to_string(),
        ..MaskingLimits::default()
    };
    let engine = MaskingEngine::new(MaskingPolicy::default(), limits)?;
    assert_eq!(engine.mask_text("a string long enough to exhaust the budget"), "[dropped]");
    assert_eq!(
        engine.mask_value(&json!({"n": 1, "s": "another string long enough to exhaust it"})),
        json!({"n": 1, "s": "[dropped]"})
    );
    assert_eq!(engine.stats().fallbacks, 2);
    Ok(())
}

#[test]
fn test_policy_pii_fields_are_configurable() -> Result<()> {
    let mut policy = MaskingPolicy::default();
    policy
        .pii_fields
        .insert("Contato".to_string(), PiiFieldKind::Email);
    let engine = MaskingEngine::new(policy, MaskingLimits::default())?;
    assert_eq!(
        engine.mask_value(&json!({"contato": "maria@site.org"})),
        json!({"contato": "mar***@site.org"})
    );
    Ok(())
}

#[test]
fn test_detect_and_hash_id() -> Result<()> {
    let engine = MaskingEngine::with_defaults()?;
    let found = engine.detect("mail a@b.com, ssn 123-45-6789");
    let names: Vec<&str> = found.iter().map(|d| d.rule.as_str()).collect();
    assert_eq!(names, vec!["us_ssn", "email"]);

    let id = engine.hash_id("12345678909", "salt");
    assert_eq!(id.len(), 12);
    assert_eq!(id, engine.hash_id("12345678909", "salt"));
    Ok(())
}
