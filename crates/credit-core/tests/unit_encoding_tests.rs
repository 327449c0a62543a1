//! Unit tests for the feature encoder
//!
//! Covers vector width, block layout, categorical fallback and failure modes.

use credit_core::encoding::{CATEGORICAL_FIELDS, NUMERIC_FIELDS};
use credit_core::{encode, EncodedValue, EncodingError, FeatureRecord, VECTOR_LEN};
use serde_json::json;

fn engineer_record() -> FeatureRecord {
    serde_json::from_value(json!({
        "idade": 35,
        "renda_anual": 85000.0,
        "salario_liquido_mensal": 5500.0,
        "qtd_contas_bancarias": 3,
        "qtd_cartoes_credito": 2,
        "taxa_juros": 2.5,
        "qtd_emprestimos": 1,
        "dias_atraso_pagamento": 0,
        "qtd_pagamentos_atrasados": 0,
        "variacao_limite_credito": 500.0,
        "qtd_consultas_credito": 2,
        "divida_pendente": 1500.0,
        "percentual_utilizacao_credito": 35.5,
        "total_emprestimos_mensal": 800.0,
        "valor_investido_mensal": 1200.0,
        "saldo_mensal": 3000.0,
        "tempo_historico_credito_meses": 72,
        "ocupacao": "Engineer",
        "pagamento_valor_minimo": "Yes",
        "comportamento_pagamento": "Low_spent_Medium_value_payments",
        "tipos_emprestimos": "Personal Loan"
    }))
    .unwrap()
}

/// Start offset of each categorical block
fn block_offsets() -> Vec<(usize, usize)> {
    let mut offset = NUMERIC_FIELDS.len();
    CATEGORICAL_FIELDS
        .iter()
        .map(|field| {
            let start = offset;
            offset += field.domain.len();
            (start, field.domain.len())
        })
        .collect()
}

fn count_true(values: &[EncodedValue]) -> usize {
    values
        .iter()
        .filter(|v| **v == EncodedValue::Flag(true))
        .count()
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_vector_has_48_elements() {
    let vector = encode(&engineer_record()).unwrap();
    assert_eq!(vector.len(), 48);
    assert_eq!(vector.len(), VECTOR_LEN);
}

#[test]
fn test_numeric_columns_keep_semantic_type() {
    let vector = encode(&engineer_record()).unwrap();
    for (i, field) in NUMERIC_FIELDS.iter().enumerate() {
        let value = vector.get(i).unwrap();
        match field.kind {
            credit_core::encoding::NumericKind::Float => {
                assert!(matches!(value, EncodedValue::Float(_)), "{} should be float", field.key)
            }
            credit_core::encoding::NumericKind::Int => {
                assert!(matches!(value, EncodedValue::Int(_)), "{} should be int", field.key)
            }
        }
    }
}

#[test]
fn test_every_domain_member_sets_exactly_one_flag() {
    for (field, (start, len)) in CATEGORICAL_FIELDS.iter().zip(block_offsets()) {
        for (position, member) in field.domain.iter().enumerate() {
            let mut record = engineer_record();
            record.insert(field.key, *member);

            let vector = encode(&record).unwrap();
            let block = &vector.values()[start..start + len];

            assert_eq!(count_true(block), 1, "{}={}", field.key, member);
            assert_eq!(block[position], EncodedValue::Flag(true));
        }
    }
}

#[test]
fn test_values_outside_domain_yield_all_false_block() {
    let outside = ["Accountant", "No", "High_spent_Large_value_payments", "Auto Loan"];

    for ((field, (start, len)), value) in CATEGORICAL_FIELDS
        .iter()
        .zip(block_offsets())
        .zip(outside)
    {
        let mut record = engineer_record();
        record.insert(field.key, value);

        let vector = encode(&record).unwrap();
        assert_eq!(count_true(&vector.values()[start..start + len]), 0, "{}", field.key);
    }
}

#[test]
fn test_category_match_is_case_sensitive() {
    let mut record = engineer_record();
    record.insert("ocupacao", "engineer");

    let vector = encode(&record).unwrap();
    let (start, len) = block_offsets()[0];
    assert_eq!(count_true(&vector.values()[start..start + len]), 0);
}

#[test]
fn test_accountant_scenario() {
    let mut record = engineer_record();
    record.insert("ocupacao", "Accountant");

    let vector = encode(&record).expect("unknown occupation must not fail");
    let (start, len) = block_offsets()[0];
    assert!(vector.values()[start..start + len]
        .iter()
        .all(|v| *v == EncodedValue::Flag(false)));

    // Other blocks are unaffected
    assert_eq!(count_true(vector.values()), 3);
}

// =============================================================================
// Purity
// =============================================================================

#[test]
fn test_encoding_is_deterministic() -> anyhow::Result<()> {
    let record = engineer_record();
    let first = encode(&record)?;
    for _ in 0..10 {
        assert_eq!(encode(&record)?, first);
    }
    Ok(())
}

#[test]
fn test_key_order_does_not_affect_vector() {
    let record = engineer_record();
    let mut reversed = FeatureRecord::new();
    let entries: Vec<_> = record.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    for (k, v) in entries.into_iter().rev() {
        reversed.insert(k, v);
    }

    assert_eq!(encode(&record).unwrap(), encode(&reversed).unwrap());
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_missing_age_fails_with_missing_field() {
    let mut record = engineer_record();
    record.remove("idade");

    assert_eq!(
        encode(&record).unwrap_err(),
        EncodingError::MissingField("idade".to_string())
    );
}

#[test]
fn test_any_missing_key_fails() {
    let keys: Vec<String> = engineer_record().keys().cloned().collect();
    for key in keys {
        let mut record = engineer_record();
        record.remove(&key);

        match encode(&record) {
            Err(EncodingError::MissingField(field)) => assert_eq!(field, key),
            other => panic!("expected MissingField for {}, got {:?}", key, other),
        }
    }
}

#[test]
fn test_extra_keys_are_ignored() {
    let mut record = engineer_record();
    record.insert("cliente_id", "abc-123");

    assert_eq!(
        encode(&record).unwrap(),
        encode(&engineer_record()).unwrap()
    );
}
