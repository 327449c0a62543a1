//! Vector layout
//!
//! The tables in this file define the column order of the encoded vector and
//! are a contract with the model artifact. Any change here requires a model
//! retrained on the new layout.
//!
//! Domains are ordered slices, never sets: iteration order is the emitted order.

/// Semantic type a numeric field is cast to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Float,
    Int,
}

impl NumericKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericKind::Float => "float",
            NumericKind::Int => "int",
        }
    }
}

/// A numeric column
#[derive(Debug, Clone, Copy)]
pub struct NumericField {
    /// Wire key
    pub key: &'static str,
    pub kind: NumericKind,
}

/// A categorical field expanded into a one-hot block
#[derive(Debug, Clone, Copy)]
pub struct CategoricalField {
    /// Wire key
    pub key: &'static str,
    /// Emitted categories, in vector order
    pub domain: &'static [&'static str],
    /// Category represented by an all-false block
    pub reference: &'static str,
}

const fn float(key: &'static str) -> NumericField {
    NumericField {
        key,
        kind: NumericKind::Float,
    }
}

const fn int(key: &'static str) -> NumericField {
    NumericField {
        key,
        kind: NumericKind::Int,
    }
}

/// Numeric columns, in vector order
pub const NUMERIC_FIELDS: [NumericField; 17] = [
    float("idade"),                         // age
    float("renda_anual"),                   // annual income
    float("salario_liquido_mensal"),        // net monthly salary
    float("qtd_contas_bancarias"),          // bank accounts
    int("qtd_cartoes_credito"),             // credit cards
    float("taxa_juros"),                    // interest rate
    float("qtd_emprestimos"),               // loans
    int("dias_atraso_pagamento"),           // payment delay (days)
    float("qtd_pagamentos_atrasados"),      // delayed payments
    float("variacao_limite_credito"),       // credit limit change
    float("qtd_consultas_credito"),         // credit inquiries
    float("divida_pendente"),               // outstanding debt
    float("percentual_utilizacao_credito"), // credit utilization (%)
    float("total_emprestimos_mensal"),      // monthly installments
    float("valor_investido_mensal"),        // monthly investment
    float("saldo_mensal"),                  // monthly balance
    int("tempo_historico_credito_meses"),   // credit history (months)
];

pub const OCCUPATION_DOMAIN: [&str; 15] = [
    "Architect",
    "Developer",
    "Doctor",
    "Engineer",
    "Entrepreneur",
    "Journalist",
    "Lawyer",
    "Manager",
    "Mechanic",
    "Media_Manager",
    "Musician",
    "Not Informed",
    "Scientist",
    "Teacher",
    "Writer",
];

pub const MINIMUM_PAYMENT_DOMAIN: [&str; 2] = ["Not Informed", "Yes"];

pub const PAYMENT_BEHAVIOR_DOMAIN: [&str; 5] = [
    "High_spent_Medium_value_payments",
    "High_spent_Small_value_payments",
    "Low_spent_Large_value_payments",
    "Low_spent_Medium_value_payments",
    "Low_spent_Small_value_payments",
];

pub const LOAN_TYPES_DOMAIN: [&str; 9] = [
    "Credit-Builder Loan",
    "Debt Consolidation Loan",
    "Home Equity Loan",
    "Mortgage Loan",
    "Not Specified",
    "Payday Loan",
    "Personal Loan",
    "Student Loan",
    "Two or More Types of Loan",
];

/// Categorical fields, in vector order
pub const CATEGORICAL_FIELDS: [CategoricalField; 4] = [
    CategoricalField {
        key: "ocupacao",
        domain: &OCCUPATION_DOMAIN,
        reference: "Accountant",
    },
    CategoricalField {
        key: "pagamento_valor_minimo",
        domain: &MINIMUM_PAYMENT_DOMAIN,
        reference: "No",
    },
    CategoricalField {
        key: "comportamento_pagamento",
        domain: &PAYMENT_BEHAVIOR_DOMAIN,
        reference: "High_spent_Large_value_payments",
    },
    CategoricalField {
        key: "tipos_emprestimos",
        domain: &LOAN_TYPES_DOMAIN,
        reference: "Auto Loan",
    },
];

/// Total vector width: 17 numeric + 15 + 2 + 5 + 9 one-hot columns
pub const VECTOR_LEN: usize = NUMERIC_FIELDS.len()
    + OCCUPATION_DOMAIN.len()
    + MINIMUM_PAYMENT_DOMAIN.len()
    + PAYMENT_BEHAVIOR_DOMAIN.len()
    + LOAN_TYPES_DOMAIN.len();

/// Column names of the encoded vector, in order.
///
/// Numeric columns use the wire key; one-hot columns use `<key>_<category>`.
pub fn feature_names() -> Vec<String> {
    let mut names = Vec::with_capacity(VECTOR_LEN);
    names.extend(NUMERIC_FIELDS.iter().map(|f| f.key.to_string()));
    for field in &CATEGORICAL_FIELDS {
        names.extend(field.domain.iter().map(|c| format!("{}_{}", field.key, c)));
    }
    names
}

/// All wire keys a record must carry
pub fn required_keys() -> impl Iterator<Item = &'static str> {
    NUMERIC_FIELDS
        .iter()
        .map(|f| f.key)
        .chain(CATEGORICAL_FIELDS.iter().map(|f| f.key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vector_len() {
        assert_eq!(VECTOR_LEN, 48);
        assert_eq!(feature_names().len(), VECTOR_LEN);
    }

    #[test]
    fn test_feature_names_are_unique() {
        let names = feature_names();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_feature_names_order() {
        let names = feature_names();
        assert_eq!(names[0], "idade");
        assert_eq!(names[16], "tempo_historico_credito_meses");
        assert_eq!(names[17], "ocupacao_Architect");
        assert_eq!(names[31], "ocupacao_Writer");
        assert_eq!(names[32], "pagamento_valor_minimo_Not Informed");
        assert_eq!(names[34], "comportamento_pagamento_High_spent_Medium_value_payments");
        assert_eq!(names[39], "tipos_emprestimos_Credit-Builder Loan");
        assert_eq!(names[47], "tipos_emprestimos_Two or More Types of Loan");
    }

    #[test]
    fn test_reference_categories_not_in_domain() {
        for field in &CATEGORICAL_FIELDS {
            assert!(
                !field.domain.contains(&field.reference),
                "reference category of {} must be dropped from its block",
                field.key
            );
        }
    }

    #[test]
    fn test_int_fields() {
        let ints: Vec<&str> = NUMERIC_FIELDS
            .iter()
            .filter(|f| f.kind == NumericKind::Int)
            .map(|f| f.key)
            .collect();
        assert_eq!(
            ints,
            vec![
                "qtd_cartoes_credito",
                "dias_atraso_pagamento",
                "tempo_historico_credito_meses"
            ]
        );
    }

    #[test]
    fn test_required_keys() {
        assert_eq!(required_keys().count(), 21);
    }
}
