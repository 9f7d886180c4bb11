use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sepa_pain::core::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// --- Validation primitives ---

#[test]
fn format_amount_two_fraction_digits() {
    assert_eq!(format_amount(dec!(12)), "12.00");
    assert_eq!(format_amount(dec!(3.5)), "3.50");
    assert_eq!(format_amount(dec!(0.1)), "0.10");
    assert_eq!(format_amount(dec!(1000000)), "1000000.00");
    assert_eq!(format_amount(dec!(2.675)), "2.68");
}

#[test]
fn sum_is_exact() {
    // 0.1 + 0.2 != 0.3 in binary floating point
    assert_eq!(sum(dec!(0.1), dec!(0.2)), dec!(0.3));
}

#[test]
fn bounded_length_uses_decoded_form() {
    let escaped = "\\u00c4".repeat(35);
    assert!(escaped.len() > 35);
    assert!(check_bounded_length(&escaped, 35));
    assert!(!check_bounded_length(&format!("{escaped}X"), 35));
}

#[test]
fn bool_token() {
    assert_eq!(bool_to_token(true), "true");
    assert_eq!(bool_to_token(false), "false");
}

// --- Group header setters ---

#[test]
fn message_identification_limit() {
    let mut h = GroupHeader::new();
    let ok = "A".repeat(35);
    h.set_message_identification(&ok).unwrap();
    assert_eq!(h.message_identification(), ok);

    let err = h.set_message_identification(&"B".repeat(36)).unwrap_err();
    assert_eq!(err.field, "group_header.message_identification");
    assert_eq!(h.message_identification(), ok);
}

#[test]
fn max140_fields() {
    let mut h = GroupHeader::new();
    let long = "ü".repeat(141);
    assert!(h.set_initiating_party_name(&long).is_err());
    assert!(h.set_address_line(&long).is_err());
    assert!(h.set_country(&long).is_err());
    assert_eq!(h.initiating_party_name(), "");
    assert_eq!(h.address_line(), None);
    assert_eq!(h.country(), None);

    let fits = "ü".repeat(140);
    h.set_initiating_party_name(&fits).unwrap();
    assert_eq!(h.initiating_party_name(), fits);
}

#[test]
fn validation_error_converts_to_sepa_error() {
    fn build() -> Result<GroupHeader, SepaError> {
        let mut h = GroupHeader::new();
        h.set_message_identification(&"X".repeat(40))?;
        Ok(h)
    }
    let err = build().unwrap_err();
    assert!(matches!(err, SepaError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "validation failed: group_header.message_identification: must not exceed 35 characters"
    );
}

// --- Schema variants ---

#[test]
fn variant_properties() {
    let dd = SchemaVariant::Pain008_001_02;
    assert!(!dd.is_credit_transfer());
    assert_eq!(dd.payment_method(), PaymentMethod::DirectDebit);
    assert_eq!(dd.to_string(), "pain.008.001.02");
    assert_eq!(SchemaVariant::default(), dd);

    let ct = SchemaVariant::Pain001_001_03;
    assert!(ct.is_credit_transfer());
    assert_eq!(ct.payment_method(), PaymentMethod::CreditTransfer);
    assert!(!ct.emits(GatedField::Grouping));
    assert!(SchemaVariant::Pain001_001_02.emits(GatedField::Grouping));
}

#[test]
fn variant_serde_uses_schema_code() {
    let json = serde_json::to_string(&SchemaVariant::Pain001_001_02).unwrap();
    assert_eq!(json, "\"pain.001.001.02\"");
    let parsed: SchemaVariant = serde_json::from_str("\"pain.008.001.02\"").unwrap();
    assert_eq!(parsed, SchemaVariant::Pain008_001_02);
}

// --- Payment entities ---

#[test]
fn sequence_type_codes() {
    for seq in [
        SequenceType::First,
        SequenceType::Recurring,
        SequenceType::Final,
        SequenceType::OneOff,
    ] {
        assert_eq!(SequenceType::from_code(seq.code()), Some(seq));
    }
    assert_eq!(SequenceType::from_code("XXXX"), None);
    assert_eq!(LocalInstrument::default().code(), "CORE");
    assert_eq!(PaymentMethod::CreditTransfer.code(), "TRF");
}

#[test]
fn transaction_field_limits() {
    let mut tx = Transaction::new("E2E-1", dec!(10)).unwrap();
    assert!(tx.set_name(&"N".repeat(71)).is_err());
    assert!(tx.set_name("").is_err());
    assert!(tx.set_remittance_information(&"R".repeat(141)).is_err());
    tx.set_remittance_information(&"R".repeat(140)).unwrap();
    assert!(tx.set_mandate(&"M".repeat(36), date(2024, 1, 1)).is_err());
    assert_eq!(tx.mandate_id(), None);
    assert!(Transaction::new(&"E".repeat(36), dec!(1)).is_err());
}

#[test]
fn transaction_iban_and_bic_are_normalized() {
    let mut tx = Transaction::new("E2E-1", dec!(10)).unwrap();
    tx.set_iban("de02 1203 0000 0000 2020 51")
        .unwrap()
        .set_bic("byladem1001")
        .unwrap();
    assert_eq!(tx.iban(), "DE02120300000000202051");
    assert_eq!(tx.bic(), Some("BYLADEM1001"));
    let err = tx.set_bic("NOPE").unwrap_err();
    assert_eq!(err.field, "transaction.bic");
}

#[test]
fn transaction_serde_roundtrip() {
    let mut tx = Transaction::new("E2E-1", dec!(19.99)).unwrap();
    tx.set_name("Max Mustermann")
        .unwrap()
        .set_iban("DE02120300000000202051")
        .unwrap()
        .set_mandate("M-1", date(2023, 5, 1))
        .unwrap();
    let json = serde_json::to_string(&tx).unwrap();
    assert!(json.contains("\"19.99\""));
    let back: Transaction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tx);
}

#[test]
fn payment_info_reports_every_problem() {
    let p = PaymentInfo::new("PMT-EMPTY", PaymentMethod::DirectDebit).unwrap();
    let fields: Vec<String> = p.validate().into_iter().map(|e| e.field).collect();
    assert_eq!(
        fields,
        vec![
            "payment_info[PMT-EMPTY].name",
            "payment_info[PMT-EMPTY].iban",
            "payment_info[PMT-EMPTY].requested_date",
            "payment_info[PMT-EMPTY].transactions",
            "payment_info[PMT-EMPTY].sequence_type",
            "payment_info[PMT-EMPTY].creditor_scheme_id",
        ]
    );
    assert!(!p.is_valid());
}

#[test]
fn control_totals_merge() {
    let a = ControlTotals::new(3, dec!(10.00));
    let b = ControlTotals::new(5, dec!(20.00));
    assert_eq!(a.merge(b).unwrap(), ControlTotals::new(8, dec!(30.00)));
    assert_eq!(a.merge(ControlTotals::ZERO).unwrap(), a);
}
