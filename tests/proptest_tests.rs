//! Property-based tests for text limits, amount formatting and the rollup.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "pain")]

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use sepa_pain::core::*;
use sepa_pain::pain::{DocumentBuilder, Message};

const SEQUENCES: [SequenceType; 4] = [
    SequenceType::First,
    SequenceType::Recurring,
    SequenceType::Final,
    SequenceType::OneOff,
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Up to four batches, one per sequence type, each with 1..8 amounts.
fn arb_batches() -> impl Strategy<Value = Vec<Vec<Decimal>>> {
    prop::collection::vec(prop::collection::vec(arb_amount(), 1..8), 1..=4)
}

fn build_message(batches: &[Vec<Decimal>]) -> Message {
    let mut h = GroupHeader::new();
    h.set_message_identification("PROP-MSG")
        .unwrap()
        .set_initiating_party_name("ACME")
        .unwrap();
    h.set_creation_date_time("2024-06-15T10:00:00");

    let mut m = Message::new();
    m.set_group_header(h);
    for (i, amounts) in batches.iter().enumerate() {
        let mut p = PaymentInfo::new(&format!("PMT-{i}"), PaymentMethod::DirectDebit).unwrap();
        p.set_sequence_type(SEQUENCES[i])
            .set_requested_date(date(2024, 7, 1))
            .set_name("ACME GmbH")
            .unwrap()
            .set_iban("DE89370400440532013000")
            .unwrap()
            .set_creditor_scheme_id("DE98ZZZ09999999999")
            .unwrap();
        for (j, amount) in amounts.iter().enumerate() {
            let mut tx = Transaction::new(&format!("E2E-{i}-{j}"), *amount).unwrap();
            tx.set_name("Max Mustermann")
                .unwrap()
                .set_iban("DE02120300000000202051")
                .unwrap()
                .set_mandate("M-1", date(2023, 1, 1))
                .unwrap();
            p.add_transaction(tx);
        }
        m.add_payment_batch(p);
    }
    m
}

proptest! {
    /// Plain strings within the limit are stored unchanged.
    #[test]
    fn bounded_text_accepts_within_limit(s in "[a-zA-Z0-9äöüß .,-]{0,35}") {
        let mut h = GroupHeader::new();
        h.set_message_identification(&s).unwrap();
        prop_assert_eq!(h.message_identification(), s.as_str());
    }

    /// Strings over the limit are rejected and the previous value survives.
    #[test]
    fn bounded_text_rejects_over_limit(s in "[a-zA-Z0-9äöüß]{36,80}") {
        let mut h = GroupHeader::new();
        h.set_message_identification("KEEP").unwrap();
        prop_assert!(h.set_message_identification(&s).is_err());
        prop_assert_eq!(h.message_identification(), "KEEP");
    }

    /// format_amount always yields exactly two fraction digits.
    #[test]
    fn amount_has_two_fraction_digits(mantissa in 0i64..1_000_000_000_000, scale in 0u32..6) {
        let value = Decimal::new(mantissa, scale);
        let s = format_amount(value);
        let (_, frac) = s.split_once('.').unwrap();
        prop_assert_eq!(frac.len(), 2);
        prop_assert!(!s.contains(','));
        let parsed: Decimal = s.parse().unwrap();
        prop_assert!((parsed - value).abs() <= Decimal::new(5, 3));
    }

    /// Group header totals equal the sum over all transactions.
    #[test]
    fn header_totals_equal_transaction_totals(batches in arb_batches()) {
        let mut m = build_message(&batches);
        let xml = m.render(SchemaVariant::Pain008_001_02).unwrap();

        let count: usize = batches.iter().map(Vec::len).sum();
        let total: Decimal = batches.iter().flatten().copied().sum();
        let grp_hdr = &xml[..xml.find("</GrpHdr>").unwrap()];
        let nb_of_txs = format!("<NbOfTxs>{count}</NbOfTxs>");
        let ctrl_sum = format!("<CtrlSum>{}</CtrlSum>", format_amount(total));
        prop_assert!(grp_hdr.contains(&nb_of_txs));
        prop_assert!(grp_hdr.contains(&ctrl_sum));
    }

    /// Rendering twice yields byte-identical documents.
    #[test]
    fn document_render_is_idempotent(batches in arb_batches()) {
        let mut b = DocumentBuilder::new(SchemaVariant::Pain008_001_02);
        b.add_message(build_message(&batches));
        let first = b.render().unwrap().as_str().to_string();
        let second = b.render().unwrap().as_str().to_string();
        prop_assert_eq!(first, second);
    }
}
