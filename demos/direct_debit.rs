//! Build a pain.008.001.02 direct debit file with a first and a recurring batch.
//!
//! Run with: `cargo run --example direct_debit`

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sepa_pain::core::*;
use sepa_pain::pain::{DocumentBuilder, Message};

fn collection(
    id: &str,
    sequence: SequenceType,
    debtors: &[(&str, &str, Decimal)],
) -> Result<PaymentInfo, SepaError> {
    let due = NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date");
    let signed = NaiveDate::from_ymd_opt(2023, 11, 20).expect("valid date");

    let mut batch = PaymentInfo::new(id, PaymentMethod::DirectDebit)?;
    batch
        .set_sequence_type(sequence)
        .set_requested_date(due)
        .set_name("Sportverein Musterstadt e.V.")?
        .set_iban("DE89370400440532013000")?
        .set_bic("COBADEFFXXX")?
        .set_creditor_scheme_id("DE98ZZZ09999999999")?;

    for (i, (name, iban, amount)) in debtors.iter().enumerate() {
        let mut tx = Transaction::new(&format!("{id}-{:03}", i + 1), *amount)?;
        tx.set_name(name)?
            .set_iban(iban)?
            .set_mandate(&format!("MANDATE-{id}-{}", i + 1), signed)?
            .set_remittance_information("Mitgliedsbeitrag Juli 2024")?;
        batch.add_transaction(tx);
    }
    Ok(batch)
}

fn main() -> Result<(), SepaError> {
    let mut header = GroupHeader::new();
    header
        .set_message_identification("SVM-2024-07")?
        .set_initiating_party_name("Sportverein Musterstadt e.V.")?
        .set_address_line("Am Sportplatz 1, 12345 Musterstadt")?
        .set_country("DE")?;
    header.set_private_identification("DE98ZZZ09999999999");

    let mut message = Message::new();
    message
        .set_group_header(header)
        .add_payment_batch(collection(
            "FRST-07",
            SequenceType::First,
            &[("Erika Mustermann", "DE02120300000000202051", dec!(30.00))],
        )?)
        .add_payment_batch(collection(
            "RCUR-07",
            SequenceType::Recurring,
            &[
                ("Max Mustermann", "DE02120300000000202051", dec!(30.00)),
                ("Hans Meier", "AT611904300234573201", dec!(15.50)),
            ],
        )?);

    let mut builder = DocumentBuilder::new(SchemaVariant::Pain008_001_02);
    builder.add_message(message);

    let totals = builder.render()?.totals();
    println!("{} transactions, {} EUR", totals.count, totals.formatted_sum());
    println!("{}", builder.emit()?);
    Ok(())
}
