//! Build a pain.001.001.03 credit transfer and save it to disk.
//!
//! Run with: `cargo run --example credit_transfer`

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sepa_pain::core::*;
use sepa_pain::pain::{DocumentBuilder, Message};

fn main() -> Result<(), SepaError> {
    let mut header = GroupHeader::new();
    header
        .set_message_identification("ACME-PAY-0042")?
        .set_initiating_party_name("ACME GmbH")?;
    header.set_organisation_identification("DE123456789").set_issuer("USt-IdNr");

    let mut batch = PaymentInfo::new("ACME-PAY-0042-1", PaymentMethod::CreditTransfer)?;
    batch
        .set_requested_date(NaiveDate::from_ymd_opt(2024, 7, 5).expect("valid date"))
        .set_name("ACME GmbH")?
        .set_iban("DE89370400440532013000")?;

    for (e2e, name, iban, amount, reference) in [
        (
            "RE-2024-101",
            "Kunde AG",
            "DE02120300000000202051",
            dec!(1785.00),
            "RE-2024-101",
        ),
        (
            "RE-2024-102",
            "Fournisseur SARL",
            "FR1420041010050500013M02606",
            dec!(249.90),
            "Facture 102",
        ),
    ] {
        let mut tx = Transaction::new(e2e, amount)?;
        tx.set_name(name)?
            .set_iban(iban)?
            .set_remittance_information(reference)?;
        batch.add_transaction(tx);
    }

    let mut message = Message::new();
    message.set_group_header(header).add_payment_batch(batch);

    let mut builder = DocumentBuilder::new(SchemaVariant::Pain001_001_03);
    builder.add_message(message);

    let path = std::env::temp_dir().join("acme-credit-transfer.xml");
    builder.save(&path)?;
    println!("written to {}", path.display());
    Ok(())
}
