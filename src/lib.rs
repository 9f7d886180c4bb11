//! # sepa-pain
//!
//! Assembles SEPA payment-initiation documents (ISO 20022 pain.001 credit
//! transfers and pain.008 direct debits) from an in-memory model, validating
//! field constraints before anything is emitted.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use sepa_pain::core::*;
//! use sepa_pain::pain::{DocumentBuilder, Message};
//!
//! let mut header = GroupHeader::new();
//! header.set_message_identification("MSG-1")?.set_initiating_party_name("ACME")?;
//!
//! let mut tx = Transaction::new("INV-2024-17", dec!(1250.00))?;
//! tx.set_name("Supplier AG")?.set_iban("DE02120300000000202051")?;
//!
//! let mut batch = PaymentInfo::new("PMT-1", PaymentMethod::CreditTransfer)?;
//! batch
//!     .set_requested_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
//!     .set_name("ACME GmbH")?
//!     .set_iban("DE89370400440532013000")?;
//! batch.add_transaction(tx);
//!
//! let mut message = Message::new();
//! message.set_group_header(header).add_payment_batch(batch);
//!
//! let mut builder = DocumentBuilder::new(SchemaVariant::Pain001_001_03);
//! builder.add_message(message);
//! let doc = builder.render()?;
//! assert_eq!(doc.totals().count, 1);
//! assert!(doc.as_str().contains("<CstmrCdtTrfInitn>"));
//! # Ok::<(), SepaError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Validation primitives, group header, payment batches, IBAN/BIC |
//! | `pain` (default) | pain.001 / pain.008 XML generation, save and emit |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "pain")]
pub mod pain;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
