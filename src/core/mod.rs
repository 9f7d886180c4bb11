//! Core SEPA document model: validation primitives, schema variants,
//! group header, payment batches and transactions.
//!
//! Nothing in here depends on XML; rendering lives in [`crate::pain`].

mod amount;
mod error;
mod group_header;
mod iban;
mod payment;
mod text;
mod variant;

pub use amount::*;
pub use error::*;
pub use group_header::*;
pub use iban::*;
pub use payment::*;
pub use text::*;
pub use variant::*;
