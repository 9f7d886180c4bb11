//! pain.001 / pain.008 XML generation.
//!
//! A [`DocumentBuilder`] owns its [`SchemaVariant`](crate::core::SchemaVariant)
//! and an ordered list of [`Message`]s. Rendering folds the totals of every
//! payment batch into the message's group header and writes:
//!
//! ```text
//! Document
//! └── CstmrDrctDbtInitn | CstmrCdtTrfInitn   (one per message)
//!     ├── GrpHdr
//!     └── PmtInf*                             (insertion order)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sepa_pain::core::*;
//! use sepa_pain::pain::{DocumentBuilder, Message};
//!
//! fn write_transfers(message: Message) -> Result<(), SepaError> {
//!     let mut builder = DocumentBuilder::new(SchemaVariant::Pain001_001_03);
//!     builder.add_message(message);
//!     builder.save("transfers.xml")
//! }
//! ```

mod document;
mod group_header;
mod message;
mod payment_info;
mod xml_utils;

pub use document::{Document, DocumentBuilder, document_skeleton};
pub use group_header::{group_header_xml, write_group_header};
pub use message::{Message, PaymentBatch};
pub use xml_utils::{XmlResult, XmlWriter};
