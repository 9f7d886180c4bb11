use std::fmt;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::core::*;

use super::message::{Message, PaymentBatch};
use super::xml_utils::XmlWriter;

/// A rendered pain document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    variant: SchemaVariant,
    totals: ControlTotals,
    xml: String,
}

impl Document {
    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// Totals across all messages of the document.
    pub fn totals(&self) -> ControlTotals {
        self.totals
    }

    pub fn as_str(&self) -> &str {
        &self.xml
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.xml.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.xml
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xml)
    }
}

/// `Document` root attributes for `variant`.
fn root_attributes(variant: SchemaVariant) -> [(&'static str, String); 3] {
    [
        ("xmlns", variant.namespace()),
        ("xmlns:xsi", XSI_NAMESPACE.to_string()),
        ("xsi:schemaLocation", variant.schema_location()),
    ]
}

/// The empty document for `variant`: declaration plus an empty `Document` root.
pub fn document_skeleton(variant: SchemaVariant) -> String {
    let attrs = root_attributes(variant)
        .iter()
        .map(|(k, v)| format!(" {k}=\"{v}\""))
        .collect::<String>();
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Document{attrs}>\n</Document>")
}

/// Assembles messages into a pain document for one schema variant.
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use sepa_pain::core::*;
/// use sepa_pain::pain::{DocumentBuilder, Message};
///
/// let mut header = GroupHeader::new();
/// header.set_message_identification("MSG-1")?.set_initiating_party_name("ACME")?;
///
/// let mut tx = Transaction::new("E2E-1", dec!(45.00))?;
/// tx.set_name("Max Mustermann")?
///     .set_iban("DE02120300000000202051")?
///     .set_mandate("M-1", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())?;
///
/// let mut batch = PaymentInfo::new("PMT-1", PaymentMethod::DirectDebit)?;
/// batch
///     .set_sequence_type(SequenceType::Recurring)
///     .set_requested_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
///     .set_name("ACME GmbH")?
///     .set_iban("DE89370400440532013000")?
///     .set_creditor_scheme_id("DE98ZZZ09999999999")?;
/// batch.add_transaction(tx);
///
/// let mut message = Message::new();
/// message.set_group_header(header).add_payment_batch(batch);
///
/// let mut builder = DocumentBuilder::new(SchemaVariant::Pain008_001_02);
/// builder.add_message(message);
/// let xml = builder.emit()?;
/// assert!(xml.contains("<CtrlSum>45.00</CtrlSum>"));
/// # Ok::<(), SepaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder<P = PaymentInfo> {
    variant: SchemaVariant,
    skeleton: String,
    messages: Vec<Message<P>>,
    rendered: Option<Document>,
}

impl DocumentBuilder {
    /// A builder for [`PaymentInfo`] batches.
    pub fn new(variant: SchemaVariant) -> Self {
        Self::with_variant(variant)
    }
}

impl<P: PaymentBatch> DocumentBuilder<P> {
    /// A builder for any [`PaymentBatch`] type.
    pub fn with_variant(variant: SchemaVariant) -> Self {
        Self {
            variant,
            skeleton: document_skeleton(variant),
            messages: Vec::new(),
            rendered: None,
        }
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// The empty document this builder fills.
    pub fn skeleton(&self) -> &str {
        &self.skeleton
    }

    /// Append a message. Not validated until render.
    pub fn add_message(&mut self, message: Message<P>) -> &mut Self {
        self.messages.push(message);
        self.rendered = None;
        self
    }

    pub fn messages(&self) -> &[Message<P>] {
        &self.messages
    }

    /// Mutable access to the messages; drops any cached render.
    pub fn messages_mut(&mut self) -> &mut [Message<P>] {
        self.rendered = None;
        &mut self.messages
    }

    /// Render every message into a fresh document and cache it.
    ///
    /// Either the whole document renders or an error is returned; the
    /// previous cached render is dropped on failure.
    pub fn render(&mut self) -> Result<&Document, SepaError> {
        self.rendered = None;
        debug!(
            variant = %self.variant,
            messages = self.messages.len(),
            "rendering document"
        );

        let mut w = XmlWriter::new()?;
        let attrs = root_attributes(self.variant);
        let attr_refs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        w.start_element_with_attrs("Document", &attr_refs)?;
        let mut totals = ControlTotals::ZERO;
        for message in &mut self.messages {
            totals = totals.merge(message.write_xml(&mut w, self.variant)?)?;
        }
        w.end_element("Document")?;

        let document = Document {
            variant: self.variant,
            totals,
            xml: w.into_string()?,
        };
        Ok(self.rendered.insert(document))
    }

    /// The cached document, rendering it first if needed.
    pub fn document(&mut self) -> Result<&Document, SepaError> {
        if self.rendered.is_none() {
            self.render()?;
        }
        self.rendered
            .as_ref()
            .ok_or_else(|| SepaError::Builder("document was not rendered".into()))
    }

    /// Serialized XML.
    pub fn emit(&mut self) -> Result<String, SepaError> {
        Ok(self.document()?.as_str().to_string())
    }

    pub fn to_bytes(&mut self) -> Result<Vec<u8>, SepaError> {
        Ok(self.document()?.as_bytes().to_vec())
    }

    /// Stream the serialized XML into `out` (a file, an HTTP body, ...).
    pub fn write_to<W: Write>(&mut self, mut out: W) -> Result<(), SepaError> {
        out.write_all(self.document()?.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Write the serialized XML to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), SepaError> {
        let path = path.as_ref();
        let bytes = self.document()?.as_bytes();
        std::fs::write(path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "document saved");
        Ok(())
    }
}
