use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use crate::core::{SepaError, format_amount};

pub type XmlResult = Result<String, SepaError>;

fn xml_io(e: std::io::Error) -> SepaError {
    SepaError::Xml(format!("write error: {e}"))
}

/// Indenting XML writer shared by every element renderer.
///
/// [`PaymentBatch`](super::PaymentBatch) implementations receive it to
/// append their `PmtInf` fragment in place.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    /// A writer that starts with the `<?xml ...?>` declaration.
    pub fn new() -> Result<Self, SepaError> {
        let mut w = Self::fragment();
        w.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(w)
    }

    /// A writer for a bare fragment, without declaration.
    pub fn fragment() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    pub fn into_string(self) -> XmlResult {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| SepaError::Xml(format!("UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, SepaError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, SepaError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, SepaError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, SepaError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, SepaError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write a two-decimal amount with a `Ccy` attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, SepaError> {
        self.text_element_with_attrs(name, &format_amount(amount), &[("Ccy", currency)])
    }

    /// Write an ISO date (`YYYY-MM-DD`).
    pub fn date_element(&mut self, name: &str, date: NaiveDate) -> Result<&mut Self, SepaError> {
        self.text_element(name, &date.format("%Y-%m-%d").to_string())
    }

    /// Write `<outer><inner>text</inner></outer>`.
    pub fn nested_text_element(
        &mut self,
        outer: &str,
        inner: &str,
        text: &str,
    ) -> Result<&mut Self, SepaError> {
        self.start_element(outer)?;
        self.text_element(inner, text)?;
        self.end_element(outer)
    }
}
