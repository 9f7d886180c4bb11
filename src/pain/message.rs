use tracing::{debug, warn};

use crate::core::*;

use super::group_header::{check_group_header, write_group_header};
use super::xml_utils::XmlWriter;

/// Capabilities a payment batch must offer to be aggregated into a [`Message`].
///
/// [`PaymentInfo`] is the built-in implementation.
pub trait PaymentBatch {
    /// Key under which the batch is stored in its message.
    fn sequence_type(&self) -> &str;

    /// Whether the batch can be emitted.
    fn is_valid(&self) -> bool;

    /// Identification used in error messages (`PmtInfId`).
    fn identification(&self) -> &str;

    /// Reset the batch's own totals and recount them from its transactions.
    fn recompute_totals(&mut self) -> Result<ControlTotals, SepaError>;

    /// Reject a batch that cannot be written under `variant`. Called for
    /// every batch before anything is written.
    fn check_variant(&self, _variant: SchemaVariant) -> Result<(), SepaError> {
        Ok(())
    }

    /// Append the batch's `PmtInf` fragment.
    fn write_xml(&self, w: &mut XmlWriter, variant: SchemaVariant) -> Result<(), SepaError>;
}

/// One payment-initiation message: a group header plus payment batches
/// keyed by sequence type.
///
/// Batches keep their insertion order. Adding a batch under a key that is
/// already present replaces the earlier batch in its position.
///
/// Group header totals are derived on every render from the header's own
/// accumulated values plus the freshly recomputed batch totals, so
/// rendering the same message twice produces the same output.
#[derive(Debug, Clone)]
pub struct Message<P = PaymentInfo> {
    group_header: Option<GroupHeader>,
    batches: Vec<(String, P)>,
}

impl<P> Default for Message<P> {
    fn default() -> Self {
        Self {
            group_header: None,
            batches: Vec::new(),
        }
    }
}

impl Message {
    /// A message holding [`PaymentInfo`] batches. Use [`Message::default`]
    /// for other [`PaymentBatch`] types.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: PaymentBatch> Message<P> {
    /// Assign the group header. Only the first assignment takes effect.
    pub fn set_group_header(&mut self, header: GroupHeader) -> &mut Self {
        if self.group_header.is_some() {
            debug!(
                ignored = header.message_identification(),
                "group header already set, keeping the first one"
            );
        } else {
            self.group_header = Some(header);
        }
        self
    }

    pub fn group_header(&self) -> Option<&GroupHeader> {
        self.group_header.as_ref()
    }

    /// Store `batch` under its sequence type, replacing any batch already
    /// stored under that key. The batch's totals are recounted on insertion;
    /// totals out of range are reported again by [`write_xml`](Self::write_xml).
    pub fn add_payment_batch(&mut self, mut batch: P) -> &mut Self {
        if let Err(e) = batch.recompute_totals() {
            warn!(
                batch = batch.identification(),
                error = %e,
                "payment batch totals out of range"
            );
        }
        let key = batch.sequence_type().to_string();
        match self.batches.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => {
                warn!(
                    sequence_type = %key,
                    replaced = slot.1.identification(),
                    by = batch.identification(),
                    "payment batch replaced"
                );
                slot.1 = batch;
            }
            None => self.batches.push((key, batch)),
        }
        self
    }

    /// Batches in insertion order.
    pub fn payment_batches(&self) -> impl Iterator<Item = &P> {
        self.batches.iter().map(|(_, b)| b)
    }

    pub fn payment_batch(&self, sequence_type: &str) -> Option<&P> {
        self.batches
            .iter()
            .find(|(k, _)| k == sequence_type)
            .map(|(_, b)| b)
    }

    pub fn payment_batch_mut(&mut self, sequence_type: &str) -> Option<&mut P> {
        self.batches
            .iter_mut()
            .find(|(k, _)| k == sequence_type)
            .map(|(_, b)| b)
    }

    pub fn remove_payment_batch(&mut self, sequence_type: &str) -> Option<P> {
        let pos = self.batches.iter().position(|(k, _)| k == sequence_type)?;
        Some(self.batches.remove(pos).1)
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Write the message subtree (`CstmrDrctDbtInitn` / `CstmrCdtTrfInitn`)
    /// and return the totals written into its group header.
    ///
    /// Every check (header present with a `MsgId`, batches valid and
    /// supported by `variant`, totals in range) runs before the first
    /// element is written, so `w` is untouched on error.
    pub fn write_xml(
        &mut self,
        w: &mut XmlWriter,
        variant: SchemaVariant,
    ) -> Result<ControlTotals, SepaError> {
        let header = self
            .group_header
            .as_ref()
            .ok_or_else(|| SepaError::Builder("message has no group header".into()))?;

        check_group_header(header)?;

        if let Some((_, invalid)) = self.batches.iter().find(|(_, b)| !b.is_valid()) {
            return Err(SepaError::InvalidPaymentInfo(
                invalid.identification().to_string(),
            ));
        }
        for (_, batch) in &self.batches {
            batch.check_variant(variant)?;
        }

        let mut totals = header.totals();
        for (_, batch) in &mut self.batches {
            totals = totals.merge(batch.recompute_totals()?)?;
        }

        w.start_element(variant.message_root())?;
        write_group_header(w, header, variant, totals)?;
        for (_, batch) in &self.batches {
            batch.write_xml(w, variant)?;
        }
        w.end_element(variant.message_root())?;

        debug!(
            %variant,
            message_id = header.message_identification(),
            batches = self.batches.len(),
            transactions = totals.count,
            control_sum = %totals.formatted_sum(),
            "message rendered"
        );
        Ok(totals)
    }

    /// Render the message subtree as a standalone fragment.
    pub fn render(&mut self, variant: SchemaVariant) -> Result<String, SepaError> {
        let mut w = XmlWriter::fragment();
        self.write_xml(&mut w, variant)?;
        w.into_string()
    }
}
