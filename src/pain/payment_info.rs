use crate::core::*;

use super::message::PaymentBatch;
use super::xml_utils::XmlWriter;

/// BIC placeholder when the agent is unknown (IBAN-only payments).
const NOT_PROVIDED: &str = "NOTPROVIDED";

impl PaymentBatch for PaymentInfo {
    /// The `SeqTp` code, or the payment method code for batches without one.
    fn sequence_type(&self) -> &str {
        match PaymentInfo::sequence_type(self) {
            Some(seq) => seq.code(),
            None => self.method().code(),
        }
    }

    fn is_valid(&self) -> bool {
        PaymentInfo::is_valid(self)
    }

    fn identification(&self) -> &str {
        PaymentInfo::identification(self)
    }

    fn recompute_totals(&mut self) -> Result<ControlTotals, SepaError> {
        Ok(PaymentInfo::recompute_totals(self)?)
    }

    fn check_variant(&self, variant: SchemaVariant) -> Result<(), SepaError> {
        if self.method() != variant.payment_method() {
            return Err(SepaError::Builder(format!(
                "payment info {} uses {} which {variant} does not support",
                PaymentInfo::identification(self),
                self.method().code()
            )));
        }
        Ok(())
    }

    fn write_xml(&self, w: &mut XmlWriter, variant: SchemaVariant) -> Result<(), SepaError> {
        self.check_variant(variant)?;
        let requested_date = self.requested_date().ok_or_else(|| {
            SepaError::InvalidPaymentInfo(PaymentInfo::identification(self).to_string())
        })?;
        let totals = self.totals();

        w.start_element("PmtInf")?;
        w.text_element("PmtInfId", PaymentInfo::identification(self))?;
        w.text_element("PmtMtd", self.method().code())?;
        if let Some(batch_booking) = self.batch_booking() {
            w.text_element("BtchBookg", bool_to_token(batch_booking))?;
        }
        w.text_element("NbOfTxs", &totals.count.to_string())?;
        w.text_element("CtrlSum", &totals.formatted_sum())?;

        w.start_element("PmtTpInf")?;
        w.nested_text_element("SvcLvl", "Cd", SERVICE_LEVEL_SEPA)?;
        match self.method() {
            PaymentMethod::DirectDebit => {
                w.nested_text_element("LclInstrm", "Cd", self.local_instrument().code())?;
                if let Some(seq) = PaymentInfo::sequence_type(self) {
                    w.text_element("SeqTp", seq.code())?;
                }
                w.end_element("PmtTpInf")?;
                w.date_element("ReqdColltnDt", requested_date)?;
                write_party(w, "Cdtr", self.name())?;
                write_account(w, "CdtrAcct", self.iban())?;
                write_agent(w, "CdtrAgt", self.bic())?;
                w.text_element("ChrgBr", CHARGE_BEARER_SLEV)?;
                if let Some(scheme_id) = self.creditor_scheme_id() {
                    write_creditor_scheme_id(w, scheme_id)?;
                }
                for tx in self.transactions() {
                    write_direct_debit_transaction(w, tx)?;
                }
            }
            PaymentMethod::CreditTransfer => {
                w.end_element("PmtTpInf")?;
                w.date_element("ReqdExctnDt", requested_date)?;
                write_party(w, "Dbtr", self.name())?;
                write_account(w, "DbtrAcct", self.iban())?;
                write_agent(w, "DbtrAgt", self.bic())?;
                w.text_element("ChrgBr", CHARGE_BEARER_SLEV)?;
                for tx in self.transactions() {
                    write_credit_transfer_transaction(w, tx)?;
                }
            }
        }
        w.end_element("PmtInf")?;
        Ok(())
    }
}

fn write_party(w: &mut XmlWriter, element: &str, name: &str) -> Result<(), SepaError> {
    w.nested_text_element(element, "Nm", name)?;
    Ok(())
}

fn write_account(w: &mut XmlWriter, element: &str, iban: &str) -> Result<(), SepaError> {
    w.start_element(element)?;
    w.nested_text_element("Id", "IBAN", iban)?;
    w.end_element(element)?;
    Ok(())
}

fn write_agent(w: &mut XmlWriter, element: &str, bic: Option<&str>) -> Result<(), SepaError> {
    w.start_element(element)?;
    w.start_element("FinInstnId")?;
    match bic {
        Some(bic) => {
            w.text_element("BIC", bic)?;
        }
        None => {
            w.nested_text_element("Othr", "Id", NOT_PROVIDED)?;
        }
    }
    w.end_element("FinInstnId")?;
    w.end_element(element)?;
    Ok(())
}

fn write_creditor_scheme_id(w: &mut XmlWriter, scheme_id: &str) -> Result<(), SepaError> {
    w.start_element("CdtrSchmeId")?;
    w.start_element("Id")?;
    w.start_element("PrvtId")?;
    w.start_element("Othr")?;
    w.text_element("Id", scheme_id)?;
    w.nested_text_element("SchmeNm", "Prtry", SERVICE_LEVEL_SEPA)?;
    w.end_element("Othr")?;
    w.end_element("PrvtId")?;
    w.end_element("Id")?;
    w.end_element("CdtrSchmeId")?;
    Ok(())
}

fn write_remittance(w: &mut XmlWriter, tx: &Transaction) -> Result<(), SepaError> {
    if let Some(text) = tx.remittance_information() {
        w.nested_text_element("RmtInf", "Ustrd", text)?;
    }
    Ok(())
}

fn write_direct_debit_transaction(w: &mut XmlWriter, tx: &Transaction) -> Result<(), SepaError> {
    w.start_element("DrctDbtTxInf")?;
    w.nested_text_element("PmtId", "EndToEndId", tx.end_to_end_id())?;
    w.amount_element("InstdAmt", tx.amount(), CURRENCY_EUR)?;
    if let (Some(mandate_id), Some(signed_on)) = (tx.mandate_id(), tx.mandate_signature_date()) {
        w.start_element("DrctDbtTx")?;
        w.start_element("MndtRltdInf")?;
        w.text_element("MndtId", mandate_id)?;
        w.date_element("DtOfSgntr", signed_on)?;
        w.end_element("MndtRltdInf")?;
        w.end_element("DrctDbtTx")?;
    }
    write_agent(w, "DbtrAgt", tx.bic())?;
    write_party(w, "Dbtr", tx.name())?;
    write_account(w, "DbtrAcct", tx.iban())?;
    write_remittance(w, tx)?;
    w.end_element("DrctDbtTxInf")?;
    Ok(())
}

fn write_credit_transfer_transaction(
    w: &mut XmlWriter,
    tx: &Transaction,
) -> Result<(), SepaError> {
    w.start_element("CdtTrfTxInf")?;
    w.nested_text_element("PmtId", "EndToEndId", tx.end_to_end_id())?;
    w.start_element("Amt")?;
    w.amount_element("InstdAmt", tx.amount(), CURRENCY_EUR)?;
    w.end_element("Amt")?;
    if let Some(bic) = tx.bic() {
        w.start_element("CdtrAgt")?;
        w.nested_text_element("FinInstnId", "BIC", bic)?;
        w.end_element("CdtrAgt")?;
    }
    write_party(w, "Cdtr", tx.name())?;
    write_account(w, "CdtrAcct", tx.iban())?;
    write_remittance(w, tx)?;
    w.end_element("CdtTrfTxInf")?;
    Ok(())
}
