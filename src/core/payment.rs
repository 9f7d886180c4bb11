use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount::{ControlTotals, MAX_TRANSACTION_AMOUNT};
use super::error::ValidationError;
use super::iban::{validate_bic, validate_iban};
use super::text::{MAX_ID_LENGTH, MAX_NAME_LENGTH, MAX_TEXT_LENGTH, bounded_text, required_text};

/// SEPA is Euro-only.
pub const CURRENCY_EUR: &str = "EUR";

/// `ChrgBr` for SEPA schemes: charges shared per service level.
pub const CHARGE_BEARER_SLEV: &str = "SLEV";

/// `SvcLvl/Cd` for SEPA schemes.
pub const SERVICE_LEVEL_SEPA: &str = "SEPA";

/// `PmtMtd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// DD: direct debit (pain.008).
    DirectDebit,
    /// TRF: credit transfer (pain.001).
    CreditTransfer,
}

impl PaymentMethod {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DirectDebit => "DD",
            Self::CreditTransfer => "TRF",
        }
    }
}

/// `SeqTp` of a direct debit batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceType {
    /// FRST: first collection of a recurring mandate.
    First,
    /// RCUR: follow-up collection.
    Recurring,
    /// FNAL: last collection.
    Final,
    /// OOFF: one-off collection.
    OneOff,
}

impl SequenceType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::First => "FRST",
            Self::Recurring => "RCUR",
            Self::Final => "FNAL",
            Self::OneOff => "OOFF",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FRST" => Some(Self::First),
            "RCUR" => Some(Self::Recurring),
            "FNAL" => Some(Self::Final),
            "OOFF" => Some(Self::OneOff),
            _ => None,
        }
    }
}

/// `LclInstrm/Cd` of a direct debit batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalInstrument {
    /// CORE: consumer scheme.
    #[default]
    Core,
    /// B2B: business-to-business scheme.
    B2b,
}

impl LocalInstrument {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Core => "CORE",
            Self::B2b => "B2B",
        }
    }
}

/// A single payment: one debtor (direct debit) or creditor (credit transfer).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    end_to_end_id: String,
    amount: Decimal,
    name: String,
    iban: String,
    bic: Option<String>,
    mandate_id: Option<String>,
    mandate_signature_date: Option<NaiveDate>,
    remittance_information: Option<String>,
}

impl Transaction {
    /// A transaction with end-to-end id and instructed amount.
    pub fn new(end_to_end_id: &str, amount: Decimal) -> Result<Self, ValidationError> {
        let mut tx = Self::default();
        tx.set_end_to_end_id(end_to_end_id)?;
        tx.set_amount(amount)?;
        Ok(tx)
    }

    pub fn set_end_to_end_id(&mut self, id: &str) -> Result<&mut Self, ValidationError> {
        self.end_to_end_id = required_text("transaction.end_to_end_id", id, MAX_ID_LENGTH)?;
        Ok(self)
    }

    pub fn end_to_end_id(&self) -> &str {
        &self.end_to_end_id
    }

    /// Instructed amount in EUR: positive, at most two decimals, at most
    /// [`MAX_TRANSACTION_AMOUNT`].
    pub fn set_amount(&mut self, amount: Decimal) -> Result<&mut Self, ValidationError> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::new("transaction.amount", "must be positive"));
        }
        if amount > MAX_TRANSACTION_AMOUNT {
            return Err(ValidationError::new(
                "transaction.amount",
                format!("must not exceed {MAX_TRANSACTION_AMOUNT}"),
            ));
        }
        if amount.normalize().scale() > 2 {
            return Err(ValidationError::new(
                "transaction.amount",
                "must not have more than two decimal places",
            ));
        }
        self.amount = amount;
        Ok(self)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Debtor (direct debit) or creditor (credit transfer) name, Max70Text.
    pub fn set_name(&mut self, name: &str) -> Result<&mut Self, ValidationError> {
        self.name = required_text("transaction.name", name, MAX_NAME_LENGTH)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_iban(&mut self, iban: &str) -> Result<&mut Self, ValidationError> {
        self.iban = validate_iban(iban).map_err(|e| prefixed("transaction", e))?;
        Ok(self)
    }

    pub fn iban(&self) -> &str {
        &self.iban
    }

    pub fn set_bic(&mut self, bic: &str) -> Result<&mut Self, ValidationError> {
        self.bic = Some(validate_bic(bic).map_err(|e| prefixed("transaction", e))?);
        Ok(self)
    }

    pub fn bic(&self) -> Option<&str> {
        self.bic.as_deref()
    }

    /// Direct debit mandate reference and date of signature.
    pub fn set_mandate(
        &mut self,
        mandate_id: &str,
        signed_on: NaiveDate,
    ) -> Result<&mut Self, ValidationError> {
        self.mandate_id = Some(required_text(
            "transaction.mandate_id",
            mandate_id,
            MAX_ID_LENGTH,
        )?);
        self.mandate_signature_date = Some(signed_on);
        Ok(self)
    }

    pub fn mandate_id(&self) -> Option<&str> {
        self.mandate_id.as_deref()
    }

    pub fn mandate_signature_date(&self) -> Option<NaiveDate> {
        self.mandate_signature_date
    }

    /// Unstructured remittance information (`RmtInf/Ustrd`), Max140Text.
    pub fn set_remittance_information(&mut self, text: &str) -> Result<&mut Self, ValidationError> {
        self.remittance_information = Some(bounded_text(
            "transaction.remittance_information",
            text,
            MAX_TEXT_LENGTH,
        )?);
        Ok(self)
    }

    pub fn remittance_information(&self) -> Option<&str> {
        self.remittance_information.as_deref()
    }

    /// Problems preventing this transaction from being emitted under `method`.
    pub fn validate(&self, method: PaymentMethod) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let path = |field: &str| format!("transaction[{}].{field}", self.end_to_end_id);

        if self.end_to_end_id.is_empty() {
            errors.push(ValidationError::required("transaction.end_to_end_id"));
        }
        if self.amount <= Decimal::ZERO {
            errors.push(ValidationError::new(path("amount"), "must be positive"));
        } else if self.amount > MAX_TRANSACTION_AMOUNT {
            errors.push(ValidationError::new(
                path("amount"),
                format!("must not exceed {MAX_TRANSACTION_AMOUNT}"),
            ));
        }
        if self.name.is_empty() {
            errors.push(ValidationError::required(path("name")));
        }
        if validate_iban(&self.iban).is_err() {
            errors.push(ValidationError::new(path("iban"), "missing or invalid IBAN"));
        }
        if method == PaymentMethod::DirectDebit
            && (self.mandate_id.is_none() || self.mandate_signature_date.is_none())
        {
            errors.push(ValidationError::new(
                path("mandate_id"),
                "direct debit requires a mandate reference and signature date",
            ));
        }
        errors
    }
}

/// A payment batch (`PmtInf`): transactions sharing account, date and
/// sequence type.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInfo {
    identification: String,
    method: PaymentMethod,
    sequence_type: Option<SequenceType>,
    local_instrument: LocalInstrument,
    requested_date: Option<NaiveDate>,
    name: String,
    iban: String,
    bic: Option<String>,
    creditor_scheme_id: Option<String>,
    batch_booking: Option<bool>,
    transactions: Vec<Transaction>,
    totals: ControlTotals,
}

impl PaymentInfo {
    /// A batch with its `PmtInfId` and payment method.
    pub fn new(identification: &str, method: PaymentMethod) -> Result<Self, ValidationError> {
        Ok(Self {
            identification: required_text(
                "payment_info.identification",
                identification,
                MAX_ID_LENGTH,
            )?,
            method,
            sequence_type: None,
            local_instrument: LocalInstrument::default(),
            requested_date: None,
            name: String::new(),
            iban: String::new(),
            bic: None,
            creditor_scheme_id: None,
            batch_booking: None,
            transactions: Vec::new(),
            totals: ControlTotals::ZERO,
        })
    }

    pub fn identification(&self) -> &str {
        &self.identification
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn set_sequence_type(&mut self, sequence_type: SequenceType) -> &mut Self {
        self.sequence_type = Some(sequence_type);
        self
    }

    pub fn sequence_type(&self) -> Option<SequenceType> {
        self.sequence_type
    }

    pub fn set_local_instrument(&mut self, instrument: LocalInstrument) -> &mut Self {
        self.local_instrument = instrument;
        self
    }

    pub fn local_instrument(&self) -> LocalInstrument {
        self.local_instrument
    }

    /// Requested collection (direct debit) or execution (credit transfer) date.
    pub fn set_requested_date(&mut self, date: NaiveDate) -> &mut Self {
        self.requested_date = Some(date);
        self
    }

    pub fn requested_date(&self) -> Option<NaiveDate> {
        self.requested_date
    }

    /// Creditor (direct debit) or debtor (credit transfer) name, Max70Text.
    pub fn set_name(&mut self, name: &str) -> Result<&mut Self, ValidationError> {
        self.name = required_text("payment_info.name", name, MAX_NAME_LENGTH)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_iban(&mut self, iban: &str) -> Result<&mut Self, ValidationError> {
        self.iban = validate_iban(iban).map_err(|e| prefixed("payment_info", e))?;
        Ok(self)
    }

    pub fn iban(&self) -> &str {
        &self.iban
    }

    pub fn set_bic(&mut self, bic: &str) -> Result<&mut Self, ValidationError> {
        self.bic = Some(validate_bic(bic).map_err(|e| prefixed("payment_info", e))?);
        Ok(self)
    }

    pub fn bic(&self) -> Option<&str> {
        self.bic.as_deref()
    }

    /// SEPA creditor identifier (`CdtrSchmeId`), required for direct debits.
    pub fn set_creditor_scheme_id(&mut self, id: &str) -> Result<&mut Self, ValidationError> {
        self.creditor_scheme_id = Some(required_text(
            "payment_info.creditor_scheme_id",
            id,
            MAX_ID_LENGTH,
        )?);
        Ok(self)
    }

    pub fn creditor_scheme_id(&self) -> Option<&str> {
        self.creditor_scheme_id.as_deref()
    }

    /// Batch-level `BtchBookg`.
    pub fn set_batch_booking(&mut self, value: bool) -> &mut Self {
        self.batch_booking = Some(value);
        self
    }

    pub fn batch_booking(&self) -> Option<bool> {
        self.batch_booking
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> &mut Self {
        self.transactions.push(transaction);
        self
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transactions_mut(&mut self) -> &mut Vec<Transaction> {
        &mut self.transactions
    }

    /// Totals as of the last [`recompute_totals`](Self::recompute_totals).
    pub fn totals(&self) -> ControlTotals {
        self.totals
    }

    pub fn reset_totals(&mut self) {
        self.totals = ControlTotals::ZERO;
    }

    /// Reset the batch totals and recount them from the current transactions.
    /// On error the totals stay reset.
    pub fn recompute_totals(&mut self) -> Result<ControlTotals, ValidationError> {
        self.reset_totals();
        let mut totals = ControlTotals::ZERO;
        for tx in &self.transactions {
            totals
                .add_transaction(tx.amount())
                .map_err(|e| prefixed(&format!("payment_info[{}]", self.identification), e))?;
        }
        self.totals = totals;
        Ok(totals)
    }

    /// All problems preventing this batch from being emitted.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let path = |field: &str| format!("payment_info[{}].{field}", self.identification);

        if self.name.is_empty() {
            errors.push(ValidationError::required(path("name")));
        }
        if validate_iban(&self.iban).is_err() {
            errors.push(ValidationError::new(path("iban"), "missing or invalid IBAN"));
        }
        if self.requested_date.is_none() {
            errors.push(ValidationError::required(path("requested_date")));
        }
        if self.transactions.is_empty() {
            errors.push(ValidationError::new(
                path("transactions"),
                "at least one transaction is required",
            ));
        }
        if self.method == PaymentMethod::DirectDebit {
            if self.sequence_type.is_none() {
                errors.push(ValidationError::required(path("sequence_type")));
            }
            if self.creditor_scheme_id.is_none() {
                errors.push(ValidationError::required(path("creditor_scheme_id")));
            }
        }
        for tx in &self.transactions {
            errors.extend(tx.validate(self.method));
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn prefixed(owner: &str, e: ValidationError) -> ValidationError {
    ValidationError::new(format!("{owner}.{}", e.field), e.message)
}
