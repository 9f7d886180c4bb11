use std::cell::OnceCell;

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;

use super::amount::{ControlTotals, MAX_CONTROL_SUM, MAX_NUMBER_OF_TRANSACTIONS};
use super::error::ValidationError;
use super::text::{MAX_ID_LENGTH, MAX_TEXT_LENGTH, bounded_text};

/// `CreDtTm` format: ISO 8601 without timezone.
pub const CREATION_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Message-level metadata (`GrpHdr`).
///
/// Every setter validates its input and leaves the previous value in place
/// when it fails. The transaction count and control sum are accumulators:
/// [`add_number_of_transactions`](Self::add_number_of_transactions) and
/// [`add_control_sum`](Self::add_control_sum) add to what is already there.
/// When rendered inside a [`Message`](crate::pain::Message) the totals of the
/// message's payment batches are added on top at render time, without
/// touching these fields.
#[derive(Debug, Clone, Default)]
pub struct GroupHeader {
    message_identification: String,
    creation_date_time: OnceCell<String>,
    initiating_party_name: String,
    address_line: Option<String>,
    country: Option<String>,
    organisation_identification: Option<String>,
    issuer: Option<String>,
    private_identification: Option<String>,
    control_sum: Decimal,
    number_of_transactions: u64,
    batch_booking: bool,
}

impl GroupHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// `MsgId`, Max35Text.
    pub fn set_message_identification(&mut self, id: &str) -> Result<&mut Self, ValidationError> {
        self.message_identification =
            bounded_text("group_header.message_identification", id, MAX_ID_LENGTH)?;
        Ok(self)
    }

    pub fn message_identification(&self) -> &str {
        &self.message_identification
    }

    /// `CreDtTm`. Stored as given.
    pub fn set_creation_date_time(&mut self, value: impl Into<String>) -> &mut Self {
        self.creation_date_time = OnceCell::from(value.into());
        self
    }

    pub fn set_creation_date_time_at(&mut self, at: NaiveDateTime) -> &mut Self {
        self.set_creation_date_time(at.format(CREATION_DATE_TIME_FORMAT).to_string())
    }

    /// The creation timestamp. When never set, the current local time is
    /// captured on first read and kept from then on.
    pub fn creation_date_time(&self) -> &str {
        self.creation_date_time.get_or_init(|| {
            Local::now()
                .naive_local()
                .format(CREATION_DATE_TIME_FORMAT)
                .to_string()
        })
    }

    /// `InitgPty/Nm`, Max140Text.
    pub fn set_initiating_party_name(&mut self, name: &str) -> Result<&mut Self, ValidationError> {
        self.initiating_party_name =
            bounded_text("group_header.initiating_party_name", name, MAX_TEXT_LENGTH)?;
        Ok(self)
    }

    pub fn initiating_party_name(&self) -> &str {
        &self.initiating_party_name
    }

    /// `InitgPty/PstlAdr/AdrLine`. Only emitted together with a country.
    pub fn set_address_line(&mut self, line: &str) -> Result<&mut Self, ValidationError> {
        self.address_line = Some(bounded_text(
            "group_header.address_line",
            line,
            MAX_TEXT_LENGTH,
        )?);
        Ok(self)
    }

    pub fn address_line(&self) -> Option<&str> {
        self.address_line.as_deref()
    }

    /// `InitgPty/PstlAdr/Ctry`. Only emitted together with an address line.
    pub fn set_country(&mut self, country: &str) -> Result<&mut Self, ValidationError> {
        self.country = Some(bounded_text(
            "group_header.country",
            country,
            MAX_TEXT_LENGTH,
        )?);
        Ok(self)
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Address line and country, if both are set and non-empty.
    pub fn postal_address(&self) -> Option<(&str, &str)> {
        match (self.address_line(), self.country()) {
            (Some(line), Some(country)) if !line.is_empty() && !country.is_empty() => {
                Some((line, country))
            }
            _ => None,
        }
    }

    /// `InitgPty/Id/OrgId/Othr/Id`. Takes precedence over the private identification.
    pub fn set_organisation_identification(&mut self, id: impl Into<String>) -> &mut Self {
        self.organisation_identification = Some(id.into());
        self
    }

    pub fn organisation_identification(&self) -> Option<&str> {
        self.organisation_identification.as_deref()
    }

    /// `InitgPty/Id/OrgId/Othr/Issr`.
    pub fn set_issuer(&mut self, issuer: impl Into<String>) -> &mut Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// `InitgPty/Id/PrvtId/Othr/Id`.
    pub fn set_private_identification(&mut self, id: impl Into<String>) -> &mut Self {
        self.private_identification = Some(id.into());
        self
    }

    pub fn private_identification(&self) -> Option<&str> {
        self.private_identification.as_deref()
    }

    /// Identity block to emit, if any. Organisation wins over private.
    pub fn identity(&self) -> Option<PartyIdentity<'_>> {
        if let Some(id) = non_empty(&self.organisation_identification) {
            Some(PartyIdentity::Organisation {
                id,
                issuer: non_empty(&self.issuer),
            })
        } else {
            non_empty(&self.private_identification).map(|id| PartyIdentity::Private { id })
        }
    }

    /// Add `amount` to the control sum. The total must stay within `CtrlSum` range.
    pub fn add_control_sum(&mut self, amount: Decimal) -> Result<&mut Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::new(
                "group_header.control_sum",
                "must not be negative",
            ));
        }
        self.control_sum = self
            .control_sum
            .checked_add(amount)
            .filter(|total| *total <= MAX_CONTROL_SUM)
            .ok_or_else(|| {
                ValidationError::new(
                    "group_header.control_sum",
                    format!("must not exceed {MAX_CONTROL_SUM}"),
                )
            })?;
        Ok(self)
    }

    pub fn control_sum(&self) -> Decimal {
        self.control_sum
    }

    /// Add `count` to the number of transactions (at most 15 digits in total).
    pub fn add_number_of_transactions(
        &mut self,
        count: u64,
    ) -> Result<&mut Self, ValidationError> {
        self.number_of_transactions = self
            .number_of_transactions
            .checked_add(count)
            .filter(|total| *total <= MAX_NUMBER_OF_TRANSACTIONS)
            .ok_or_else(|| {
                ValidationError::new(
                    "group_header.number_of_transactions",
                    format!("must not exceed {MAX_NUMBER_OF_TRANSACTIONS}"),
                )
            })?;
        Ok(self)
    }

    pub fn number_of_transactions(&self) -> u64 {
        self.number_of_transactions
    }

    /// Totals accumulated directly on this header.
    pub fn totals(&self) -> ControlTotals {
        ControlTotals::new(self.number_of_transactions, self.control_sum)
    }

    /// `BtchBookg`, emitted only for pain.001.001.02.
    pub fn set_batch_booking(&mut self, value: bool) -> &mut Self {
        self.batch_booking = value;
        self
    }

    /// Set the batch booking flag from a textual token (`true`/`false`/`1`/`0`).
    /// Empty input is rejected.
    pub fn parse_batch_booking(&mut self, token: &str) -> Result<&mut Self, ValidationError> {
        let value = match token.trim().to_ascii_lowercase().as_str() {
            "" => return Err(ValidationError::required("group_header.batch_booking")),
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ValidationError::new(
                    "group_header.batch_booking",
                    format!("'{other}' is not a boolean"),
                ));
            }
        };
        Ok(self.set_batch_booking(value))
    }

    pub fn batch_booking(&self) -> bool {
        self.batch_booking
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Identification of the initiating party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyIdentity<'a> {
    Organisation { id: &'a str, issuer: Option<&'a str> },
    Private { id: &'a str },
}
