use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::payment::PaymentMethod;

/// ISO 20022 namespace prefix shared by all pain schemas.
pub const ISO20022_NAMESPACE_PREFIX: &str = "urn:iso:std:iso:20022:tech:xsd:";

/// XML Schema instance namespace.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Fixed `Grpg` token of pain.001.001.02 group headers.
pub const GROUPING_MIXED: &str = "MIXD";

/// Supported pain schema variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaVariant {
    /// pain.008.001.02: customer direct debit initiation.
    #[default]
    #[serde(rename = "pain.008.001.02")]
    Pain008_001_02,
    /// pain.001.001.02: customer credit transfer initiation (legacy).
    #[serde(rename = "pain.001.001.02")]
    Pain001_001_02,
    /// pain.001.001.03: customer credit transfer initiation.
    #[serde(rename = "pain.001.001.03")]
    Pain001_001_03,
}

/// Group header elements whose presence depends on the schema variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatedField {
    /// `GrpHdr/BtchBookg`
    BatchBooking,
    /// `GrpHdr/Grpg`
    Grouping,
}

const GATED_FIELDS: &[(GatedField, &[SchemaVariant])] = &[
    (GatedField::BatchBooking, &[SchemaVariant::Pain001_001_02]),
    (GatedField::Grouping, &[SchemaVariant::Pain001_001_02]),
];

impl SchemaVariant {
    pub const ALL: [Self; 3] = [
        Self::Pain008_001_02,
        Self::Pain001_001_02,
        Self::Pain001_001_03,
    ];

    /// Schema identifier, e.g. `pain.008.001.02`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pain008_001_02 => "pain.008.001.02",
            Self::Pain001_001_02 => "pain.001.001.02",
            Self::Pain001_001_03 => "pain.001.001.03",
        }
    }

    /// Parse from a schema identifier.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }

    pub fn is_credit_transfer(&self) -> bool {
        matches!(self, Self::Pain001_001_02 | Self::Pain001_001_03)
    }

    /// Payment method every batch of this variant must use.
    pub fn payment_method(&self) -> PaymentMethod {
        if self.is_credit_transfer() {
            PaymentMethod::CreditTransfer
        } else {
            PaymentMethod::DirectDebit
        }
    }

    /// Element wrapping each message below `Document`.
    pub fn message_root(&self) -> &'static str {
        if self.is_credit_transfer() {
            "CstmrCdtTrfInitn"
        } else {
            "CstmrDrctDbtInitn"
        }
    }

    /// Default `xmlns` of the document.
    pub fn namespace(&self) -> String {
        format!("{ISO20022_NAMESPACE_PREFIX}{}", self.code())
    }

    /// `xsi:schemaLocation` value: namespace followed by the XSD file name.
    pub fn schema_location(&self) -> String {
        format!("{} {}.xsd", self.namespace(), self.code())
    }

    /// Whether `field` is part of this variant's group header.
    pub fn emits(&self, field: GatedField) -> bool {
        GATED_FIELDS
            .iter()
            .any(|(f, variants)| *f == field && variants.contains(self))
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SchemaVariant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim()).ok_or_else(|| {
            ValidationError::new("schema_variant", format!("unsupported pain schema '{s}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_roots() {
        assert_eq!(SchemaVariant::Pain008_001_02.message_root(), "CstmrDrctDbtInitn");
        assert_eq!(SchemaVariant::Pain001_001_02.message_root(), "CstmrCdtTrfInitn");
        assert_eq!(SchemaVariant::Pain001_001_03.message_root(), "CstmrCdtTrfInitn");
    }

    #[test]
    fn gating_table() {
        for v in SchemaVariant::ALL {
            let legacy = v == SchemaVariant::Pain001_001_02;
            assert_eq!(v.emits(GatedField::BatchBooking), legacy, "{v}");
            assert_eq!(v.emits(GatedField::Grouping), legacy, "{v}");
        }
    }

    #[test]
    fn namespace_and_location() {
        let v = SchemaVariant::Pain001_001_03;
        assert_eq!(v.namespace(), "urn:iso:std:iso:20022:tech:xsd:pain.001.001.03");
        assert_eq!(
            v.schema_location(),
            "urn:iso:std:iso:20022:tech:xsd:pain.001.001.03 pain.001.001.03.xsd"
        );
    }

    #[test]
    fn parse_codes() {
        assert_eq!(
            "pain.008.001.02".parse::<SchemaVariant>().unwrap(),
            SchemaVariant::Pain008_001_02
        );
        assert!("pain.008.001.99".parse::<SchemaVariant>().is_err());
        for v in SchemaVariant::ALL {
            assert_eq!(SchemaVariant::from_code(v.code()), Some(v));
        }
    }
}
