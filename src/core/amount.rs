use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Largest instructed amount of a single SEPA transaction.
pub const MAX_TRANSACTION_AMOUNT: Decimal = dec!(999999999.99);

/// Largest `NbOfTxs` (Max15NumericText).
pub const MAX_NUMBER_OF_TRANSACTIONS: u64 = 999_999_999_999_999;

/// Largest `CtrlSum` (DecimalNumber, 18 digits with two fraction digits).
pub const MAX_CONTROL_SUM: Decimal = dec!(9999999999999999.99);

/// Render an amount with exactly two fractional digits, `.` as separator
/// and no grouping, rounding half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use sepa_pain::core::format_amount;
///
/// assert_eq!(format_amount(dec!(12)), "12.00");
/// assert_eq!(format_amount(dec!(3.5)), "3.50");
/// assert_eq!(format_amount(dec!(1234567.891)), "1234567.89");
/// ```
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Exact decimal addition of two amounts. Panics past `Decimal::MAX` like
/// `+`; bounded totals go through [`ControlTotals::merge`].
pub fn sum(a: Decimal, b: Decimal) -> Decimal {
    a + b
}

/// Transaction count and control sum of a batch, message or document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlTotals {
    /// Number of transactions (NbOfTxs).
    pub count: u64,
    /// Sum of instructed amounts (CtrlSum).
    pub sum: Decimal,
}

impl ControlTotals {
    pub const ZERO: Self = Self {
        count: 0,
        sum: Decimal::ZERO,
    };

    pub fn new(count: u64, sum: Decimal) -> Self {
        Self { count, sum }
    }

    /// Account for one more transaction of `amount`. Leaves `self`
    /// unchanged on error.
    pub fn add_transaction(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        *self = self.merge(Self::new(1, amount))?;
        Ok(())
    }

    /// Combine two totals, failing when either figure leaves its schema range.
    pub fn merge(self, other: Self) -> Result<Self, ValidationError> {
        let count = self
            .count
            .checked_add(other.count)
            .filter(|c| *c <= MAX_NUMBER_OF_TRANSACTIONS)
            .ok_or_else(|| {
                ValidationError::new(
                    "control_totals.count",
                    format!("must not exceed {MAX_NUMBER_OF_TRANSACTIONS}"),
                )
            })?;
        let sum = self
            .sum
            .checked_add(other.sum)
            .filter(|s| *s <= MAX_CONTROL_SUM)
            .ok_or_else(|| {
                ValidationError::new(
                    "control_totals.sum",
                    format!("must not exceed {MAX_CONTROL_SUM}"),
                )
            })?;
        Ok(Self { count, sum })
    }

    /// CtrlSum as rendered in XML.
    pub fn formatted_sum(&self) -> String {
        format_amount(self.sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_amount_cases() {
        assert_eq!(format_amount(dec!(0)), "0.00");
        assert_eq!(format_amount(dec!(100)), "100.00");
        assert_eq!(format_amount(dec!(49.9)), "49.90");
        assert_eq!(format_amount(dec!(0.005)), "0.01");
        assert_eq!(format_amount(dec!(0.004)), "0.00");
        assert_eq!(format_amount(dec!(1833.4800)), "1833.48");
        assert_eq!(format_amount(dec!(999999999.999)), "1000000000.00");
    }

    #[test]
    fn repeated_cent_addition_has_no_drift() {
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total = sum(total, dec!(0.10));
        }
        assert_eq!(total, dec!(100.00));
        assert_eq!(format_amount(total), "100.00");
    }

    #[test]
    fn totals_fold() {
        let parts = [
            ControlTotals::new(3, dec!(10.00)),
            ControlTotals::new(5, dec!(20.00)),
        ];
        let total = parts
            .iter()
            .try_fold(ControlTotals::ZERO, |acc, t| acc.merge(*t))
            .unwrap();
        assert_eq!(total, ControlTotals::new(8, dec!(30.00)));
        assert_eq!(total.formatted_sum(), "30.00");
    }

    #[test]
    fn add_transaction_counts() {
        let mut t = ControlTotals::ZERO;
        t.add_transaction(dec!(1.10)).unwrap();
        t.add_transaction(dec!(2.20)).unwrap();
        assert_eq!(t.count, 2);
        assert_eq!(t.sum, dec!(3.30));
    }

    #[test]
    fn merge_stops_at_schema_limits() {
        let full = ControlTotals::new(MAX_NUMBER_OF_TRANSACTIONS, dec!(1));
        let err = full.merge(ControlTotals::new(1, dec!(1))).unwrap_err();
        assert_eq!(err.field, "control_totals.count");

        let rich = ControlTotals::new(1, MAX_CONTROL_SUM);
        assert_eq!(rich.merge(ControlTotals::new(1, dec!(0))).unwrap().sum, MAX_CONTROL_SUM);
        let err = rich.merge(ControlTotals::new(1, dec!(0.01))).unwrap_err();
        assert_eq!(err.field, "control_totals.sum");

        // u64 and Decimal overflow are reported, not panicked on
        let huge = ControlTotals::new(u64::MAX, Decimal::MAX);
        assert!(huge.merge(huge).is_err());

        let mut t = ControlTotals::new(1, MAX_CONTROL_SUM);
        assert!(t.add_transaction(dec!(1)).is_err());
        assert_eq!(t, ControlTotals::new(1, MAX_CONTROL_SUM));
    }
}
