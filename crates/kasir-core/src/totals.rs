//! # Sale Totals
//!
//! Running totals for a sale being recorded.
//!
//! ```text
//! for each line:
//!     subtotal = sale_price × quantity
//!     profit   = (sale_price − cost_price) × quantity
//!     total_amount += subtotal
//!     total_profit += profit
//! ```
//!
//! Every step is overflow-checked; an overflow rejects the sale with
//! [`CoreError::AmountOverflow`] instead of wrapping.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Amounts contributed by a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub subtotal: Money,
    pub profit: Money,
}

impl LineAmounts {
    /// Computes a line's subtotal and profit from unit prices.
    pub fn compute(cost_price: Money, sale_price: Money, quantity: i64) -> CoreResult<Self> {
        let subtotal = sale_price
            .checked_multiply_quantity(quantity)
            .ok_or(CoreError::AmountOverflow)?;
        let profit = sale_price
            .checked_sub(cost_price)
            .and_then(|margin| margin.checked_multiply_quantity(quantity))
            .ok_or(CoreError::AmountOverflow)?;

        Ok(LineAmounts { subtotal, profit })
    }
}

/// Accumulates `total_amount` and `total_profit` across lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleTotals {
    amount: Money,
    profit: Money,
    lines: usize,
}

impl SaleTotals {
    /// Adds one line and returns what it contributed.
    pub fn add_line(
        &mut self,
        cost_price: Money,
        sale_price: Money,
        quantity: i64,
    ) -> CoreResult<LineAmounts> {
        let line = LineAmounts::compute(cost_price, sale_price, quantity)?;

        let amount = self
            .amount
            .checked_add(line.subtotal)
            .ok_or(CoreError::AmountOverflow)?;
        let profit = self
            .profit
            .checked_add(line.profit)
            .ok_or(CoreError::AmountOverflow)?;

        self.amount = amount;
        self.profit = profit;
        self.lines += 1;

        Ok(line)
    }

    /// Sum of line subtotals.
    #[inline]
    pub fn amount(&self) -> Money {
        self.amount
    }

    /// Sum of line profits. Negative when goods were sold below cost.
    #[inline]
    pub fn profit(&self) -> Money {
        self.profit
    }

    /// Number of lines added so far.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn m(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    #[test]
    fn test_line_amounts() {
        let line = LineAmounts::compute(m(2_000), m(3_500), 4).unwrap();
        assert_eq!(line.subtotal, m(14_000));
        assert_eq!(line.profit, m(6_000));
    }

    #[test]
    fn test_totals_accumulate_across_lines() {
        let mut totals = SaleTotals::default();
        totals.add_line(m(2_000), m(3_500), 4).unwrap();
        totals.add_line(m(10_000), m(12_000), 1).unwrap();

        assert_eq!(totals.amount(), m(26_000));
        assert_eq!(totals.profit(), m(8_000));
        assert_eq!(totals.line_count(), 2);
    }

    #[test]
    fn test_selling_below_cost_gives_negative_profit() {
        let mut totals = SaleTotals::default();
        totals.add_line(m(5_000), m(4_000), 2).unwrap();

        assert_eq!(totals.amount(), m(8_000));
        assert_eq!(totals.profit(), m(-2_000));
    }

    #[test]
    fn test_overflow_is_rejected_and_totals_untouched() {
        let mut totals = SaleTotals::default();
        totals.add_line(m(1), m(2), 1).unwrap();

        let err = totals.add_line(m(0), m(i64::MAX), 2).unwrap_err();
        assert_eq!(err, CoreError::AmountOverflow);
        assert_eq!(totals.amount(), m(2));
        assert_eq!(totals.line_count(), 1);
    }
}
