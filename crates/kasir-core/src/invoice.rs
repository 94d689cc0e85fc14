//! # Invoice Numbers
//!
//! Human-readable business key of a sale: `INV-<YYYYMM>-<NNN>`.
//!
//! ## Format
//! ```text
//! INV-202610-007
//! │   │      │
//! │   │      └── per-month sequence, zero-padded to 3 digits (grows past 999)
//! │   └───────── period: year + month of the sale date
//! └───────────── fixed prefix
//! ```
//!
//! The sequence is handed out by the database inside the recording
//! transaction (one counter row per period), so two sales can never receive
//! the same number and no collision check or retry is needed.

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{INVOICE_PREFIX, INVOICE_SEQUENCE_WIDTH};

/// Returns the invoice period (`YYYYMM`) for a sale date.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use kasir_core::invoice::invoice_period;
///
/// let date = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
/// assert_eq!(invoice_period(&date), "202603");
/// ```
pub fn invoice_period<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    format!("{:04}{:02}", date.year(), date.month())
}

/// A formatted invoice number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Builds the invoice number for a period and its sequence value.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::InvoiceNumber;
    ///
    /// assert_eq!(InvoiceNumber::format("202610", 7).as_str(), "INV-202610-007");
    /// assert_eq!(InvoiceNumber::format("202610", 1234).as_str(), "INV-202610-1234");
    /// ```
    pub fn format(period: &str, sequence: u64) -> Self {
        InvoiceNumber(format!(
            "{}-{}-{:0width$}",
            INVOICE_PREFIX,
            period,
            sequence,
            width = INVOICE_SEQUENCE_WIDTH
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<InvoiceNumber> for String {
    fn from(value: InvoiceNumber) -> Self {
        value.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_invoice_period() {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        assert_eq!(invoice_period(&date), "202610");
    }

    #[test]
    fn test_invoice_period_uses_local_calendar_of_the_date() {
        // 2026-10-31 20:00 UTC is already November in UTC+7.
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        let date = Utc
            .with_ymd_and_hms(2026, 10, 31, 20, 0, 0)
            .unwrap()
            .with_timezone(&wib);
        assert_eq!(invoice_period(&date), "202611");
    }

    #[test]
    fn test_format_pads_sequence() {
        assert_eq!(InvoiceNumber::format("202601", 1).to_string(), "INV-202601-001");
        assert_eq!(InvoiceNumber::format("202601", 42).to_string(), "INV-202601-042");
        assert_eq!(InvoiceNumber::format("202601", 999).to_string(), "INV-202601-999");
    }

    #[test]
    fn test_format_grows_past_three_digits() {
        assert_eq!(InvoiceNumber::format("202601", 1000).to_string(), "INV-202601-1000");
    }
}
