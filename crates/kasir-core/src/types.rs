//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  sale_id (FK)   │       │
//! │  │  sku (business) │   │  invoice_number │   │  product_id     │       │
//! │  │  cost / sale    │   │  total_amount   │   │  quantity       │       │
//! │  │  stock          │   │  total_profit   │   │  price snapshot │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │ PaymentMethod   │   │  LineItemInput  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, name       │   │  Cash, Transfer │   │  raw form row   │       │
//! │  │  phone          │   │  QRIS, Kredit   │   │  (unvalidated)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, invoice_number) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::totals::LineAmounts;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown to the cashier.
    pub name: String,

    /// Purchase cost per unit, in the smallest currency unit.
    pub cost_price_cents: i64,

    /// Selling price per unit, in the smallest currency unit.
    pub sale_price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the cost price as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Returns the sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Checks whether `quantity` units can be taken from stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer a sale can be attributed to. Read-only while recording sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid.
///
/// Stored and submitted as the exact labels `Cash`, `Transfer`, `QRIS`,
/// `Kredit`.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "QRIS"))]
    #[serde(rename = "QRIS")]
    Qris,
    /// Store credit, settled later.
    Kredit,
}

impl PaymentMethod {
    /// Every method, in the order the form offers them.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Transfer,
        PaymentMethod::Qris,
        PaymentMethod::Kredit,
    ];

    /// The label used on the form and in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Transfer => "Transfer",
            PaymentMethod::Qris => "QRIS",
            PaymentMethod::Kredit => "Kredit",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a submitted payment method label (case-insensitive).
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "payment_method".to_string(),
            });
        }

        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale (the sale header).
///
/// Totals are written once, in the same transaction that inserts the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub invoice_number: String,
    pub customer_id: Option<String>,
    pub total_amount_cents: i64,
    pub total_profit_cents: i64,
    pub payment_method: PaymentMethod,
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    #[inline]
    pub fn total_profit(&self) -> Money {
        Money::from_cents(self.total_profit_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product prices at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Quantity sold (always positive).
    pub quantity: i64,
    /// Cost price per unit at time of sale (frozen).
    pub cost_price_cents: i64,
    /// Sale price per unit at time of sale (frozen).
    pub sale_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Subtotal and profit from the frozen prices.
    ///
    /// ## Errors
    /// * `CoreError::AmountOverflow` - The row holds values too large to multiply
    pub fn amounts(&self) -> CoreResult<LineAmounts> {
        LineAmounts::compute(
            Money::from_cents(self.cost_price_cents),
            Money::from_cents(self.sale_price_cents),
            self.quantity,
        )
    }

    /// Line subtotal: sale_price × quantity.
    pub fn subtotal(&self) -> CoreResult<Money> {
        Ok(self.amounts()?.subtotal)
    }

    /// Line profit: (sale_price − cost_price) × quantity.
    pub fn profit(&self) -> CoreResult<Money> {
        Ok(self.amounts()?.profit)
    }
}

// =============================================================================
// Sale Input
// =============================================================================

/// One submitted line item, exactly as it arrived.
///
/// `None` means the field was missing or could not be read as an integer.
/// Validation happens per item inside the recording transaction, see
/// [`crate::validation::validate_line_item`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

impl LineItemInput {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        LineItemInput {
            product_id: Some(product_id.into()),
            quantity: Some(quantity),
        }
    }
}

/// A validated line item: a product reference and a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
}

/// A sale as submitted by the cashier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub items: Vec<LineItemInput>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("transfer".parse::<PaymentMethod>().unwrap(), PaymentMethod::Transfer);
        assert_eq!("QRIS".parse::<PaymentMethod>().unwrap(), PaymentMethod::Qris);
        assert_eq!(" Kredit ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Kredit);
    }

    #[test]
    fn test_payment_method_rejects_unknown() {
        assert!(matches!(
            "".parse::<PaymentMethod>(),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            "Bitcoin".parse::<PaymentMethod>(),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_payment_method_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&PaymentMethod::Qris).unwrap();
        assert_eq!(json, "\"QRIS\"");
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_sale_item_subtotal_and_profit() {
        let item = SaleItem {
            id: "i".to_string(),
            sale_id: "s".to_string(),
            product_id: "p".to_string(),
            quantity: 4,
            cost_price_cents: 2_500,
            sale_price_cents: 3_000,
            created_at: Utc::now(),
        };
        assert_eq!(item.subtotal().unwrap().cents(), 12_000);
        assert_eq!(item.profit().unwrap().cents(), 2_000);
    }

    #[test]
    fn test_sale_item_amounts_overflow() {
        let item = SaleItem {
            id: "i".to_string(),
            sale_id: "s".to_string(),
            product_id: "p".to_string(),
            quantity: 2,
            cost_price_cents: -1,
            sale_price_cents: i64::MAX,
            created_at: Utc::now(),
        };
        assert_eq!(item.subtotal(), Err(CoreError::AmountOverflow));
        assert_eq!(item.profit(), Err(CoreError::AmountOverflow));
    }

    #[test]
    fn test_payment_method_default_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn test_product_can_sell() {
        let now = Utc::now();
        let product = Product {
            id: "p".to_string(),
            sku: "SKU".to_string(),
            name: "Teh Botol".to_string(),
            cost_price_cents: 3_000,
            sale_price_cents: 4_000,
            stock: 2,
            created_at: now,
            updated_at: now,
        };
        assert!(product.can_sell(2));
        assert!(!product.can_sell(3));
    }
}
