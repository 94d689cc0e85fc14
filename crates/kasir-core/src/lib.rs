//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate holds the sale-recording rules as pure functions with zero I/O
//! dependencies. The database layer (`kasir-db`) drives these rules inside a
//! transaction; the web layer only parses input and renders output.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              kasir-web (axum, server-rendered HTML)             │   │
//! │  │    GET /sales/create ──► POST /sales/create ──► GET /sales      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     kasir-db (SaleRecorder)                     │   │
//! │  │           one SQLite transaction per submitted sale             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ calls                                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │SaleTotals │  │ line items│  │   │
//! │  │   │   Sale    │  │           │  │  invoice  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, SaleItem, PaymentMethod)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - Running sale totals (amount and profit)
//! - [`invoice`] - Invoice number format
//! - [`validation`] - Line item validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::money::Money;
//! use kasir_core::totals::SaleTotals;
//!
//! let mut totals = SaleTotals::default();
//! totals
//!     .add_line(Money::from_cents(7_000), Money::from_cents(10_000), 3)
//!     .unwrap();
//!
//! assert_eq!(totals.amount().cents(), 30_000);
//! assert_eq!(totals.profit().cents(), 9_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::InvoiceNumber;
pub use money::Money;
pub use totals::{LineAmounts, SaleTotals};
pub use types::*;
pub use validation::validate_line_item;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every invoice number (`INV-202610-001`).
pub const INVOICE_PREFIX: &str = "INV";

/// Minimum width of the per-month invoice sequence.
///
/// The sequence is zero-padded to this width and simply grows wider past
/// `999` rather than wrapping.
pub const INVOICE_SEQUENCE_WIDTH: usize = 3;
