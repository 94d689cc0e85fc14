//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Sale rejections (rolled back, shown to user)   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  └── DbError          - Database failures, or Rejected(CoreError)      │
//! │                                                                         │
//! │  kasir-web errors (in app)                                             │
//! │  └── WebError         - HTTP status + message shown on the form        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → WebError → HTML         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Display` text of [`CoreError`] is exactly what the cashier sees on
//! the re-rendered form.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Reasons a sale is rejected.
///
/// Every variant aborts the whole sale: the transaction is rolled back and no
/// header, item or stock change survives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The submission carried no line items at all.
    #[error("no items submitted")]
    NoItems,

    /// A line item is missing its product or has a non-positive quantity.
    #[error("invalid item data")]
    InvalidItem,

    /// Product does not exist, or has less stock than requested.
    ///
    /// ## User Workflow
    /// ```text
    /// Submit sale (product P, qty: 5)
    ///      │
    ///      ▼
    /// Lock P, read stock: 3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: "P" }  → whole sale rolled back
    ///      │
    ///      ▼
    /// Form shows: "insufficient stock for product P"
    /// ```
    #[error("insufficient stock for product {product_id}")]
    InsufficientStock { product_id: String },

    /// The selected customer does not exist.
    #[error("customer {0} not found")]
    CustomerNotFound(String),

    /// A line or running total no longer fits in an `i64`.
    #[error("amount too large to record")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InsufficientStock error for a product ID.
    pub fn insufficient_stock(product_id: impl Into<String>) -> Self {
        CoreError::InsufficientStock {
            product_id: product_id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any sale data is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CoreError::NoItems.to_string(), "no items submitted");
        assert_eq!(CoreError::InvalidItem.to_string(), "invalid item data");
        assert_eq!(
            CoreError::insufficient_stock("p-42").to_string(),
            "insufficient stock for product p-42"
        );
        assert_eq!(
            CoreError::CustomerNotFound("c-1".to_string()).to_string(),
            "customer c-1 not found"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "payment_method".to_string(),
        };
        assert_eq!(err.to_string(), "payment_method is required");

        let err = ValidationError::NotAllowed {
            field: "payment_method".to_string(),
            allowed: vec!["Cash".to_string(), "QRIS".to_string()],
        };
        assert_eq!(err.to_string(), "payment_method must be one of: Cash, QRIS");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "payment_method".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "payment_method is required");
    }
}
