//! # Validation Module
//!
//! Input validation for submitted sales.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser                                                      │
//! │  ├── required / min="1" on form inputs                                 │
//! │  └── Immediate cashier feedback (can be bypassed)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Form decoding (kasir-web)                                    │
//! │  └── items[i][...] grouped into LineItemInput, unreadable → None       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE, called per item inside the transaction          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── CHECK (quantity > 0), CHECK (stock >= 0)                          │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{LineItemInput, SaleLine};

/// Maximum accepted length of a submitted ID.
pub const MAX_ID_LENGTH: usize = 64;

/// Validates one submitted line item.
///
/// ## Rules
/// - `product_id` must be present and non-blank
/// - `quantity` must be present and strictly positive
///
/// Any failure is reported as [`CoreError::InvalidItem`]; the cashier is not
/// told which rule failed.
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_line_item;
/// use kasir_core::LineItemInput;
///
/// assert!(validate_line_item(&LineItemInput::new("p-1", 2)).is_ok());
/// assert!(validate_line_item(&LineItemInput::new("p-1", 0)).is_err());
/// assert!(validate_line_item(&LineItemInput::default()).is_err());
/// ```
pub fn validate_line_item(input: &LineItemInput) -> CoreResult<SaleLine> {
    let product_id = input
        .product_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(CoreError::InvalidItem)?;

    let quantity = input.quantity.filter(|q| *q > 0).ok_or(CoreError::InvalidItem)?;

    Ok(SaleLine {
        product_id: product_id.to_string(),
        quantity,
    })
}

/// Normalizes an optional reference ID submitted from a `<select>`.
///
/// ## Rules
/// - Blank means "none" (the form's placeholder option)
/// - Longer than [`MAX_ID_LENGTH`] is rejected
pub fn normalize_optional_id(field: &str, raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(id) = raw.map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    if id.len() > MAX_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LENGTH,
        });
    }

    Ok(Some(id.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_line_item() {
        let line = validate_line_item(&LineItemInput::new(" p-1 ", 3)).unwrap();
        assert_eq!(line.product_id, "p-1");
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn test_missing_product_is_invalid() {
        let input = LineItemInput {
            product_id: None,
            quantity: Some(1),
        };
        assert_eq!(validate_line_item(&input), Err(CoreError::InvalidItem));

        let input = LineItemInput {
            product_id: Some("   ".to_string()),
            quantity: Some(1),
        };
        assert_eq!(validate_line_item(&input), Err(CoreError::InvalidItem));
    }

    #[test]
    fn test_non_positive_quantity_is_invalid() {
        assert_eq!(
            validate_line_item(&LineItemInput::new("p-1", 0)),
            Err(CoreError::InvalidItem)
        );
        assert_eq!(
            validate_line_item(&LineItemInput::new("p-1", -4)),
            Err(CoreError::InvalidItem)
        );

        let unreadable = LineItemInput {
            product_id: Some("p-1".to_string()),
            quantity: None,
        };
        assert_eq!(validate_line_item(&unreadable), Err(CoreError::InvalidItem));
    }

    #[test]
    fn test_normalize_optional_id() {
        assert_eq!(normalize_optional_id("customer_id", None), Ok(None));
        assert_eq!(normalize_optional_id("customer_id", Some("")), Ok(None));
        assert_eq!(normalize_optional_id("customer_id", Some("  ")), Ok(None));
        assert_eq!(
            normalize_optional_id("customer_id", Some(" c-1 ")),
            Ok(Some("c-1".to_string()))
        );
        assert!(normalize_optional_id("customer_id", Some(&"x".repeat(65))).is_err());
    }
}
