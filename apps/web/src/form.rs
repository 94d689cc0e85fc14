//! # Sale Form Parsing
//!
//! Turns the urlencoded body of `POST /sales/create` into a [`NewSale`].
//!
//! ## Field Layout
//! ```text
//! customer_id=<id or empty>
//! payment_method=Cash|Transfer|QRIS|Kredit
//! items[0][product_id]=...   items[0][quantity]=2
//! items[3][product_id]=...   items[3][quantity]=1     ← rows 1, 2 removed
//! ```
//!
//! Row indices come from the browser and may have gaps; rows are kept in
//! ascending index order. Quantities are parsed here but not validated: an
//! unreadable quantity becomes `None` and the recorder rejects it in turn.
//!
//! An `items[...]` key that is not `items[<n>][product_id]` or
//! `items[<n>][quantity]` marks the whole form as malformed, and the sale is
//! rejected as `invalid item data` rather than recorded without that row.

use std::collections::BTreeMap;

use kasir_core::validation::normalize_optional_id;
use kasir_core::{CoreError, LineItemInput, NewSale, PaymentMethod};

use crate::error::WebResult;

/// One item row as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedRow {
    pub product_id: String,
    pub quantity: String,
}

impl SubmittedRow {
    /// The row as the recorder sees it.
    pub fn to_line_item(&self) -> LineItemInput {
        let product_id = self.product_id.trim();
        LineItemInput {
            product_id: (!product_id.is_empty()).then(|| product_id.to_string()),
            quantity: self.quantity.trim().parse().ok(),
        }
    }
}

/// The raw submitted form, kept so it can be re-rendered on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleForm {
    pub customer_id: String,
    pub payment_method: String,
    pub rows: Vec<SubmittedRow>,
    /// An item key could not be read.
    pub malformed: bool,
}

impl SaleForm {
    /// Builds the form from decoded `(name, value)` pairs.
    ///
    /// Fields outside `items[...]` that the form doesn't know are ignored.
    /// A repeated field keeps its last value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = SaleForm::default();
        let mut rows: BTreeMap<u64, SubmittedRow> = BTreeMap::new();

        for (name, value) in pairs {
            match name.as_str() {
                "customer_id" => form.customer_id = value,
                "payment_method" => form.payment_method = value,
                _ if name.starts_with("items[") => match parse_item_key(&name) {
                    Some((index, "product_id")) => rows.entry(index).or_default().product_id = value,
                    Some((index, "quantity")) => rows.entry(index).or_default().quantity = value,
                    _ => form.malformed = true,
                },
                _ => {}
            }
        }

        form.rows = rows.into_values().collect();
        form
    }

    /// Converts the form into a sale for the recorder.
    ///
    /// ## Errors
    /// * `CoreError::InvalidItem` - An item key was malformed
    /// * `CoreError::NoItems` - No item rows were submitted
    /// * `ValidationError` - Bad payment method or customer id
    pub fn to_new_sale(&self) -> WebResult<NewSale> {
        if self.malformed {
            return Err(CoreError::InvalidItem.into());
        }
        if self.rows.is_empty() {
            return Err(CoreError::NoItems.into());
        }

        let payment_method: PaymentMethod = self.payment_method.parse()?;
        let customer_id = normalize_optional_id("customer_id", Some(self.customer_id.as_str()))?;

        Ok(NewSale {
            customer_id,
            payment_method,
            items: self.rows.iter().map(SubmittedRow::to_line_item).collect(),
        })
    }
}

/// Splits `items[<index>][<field>]` into its index and field name.
fn parse_item_key(name: &str) -> Option<(u64, &str)> {
    let rest = name.strip_prefix("items[")?;
    let (index, rest) = rest.split_once("][")?;
    let field = rest.strip_suffix(']')?;
    Some((index.parse().ok()?, field))
}
