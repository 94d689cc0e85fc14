//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Listing sellable products for the sale form
//! - Lookup and insert
//! - Stock reads and decrements inside the recording transaction
//!
//! ## Stock Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Guarded Stock Decrement                              │
//! │                                                                         │
//! │  UPDATE products SET stock = stock - ?qty                              │
//! │  WHERE id = ?id AND stock >= ?qty                                      │
//! │       │                                                                 │
//! │       ├── rows_affected = 1 → decremented                              │
//! │       └── rows_affected = 0 → not enough stock, nothing changed        │
//! │                                                                         │
//! │  The CHECK (stock >= 0) constraint backs this up at the schema level.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kasir_core::Product;

/// Column list shared by every product SELECT.
const PRODUCT_COLUMNS: &str = r#"
    id,
    sku,
    name,
    cost_price_cents,
    sale_price_cents,
    stock,
    created_at,
    updated_at
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Everything the form can sell
/// let products = repo.list_in_stock().await?;
///
/// // Get by ID
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products with stock left, ordered by name.
    pub async fn list_in_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock > 0 ORDER BY name, sku"
        );

        let products: Vec<Product> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Listed in-stock products");
        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product: Option<Product> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id should be generated beforehand)
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - If SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name,
                cost_price_cents, sale_price_cents, stock,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.cost_price_cents)
        .bind(product.sale_price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, product.sku.as_str()),
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped helpers
    // =========================================================================

    /// Reads a product inside the caller's transaction.
    ///
    /// The recorder's transaction already holds the write lock when this
    /// runs, so the returned stock cannot change until it ends.
    pub async fn fetch_in_tx(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product: Option<Product> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(product)
    }

    /// Decrements stock by `quantity` if at least that much is left.
    ///
    /// Returns `false` (and changes nothing) when stock is short.
    pub async fn decrement_stock_in_tx(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock = stock - ?1,
                updated_at = ?3
            WHERE id = ?2 AND stock >= ?1
            "#,
        )
        .bind(quantity)
        .bind(id)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        debug!(product_id = %id, quantity, rows = result.rows_affected(), "Decremented stock");
        Ok(result.rows_affected() == 1)
    }
}

/// Generates a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
