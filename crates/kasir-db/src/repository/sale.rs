//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  All inside one SaleRecorder transaction:                              │
//! │                                                                         │
//! │  1. NUMBER                                                             │
//! │     └── next_invoice_sequence_in_tx() → INV-YYYYMM-NNN                 │
//! │                                                                         │
//! │  2. HEADER                                                             │
//! │     └── insert_sale_in_tx() → Sale { totals: 0 }                       │
//! │                                                                         │
//! │  3. ITEMS                                                              │
//! │     └── insert_item_in_tx() → SaleItem (price snapshot)                │
//! │     └── insert_item_in_tx() → SaleItem                                 │
//! │                                                                         │
//! │  4. TOTALS                                                             │
//! │     └── update_totals_in_tx() → Sale { totals: final }                 │
//! │                                                                         │
//! │  After commit the sale is never updated again; this repository only    │
//! │  reads it back for the listing page.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kasir_core::{Money, PaymentMethod, Sale, SaleItem};

const SALE_COLUMNS: &str = r#"
    id,
    invoice_number,
    customer_id,
    total_amount_cents,
    total_profit_cents,
    payment_method,
    sale_date
"#;

/// One row of the recent-sales listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SaleSummary {
    pub id: String,
    pub invoice_number: String,
    /// `None` for walk-in sales.
    pub customer_name: Option<String>,
    pub total_amount_cents: i64,
    pub total_profit_cents: i64,
    pub payment_method: PaymentMethod,
    pub sale_date: DateTime<Utc>,
    pub item_count: i64,
}

impl SaleSummary {
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    pub fn total_profit(&self) -> Money {
        Money::from_cents(self.total_profit_cents)
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists the most recent sales, newest first, with the customer name.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SaleSummary>> {
        let sales: Vec<SaleSummary> = sqlx::query_as(
            r#"
            SELECT
                s.id,
                s.invoice_number,
                c.name AS customer_name,
                s.total_amount_cents,
                s.total_profit_cents,
                s.payment_method,
                s.sale_date,
                (SELECT COUNT(*) FROM sale_items si WHERE si.sale_id = s.id) AS item_count
            FROM sales s
            LEFT JOIN customers c ON c.id = s.customer_id
            ORDER BY s.sale_date DESC, s.invoice_number DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), limit, "Listed recent sales");
        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        let sale: Option<Sale> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets a sale by its invoice number.
    pub async fn get_by_invoice_number(&self, invoice_number: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE invoice_number = ?1");

        let sale: Option<Sale> = sqlx::query_as(&sql)
            .bind(invoice_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets all items for a sale, in the order they were recorded.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items: Vec<SaleItem> = sqlx::query_as(
            r#"
            SELECT
                id,
                sale_id,
                product_id,
                quantity,
                cost_price_cents,
                sale_price_cents,
                created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts all sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped helpers
    // =========================================================================

    /// Hands out the next invoice sequence number for `period` (YYYYMM).
    ///
    /// The first call for a period returns 1. As a write, this also takes
    /// the database write lock for the rest of the transaction.
    pub async fn next_invoice_sequence_in_tx(
        conn: &mut SqliteConnection,
        period: &str,
    ) -> DbResult<u64> {
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_sequences (period, last_seq)
            VALUES (?1, 1)
            ON CONFLICT (period) DO UPDATE SET last_seq = last_seq + 1
            RETURNING last_seq
            "#,
        )
        .bind(period)
        .fetch_one(&mut *conn)
        .await?;

        u64::try_from(seq)
            .map_err(|_| DbError::Internal(format!("invoice sequence out of range: {seq}")))
    }

    /// Inserts a sale header.
    pub async fn insert_sale_in_tx(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, invoice_number = %sale.invoice_number, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, invoice_number, customer_id,
                total_amount_cents, total_profit_cents,
                payment_method, sale_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.invoice_number)
        .bind(&sale.customer_id)
        .bind(sale.total_amount_cents)
        .bind(sale.total_profit_cents)
        .bind(sale.payment_method)
        .bind(sale.sale_date)
        .execute(&mut *conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, sale.invoice_number.as_str()),
            other => other,
        })?;

        Ok(())
    }

    /// Adds an item to a sale.
    ///
    /// ## Snapshot Pattern
    /// Cost and sale price are copied onto the item so the sale keeps its
    /// numbers even if the product's prices change later.
    pub async fn insert_item_in_tx(conn: &mut SqliteConnection, item: &SaleItem) -> DbResult<()> {
        debug!(sale_id = %item.sale_id, product_id = %item.product_id, quantity = item.quantity, "Adding sale item");

        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, product_id, quantity,
                cost_price_cents, sale_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.cost_price_cents)
        .bind(item.sale_price_cents)
        .bind(item.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Writes the final totals onto a sale header.
    pub async fn update_totals_in_tx(
        conn: &mut SqliteConnection,
        sale_id: &str,
        total_amount: Money,
        total_profit: Money,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE sales SET
                total_amount_cents = ?2,
                total_profit_cents = ?3
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .bind(total_amount.cents())
        .bind(total_profit.cents())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        Ok(())
    }
}

/// Generates a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new sale item ID.
pub fn generate_sale_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_invoice_sequence_is_per_period() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let a = SaleRepository::next_invoice_sequence_in_tx(&mut conn, "202610").await.unwrap();
        let b = SaleRepository::next_invoice_sequence_in_tx(&mut conn, "202610").await.unwrap();
        let c = SaleRepository::next_invoice_sequence_in_tx(&mut conn, "202611").await.unwrap();

        assert_eq!((a, b, c), (1, 2, 1));
    }

    #[tokio::test]
    async fn test_insert_header_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sale = Sale {
            id: generate_sale_id(),
            invoice_number: "INV-202610-001".to_string(),
            customer_id: None,
            total_amount_cents: 0,
            total_profit_cents: 0,
            payment_method: PaymentMethod::Qris,
            sale_date: Utc::now(),
        };

        {
            let mut conn = db.pool().acquire().await.unwrap();
            SaleRepository::insert_sale_in_tx(&mut conn, &sale).await.unwrap();
            SaleRepository::update_totals_in_tx(
                &mut conn,
                &sale.id,
                Money::from_cents(7_000),
                Money::from_cents(1_500),
            )
            .await
            .unwrap();
        }

        let repo = db.sales();
        let stored = repo.get_by_invoice_number("INV-202610-001").await.unwrap().unwrap();
        assert_eq!(stored.id, sale.id);
        assert_eq!(stored.payment_method, PaymentMethod::Qris);
        assert_eq!(stored.total_amount_cents, 7_000);
        assert_eq!(stored.total_profit_cents, 1_500);

        let listed = repo.list_recent(10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer_name, None);
        assert_eq!(listed[0].item_count, 0);
    }

    #[tokio::test]
    async fn test_duplicate_invoice_number_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let mut sale = Sale {
            id: generate_sale_id(),
            invoice_number: "INV-202610-001".to_string(),
            customer_id: None,
            total_amount_cents: 0,
            total_profit_cents: 0,
            payment_method: PaymentMethod::Cash,
            sale_date: Utc::now(),
        };
        SaleRepository::insert_sale_in_tx(&mut conn, &sale).await.unwrap();

        sale.id = generate_sale_id();
        let err = SaleRepository::insert_sale_in_tx(&mut conn, &sale).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_totals_unknown_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let err = SaleRepository::update_totals_in_tx(&mut conn, "missing", Money::zero(), Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
