//! # Sale Recorder
//!
//! Records a sale, its items and the matching stock decrements in one
//! SQLite transaction, or records nothing at all.
//!
//! ## Transaction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SaleRecorder::record                               │
//! │                                                                         │
//! │  items empty? ──yes──► Err("no items submitted")   (no transaction)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bump invoice_sequences[YYYYMM]  ← first write: takes the write lock   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  customer exists? ─no─► ROLLBACK, Err("customer <id> not found")       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT sales (totals = 0)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each item, in submission order:                                   │
//! │  ├── valid product id + quantity > 0?  ─no─► ROLLBACK, "invalid item"  │
//! │  ├── product found, stock >= qty?      ─no─► ROLLBACK, "insufficient"  │
//! │  ├── INSERT sale_items (price snapshot)                                │
//! │  ├── totals += subtotal, profit                                        │
//! │  └── UPDATE products SET stock = stock - qty                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE sales SET totals                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! SQLite allows one writer at a time. The invoice sequence bump is the
//! first statement of the transaction and it writes, so the write lock is
//! held from there until commit or rollback. Product rows read afterwards
//! cannot change underneath the recorder. A second recorder blocks on the
//! connection's `busy_timeout` until the first one finishes, then sees the
//! new stock.

use chrono::{DateTime, Local, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::{generate_sale_id, generate_sale_item_id, SaleRepository};
use kasir_core::invoice::invoice_period;
use kasir_core::{
    validate_line_item, CoreError, InvoiceNumber, Money, NewSale, Sale, SaleItem, SaleTotals,
};

/// The outcome of a committed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSale {
    pub sale_id: String,
    pub invoice_number: InvoiceNumber,
    pub total_amount: Money,
    pub total_profit: Money,
    pub item_count: usize,
}

/// Records sales atomically.
///
/// ## Usage
/// ```rust,ignore
/// let recorded = db.recorder().record(NewSale {
///     customer_id: None,
///     payment_method: PaymentMethod::Cash,
///     items: vec![LineItemInput::new(product_id, 2)],
/// }).await?;
///
/// println!("{}", recorded.invoice_number); // INV-202610-001
/// ```
#[derive(Debug, Clone)]
pub struct SaleRecorder {
    pool: SqlitePool,
}

impl SaleRecorder {
    /// Creates a new SaleRecorder.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRecorder { pool }
    }

    /// Records a sale dated now.
    pub async fn record(&self, sale: NewSale) -> DbResult<RecordedSale> {
        self.record_at(sale, Utc::now()).await
    }

    /// Records a sale with an explicit sale date.
    ///
    /// The invoice period is the sale date's month in the server's local
    /// time zone.
    ///
    /// ## Errors
    /// * `DbError::Rejected` - A business rule failed; nothing was written
    /// * Any other `DbError` - The database failed; nothing was written
    pub async fn record_at(&self, sale: NewSale, sale_date: DateTime<Utc>) -> DbResult<RecordedSale> {
        if sale.items.is_empty() {
            warn!("Sale rejected: no items submitted");
            return Err(CoreError::NoItems.into());
        }

        let mut tx = self.pool.begin().await?;

        match write_sale(&mut *tx, &sale, sale_date).await {
            Ok(recorded) => {
                tx.commit().await?;

                info!(
                    sale_id = %recorded.sale_id,
                    invoice_number = %recorded.invoice_number,
                    total_amount = recorded.total_amount.cents(),
                    items = recorded.item_count,
                    "Sale recorded"
                );
                Ok(recorded)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    // Dropping the connection discards the transaction anyway.
                    warn!(error = %rollback_err, "Rollback failed");
                }

                match &err {
                    DbError::Rejected(reason) => warn!(reason = %reason, "Sale rejected"),
                    other => warn!(error = %other, "Sale aborted"),
                }
                Err(err)
            }
        }
    }
}

/// Everything between BEGIN and COMMIT.
async fn write_sale(
    conn: &mut SqliteConnection,
    sale: &NewSale,
    sale_date: DateTime<Utc>,
) -> DbResult<RecordedSale> {
    let period = invoice_period(&sale_date.with_timezone(&Local));
    let sequence = SaleRepository::next_invoice_sequence_in_tx(conn, &period).await?;
    let invoice_number = InvoiceNumber::format(&period, sequence);
    debug!(invoice_number = %invoice_number, "Invoice number assigned");

    let customer_id = sale
        .customer_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    if let Some(id) = customer_id {
        if !CustomerRepository::exists_in_tx(conn, id).await? {
            return Err(CoreError::CustomerNotFound(id.to_string()).into());
        }
    }

    let header = Sale {
        id: generate_sale_id(),
        invoice_number: invoice_number.as_str().to_string(),
        customer_id: customer_id.map(str::to_string),
        total_amount_cents: 0,
        total_profit_cents: 0,
        payment_method: sale.payment_method,
        sale_date,
    };
    SaleRepository::insert_sale_in_tx(conn, &header).await?;

    let mut totals = SaleTotals::default();

    for (position, input) in sale.items.iter().enumerate() {
        let line = validate_line_item(input)?;

        let product = ProductRepository::fetch_in_tx(conn, &line.product_id)
            .await?
            .filter(|p| p.can_sell(line.quantity))
            .ok_or_else(|| CoreError::insufficient_stock(&line.product_id))?;

        let amounts = totals.add_line(product.cost_price(), product.sale_price(), line.quantity)?;

        let item = SaleItem {
            id: generate_sale_item_id(),
            sale_id: header.id.clone(),
            product_id: product.id.clone(),
            quantity: line.quantity,
            cost_price_cents: product.cost_price_cents,
            sale_price_cents: product.sale_price_cents,
            created_at: sale_date,
        };
        SaleRepository::insert_item_in_tx(conn, &item).await?;

        if !ProductRepository::decrement_stock_in_tx(conn, &product.id, line.quantity).await? {
            return Err(CoreError::insufficient_stock(&product.id).into());
        }

        debug!(
            position,
            product_id = %product.id,
            quantity = line.quantity,
            subtotal = amounts.subtotal.cents(),
            "Line recorded"
        );
    }

    SaleRepository::update_totals_in_tx(conn, &header.id, totals.amount(), totals.profit()).await?;

    Ok(RecordedSale {
        sale_id: header.id,
        invoice_number,
        total_amount: totals.amount(),
        total_profit: totals.profit(),
        item_count: totals.line_count(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::customer::generate_customer_id;
    use crate::repository::product::generate_product_id;
    use chrono::TimeZone;
    use kasir_core::{Customer, LineItemInput, PaymentMethod, Product};
    use std::time::Duration;

    async fn seed_product(db: &Database, sku: &str, cost: i64, price: i64, stock: i64) -> Product {
        let now = Utc::now();
        db.products()
            .insert(&Product {
                id: generate_product_id(),
                sku: sku.to_string(),
                name: format!("Product {sku}"),
                cost_price_cents: cost,
                sale_price_cents: price,
                stock,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    async fn row_counts(db: &Database) -> (i64, i64) {
        let sales = db.sales().count().await.unwrap();
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        (sales, items)
    }

    fn cash(items: Vec<LineItemInput>) -> NewSale {
        NewSale {
            customer_id: None,
            payment_method: PaymentMethod::Cash,
            items,
        }
    }

    fn mid_october() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_totals_match_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mie = seed_product(&db, "MIE", 2_500, 3_500, 10).await;
        let teh = seed_product(&db, "TEH", 4_000, 5_000, 10).await;

        let recorded = db
            .recorder()
            .record(cash(vec![
                LineItemInput::new(&mie.id, 3),
                LineItemInput::new(&teh.id, 2),
            ]))
            .await
            .unwrap();

        assert_eq!(recorded.total_amount, Money::from_cents(3 * 3_500 + 2 * 5_000));
        assert_eq!(recorded.total_profit, Money::from_cents(3 * 1_000 + 2 * 1_000));
        assert_eq!(recorded.item_count, 2);

        let sale = db.sales().get_by_id(&recorded.sale_id).await.unwrap().unwrap();
        let items = db.sales().get_items(&sale.id).await.unwrap();

        let amount: Money = items.iter().map(|i| i.subtotal().unwrap()).sum();
        let profit: Money = items.iter().map(|i| i.profit().unwrap()).sum();
        assert_eq!(sale.total_amount(), amount);
        assert_eq!(sale.total_profit(), profit);
        assert_eq!(items[0].product_id, mie.id);
        assert_eq!(items[1].product_id, teh.id);

        assert_eq!(stock_of(&db, &mie.id).await, 7);
        assert_eq!(stock_of(&db, &teh.id).await, 8);
    }

    #[tokio::test]
    async fn test_negative_profit_is_recorded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let promo = seed_product(&db, "PROMO", 5_000, 4_000, 5).await;

        let recorded = db
            .recorder()
            .record(cash(vec![LineItemInput::new(&promo.id, 2)]))
            .await
            .unwrap();

        assert_eq!(recorded.total_profit, Money::from_cents(-2_000));
    }

    #[tokio::test]
    async fn test_prices_are_snapshotted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kopi = seed_product(&db, "KOPI", 1_000, 1_500, 5).await;

        let recorded = db
            .recorder()
            .record(cash(vec![LineItemInput::new(&kopi.id, 1)]))
            .await
            .unwrap();

        sqlx::query("UPDATE products SET sale_price_cents = 9999 WHERE id = ?1")
            .bind(&kopi.id)
            .execute(db.pool())
            .await
            .unwrap();

        let items = db.sales().get_items(&recorded.sale_id).await.unwrap();
        assert_eq!(items[0].sale_price_cents, 1_500);
        assert_eq!(items[0].cost_price_cents, 1_000);
    }

    #[tokio::test]
    async fn test_empty_items_rejected_without_rows() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.recorder().record(cash(vec![])).await.unwrap_err();

        assert_eq!(err.as_rejection(), Some(&CoreError::NoItems));
        assert_eq!(err.to_string(), "no items submitted");
        assert_eq!(row_counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn test_bad_quantity_rolls_back_earlier_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mie = seed_product(&db, "MIE", 2_500, 3_500, 10).await;

        for bad in [
            LineItemInput::new(&mie.id, 0),
            LineItemInput::new(&mie.id, -4),
            LineItemInput {
                product_id: Some(mie.id.clone()),
                quantity: None,
            },
            LineItemInput {
                product_id: Some("   ".to_string()),
                quantity: Some(1),
            },
        ] {
            let err = db
                .recorder()
                .record(cash(vec![LineItemInput::new(&mie.id, 2), bad]))
                .await
                .unwrap_err();

            assert_eq!(err.to_string(), "invalid item data");
        }

        assert_eq!(stock_of(&db, &mie.id).await, 10);
        assert_eq!(row_counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_everything() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mie = seed_product(&db, "MIE", 2_500, 3_500, 10).await;

        let err = db
            .recorder()
            .record_at(
                cash(vec![
                    LineItemInput::new(&mie.id, 2),
                    LineItemInput::new("ghost", 1),
                ]),
                mid_october(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "insufficient stock for product ghost");
        assert_eq!(stock_of(&db, &mie.id).await, 10);
        assert_eq!(row_counts(&db).await, (0, 0));

        // The sequence bump was rolled back too.
        let recorded = db
            .recorder()
            .record_at(cash(vec![LineItemInput::new(&mie.id, 1)]), mid_october())
            .await
            .unwrap();
        assert_eq!(recorded.invoice_number.as_str(), "INV-202610-001");
    }

    #[tokio::test]
    async fn test_oversell_aborts_whole_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mie = seed_product(&db, "MIE", 2_500, 3_500, 10).await;
        let gula = seed_product(&db, "GULA", 12_000, 14_000, 1).await;

        let err = db
            .recorder()
            .record(cash(vec![
                LineItemInput::new(&mie.id, 4),
                LineItemInput::new(&gula.id, 2),
            ]))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_rejection(),
            Some(&CoreError::insufficient_stock(gula.id.clone()))
        );
        assert_eq!(stock_of(&db, &mie.id).await, 10);
        assert_eq!(stock_of(&db, &gula.id).await, 1);
        assert_eq!(row_counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn test_same_product_twice_counts_against_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let teh = seed_product(&db, "TEH", 4_000, 5_000, 3).await;

        let err = db
            .recorder()
            .record(cash(vec![
                LineItemInput::new(&teh.id, 2),
                LineItemInput::new(&teh.id, 2),
            ]))
            .await
            .unwrap_err();
        assert!(err.as_rejection().is_some());
        assert_eq!(stock_of(&db, &teh.id).await, 3);

        db.recorder()
            .record(cash(vec![
                LineItemInput::new(&teh.id, 1),
                LineItemInput::new(&teh.id, 2),
            ]))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &teh.id).await, 0);
    }

    #[tokio::test]
    async fn test_customer_must_exist() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mie = seed_product(&db, "MIE", 2_500, 3_500, 10).await;

        let mut sale = cash(vec![LineItemInput::new(&mie.id, 1)]);
        sale.customer_id = Some("nobody".to_string());

        let err = db.recorder().record(sale.clone()).await.unwrap_err();
        assert_eq!(err.to_string(), "customer nobody not found");
        assert_eq!(stock_of(&db, &mie.id).await, 10);

        let budi = db
            .customers()
            .insert(&Customer {
                id: generate_customer_id(),
                name: "Budi".to_string(),
                phone: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        sale.customer_id = Some(budi.id.clone());
        sale.payment_method = PaymentMethod::Kredit;

        let recorded = db.recorder().record(sale).await.unwrap();
        let stored = db.sales().get_by_id(&recorded.sale_id).await.unwrap().unwrap();
        assert_eq!(stored.customer_id.as_deref(), Some(budi.id.as_str()));
        assert_eq!(stored.payment_method, PaymentMethod::Kredit);

        let listed = db.sales().list_recent(5).await.unwrap();
        assert_eq!(listed[0].customer_name.as_deref(), Some("Budi"));
        assert_eq!(listed[0].item_count, 1);
    }

    #[tokio::test]
    async fn test_blank_customer_is_walk_in() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mie = seed_product(&db, "MIE", 2_500, 3_500, 10).await;

        let mut sale = cash(vec![LineItemInput::new(&mie.id, 1)]);
        sale.customer_id = Some("  ".to_string());

        let recorded = db.recorder().record(sale).await.unwrap();
        let stored = db.sales().get_by_id(&recorded.sale_id).await.unwrap().unwrap();
        assert_eq!(stored.customer_id, None);
    }

    #[tokio::test]
    async fn test_invoice_numbers_are_sequential_and_unique() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mie = seed_product(&db, "MIE", 2_500, 3_500, 100).await;

        let mut numbers = Vec::new();
        for _ in 0..3 {
            let recorded = db
                .recorder()
                .record_at(cash(vec![LineItemInput::new(&mie.id, 1)]), mid_october())
                .await
                .unwrap();
            numbers.push(recorded.invoice_number.into_string());
        }

        let november = Utc.with_ymd_and_hms(2026, 11, 15, 12, 0, 0).unwrap();
        let next_month = db
            .recorder()
            .record_at(cash(vec![LineItemInput::new(&mie.id, 1)]), november)
            .await
            .unwrap();

        assert_eq!(
            numbers,
            vec!["INV-202610-001", "INV-202610-002", "INV-202610-003"]
        );
        assert_eq!(next_month.invoice_number.as_str(), "INV-202611-001");
    }

    #[tokio::test]
    async fn test_concurrent_sales_of_last_unit() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("kasir.db"))
            .max_connections(4)
            .busy_timeout(Duration::from_secs(10));
        let db = Database::new(config).await.unwrap();
        let last = seed_product(&db, "LAST", 1_000, 2_000, 1).await;

        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let recorder = db.recorder();
                let id = last.id.clone();
                tokio::spawn(async move { recorder.record(cash(vec![LineItemInput::new(id, 1)])).await })
            })
            .collect();

        let mut ok = 0;
        let mut rejected = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => ok += 1,
                Err(err) => {
                    assert_eq!(
                        err.as_rejection(),
                        Some(&CoreError::insufficient_stock(last.id.clone()))
                    );
                    rejected += 1;
                }
            }
        }

        assert_eq!((ok, rejected), (1, 1));
        assert_eq!(stock_of(&db, &last.id).await, 0);
        assert_eq!(row_counts(&db).await, (1, 1));
    }

    #[tokio::test]
    async fn test_concurrent_sales_get_distinct_invoices() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("kasir.db"))
            .max_connections(4)
            .busy_timeout(Duration::from_secs(10));
        let db = Database::new(config).await.unwrap();
        let mie = seed_product(&db, "MIE", 2_500, 3_500, 100).await;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let recorder = db.recorder();
                let id = mie.id.clone();
                tokio::spawn(async move { recorder.record(cash(vec![LineItemInput::new(id, 1)])).await })
            })
            .collect();

        let mut numbers = std::collections::HashSet::new();
        for task in tasks {
            let recorded = task.await.unwrap().unwrap();
            assert!(numbers.insert(recorded.invoice_number.into_string()));
        }

        assert_eq!(numbers.len(), 8);
        assert_eq!(stock_of(&db, &mie.id).await, 92);
    }
}
