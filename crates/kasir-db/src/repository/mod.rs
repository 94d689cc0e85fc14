//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list_in_stock()                                 │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list_in_stock(&self)            ← pool-backed reads               │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── decrement_stock_in_tx(conn, ..) ← runs in the caller's tx         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods taking `&self` use the pool. Associated functions ending in
//! `_in_tx` take a `&mut SqliteConnection` and are used by
//! [`crate::recorder::SaleRecorder`] inside its transaction.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Products and stock
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers
//! - [`SaleRepository`](sale::SaleRepository) - Sales, sale items, invoice sequence

pub mod customer;
pub mod product;
pub mod sale;
