//! # Seed Data Generator
//!
//! Populates the database with demo products and customers for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kasir.db (default)
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! Prices are whole Rupiah (the store runs with 0 currency decimals).
//! A few products are seeded with little or no stock so the "insufficient
//! stock" path can be tried from the form.

use chrono::Utc;
use kasir_core::{Customer, Product};
use kasir_db::repository::customer::generate_customer_id;
use kasir_db::repository::product::generate_product_id;
use kasir_db::{Database, DbConfig};
use std::env;

/// (sku, name, cost, sale price, stock)
const PRODUCTS: &[(&str, &str, i64, i64, i64)] = &[
    ("MIE-GRG", "Indomie Goreng", 2_600, 3_500, 120),
    ("MIE-SOTO", "Indomie Soto", 2_500, 3_300, 80),
    ("AQUA-600", "Aqua 600ml", 2_800, 4_000, 96),
    ("TEH-BTL", "Teh Botol Sosro 450ml", 4_200, 5_500, 48),
    ("KOPI-KA", "Kopi Kapal Api Sachet", 1_100, 1_500, 200),
    ("GULA-1KG", "Gula Pasir 1kg", 14_500, 17_000, 25),
    ("BRS-5KG", "Beras Premium 5kg", 68_000, 76_000, 10),
    ("MNYK-1L", "Minyak Goreng 1L", 15_000, 18_500, 30),
    ("TLR-10", "Telur Ayam (10 butir)", 21_000, 25_000, 2),
    ("SBN-LFB", "Sabun Lifebuoy", 3_400, 4_500, 1),
    ("ROKOK-SMP", "Sampoerna Mild 16", 29_000, 32_000, 0),
];

/// (name, phone)
const CUSTOMERS: &[(&str, Option<&str>)] = &[
    ("Budi Santoso", Some("0812-3456-7890")),
    ("Siti Aminah", Some("0813-2222-1111")),
    ("Warung Bu Tini", None),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kasir.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    for (sku, name, cost, price, stock) in PRODUCTS {
        let product = Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: name.to_string(),
            cost_price_cents: *cost,
            sale_price_cents: *price,
            stock: *stock,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.sku, e);
        }
    }
    println!("✓ Inserted {} products", db.products().count().await?);

    for (name, phone) in CUSTOMERS {
        let customer = Customer {
            id: generate_customer_id(),
            name: name.to_string(),
            phone: phone.map(str::to_string),
            created_at: now,
        };

        if let Err(e) = db.customers().insert(&customer).await {
            eprintln!("Failed to insert customer {}: {}", customer.name, e);
        }
    }
    println!("✓ Inserted {} customers", db.customers().list().await?.len());

    let sellable = db.products().list_in_stock().await?;
    println!("  In stock: {} products", sellable.len());

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
