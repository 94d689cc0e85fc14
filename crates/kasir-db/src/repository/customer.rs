//! # Customer Repository
//!
//! Customers are read-only while a sale is recorded; the form lists them
//! and the recorder checks that a chosen one exists.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kasir_core::Customer;

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists all customers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers: Vec<Customer> = sqlx::query_as(
            r#"
            SELECT id, name, phone, created_at
            FROM customers
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = customers.len(), "Listed customers");
        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer: Option<Customer> = sqlx::query_as(
            "SELECT id, name, phone, created_at FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<Customer> {
        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer.clone())
    }

    /// Returns true if the customer exists, inside the caller's transaction.
    pub async fn exists_in_tx(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM customers WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(found.is_some())
    }
}

/// Generates a new customer ID.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn customer(name: &str, phone: Option<&str>) -> Customer {
        Customer {
            id: generate_customer_id(),
            name: name.to_string(),
            phone: phone.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_list_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let siti = repo.insert(&customer("Siti", Some("0812-1111-2222"))).await.unwrap();
        repo.insert(&customer("Budi", None)).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Budi", "Siti"]);

        let fetched = repo.get_by_id(&siti.id).await.unwrap().unwrap();
        assert_eq!(fetched.phone.as_deref(), Some("0812-1111-2222"));
    }

    #[tokio::test]
    async fn test_exists_in_tx() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let budi = db.customers().insert(&customer("Budi", None)).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(CustomerRepository::exists_in_tx(&mut conn, &budi.id).await.unwrap());
        assert!(!CustomerRepository::exists_in_tx(&mut conn, "nope").await.unwrap());
    }
}
