use bpe_common::Money;
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{Customer, LoyaltyTier, NewCustomer};

pub async fn insert_customer(customer: NewCustomer, conn: &mut SqliteConnection) -> Result<Customer, sqlx::Error> {
    let customer = sqlx::query_as("INSERT INTO customers (phone, name) VALUES ($1, $2) RETURNING *;")
        .bind(customer.phone)
        .bind(customer.name)
        .fetch_one(conn)
        .await?;
    Ok(customer)
}

pub async fn fetch_customer_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Customer>, sqlx::Error> {
    let customer = sqlx::query_as("SELECT * FROM customers WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(customer)
}

pub async fn fetch_customer_by_phone(
    phone: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Customer>, sqlx::Error> {
    let customer =
        sqlx::query_as("SELECT * FROM customers WHERE phone = $1").bind(phone).fetch_optional(conn).await?;
    Ok(customer)
}

/// Adds `amount` to the customer's lifetime spend and returns the updated row.
pub(crate) async fn add_spend(
    customer_id: i64,
    amount: Money,
    conn: &mut SqliteConnection,
) -> Result<Option<Customer>, sqlx::Error> {
    let customer: Option<Customer> = sqlx::query_as(
        r#"
        UPDATE customers
        SET total_spent = total_spent + $2, updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(customer_id)
    .bind(amount)
    .fetch_optional(conn)
    .await?;
    if let Some(c) = &customer {
        debug!("🗃️ Customer #{customer_id} lifetime spend is now {}", c.total_spent);
    }
    Ok(customer)
}

pub(crate) async fn set_tier(
    customer_id: i64,
    tier: LoyaltyTier,
    conn: &mut SqliteConnection,
) -> Result<Option<Customer>, sqlx::Error> {
    let customer =
        sqlx::query_as("UPDATE customers SET tier = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *")
            .bind(customer_id)
            .bind(tier)
            .fetch_optional(conn)
            .await?;
    Ok(customer)
}
