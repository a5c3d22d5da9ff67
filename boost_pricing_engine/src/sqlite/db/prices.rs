use bpe_common::Money;
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{NewPriceEntry, PriceEntry};

pub async fn insert_price_entry(entry: NewPriceEntry, conn: &mut SqliteConnection) -> Result<PriceEntry, sqlx::Error> {
    let entry = sqlx::query_as(
        r#"
            INSERT INTO price_entries (game, task_type, service_type, price, unit, remark)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(entry.game)
    .bind(entry.task_type)
    .bind(entry.service_type)
    .bind(entry.price)
    .bind(entry.unit)
    .bind(entry.remark)
    .fetch_one(conn)
    .await?;
    Ok(entry)
}

pub(crate) async fn update_price(
    entry_id: i64,
    price: Money,
    conn: &mut SqliteConnection,
) -> Result<Option<PriceEntry>, sqlx::Error> {
    let entry = sqlx::query_as(
        "UPDATE price_entries SET price = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *",
    )
    .bind(entry_id)
    .bind(price)
    .fetch_optional(conn)
    .await?;
    Ok(entry)
}

/// Looks up the catalog entry for an exact `(game, task_type)` pair. When the same task exists under several
/// service types the oldest entry wins.
pub async fn fetch_price_entry(
    game: &str,
    task_type: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<PriceEntry>, sqlx::Error> {
    let entry =
        sqlx::query_as("SELECT * FROM price_entries WHERE game = $1 AND task_type = $2 ORDER BY id ASC LIMIT 1")
            .bind(game.trim())
            .bind(task_type.trim())
            .fetch_optional(conn)
            .await?;
    Ok(entry)
}

pub async fn entries_for_game(game: &str, conn: &mut SqliteConnection) -> Result<Vec<PriceEntry>, sqlx::Error> {
    let entries = sqlx::query_as("SELECT * FROM price_entries WHERE game = $1 ORDER BY id ASC")
        .bind(game.trim())
        .fetch_all(conn)
        .await?;
    Ok(entries)
}

pub async fn all_entries(conn: &mut SqliteConnection) -> Result<Vec<PriceEntry>, sqlx::Error> {
    let entries =
        sqlx::query_as("SELECT * FROM price_entries ORDER BY game ASC, id ASC").fetch_all(conn).await?;
    Ok(entries)
}

/// Inserts the entry, or re-prices the existing row for the same `(game, task_type)` pair. Used when a completed
/// off-catalog offer is folded back into the catalog.
pub(crate) async fn upsert_entry(entry: NewPriceEntry, conn: &mut SqliteConnection) -> Result<PriceEntry, sqlx::Error> {
    match fetch_price_entry(&entry.game, &entry.task_type, conn).await? {
        Some(existing) => {
            debug!("🗃️ Catalog entry '{}' already exists. Updating its price.", existing.task_type);
            let updated = update_price(existing.id, entry.price, conn).await?;
            Ok(updated.unwrap_or(existing))
        },
        None => insert_price_entry(entry, conn).await,
    }
}
