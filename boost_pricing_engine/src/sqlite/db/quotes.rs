use bpe_common::Money;
use sqlx::SqliteConnection;

use crate::db_types::{ContractorQuote, ServiceType};

pub async fn fetch_quote(
    contractor_id: i64,
    game: &str,
    task_type: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<ContractorQuote>, sqlx::Error> {
    let quote = sqlx::query_as(
        "SELECT * FROM contractor_quotes WHERE contractor_id = $1 AND game = $2 AND task_type = $3",
    )
    .bind(contractor_id)
    .bind(game.trim())
    .bind(task_type.trim())
    .fetch_optional(conn)
    .await?;
    Ok(quote)
}

pub async fn quotes_for_contractor(
    contractor_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ContractorQuote>, sqlx::Error> {
    let quotes = sqlx::query_as(
        "SELECT * FROM contractor_quotes WHERE contractor_id = $1 ORDER BY game ASC, task_type ASC",
    )
    .bind(contractor_id)
    .fetch_all(conn)
    .await?;
    Ok(quotes)
}

/// Saves the contractor's asking price for a catalog task. A re-quote for the same task replaces the old price.
pub(crate) async fn upsert_quote(
    contractor_id: i64,
    game: &str,
    task_type: &str,
    service_type: ServiceType,
    price: Money,
    conn: &mut SqliteConnection,
) -> Result<ContractorQuote, sqlx::Error> {
    let quote = sqlx::query_as(
        r#"
        INSERT INTO contractor_quotes (contractor_id, game, task_type, service_type, price)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (contractor_id, game, task_type) DO UPDATE
        SET price = excluded.price, service_type = excluded.service_type, updated_at = CURRENT_TIMESTAMP
        RETURNING *
        "#,
    )
    .bind(contractor_id)
    .bind(game.trim())
    .bind(task_type.trim())
    .bind(service_type)
    .bind(price)
    .fetch_one(conn)
    .await?;
    Ok(quote)
}
