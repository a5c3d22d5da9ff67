use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{CompensationMode, Contractor, NewContractor};

pub async fn insert_contractor(
    contractor: NewContractor,
    conn: &mut SqliteConnection,
) -> Result<Contractor, sqlx::Error> {
    let (comp_mode, rate_data) = contractor.comp_mode.as_parts();
    let contractor = sqlx::query_as(
        r#"
            INSERT INTO contractors (handle, display_name, comp_mode, rate_data, specialties)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(contractor.handle)
    .bind(contractor.display_name)
    .bind(comp_mode)
    .bind(rate_data)
    .bind(contractor.specialties)
    .fetch_one(conn)
    .await?;
    Ok(contractor)
}

pub async fn fetch_contractor_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Contractor>, sqlx::Error> {
    let contractor =
        sqlx::query_as("SELECT * FROM contractors WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(contractor)
}

pub async fn fetch_contractor_by_handle(
    handle: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Contractor>, sqlx::Error> {
    let contractor =
        sqlx::query_as("SELECT * FROM contractors WHERE handle = $1").bind(handle).fetch_optional(conn).await?;
    Ok(contractor)
}

/// The candidate pool for automatic assignment. Only approved contractors are considered.
pub async fn approved_contractors(conn: &mut SqliteConnection) -> Result<Vec<Contractor>, sqlx::Error> {
    let contractors = sqlx::query_as("SELECT * FROM contractors WHERE is_approved = 1 ORDER BY id ASC")
        .fetch_all(conn)
        .await?;
    Ok(contractors)
}

pub(crate) async fn set_approval(
    contractor_id: i64,
    approved: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<Contractor>, sqlx::Error> {
    let contractor: Option<Contractor> = sqlx::query_as(
        "UPDATE contractors SET is_approved = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *",
    )
    .bind(contractor_id)
    .bind(approved)
    .fetch_optional(conn)
    .await?;
    if let Some(c) = &contractor {
        debug!("🗃️ Contractor #{contractor_id} approval set to {}", c.is_approved);
    }
    Ok(contractor)
}

pub(crate) async fn update_compensation(
    contractor_id: i64,
    mode: CompensationMode,
    conn: &mut SqliteConnection,
) -> Result<Option<Contractor>, sqlx::Error> {
    let (comp_mode, rate_data) = mode.as_parts();
    let contractor = sqlx::query_as(
        r#"
        UPDATE contractors
        SET comp_mode = $2, rate_data = $3, updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(contractor_id)
    .bind(comp_mode)
    .bind(rate_data)
    .fetch_optional(conn)
    .await?;
    Ok(contractor)
}
