use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{
    CustomOfferRequest,
    NewCustomOfferRequest,
    NewTaskAdditionRequest,
    TaskAdditionRequest,
    TaskRequestStatus,
};

//--------------------------------------  Custom offer requests  ------------------------------------------------------

pub async fn insert_custom_offer(
    request: NewCustomOfferRequest,
    request_no: String,
    conn: &mut SqliteConnection,
) -> Result<CustomOfferRequest, sqlx::Error> {
    let request = sqlx::query_as(
        r#"
            INSERT INTO custom_offer_requests (request_no, customer_id, game, task_type, notes, offered_price,
                uncataloged)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(request_no)
    .bind(request.customer_id)
    .bind(request.game)
    .bind(request.task_type)
    .bind(request.notes)
    .bind(request.offered_price)
    .bind(request.uncataloged)
    .fetch_one(conn)
    .await?;
    Ok(request)
}

pub async fn fetch_custom_offer(
    request_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CustomOfferRequest>, sqlx::Error> {
    let request = sqlx::query_as("SELECT * FROM custom_offer_requests WHERE id = $1")
        .bind(request_id)
        .fetch_optional(conn)
        .await?;
    Ok(request)
}

pub async fn fetch_custom_offer_by_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CustomOfferRequest>, sqlx::Error> {
    let request = sqlx::query_as("SELECT * FROM custom_offer_requests WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(request)
}

/// Unclaimed offer requests, newest first.
pub async fn open_custom_offers(conn: &mut SqliteConnection) -> Result<Vec<CustomOfferRequest>, sqlx::Error> {
    let requests =
        sqlx::query_as("SELECT * FROM custom_offer_requests WHERE status = 'Open' ORDER BY created_at DESC")
            .fetch_all(conn)
            .await?;
    Ok(requests)
}

/// Gives the request to the contractor. The WHERE clause re-checks that it is still open; `None` means another
/// contractor claimed it first and nothing was written.
pub(crate) async fn claim_custom_offer(
    request_id: i64,
    contractor_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CustomOfferRequest>, sqlx::Error> {
    let request = sqlx::query_as(
        r#"
        UPDATE custom_offer_requests
        SET status = 'Claimed', contractor_id = $2
        WHERE id = $1 AND status = 'Open'
        RETURNING *
        "#,
    )
    .bind(request_id)
    .bind(contractor_id)
    .fetch_optional(conn)
    .await?;
    Ok(request)
}

/// Marks the claimed request as paid and links it to the order it became. `None` means the request was not in
/// the `Claimed` state.
pub(crate) async fn mark_request_paid(
    request_id: i64,
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CustomOfferRequest>, sqlx::Error> {
    let request = sqlx::query_as(
        r#"
        UPDATE custom_offer_requests
        SET status = 'Paid', order_id = $2
        WHERE id = $1 AND status = 'Claimed'
        RETURNING *
        "#,
    )
    .bind(request_id)
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    Ok(request)
}

//--------------------------------------  Task addition requests  -----------------------------------------------------

pub async fn insert_task_request(
    request: NewTaskAdditionRequest,
    conn: &mut SqliteConnection,
) -> Result<TaskAdditionRequest, sqlx::Error> {
    let request = sqlx::query_as(
        r#"
            INSERT INTO task_addition_requests (contractor_id, game, task_type, contractor_price, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(request.contractor_id)
    .bind(request.game)
    .bind(request.task_type)
    .bind(request.contractor_price)
    .bind(request.note)
    .fetch_one(conn)
    .await?;
    Ok(request)
}

pub async fn fetch_task_request(
    request_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<TaskAdditionRequest>, sqlx::Error> {
    let request = sqlx::query_as("SELECT * FROM task_addition_requests WHERE id = $1")
        .bind(request_id)
        .fetch_optional(conn)
        .await?;
    Ok(request)
}

/// The review queue, oldest first.
pub async fn pending_task_requests(conn: &mut SqliteConnection) -> Result<Vec<TaskAdditionRequest>, sqlx::Error> {
    let requests =
        sqlx::query_as("SELECT * FROM task_addition_requests WHERE status = 'Pending' ORDER BY created_at ASC")
            .fetch_all(conn)
            .await?;
    Ok(requests)
}

/// Records the review decision. The WHERE clause re-checks that the request is still pending; `None` means it
/// was already decided and nothing was written.
pub(crate) async fn decide_task_request(
    request_id: i64,
    decision: TaskRequestStatus,
    review_note: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<TaskAdditionRequest>, sqlx::Error> {
    let request: Option<TaskAdditionRequest> = sqlx::query_as(
        r#"
        UPDATE task_addition_requests
        SET status = $2, review_note = $3, reviewed_at = CURRENT_TIMESTAMP
        WHERE id = $1 AND status = 'Pending'
        RETURNING *
        "#,
    )
    .bind(request_id)
    .bind(decision)
    .bind(review_note)
    .fetch_optional(conn)
    .await?;
    if let Some(r) = &request {
        debug!("🗃️ Task request #{request_id} decided: {}", r.status);
    }
    Ok(request)
}
