use bpe_common::Money;
use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    order_objects::OrderQueryFilter,
    traits::{InsertOrderResult, MarketplaceError},
};

/// Inserts the order if its order number is new, returning the stored order either way.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<InsertOrderResult, MarketplaceError> {
    let result = match fetch_order_by_order_no(&order.order_no, conn).await? {
        Some(order) => InsertOrderResult::AlreadyExists(order),
        None => {
            let order = insert_order(order, conn).await?;
            debug!("🗃️ Order [{}] inserted with id {}", order.order_no, order.id);
            InsertOrderResult::Inserted(order)
        },
    };
    Ok(result)
}

/// Inserts a new order using the given connection. This is not atomic on its own. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
///
/// The order starts `AwaitingAssignment` and `Unpaid`; the schema defaults take care of that.
async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, MarketplaceError> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_no,
                game,
                task_type,
                service_type,
                customer_price,
                customer_id,
                notes,
                is_custom_offer
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(order.order_no)
    .bind(order.game)
    .bind(order.task_type)
    .bind(order.service_type)
    .bind(order.customer_price)
    .bind(order.customer_id)
    .bind(order.notes)
    .bind(order.is_custom_offer)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

/// Inserts the order a paid custom offer request converts into: born paid, in progress and assigned.
pub(crate) async fn insert_converted_order(
    order: NewOrder,
    contractor_id: i64,
    reward: Money,
    conn: &mut SqliteConnection,
) -> Result<Order, MarketplaceError> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_no,
                game,
                task_type,
                service_type,
                customer_price,
                customer_id,
                notes,
                is_custom_offer,
                contractor_id,
                contractor_reward,
                status,
                payment_status,
                paid_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'InProgress', 'Paid', CURRENT_TIMESTAMP)
            RETURNING *;
        "#,
    )
    .bind(order.order_no)
    .bind(order.game)
    .bind(order.task_type)
    .bind(order.service_type)
    .bind(order.customer_price)
    .bind(order.customer_id)
    .bind(order.notes)
    .bind(order.is_custom_offer)
    .bind(contractor_id)
    .bind(reward)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_order_no(
    order_no: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE order_no = $1")
        .bind(order_no.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are ordered by `created_at` in ascending order
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM orders
    "#,
    );
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(order_no) = query.order_no {
        where_clause.push("order_no = ");
        where_clause.push_bind_unseparated(order_no.0);
    }
    if let Some(customer_id) = query.customer_id {
        where_clause.push("customer_id = ");
        where_clause.push_bind_unseparated(customer_id);
    }
    if let Some(contractor_id) = query.contractor_id {
        where_clause.push("contractor_id = ");
        where_clause.push_bind_unseparated(contractor_id);
    }
    if let Some(game) = query.game {
        where_clause.push("game = ");
        where_clause.push_bind_unseparated(game);
    }
    if let Some(payment_status) = query.payment_status {
        where_clause.push("payment_status = ");
        where_clause.push_bind_unseparated(payment_status.to_string());
    }
    if query.unassigned_only {
        where_clause.push("contractor_id IS NULL");
    }
    if query.statuses.as_ref().map(|s| !s.is_empty()).unwrap_or(false) {
        let mut statuses = vec![];
        query.statuses.as_ref().unwrap_or(&vec![]).iter().for_each(|s| {
            statuses.push(format!("'{s}'"));
        });
        let status_clause = statuses.join(",");
        where_clause.push(format!("status IN ({status_clause})"));
    }
    if let Some(since) = query.since {
        where_clause.push("created_at >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("created_at <= ");
        where_clause.push_bind_unseparated(until);
    }
    builder.push(" ORDER BY created_at ASC");

    trace!("🗃️ Executing query: {}", builder.sql());
    let query = builder.build_query_as::<Order>();
    let orders = query.fetch_all(conn).await?;
    trace!("🗃️ Result of search_orders: {:?}", orders.len());
    Ok(orders)
}

/// The assignable pool: paid, unassigned orders awaiting assignment, oldest first.
pub async fn assignable_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as(
        r#"
        SELECT * FROM orders
        WHERE status = 'AwaitingAssignment' AND payment_status = 'Paid' AND contractor_id IS NULL
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

pub async fn in_progress_count(contractor_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE contractor_id = $1 AND status = 'InProgress'")
            .bind(contractor_id)
            .fetch_one(conn)
            .await?;
    Ok(count)
}

pub async fn completed_count_since(
    contractor_id: i64,
    since: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders WHERE contractor_id = $1 AND status = 'Completed' AND created_at >= $2",
    )
    .bind(contractor_id)
    .bind(since)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

/// Marks the order as paid. The WHERE clause re-checks that it is still unpaid; `None` means another writer
/// paid it first and nothing was written.
pub(crate) async fn mark_order_paid(
    order_no: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
        UPDATE orders
        SET payment_status = 'Paid', paid_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
        WHERE order_no = $1 AND payment_status = 'Unpaid'
        RETURNING *
        "#,
    )
    .bind(order_no.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Hands the order to the contractor. The WHERE clause re-checks that the order is still in the pool;
/// `None` means another assigner won the race and nothing was written.
pub(crate) async fn assign_order(
    order_id: i64,
    contractor_id: i64,
    reward: Money,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
        UPDATE orders
        SET contractor_id = $2, contractor_reward = $3, status = 'InProgress', updated_at = CURRENT_TIMESTAMP
        WHERE id = $1 AND contractor_id IS NULL AND status = 'AwaitingAssignment'
        RETURNING *
        "#,
    )
    .bind(order_id)
    .bind(contractor_id)
    .bind(reward)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Moves the order from the `from` status to `to`. The WHERE clause re-checks `from`; `None` means the order
/// left that status first and nothing was written.
pub(crate) async fn update_order_status(
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        "UPDATE orders SET status = $3, updated_at = CURRENT_TIMESTAMP WHERE id = $1 AND status = $2 RETURNING *",
    )
    .bind(order_id)
    .bind(from)
    .bind(to)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
