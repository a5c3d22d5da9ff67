use bpe_common::Money;
use thiserror::Error;

use crate::{
    db_types::{Customer, CustomOfferRequest, NewOrder, NewPriceEntry, Order, OrderId, OrderStatus, PriceEntry, TaskAdditionRequest},
    traits::{
        data_objects::InsertOrderResult,
        ContractorManagement,
        CustomerManagement,
        OrderManagement,
        PriceBookManagement,
    },
};

#[derive(Debug, Clone, Error)]
pub enum MarketplaceError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order with id {0} does not exist")]
    OrderIdNotFound(i64),
    #[error("Contractor {0} does not exist")]
    ContractorNotFound(i64),
    #[error("Customer {0} does not exist")]
    CustomerNotFound(i64),
    #[error("Custom offer request {0} does not exist")]
    RequestNotFound(i64),
    #[error("Task addition request {0} does not exist")]
    TaskRequestNotFound(i64),
    #[error("Price entry {0} does not exist")]
    PriceEntryNotFound(i64),
    #[error("User error constructing query: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for MarketplaceError {
    fn from(e: sqlx::Error) -> Self {
        MarketplaceError::DatabaseError(e.to_string())
    }
}

/// The top-level behavior a backend must provide to run the engine. Everything here that touches more than one
/// entity happens inside a single transaction on the backend.
#[allow(async_fn_in_trait)]
pub trait MarketplaceDatabase:
    Clone + OrderManagement + ContractorManagement + CustomerManagement + PriceBookManagement
{
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Stores a new order. Intake is idempotent on the order number: if an order with the same number already
    /// exists, nothing is written and the existing order is returned.
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, MarketplaceError>;

    /// Marks an unpaid order as paid (recording `paid_at`) and places it in the assignable pool.
    ///
    /// Returns `None` when the order is already paid; the guard lives in the UPDATE itself so a double payment
    /// signal cannot fire twice.
    async fn mark_order_paid(&self, order_no: &OrderId) -> Result<Option<Order>, MarketplaceError>;

    /// Hands the order to the contractor at the given reward and moves it to `InProgress`.
    ///
    /// The UPDATE re-checks that the order is still unassigned and awaiting assignment; `None` means another
    /// assigner got there first (or the order left the pool) and nothing was written.
    async fn assign_order(&self, order_id: i64, contractor_id: i64, reward: Money)
        -> Result<Option<Order>, MarketplaceError>;

    /// Moves an order from the `from` work status to `to`. The UPDATE re-checks `from`; `None` means the order was
    /// no longer in that state and nothing was written.
    async fn update_order_status(
        &self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, MarketplaceError>;

    /// Settlement for one completed order, in a single transaction:
    /// * adds `amount` to the customer's `total_spent` and recomputes their loyalty tier;
    /// * when `backfill` is given, upserts that catalog entry (update the price of the first `(game, task_type)`
    ///   row if one exists, insert otherwise).
    async fn settle_completed_order(
        &self,
        customer_id: i64,
        amount: Money,
        backfill: Option<NewPriceEntry>,
    ) -> Result<Customer, MarketplaceError>;

    /// Converts a claimed custom offer request into a live order in a single transaction: inserts the order (paid,
    /// in progress, assigned to the claimer, at the given reward), marks the request `Paid` and links the order id
    /// back to it.
    ///
    /// Returns `None` when the request is not in the `Claimed` state.
    async fn convert_request_to_order(
        &self,
        request_id: i64,
        order: NewOrder,
        reward: Money,
    ) -> Result<Option<(Order, CustomOfferRequest)>, MarketplaceError>;

    /// Approval of a task-addition request, in a single transaction: inserts the catalog entry, upserts the
    /// requesting contractor's quote at their submitted price, and marks the request `Approved`.
    ///
    /// Returns `None` when the request is no longer `Pending`.
    async fn approve_task_request(
        &self,
        request_id: i64,
        entry: NewPriceEntry,
    ) -> Result<Option<(TaskAdditionRequest, PriceEntry)>, MarketplaceError>;
}
