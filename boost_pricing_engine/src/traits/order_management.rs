use chrono::{DateTime, Utc};

use crate::{
    db_types::{CustomOfferRequest, NewCustomOfferRequest, Order, OrderId},
    order_objects::OrderQueryFilter,
    traits::MarketplaceError,
};

/// Queries and single-entity operations over orders and custom offer requests.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, MarketplaceError>;

    async fn fetch_order_by_order_no(&self, order_no: &OrderId) -> Result<Option<Order>, MarketplaceError>;

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, MarketplaceError>;

    /// The assignable pool: paid, unassigned orders awaiting assignment, oldest first.
    async fn assignable_orders(&self) -> Result<Vec<Order>, MarketplaceError>;

    /// How many orders the contractor currently has in progress.
    async fn in_progress_count(&self, contractor_id: i64) -> Result<i64, MarketplaceError>;

    /// How many of the contractor's orders created on or after `since` are completed. Used for the monthly tier
    /// schedule with `since` at the start of the current calendar month.
    async fn completed_count_since(&self, contractor_id: i64, since: DateTime<Utc>)
        -> Result<i64, MarketplaceError>;

    async fn insert_custom_offer(&self, request: NewCustomOfferRequest)
        -> Result<CustomOfferRequest, MarketplaceError>;

    async fn fetch_custom_offer(&self, id: i64) -> Result<Option<CustomOfferRequest>, MarketplaceError>;

    /// The request a converted order originated from, if any.
    async fn fetch_custom_offer_by_order(&self, order_id: i64)
        -> Result<Option<CustomOfferRequest>, MarketplaceError>;

    /// All requests still waiting for a contractor, newest first.
    async fn open_custom_offers(&self) -> Result<Vec<CustomOfferRequest>, MarketplaceError>;

    /// Claims an open request for the contractor. The UPDATE re-checks that the request is still `Open`; `None`
    /// means it was already claimed (or does not exist) and nothing was written.
    async fn claim_custom_offer(&self, request_id: i64, contractor_id: i64)
        -> Result<Option<CustomOfferRequest>, MarketplaceError>;
}
