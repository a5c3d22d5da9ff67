//! `SqliteDatabase` is a concrete implementation of a boost pricing engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
use std::fmt::Debug;

use bpe_common::Money;
use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqlitePool;

use super::db::{contractors, customers, db_url, new_pool, orders, prices, quotes, requests};
use crate::{
    db_types::{
        CompensationMode,
        Contractor,
        ContractorQuote,
        CustomOfferRequest,
        Customer,
        LoyaltyTier,
        NewContractor,
        NewCustomOfferRequest,
        NewCustomer,
        NewOrder,
        NewPriceEntry,
        NewTaskAdditionRequest,
        Order,
        OrderId,
        OrderStatus,
        PriceEntry,
        RequestStatus,
        ServiceType,
        TaskAdditionRequest,
        TaskRequestStatus,
    },
    helpers::new_request_no,
    order_objects::OrderQueryFilter,
    traits::{
        ContractorManagement,
        CustomerManagement,
        InsertOrderResult,
        MarketplaceDatabase,
        MarketplaceError,
        OrderManagement,
        PriceBookManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl MarketplaceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let result = orders::idempotent_insert(order, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn mark_order_paid(&self, order_no: &OrderId) -> Result<Option<Order>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::mark_order_paid(order_no, &mut conn).await?;
        if let Some(o) = &order {
            debug!("🗃️ Order [{}] marked as paid at {:?}", o.order_no, o.paid_at);
        }
        Ok(order)
    }

    async fn assign_order(
        &self,
        order_id: i64,
        contractor_id: i64,
        reward: Money,
    ) -> Result<Option<Order>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::assign_order(order_id, contractor_id, reward, &mut conn).await?;
        Ok(order)
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_order_status(order_id, from, to, &mut conn).await?;
        Ok(order)
    }

    /// Settles one completed order in a single atomic transaction,
    /// * adds the order price to the customer's lifetime spend,
    /// * recomputes the loyalty tier from the new total,
    /// * folds the backfill entry into the catalog, when one is given.
    async fn settle_completed_order(
        &self,
        customer_id: i64,
        amount: Money,
        backfill: Option<NewPriceEntry>,
    ) -> Result<Customer, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let customer = customers::add_spend(customer_id, amount, &mut tx)
            .await?
            .ok_or(MarketplaceError::CustomerNotFound(customer_id))?;
        let tier = LoyaltyTier::for_total_spent(customer.total_spent);
        let customer = customers::set_tier(customer_id, tier, &mut tx)
            .await?
            .ok_or(MarketplaceError::CustomerNotFound(customer_id))?;
        if let Some(entry) = backfill {
            let entry = prices::upsert_entry(entry, &mut tx).await?;
            debug!("🗃️ Catalog backfill: '{}' for {} now lists at {}", entry.task_type, entry.game, entry.price);
        }
        tx.commit().await?;
        Ok(customer)
    }

    async fn convert_request_to_order(
        &self,
        request_id: i64,
        order: NewOrder,
        reward: Money,
    ) -> Result<Option<(Order, CustomOfferRequest)>, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let Some(request) = requests::fetch_custom_offer(request_id, &mut tx).await? else {
            return Ok(None);
        };
        let (RequestStatus::Claimed, Some(contractor_id)) = (request.status, request.contractor_id) else {
            trace!("🗃️ Request #{request_id} is {} and cannot be converted into an order", request.status);
            return Ok(None);
        };
        let order = orders::insert_converted_order(order, contractor_id, reward, &mut tx).await?;
        // Dropping tx without commit rolls the order insert back if the request moved in the meantime.
        let Some(request) = requests::mark_request_paid(request_id, order.id, &mut tx).await? else {
            return Ok(None);
        };
        tx.commit().await?;
        debug!("🗃️ Request [{}] converted into order [{}]", request.request_no, order.order_no);
        Ok(Some((order, request)))
    }

    async fn approve_task_request(
        &self,
        request_id: i64,
        entry: NewPriceEntry,
    ) -> Result<Option<(TaskAdditionRequest, PriceEntry)>, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let decision = requests::decide_task_request(request_id, TaskRequestStatus::Approved, None, &mut tx).await?;
        let Some(request) = decision else {
            return Ok(None);
        };
        let entry = prices::insert_price_entry(entry, &mut tx).await?;
        quotes::upsert_quote(
            request.contractor_id,
            &entry.game,
            &entry.task_type,
            entry.service_type,
            request.contractor_price,
            &mut tx,
        )
        .await?;
        tx.commit().await?;
        debug!("🗃️ Task request #{request_id} approved. '{}' added to the catalog at {}", entry.task_type, entry.price);
        Ok(Some((request, entry)))
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_order_no(&self, order_no: &OrderId) -> Result<Option<Order>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_no(order_no, &mut conn).await?;
        Ok(order)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn assignable_orders(&self) -> Result<Vec<Order>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::assignable_orders(&mut conn).await?;
        Ok(orders)
    }

    async fn in_progress_count(&self, contractor_id: i64) -> Result<i64, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let count = orders::in_progress_count(contractor_id, &mut conn).await?;
        Ok(count)
    }

    async fn completed_count_since(
        &self,
        contractor_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let count = orders::completed_count_since(contractor_id, since, &mut conn).await?;
        Ok(count)
    }

    async fn insert_custom_offer(
        &self,
        request: NewCustomOfferRequest,
    ) -> Result<CustomOfferRequest, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let request = requests::insert_custom_offer(request, new_request_no(), &mut conn).await?;
        debug!("🗃️ Custom offer request [{}] saved with id {}", request.request_no, request.id);
        Ok(request)
    }

    async fn fetch_custom_offer(&self, id: i64) -> Result<Option<CustomOfferRequest>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let request = requests::fetch_custom_offer(id, &mut conn).await?;
        Ok(request)
    }

    async fn fetch_custom_offer_by_order(
        &self,
        order_id: i64,
    ) -> Result<Option<CustomOfferRequest>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let request = requests::fetch_custom_offer_by_order(order_id, &mut conn).await?;
        Ok(request)
    }

    async fn open_custom_offers(&self) -> Result<Vec<CustomOfferRequest>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let requests = requests::open_custom_offers(&mut conn).await?;
        Ok(requests)
    }

    async fn claim_custom_offer(
        &self,
        request_id: i64,
        contractor_id: i64,
    ) -> Result<Option<CustomOfferRequest>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let request = requests::claim_custom_offer(request_id, contractor_id, &mut conn).await?;
        if let Some(r) = &request {
            debug!("🗃️ Request [{}] claimed by contractor #{contractor_id}", r.request_no);
        }
        Ok(request)
    }
}

impl ContractorManagement for SqliteDatabase {
    async fn insert_contractor(&self, contractor: NewContractor) -> Result<Contractor, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contractor = contractors::insert_contractor(contractor, &mut conn).await?;
        Ok(contractor)
    }

    async fn fetch_contractor(&self, id: i64) -> Result<Option<Contractor>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contractor = contractors::fetch_contractor_by_id(id, &mut conn).await?;
        Ok(contractor)
    }

    async fn fetch_contractor_by_handle(&self, handle: &str) -> Result<Option<Contractor>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contractor = contractors::fetch_contractor_by_handle(handle, &mut conn).await?;
        Ok(contractor)
    }

    async fn approved_contractors(&self) -> Result<Vec<Contractor>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contractors = contractors::approved_contractors(&mut conn).await?;
        Ok(contractors)
    }

    async fn set_contractor_approval(&self, id: i64, approved: bool) -> Result<Contractor, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contractor = contractors::set_approval(id, approved, &mut conn)
            .await?
            .ok_or(MarketplaceError::ContractorNotFound(id))?;
        Ok(contractor)
    }

    async fn update_compensation(&self, id: i64, mode: CompensationMode) -> Result<Contractor, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contractor = contractors::update_compensation(id, mode, &mut conn)
            .await?
            .ok_or(MarketplaceError::ContractorNotFound(id))?;
        Ok(contractor)
    }
}

impl CustomerManagement for SqliteDatabase {
    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::insert_customer(customer, &mut conn).await?;
        Ok(customer)
    }

    async fn fetch_customer(&self, id: i64) -> Result<Option<Customer>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::fetch_customer_by_id(id, &mut conn).await?;
        Ok(customer)
    }

    async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::fetch_customer_by_phone(phone, &mut conn).await?;
        Ok(customer)
    }
}

impl PriceBookManagement for SqliteDatabase {
    async fn insert_price_entry(&self, entry: NewPriceEntry) -> Result<PriceEntry, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let entry = prices::insert_price_entry(entry, &mut conn).await?;
        Ok(entry)
    }

    async fn update_price_entry(&self, id: i64, price: Money) -> Result<PriceEntry, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let entry =
            prices::update_price(id, price, &mut conn).await?.ok_or(MarketplaceError::PriceEntryNotFound(id))?;
        Ok(entry)
    }

    async fn fetch_price_entry(&self, game: &str, task_type: &str) -> Result<Option<PriceEntry>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let entry = prices::fetch_price_entry(game, task_type, &mut conn).await?;
        Ok(entry)
    }

    async fn entries_for_game(&self, game: &str) -> Result<Vec<PriceEntry>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let entries = prices::entries_for_game(game, &mut conn).await?;
        Ok(entries)
    }

    async fn all_price_entries(&self) -> Result<Vec<PriceEntry>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let entries = prices::all_entries(&mut conn).await?;
        Ok(entries)
    }

    async fn fetch_quote(
        &self,
        contractor_id: i64,
        game: &str,
        task_type: &str,
    ) -> Result<Option<ContractorQuote>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let quote = quotes::fetch_quote(contractor_id, game, task_type, &mut conn).await?;
        Ok(quote)
    }

    async fn upsert_quote(
        &self,
        contractor_id: i64,
        game: &str,
        task_type: &str,
        service_type: ServiceType,
        price: Money,
    ) -> Result<ContractorQuote, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let quote = quotes::upsert_quote(contractor_id, game, task_type, service_type, price, &mut conn).await?;
        Ok(quote)
    }

    async fn quotes_for_contractor(&self, contractor_id: i64) -> Result<Vec<ContractorQuote>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let quotes = quotes::quotes_for_contractor(contractor_id, &mut conn).await?;
        Ok(quotes)
    }

    async fn insert_task_request(
        &self,
        request: NewTaskAdditionRequest,
    ) -> Result<TaskAdditionRequest, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let request = requests::insert_task_request(request, &mut conn).await?;
        Ok(request)
    }

    async fn fetch_task_request(&self, id: i64) -> Result<Option<TaskAdditionRequest>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let request = requests::fetch_task_request(id, &mut conn).await?;
        Ok(request)
    }

    async fn pending_task_requests(&self) -> Result<Vec<TaskAdditionRequest>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let requests = requests::pending_task_requests(&mut conn).await?;
        Ok(requests)
    }

    async fn decide_task_request(
        &self,
        id: i64,
        status: TaskRequestStatus,
        review_note: Option<&str>,
    ) -> Result<Option<TaskAdditionRequest>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let request = requests::decide_task_request(id, status, review_note, &mut conn).await?;
        Ok(request)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
