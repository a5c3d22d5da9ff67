use bpe_common::Money;

use crate::{
    db_types::{
        ContractorQuote,
        NewPriceEntry,
        NewTaskAdditionRequest,
        PriceEntry,
        ServiceType,
        TaskAdditionRequest,
        TaskRequestStatus,
    },
    traits::MarketplaceError,
};

/// The canonical price catalog, contractor quotes and task-addition requests.
#[allow(async_fn_in_trait)]
pub trait PriceBookManagement {
    async fn insert_price_entry(&self, entry: NewPriceEntry) -> Result<PriceEntry, MarketplaceError>;

    async fn update_price_entry(&self, id: i64, price: Money) -> Result<PriceEntry, MarketplaceError>;

    /// The first catalog row (by id) exactly matching the trimmed `(game, task_type)` pair, across service types.
    async fn fetch_price_entry(&self, game: &str, task_type: &str) -> Result<Option<PriceEntry>, MarketplaceError>;

    /// All catalog rows for a game in insertion order. This ordering is what makes fuzzy matching deterministic.
    async fn entries_for_game(&self, game: &str) -> Result<Vec<PriceEntry>, MarketplaceError>;

    async fn all_price_entries(&self) -> Result<Vec<PriceEntry>, MarketplaceError>;

    async fn fetch_quote(
        &self,
        contractor_id: i64,
        game: &str,
        task_type: &str,
    ) -> Result<Option<ContractorQuote>, MarketplaceError>;

    /// Inserts or updates the contractor's quote for `(game, task_type)`.
    async fn upsert_quote(
        &self,
        contractor_id: i64,
        game: &str,
        task_type: &str,
        service_type: ServiceType,
        price: Money,
    ) -> Result<ContractorQuote, MarketplaceError>;

    async fn quotes_for_contractor(&self, contractor_id: i64) -> Result<Vec<ContractorQuote>, MarketplaceError>;

    async fn insert_task_request(&self, request: NewTaskAdditionRequest)
        -> Result<TaskAdditionRequest, MarketplaceError>;

    async fn fetch_task_request(&self, id: i64) -> Result<Option<TaskAdditionRequest>, MarketplaceError>;

    /// Requests an admin still has to review, oldest first.
    async fn pending_task_requests(&self) -> Result<Vec<TaskAdditionRequest>, MarketplaceError>;

    /// Records a review decision with an optional note and the review timestamp. The UPDATE re-checks that the
    /// request is still `Pending`; `None` means it was already decided and nothing was written.
    async fn decide_task_request(
        &self,
        id: i64,
        status: TaskRequestStatus,
        review_note: Option<&str>,
    ) -> Result<Option<TaskAdditionRequest>, MarketplaceError>;
}
