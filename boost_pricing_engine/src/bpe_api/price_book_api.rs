use std::fmt::Debug;

use bpe_common::Money;
use log::*;

use crate::{
    book_objects::{ApprovalOutcome, ImportSummary, QuoteOutcome, TaskSubmissionOutcome},
    db_types::{
        ContractorQuote,
        NewPriceEntry,
        NewTaskAdditionRequest,
        PriceEntry,
        TaskAdditionRequest,
        TaskRequestStatus,
    },
    helpers::price_rows::PriceRow,
    pricing::{find_catalog_match, CommissionConverter, PricingConfig},
    traits::{MarketplaceDatabase, MarketplaceError},
};

/// `PriceBookApi` manages the task catalog and everything priced off it: contractor quotes, bulk quote
/// imports, and the task addition review queue.
pub struct PriceBookApi<B> {
    db: B,
    config: PricingConfig,
}

impl<B> Debug for PriceBookApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PriceBookApi")
    }
}

impl<B> PriceBookApi<B> {
    pub fn new(db: B, config: PricingConfig) -> Self {
        Self { db, config }
    }

    /// The bid-to-platform-price converter built from this API's commission rate.
    pub fn converter(&self) -> CommissionConverter {
        self.config.converter()
    }
}

impl<B> PriceBookApi<B>
where B: MarketplaceDatabase
{
    //--------------------------------------      Catalog       ---------------------------------------------

    /// Adds a catalog entry at an admin-chosen price. The price must be positive.
    pub async fn add_price_entry(&self, entry: NewPriceEntry) -> Result<PriceEntry, MarketplaceError> {
        if entry.price <= Money::zero() {
            return Err(MarketplaceError::QueryError("the catalog price must be positive".to_string()));
        }
        let entry = self.db.insert_price_entry(entry).await?;
        info!("📋️ Catalog entry #{} added: {} / {} at {}", entry.id, entry.game, entry.task_type, entry.price);
        Ok(entry)
    }

    pub async fn update_price(&self, id: i64, price: Money) -> Result<PriceEntry, MarketplaceError> {
        if price <= Money::zero() {
            return Err(MarketplaceError::QueryError("the catalog price must be positive".to_string()));
        }
        let entry = self.db.update_price_entry(id, price).await?;
        info!("📋️ Catalog entry #{} repriced to {}", entry.id, entry.price);
        Ok(entry)
    }

    /// The catalog entry for exactly `(game, task_type)`, if one exists.
    pub async fn price_for(&self, game: &str, task_type: &str) -> Result<Option<PriceEntry>, MarketplaceError> {
        self.db.fetch_price_entry(game, task_type).await
    }

    /// Resolves a free-form task label against the game's catalog: exact match first, then the tolerant
    /// containment passes. `None` means the label names nothing in the catalog.
    pub async fn fuzzy_match(&self, game: &str, task_label: &str) -> Result<Option<PriceEntry>, MarketplaceError> {
        let entries = self.db.entries_for_game(game).await?;
        Ok(find_catalog_match(task_label, &entries).cloned())
    }

    pub async fn catalog(&self) -> Result<Vec<PriceEntry>, MarketplaceError> {
        self.db.all_price_entries().await
    }

    pub async fn entries_for_game(&self, game: &str) -> Result<Vec<PriceEntry>, MarketplaceError> {
        self.db.entries_for_game(game).await
    }

    //--------------------------------------       Quotes       ---------------------------------------------

    /// Saves a contractor's quote for a cataloged task. The label may be loose; it is resolved against the
    /// catalog and the quote is stored under the entry's own labels, so quotes never fork the catalog.
    ///
    /// A label that only fuzzy-matches comes back as [`QuoteOutcome::DuplicateOf`] and nothing is written:
    /// the caller should resubmit under the entry's exact label. An unknown label writes nothing too.
    pub async fn save_quote(
        &self,
        contractor_id: i64,
        game: &str,
        task_label: &str,
        price: Money,
    ) -> Result<QuoteOutcome, MarketplaceError> {
        if price <= Money::zero() {
            return Err(MarketplaceError::QueryError("the quote price must be positive".to_string()));
        }
        if let Some(entry) = self.db.fetch_price_entry(game, task_label).await? {
            let quote =
                self.db.upsert_quote(contractor_id, &entry.game, &entry.task_type, entry.service_type, price).await?;
            debug!("📋️ Contractor #{contractor_id} quoted {} for {} / {}", quote.price, quote.game, quote.task_type);
            return Ok(QuoteOutcome::Saved(quote));
        }
        let entries = self.db.entries_for_game(game).await?;
        match find_catalog_match(task_label, &entries) {
            Some(entry) => {
                debug!(
                    "📋️ Quote label '{task_label}' resolves to catalog entry '{}'. Ask the contractor to quote \
                     that instead.",
                    entry.task_type
                );
                Ok(QuoteOutcome::DuplicateOf(entry.clone()))
            },
            None => {
                debug!("📋️ Quote label '{task_label}' names nothing in the {game} catalog. Refused.");
                Ok(QuoteOutcome::UnknownTask)
            },
        }
    }

    pub async fn quotes_for_contractor(&self, contractor_id: i64) -> Result<Vec<ContractorQuote>, MarketplaceError> {
        self.db.quotes_for_contractor(contractor_id).await
    }

    /// Reconciles a batch of parsed price-sheet rows against the game's catalog. Rows that resolve to an
    /// entry upsert the contractor's quote under the entry's labels; the rest are dropped and only counted.
    pub async fn apply_import_rows(
        &self,
        contractor_id: i64,
        game: &str,
        rows: &[PriceRow],
    ) -> Result<ImportSummary, MarketplaceError> {
        let entries = self.db.entries_for_game(game).await?;
        let mut summary = ImportSummary { total: rows.len(), ..ImportSummary::default() };
        for row in rows {
            let Some(entry) = find_catalog_match(&row.task_type, &entries) else {
                debug!("📋️ Import row '{}' matches nothing in the {game} catalog. Dropped.", row.task_type);
                continue;
            };
            let quote = self
                .db
                .upsert_quote(contractor_id, &entry.game, &entry.task_type, entry.service_type, row.price)
                .await?;
            summary.matched += 1;
            summary.quotes.push(quote);
        }
        info!("📋️ Quote import for contractor #{contractor_id}: {summary}");
        Ok(summary)
    }

    //--------------------------------------   Task requests    ---------------------------------------------

    /// Files a contractor's request to add a task to the catalog. A label that already resolves to a catalog
    /// entry is turned away on the spot instead of wasting the reviewer's time.
    pub async fn submit_task_request(
        &self,
        request: NewTaskAdditionRequest,
    ) -> Result<TaskSubmissionOutcome, MarketplaceError> {
        if request.contractor_price <= Money::zero() {
            return Err(MarketplaceError::QueryError("the asking price must be positive".to_string()));
        }
        let entries = self.db.entries_for_game(&request.game).await?;
        if let Some(existing) = find_catalog_match(&request.task_type, &entries) {
            debug!("📋️ Task '{}' already resolves to catalog entry '{}'.", request.task_type, existing.task_type);
            return Ok(TaskSubmissionOutcome::DuplicateOf(existing.clone()));
        }
        let request = self.db.insert_task_request(request).await?;
        info!(
            "📋️ Task addition request #{} filed: {} / {} asking {}",
            request.id, request.game, request.task_type, request.contractor_price
        );
        Ok(TaskSubmissionOutcome::Submitted(request))
    }

    pub async fn pending_task_requests(&self) -> Result<Vec<TaskAdditionRequest>, MarketplaceError> {
        self.db.pending_task_requests().await
    }

    /// Reviews a pending request in the affirmative.
    ///
    /// The catalog may have caught up while the request sat in the queue, so the label is resolved again
    /// first; a hit auto-rejects the request with a note naming the existing entry. Otherwise the catalog
    /// entry is created at the platform price inferred from the submitter's asking price and compensation
    /// profile, and the submitter's quote is recorded at their asking price.
    ///
    /// Requests already decided (including by a racing reviewer) come back as
    /// [`ApprovalOutcome::AlreadyDecided`] and nothing is written.
    pub async fn approve_task_request(&self, request_id: i64) -> Result<ApprovalOutcome, MarketplaceError> {
        let request = self
            .db
            .fetch_task_request(request_id)
            .await?
            .ok_or(MarketplaceError::TaskRequestNotFound(request_id))?;
        if request.status != TaskRequestStatus::Pending {
            debug!("📋️ Task request #{request_id} is already {}. Nothing to do.", request.status);
            return Ok(ApprovalOutcome::AlreadyDecided);
        }
        let entries = self.db.entries_for_game(&request.game).await?;
        if let Some(existing) = find_catalog_match(&request.task_type, &entries) {
            let note = format!("Duplicate of catalog entry '{}'", existing.task_type);
            let Some(request) =
                self.db.decide_task_request(request_id, TaskRequestStatus::Rejected, Some(&note)).await?
            else {
                return Ok(ApprovalOutcome::AlreadyDecided);
            };
            info!("📋️ Task request #{request_id} auto-rejected: {note}");
            return Ok(ApprovalOutcome::RejectedDuplicate { request, existing: existing.clone() });
        }
        let contractor = self
            .db
            .fetch_contractor(request.contractor_id)
            .await?
            .ok_or(MarketplaceError::ContractorNotFound(request.contractor_id))?;
        let price = self.converter().infer_platform_price(request.contractor_price, Some(&contractor.profile()));
        let entry = NewPriceEntry::new(&request.game, &request.task_type, price);
        match self.db.approve_task_request(request_id, entry).await? {
            Some((request, entry)) => {
                info!(
                    "📋️ Task request #{request_id} approved. Catalog entry #{} priced at {}",
                    entry.id, entry.price
                );
                Ok(ApprovalOutcome::Approved { request, entry })
            },
            None => Ok(ApprovalOutcome::AlreadyDecided),
        }
    }

    /// Rejects a pending request with an optional note. `None` means the request was already decided and
    /// nothing was written.
    pub async fn reject_task_request(
        &self,
        request_id: i64,
        note: Option<&str>,
    ) -> Result<Option<TaskAdditionRequest>, MarketplaceError> {
        let rejected = self.db.decide_task_request(request_id, TaskRequestStatus::Rejected, note).await?;
        match &rejected {
            Some(request) => info!("📋️ Task request #{} rejected", request.id),
            None => debug!("📋️ Task request #{request_id} was already decided. Nothing to do."),
        }
        Ok(rejected)
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
