use std::fmt::Debug;

use bpe_common::Money;
use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db_types::{
        CompensationMode,
        Contractor,
        Customer,
        CustomOfferRequest,
        NewCustomOfferRequest,
        NewOrder,
        NewPriceEntry,
        Order,
        OrderId,
        OrderStatus,
        PaymentStatus,
        RequestStatus,
    },
    events::{EventProducers, OrderAssignedEvent, OrderCompletedEvent, OrderPaidEvent, OrderStatusChangedEvent},
    helpers::{month_start, new_order_no},
    order_objects::{
        AssignmentOutcome,
        ClaimOutcome,
        ClaimRejection,
        EarningsSummary,
        OfferPaymentOutcome,
        OrderQueryFilter,
        PaymentOutcome,
        SkipReason,
        StatusActor,
        StatusChange,
        StatusChangeOutcome,
    },
    pricing::{reward_for, select_candidate, AssignmentCandidate, PricingConfig, RewardOutcome},
    traits::{InsertOrderResult, MarketplaceDatabase, MarketplaceError},
};

/// `OrderFlowApi` is the primary API for the order lifecycle: intake, payment confirmation, contractor
/// assignment, status changes with settlement, and the custom offer flow.
pub struct OrderFlowApi<B> {
    db: B,
    config: PricingConfig,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, config: PricingConfig, producers: EventProducers) -> Self {
        Self { db, config, producers }
    }
}

impl<B> OrderFlowApi<B>
where B: MarketplaceDatabase
{
    /// Submit a new order to the engine.
    ///
    /// Intake is idempotent on the order number. If an order with the same number already exists, the stored
    /// order is returned untouched; a resubmission that differs from the stored order is logged, since that
    /// usually means an upstream surface is replaying stale data.
    ///
    /// New orders start unpaid and unassigned. Nothing is assigned until [`Self::confirm_payment`] runs.
    pub async fn process_new_order(&self, order: NewOrder) -> Result<InsertOrderResult, MarketplaceError> {
        let result = self.db.insert_order(order.clone()).await?;
        match &result {
            InsertOrderResult::Inserted(o) => {
                debug!("🔄️📦️ Order [{}] saved with id {}", o.order_no, o.id);
            },
            InsertOrderResult::AlreadyExists(o) if order.is_equivalent(o) => {
                debug!("🔄️📦️ Order [{}] already exists. Nothing to do.", o.order_no);
            },
            InsertOrderResult::AlreadyExists(o) => {
                warn!(
                    "🔄️📦️ Order [{}] already exists and the resubmission differs from the stored order. The \
                     stored order wins.",
                    o.order_no
                );
            },
        }
        Ok(result)
    }

    /// Marks the order as paid and immediately runs an assignment sweep over it.
    ///
    /// Payment confirmation is idempotent: confirming an already-paid order writes nothing and returns
    /// [`PaymentOutcome::AlreadyPaid`]. On the real confirmation, the `OrderPaid` event fires and the order
    /// goes through [`Self::auto_assign`]; a skipped assignment is not an error, the order simply stays in
    /// the pool.
    pub async fn confirm_payment(&self, order_no: &OrderId) -> Result<PaymentOutcome, MarketplaceError> {
        trace!("🔄️💰️ Order [{order_no}] is being marked as paid");
        let order = self
            .db
            .fetch_order_by_order_no(order_no)
            .await?
            .ok_or_else(|| MarketplaceError::OrderNotFound(order_no.clone()))?;
        if order.payment_status == PaymentStatus::Paid {
            debug!("🔄️💰️ Order [{order_no}] is already paid. Nothing to do.");
            return Ok(PaymentOutcome::AlreadyPaid(order));
        }
        let Some(paid) = self.db.mark_order_paid(order_no).await? else {
            debug!("🔄️💰️ Order [{order_no}] was paid by another writer. Nothing to do.");
            return Ok(PaymentOutcome::AlreadyPaid(order));
        };
        info!("🔄️💰️ Order [{order_no}] is paid ({})", paid.customer_price);
        self.call_order_paid_hook(&paid).await;
        let assignment = self.auto_assign(paid.id).await?;
        let order = match &assignment {
            AssignmentOutcome::Assigned(assigned) => assigned.clone(),
            AssignmentOutcome::Skipped(reason) => {
                debug!("🔄️💰️ Order [{order_no}] was not assigned: {reason}.");
                paid
            },
        };
        Ok(PaymentOutcome::Confirmed { order, assignment })
    }

    /// Tries to hand the order to the most profitable eligible contractor.
    ///
    /// The sweep is a no-op (never an error) when the order is already assigned, not awaiting assignment, or
    /// has a non-positive price, and when no approved contractor has a determinable reward for it. Among the
    /// eligible, the winner is the one leaving the platform the largest margin; ties go to the smaller
    /// in-progress load, then the lower contractor id.
    ///
    /// A successful assignment is also the `AwaitingAssignment` to `InProgress` transition, so both the
    /// `OrderAssigned` and `OrderStatusChanged` events fire for it.
    pub async fn auto_assign(&self, order_id: i64) -> Result<AssignmentOutcome, MarketplaceError> {
        let order =
            self.db.fetch_order_by_id(order_id).await?.ok_or(MarketplaceError::OrderIdNotFound(order_id))?;
        if let Some(reason) = assignment_block(&order) {
            debug!("🔄️🤝️ Order [{}] skipped: {reason}.", order.order_no);
            return Ok(AssignmentOutcome::Skipped(reason));
        }
        let candidates = self.eligible_candidates(&order).await?;
        let Some(winner) = select_candidate(order.customer_price, &candidates) else {
            info!("🔄️🤝️ No contractor is eligible for order [{}]. It stays in the pool.", order.order_no);
            return Ok(AssignmentOutcome::Skipped(SkipReason::NoCandidates));
        };
        match self.db.assign_order(order.id, winner.contractor_id, winner.reward).await? {
            Some(assigned) => {
                info!(
                    "🔄️🤝️ Order [{}] assigned to contractor #{} at a reward of {}",
                    assigned.order_no, winner.contractor_id, winner.reward
                );
                self.call_order_assigned_hook(&assigned).await;
                self.call_status_changed_hook(OrderStatus::AwaitingAssignment, &assigned).await;
                Ok(AssignmentOutcome::Assigned(assigned))
            },
            None => {
                debug!("🔄️🤝️ Order [{}] left the pool mid-sweep. Nothing to do.", order.order_no);
                Ok(AssignmentOutcome::Skipped(SkipReason::LostRace))
            },
        }
    }

    /// A contractor claiming an order from the pool themselves, instead of waiting for the sweep.
    ///
    /// The order must be paid, unassigned and awaiting assignment, and the contractor must be approved with a
    /// determinable reward. Claims racing each other resolve on the database update; the loser gets
    /// [`ClaimRejection::NotAvailable`].
    pub async fn claim_order(&self, order_id: i64, contractor_id: i64) -> Result<ClaimOutcome<Order>, MarketplaceError> {
        let order =
            self.db.fetch_order_by_id(order_id).await?.ok_or(MarketplaceError::OrderIdNotFound(order_id))?;
        let contractor = self
            .db
            .fetch_contractor(contractor_id)
            .await?
            .ok_or(MarketplaceError::ContractorNotFound(contractor_id))?;
        if !contractor.is_approved {
            return Ok(ClaimOutcome::Rejected(ClaimRejection::NotApproved));
        }
        if assignment_block(&order).is_some() || order.payment_status != PaymentStatus::Paid {
            return Ok(ClaimOutcome::Rejected(ClaimRejection::NotAvailable));
        }
        let reward = self.determine_reward(order.customer_price, &order.game, &order.task_type, &contractor).await?;
        let Some(reward) = reward else {
            debug!(
                "🔄️🤝️ Contractor #{contractor_id} has no reward basis for order [{}]. Claim refused.",
                order.order_no
            );
            return Ok(ClaimOutcome::Rejected(ClaimRejection::NoReward));
        };
        match self.db.assign_order(order.id, contractor.id, reward).await? {
            Some(assigned) => {
                info!("🔄️🤝️ Order [{}] claimed by contractor #{contractor_id} at {reward}", assigned.order_no);
                self.call_order_assigned_hook(&assigned).await;
                self.call_status_changed_hook(OrderStatus::AwaitingAssignment, &assigned).await;
                Ok(ClaimOutcome::Claimed(assigned))
            },
            None => Ok(ClaimOutcome::Rejected(ClaimRejection::NotAvailable)),
        }
    }

    /// Moves an order to `target` on behalf of `actor`.
    ///
    /// ## Who may move what
    ///
    /// | Actor      | Allowed targets                                    | Allowed orders  |
    /// |------------|----------------------------------------------------|-----------------|
    /// | Contractor | `InProgress`, `AwaitingAcceptance`, `Completed`    | their own       |
    /// | Admin      | any                                                | any             |
    ///
    /// A request outside the allow-list writes nothing and returns [`StatusChangeOutcome::NotPermitted`].
    /// Setting the status an order is already in writes nothing and returns
    /// [`StatusChangeOutcome::Unchanged`], as does losing the update race to another writer.
    ///
    /// ## Side effects of a real change
    ///
    /// * The `OrderStatusChanged` event fires.
    /// * Reaching `Completed` settles the order: the customer's lifetime spend grows by the order price and
    ///   their loyalty tier is recomputed, exactly once per completion, and the `OrderCompleted` event fires.
    ///   Orders without a customer on record skip settlement but still complete.
    pub async fn update_status(
        &self,
        order_id: i64,
        target: OrderStatus,
        actor: StatusActor,
    ) -> Result<StatusChangeOutcome, MarketplaceError> {
        let order =
            self.db.fetch_order_by_id(order_id).await?.ok_or(MarketplaceError::OrderIdNotFound(order_id))?;
        if !actor.may_move(&order, target) {
            info!("🔄️🚦️ {actor:?} may not move order [{}] to {target}. Nothing to do.", order.order_no);
            return Ok(StatusChangeOutcome::NotPermitted { requested: target });
        }
        if order.status == target {
            debug!("🔄️🚦️ Order [{}] is already {target}. Nothing to do.", order.order_no);
            return Ok(StatusChangeOutcome::Unchanged);
        }
        let old_status = order.status;
        let Some(updated) = self.db.update_order_status(order.id, old_status, target).await? else {
            debug!("🔄️🚦️ Order [{}] left {old_status} before the update landed. Nothing to do.", order.order_no);
            return Ok(StatusChangeOutcome::Unchanged);
        };
        info!("🔄️🚦️ Order [{}] moved from {old_status} to {}", updated.order_no, updated.status);
        self.call_status_changed_hook(old_status, &updated).await;
        if updated.status == OrderStatus::Completed {
            let customer = self.settle(&updated).await?;
            self.call_order_completed_hook(&updated, customer).await;
        }
        Ok(StatusChangeOutcome::Changed(StatusChange { old_status, order: updated }))
    }

    /// The reward the contractor would earn on a task priced at `price`, or `None` when it cannot be
    /// determined (a fixed-mode contractor with no quote on file for the task).
    pub async fn determine_reward(
        &self,
        price: Money,
        game: &str,
        task_type: &str,
        contractor: &Contractor,
    ) -> Result<Option<Money>, MarketplaceError> {
        let profile = contractor.profile();
        let month_completions = match profile.mode {
            CompensationMode::Tiered => {
                let since = month_start(Utc::now());
                self.db.completed_count_since(contractor.id, since).await?.max(0) as u32
            },
            _ => 0,
        };
        match reward_for(price, &profile, month_completions) {
            RewardOutcome::Computed(reward) => Ok(Some(reward)),
            RewardOutcome::ManualQuote => {
                let quote = self.db.fetch_quote(contractor.id, game, task_type).await?;
                Ok(quote.map(|q| q.price))
            },
        }
    }

    //--------------------------------------   Custom offers    ---------------------------------------------

    /// Files a customer's custom offer request. The offered price must be positive.
    pub async fn submit_custom_offer(
        &self,
        request: NewCustomOfferRequest,
    ) -> Result<CustomOfferRequest, MarketplaceError> {
        if request.offered_price <= Money::zero() {
            return Err(MarketplaceError::QueryError("the offered price must be positive".to_string()));
        }
        let request = self.db.insert_custom_offer(request).await?;
        info!(
            "🔄️📨️ Custom offer [{}] filed for {} / {} at {}",
            request.request_no, request.game, request.task_type, request.offered_price
        );
        Ok(request)
    }

    /// The open requests this contractor may see. Uncataloged titles are only visible to contractors whose
    /// specialties cover the game.
    pub async fn open_offers_for_contractor(
        &self,
        contractor_id: i64,
    ) -> Result<Vec<CustomOfferRequest>, MarketplaceError> {
        let contractor = self
            .db
            .fetch_contractor(contractor_id)
            .await?
            .ok_or(MarketplaceError::ContractorNotFound(contractor_id))?;
        let offers = self
            .db
            .open_custom_offers()
            .await?
            .into_iter()
            .filter(|r| !r.uncataloged || contractor.has_specialty(&r.game))
            .collect();
        Ok(offers)
    }

    /// An approved contractor taking an open custom offer request. Racing claims resolve on the database
    /// update; the loser gets [`ClaimRejection::NotAvailable`].
    pub async fn claim_custom_offer(
        &self,
        request_id: i64,
        contractor_id: i64,
    ) -> Result<ClaimOutcome<CustomOfferRequest>, MarketplaceError> {
        let contractor = self
            .db
            .fetch_contractor(contractor_id)
            .await?
            .ok_or(MarketplaceError::ContractorNotFound(contractor_id))?;
        if !contractor.is_approved {
            return Ok(ClaimOutcome::Rejected(ClaimRejection::NotApproved));
        }
        match self.db.claim_custom_offer(request_id, contractor_id).await? {
            Some(request) => {
                info!("🔄️📨️ Custom offer [{}] claimed by contractor #{contractor_id}", request.request_no);
                Ok(ClaimOutcome::Claimed(request))
            },
            None => Ok(ClaimOutcome::Rejected(ClaimRejection::NotAvailable)),
        }
    }

    /// Confirms payment on a claimed custom offer request and converts it into a live order.
    ///
    /// The order is born paid, in progress and assigned to the claimant. The contractor's reward:
    ///
    /// * uncataloged title: the offered price less the uncataloged commission;
    /// * cataloged: whatever [`Self::determine_reward`] gives at the offered price, or zero when it cannot be
    ///   determined, leaving the reward for an admin to set.
    ///
    /// A request that is not in the `Claimed` state writes nothing.
    pub async fn confirm_offer_payment(&self, request_id: i64) -> Result<OfferPaymentOutcome, MarketplaceError> {
        let request =
            self.db.fetch_custom_offer(request_id).await?.ok_or(MarketplaceError::RequestNotFound(request_id))?;
        if request.status != RequestStatus::Claimed {
            debug!("🔄️📨️ Custom offer [{}] is {}, not Claimed. Nothing to do.", request.request_no, request.status);
            return Ok(OfferPaymentOutcome::NotClaimed);
        }
        let Some(contractor_id) = request.contractor_id else {
            warn!("🔄️📨️ Custom offer [{}] is Claimed but has no contractor on it.", request.request_no);
            return Ok(OfferPaymentOutcome::NotClaimed);
        };
        let contractor = self
            .db
            .fetch_contractor(contractor_id)
            .await?
            .ok_or(MarketplaceError::ContractorNotFound(contractor_id))?;
        let reward = self.offer_reward(&request, &contractor).await?;
        let mut order = NewOrder::new(new_order_no(), &request.game, &request.task_type, request.offered_price)
            .with_customer(request.customer_id)
            .custom_offer();
        if let Some(notes) = &request.notes {
            order = order.with_notes(notes.clone());
        }
        match self.db.convert_request_to_order(request_id, order, reward).await? {
            Some((order, request)) => {
                info!(
                    "🔄️📨️ Custom offer [{}] paid and converted to order [{}] at a reward of {reward}",
                    request.request_no, order.order_no
                );
                self.call_order_paid_hook(&order).await;
                self.call_order_assigned_hook(&order).await;
                Ok(OfferPaymentOutcome::Converted { order, reward })
            },
            None => Ok(OfferPaymentOutcome::NotClaimed),
        }
    }

    //--------------------------------------      Queries       ---------------------------------------------

    /// Paid, unassigned orders waiting for a contractor, oldest first.
    pub async fn assignable_pool(&self) -> Result<Vec<Order>, MarketplaceError> {
        self.db.assignable_orders().await
    }

    pub async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, MarketplaceError> {
        trace!("🔄️🔍️ Searching orders: {query}");
        self.db.search_orders(query).await
    }

    /// What the contractor has earned on completed orders since `since`.
    pub async fn earnings_summary(
        &self,
        contractor_id: i64,
        since: DateTime<Utc>,
    ) -> Result<EarningsSummary, MarketplaceError> {
        let query = OrderQueryFilter::default()
            .with_contractor_id(contractor_id)
            .with_status(OrderStatus::Completed)
            .since(since)?;
        let orders = self.db.search_orders(query).await?;
        let total_reward = orders.iter().map(|o| o.contractor_reward).sum();
        Ok(EarningsSummary { contractor_id, since, total_reward, orders })
    }

    /// The customer's lifetime spend, tier and the discount the tier carries.
    pub async fn loyalty_status(&self, customer_id: i64) -> Result<Customer, MarketplaceError> {
        self.db.fetch_customer(customer_id).await?.ok_or(MarketplaceError::CustomerNotFound(customer_id))
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    //--------------------------------------     Internals      ---------------------------------------------

    async fn eligible_candidates(&self, order: &Order) -> Result<Vec<AssignmentCandidate>, MarketplaceError> {
        let contractors = self.db.approved_contractors().await?;
        let mut candidates = Vec::with_capacity(contractors.len());
        for contractor in contractors {
            let reward =
                self.determine_reward(order.customer_price, &order.game, &order.task_type, &contractor).await?;
            let Some(reward) = reward else {
                trace!(
                    "🔄️🤝️ Contractor #{} has no reward basis for order [{}]. Skipped.",
                    contractor.id, order.order_no
                );
                continue;
            };
            let in_progress = self.db.in_progress_count(contractor.id).await?;
            candidates.push(AssignmentCandidate { contractor_id: contractor.id, reward, in_progress });
        }
        Ok(candidates)
    }

    async fn offer_reward(
        &self,
        request: &CustomOfferRequest,
        contractor: &Contractor,
    ) -> Result<Money, MarketplaceError> {
        if request.uncataloged {
            return Ok(request.offered_price.scale(1.0 - self.config.uncataloged_commission));
        }
        let reward = self
            .determine_reward(request.offered_price, &request.game, &request.task_type, contractor)
            .await?;
        Ok(reward.unwrap_or_else(Money::zero))
    }

    /// Settlement for one completed order. Returns the settled customer, or `None` when the order has no
    /// customer on record.
    async fn settle(&self, order: &Order) -> Result<Option<Customer>, MarketplaceError> {
        let Some(customer_id) = order.customer_id else {
            debug!("💰️ Order [{}] completed with no customer on record. No settlement.", order.order_no);
            return Ok(None);
        };
        let backfill = self.catalog_backfill(order).await?;
        let customer = self.db.settle_completed_order(customer_id, order.customer_price, backfill).await?;
        info!(
            "💰️ Order [{}] settled. Customer #{} has spent {} lifetime and holds the {} tier.",
            order.order_no, customer.id, customer.total_spent, customer.tier
        );
        Ok(Some(customer))
    }

    /// A completed uncataloged custom offer seeds the catalog with the title, at the offered price plus the
    /// configured markup.
    async fn catalog_backfill(&self, order: &Order) -> Result<Option<NewPriceEntry>, MarketplaceError> {
        if !order.is_custom_offer {
            return Ok(None);
        }
        let Some(request) = self.db.fetch_custom_offer_by_order(order.id).await? else {
            return Ok(None);
        };
        if !request.uncataloged {
            return Ok(None);
        }
        let price = request.offered_price.scale(self.config.uncataloged_markup);
        debug!("💰️ Backfilling the catalog with {} / {} at {price}", request.game, request.task_type);
        Ok(Some(NewPriceEntry::new(&request.game, &request.task_type, price)))
    }

    async fn call_order_paid_hook(&self, order: &Order) {
        for producer in &self.producers.order_paid_producer {
            debug!("🔄️📬️ Notifying order paid subscribers");
            let event = OrderPaidEvent::new(order.clone());
            producer.publish_event(event).await;
        }
    }

    async fn call_order_assigned_hook(&self, order: &Order) {
        for producer in &self.producers.order_assigned_producer {
            debug!("🔄️📬️ Notifying order assigned subscribers");
            let event = OrderAssignedEvent::new(order.clone());
            producer.publish_event(event).await;
        }
    }

    async fn call_status_changed_hook(&self, old_status: OrderStatus, order: &Order) {
        for producer in &self.producers.status_changed_producer {
            debug!("🔄️📬️ Notifying status changed subscribers");
            let event = OrderStatusChangedEvent::new(old_status, order.clone());
            producer.publish_event(event).await;
        }
    }

    async fn call_order_completed_hook(&self, order: &Order, customer: Option<Customer>) {
        for producer in &self.producers.order_completed_producer {
            debug!("🔄️📬️ Notifying order completed subscribers");
            let event = OrderCompletedEvent::new(order.clone(), customer.clone());
            producer.publish_event(event).await;
        }
    }
}

/// The pool-entry conditions an assignment or claim re-checks. `None` means the order is assignable.
fn assignment_block(order: &Order) -> Option<SkipReason> {
    if order.contractor_id.is_some() {
        return Some(SkipReason::AlreadyAssigned);
    }
    if order.status != OrderStatus::AwaitingAssignment {
        return Some(SkipReason::NotAwaitingAssignment);
    }
    if order.customer_price <= Money::zero() {
        return Some(SkipReason::NonPositivePrice);
    }
    None
}
