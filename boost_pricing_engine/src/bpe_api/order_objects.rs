use std::fmt::Display;

use bpe_common::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Order, OrderId, OrderStatus, PaymentStatus},
    traits::MarketplaceError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsSummary {
    pub contractor_id: i64,
    pub since: DateTime<Utc>,
    pub total_reward: Money,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub order_no: Option<OrderId>,
    pub customer_id: Option<i64>,
    pub contractor_id: Option<i64>,
    pub game: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub unassigned_only: bool,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub statuses: Option<Vec<OrderStatus>>,
}

impl OrderQueryFilter {
    pub fn with_order_no(mut self, order_no: OrderId) -> Self {
        self.order_no = Some(order_no);
        self
    }

    pub fn with_customer_id(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_contractor_id(mut self, contractor_id: i64) -> Self {
        self.contractor_id = Some(contractor_id);
        self
    }

    pub fn with_game(mut self, game: String) -> Self {
        self.game = Some(game);
        self
    }

    pub fn with_payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = Some(payment_status);
        self
    }

    pub fn unassigned_only(mut self) -> Self {
        self.unassigned_only = true;
        self
    }

    pub fn since<T>(mut self, since: T) -> Result<Self, MarketplaceError>
    where
        T: TryInto<DateTime<Utc>>,
        T::Error: Display,
    {
        let dt = since.try_into().map_err(|e| MarketplaceError::QueryError(e.to_string()))?;
        self.since = Some(dt);
        Ok(self)
    }

    pub fn until<T>(mut self, until: T) -> Result<Self, MarketplaceError>
    where
        T: TryInto<DateTime<Utc>>,
        T::Error: Display,
    {
        let dt = until.try_into().map_err(|e| MarketplaceError::QueryError(e.to_string()))?;
        self.until = Some(dt);
        Ok(self)
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.statuses.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.order_no.is_none() &&
            self.customer_id.is_none() &&
            self.contractor_id.is_none() &&
            self.game.is_none() &&
            self.payment_status.is_none() &&
            !self.unassigned_only &&
            self.statuses.is_none() &&
            self.since.is_none() &&
            self.until.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(order_no) = &self.order_no {
            write!(f, "order_no: {order_no}. ")?;
        }
        if let Some(customer_id) = &self.customer_id {
            write!(f, "customer_id: {customer_id}. ")?;
        }
        if let Some(contractor_id) = &self.contractor_id {
            write!(f, "contractor_id: {contractor_id}. ")?;
        }
        if let Some(game) = &self.game {
            write!(f, "game: {game}. ")?;
        }
        if let Some(payment_status) = &self.payment_status {
            write!(f, "payment_status: {payment_status}. ")?;
        }
        if self.unassigned_only {
            write!(f, "unassigned only. ")?;
        }
        if let Some(statuses) = &self.statuses {
            let statuses = statuses.iter().map(|s| s.to_string()).collect::<Vec<String>>().join(", ");
            write!(f, "statuses: [{statuses}]. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since: {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until: {until}. ")?;
        }
        Ok(())
    }
}

//--------------------------------------     StatusActor       ---------------------------------------------

/// Who is asking for an order status change. Contractors are restricted to the forward path on their own
/// orders; admins may set any status on any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusActor {
    Contractor(i64),
    Admin,
}

impl StatusActor {
    /// The statuses a contractor may move an order into. Everything else is admin-only.
    const CONTRACTOR_TARGETS: [OrderStatus; 3] =
        [OrderStatus::InProgress, OrderStatus::AwaitingAcceptance, OrderStatus::Completed];

    pub fn may_move(&self, order: &Order, target: OrderStatus) -> bool {
        match self {
            StatusActor::Admin => true,
            StatusActor::Contractor(id) => {
                order.contractor_id == Some(*id) && Self::CONTRACTOR_TARGETS.contains(&target)
            },
        }
    }
}

//--------------------------------------    Status change      ---------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub old_status: OrderStatus,
    pub order: Order,
}

/// The result of a status change request. Only `Changed` means a row was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatusChangeOutcome {
    Changed(StatusChange),
    /// The actor may not move this order into the requested status.
    NotPermitted { requested: OrderStatus },
    /// The order is already in the requested status, or it left the expected status before the update landed.
    Unchanged,
}

impl StatusChangeOutcome {
    pub fn changed(self) -> Option<StatusChange> {
        match self {
            StatusChangeOutcome::Changed(change) => Some(change),
            _ => None,
        }
    }
}

//--------------------------------------     Assignment        ---------------------------------------------

/// Why an assignment attempt wrote nothing. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    AlreadyAssigned,
    NotAwaitingAssignment,
    NonPositivePrice,
    NoCandidates,
    /// Another writer took the order between the eligibility check and the update.
    LostRace,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            SkipReason::AlreadyAssigned => "the order is already assigned",
            SkipReason::NotAwaitingAssignment => "the order is not awaiting assignment",
            SkipReason::NonPositivePrice => "the order price is not positive",
            SkipReason::NoCandidates => "no contractor is eligible for the order",
            SkipReason::LostRace => "the order was claimed by another writer",
        };
        write!(f, "{msg}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AssignmentOutcome {
    /// The order was assigned and moved to `InProgress`. The embedded order reflects the new state.
    Assigned(Order),
    Skipped(SkipReason),
}

impl AssignmentOutcome {
    pub fn assigned(self) -> Option<Order> {
        match self {
            AssignmentOutcome::Assigned(order) => Some(order),
            AssignmentOutcome::Skipped(_) => None,
        }
    }
}

//--------------------------------------      Payment          ---------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaymentOutcome {
    /// The order has been marked as paid. `assignment` records what the automatic assignment sweep did.
    Confirmed { order: Order, assignment: AssignmentOutcome },
    /// The order was already paid. Nothing was written.
    AlreadyPaid(Order),
}

impl PaymentOutcome {
    pub fn order(&self) -> &Order {
        match self {
            PaymentOutcome::Confirmed { order, .. } => order,
            PaymentOutcome::AlreadyPaid(order) => order,
        }
    }
}

//--------------------------------------       Claims          ---------------------------------------------

/// Why a claim was refused. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimRejection {
    /// The target is gone, already taken, or otherwise not open for claiming.
    NotAvailable,
    NotApproved,
    /// No reward could be determined for the contractor (no quote on file for a fixed-rate profile).
    NoReward,
}

impl Display for ClaimRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ClaimRejection::NotAvailable => "the target is not available for claiming",
            ClaimRejection::NotApproved => "the contractor is not approved",
            ClaimRejection::NoReward => "no reward could be determined for the contractor",
        };
        write!(f, "{msg}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClaimOutcome<T> {
    Claimed(T),
    Rejected(ClaimRejection),
}

impl<T> ClaimOutcome<T> {
    pub fn claimed(self) -> Option<T> {
        match self {
            ClaimOutcome::Claimed(t) => Some(t),
            ClaimOutcome::Rejected(_) => None,
        }
    }
}

//--------------------------------------   Offer conversion    ---------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OfferPaymentOutcome {
    /// The request is paid and has been converted into a live order, already assigned to the claimant.
    Converted { order: Order, reward: Money },
    /// The request is not in the `Claimed` state. Nothing was written.
    NotClaimed,
}

impl OfferPaymentOutcome {
    pub fn converted(self) -> Option<Order> {
        match self {
            OfferPaymentOutcome::Converted { order, .. } => Some(order),
            OfferPaymentOutcome::NotClaimed => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn query_filter_display() {
        let query = OrderQueryFilter::default();
        assert!(query.is_empty());
        assert_eq!(format!("{query}"), "No filters.");
        let query = query
            .with_customer_id(14)
            .with_status(OrderStatus::AwaitingAssignment)
            .with_status(OrderStatus::InProgress)
            .unassigned_only();
        assert!(!query.is_empty());
        assert_eq!(
            format!("{query}"),
            "customer_id: 14. unassigned only. statuses: [AwaitingAssignment, InProgress]. "
        );
    }

    #[test]
    fn query_filter_since_accepts_datetimes() {
        let query = OrderQueryFilter::default().since("2024-03-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert!(query.is_ok());
    }

    #[test]
    fn contractor_may_only_move_own_orders_forward() {
        let order = order_assigned_to(5);
        let actor = StatusActor::Contractor(5);
        assert!(actor.may_move(&order, OrderStatus::InProgress));
        assert!(actor.may_move(&order, OrderStatus::AwaitingAcceptance));
        assert!(actor.may_move(&order, OrderStatus::Completed));
        // Sending an order back to the pool is admin-only.
        assert!(!actor.may_move(&order, OrderStatus::AwaitingAssignment));
        assert!(!StatusActor::Contractor(6).may_move(&order, OrderStatus::InProgress));
        assert!(StatusActor::Admin.may_move(&order, OrderStatus::AwaitingAssignment));
    }

    fn order_assigned_to(contractor_id: i64) -> Order {
        let now = Utc::now();
        Order {
            id: 1,
            order_no: OrderId::from("ORD-TEST-1".to_string()),
            game: "Genshin Impact".to_string(),
            task_type: "Abyss clear".to_string(),
            service_type: crate::db_types::ServiceType::Boosting,
            customer_price: Money::from_yuan(100),
            contractor_reward: Money::from_yuan(80),
            status: OrderStatus::InProgress,
            payment_status: PaymentStatus::Paid,
            customer_id: Some(14),
            contractor_id: Some(contractor_id),
            notes: None,
            is_custom_offer: false,
            created_at: now,
            updated_at: now,
            paid_at: Some(now),
        }
    }
}
