use serde::{Deserialize, Serialize};

use crate::db_types::{Customer, Order, OrderStatus};

/// Published when an order's payment is confirmed and it enters the assignable pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPaidEvent {
    pub order: Order,
}

impl OrderPaidEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Published when an order is handed to a contractor, whether by auto-assignment or a claim. Both the customer and
/// the contractor normally get notified off the back of this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAssignedEvent {
    pub order: Order,
    pub contractor_id: i64,
}

impl OrderAssignedEvent {
    pub fn new(order: Order) -> Self {
        let contractor_id = order.contractor_id.unwrap_or_default();
        Self { order, contractor_id }
    }
}

/// Published on every effective work-status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusChangedEvent {
    pub old_status: OrderStatus,
    pub order: Order,
}

impl OrderStatusChangedEvent {
    pub fn new(old_status: OrderStatus, order: Order) -> Self {
        Self { old_status, order }
    }
}

/// Published when an order reaches `Completed`. Carries the settled customer when settlement ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCompletedEvent {
    pub order: Order,
    pub customer: Option<Customer>,
}

impl OrderCompletedEvent {
    pub fn new(order: Order, customer: Option<Customer>) -> Self {
        Self { order, customer }
    }
}
