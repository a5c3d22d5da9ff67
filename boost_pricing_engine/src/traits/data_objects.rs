use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Result of idempotent order intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InsertOrderResult {
    Inserted(Order),
    /// An order with this order number already existed; nothing was written.
    AlreadyExists(Order),
}

impl InsertOrderResult {
    pub fn order(&self) -> &Order {
        match self {
            InsertOrderResult::Inserted(order) | InsertOrderResult::AlreadyExists(order) => order,
        }
    }

    pub fn into_order(self) -> Order {
        match self {
            InsertOrderResult::Inserted(order) | InsertOrderResult::AlreadyExists(order) => order,
        }
    }

    pub fn was_inserted(&self) -> bool {
        matches!(self, InsertOrderResult::Inserted(_))
    }
}
