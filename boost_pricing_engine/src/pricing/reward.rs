use bpe_common::Money;

use crate::db_types::{CompensationMode, CompensationProfile};

/// `(monthly completion floor, reward percent)`, evaluated top-down, first match wins. Fewer than 10 completions
/// this month earns the 75% floor, 10 to 20 earns 80%, more than 20 earns 85%.
pub const TIER_SCHEDULE: [(u32, f64); 3] = [(21, 85.0), (10, 80.0), (0, 75.0)];

/// The reward percentage a tiered contractor earns at the given monthly completion count.
pub fn tiered_rate(month_completions: u32) -> f64 {
    TIER_SCHEDULE
        .iter()
        .find(|(floor, _)| month_completions >= *floor)
        .map(|(_, rate)| *rate)
        .unwrap_or(75.0)
}

/// What the reward calculator decided for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardOutcome {
    /// The reward that the contractor's compensation mode computes.
    Computed(Money),
    /// Fixed-mode contractors have no formula; the caller must use the contractor's own quote for the task.
    ManualQuote,
}

impl RewardOutcome {
    pub fn computed(self) -> Option<Money> {
        match self {
            RewardOutcome::Computed(reward) => Some(reward),
            RewardOutcome::ManualQuote => None,
        }
    }
}

/// Computes the contractor's reward for an order priced at `customer_price`.
///
/// `month_completions` is the contractor's completed-order count for the current calendar month. It only matters in
/// tiered mode; the caller supplies it (see [`crate::helpers::month_start`]) so this function stays pure.
///
/// A non-positive customer price always yields a zero reward, whatever the mode.
pub fn reward_for(customer_price: Money, profile: &CompensationProfile, month_completions: u32) -> RewardOutcome {
    if customer_price <= Money::zero() {
        return RewardOutcome::Computed(Money::zero());
    }
    match profile.mode {
        CompensationMode::Fixed => RewardOutcome::ManualQuote,
        CompensationMode::Percentage { rate } => {
            let rate = rate.clamp(1.0, 100.0);
            RewardOutcome::Computed(customer_price.scale(rate / 100.0))
        },
        CompensationMode::Tiered => {
            RewardOutcome::Computed(customer_price.scale(tiered_rate(month_completions) / 100.0))
        },
    }
}
