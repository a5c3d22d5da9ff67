use bpe_common::Money;

use crate::{
    db_types::{CompensationMode, CompensationProfile},
    pricing::reward::tiered_rate,
};

pub const MIN_COMMISSION_RATE: f64 = 0.01;
pub const MAX_COMMISSION_RATE: f64 = 0.99;

/// Converts contractor asking prices into customer-facing platform prices.
///
/// The commission rate is injected at construction. Use [`crate::pricing::PricingConfig::converter`] to build one
/// from the platform configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionConverter {
    commission_rate: f64,
}

impl CommissionConverter {
    pub fn new(commission_rate: f64) -> Self {
        Self { commission_rate }
    }

    /// The platform price for a contractor asking price under the global commission:
    /// `price / (1 - clamp(rate, 0.01, 0.99))`, rounded to the nearest cent.
    ///
    /// A non-positive asking price yields a zero platform price.
    pub fn to_platform_price(&self, contractor_price: Money) -> Money {
        if contractor_price <= Money::zero() {
            return Money::zero();
        }
        let rate = self.commission_rate.clamp(MIN_COMMISSION_RATE, MAX_COMMISSION_RATE);
        contractor_price.div_rate(1.0 - rate)
    }

    /// The platform price implied by a contractor's bid, priced according to *their* compensation mode so that the
    /// resulting catalog entry pays them roughly what they asked for:
    ///
    /// | Mode       | Divisor                              |
    /// |------------|--------------------------------------|
    /// | Fixed/none | `1 - global rate` (flat formula)     |
    /// | Percentage | `clamp(rate, 1, 100) / 100`          |
    /// | Tiered     | the tier floor (75%)                 |
    ///
    /// Tiered contractors are priced at the schedule floor even if their current month would earn a higher tier;
    /// anything else would silently reprice approvals as their volume moves.
    pub fn infer_platform_price(&self, bid: Money, profile: Option<&CompensationProfile>) -> Money {
        if bid <= Money::zero() {
            return Money::zero();
        }
        match profile.map(|p| p.mode) {
            None | Some(CompensationMode::Fixed) => self.to_platform_price(bid),
            Some(CompensationMode::Percentage { rate }) => {
                let divisor = (rate.clamp(1.0, 100.0) / 100.0).clamp(0.01, 1.0);
                bid.div_rate(divisor)
            },
            Some(CompensationMode::Tiered) => bid.div_rate(tiered_rate(0) / 100.0),
        }
    }
}
