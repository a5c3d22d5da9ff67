//! The pure pricing rules of the engine.
//!
//! Everything in this module is a plain function or a small value type: no database handles, no environment reads,
//! no clocks. The API layer in [`crate::bpe_api`] supplies whatever state the rules need (compensation profiles,
//! monthly completion counts, catalog snapshots) so that every rule here can be tested in isolation.
//!
//! * [`commission`] converts contractor asking prices to customer-facing platform prices.
//! * [`reward`] computes what a contractor earns for an order under their compensation mode.
//! * [`matcher`] reconciles free-text task labels against the canonical catalog.
//! * [`selection`] ranks assignment candidates for a paid order.
mod commission;
mod matcher;
mod reward;
mod selection;

pub use commission::{CommissionConverter, MAX_COMMISSION_RATE, MIN_COMMISSION_RATE};
pub use matcher::{find_catalog_match, normalize_task_label, MAX_TASK_LABEL_LEN};
pub use reward::{reward_for, tiered_rate, RewardOutcome, TIER_SCHEDULE};
pub use selection::{select_candidate, AssignmentCandidate};

use std::env;

use log::error;

pub const DEFAULT_COMMISSION_RATE: f64 = 0.20;
pub const DEFAULT_UNCATALOGED_COMMISSION: f64 = 0.20;
pub const DEFAULT_UNCATALOGED_MARKUP: f64 = 1.20;

/// The pricing knobs of the platform. Constructed once and injected into the APIs; nothing downstream reads the
/// environment again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    /// The global commission rate, a fraction in (0, 1). Clamped to [0.01, 0.99] at every use.
    pub commission_rate: f64,
    /// Commission withheld on uncataloged custom offers (the contractor keeps the rest of the offered price).
    pub uncataloged_commission: f64,
    /// Markup applied to an uncataloged offered price when settlement backfills the catalog.
    pub uncataloged_markup: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            commission_rate: DEFAULT_COMMISSION_RATE,
            uncataloged_commission: DEFAULT_UNCATALOGED_COMMISSION,
            uncataloged_markup: DEFAULT_UNCATALOGED_MARKUP,
        }
    }
}

impl PricingConfig {
    pub fn new(commission_rate: f64) -> Self {
        Self { commission_rate, ..Self::default() }
    }

    /// Reads `BPE_COMMISSION_RATE`, `BPE_UNCATALOGED_COMMISSION` and `BPE_UNCATALOGED_MARKUP`, falling back to the
    /// compiled defaults when a variable is unset or unparseable.
    pub fn from_env_or_default() -> Self {
        Self {
            commission_rate: env_rate("BPE_COMMISSION_RATE", DEFAULT_COMMISSION_RATE),
            uncataloged_commission: env_rate("BPE_UNCATALOGED_COMMISSION", DEFAULT_UNCATALOGED_COMMISSION),
            uncataloged_markup: env_rate("BPE_UNCATALOGED_MARKUP", DEFAULT_UNCATALOGED_MARKUP),
        }
    }

    pub fn converter(&self) -> CommissionConverter {
        CommissionConverter::new(self.commission_rate)
    }
}

fn env_rate(var: &str, default: f64) -> f64 {
    match env::var(var) {
        Ok(s) => s.parse::<f64>().unwrap_or_else(|e| {
            error!("🪛️ {var} ('{s}') is not a valid rate: {e}. Using the default ({default})");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.commission_rate, 0.20);
        assert_eq!(config.uncataloged_commission, 0.20);
        assert_eq!(config.uncataloged_markup, 1.20);
        assert_eq!(PricingConfig::new(0.35).commission_rate, 0.35);
        assert_eq!(PricingConfig::new(0.35).uncataloged_markup, 1.20);
    }
}
