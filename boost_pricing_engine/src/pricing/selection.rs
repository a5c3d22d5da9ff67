use std::cmp::Reverse;

use bpe_common::Money;

/// One contractor eligible for an assignable order, with the reward they would earn and their current workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentCandidate {
    pub contractor_id: i64,
    pub reward: Money,
    /// Number of orders the contractor currently has in progress.
    pub in_progress: i64,
}

impl AssignmentCandidate {
    pub fn profit(&self, customer_price: Money) -> Money {
        customer_price - self.reward
    }
}

/// Picks the winner among assignment candidates: maximum platform profit, ties broken by the lighter in-progress
/// load, remaining ties by the lowest contractor id so the choice is deterministic.
pub fn select_candidate(customer_price: Money, candidates: &[AssignmentCandidate]) -> Option<&AssignmentCandidate> {
    candidates.iter().min_by_key(|c| (Reverse(c.profit(customer_price)), c.in_progress, c.contractor_id))
}
