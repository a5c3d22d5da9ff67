use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::db_types::{ContractorQuote, PriceEntry, TaskAdditionRequest};

/// The result of a contractor saving a quote. Quotes only exist against catalog entries, so anything
/// that does not resolve to exactly one entry is refused without writing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QuoteOutcome {
    Saved(ContractorQuote),
    /// The label is not an exact catalog match, but it resolves to an existing entry. The contractor
    /// should quote against that entry's label instead.
    DuplicateOf(PriceEntry),
    /// The label does not resolve to any catalog entry for the game.
    UnknownTask,
}

impl QuoteOutcome {
    pub fn saved(self) -> Option<ContractorQuote> {
        match self {
            QuoteOutcome::Saved(quote) => Some(quote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TaskSubmissionOutcome {
    Submitted(TaskAdditionRequest),
    /// The proposed task already resolves to a catalog entry. No request was filed.
    DuplicateOf(PriceEntry),
}

impl TaskSubmissionOutcome {
    pub fn submitted(self) -> Option<TaskAdditionRequest> {
        match self {
            TaskSubmissionOutcome::Submitted(request) => Some(request),
            TaskSubmissionOutcome::DuplicateOf(_) => None,
        }
    }
}

/// The result of reviewing a task addition request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ApprovalOutcome {
    /// The request was approved. `entry` is the catalog entry created from it, priced off the
    /// submitter's compensation profile, and the submitter's quote has been recorded.
    Approved { request: TaskAdditionRequest, entry: PriceEntry },
    /// The catalog caught up with the request while it was pending. The request has been rejected with
    /// a note naming the existing entry.
    RejectedDuplicate { request: TaskAdditionRequest, existing: PriceEntry },
    /// The request was no longer pending. Nothing was written.
    AlreadyDecided,
}

impl ApprovalOutcome {
    pub fn approved_entry(self) -> Option<PriceEntry> {
        match self {
            ApprovalOutcome::Approved { entry, .. } => Some(entry),
            _ => None,
        }
    }
}

/// Tally of a bulk quote import. `matched` rows produced or refreshed a quote; the rest did not
/// resolve to any catalog entry and were dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub matched: usize,
    pub quotes: Vec<ContractorQuote>,
}

impl Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "matched {} of {} rows", self.matched, self.total)
    }
}
