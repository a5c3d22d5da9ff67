use crate::{
    db_types::{CompensationMode, Contractor, NewContractor},
    traits::MarketplaceError,
};

/// Roster and compensation-profile management for contractors.
#[allow(async_fn_in_trait)]
pub trait ContractorManagement {
    async fn insert_contractor(&self, contractor: NewContractor) -> Result<Contractor, MarketplaceError>;

    async fn fetch_contractor(&self, id: i64) -> Result<Option<Contractor>, MarketplaceError>;

    async fn fetch_contractor_by_handle(&self, handle: &str) -> Result<Option<Contractor>, MarketplaceError>;

    /// Every approved contractor, in id order. The assignment selector works through this list.
    async fn approved_contractors(&self) -> Result<Vec<Contractor>, MarketplaceError>;

    async fn set_contractor_approval(&self, id: i64, approved: bool) -> Result<Contractor, MarketplaceError>;

    /// Replaces the contractor's compensation mode and rate data.
    async fn update_compensation(&self, id: i64, mode: CompensationMode) -> Result<Contractor, MarketplaceError>;
}
