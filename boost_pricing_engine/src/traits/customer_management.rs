use crate::{
    db_types::{Customer, NewCustomer},
    traits::MarketplaceError,
};

/// Customer records and their loyalty state. Spend accumulation happens in
/// [`crate::traits::MarketplaceDatabase::settle_completed_order`].
#[allow(async_fn_in_trait)]
pub trait CustomerManagement {
    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, MarketplaceError>;

    async fn fetch_customer(&self, id: i64) -> Result<Option<Customer>, MarketplaceError>;

    async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, MarketplaceError>;
}
