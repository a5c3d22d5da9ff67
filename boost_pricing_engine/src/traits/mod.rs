//! # Database management and control.
//!
//! This module provides the interfaces that define the contracts of the engine's database *backends*.
//!
//! ## Traits
//!
//! * [`MarketplaceDatabase`] defines the highest level of behavior for backends supporting the engine: the atomic
//!   multi-entity flows (order intake, payment, assignment, settlement, request conversion and approval).
//! * [`OrderManagement`] provides queries and single-entity operations over orders and custom offer requests.
//! * [`ContractorManagement`] manages the contractor roster and compensation profiles.
//! * [`CustomerManagement`] manages customers and their loyalty state.
//! * [`PriceBookManagement`] manages the canonical price catalog, contractor quotes and task-addition requests.
//!
//! All mutating flows that touch more than one entity live on [`MarketplaceDatabase`] so that a backend can wrap
//! them in a single transaction.
mod contractor_management;
mod customer_management;
mod data_objects;
mod marketplace_database;
mod order_management;
mod price_book_management;

pub use contractor_management::ContractorManagement;
pub use customer_management::CustomerManagement;
pub use data_objects::InsertOrderResult;
pub use marketplace_database::{MarketplaceDatabase, MarketplaceError};
pub use order_management::OrderManagement;
pub use price_book_management::PriceBookManagement;
