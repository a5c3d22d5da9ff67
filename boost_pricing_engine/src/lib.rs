//! Boost Pricing Engine
//!
//! The Boost Pricing Engine is the core service behind a game-boosting marketplace. Customers buy boosting tasks at
//! platform prices, contractors carry them out for a computed reward, and the platform margin is the difference.
//! This library contains the pricing rules, the order state machine and the assignment logic. It is
//! transport-agnostic: HTTP surfaces, payment gateways and notification delivery all live upstream of this crate.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@traits`] and the SQLite backend). You should never need to access the
//!    database directly. Instead, use the public API provided by the engine. The exception is the data types used in
//!    the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@bpe_api`]). This provides the public-facing functionality of the engine: order
//!    flow, auto-assignment, the price book and the request approval flows. Specific backends need to implement the
//!    traits in [`mod@traits`] in order to act as a backend for the engine.
//! 3. The pure pricing rules ([`mod@pricing`]): commission conversion, reward calculation, fuzzy task matching and
//!    assignment candidate selection. These have no database or environment dependencies at all.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted when certain actions
//! occur within the engine. For example, when an order is assigned, an `OrderAssignedEvent` is emitted. A simple
//! actor framework is used so that you can easily hook into these events and perform custom actions, such as
//! delivering notifications.
mod bpe_api;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod pricing;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    ContractorManagement,
    CustomerManagement,
    InsertOrderResult,
    MarketplaceDatabase,
    MarketplaceError,
    OrderManagement,
    PriceBookManagement,
};

pub use bpe_api::{
    book_objects,
    order_flow_api::OrderFlowApi,
    order_objects,
    price_book_api::PriceBookApi,
};
