//! # Boost pricing engine public API
//!
//! The `bpe_api` module exposes the programmatic API for the pricing and assignment engine.
//! The API is modular, so that clients of the API can pick and choose the functionality they want.
//! A storefront could run the order flow while a back-office tool only loads the price book, and each
//! can point at its own database backend.
//!
//! * [`order_flow_api`] is the primary API for the order lifecycle: intake, payment confirmation,
//!   contractor assignment, status changes and settlement, plus the custom offer flow.
//! * [`price_book_api`] manages the task catalog and contractor quotes: fuzzy label matching, quote
//!   saving, bulk quote imports, and the task addition review queue.
//!
//! The other submodules hold the request and outcome types the APIs trade in.
//!
//! # API usage
//!
//! The pattern for using both APIs is the same. An API instance is created by supplying a database
//! backend that implements the backend traits the API requires.
//!
//! ```rust,ignore
//! use boost_pricing_engine::{PriceBookApi, SqliteDatabase};
//! use boost_pricing_engine::pricing::PricingConfig;
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements MarketplaceDatabase
//! let api = PriceBookApi::new(db, PricingConfig::default());
//! // use the api to resolve a contractor's label against the catalog
//! let entry = api.fuzzy_match("Genshin Impact", "deep spiral 12F").await?;
//! ```

pub mod book_objects;
pub mod order_flow_api;
pub mod order_objects;
pub mod price_book_api;
