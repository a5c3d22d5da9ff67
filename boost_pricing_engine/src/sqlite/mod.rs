//! SQLite backend for the boost pricing engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
