//! Storage Layer - SQLite-backed persistence
//!
//! System of record is one SQLite file with a single table:
//! - rices(_id, name, breed, packaging, price)
//!
//! `RiceStore` dispatches query/insert/update/delete on a `RiceAddress`.

pub mod schema;
pub mod sqlite;
mod validate;

pub use sqlite::{RiceStore, StoreStats};
