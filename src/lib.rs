//! # Risi - Rice inventory store
//!
//! Keeps a catalogue of rice products (name, breed, packaging, price) in a
//! single SQLite table.
//!
//! Risi provides:
//! - The table contract and the closed packaging enumeration
//! - Logical addresses for the whole collection or one rice
//! - A store gateway dispatching query/insert/update/delete by address,
//!   validating every write
//! - A CLI and a small JSON HTTP API over the same store

pub mod address;
pub mod config;
pub mod contract;
pub mod field;
pub mod output;
pub mod rice;
pub mod server;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use address::RiceAddress;
pub use contract::{Packaging, is_valid_packaging};
pub use field::{FieldMap, FieldValue, Selection};
pub use rice::{Cursor, RiceItem};
pub use storage::RiceStore;

/// Result type alias for Risi operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Risi operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("{operation} is not supported for {address}")]
    UnsupportedOperation {
        operation: &'static str,
        address: RiceAddress,
    },

    #[error("Validation failed for {field}: {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Missing column in result: {0}")]
    MissingColumn(String),

    #[error("Unsupported schema version {0} (expected 1)")]
    UnsupportedSchemaVersion(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}
