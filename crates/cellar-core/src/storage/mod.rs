//! Storage layer for the wine inventory.
//!
//! - **traits**: the `CellarStore` interface all backends implement
//! - **types**: domain types and query builders
//! - **sqlite**: the SQLite backend (the only implementation)

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStore;
pub use traits::CellarStore;
pub use types::{
    NewStorage, NewWine, Position, PositionFilter, StorageUnit, Wine, WineFilter, Zone,
};
