//! # Cellar Core
//!
//! Core library for Cellar - a wine-collection inventory tracker.
//!
//! This crate provides the domain types, the occupancy/referential
//! invariants, and the storage abstraction independent of the CLI
//! interface.
//!
//! ## Architecture
//!
//! - **storage**: Storage trait, SQLite backend, and data models
//! - **error**: Error taxonomy shared by all operations
//!
//! All persistence goes through the single [`CellarStore`] interface.
//! There is intentionally no second backend; ad-hoc access to the
//! database outside this crate is not supported.

pub mod error;
pub mod storage;

pub use error::{CellarError, Result};
pub use storage::CellarStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
