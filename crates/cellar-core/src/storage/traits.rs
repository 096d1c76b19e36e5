//! Storage trait definition.
//!
//! The `CellarStore` trait defines the interface the rest of the
//! application uses for persistence. All reads and writes go through this
//! abstraction; there is no secondary store and no ad-hoc database access.

use std::path::Path;

use super::types::{
    NewStorage, NewWine, Position, PositionFilter, StorageUnit, Wine, WineFilter,
};
use crate::error::Result;

/// Storage interface for the wine inventory.
///
/// All implementations must ensure:
/// - Paired updates (wine row + position row) are applied atomically
/// - A position's `is_occupied` flag always agrees with the wine that
///   references it
/// - Errors are surfaced, never swallowed
pub trait CellarStore: Send + Sync {
    /// Create a new inventory database at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `CellarError::Storage` if the file already exists or the
    /// schema cannot be created, `CellarError::Connection` if the path
    /// cannot be opened.
    fn create(path: &Path) -> Result<()>
    where
        Self: Sized;

    /// Open an existing inventory database.
    ///
    /// # Errors
    ///
    /// Returns `CellarError::Connection` if the file is missing or cannot
    /// be opened.
    fn open(path: &Path) -> Result<Self>
    where
        Self: Sized;

    /// Close the store, releasing the underlying connection.
    fn close(self) -> Result<()>;

    // --- Storage unit operations ---

    /// Create a storage unit and enumerate its positions.
    ///
    /// One position row is created per slot in each zone descriptor, all in
    /// a single transaction.
    ///
    /// # Returns
    ///
    /// Returns the id of the created storage unit.
    ///
    /// # Errors
    ///
    /// Returns `CellarError::Validation` if the zone descriptors are
    /// invalid, `CellarError::Conflict` if the id is already taken.
    fn create_storage(&mut self, storage: &NewStorage) -> Result<String>;

    /// Check whether any storage unit has been configured.
    fn has_storage(&self) -> Result<bool>;

    /// Get a storage unit by id.
    fn get_storage(&self, id: &str) -> Result<Option<StorageUnit>>;

    /// List all storage units, oldest first.
    fn list_storage(&self) -> Result<Vec<StorageUnit>>;

    // --- Position operations ---

    /// Get a position by id.
    fn get_position(&self, id: &str) -> Result<Option<Position>>;

    /// List positions matching the filter, ordered by zone then identifier.
    fn list_positions(&self, filter: &PositionFilter) -> Result<Vec<Position>>;

    // --- Wine operations ---

    /// Add a wine, optionally assigning it to a position.
    ///
    /// When a position is given it is marked occupied with a back-reference
    /// to the new wine, in the same transaction as the insert.
    ///
    /// # Returns
    ///
    /// Returns the id of the created wine.
    ///
    /// # Errors
    ///
    /// Returns `CellarError::NotFound` if the position does not exist and
    /// `CellarError::Conflict` if it is already occupied; in both cases
    /// nothing is written.
    fn add_wine(&mut self, wine: &NewWine) -> Result<String>;

    /// Get a wine by id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(wine))` if found, `Ok(None)` if not found.
    fn get_wine(&self, id: &str) -> Result<Option<Wine>>;

    /// List wines matching the filter, newest first.
    ///
    /// Consumed wines are excluded unless the filter includes them.
    fn list_wines(&self, filter: &WineFilter) -> Result<Vec<Wine>>;

    /// Mark a wine consumed, vacating its position.
    ///
    /// Sets `consumed` and `consumed_date`, clears `position_id`, and frees
    /// the position for reuse, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `CellarError::NotFound` if the wine is unknown and
    /// `CellarError::InvalidState` if it is already consumed.
    fn mark_consumed(&mut self, wine_id: &str) -> Result<()>;

    /// Move a wine to a new position.
    ///
    /// Vacates the old position and occupies the new one atomically.
    /// Moving a wine to its current position is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns `CellarError::Conflict` if the target is occupied by a
    /// different wine (both positions are left unchanged),
    /// `CellarError::InvalidState` for a consumed wine, and
    /// `CellarError::NotFound` if the wine or target position is unknown.
    fn move_wine(&mut self, wine_id: &str, new_position_id: &str) -> Result<()>;

    /// Delete a wine permanently, freeing its position if it has one.
    ///
    /// # Errors
    ///
    /// Returns `CellarError::NotFound` if the wine is unknown.
    fn delete_wine(&mut self, wine_id: &str) -> Result<()>;

    // --- Maintenance operations ---

    /// Check inventory integrity.
    ///
    /// Verifies:
    /// - Foreign key relationships
    /// - Occupancy flags agree with wine back-references
    /// - At most one non-consumed wine per position
    /// - Position zones exist in their storage unit's zone list
    /// - `total_positions` matches the created position rows
    /// - Consumed wines hold no position and carry a consumed date
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if the inventory is valid, or an error describing
    /// the first problem found.
    fn check_integrity(&self) -> Result<()>;
}
