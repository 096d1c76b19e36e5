//! Core data types for the storage layer.
//!
//! These types mirror the persisted schema: one storage unit owns many
//! positions, and a wine optionally occupies exactly one position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CellarError, Result};

/// A named subdivision of a storage unit, carrying its slot identifiers.
///
/// Zones are persisted as a JSON array inside the `storage.zones` column.
/// The descriptor is validated on write, never trusted on read paths that
/// only display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone name (e.g., "A", "top-shelf")
    pub name: String,

    /// Human-readable slot labels within this zone (e.g., "A-1", "A-2")
    pub positions: Vec<String>,
}

impl Zone {
    pub fn new(name: impl Into<String>, positions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            positions,
        }
    }

    /// Build a zone with `count` numbered slots: "NAME-1" .. "NAME-count".
    pub fn numbered(name: impl Into<String>, count: usize) -> Self {
        let name = name.into();
        let positions = (1..=count).map(|i| format!("{}-{}", name, i)).collect();
        Self { name, positions }
    }

    pub fn slot_count(&self) -> usize {
        self.positions.len()
    }
}

/// A physical wine storage unit (cellar, rack) divided into zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageUnit {
    /// Unique identifier (e.g., "storage_1a2b3c4d")
    pub id: String,

    /// Free-form description of the unit
    pub description: String,

    /// Zone descriptors, as validated at creation time
    pub zones: Vec<Zone>,

    /// Total position count; equals the number of position rows created
    pub total_positions: i64,

    /// When this storage unit was created
    pub created_at: DateTime<Utc>,
}

/// An individual slot within a zone that can hold at most one wine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier (e.g., "pos_1a2b3c4d")
    pub id: String,

    /// Owning storage unit
    pub storage_id: String,

    /// Zone name within the owning storage unit
    pub zone: String,

    /// Human-readable slot label (e.g., "A-3")
    pub identifier: String,

    /// Whether a non-consumed wine currently sits here
    pub is_occupied: bool,

    /// Back-reference to the occupying wine, if any
    pub wine_id: Option<String>,

    /// When this position was created
    pub created_at: DateTime<Utc>,
}

/// A wine bottle in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wine {
    /// Unique identifier (e.g., "wine_1a2b3c4d")
    pub id: String,

    /// Wine name (e.g., "Malbec 2020")
    pub name: String,

    /// Rich description containing all details
    pub description: String,

    /// Slot assignment, cleared on consumption
    pub position_id: Option<String>,

    /// When the wine entered the collection
    pub added_date: DateTime<Utc>,

    /// Whether the wine has been drunk
    pub consumed: bool,

    /// Set exactly when `consumed` is true
    pub consumed_date: Option<DateTime<Utc>>,

    /// When this row was created
    pub created_at: DateTime<Utc>,
}

/// Builder for creating a new storage unit with its positions.
#[derive(Debug, Clone)]
pub struct NewStorage {
    /// Optional caller-supplied id; generated when absent
    pub id: Option<String>,

    /// Free-form description of the unit
    pub description: String,

    /// Zone descriptors; one position row is created per slot
    pub zones: Vec<Zone>,
}

impl NewStorage {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: None,
            description: description.into(),
            zones: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    pub fn total_positions(&self) -> usize {
        self.zones.iter().map(Zone::slot_count).sum()
    }

    /// Validate the zone descriptors before anything is written.
    ///
    /// Rejects empty descriptions, empty zone lists, unnamed or duplicate
    /// zones, zones without slots, and duplicate slot labels within a zone.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(CellarError::Validation(
                "Storage description cannot be empty".to_string(),
            ));
        }
        if self.zones.is_empty() {
            return Err(CellarError::Validation(
                "Storage must define at least one zone".to_string(),
            ));
        }

        let mut seen_names: Vec<&str> = Vec::new();
        for zone in &self.zones {
            let name = zone.name.trim();
            if name.is_empty() {
                return Err(CellarError::Validation(
                    "Zone name cannot be empty".to_string(),
                ));
            }
            if seen_names.contains(&name) {
                return Err(CellarError::Validation(format!(
                    "Duplicate zone name: {}",
                    name
                )));
            }
            seen_names.push(name);

            if zone.positions.is_empty() {
                return Err(CellarError::Validation(format!(
                    "Zone {} has no positions",
                    name
                )));
            }
            let mut seen_slots: Vec<&str> = Vec::new();
            for identifier in &zone.positions {
                let identifier = identifier.trim();
                if identifier.is_empty() {
                    return Err(CellarError::Validation(format!(
                        "Zone {} has an empty position identifier",
                        name
                    )));
                }
                if seen_slots.contains(&identifier) {
                    return Err(CellarError::Validation(format!(
                        "Duplicate position identifier {} in zone {}",
                        identifier, name
                    )));
                }
                seen_slots.push(identifier);
            }
        }

        Ok(())
    }
}

/// Builder for adding a new wine.
#[derive(Debug, Clone)]
pub struct NewWine {
    /// Optional caller-supplied id; generated when absent
    pub id: Option<String>,

    /// Wine name
    pub name: String,

    /// Rich description
    pub description: String,

    /// Target position; the wine is unplaced when absent
    pub position_id: Option<String>,

    /// Optional intake date override
    pub added_date: Option<DateTime<Utc>>,
}

impl NewWine {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            position_id: None,
            added_date: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn at_position(mut self, position_id: impl Into<String>) -> Self {
        self.position_id = Some(position_id.into());
        self
    }

    pub fn with_added_date(mut self, added_date: DateTime<Utc>) -> Self {
        self.added_date = Some(added_date);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CellarError::Validation(
                "Wine name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filter for querying positions.
#[derive(Debug, Clone, Default)]
pub struct PositionFilter {
    /// Filter by owning storage unit
    pub storage_id: Option<String>,

    /// Filter by zone name
    pub zone: Option<String>,

    /// Only return unoccupied positions
    pub available_only: bool,
}

impl PositionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storage(mut self, storage_id: impl Into<String>) -> Self {
        self.storage_id = Some(storage_id.into());
        self
    }

    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn available(mut self) -> Self {
        self.available_only = true;
        self
    }
}

/// Filter for querying wines.
#[derive(Debug, Clone, Default)]
pub struct WineFilter {
    /// Include consumed wines (excluded by default)
    pub include_consumed: bool,

    /// Maximum number of results
    pub limit: Option<usize>,
}

impl WineFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_consumed(mut self) -> Self {
        self.include_consumed = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_numbered_slots() {
        let zone = Zone::numbered("A", 3);
        assert_eq!(zone.positions, vec!["A-1", "A-2", "A-3"]);
        assert_eq!(zone.slot_count(), 3);
    }

    #[test]
    fn test_new_storage_builder() {
        let storage = NewStorage::new("Basement rack")
            .zone(Zone::numbered("A", 4))
            .zone(Zone::numbered("B", 2));

        assert_eq!(storage.total_positions(), 6);
        assert!(storage.validate().is_ok());
    }

    #[test]
    fn test_new_storage_rejects_empty_zones() {
        let storage = NewStorage::new("Basement rack");
        assert!(storage.validate().is_err());
    }

    #[test]
    fn test_new_storage_rejects_duplicate_zone_names() {
        let storage = NewStorage::new("Basement rack")
            .zone(Zone::numbered("A", 2))
            .zone(Zone::numbered("A", 3));
        assert!(storage.validate().is_err());
    }

    #[test]
    fn test_new_storage_rejects_duplicate_slot_labels() {
        let zone = Zone::new("A", vec!["A-1".to_string(), "A-1".to_string()]);
        let storage = NewStorage::new("Basement rack").zone(zone);
        assert!(storage.validate().is_err());
    }

    #[test]
    fn test_new_wine_builder() {
        let wine = NewWine::new("Malbec 2020", "Argentinian red, plum notes")
            .at_position("pos_1a2b3c4d");

        assert_eq!(wine.name, "Malbec 2020");
        assert_eq!(wine.position_id.as_deref(), Some("pos_1a2b3c4d"));
        assert!(wine.validate().is_ok());
    }

    #[test]
    fn test_new_wine_rejects_blank_name() {
        let wine = NewWine::new("  ", "whatever");
        assert!(wine.validate().is_err());
    }

    #[test]
    fn test_filters_default_behavior() {
        let wines = WineFilter::new();
        assert!(!wines.include_consumed);
        assert!(wines.limit.is_none());

        let positions = PositionFilter::new().storage("storage_1").available();
        assert_eq!(positions.storage_id.as_deref(), Some("storage_1"));
        assert!(positions.available_only);
        assert!(positions.zone.is_none());
    }
}
