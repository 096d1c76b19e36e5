//! Raw row types for database queries.

use chrono::{DateTime, Utc};

use crate::error::{CellarError, Result};
use crate::storage::types::{Position, StorageUnit, Wine, Zone};

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| CellarError::Storage(format!("Invalid timestamp: {}", e)))
}

/// Raw row data from the storage table, before parsing into domain types.
#[derive(Debug)]
pub struct StorageRow {
    pub id: String,
    pub description: String,
    pub zones_json: String,
    pub total_positions: i64,
    pub created_at: String,
}

impl TryFrom<StorageRow> for StorageUnit {
    type Error = CellarError;

    fn try_from(row: StorageRow) -> Result<Self> {
        let zones: Vec<Zone> = serde_json::from_str(&row.zones_json)
            .map_err(|e| CellarError::Storage(format!("Invalid zones JSON: {}", e)))?;
        let created_at = parse_timestamp(&row.created_at)?;

        Ok(StorageUnit {
            id: row.id,
            description: row.description,
            zones,
            total_positions: row.total_positions,
            created_at,
        })
    }
}

/// Raw row data from the positions table.
#[derive(Debug)]
pub struct PositionRow {
    pub id: String,
    pub storage_id: String,
    pub zone: String,
    pub identifier: String,
    pub is_occupied: bool,
    pub wine_id: Option<String>,
    pub created_at: String,
}

impl TryFrom<PositionRow> for Position {
    type Error = CellarError;

    fn try_from(row: PositionRow) -> Result<Self> {
        let created_at = parse_timestamp(&row.created_at)?;

        Ok(Position {
            id: row.id,
            storage_id: row.storage_id,
            zone: row.zone,
            identifier: row.identifier,
            is_occupied: row.is_occupied,
            wine_id: row.wine_id,
            created_at,
        })
    }
}

/// Raw row data from the wines table.
#[derive(Debug)]
pub struct WineRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub position_id: Option<String>,
    pub added_date: String,
    pub consumed: bool,
    pub consumed_date: Option<String>,
    pub created_at: String,
}

impl TryFrom<WineRow> for Wine {
    type Error = CellarError;

    fn try_from(row: WineRow) -> Result<Self> {
        let added_date = parse_timestamp(&row.added_date)?;
        let consumed_date = row
            .consumed_date
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;
        let created_at = parse_timestamp(&row.created_at)?;

        Ok(Wine {
            id: row.id,
            name: row.name,
            description: row.description,
            position_id: row.position_id,
            added_date,
            consumed: row.consumed,
            consumed_date,
            created_at,
        })
    }
}
