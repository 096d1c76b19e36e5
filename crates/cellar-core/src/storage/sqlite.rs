//! SQLite storage backend.
//!
//! The only persistence implementation. Every mutating operation that
//! touches a wine row and a position row runs inside a single rusqlite
//! transaction, so a reader never observes a wine occupying a position
//! that still shows unoccupied, or vice versa.

mod row;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{CellarError, Result};
use crate::storage::traits::CellarStore;
use crate::storage::types::{
    NewStorage, NewWine, Position, PositionFilter, StorageUnit, Wine, WineFilter,
};
use self::row::{PositionRow, StorageRow, WineRow};

const SCHEMA: &str = r#"
CREATE TABLE storage (
    id TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    zones TEXT NOT NULL,
    total_positions INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE positions (
    id TEXT PRIMARY KEY,
    storage_id TEXT NOT NULL,
    zone TEXT NOT NULL,
    identifier TEXT NOT NULL,
    is_occupied INTEGER NOT NULL DEFAULT 0,
    wine_id TEXT,
    created_at TEXT NOT NULL,

    FOREIGN KEY(storage_id) REFERENCES storage(id)
);

CREATE TABLE wines (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    position_id TEXT,
    added_date TEXT NOT NULL,
    consumed INTEGER NOT NULL DEFAULT 0,
    consumed_date TEXT,
    created_at TEXT NOT NULL,

    FOREIGN KEY(position_id) REFERENCES positions(id)
);

CREATE INDEX idx_wines_consumed ON wines(consumed);
CREATE INDEX idx_wines_position_id ON wines(position_id);
CREATE INDEX idx_positions_is_occupied ON positions(is_occupied);
CREATE INDEX idx_positions_storage_id ON positions(storage_id);
"#;

/// SQLite-backed wine inventory store.
pub struct SqliteStore {
    #[allow(dead_code)]
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn sqlite_error(err: rusqlite::Error) -> CellarError {
        CellarError::Storage(format!("SQLite error: {}", err))
    }

    /// Generate a prefixed short id, e.g. "wine_1a2b3c4d".
    fn fresh_id(prefix: &str) -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!("{}_{}", prefix, &uuid[..8])
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(Self::sqlite_error)?;
        conn.execute_batch(SCHEMA).map_err(Self::sqlite_error)?;
        Ok(())
    }

    /// Open a fresh in-memory store. Intended for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CellarError::Connection(format!("Cannot open database: {}", e)))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    fn storage_from_query(
        conn: &Connection,
        query: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<StorageUnit>> {
        let mut stmt = conn.prepare(query).map_err(Self::sqlite_error)?;
        let rows = stmt
            .query_map(params, |row| {
                Ok(StorageRow {
                    id: row.get(0)?,
                    description: row.get(1)?,
                    zones_json: row.get(2)?,
                    total_positions: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })
            .map_err(Self::sqlite_error)?;

        let mut units = Vec::new();
        for row in rows {
            units.push(StorageUnit::try_from(row.map_err(Self::sqlite_error)?)?);
        }
        Ok(units)
    }
}

impl CellarStore for SqliteStore {
    fn create(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(CellarError::Storage(
                "Database file already exists".to_string(),
            ));
        }

        let conn = Connection::open(path)
            .map_err(|e| CellarError::Connection(format!("Cannot create database: {}", e)))?;
        Self::init_schema(&conn)?;
        conn.close()
            .map_err(|(_, e)| Self::sqlite_error(e))?;
        Ok(())
    }

    fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CellarError::Connection(format!(
                "Database file not found: {}",
                path.display()
            )));
        }

        let conn = Connection::open(path)
            .map_err(|e| CellarError::Connection(format!("Cannot open database: {}", e)))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(Self::sqlite_error)?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;
        conn.close()
            .map_err(|(_, e)| Self::sqlite_error(e))?;
        Ok(())
    }

    fn create_storage(&mut self, storage: &NewStorage) -> Result<String> {
        storage.validate()?;

        let mut conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let tx = conn.transaction().map_err(Self::sqlite_error)?;

        let storage_id = storage
            .id
            .clone()
            .unwrap_or_else(|| Self::fresh_id("storage"));

        let taken: Option<String> = tx
            .query_row(
                "SELECT id FROM storage WHERE id = ?",
                [&storage_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(Self::sqlite_error)?;
        if taken.is_some() {
            return Err(CellarError::Conflict(format!(
                "Storage id {} already exists",
                storage_id
            )));
        }

        let zones_json = serde_json::to_string(&storage.zones)
            .map_err(|e| CellarError::Storage(format!("Failed to serialize zones: {}", e)))?;
        let created_at = Utc::now().to_rfc3339();

        tx.execute(
            r#"
            INSERT INTO storage (id, description, zones, total_positions, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
            (
                &storage_id,
                &storage.description,
                zones_json,
                storage.total_positions() as i64,
                &created_at,
            ),
        )
        .map_err(Self::sqlite_error)?;

        for zone in &storage.zones {
            for identifier in &zone.positions {
                tx.execute(
                    r#"
                    INSERT INTO positions (id, storage_id, zone, identifier, is_occupied, created_at)
                    VALUES (?, ?, ?, ?, 0, ?)
                    "#,
                    (
                        Self::fresh_id("pos"),
                        &storage_id,
                        &zone.name,
                        identifier,
                        &created_at,
                    ),
                )
                .map_err(Self::sqlite_error)?;
            }
        }

        tx.commit().map_err(Self::sqlite_error)?;

        Ok(storage_id)
    }

    fn has_storage(&self) -> Result<bool> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM storage", [], |row| row.get(0))
            .map_err(Self::sqlite_error)?;
        Ok(count > 0)
    }

    fn get_storage(&self, id: &str) -> Result<Option<StorageUnit>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let mut units = Self::storage_from_query(
            &conn,
            "SELECT id, description, zones, total_positions, created_at FROM storage WHERE id = ?",
            &[&id],
        )?;
        Ok(units.pop())
    }

    fn list_storage(&self) -> Result<Vec<StorageUnit>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        Self::storage_from_query(
            &conn,
            "SELECT id, description, zones, total_positions, created_at FROM storage ORDER BY created_at",
            &[],
        )
    }

    fn get_position(&self, id: &str) -> Result<Option<Position>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let result = conn
            .query_row(
                r#"
                SELECT id, storage_id, zone, identifier, is_occupied, wine_id, created_at
                FROM positions
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(PositionRow {
                        id: row.get(0)?,
                        storage_id: row.get(1)?,
                        zone: row.get(2)?,
                        identifier: row.get(3)?,
                        is_occupied: row.get(4)?,
                        wine_id: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                },
            )
            .optional()
            .map_err(Self::sqlite_error)?;

        result.map(Position::try_from).transpose()
    }

    fn list_positions(&self, filter: &PositionFilter) -> Result<Vec<Position>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref storage_id) = filter.storage_id {
            conditions.push("storage_id = ?".to_string());
            params.push(Box::new(storage_id.clone()));
        }
        if let Some(ref zone) = filter.zone {
            conditions.push("zone = ?".to_string());
            params.push(Box::new(zone.clone()));
        }
        if filter.available_only {
            conditions.push("is_occupied = 0".to_string());
        }

        let mut query = String::from(
            "SELECT id, storage_id, zone, identifier, is_occupied, wine_id, created_at FROM positions",
        );
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY zone, identifier");

        let mut stmt = conn.prepare(&query).map_err(Self::sqlite_error)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                Ok(PositionRow {
                    id: row.get(0)?,
                    storage_id: row.get(1)?,
                    zone: row.get(2)?,
                    identifier: row.get(3)?,
                    is_occupied: row.get(4)?,
                    wine_id: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })
            .map_err(Self::sqlite_error)?;

        let mut positions = Vec::new();
        for row in rows {
            positions.push(Position::try_from(row.map_err(Self::sqlite_error)?)?);
        }
        Ok(positions)
    }

    fn add_wine(&mut self, wine: &NewWine) -> Result<String> {
        wine.validate()?;

        let mut conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let tx = conn.transaction().map_err(Self::sqlite_error)?;

        let wine_id = wine.id.clone().unwrap_or_else(|| Self::fresh_id("wine"));

        if let Some(ref position_id) = wine.position_id {
            let occupied: Option<bool> = tx
                .query_row(
                    "SELECT is_occupied FROM positions WHERE id = ?",
                    [position_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(Self::sqlite_error)?;

            match occupied {
                None => {
                    return Err(CellarError::NotFound(format!(
                        "Position {} does not exist",
                        position_id
                    )));
                }
                Some(true) => {
                    return Err(CellarError::Conflict(format!(
                        "Position {} is already occupied",
                        position_id
                    )));
                }
                Some(false) => {}
            }

            tx.execute(
                "UPDATE positions SET is_occupied = 1, wine_id = ? WHERE id = ?",
                (&wine_id, position_id),
            )
            .map_err(Self::sqlite_error)?;
        }

        let added_date = wine.added_date.unwrap_or_else(Utc::now).to_rfc3339();
        let created_at = Utc::now().to_rfc3339();

        tx.execute(
            r#"
            INSERT INTO wines (id, name, description, position_id, added_date, consumed, created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?)
            "#,
            (
                &wine_id,
                &wine.name,
                &wine.description,
                wine.position_id.as_deref(),
                added_date,
                created_at,
            ),
        )
        .map_err(Self::sqlite_error)?;

        tx.commit().map_err(Self::sqlite_error)?;

        Ok(wine_id)
    }

    fn get_wine(&self, id: &str) -> Result<Option<Wine>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let result = conn
            .query_row(
                r#"
                SELECT id, name, description, position_id, added_date, consumed, consumed_date, created_at
                FROM wines
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(WineRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                        position_id: row.get(3)?,
                        added_date: row.get(4)?,
                        consumed: row.get(5)?,
                        consumed_date: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                },
            )
            .optional()
            .map_err(Self::sqlite_error)?;

        result.map(Wine::try_from).transpose()
    }

    fn list_wines(&self, filter: &WineFilter) -> Result<Vec<Wine>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let mut query = String::from(
            "SELECT id, name, description, position_id, added_date, consumed, consumed_date, created_at FROM wines",
        );
        if !filter.include_consumed {
            query.push_str(" WHERE consumed = 0");
        }
        query.push_str(" ORDER BY added_date DESC");

        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(limit) = filter.limit {
            query.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = conn.prepare(&query).map_err(Self::sqlite_error)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                Ok(WineRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    position_id: row.get(3)?,
                    added_date: row.get(4)?,
                    consumed: row.get(5)?,
                    consumed_date: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })
            .map_err(Self::sqlite_error)?;

        let mut wines = Vec::new();
        for row in rows {
            wines.push(Wine::try_from(row.map_err(Self::sqlite_error)?)?);
        }
        Ok(wines)
    }

    fn mark_consumed(&mut self, wine_id: &str) -> Result<()> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let tx = conn.transaction().map_err(Self::sqlite_error)?;

        let current: Option<(Option<String>, bool)> = tx
            .query_row(
                "SELECT position_id, consumed FROM wines WHERE id = ?",
                [wine_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(Self::sqlite_error)?;

        let (position_id, consumed) = current.ok_or_else(|| {
            CellarError::NotFound(format!("Wine {} does not exist", wine_id))
        })?;
        if consumed {
            return Err(CellarError::InvalidState(format!(
                "Wine {} is already consumed",
                wine_id
            )));
        }

        let consumed_date = Utc::now().to_rfc3339();
        tx.execute(
            "UPDATE wines SET consumed = 1, consumed_date = ?, position_id = NULL WHERE id = ?",
            (consumed_date, wine_id),
        )
        .map_err(Self::sqlite_error)?;

        if let Some(position_id) = position_id {
            tx.execute(
                "UPDATE positions SET is_occupied = 0, wine_id = NULL WHERE id = ?",
                [position_id],
            )
            .map_err(Self::sqlite_error)?;
        }

        tx.commit().map_err(Self::sqlite_error)?;

        Ok(())
    }

    fn move_wine(&mut self, wine_id: &str, new_position_id: &str) -> Result<()> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let tx = conn.transaction().map_err(Self::sqlite_error)?;

        let current: Option<(Option<String>, bool)> = tx
            .query_row(
                "SELECT position_id, consumed FROM wines WHERE id = ?",
                [wine_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(Self::sqlite_error)?;

        let (current_position_id, consumed) = current.ok_or_else(|| {
            CellarError::NotFound(format!("Wine {} does not exist", wine_id))
        })?;
        if consumed {
            return Err(CellarError::InvalidState(format!(
                "Wine {} is consumed and no longer holds a position",
                wine_id
            )));
        }

        // Moving to the current position is a no-op success.
        if current_position_id.as_deref() == Some(new_position_id) {
            tx.commit().map_err(Self::sqlite_error)?;
            return Ok(());
        }

        let occupied: Option<bool> = tx
            .query_row(
                "SELECT is_occupied FROM positions WHERE id = ?",
                [new_position_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(Self::sqlite_error)?;

        match occupied {
            None => {
                return Err(CellarError::NotFound(format!(
                    "Position {} does not exist",
                    new_position_id
                )));
            }
            Some(true) => {
                return Err(CellarError::Conflict(format!(
                    "Position {} is already occupied",
                    new_position_id
                )));
            }
            Some(false) => {}
        }

        if let Some(ref old_position_id) = current_position_id {
            tx.execute(
                "UPDATE positions SET is_occupied = 0, wine_id = NULL WHERE id = ?",
                [old_position_id],
            )
            .map_err(Self::sqlite_error)?;
        }

        tx.execute(
            "UPDATE positions SET is_occupied = 1, wine_id = ? WHERE id = ?",
            (wine_id, new_position_id),
        )
        .map_err(Self::sqlite_error)?;

        tx.execute(
            "UPDATE wines SET position_id = ? WHERE id = ?",
            (new_position_id, wine_id),
        )
        .map_err(Self::sqlite_error)?;

        tx.commit().map_err(Self::sqlite_error)?;

        Ok(())
    }

    fn delete_wine(&mut self, wine_id: &str) -> Result<()> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let tx = conn.transaction().map_err(Self::sqlite_error)?;

        let position_id: Option<Option<String>> = tx
            .query_row(
                "SELECT position_id FROM wines WHERE id = ?",
                [wine_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(Self::sqlite_error)?;

        let position_id = position_id.ok_or_else(|| {
            CellarError::NotFound(format!("Wine {} does not exist", wine_id))
        })?;

        if let Some(position_id) = position_id {
            tx.execute(
                "UPDATE positions SET is_occupied = 0, wine_id = NULL WHERE id = ?",
                [position_id],
            )
            .map_err(Self::sqlite_error)?;
        }

        tx.execute("DELETE FROM wines WHERE id = ?", [wine_id])
            .map_err(Self::sqlite_error)?;

        tx.commit().map_err(Self::sqlite_error)?;

        Ok(())
    }

    fn check_integrity(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CellarError::Storage("SQLite connection poisoned".to_string()))?;

        let mut stmt = conn
            .prepare("PRAGMA foreign_key_check")
            .map_err(Self::sqlite_error)?;
        let mut rows = stmt.query([]).map_err(Self::sqlite_error)?;
        if rows.next().map_err(Self::sqlite_error)?.is_some() {
            return Err(CellarError::Storage(
                "Foreign key integrity check failed".to_string(),
            ));
        }

        // is_occupied must agree with a non-consumed wine referencing the position.
        let stale_occupied: i64 = conn
            .query_row(
                r#"
                SELECT COUNT(*) FROM positions p
                WHERE p.is_occupied = 1 AND NOT EXISTS (
                    SELECT 1 FROM wines w
                    WHERE w.id = p.wine_id AND w.position_id = p.id AND w.consumed = 0
                )
                "#,
                [],
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;
        if stale_occupied > 0 {
            return Err(CellarError::Storage(
                "Occupied positions without a matching wine".to_string(),
            ));
        }

        let unmarked: i64 = conn
            .query_row(
                r#"
                SELECT COUNT(*) FROM wines w
                JOIN positions p ON p.id = w.position_id
                WHERE w.consumed = 0 AND (p.is_occupied = 0 OR p.wine_id IS NOT w.id)
                "#,
                [],
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;
        if unmarked > 0 {
            return Err(CellarError::Storage(
                "Wines referencing positions not marked occupied".to_string(),
            ));
        }

        let double_booked: i64 = conn
            .query_row(
                r#"
                SELECT COUNT(*) FROM (
                    SELECT 1 FROM wines
                    WHERE consumed = 0 AND position_id IS NOT NULL
                    GROUP BY position_id HAVING COUNT(*) > 1
                )
                "#,
                [],
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;
        if double_booked > 0 {
            return Err(CellarError::Storage(
                "Multiple wines assigned to one position".to_string(),
            ));
        }

        // Consumed wines must carry a date and hold no position.
        let bad_consumed: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM wines WHERE consumed = 1 AND (consumed_date IS NULL OR position_id IS NOT NULL)",
                [],
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;
        if bad_consumed > 0 {
            return Err(CellarError::Storage(
                "Consumed wines with missing date or lingering position".to_string(),
            ));
        }

        // A position's zone must exist in its storage unit's zone list.
        let orphan_zones: i64 = conn
            .query_row(
                r#"
                SELECT COUNT(*) FROM positions p
                JOIN storage s ON s.id = p.storage_id
                WHERE NOT EXISTS (
                    SELECT 1 FROM json_each(s.zones)
                    WHERE json_extract(json_each.value, '$.name') = p.zone
                )
                "#,
                [],
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;
        if orphan_zones > 0 {
            return Err(CellarError::Storage(
                "Positions referencing zones missing from their storage unit".to_string(),
            ));
        }

        let wrong_totals: i64 = conn
            .query_row(
                r#"
                SELECT COUNT(*) FROM storage s
                WHERE s.total_positions != (
                    SELECT COUNT(*) FROM positions WHERE storage_id = s.id
                )
                "#,
                [],
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;
        if wrong_totals > 0 {
            return Err(CellarError::Storage(
                "Storage total_positions does not match position rows".to_string(),
            ));
        }

        Ok(())
    }
}
