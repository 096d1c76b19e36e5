//! Output formatting helpers for the CLI.

use std::collections::HashMap;

use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;

use cellar_core::storage::{CellarStore, Position, PositionFilter, SqliteStore, Wine};

/// Build a map of position id -> "ZONE IDENTIFIER" label for display.
pub fn position_label_map(store: &SqliteStore) -> anyhow::Result<HashMap<String, String>> {
    let positions = store.list_positions(&PositionFilter::new())?;
    let mut map = HashMap::new();
    for position in positions {
        let label = format!("{} {}", position.zone, position.identifier);
        map.insert(position.id, label);
    }
    Ok(map)
}

fn position_label(wine: &Wine, labels: &HashMap<String, String>) -> String {
    wine.position_id
        .as_ref()
        .and_then(|id| labels.get(id).cloned())
        .unwrap_or_else(|| "-".to_string())
}

/// Convert a wine to JSON for output.
pub fn wine_json(wine: &Wine, labels: &HashMap<String, String>) -> serde_json::Value {
    serde_json::json!({
        "id": wine.id,
        "name": wine.name,
        "description": wine.description,
        "position_id": wine.position_id,
        "position": wine.position_id.as_ref().and_then(|id| labels.get(id)),
        "added_date": wine.added_date,
        "consumed": wine.consumed,
        "consumed_date": wine.consumed_date,
    })
}

/// Convert multiple wines to a JSON array for output.
pub fn wines_json(wines: &[Wine], labels: &HashMap<String, String>) -> Vec<serde_json::Value> {
    wines.iter().map(|wine| wine_json(wine, labels)).collect()
}

/// Convert a position to JSON for output.
pub fn position_json(position: &Position) -> serde_json::Value {
    serde_json::json!({
        "id": position.id,
        "storage_id": position.storage_id,
        "zone": position.zone,
        "identifier": position.identifier,
        "is_occupied": position.is_occupied,
        "wine_id": position.wine_id,
    })
}

/// Convert multiple positions to a JSON array for output.
pub fn positions_json(positions: &[Position]) -> Vec<serde_json::Value> {
    positions.iter().map(position_json).collect()
}

/// Render wines as a table.
pub fn wines_table(wines: &[Wine], labels: &HashMap<String, String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "NAME", "POSITION", "ADDED", "STATUS"]);
    for wine in wines {
        let status = if wine.consumed {
            "consumed".dimmed().to_string()
        } else {
            "in cellar".green().to_string()
        };
        table.add_row(vec![
            wine.id.clone(),
            wine.name.clone(),
            position_label(wine, labels),
            wine.added_date.format("%Y-%m-%d").to_string(),
            status,
        ]);
    }
    table
}

/// Render positions as a table.
pub fn positions_table(positions: &[Position]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "ZONE", "SLOT", "STATUS", "WINE"]);
    for position in positions {
        let status = if position.is_occupied {
            "occupied".red().to_string()
        } else {
            "available".green().to_string()
        };
        table.add_row(vec![
            position.id.clone(),
            position.zone.clone(),
            position.identifier.clone(),
            status,
            position.wine_id.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

/// Print a single wine in human-readable format.
pub fn print_wine(wine: &Wine, labels: &HashMap<String, String>, quiet: bool) {
    if quiet {
        println!("{}", wine.id);
        return;
    }

    println!("ID: {}", wine.id);
    println!("Name: {}", wine.name);
    if !wine.description.is_empty() {
        println!("Description: {}", wine.description);
    }
    println!("Position: {}", position_label(wine, labels));
    println!("Added: {}", wine.added_date.format("%Y-%m-%d"));
    if wine.consumed {
        let when = wine
            .consumed_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("Consumed: yes ({})", when);
    } else {
        println!("Consumed: no");
    }
}
