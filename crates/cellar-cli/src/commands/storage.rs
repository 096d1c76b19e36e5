use cellar_core::storage::{CellarStore, NewStorage, PositionFilter, Zone};

use crate::app::AppContext;
use crate::cli::{StorageArgs, StorageCommands, StorageCreateArgs};

pub fn run(ctx: &AppContext, args: &StorageArgs) -> anyhow::Result<()> {
    match &args.command {
        StorageCommands::Create(create_args) => create(ctx, create_args),
        StorageCommands::Show => show(ctx),
    }
}

/// Parse a `--zone NAME:COUNT` descriptor into numbered slots.
fn parse_zone_flag(spec: &str) -> anyhow::Result<Zone> {
    let (name, count) = spec
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("Invalid zone descriptor: {} (expected NAME:COUNT)", spec))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow::anyhow!("Zone name cannot be empty: {}", spec));
    }
    let count: usize = count
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid slot count in zone descriptor: {}", spec))?;
    if count == 0 {
        return Err(anyhow::anyhow!("Zone {} must have at least one slot", name));
    }
    Ok(Zone::numbered(name, count))
}

fn create(ctx: &AppContext, args: &StorageCreateArgs) -> anyhow::Result<()> {
    let mut storage = NewStorage::new(&args.description);
    if let Some(ref id) = args.id {
        storage = storage.with_id(id);
    }

    if let Some(ref file) = args.zones_file {
        let contents = std::fs::read_to_string(file)
            .map_err(|e| anyhow::anyhow!("Failed to read zones file {}: {}", file, e))?;
        let zones: Vec<Zone> = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid zones file {}: {}", file, e))?;
        for zone in zones {
            storage = storage.zone(zone);
        }
    }
    for spec in &args.zones {
        storage = storage.zone(parse_zone_flag(spec)?);
    }

    let mut store = ctx.open_store()?;
    let total = storage.total_positions();
    let storage_id = store.create_storage(&storage)?;

    if ctx.quiet() {
        println!("{}", storage_id);
    } else {
        println!("Created storage {} with {} positions", storage_id, total);
    }
    Ok(())
}

fn show(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let units = store.list_storage()?;
    if units.is_empty() {
        println!("No storage configured. Run `cellar storage create` first.");
        return Ok(());
    }

    for unit in units {
        let positions = store.list_positions(&PositionFilter::new().storage(&unit.id))?;
        let occupied = positions.iter().filter(|p| p.is_occupied).count();

        println!("{} ({})", unit.description, unit.id);
        println!("  Occupancy: {}/{}", occupied, unit.total_positions);
        for zone in &unit.zones {
            println!("  Zone {}: {} slots", zone.name, zone.slot_count());
        }
    }
    Ok(())
}
