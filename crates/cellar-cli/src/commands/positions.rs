use cellar_core::storage::{CellarStore, PositionFilter};

use crate::app::AppContext;
use crate::cli::PositionsArgs;
use crate::output;

pub fn run(ctx: &AppContext, args: &PositionsArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    let mut filter = PositionFilter::new();
    if args.available {
        filter = filter.available();
    }
    if let Some(ref storage_id) = args.storage {
        filter = filter.storage(storage_id);
    }
    if let Some(ref zone) = args.zone {
        filter = filter.zone(zone);
    }

    let positions = store.list_positions(&filter)?;

    if args.json {
        let output = serde_json::to_string_pretty(&output::positions_json(&positions))?;
        println!("{}", output);
        return Ok(());
    }

    if positions.is_empty() {
        if !ctx.quiet() {
            println!("No positions found.");
        }
        return Ok(());
    }
    println!("{}", output::positions_table(&positions));
    Ok(())
}
