use cellar_core::storage::{CellarStore, WineFilter};

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output;

pub fn run(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    let mut filter = WineFilter::new();
    if args.all {
        filter = filter.include_consumed();
    }
    if let Some(limit) = args.limit {
        filter = filter.limit(limit);
    }

    let wines = store.list_wines(&filter)?;
    let labels = output::position_label_map(&store)?;

    if args.json {
        let output = serde_json::to_string_pretty(&output::wines_json(&wines, &labels))?;
        println!("{}", output);
        return Ok(());
    }

    if wines.is_empty() {
        if !ctx.quiet() {
            println!("No wines in your collection.");
        }
        return Ok(());
    }
    println!("{}", output::wines_table(&wines, &labels));
    Ok(())
}
