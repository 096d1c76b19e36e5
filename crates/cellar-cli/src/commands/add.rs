use cellar_core::storage::{CellarStore, NewWine};

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::commands::parse_datetime;

pub fn run(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let mut wine = NewWine::new(&args.name, &args.description);
    if let Some(ref position_id) = args.position {
        wine = wine.at_position(position_id);
    }
    if let Some(ref date) = args.date {
        wine = wine.with_added_date(parse_datetime(date)?);
    }

    let mut store = ctx.open_store()?;
    let wine_id = store.add_wine(&wine)?;

    if ctx.quiet() {
        println!("{}", wine_id);
    } else {
        println!("Added wine {}", wine_id);
    }
    Ok(())
}
