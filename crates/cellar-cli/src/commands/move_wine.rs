use cellar_core::storage::CellarStore;

use crate::app::AppContext;
use crate::cli::MoveArgs;

pub fn run(ctx: &AppContext, args: &MoveArgs) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    store.move_wine(&args.id, &args.position)?;

    if !ctx.quiet() {
        println!("Moved wine {} to position {}", args.id, args.position);
    }
    Ok(())
}
