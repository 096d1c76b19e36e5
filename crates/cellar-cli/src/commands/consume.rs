use cellar_core::storage::CellarStore;

use crate::app::AppContext;
use crate::cli::ConsumeArgs;

pub fn run(ctx: &AppContext, args: &ConsumeArgs) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    store.mark_consumed(&args.id)?;

    if !ctx.quiet() {
        println!("Marked wine {} consumed", args.id);
    }
    Ok(())
}
