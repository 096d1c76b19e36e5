use dialoguer::Confirm;

use cellar_core::storage::CellarStore;

use crate::app::AppContext;
use crate::cli::DeleteArgs;

pub fn run(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Permanently delete wine {}?", args.id))
            .default(false)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))?;
        if !confirmed {
            if !ctx.quiet() {
                println!("Aborted.");
            }
            return Ok(());
        }
    }

    let mut store = ctx.open_store()?;
    store.delete_wine(&args.id)?;

    if !ctx.quiet() {
        println!("Deleted wine {}", args.id);
    }
    Ok(())
}
