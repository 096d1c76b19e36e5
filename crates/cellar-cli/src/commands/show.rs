use cellar_core::storage::CellarStore;

use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::output;

pub fn run(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    let wine = store
        .get_wine(&args.id)?
        .ok_or_else(|| anyhow::anyhow!("Wine {} not found", args.id))?;
    let labels = output::position_label_map(&store)?;

    if args.json {
        let output = serde_json::to_string_pretty(&output::wine_json(&wine, &labels))?;
        println!("{}", output);
    } else {
        output::print_wine(&wine, &labels, ctx.quiet());
    }
    Ok(())
}
